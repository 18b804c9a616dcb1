//! # tallyup-api
//!
//! Request-facing side of the **TallyUp** settlement engine.
//!
//! - **Ports**: [`MemberDirectory`] and [`ExpenseLedger`], the read-side
//!   queries the handler needs from the surrounding application
//! - **Store**: [`InMemoryStore`], a thread-safe in-memory implementation of
//!   both ports
//! - **Handler**: [`SettlementHandler`] serving [`SETTLEMENT_ROUTE`]
//! - **Envelope**: [`ApiResponse`] with its HTTP status mapping
//! - **Snapshots**: [`GroupSnapshot`] and [`render_report`] for the
//!   `tallyup-report` binary

pub mod handler;
pub mod memory;
pub mod ports;
pub mod response;
pub mod snapshot;
pub mod validation;

pub use handler::{SETTLEMENT_ROUTE, SettlementHandler, group_id_from_path};
pub use memory::InMemoryStore;
pub use ports::{ExpenseLedger, MemberDirectory};
pub use response::{ApiResponse, status_for};
pub use snapshot::{GroupSnapshot, SettlementReport, render_report};
