//! # tallyup-engine
//!
//! **Pure deterministic settlement engine for TallyUp.**
//!
//! The engine takes the members of a group and the expenses logged against
//! it and produces each member's net balance plus a short list of pairwise
//! transfers that settles every debt. It has:
//!
//! - **Zero side effects**: no I/O, no shared state, diagnostics only through
//!   an explicit [`SettlementObserver`]
//! - **Exact arithmetic**: `rust_decimal` internally, 0.01 epsilon comparisons
//!   and 2-place rounding at the output boundary
//! - **Deterministic output**: same input order → same balances, transfers
//!   and [`settlement_digest`]
//! - **Checkable invariants**: [`ConservationCheck`] verifies that money is
//!   neither created nor lost

pub mod balances;
pub mod conservation;
pub mod digest;
pub mod observer;
pub mod reduction;

pub use balances::{SettlementEngine, calculate_group_balances};
pub use conservation::ConservationCheck;
pub use digest::{digest_hex, settlement_digest, verify_digest};
pub use observer::{
    NoopObserver, ObservedEvent, RecordingObserver, SettlementObserver, TracingObserver,
};
pub use reduction::calculate_settlements;
