//! # tallyup-types
//!
//! Shared types, errors, and configuration for the **TallyUp** settlement
//! engine.
//!
//! This crate is the leaf dependency of the workspace: every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`UserId`], [`GroupId`], [`ExpenseId`]
//! - **Input model**: [`Member`], [`Expense`], [`ExpenseSplit`]
//! - **Derived model**: [`Balance`], [`Transfer`], [`SettlementResult`]
//! - **Configuration**: [`EngineConfig`], [`SplitPolicy`], [`OrphanPolicy`]
//! - **Errors**: [`TallyError`] with `TU_ERR_` prefix codes
//! - **Constants**: thresholds and defaults

pub mod balance;
pub mod config;
pub mod constants;
pub mod error;
pub mod expense;
pub mod ids;
pub mod member;
pub mod settlement;

// Re-export all primary types at crate root for ergonomic imports:
//   use tallyup_types::{Member, Expense, Balance, Transfer, ...};

pub use balance::*;
pub use config::*;
pub use error::*;
pub use expense::*;
pub use ids::*;
pub use member::*;
pub use settlement::*;

// Constants are accessed via `tallyup_types::constants::FOO`
// (not re-exported to avoid name collisions).
