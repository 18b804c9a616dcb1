//! Error types for the TallyUp settlement engine.
//!
//! All errors use the `TU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Input errors (members, expenses, splits)
//! - 2xx: Group access errors
//! - 3xx: Settlement invariant errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{ExpenseId, GroupId, UserId};

/// Central error enum for all TallyUp operations.
#[derive(Debug, Error)]
pub enum TallyError {
    // =================================================================
    // Input Errors (1xx)
    // =================================================================
    /// An expense failed validation (negative amount, bad scale, etc.).
    #[error("TU_ERR_100: Invalid expense: {reason}")]
    InvalidExpense { reason: String },

    /// An expense's payer is not a member of the group being settled.
    #[error("TU_ERR_101: Expense {} paid by non-member {payer}", .expense.map_or_else(|| "<unsaved>".to_string(), |id| id.to_string()))]
    OrphanedExpense {
        expense: Option<ExpenseId>,
        payer: UserId,
    },

    /// A recorded split is unusable.
    #[error("TU_ERR_102: Invalid split: {reason}")]
    InvalidSplit { reason: String },

    /// The same user appears twice in one member list.
    #[error("TU_ERR_103: Duplicate member: {0}")]
    DuplicateMember(UserId),

    // =================================================================
    // Group Errors (2xx)
    // =================================================================
    /// The requested group does not exist.
    #[error("TU_ERR_200: Group not found: {0}")]
    GroupNotFound(GroupId),

    /// The requester is not a member of the group.
    #[error("TU_ERR_201: User {user} is not a member of {group}")]
    NotGroupMember { group: GroupId, user: UserId },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// Σ balance does not match the unattributed amounts.
    #[error("TU_ERR_300: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    /// Applying the settlements left a member unsettled.
    #[error("TU_ERR_301: Unsettled balance for user {user}: residual {residual}")]
    UnsettledBalance { user: UserId, residual: Decimal },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TU_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TU_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, bad values, etc.).
    #[error("TU_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// A collaborator store failed.
    #[error("TU_ERR_903: Storage error: {0}")]
    Storage(String),

    /// I/O error (disk, network).
    #[error("TU_ERR_904: I/O error: {0}")]
    Io(String),
}

impl TallyError {
    /// The `TU_ERR_xxx` code of this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidExpense { .. } => "TU_ERR_100",
            Self::OrphanedExpense { .. } => "TU_ERR_101",
            Self::InvalidSplit { .. } => "TU_ERR_102",
            Self::DuplicateMember(_) => "TU_ERR_103",
            Self::GroupNotFound(_) => "TU_ERR_200",
            Self::NotGroupMember { .. } => "TU_ERR_201",
            Self::ConservationViolation { .. } => "TU_ERR_300",
            Self::UnsettledBalance { .. } => "TU_ERR_301",
            Self::Internal(_) => "TU_ERR_900",
            Self::Serialization(_) => "TU_ERR_901",
            Self::Configuration(_) => "TU_ERR_902",
            Self::Storage(_) => "TU_ERR_903",
            Self::Io(_) => "TU_ERR_904",
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TallyError>;

// Conversion from std::io::Error
impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
