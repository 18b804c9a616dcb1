//! JSON response envelope and error → status mapping.

use serde::Serialize;
use tallyup_types::TallyError;

pub const MSG_NOT_MEMBER: &str = "You are not a member of this group";
pub const MSG_GROUP_NOT_FOUND: &str = "Group not found";
pub const MSG_MEMBERSHIP_CHECK_FAILED: &str = "Error checking group membership";
pub const MSG_SETTLEMENT_FAILED: &str = "Failed to calculate settlement";
pub const MSG_ROUTE_NOT_FOUND: &str = "Route not found";

/// `{ success, data }` on success, `{ success, message, error? }` on failure.
///
/// The HTTP status and `ETag` travel alongside the body and are not
/// serialized into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    pub status: u16,
    #[serde(skip)]
    pub etag: Option<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// 200 with `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            etag: None,
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// A failure body with no error detail.
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            etag: None,
            success: false,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    /// Map an engine or store error onto a failure response.
    ///
    /// Access errors carry only a message. Everything else also reports the
    /// error text in `error`.
    pub fn from_error(err: &TallyError) -> Self {
        match err {
            TallyError::NotGroupMember { .. } => Self::failure(403, MSG_NOT_MEMBER),
            TallyError::GroupNotFound(_) => Self::failure(404, MSG_GROUP_NOT_FOUND),
            _ => Self {
                error: Some(err.to_string()),
                ..Self::failure(status_for(err), MSG_SETTLEMENT_FAILED)
            },
        }
    }

    #[must_use]
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// HTTP status for `err`.
#[must_use]
pub fn status_for(err: &TallyError) -> u16 {
    match err {
        TallyError::NotGroupMember { .. } => 403,
        TallyError::GroupNotFound(_) => 404,
        TallyError::InvalidExpense { .. }
        | TallyError::OrphanedExpense { .. }
        | TallyError::InvalidSplit { .. }
        | TallyError::DuplicateMember(_) => 422,
        _ => 500,
    }
}
