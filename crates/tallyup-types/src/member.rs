//! Group member model.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// One participant whose balance is tracked in a settlement.
///
/// Supplied by the membership directory; immutable for the duration of a
/// single settlement computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Stable numeric identity.
    #[serde(alias = "user_id")]
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

impl Member {
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> (#{})", self.name, self.email, self.user_id)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Member {
    /// A member whose email is derived from the name.
    pub fn dummy(user_id: u64, name: &str) -> Self {
        Self::new(
            UserId(user_id),
            name,
            format!("{}@example.com", name.to_lowercase()),
        )
    }
}
