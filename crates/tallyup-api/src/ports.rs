//! Collaborator contracts consumed by the settlement handler.
//!
//! Group membership and the expense ledger are owned by the surrounding
//! application. The handler only needs these read-side queries.

use tallyup_types::{Expense, GroupId, Member, Result, UserId};

/// Read access to group membership.
pub trait MemberDirectory: Send + Sync {
    /// All current members of `group`, in a stable order.
    ///
    /// # Errors
    /// `GroupNotFound` if the group does not exist.
    fn group_members(&self, group: GroupId) -> Result<Vec<Member>>;

    /// Whether `user` currently belongs to `group`.
    fn is_member(&self, group: GroupId, user: UserId) -> Result<bool>;
}

/// Read access to recorded expenses.
pub trait ExpenseLedger: Send + Sync {
    /// Every expense recorded against `group`.
    fn group_expenses(&self, group: GroupId) -> Result<Vec<Expense>>;
}
