//! In-memory implementation of the collaborator ports.
//!
//! Backs tests, demos and the report binary. Maps are guarded by
//! `RwLock`s so one store can be shared between handler threads; a reader
//! sees a snapshot of whatever was committed before it took the lock.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tallyup_types::{
    Expense, ExpenseId, ExpenseSplit, GroupId, Member, Result, TallyError, UserId,
};

use crate::ports::{ExpenseLedger, MemberDirectory};

#[derive(Debug, Clone)]
struct GroupRecord {
    name: String,
    members: Vec<Member>,
}

#[derive(Debug, Clone)]
struct StoredExpense {
    group: GroupId,
    /// Insertion sequence, stands in for `created_at`.
    seq: u64,
    expense: Expense,
}

#[derive(Debug, Default)]
struct ExpenseTable {
    rows: Vec<StoredExpense>,
    /// Highest id handed out or imported.
    last_id: u64,
    last_seq: u64,
}

/// Groups, memberships and expenses held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    groups: RwLock<HashMap<GroupId, GroupRecord>>,
    expenses: RwLock<ExpenseTable>,
}

fn poisoned<T>(_: T) -> TallyError {
    TallyError::Storage("in-memory store lock poisoned".into())
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_groups(&self) -> Result<RwLockReadGuard<'_, HashMap<GroupId, GroupRecord>>> {
        self.groups.read().map_err(poisoned)
    }

    fn write_groups(&self) -> Result<RwLockWriteGuard<'_, HashMap<GroupId, GroupRecord>>> {
        self.groups.write().map_err(poisoned)
    }

    /// Create an empty group. Re-adding an existing id renames it and keeps
    /// its members.
    pub fn add_group(&self, group: GroupId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let mut groups = self.write_groups()?;
        groups
            .entry(group)
            .and_modify(|g| g.name.clone_from(&name))
            .or_insert_with(|| GroupRecord {
                name,
                members: Vec::new(),
            });
        Ok(())
    }

    #[must_use]
    pub fn group_name(&self, group: GroupId) -> Option<String> {
        self.read_groups()
            .ok()
            .and_then(|groups| groups.get(&group).map(|g| g.name.clone()))
    }

    /// Add `member` to `group`.
    ///
    /// # Errors
    /// `GroupNotFound`, or `DuplicateMember` if already a member.
    pub fn add_member(&self, group: GroupId, member: Member) -> Result<()> {
        let mut groups = self.write_groups()?;
        let record = groups
            .get_mut(&group)
            .ok_or(TallyError::GroupNotFound(group))?;
        if record.members.iter().any(|m| m.user_id == member.user_id) {
            return Err(TallyError::DuplicateMember(member.user_id));
        }
        record.members.push(member);
        Ok(())
    }

    /// Remove `user` from `group`. Their expenses stay in the ledger and
    /// become orphaned for later settlements.
    pub fn remove_member(&self, group: GroupId, user: UserId) -> Result<bool> {
        let mut groups = self.write_groups()?;
        let record = groups
            .get_mut(&group)
            .ok_or(TallyError::GroupNotFound(group))?;
        let before = record.members.len();
        record.members.retain(|m| m.user_id != user);
        Ok(record.members.len() != before)
    }

    /// Record an expense against `group` and return its id. An expense that
    /// already carries an id (imported from another ledger) keeps it; later
    /// ids are assigned past it. An expense without a date is dated today.
    ///
    /// # Errors
    /// `GroupNotFound`, or `InvalidExpense` if the carried id is taken.
    pub fn record_expense(&self, group: GroupId, mut expense: Expense) -> Result<ExpenseId> {
        if !self.read_groups()?.contains_key(&group) {
            return Err(TallyError::GroupNotFound(group));
        }
        let mut table = self.expenses.write().map_err(poisoned)?;
        let id = match expense.id {
            Some(id) if table.rows.iter().any(|r| r.expense.id == Some(id)) => {
                return Err(TallyError::InvalidExpense {
                    reason: format!("{id} is already recorded"),
                });
            }
            Some(id) => id,
            None => ExpenseId(table.last_id).next(),
        };
        table.last_id = table.last_id.max(id.0);
        table.last_seq += 1;
        let seq = table.last_seq;

        expense.id = Some(id);
        if expense.expense_date.is_none() {
            expense.expense_date = Some(Utc::now().date_naive());
        }
        table.rows.push(StoredExpense {
            group,
            seq,
            expense,
        });
        Ok(id)
    }

    /// Attach a recorded split to an existing expense.
    pub fn record_split(&self, expense: ExpenseId, split: ExpenseSplit) -> Result<()> {
        let mut table = self.expenses.write().map_err(poisoned)?;
        let row = table
            .rows
            .iter_mut()
            .find(|r| r.expense.id == Some(expense))
            .ok_or_else(|| TallyError::InvalidSplit {
                reason: format!("{expense} does not exist"),
            })?;
        row.expense.splits.push(split);
        Ok(())
    }

    /// Number of recorded expenses across all groups.
    #[must_use]
    pub fn expense_count(&self) -> usize {
        self.expenses.read().map(|t| t.rows.len()).unwrap_or(0)
    }
}

impl MemberDirectory for InMemoryStore {
    fn group_members(&self, group: GroupId) -> Result<Vec<Member>> {
        self.read_groups()?
            .get(&group)
            .map(|g| g.members.clone())
            .ok_or(TallyError::GroupNotFound(group))
    }

    fn is_member(&self, group: GroupId, user: UserId) -> Result<bool> {
        self.read_groups()?
            .get(&group)
            .map(|g| g.members.iter().any(|m| m.user_id == user))
            .ok_or(TallyError::GroupNotFound(group))
    }
}

impl ExpenseLedger for InMemoryStore {
    /// Newest first: by expense date, then by insertion.
    fn group_expenses(&self, group: GroupId) -> Result<Vec<Expense>> {
        if !self.read_groups()?.contains_key(&group) {
            return Err(TallyError::GroupNotFound(group));
        }
        let table = self.expenses.read().map_err(poisoned)?;
        let mut rows: Vec<&StoredExpense> = table.rows.iter().filter(|r| r.group == group).collect();
        rows.sort_by(|a, b| {
            b.expense
                .expense_date
                .cmp(&a.expense.expense_date)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|r| r.expense.clone()).collect())
    }
}
