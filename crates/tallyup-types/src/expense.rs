//! Expense model as recorded by the expense ledger.
//!
//! The settlement engine only needs the payer and the amount. The optional
//! fields mirror what the ledger stores alongside them and are carried
//! through untouched, except for [`Expense::splits`], which the engine reads
//! under [`SplitPolicy::Recorded`](crate::SplitPolicy::Recorded).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ExpenseId, UserId};

/// An explicit per-member share of one expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSplit {
    #[serde(alias = "user_id")]
    pub user_id: UserId,
    pub amount: Decimal,
}

impl ExpenseSplit {
    #[must_use]
    pub fn new(user_id: UserId, amount: Decimal) -> Self {
        Self { user_id, amount }
    }
}

/// A shared expense paid by one member of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Ledger identity, if the expense has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ExpenseId>,
    /// Who paid. Expected to be a member of the group being settled.
    #[serde(alias = "paidBy", alias = "paid_by")]
    pub paid_by_id: UserId,
    /// Amount paid, 2-decimal currency semantics.
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "expense_date", skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<NaiveDate>,
    /// Recorded per-member shares. Empty means "split equally".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub splits: Vec<ExpenseSplit>,
}

impl Expense {
    /// A bare expense: payer and amount only.
    #[must_use]
    pub fn new(paid_by_id: UserId, amount: Decimal) -> Self {
        Self {
            id: None,
            paid_by_id,
            amount,
            description: None,
            expense_date: None,
            splits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.expense_date = Some(date);
        self
    }

    #[must_use]
    pub fn with_splits(mut self, splits: Vec<ExpenseSplit>) -> Self {
        self.splits = splits;
        self
    }

    /// Sum of all recorded split amounts.
    #[must_use]
    pub fn split_total(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Whether the recorded splits are complete enough to replace the
    /// equal split: non-empty and summing to `amount` within `epsilon`.
    #[must_use]
    pub fn has_complete_splits(&self, epsilon: Decimal) -> bool {
        !self.splits.is_empty() && (self.split_total() - self.amount).abs() <= epsilon
    }
}

impl std::fmt::Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{id} paid by {}: {}", self.paid_by_id, self.amount),
            None => write!(f, "expense paid by {}: {}", self.paid_by_id, self.amount),
        }
    }
}
