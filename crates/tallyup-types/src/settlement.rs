//! Settlement output: recommended transfers and the full result envelope.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Balance, UserId};

/// One recommended payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// Debtor.
    pub from: UserId,
    pub from_name: String,
    /// Creditor.
    pub to: UserId,
    pub to_name: String,
    /// Positive amount, rounded to the configured scale.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl std::fmt::Display for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}: {}", self.from_name, self.to_name, self.amount)
    }
}

/// Result of settling one group.
///
/// Serializes to the response body `{ balances, settlements, totalExpenses,
/// perPersonShare }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    /// One entry per member, in input member order.
    pub balances: Vec<Balance>,
    pub settlements: Vec<Transfer>,
    /// Sum of every expense amount, including orphaned ones.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_expenses: Decimal,
    /// `total_expenses / member count`.
    #[serde(with = "rust_decimal::serde::float")]
    pub per_person_share: Decimal,
    /// Amount paid by non-members: in `total_expenses`, in nobody's `paid`.
    #[serde(skip)]
    pub unattributed_paid: Decimal,
    /// Recorded split amounts charged to non-members: in nobody's `share`.
    #[serde(skip)]
    pub unattributed_share: Decimal,
}

impl SettlementResult {
    /// The well-defined result for a group with no members.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            balances: Vec::new(),
            settlements: Vec::new(),
            total_expenses: Decimal::ZERO,
            per_person_share: Decimal::ZERO,
            unattributed_paid: Decimal::ZERO,
            unattributed_share: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn balance_of(&self, user_id: UserId) -> Option<&Balance> {
        self.balances.iter().find(|b| b.user_id == user_id)
    }

    /// Σ balance over all members.
    #[must_use]
    pub fn net_balance_sum(&self) -> Decimal {
        self.balances.iter().map(|b| b.balance).sum()
    }

    /// Σ transfer amounts.
    #[must_use]
    pub fn settlement_volume(&self) -> Decimal {
        self.settlements.iter().map(|t| t.amount).sum()
    }

    /// Whether any expense or split could not be attributed to a member.
    #[must_use]
    pub fn has_unattributed(&self) -> bool {
        !self.unattributed_paid.is_zero() || !self.unattributed_share.is_zero()
    }
}

impl Default for SettlementResult {
    fn default() -> Self {
        Self::empty()
    }
}
