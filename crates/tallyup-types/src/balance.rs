//! Per-member balance produced by the settlement engine.
//!
//! `balance > 0` means the member is a net creditor (owed money);
//! `balance < 0` means a net debtor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Member, UserId};

/// Net financial position of one group member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    /// Sum of the expenses this member paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub paid: Decimal,
    /// What this member should have paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub share: Decimal,
    /// `paid - share`.
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Balance {
    /// A zero balance for `member`.
    #[must_use]
    pub fn for_member(member: &Member) -> Self {
        Self {
            user_id: member.user_id,
            name: member.name.clone(),
            email: member.email.clone(),
            paid: Decimal::ZERO,
            share: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Owed more than `epsilon`.
    #[must_use]
    pub fn is_creditor(&self, epsilon: Decimal) -> bool {
        self.balance > epsilon
    }

    /// Owes more than `epsilon`.
    #[must_use]
    pub fn is_debtor(&self, epsilon: Decimal) -> bool {
        self.balance < -epsilon
    }

    #[must_use]
    pub fn is_settled(&self, epsilon: Decimal) -> bool {
        !self.is_creditor(epsilon) && !self.is_debtor(epsilon)
    }
}
