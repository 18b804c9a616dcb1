//! Money conservation checks over a settlement result.
//!
//! Invariants:
//! ```text
//! Σ balance == unattributed_share - unattributed_paid      (± 1e-9)
//! Σ share   == total - unattributed_share                  (± 1e-9)
//! ```
//! With no orphaned expenses both unattributed amounts are zero and the
//! balances sum to zero.
//!
//! After applying every transfer, no creditor and debtor may both remain
//! beyond ε (plus half a unit of rounding per transfer touching them): the
//! reduction only stops once one side is exhausted.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tallyup_types::{
    EngineConfig, Result, SettlementResult, TallyError, UserId, constants,
};

/// Verifies a [`SettlementResult`] against the conservation invariants.
pub struct ConservationCheck {
    /// Allowed drift of the balance sum.
    tolerance: Decimal,
    epsilon: Decimal,
    /// Rounding slack allowed per transfer.
    half_unit: Decimal,
}

impl ConservationCheck {
    /// Create a checker matching `config`.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tolerance: constants::BALANCE_SUM_TOLERANCE,
            epsilon: config.epsilon,
            half_unit: config.half_unit(),
        }
    }

    /// What Σ balance must equal for `result`.
    #[must_use]
    pub fn expected_balance_sum(result: &SettlementResult) -> Decimal {
        result.unattributed_share - result.unattributed_paid
    }

    /// Σ balance matches the unattributed amounts.
    pub fn verify_balances(&self, result: &SettlementResult) -> Result<()> {
        let actual = result.net_balance_sum();
        let expected = Self::expected_balance_sum(result);
        if (actual - expected).abs() > self.tolerance {
            return Err(TallyError::ConservationViolation {
                reason: format!(
                    "balance sum {actual} != expected {expected} \
                     (unattributed paid={}, unattributed share={})",
                    result.unattributed_paid, result.unattributed_share,
                ),
            });
        }
        Ok(())
    }

    /// Σ share plus what was charged to non-members equals the total.
    ///
    /// Under the equal split this is `perPersonShare * members ≈ total`.
    pub fn verify_shares(&self, result: &SettlementResult) -> Result<()> {
        if result.balances.is_empty() {
            return Ok(());
        }
        let charged: Decimal = result.balances.iter().map(|b| b.share).sum();
        let covered = charged + result.unattributed_share;
        if (covered - result.total_expenses).abs() > self.tolerance {
            return Err(TallyError::ConservationViolation {
                reason: format!(
                    "shares cover {covered} of total {}",
                    result.total_expenses
                ),
            });
        }
        Ok(())
    }

    /// Every member's balance after applying all transfers, in member order.
    #[must_use]
    pub fn residuals(result: &SettlementResult) -> Vec<(UserId, Decimal)> {
        let mut remaining: Vec<(UserId, Decimal)> = result
            .balances
            .iter()
            .map(|b| (b.user_id, b.balance))
            .collect();
        for t in &result.settlements {
            if let Some(entry) = remaining.iter_mut().find(|(id, _)| *id == t.from) {
                entry.1 += t.amount;
            }
            if let Some(entry) = remaining.iter_mut().find(|(id, _)| *id == t.to) {
                entry.1 -= t.amount;
            }
        }
        remaining
    }

    /// Transfers are well-formed and leave no creditor/debtor pair
    /// outstanding.
    pub fn verify_settlements(&self, result: &SettlementResult) -> Result<()> {
        let mut touches: HashMap<UserId, u32> = HashMap::new();
        for t in &result.settlements {
            if t.from == t.to {
                return Err(TallyError::ConservationViolation {
                    reason: format!("self-settlement for user {}", t.from),
                });
            }
            if t.amount <= Decimal::ZERO {
                return Err(TallyError::ConservationViolation {
                    reason: format!("non-positive transfer {t}"),
                });
            }
            let debtor = result.balance_of(t.from).map(|b| b.balance);
            let creditor = result.balance_of(t.to).map(|b| b.balance);
            match (debtor, creditor) {
                (Some(d), Some(c)) if d < Decimal::ZERO && c > Decimal::ZERO => {}
                _ => {
                    return Err(TallyError::ConservationViolation {
                        reason: format!("transfer {t} does not run from a debtor to a creditor"),
                    });
                }
            }
            *touches.entry(t.from).or_insert(0) += 1;
            *touches.entry(t.to).or_insert(0) += 1;
        }

        let slack = |user: UserId| {
            self.epsilon + self.half_unit * Decimal::from(touches.get(&user).copied().unwrap_or(0))
        };
        let residuals = Self::residuals(result);
        let owed = residuals.iter().find(|(id, r)| *r > slack(*id));
        let owing = residuals.iter().find(|(id, r)| *r < -slack(*id));
        if let (Some(_), Some(&(user, residual))) = (owed, owing) {
            return Err(TallyError::UnsettledBalance { user, residual });
        }
        Ok(())
    }

    /// Run every check.
    pub fn verify(&self, result: &SettlementResult) -> Result<()> {
        self.verify_balances(result)?;
        self.verify_shares(result)?;
        self.verify_settlements(result)
    }
}

impl Default for ConservationCheck {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
