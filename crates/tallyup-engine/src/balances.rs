//! Group balance computation.
//!
//! Given the members of a group and its expenses, compute what each member
//! paid, what each member should have paid, and the net difference; then
//! hand the balances to the debt reduction in [`crate::reduction`].
//!
//! Under the default [`SplitPolicy::Equal`] every member owes
//! `total / member count`. An expense paid by someone outside the member
//! list still counts toward the total, so under [`OrphanPolicy::Absorb`]
//! the balances sum to minus the orphaned amount rather than to zero.
//!
//! Inputs are trusted: callers bound amounts to a currency range first, as
//! sums beyond the `Decimal` range overflow.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tallyup_types::{
    Balance, EngineConfig, Expense, Member, OrphanPolicy, Result, SettlementResult, SplitPolicy,
    TallyError, Transfer, UserId,
};

use crate::observer::{NoopObserver, SettlementObserver};
use crate::reduction::reduce_balances;

/// Settle a group with the default configuration: equal split, orphaned
/// expenses absorbed into the total.
#[must_use]
pub fn calculate_group_balances(members: &[Member], expenses: &[Expense]) -> SettlementResult {
    compute(members, expenses, &EngineConfig::default(), &mut NoopObserver)
}

/// Configured settlement engine.
///
/// Holds no state between calls; every computation is a pure function of
/// its inputs and the configuration.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute balances and settlements for one group.
    ///
    /// # Errors
    /// - `OrphanedExpense` under [`OrphanPolicy::Reject`]
    /// - `InvalidSplit` under [`SplitPolicy::Recorded`] when a recorded split
    ///   amount is negative
    pub fn calculate_group_balances(
        &self,
        members: &[Member],
        expenses: &[Expense],
    ) -> Result<SettlementResult> {
        self.calculate_group_balances_observed(members, expenses, &mut NoopObserver)
    }

    /// Same as [`Self::calculate_group_balances`], reporting every
    /// intermediate step to `observer`.
    pub fn calculate_group_balances_observed(
        &self,
        members: &[Member],
        expenses: &[Expense],
        observer: &mut dyn SettlementObserver,
    ) -> Result<SettlementResult> {
        self.enforce_policies(members, expenses)?;
        Ok(compute(members, expenses, &self.config, observer))
    }

    /// Reduce precomputed balances to settlement transfers.
    #[must_use]
    pub fn calculate_settlements(&self, balances: &[Balance]) -> Vec<Transfer> {
        reduce_balances(balances, &self.config, &mut NoopObserver)
    }

    fn enforce_policies(&self, members: &[Member], expenses: &[Expense]) -> Result<()> {
        if self.config.orphan_policy == OrphanPolicy::Reject {
            if let Some(orphan) = expenses
                .iter()
                .find(|e| !members.iter().any(|m| m.user_id == e.paid_by_id))
            {
                return Err(TallyError::OrphanedExpense {
                    expense: orphan.id,
                    payer: orphan.paid_by_id,
                });
            }
        }

        if self.config.split_policy == SplitPolicy::Recorded {
            for expense in expenses {
                if let Some(split) = expense.splits.iter().find(|s| s.amount < Decimal::ZERO) {
                    return Err(TallyError::InvalidSplit {
                        reason: format!(
                            "negative split {} for user {} on {expense}",
                            split.amount, split.user_id
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

/// The computation proper. Infallible: policy violations are rejected
/// before this runs.
fn compute(
    members: &[Member],
    expenses: &[Expense],
    config: &EngineConfig,
    observer: &mut dyn SettlementObserver,
) -> SettlementResult {
    if members.is_empty() {
        observer.on_empty_group(expenses.len());
        return SettlementResult::empty();
    }

    // First occurrence wins if a member is listed twice.
    let mut index: HashMap<UserId, usize> = HashMap::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        index.entry(member.user_id).or_insert(i);
    }

    let mut balances: Vec<Balance> = members.iter().map(Balance::for_member).collect();
    let mut total_expenses = Decimal::ZERO;
    let mut unattributed_paid = Decimal::ZERO;

    for expense in expenses {
        total_expenses += expense.amount;
        match index.get(&expense.paid_by_id) {
            Some(&i) => {
                balances[i].paid += expense.amount;
                observer.on_expense_attributed(expense, &members[i]);
            }
            None => {
                unattributed_paid += expense.amount;
                observer.on_orphaned_expense(expense);
            }
        }
    }

    let member_count = Decimal::from(members.len());
    let per_person_share = total_expenses / member_count;
    observer.on_share_computed(total_expenses, per_person_share);

    let unattributed_share = match config.split_policy {
        SplitPolicy::Equal => {
            for balance in &mut balances {
                balance.share = per_person_share;
            }
            Decimal::ZERO
        }
        SplitPolicy::Recorded => {
            charge_recorded_splits(&mut balances, &index, expenses, member_count, config.epsilon)
        }
    };

    for balance in &mut balances {
        balance.balance = balance.paid - balance.share;
        observer.on_balance(balance);
    }

    let settlements = reduce_balances(&balances, config, observer);

    SettlementResult {
        balances,
        settlements,
        total_expenses,
        per_person_share,
        unattributed_paid,
        unattributed_share,
    }
}

/// Charge each member per the recorded splits, falling back to an equal
/// split for expenses without complete splits. Returns the amount charged
/// to non-members.
fn charge_recorded_splits(
    balances: &mut [Balance],
    index: &HashMap<UserId, usize>,
    expenses: &[Expense],
    member_count: Decimal,
    epsilon: Decimal,
) -> Decimal {
    let mut unattributed = Decimal::ZERO;
    let mut equal_pool = Decimal::ZERO;

    for expense in expenses {
        if expense.has_complete_splits(epsilon) {
            for split in &expense.splits {
                match index.get(&split.user_id) {
                    Some(&i) => balances[i].share += split.amount,
                    None => unattributed += split.amount,
                }
            }
            // Sub-ε rounding gap between the splits and the amount is
            // charged to the payer.
            let gap = expense.amount - expense.split_total();
            if !gap.is_zero() {
                match index.get(&expense.paid_by_id) {
                    Some(&i) => balances[i].share += gap,
                    None => unattributed += gap,
                }
            }
        } else {
            equal_pool += expense.amount;
        }
    }

    let equal_share = equal_pool / member_count;
    for balance in balances.iter_mut() {
        balance.share += equal_share;
    }

    unattributed
}
