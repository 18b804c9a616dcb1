//! Ledger validation at the API boundary.
//!
//! The engine trusts its inputs. Anything loaded from a collaborator is
//! checked here first so bad data surfaces as a typed error instead of a
//! silently skewed settlement.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tallyup_types::{EngineConfig, Expense, Member, Result, SplitPolicy, TallyError, constants};

/// Reject member lists that name the same user twice.
pub fn check_members(members: &[Member]) -> Result<()> {
    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if !seen.insert(member.user_id) {
            return Err(TallyError::DuplicateMember(member.user_id));
        }
    }
    Ok(())
}

/// Reject negative amounts, amounts above
/// [`MAX_EXPENSE_AMOUNT`](constants::MAX_EXPENSE_AMOUNT) and amounts finer
/// than the configured scale.
///
/// Recorded splits are only read under [`SplitPolicy::Recorded`], so they are
/// only checked then.
pub fn check_expense(expense: &Expense, config: &EngineConfig) -> Result<()> {
    if expense.amount < Decimal::ZERO {
        return Err(TallyError::InvalidExpense {
            reason: format!("{expense} has a negative amount"),
        });
    }
    if expense.amount > constants::MAX_EXPENSE_AMOUNT {
        return Err(TallyError::InvalidExpense {
            reason: format!(
                "{expense} exceeds the maximum amount {}",
                constants::MAX_EXPENSE_AMOUNT
            ),
        });
    }
    if expense.amount.normalize().scale() > config.amount_scale {
        return Err(TallyError::InvalidExpense {
            reason: format!(
                "{expense} has more than {} decimal places",
                config.amount_scale
            ),
        });
    }
    if config.split_policy != SplitPolicy::Recorded {
        return Ok(());
    }
    for split in &expense.splits {
        if split.amount < Decimal::ZERO {
            return Err(TallyError::InvalidSplit {
                reason: format!("negative split for user {} on {expense}", split.user_id),
            });
        }
        if split.amount > constants::MAX_EXPENSE_AMOUNT {
            return Err(TallyError::InvalidSplit {
                reason: format!("split for user {} on {expense} is too large", split.user_id),
            });
        }
    }
    Ok(())
}

/// Validate a full group snapshot.
pub fn check_ledger(members: &[Member], expenses: &[Expense], config: &EngineConfig) -> Result<()> {
    check_members(members)?;
    expenses
        .iter()
        .try_for_each(|expense| check_expense(expense, config))
}
