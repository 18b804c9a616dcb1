//! Diagnostic hooks into a settlement computation.
//!
//! The engine reports every intermediate step (attributed expenses,
//! orphaned expenses, computed balances, emitted transfers) to a
//! [`SettlementObserver`]. All hooks default to no-ops, so the engine stays a
//! pure function unless a caller opts in.

use rust_decimal::Decimal;
use tallyup_types::{Balance, Expense, Member, Transfer};

/// Receives intermediate results of a settlement computation.
pub trait SettlementObserver {
    /// An expense was added to its payer's `paid`.
    fn on_expense_attributed(&mut self, _expense: &Expense, _payer: &Member) {}

    /// An expense's payer is not a member; its amount reached nobody's `paid`.
    fn on_orphaned_expense(&mut self, _expense: &Expense) {}

    /// Totals are known.
    fn on_share_computed(&mut self, _total_expenses: Decimal, _per_person_share: Decimal) {}

    /// A member's final balance was computed.
    fn on_balance(&mut self, _balance: &Balance) {}

    /// A settlement transfer was emitted.
    fn on_transfer(&mut self, _transfer: &Transfer) {}

    /// The member list was empty; the zero result is returned.
    fn on_empty_group(&mut self, _expense_count: usize) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SettlementObserver for NoopObserver {}

/// Forwards every event to `tracing` at debug level (warn for orphans).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl SettlementObserver for TracingObserver {
    fn on_expense_attributed(&mut self, expense: &Expense, payer: &Member) {
        tracing::debug!(
            expense = ?expense.id,
            payer = %payer.user_id,
            amount = %expense.amount,
            "Expense attributed"
        );
    }

    fn on_orphaned_expense(&mut self, expense: &Expense) {
        tracing::warn!(
            expense = ?expense.id,
            payer = %expense.paid_by_id,
            amount = %expense.amount,
            "Expense payer is not a group member"
        );
    }

    fn on_share_computed(&mut self, total_expenses: Decimal, per_person_share: Decimal) {
        tracing::debug!(
            total = %total_expenses,
            per_person = %per_person_share,
            "Shares computed"
        );
    }

    fn on_balance(&mut self, balance: &Balance) {
        tracing::debug!(
            user = %balance.user_id,
            paid = %balance.paid,
            share = %balance.share,
            balance = %balance.balance,
            "Member balance"
        );
    }

    fn on_transfer(&mut self, transfer: &Transfer) {
        tracing::debug!(
            from = %transfer.from,
            to = %transfer.to,
            amount = %transfer.amount,
            "Settlement transfer"
        );
    }

    fn on_empty_group(&mut self, expense_count: usize) {
        tracing::debug!(expenses = expense_count, "Group has no members");
    }
}

/// One event captured by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Attributed(Expense),
    Orphaned(Expense),
    Shares { total: Decimal, per_person: Decimal },
    Balance(Balance),
    Transfer(Transfer),
    EmptyGroup { expenses: usize },
}

/// Keeps every event in order. Useful in tests and audits.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    pub events: Vec<ObservedEvent>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expenses reported as orphaned, in input order.
    #[must_use]
    pub fn orphans(&self) -> Vec<&Expense> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Orphaned(expense) => Some(expense),
                _ => None,
            })
            .collect()
    }

    /// Transfers in emission order.
    #[must_use]
    pub fn transfers(&self) -> Vec<&Transfer> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Transfer(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

impl SettlementObserver for RecordingObserver {
    fn on_expense_attributed(&mut self, expense: &Expense, _payer: &Member) {
        self.events.push(ObservedEvent::Attributed(expense.clone()));
    }

    fn on_orphaned_expense(&mut self, expense: &Expense) {
        self.events.push(ObservedEvent::Orphaned(expense.clone()));
    }

    fn on_share_computed(&mut self, total_expenses: Decimal, per_person_share: Decimal) {
        self.events.push(ObservedEvent::Shares {
            total: total_expenses,
            per_person: per_person_share,
        });
    }

    fn on_balance(&mut self, balance: &Balance) {
        self.events.push(ObservedEvent::Balance(balance.clone()));
    }

    fn on_transfer(&mut self, transfer: &Transfer) {
        self.events.push(ObservedEvent::Transfer(transfer.clone()));
    }

    fn on_empty_group(&mut self, expense_count: usize) {
        self.events.push(ObservedEvent::EmptyGroup {
            expenses: expense_count,
        });
    }
}
