//! Group snapshots on disk and the plain-text settlement report.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tallyup_types::{Expense, GroupId, Member, Result, SettlementResult};

use crate::memory::InMemoryStore;

/// Members and expenses of one group, as exported from the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl GroupSnapshot {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Load the snapshot into a fresh store under `group`.
    ///
    /// Expense ids and dates from the snapshot are kept; expenses without an
    /// id get one assigned.
    pub fn into_store(self, group: GroupId, name: &str) -> Result<InMemoryStore> {
        let store = InMemoryStore::new();
        store.add_group(group, name)?;
        for member in self.members {
            store.add_member(group, member)?;
        }
        for expense in self.expenses {
            store.record_expense(group, expense)?;
        }
        Ok(store)
    }
}

/// Human-readable settlement report. Renders through [`fmt::Display`].
#[derive(Debug, Clone, Copy)]
pub struct SettlementReport<'a>(pub &'a SettlementResult);

impl fmt::Display for SettlementReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "=== SETTLEMENT CALCULATION ===\n")?;
        writeln!(f, "Total Expenses: {}", result.total_expenses.round_dp(2))?;
        writeln!(f, "Per Person Share: {}", result.per_person_share.round_dp(2))?;

        writeln!(f, "\n=== BALANCES ===")?;
        for b in &result.balances {
            writeln!(f, "{}:", b.name)?;
            writeln!(f, "  Paid: {}", b.paid.round_dp(2))?;
            writeln!(f, "  Share: {}", b.share.round_dp(2))?;
            writeln!(f, "  Balance: {}", b.balance.round_dp(2))?;
        }

        writeln!(f, "\n=== SETTLEMENTS ===")?;
        if result.settlements.is_empty() {
            writeln!(f, "All settled up.")?;
        }
        for t in &result.settlements {
            writeln!(f, "{t}")?;
        }
        if result.has_unattributed() {
            writeln!(
                f,
                "\nNote: {} was paid by people no longer in the group.",
                result.unattributed_paid.round_dp(2)
            )?;
        }
        Ok(())
    }
}

/// Render `result` as a human-readable report.
#[must_use]
pub fn render_report(result: &SettlementResult) -> String {
    SettlementReport(result).to_string()
}
