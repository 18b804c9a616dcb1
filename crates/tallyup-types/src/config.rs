//! Configuration types for the settlement engine.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, Result, TallyError};

/// How each member's share of the group's expenses is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Every member owes `total / member count`. Recorded splits are
    /// treated as metadata.
    #[default]
    Equal,
    /// Expenses with complete recorded splits charge each member their
    /// recorded amount; the rest are split equally.
    Recorded,
}

/// What to do with an expense whose payer is not a group member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Count it in `totalExpenses` but in nobody's `paid`.
    #[default]
    Absorb,
    /// Fail the computation with `OrphanedExpense`.
    Reject,
}

impl std::fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equal => write!(f, "equal"),
            Self::Recorded => write!(f, "recorded"),
        }
    }
}

impl std::fmt::Display for OrphanPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absorb => write!(f, "absorb"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Settlement engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Balances within this distance of zero count as settled.
    pub epsilon: Decimal,
    /// Decimal places of emitted transfer amounts.
    pub amount_scale: u32,
    pub split_policy: SplitPolicy,
    pub orphan_policy: OrphanPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: constants::DEFAULT_EPSILON,
            amount_scale: constants::DEFAULT_AMOUNT_SCALE,
            split_policy: SplitPolicy::default(),
            orphan_policy: OrphanPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TallyError::Configuration(format!("invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Reject values the engine cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.epsilon < Decimal::ZERO {
            return Err(TallyError::Configuration(format!(
                "epsilon must be non-negative, got {}",
                self.epsilon
            )));
        }
        if self.amount_scale > constants::MAX_AMOUNT_SCALE {
            return Err(TallyError::Configuration(format!(
                "amountScale must be at most {}, got {}",
                constants::MAX_AMOUNT_SCALE,
                self.amount_scale
            )));
        }
        Ok(())
    }

    /// Half of one unit at `amount_scale`: the most a single rounded
    /// transfer can differ from the exact amount it settles.
    #[must_use]
    pub fn half_unit(&self) -> Decimal {
        Decimal::new(5, self.amount_scale + 1)
    }
}
