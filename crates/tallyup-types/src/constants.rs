//! System-wide constants for the TallyUp settlement engine.

use rust_decimal::Decimal;

/// Balances within this distance of zero count as settled (0.01).
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places of an emitted transfer amount (currency minor units).
pub const DEFAULT_AMOUNT_SCALE: u32 = 2;

/// Largest accepted amount scale. One below the 28 places `rust_decimal`
/// can hold, so half a unit stays representable.
pub const MAX_AMOUNT_SCALE: u32 = 27;

/// Tolerance for the balance-sum conservation check (1e-9).
///
/// Equal shares are produced by exact decimal division, so the only drift
/// is the 28-digit truncation of `total / members`, multiplied by the
/// member count.
pub const BALANCE_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 9);

/// Environment variable naming an [`EngineConfig`](crate::EngineConfig) JSON file.
pub const CONFIG_ENV_VAR: &str = "TALLYUP_CONFIG";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TallyUp";

/// Largest accepted expense or split amount (99 999 999.99), the range of a
/// `DECIMAL(10,2)` ledger column. Keeps group sums far from `Decimal`
/// overflow.
pub const MAX_EXPENSE_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);
