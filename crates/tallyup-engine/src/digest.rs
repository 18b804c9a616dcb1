//! Deterministic fingerprint of a settlement result.
//!
//! Two computations over the same members and expenses (in the same order)
//! must produce byte-identical results. The digest makes that checkable
//! without comparing full payloads, and doubles as an HTTP `ETag`.

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use tallyup_types::SettlementResult;

/// Canonical text for a decimal: trailing zeros removed, so `50` and
/// `50.00` hash the same.
fn canonical(value: Decimal) -> String {
    value.normalize().to_string()
}

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Compute the SHA-256 digest over a settlement result.
///
/// Covers every serialized field, in order: totals, every balance (id,
/// name, email, paid, share, balance) and every transfer (from, from name,
/// to, to name, amount). Strings are length-prefixed.
#[must_use]
pub fn settlement_digest(result: &SettlementResult) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"tallyup:settlement:v1:");
    hasher.update(canonical(result.total_expenses).as_bytes());
    hasher.update(b"|");
    hasher.update(canonical(result.per_person_share).as_bytes());

    hasher.update((result.balances.len() as u64).to_le_bytes());
    for b in &result.balances {
        hasher.update(b.user_id.0.to_le_bytes());
        update_str(&mut hasher, &b.name);
        update_str(&mut hasher, &b.email);
        hasher.update(canonical(b.paid).as_bytes());
        hasher.update(b"|");
        hasher.update(canonical(b.share).as_bytes());
        hasher.update(b"|");
        hasher.update(canonical(b.balance).as_bytes());
    }

    hasher.update((result.settlements.len() as u64).to_le_bytes());
    for t in &result.settlements {
        hasher.update(t.from.0.to_le_bytes());
        update_str(&mut hasher, &t.from_name);
        hasher.update(t.to.0.to_le_bytes());
        update_str(&mut hasher, &t.to_name);
        hasher.update(canonical(t.amount).as_bytes());
    }

    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hex-encoded [`settlement_digest`].
#[must_use]
pub fn digest_hex(result: &SettlementResult) -> String {
    hex::encode(settlement_digest(result))
}

/// Recompute the digest and compare with `expected`.
#[must_use]
pub fn verify_digest(result: &SettlementResult, expected: &[u8; 32]) -> bool {
    settlement_digest(result) == *expected
}
