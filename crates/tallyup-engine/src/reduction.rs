//! Greedy largest-first debt reduction.
//!
//! Algorithm:
//! 1. Creditors (`balance > ε`) sorted descending, debtors (`balance < -ε`)
//!    sorted ascending, both with a stable sort so equal balances keep
//!    input order
//! 2. Walk both lists with one cursor each, starting from the largest
//!    magnitudes
//! 3. Each step moves `min(creditor, |debtor|)` from the debtor to the
//!    creditor; amounts above ε are emitted, rounded to the configured
//!    scale (midpoint away from zero)
//! 4. A cursor advances once its member is within ε of zero
//!
//! Working balances are exact and unrounded. Each emitting step drives at
//! least one side to exactly zero, so the loop runs at most
//! `creditors + debtors` times. Residue within ε is discarded.
//!
//! The result is deterministic for a fixed input order but not globally
//! minimal in transfer count.

use rust_decimal::{Decimal, RoundingStrategy};
use tallyup_types::{Balance, EngineConfig, Transfer};

use crate::observer::{NoopObserver, SettlementObserver};

/// A member's balance while it is being paid down.
struct Working<'a> {
    balance: &'a Balance,
    remaining: Decimal,
}

impl<'a> Working<'a> {
    fn new(balance: &'a Balance) -> Self {
        Self {
            balance,
            remaining: balance.balance,
        }
    }
}

/// Settle `balances` with the default configuration.
///
/// The caller's balances are only read; the reduction works on its own
/// copies of the amounts.
#[must_use]
pub fn calculate_settlements(balances: &[Balance]) -> Vec<Transfer> {
    reduce_balances(balances, &EngineConfig::default(), &mut NoopObserver)
}

/// Settle `balances` under `config`, reporting each transfer to `observer`.
#[must_use]
pub fn reduce_balances(
    balances: &[Balance],
    config: &EngineConfig,
    observer: &mut dyn SettlementObserver,
) -> Vec<Transfer> {
    let epsilon = config.epsilon;

    let mut creditors: Vec<Working<'_>> = balances
        .iter()
        .filter(|b| b.is_creditor(epsilon))
        .map(Working::new)
        .collect();
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut debtors: Vec<Working<'_>> = balances
        .iter()
        .filter(|b| b.is_debtor(epsilon))
        .map(Working::new)
        .collect();
    debtors.sort_by(|a, b| a.remaining.cmp(&b.remaining));

    let mut transfers = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < creditors.len() && j < debtors.len() {
        let creditor = &mut creditors[i];
        let debtor = &mut debtors[j];
        let amount = creditor.remaining.min(-debtor.remaining);

        if amount > epsilon {
            let transfer = Transfer {
                from: debtor.balance.user_id,
                from_name: debtor.balance.name.clone(),
                to: creditor.balance.user_id,
                to_name: creditor.balance.name.clone(),
                amount: amount
                    .round_dp_with_strategy(config.amount_scale, RoundingStrategy::MidpointAwayFromZero),
            };
            creditor.remaining -= amount;
            debtor.remaining += amount;

            observer.on_transfer(&transfer);
            transfers.push(transfer);
        }

        // "Within ε" includes ε itself: a remainder of exactly ε is neither a
        // creditor nor a debtor and could never be paid down.
        if creditor.remaining.abs() <= epsilon {
            i += 1;
        }
        if debtor.remaining.abs() <= epsilon {
            j += 1;
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use tallyup_types::{Member, UserId};

    fn bal(id: u64, name: &str, value: Decimal) -> Balance {
        Balance {
            balance: value,
            ..Balance::for_member(&Member::dummy(id, name))
        }
    }

    fn dec(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn two_party_settlement() {
        let balances = vec![bal(1, "Alice", dec(50)), bal(2, "Bob", dec(-50))];
        let transfers = calculate_settlements(&balances);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].from, UserId(2));
        assert_eq!(transfers[0].from_name, "Bob");
        assert_eq!(transfers[0].to, UserId(1));
        assert_eq!(transfers[0].to_name, "Alice");
        assert_eq!(transfers[0].amount, dec(50));
    }

    #[test]
    fn caller_balances_untouched() {
        let balances = vec![bal(1, "Alice", dec(50)), bal(2, "Bob", dec(-50))];
        let before = balances.clone();
        let _ = calculate_settlements(&balances);
        assert_eq!(balances, before);
    }

    #[test]
    fn largest_first_matching() {
        // Creditors: C +70, A +30. Debtors: B -60, D -40.
        let balances = vec![
            bal(1, "A", dec(30)),
            bal(2, "B", dec(-60)),
            bal(3, "C", dec(70)),
            bal(4, "D", dec(-40)),
        ];
        let transfers = calculate_settlements(&balances);
        let summary: Vec<(u64, u64, Decimal)> = transfers
            .iter()
            .map(|t| (t.from.0, t.to.0, t.amount))
            .collect();
        assert_eq!(
            summary,
            vec![(2, 3, dec(60)), (4, 3, dec(10)), (4, 1, dec(30))]
        );
    }

    #[test]
    fn equal_balances_keep_input_order() {
        let balances = vec![
            bal(1, "A", dec(100)),
            bal(5, "E", dec(-50)),
            bal(3, "C", dec(-50)),
        ];
        let transfers = calculate_settlements(&balances);
        assert_eq!(transfers[0].from, UserId(5));
        assert_eq!(transfers[1].from, UserId(3));
    }

    #[test]
    fn sub_epsilon_balances_ignored() {
        let balances = vec![
            bal(1, "A", Decimal::new(1, 2)),
            bal(2, "B", Decimal::new(-1, 2)),
        ];
        assert!(calculate_settlements(&balances).is_empty());
    }

    #[test]
    fn amounts_rounded_to_cents() {
        let third = dec(100) / dec(3);
        let balances = vec![
            bal(1, "A", dec(100) - third),
            bal(2, "B", -third),
            bal(3, "C", -third),
        ];
        let transfers = calculate_settlements(&balances);
        assert_eq!(transfers.len(), 2);
        for t in &transfers {
            assert_eq!(t.amount, Decimal::new(3333, 2));
            assert_eq!(t.to, UserId(1));
        }
    }

    #[test]
    fn midpoint_rounds_away_from_zero() {
        let balances = vec![
            bal(1, "A", Decimal::new(10005, 3)),
            bal(2, "B", Decimal::new(-10005, 3)),
        ];
        let transfers = calculate_settlements(&balances);
        assert_eq!(transfers[0].amount, Decimal::new(1001, 2));
    }

    #[test]
    fn remainder_of_exactly_epsilon_terminates() {
        // After 10.00 moves, A keeps exactly 0.01: neither side can pay it
        // down, and the loop must still finish.
        let balances = vec![
            bal(1, "A", Decimal::new(1001, 2)),
            bal(2, "B", dec(-10)),
            bal(3, "C", Decimal::new(-1, 2)),
        ];
        let transfers = calculate_settlements(&balances);
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].amount, dec(10));
    }

    #[test]
    fn observer_sees_each_transfer() {
        let balances = vec![
            bal(1, "A", dec(200)),
            bal(2, "B", dec(-100)),
            bal(3, "C", dec(-100)),
        ];
        let mut obs = crate::RecordingObserver::new();
        let transfers = reduce_balances(&balances, &EngineConfig::default(), &mut obs);
        let seen: Vec<Transfer> = obs.transfers().into_iter().cloned().collect();
        assert_eq!(seen, transfers);
    }
}
