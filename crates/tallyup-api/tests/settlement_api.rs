//! Integration tests: the settlement endpoint end to end over the in-memory
//! store.

use rust_decimal::Decimal;
use serde_json::json;
use tallyup_api::{
    ApiResponse, ExpenseLedger, InMemoryStore, MemberDirectory, SettlementHandler,
    response::{MSG_MEMBERSHIP_CHECK_FAILED, MSG_SETTLEMENT_FAILED},
};
use tallyup_engine::{SettlementEngine, digest_hex};
use tallyup_types::*;

const TRIP: GroupId = GroupId(7);

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Alice, Bob and Carol; Alice paid 300, Bob paid 60.
fn trip_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.add_group(TRIP, "Manali trip").unwrap();
    for (id, name) in [(1, "Alice"), (2, "Bob"), (3, "Carol")] {
        store.add_member(TRIP, Member::dummy(id, name)).unwrap();
    }
    store
        .record_expense(TRIP, Expense::new(UserId(1), dec(300)).with_description("Hotel"))
        .unwrap();
    store
        .record_expense(TRIP, Expense::new(UserId(2), dec(60)).with_description("Fuel"))
        .unwrap();
    store
}

fn handler(store: &InMemoryStore) -> SettlementHandler<'_> {
    SettlementHandler::new(store, store, SettlementEngine::default())
}

// =============================================================================
// Success path
// =============================================================================

#[test]
fn member_gets_settlement() {
    let store = trip_store();
    let resp = handler(&store).get_group_settlement(UserId(2), TRIP);

    assert_eq!(resp.status, 200);
    assert!(resp.is_success());
    let result = resp.data.as_ref().unwrap();
    assert_eq!(result.total_expenses, dec(360));
    assert_eq!(result.per_person_share, dec(120));

    let summary: Vec<(u64, u64, Decimal)> = result
        .settlements
        .iter()
        .map(|t| (t.from.0, t.to.0, t.amount))
        .collect();
    assert_eq!(summary, vec![(3, 1, dec(120)), (2, 1, dec(60))]);
}

#[test]
fn success_body_shape() {
    let store = trip_store();
    let resp = handler(&store).get_group_settlement(UserId(1), TRIP);
    let body = serde_json::to_value(&resp).unwrap();

    assert_eq!(body["success"], json!(true));
    assert!(body.get("message").is_none());
    assert_eq!(body["data"]["totalExpenses"], json!(360.0));
    assert_eq!(body["data"]["perPersonShare"], json!(120.0));
    assert_eq!(body["data"]["balances"][0]["name"], json!("Alice"));
    assert_eq!(body["data"]["balances"][0]["balance"], json!(180.0));
    assert_eq!(body["data"]["settlements"][0]["fromName"], json!("Carol"));
    assert_eq!(
        body["data"].as_object().unwrap().len(),
        4,
        "unexpected fields in {body}"
    );
}

#[test]
fn etag_tracks_ledger_changes() {
    let store = trip_store();
    let first = handler(&store).get_group_settlement(UserId(1), TRIP);
    let again = handler(&store).get_group_settlement(UserId(3), TRIP);

    let etag = first.etag.clone().unwrap();
    assert_eq!(etag, format!("\"{}\"", digest_hex(first.data.as_ref().unwrap())));
    assert_eq!(again.etag.as_deref(), Some(etag.as_str()));

    store
        .record_expense(TRIP, Expense::new(UserId(3), dec(30)))
        .unwrap();
    let changed = handler(&store).get_group_settlement(UserId(1), TRIP);
    assert_ne!(changed.etag.as_deref(), Some(etag.as_str()));
}

#[test]
fn raw_path_dispatch() {
    let store = trip_store();
    let h = handler(&store);
    assert_eq!(h.handle_get(UserId(1), "/settlement/group/7").status, 200);

    let missing = h.handle_get(UserId(1), "/settlement/groups/7");
    assert_eq!(missing.status, 404);
    assert!(missing.data.is_none());
}

// =============================================================================
// Access control
// =============================================================================

#[test]
fn non_member_forbidden() {
    let store = trip_store();
    let resp = handler(&store).get_group_settlement(UserId(99), TRIP);

    assert_eq!(resp.status, 403);
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"success": false, "message": "You are not a member of this group"})
    );
}

#[test]
fn unknown_group_not_found() {
    let store = trip_store();
    let resp = handler(&store).get_group_settlement(UserId(1), GroupId(404));
    assert_eq!(resp.status, 404);
    assert!(!resp.is_success());

    let err = handler(&store).settle(UserId(1), GroupId(404)).unwrap_err();
    assert!(matches!(err, TallyError::GroupNotFound(GroupId(404))));
}

#[test]
fn settle_reports_typed_errors() {
    let store = trip_store();
    let err = handler(&store).settle(UserId(42), TRIP).unwrap_err();
    assert!(matches!(
        err,
        TallyError::NotGroupMember {
            group: TRIP,
            user: UserId(42)
        }
    ));
}

// =============================================================================
// Ledger data problems
// =============================================================================

#[test]
fn negative_expense_is_unprocessable() {
    let store = trip_store();
    store
        .record_expense(TRIP, Expense::new(UserId(2), dec(-10)))
        .unwrap();
    let resp = handler(&store).get_group_settlement(UserId(1), TRIP);

    assert_eq!(resp.status, 422);
    assert_eq!(resp.message.as_deref(), Some(MSG_SETTLEMENT_FAILED));
    assert!(resp.error.as_deref().unwrap().starts_with("TU_ERR_100"));
}

#[test]
fn departed_member_expenses_absorbed() {
    let store = trip_store();
    assert!(store.remove_member(TRIP, UserId(2)).unwrap());

    let result = handler(&store).settle(UserId(1), TRIP).unwrap();
    // Bob's 60 still counts toward the total, split between two.
    assert_eq!(result.total_expenses, dec(360));
    assert_eq!(result.per_person_share, dec(180));
    assert_eq!(result.unattributed_paid, dec(60));
    assert_eq!(result.net_balance_sum(), dec(-60));
    assert_eq!(result.balance_of(UserId(1)).unwrap().balance, dec(120));
    assert_eq!(result.balance_of(UserId(3)).unwrap().balance, dec(-180));
    assert_eq!(result.settlements.len(), 1);
    assert_eq!(result.settlements[0].amount, dec(120));
}

#[test]
fn departed_member_expenses_rejected_by_strict_engine() {
    let store = trip_store();
    store.remove_member(TRIP, UserId(2)).unwrap();
    let engine = SettlementEngine::new(EngineConfig {
        orphan_policy: OrphanPolicy::Reject,
        ..EngineConfig::default()
    })
    .unwrap();

    let resp = SettlementHandler::new(&store, &store, engine).get_group_settlement(UserId(1), TRIP);
    assert_eq!(resp.status, 422);
    assert!(resp.error.as_deref().unwrap().starts_with("TU_ERR_101"));
}

#[test]
fn recorded_splits_through_handler() {
    let store = trip_store();
    let dinner = store
        .record_expense(TRIP, Expense::new(UserId(3), dec(90)))
        .unwrap();
    store
        .record_split(dinner, ExpenseSplit::new(UserId(1), dec(60)))
        .unwrap();
    store
        .record_split(dinner, ExpenseSplit::new(UserId(3), dec(30)))
        .unwrap();

    let engine = SettlementEngine::new(EngineConfig {
        split_policy: SplitPolicy::Recorded,
        ..EngineConfig::default()
    })
    .unwrap();
    let result = SettlementHandler::new(&store, &store, engine)
        .settle(UserId(1), TRIP)
        .unwrap();

    // 360 split equally (120 each) plus the dinner as recorded.
    assert_eq!(result.balance_of(UserId(1)).unwrap().share, dec(180));
    assert_eq!(result.balance_of(UserId(2)).unwrap().share, dec(120));
    assert_eq!(result.balance_of(UserId(3)).unwrap().share, dec(150));
    assert_eq!(result.net_balance_sum(), Decimal::ZERO);
}

// =============================================================================
// Collaborator failures
// =============================================================================

/// Directory that answers membership but cannot list members, and a ledger
/// that is always down.
struct FlakyStore {
    membership_up: bool,
}

impl MemberDirectory for FlakyStore {
    fn group_members(&self, _group: GroupId) -> Result<Vec<Member>> {
        Err(TallyError::Storage("members table unavailable".into()))
    }

    fn is_member(&self, _group: GroupId, _user: UserId) -> Result<bool> {
        if self.membership_up {
            Ok(true)
        } else {
            Err(TallyError::Storage("connection refused".into()))
        }
    }
}

impl ExpenseLedger for FlakyStore {
    fn group_expenses(&self, _group: GroupId) -> Result<Vec<Expense>> {
        Err(TallyError::Storage("expenses table unavailable".into()))
    }
}

#[test]
fn membership_lookup_failure() {
    let store = FlakyStore {
        membership_up: false,
    };
    let resp: ApiResponse<SettlementResult> =
        SettlementHandler::new(&store, &store, SettlementEngine::default())
            .get_group_settlement(UserId(1), TRIP);
    assert_eq!(resp.status, 500);
    assert_eq!(resp.message.as_deref(), Some(MSG_MEMBERSHIP_CHECK_FAILED));
    assert!(resp.error.as_deref().unwrap().contains("connection refused"));
}

#[test]
fn ledger_failure() {
    let store = FlakyStore {
        membership_up: true,
    };
    let resp = SettlementHandler::new(&store, &store, SettlementEngine::default())
        .get_group_settlement(UserId(1), TRIP);
    assert_eq!(resp.status, 500);
    assert_eq!(resp.message.as_deref(), Some(MSG_SETTLEMENT_FAILED));
    assert!(resp.error.as_deref().unwrap().starts_with("TU_ERR_903"));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_requests_agree() {
    let store = trip_store();
    let expected = handler(&store).get_group_settlement(UserId(1), TRIP);

    std::thread::scope(|scope| {
        let workers: Vec<_> = (1..=3u64)
            .map(|user| {
                let store = &store;
                scope.spawn(move || handler(store).get_group_settlement(UserId(user), TRIP))
            })
            .collect();
        for worker in workers {
            let resp = worker.join().unwrap();
            assert_eq!(resp.data, expected.data);
            assert_eq!(resp.etag, expected.etag);
        }
    });
}

// =============================================================================
// Demo snapshot
// =============================================================================

#[test]
fn demo_snapshot_settles() {
    let demos = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos");
    let config = EngineConfig::from_file(format!("{demos}/config.json")).unwrap();
    assert_eq!(config, EngineConfig::default());

    let snapshot = tallyup_api::GroupSnapshot::from_file(format!("{demos}/trip.json")).unwrap();
    let store = snapshot.into_store(TRIP, "Road trip").unwrap();
    let engine = SettlementEngine::new(config).unwrap();
    let result = SettlementHandler::new(&store, &store, engine)
        .settle(UserId(4), TRIP)
        .unwrap();

    assert_eq!(result.per_person_share, dec(210));
    let report = tallyup_api::render_report(&result);
    assert!(report.contains("Dan → Alice: 210"));
    assert!(report.contains("Carol → Alice: 120"));
    assert!(report.contains("Bob → Alice: 60"));
}

// =============================================================================
// Cache validators and input bounds
// =============================================================================

#[test]
fn renaming_a_member_changes_etag() {
    let renamed = InMemoryStore::new();
    renamed.add_group(TRIP, "Manali trip").unwrap();
    for (id, name) in [(1, "Alice"), (2, "Robert"), (3, "Carol")] {
        renamed.add_member(TRIP, Member::dummy(id, name)).unwrap();
    }
    renamed
        .record_expense(TRIP, Expense::new(UserId(1), dec(300)))
        .unwrap();
    renamed
        .record_expense(TRIP, Expense::new(UserId(2), dec(60)))
        .unwrap();

    let store = trip_store();
    let original = handler(&store).get_group_settlement(UserId(1), TRIP);
    let changed = handler(&renamed).get_group_settlement(UserId(1), TRIP);

    assert_ne!(
        serde_json::to_value(&original).unwrap(),
        serde_json::to_value(&changed).unwrap()
    );
    assert_ne!(original.etag, changed.etag);
}

#[test]
fn negative_split_ignored_under_equal_split() {
    let store = trip_store();
    let taxi = store
        .record_expense(TRIP, Expense::new(UserId(1), dec(100)))
        .unwrap();
    store
        .record_split(taxi, ExpenseSplit::new(UserId(2), dec(-1)))
        .unwrap();

    let resp = handler(&store).get_group_settlement(UserId(1), TRIP);
    assert_eq!(resp.status, 200, "error: {:?}", resp.error);
    assert_eq!(resp.data.unwrap().total_expenses, dec(460));

    let engine = SettlementEngine::new(EngineConfig {
        split_policy: SplitPolicy::Recorded,
        ..EngineConfig::default()
    })
    .unwrap();
    let strict = SettlementHandler::new(&store, &store, engine).get_group_settlement(UserId(1), TRIP);
    assert_eq!(strict.status, 422);
    assert!(strict.error.as_deref().unwrap().starts_with("TU_ERR_102"));
}

#[test]
fn oversized_amounts_rejected_without_panic() {
    let store = trip_store();
    let huge = Decimal::MAX.round_dp(0);
    store
        .record_expense(TRIP, Expense::new(UserId(1), huge))
        .unwrap();
    store
        .record_expense(TRIP, Expense::new(UserId(2), huge))
        .unwrap();

    let resp = handler(&store).get_group_settlement(UserId(1), TRIP);
    assert_eq!(resp.status, 422);
    assert!(resp.error.as_deref().unwrap().starts_with("TU_ERR_100"));
}
