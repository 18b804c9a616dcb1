//! `GET /settlement/group/{groupId}`.
//!
//! Pipeline per request:
//! ```text
//! membership gate → load members + expenses → validate → engine
//!     → conservation check → ApiResponse (+ ETag from the result digest)
//! ```
//! Nothing is persisted; every request recomputes from the ledger.

use tallyup_engine::{ConservationCheck, SettlementEngine, TracingObserver, digest_hex};
use tallyup_types::{GroupId, Result, SettlementResult, TallyError, UserId};

use crate::ports::{ExpenseLedger, MemberDirectory};
use crate::response::{ApiResponse, MSG_MEMBERSHIP_CHECK_FAILED, MSG_ROUTE_NOT_FOUND};
use crate::validation;

/// Route template served by [`SettlementHandler`].
pub const SETTLEMENT_ROUTE: &str = "/settlement/group/{groupId}";

const ROUTE_PREFIX: &str = "/settlement/group/";

/// Extract the group id from a request path matching [`SETTLEMENT_ROUTE`].
#[must_use]
pub fn group_id_from_path(path: &str) -> Option<GroupId> {
    let rest = path.strip_prefix(ROUTE_PREFIX)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    rest.parse::<u64>().ok().map(GroupId)
}

/// Serves settlement requests against a member directory and an expense
/// ledger.
pub struct SettlementHandler<'a> {
    directory: &'a dyn MemberDirectory,
    ledger: &'a dyn ExpenseLedger,
    engine: SettlementEngine,
    conservation: ConservationCheck,
}

impl<'a> SettlementHandler<'a> {
    #[must_use]
    pub fn new(
        directory: &'a dyn MemberDirectory,
        ledger: &'a dyn ExpenseLedger,
        engine: SettlementEngine,
    ) -> Self {
        let conservation = ConservationCheck::new(engine.config());
        Self {
            directory,
            ledger,
            engine,
            conservation,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Compute the settlement of `group` on behalf of `requester`.
    ///
    /// # Errors
    /// - `NotGroupMember` if `requester` does not belong to the group
    /// - `GroupNotFound`, `Storage` from the collaborators
    /// - `InvalidExpense` / `InvalidSplit` / `DuplicateMember` for bad ledger data
    /// - `ConservationViolation` / `UnsettledBalance` if the result fails its checks
    pub fn settle(&self, requester: UserId, group: GroupId) -> Result<SettlementResult> {
        if !self.directory.is_member(group, requester)? {
            return Err(TallyError::NotGroupMember {
                group,
                user: requester,
            });
        }
        self.compute(group)
    }

    fn compute(&self, group: GroupId) -> Result<SettlementResult> {
        let members = self.directory.group_members(group)?;
        let expenses = self.ledger.group_expenses(group)?;
        validation::check_ledger(&members, &expenses, self.engine.config())?;

        let result = self.engine.calculate_group_balances_observed(
            &members,
            &expenses,
            &mut TracingObserver,
        )?;
        self.conservation.verify(&result)?;

        if result.has_unattributed() {
            tracing::warn!(
                group = %group,
                unattributed_paid = %result.unattributed_paid,
                "Settlement includes expenses paid by non-members"
            );
        }
        tracing::info!(
            group = %group,
            members = members.len(),
            expenses = expenses.len(),
            total = %result.total_expenses,
            transfers = result.settlements.len(),
            "Group settlement computed"
        );
        Ok(result)
    }

    /// Full request handling: errors become failure envelopes.
    pub fn get_group_settlement(
        &self,
        requester: UserId,
        group: GroupId,
    ) -> ApiResponse<SettlementResult> {
        let is_member = match self.directory.is_member(group, requester) {
            Ok(is_member) => is_member,
            Err(err @ TallyError::GroupNotFound(_)) => return ApiResponse::from_error(&err),
            Err(err) => {
                tracing::error!(group = %group, error = %err, "Membership check failed");
                return ApiResponse {
                    error: Some(err.to_string()),
                    ..ApiResponse::failure(500, MSG_MEMBERSHIP_CHECK_FAILED)
                };
            }
        };
        if !is_member {
            tracing::debug!(group = %group, user = %requester, "Settlement denied");
            return ApiResponse::from_error(&TallyError::NotGroupMember {
                group,
                user: requester,
            });
        }

        match self.compute(group) {
            Ok(result) => {
                let etag = format!("\"{}\"", digest_hex(&result));
                ApiResponse::ok(result).with_etag(etag)
            }
            Err(err) => {
                tracing::error!(group = %group, code = err.code(), error = %err, "Get settlement error");
                ApiResponse::from_error(&err)
            }
        }
    }

    /// Dispatch a raw `GET` path.
    pub fn handle_get(&self, requester: UserId, path: &str) -> ApiResponse<SettlementResult> {
        match group_id_from_path(path) {
            Some(group) => self.get_group_settlement(requester, group),
            None => ApiResponse::failure(404, MSG_ROUTE_NOT_FOUND),
        }
    }
}
