use crate::{
    conditions::{ConditionStatus, ConditionType, Reason},
    resource_id::ResourceId,
    routes::RouteKind,
};
use chrono::{DateTime, Utc};
use gateway_status_k8s_api::{gateway::RouteGatewayStatus, Condition, Time};
use std::collections::BTreeMap;

pub type Clock = fn() -> DateTime<Utc>;

/// The conditions computed for one route, against one Gateway, during one
/// reconciliation pass.
///
/// Staged conditions are keyed by type, so a pass holds at most one
/// condition of each type. `existing` is a snapshot of the conditions this
/// controller's Gateway had already written to the route when the pass
/// read it; other Gateways' blocks are never captured.
#[derive(Clone, Debug)]
pub struct ConditionsUpdate {
    pub id: ResourceId,
    pub kind: RouteKind,
    pub generation: i64,
    pub transition_time: DateTime<Utc>,
    pub gateway_ref: ResourceId,
    pub conditions: BTreeMap<ConditionType, Condition>,
    pub existing: BTreeMap<String, Condition>,
    clock: Clock,
}

impl ConditionsUpdate {
    pub(crate) fn new(
        id: ResourceId,
        kind: RouteKind,
        generation: i64,
        gateway_ref: ResourceId,
        parents: &[RouteGatewayStatus],
        clock: Clock,
    ) -> Self {
        let existing = gateway_conditions(&gateway_ref, parents);
        Self {
            id,
            kind,
            generation,
            transition_time: clock(),
            gateway_ref,
            conditions: BTreeMap::new(),
            existing,
            clock,
        }
    }

    /// Stages a condition for this pass and returns it.
    ///
    /// When a condition of the same type was already staged, the messages
    /// accumulate as `"<previous>, <message>"` while status and reason are
    /// replaced by this call's values.
    pub fn add_condition(
        &mut self,
        type_: ConditionType,
        status: ConditionStatus,
        reason: Reason,
        message: impl Into<String>,
    ) -> Condition {
        let mut message = message.into();
        if let Some(prior) = self.conditions.get(&type_) {
            message = format!("{}, {}", prior.message, message);
        }

        let condition = Condition {
            type_: type_.to_string(),
            status: status.to_string(),
            reason: reason.to_string(),
            message,
            observed_generation: Some(self.generation),
            last_transition_time: Time((self.clock)()),
        };
        self.conditions.insert(type_, condition.clone());
        condition
    }

    /// Replaces the snapshot of this Gateway's previously written conditions
    /// with the block found in a freshly read copy of the route.
    pub fn rebase(&mut self, parents: &[RouteGatewayStatus]) {
        self.existing = gateway_conditions(&self.gateway_ref, parents);
    }

    pub fn get(&self, type_: ConditionType) -> Option<&Condition> {
        self.conditions.get(&type_)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// Captures the conditions previously written by `gateway_ref`, keyed by
/// type. Returns an empty map when the Gateway has no block on the route.
fn gateway_conditions(
    gateway_ref: &ResourceId,
    parents: &[RouteGatewayStatus],
) -> BTreeMap<String, Condition> {
    parents
        .iter()
        .find(|status| gateway_ref.is_gateway_ref(&status.gateway_ref))
        .map(|status| {
            let mut conditions = BTreeMap::new();
            for condition in &status.conditions {
                // Types are unique within a block; should a writer have
                // duplicated one, the first occurrence is kept.
                conditions
                    .entry(condition.type_.clone())
                    .or_insert_with(|| condition.clone());
            }
            conditions
        })
        .unwrap_or_default()
}
