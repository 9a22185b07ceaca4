use crate::{conditions::ConditionType, routes::Route, update::ConditionsUpdate};
use gateway_status_k8s_api::{gateway::RouteGatewayStatus, Condition, Time};

impl ConditionsUpdate {
    /// Produces the next state of `route` with this update's conditions
    /// merged into its status. The route itself is left untouched.
    ///
    /// Only the block belonging to this controller's Gateway is rewritten;
    /// blocks written by other Gateways are carried over unchanged, after
    /// the rewritten block.
    ///
    /// # Panics
    ///
    /// Panics if `route` is not of the kind this update was built for. That
    /// can only happen when the caller paired an update with the wrong
    /// object.
    pub fn mutate(&self, route: &Route) -> Route {
        if route.kind() != self.kind {
            panic!(
                "unsupported {} object {}/{} in {} status mutator",
                route.kind(),
                self.id.namespace,
                self.id.name,
                self.kind,
            );
        }

        let gateways = self.merge_parent_statuses(route.parent_statuses());
        route.with_parent_statuses(gateways)
    }

    pub fn merge_parent_statuses(&self, current: &[RouteGatewayStatus]) -> Vec<RouteGatewayStatus> {
        let own = RouteGatewayStatus {
            gateway_ref: self.gateway_ref.to_gateway_ref(),
            conditions: self.conditions_to_write(),
        };

        std::iter::once(own)
            .chain(
                current
                    .iter()
                    .filter(|status| !self.gateway_ref.is_gateway_ref(&status.gateway_ref))
                    .cloned(),
            )
            .collect()
    }

    /// Condition types whose staged value will be discarded because this
    /// Gateway already recorded an observation of a newer generation.
    pub fn stale_conditions(&self) -> impl Iterator<Item = ConditionType> + '_ {
        self.conditions
            .keys()
            .copied()
            .filter(|type_| self.newer_existing(*type_).is_some())
    }

    fn conditions_to_write(&self) -> Vec<Condition> {
        self.conditions
            .iter()
            .map(|(type_, staged)| match self.newer_existing(*type_) {
                Some(existing) => existing.clone(),
                None => Condition {
                    observed_generation: Some(self.generation),
                    last_transition_time: Time(self.transition_time),
                    ..staged.clone()
                },
            })
            .collect()
    }

    fn newer_existing(&self, type_: ConditionType) -> Option<&Condition> {
        self.existing
            .get(type_.as_str())
            .filter(|existing| existing.observed_generation.unwrap_or_default() > self.generation)
    }
}

/// Compares per-gateway statuses, ignoring each condition's
/// `lastTransitionTime`. Block and condition order are significant.
pub fn eq_time_insensitive_parent_statuses(
    left: &[RouteGatewayStatus],
    right: &[RouteGatewayStatus],
) -> bool {
    left.len() == right.len()
        && left.iter().zip(right.iter()).all(|(l, r)| {
            l.gateway_ref == r.gateway_ref
                && l.conditions.len() == r.conditions.len()
                && l
                    .conditions
                    .iter()
                    .zip(r.conditions.iter())
                    .all(|(l, r)| eq_time_insensitive_conditions(l, r))
        })
}

fn eq_time_insensitive_conditions(left: &Condition, right: &Condition) -> bool {
    left.type_ == right.type_
        && left.status == right.status
        && left.reason == right.reason
        && left.message == right.message
        && left.observed_generation == right.observed_generation
}
