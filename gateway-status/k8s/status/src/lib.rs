mod cache;
pub mod conditions;
mod gateway_class;
mod generic;
mod merge;
mod metrics;
mod resource_id;
mod routes;
mod update;

#[cfg(test)]
mod tests;

pub use self::{
    cache::{Accessor, Cache},
    conditions::{ConditionStatus, ConditionType, Reason},
    gateway_class::{admitted_condition, gateway_class_status, validate_gateway_class, FieldError},
    generic::{conditions_equal, merge_conditions},
    merge::eq_time_insensitive_parent_statuses,
    metrics::{CacheMetrics, ControllerMetrics},
    resource_id::ResourceId,
    routes::{Route, RouteKind},
    update::{Clock, ConditionsUpdate},
};
