use crate::{
    conditions::{ConditionStatus, ConditionType, Reason},
    generic,
};
use chrono::{DateTime, Utc};
use gateway_status_k8s_api::{
    gateway::{GatewayClass, GatewayClassStatus},
    Condition, Time,
};
use std::fmt;

const VALID_MESSAGE: &str = "Valid GatewayClass";

/// A validation failure for a single field of a resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub detail: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.detail)
    }
}

/// Checks a GatewayClass managed by this controller.
pub fn validate_gateway_class(class: &GatewayClass) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if class.spec.parameters_ref.is_some() {
        errors.push(FieldError::new(
            "spec.parametersRef",
            "Unsupported value: parameters are not supported",
        ));
    }
    errors
}

/// Computes the Admitted condition for a GatewayClass from its validation
/// errors.
pub fn admitted_condition(errors: &[FieldError], generation: i64, now: DateTime<Utc>) -> Condition {
    let (status, reason, message) = match errors {
        [] => (ConditionStatus::True, Reason::Valid, VALID_MESSAGE.to_string()),
        [error] => (ConditionStatus::False, Reason::Invalid, error.to_string()),
        errors => {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            (ConditionStatus::False, Reason::Invalid, format!("[{joined}]"))
        }
    };

    Condition {
        type_: ConditionType::Admitted.to_string(),
        status: status.to_string(),
        reason: reason.to_string(),
        message,
        observed_generation: Some(generation),
        last_transition_time: Time(now),
    }
}

/// Returns the GatewayClass status that should be written, or `None` when
/// the class already reports it.
pub fn gateway_class_status(
    class: &GatewayClass,
    errors: &[FieldError],
    now: DateTime<Utc>,
) -> Option<GatewayClassStatus> {
    let generation = class.metadata.generation.unwrap_or_default();
    let existing = class
        .status
        .as_ref()
        .map(|s| s.conditions.clone())
        .unwrap_or_default();

    let merged = generic::merge_conditions(
        existing.clone(),
        now,
        [admitted_condition(errors, generation, now)],
    );
    if generic::conditions_equal(&merged, &existing) {
        return None;
    }

    Some(GatewayClassStatus { conditions: merged })
}
