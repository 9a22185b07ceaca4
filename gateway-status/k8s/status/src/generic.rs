use chrono::{DateTime, Utc};
use gateway_status_k8s_api::{Condition, Time};

/// Merges `updates` into `existing` for resources that carry a single,
/// unshared list of conditions.
///
/// A condition whose type is already present has its status, reason and
/// message overwritten; its `lastTransitionTime` moves to `now` only when
/// the status itself changed. A condition of a new type is appended with
/// `lastTransitionTime` set to `now`.
pub fn merge_conditions(
    mut existing: Vec<Condition>,
    now: DateTime<Utc>,
    updates: impl IntoIterator<Item = Condition>,
) -> Vec<Condition> {
    for update in updates {
        match existing.iter_mut().find(|c| c.type_ == update.type_) {
            Some(current) => {
                if current.status == update.status
                    && current.reason == update.reason
                    && current.message == update.message
                {
                    continue;
                }

                if current.status != update.status {
                    current.last_transition_time = Time(now);
                }
                current.status = update.status;
                current.reason = update.reason;
                current.message = update.message;
            }
            None => existing.push(Condition {
                last_transition_time: Time(now),
                ..update
            }),
        }
    }
    existing
}

/// Deep equality over ordered condition lists.
pub fn conditions_equal(left: &[Condition], right: &[Condition]) -> bool {
    left == right
}
