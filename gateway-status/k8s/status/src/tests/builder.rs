use super::*;
use crate::{Cache, ConditionStatus, ConditionType, Reason, RouteKind};
use pretty_assertions::assert_eq;
use std::cell::Cell;

thread_local! {
    static TICKS: Cell<i64> = const { Cell::new(0) };
}

/// Advances one second per reading so each staged condition is
/// distinguishable by its timestamp.
fn ticking_clock() -> DateTime<Utc> {
    TICKS.with(|ticks| {
        let now = ticks.get() + 1;
        ticks.set(now);
        at(now)
    })
}

#[test]
fn messages_accumulate_for_repeated_type() {
    TICKS.with(|ticks| ticks.set(0));
    let cache = Cache::with_clock(own_gateway(), CacheMetrics::default(), ticking_clock);
    let mut update = cache.conditions_accessor(route_id("route"), 3, RouteKind::Http, &[]);

    update.add_condition(
        ConditionType::NotImplemented,
        ConditionStatus::True,
        Reason::NotImplemented,
        "path match type RegularExpression is not supported",
    );
    update.add_condition(
        ConditionType::NotImplemented,
        ConditionStatus::False,
        Reason::NotImplemented,
        "header match type RegularExpression is not supported",
    );
    let last = update.add_condition(
        ConditionType::NotImplemented,
        ConditionStatus::Unknown,
        Reason::NotImplemented,
        "filter type ExtensionRef is not supported",
    );

    assert_eq!(
        last.message,
        "path match type RegularExpression is not supported, \
         header match type RegularExpression is not supported, \
         filter type ExtensionRef is not supported"
    );
    assert_eq!(last.status, "Unknown");
    assert_eq!(last.observed_generation, Some(3));
    // The first tick is taken when the accessor is created.
    assert_eq!(last.last_transition_time, Time(at(4)));
    assert_eq!(update.get(ConditionType::NotImplemented), Some(&last));
    assert_eq!(update.len(), 1);
}

#[test]
fn reason_follows_latest_call() {
    let cache = cache();
    let mut update = cache.conditions_accessor(route_id("route"), 1, RouteKind::Http, &[]);

    update.add_condition(
        ConditionType::ResolvedRefs,
        ConditionStatus::False,
        Reason::PathMatchType,
        "first",
    );
    let last = update.add_condition(
        ConditionType::ResolvedRefs,
        ConditionStatus::False,
        Reason::ErrorsExist,
        "second",
    );

    assert_eq!(last.reason, "ErrorsExist");
    assert_eq!(last.message, "first, second");
}

#[test]
fn distinct_types_are_staged_independently() {
    let cache = cache();
    let mut update = cache.conditions_accessor(route_id("route"), 1, RouteKind::Tcp, &[]);

    update.add_condition(
        ConditionType::NotImplemented,
        ConditionStatus::True,
        Reason::NotImplemented,
        "a",
    );
    update.add_condition(
        ConditionType::ResolvedRefs,
        ConditionStatus::True,
        Reason::Valid,
        "b",
    );

    assert_eq!(update.len(), 2);
    assert_eq!(update.get(ConditionType::NotImplemented).unwrap().message, "a");
    assert_eq!(update.get(ConditionType::ResolvedRefs).unwrap().message, "b");
}

#[test]
fn empty_messages_still_accumulate() {
    let cache = cache();
    let mut update = cache.conditions_accessor(route_id("route"), 1, RouteKind::Http, &[]);

    update.add_condition(
        ConditionType::ResolvedRefs,
        ConditionStatus::True,
        Reason::Valid,
        "",
    );
    let cond = update.add_condition(
        ConditionType::ResolvedRefs,
        ConditionStatus::True,
        Reason::Valid,
        "",
    );
    assert_eq!(cond.message, ", ");
}

#[test]
fn snapshot_only_includes_own_gateway() {
    let cache = cache();
    let parents = vec![
        make_parent_status(
            GATEWAY_NS,
            "other",
            vec![make_condition("ResolvedRefs", "False", "Degraded", "", 9, 9)],
        ),
        make_parent_status(
            GATEWAY_NS,
            GATEWAY_NAME,
            vec![make_condition("ResolvedRefs", "True", "Valid", "", 2, 2)],
        ),
    ];
    let update = cache.conditions_accessor(route_id("route"), 3, RouteKind::Http, &parents);

    assert_eq!(update.existing.len(), 1);
    assert_eq!(
        update.existing["ResolvedRefs"],
        make_condition("ResolvedRefs", "True", "Valid", "", 2, 2)
    );
}
