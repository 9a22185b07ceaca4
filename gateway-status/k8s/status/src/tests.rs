use crate::{CacheMetrics, ResourceId};
use chrono::{DateTime, Utc};
use gateway_status_k8s_api::{
    gateway::{
        HttpRoute, HttpRouteSpec, RouteGatewayStatus, RouteStatus, RouteStatusGatewayReference,
        TcpRoute, TcpRouteSpec,
    },
    Condition, ObjectMeta, Time,
};

mod builder;

pub(crate) const GATEWAY_NS: &str = "projectcontour";
pub(crate) const GATEWAY_NAME: &str = "contour";

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
}

pub(crate) fn pass_clock() -> DateTime<Utc> {
    at(1_000)
}

pub(crate) fn own_gateway() -> ResourceId {
    ResourceId::new(GATEWAY_NS.to_string(), GATEWAY_NAME.to_string())
}

pub(crate) fn route_id(name: &str) -> ResourceId {
    ResourceId::new("default".to_string(), name.to_string())
}

pub(crate) fn cache() -> crate::Cache {
    crate::Cache::with_clock(own_gateway(), CacheMetrics::default(), pass_clock)
}

pub(crate) fn make_condition(
    type_: &str,
    status: &str,
    reason: &str,
    message: &str,
    generation: i64,
    secs: i64,
) -> Condition {
    Condition {
        type_: type_.to_string(),
        status: status.to_string(),
        reason: reason.to_string(),
        message: message.to_string(),
        observed_generation: Some(generation),
        last_transition_time: Time(at(secs)),
    }
}

pub(crate) fn make_parent_status(
    namespace: &str,
    name: &str,
    conditions: Vec<Condition>,
) -> RouteGatewayStatus {
    RouteGatewayStatus {
        gateway_ref: RouteStatusGatewayReference {
            namespace: namespace.to_string(),
            name: name.to_string(),
        },
        conditions,
    }
}

pub(crate) fn make_http_route(
    name: &str,
    generation: i64,
    parents: Vec<RouteGatewayStatus>,
) -> HttpRoute {
    HttpRoute {
        metadata: ObjectMeta {
            namespace: Some("default".to_string()),
            name: Some(name.to_string()),
            generation: Some(generation),
            resource_version: Some("42".to_string()),
            ..Default::default()
        },
        spec: HttpRouteSpec::default(),
        status: Some(RouteStatus { gateways: parents }),
    }
}

pub(crate) fn make_tcp_route(name: &str, generation: i64) -> TcpRoute {
    TcpRoute {
        metadata: ObjectMeta {
            namespace: Some("default".to_string()),
            name: Some(name.to_string()),
            generation: Some(generation),
            ..Default::default()
        },
        spec: TcpRouteSpec::default(),
        status: None,
    }
}
