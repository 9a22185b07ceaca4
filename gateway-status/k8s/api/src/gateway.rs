pub mod gatewayclass;
pub mod httproute;
pub mod tcproute;
pub mod tlsroute;

pub use self::{
    gatewayclass::{GatewayClass, GatewayClassSpec, GatewayClassStatus},
    httproute::{HttpRoute, HttpRouteSpec},
    tcproute::{TcpRoute, TcpRouteSpec},
    tlsroute::{TlsRoute, TlsRouteSpec},
};

use crate::Condition;

pub const GATEWAY_API_GROUP: &str = "gateway.networking.k8s.io";

/// Describes which Gateways a route may attach to.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGateways {
    /// Determines which Gateways are allowed to use this route. Routes that
    /// omit this field are only admitted by Gateways in their own namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<GatewayAllowType>,

    /// The Gateways allowed to use this route when `allow` is `FromList`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_refs: Option<Vec<GatewayReference>>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum GatewayAllowType {
    All,
    FromList,
    #[default]
    SameNamespace,
}

/// Identifies a Gateway by namespace and name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct GatewayReference {
    pub name: String,
    pub namespace: String,
}

/// Identifies a backend that receives traffic from a route rule.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteForwardTo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// The status shared by every route kind: one block per Gateway that has
/// written to the route.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct RouteStatus {
    #[serde(default)]
    pub gateways: Vec<RouteGatewayStatus>,
}

/// The conditions a single Gateway reports for a route.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteGatewayStatus {
    pub gateway_ref: RouteStatusGatewayReference,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub struct RouteStatusGatewayReference {
    pub name: String,
    pub namespace: String,
}

impl RouteGateways {
    /// Checks whether a Gateway may select a route living in
    /// `route_namespace`.
    pub fn allows(&self, route_namespace: &str, gateway: &GatewayReference) -> bool {
        match self.allow.unwrap_or_default() {
            GatewayAllowType::All => true,
            GatewayAllowType::SameNamespace => gateway.namespace == route_namespace,
            GatewayAllowType::FromList => self
                .gateway_refs
                .iter()
                .flatten()
                .any(|gw| gw == gateway),
        }
    }
}
