use super::{RouteForwardTo, RouteGateways, RouteStatus};

/// TCPRoute forwards TCP connections to backends.
#[derive(Clone, Debug, Default, PartialEq, kube::CustomResource, serde::Deserialize, serde::Serialize)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1alpha1",
    kind = "TCPRoute",
    root = "TcpRoute",
    status = "RouteStatus",
    derive = "PartialEq",
    schema = "disabled",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TcpRouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<RouteGateways>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<TcpRouteRule>>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TcpRouteRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_to: Option<Vec<RouteForwardTo>>,
}
