use super::{RouteForwardTo, RouteGateways, RouteStatus};

/// TLSRoute routes TLS connections, matched by SNI, to backends.
#[derive(Clone, Debug, Default, PartialEq, kube::CustomResource, serde::Deserialize, serde::Serialize)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1alpha1",
    kind = "TLSRoute",
    root = "TlsRoute",
    status = "RouteStatus",
    derive = "PartialEq",
    schema = "disabled",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct TlsRouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<RouteGateways>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<TlsRouteRule>>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsRouteRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_to: Option<Vec<RouteForwardTo>>,
}
