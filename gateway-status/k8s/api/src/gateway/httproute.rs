use super::{RouteForwardTo, RouteGateways, RouteStatus};
use std::collections::BTreeMap;

/// HTTPRoute provides a way to route HTTP requests. This includes the
/// capability to match requests by hostname, path, or header. Filters can be
/// used to specify additional processing steps. Backends specify where
/// matching requests should be routed.
#[derive(Clone, Debug, Default, PartialEq, kube::CustomResource, serde::Deserialize, serde::Serialize)]
#[kube(
    group = "gateway.networking.k8s.io",
    version = "v1alpha1",
    kind = "HTTPRoute",
    root = "HttpRoute",
    status = "RouteStatus",
    derive = "PartialEq",
    schema = "disabled",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteSpec {
    /// Selects the Gateways this route may be attached to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateways: Option<RouteGateways>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostnames: Option<Vec<String>>,

    /// Rules are a list of HTTP matchers, filters and actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<HttpRouteRule>>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRouteRule {
    /// Each match is independent: the rule matches if **any** one of the
    /// matches is satisfied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<HttpRouteMatch>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<HttpRouteFilter>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward_to: Option<Vec<RouteForwardTo>>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HttpRouteMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<HttpPathMatch>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HttpHeaderMatch>,
}

/// Match types are kept as plain strings: the API admits values (such as
/// `RegularExpression` or `ImplementationSpecific`) that a controller may
/// not implement, and those must still be reported on.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HttpPathMatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HttpHeaderMatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HttpRouteFilter {
    #[serde(rename = "type")]
    pub type_: String,
}

pub const PATH_MATCH_PREFIX: &str = "Prefix";
pub const PATH_MATCH_EXACT: &str = "Exact";
pub const HEADER_MATCH_EXACT: &str = "Exact";
pub const FILTER_REQUEST_HEADER_MODIFIER: &str = "RequestHeaderModifier";

impl HttpPathMatch {
    /// The effective match type; the API defaults to `Prefix`.
    pub fn match_type(&self) -> &str {
        self.type_.as_deref().unwrap_or(PATH_MATCH_PREFIX)
    }
}

impl HttpHeaderMatch {
    /// The effective match type; the API defaults to `Exact`.
    pub fn match_type(&self) -> &str {
        self.type_.as_deref().unwrap_or(HEADER_MATCH_EXACT)
    }
}
