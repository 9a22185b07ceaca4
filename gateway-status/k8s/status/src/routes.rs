use crate::resource_id::ResourceId;
use gateway_status_k8s_api::{
    gateway::{HttpRoute, RouteGatewayStatus, RouteStatus, TcpRoute, TlsRoute},
    Resource, ResourceExt,
};
use std::borrow::Cow;

/// The route kinds whose status is grouped per parent Gateway.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum RouteKind {
    Http,
    Tls,
    Tcp,
}

/// A route of any supported kind.
///
/// Every variant shares the same per-gateway status shape; the variant only
/// determines which concrete object is copied and rewritten.
#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Http(HttpRoute),
    Tls(TlsRoute),
    Tcp(TcpRoute),
}

impl core::fmt::Display for RouteKind {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        formatter.write_str(&self.k8s_kind())
    }
}

impl RouteKind {
    pub fn k8s_kind(&self) -> Cow<'static, str> {
        match self {
            Self::Http => HttpRoute::kind(&()),
            Self::Tls => TlsRoute::kind(&()),
            Self::Tcp => TcpRoute::kind(&()),
        }
    }

    pub fn k8s_api_version(&self) -> Cow<'static, str> {
        match self {
            Self::Http => HttpRoute::api_version(&()),
            Self::Tls => TlsRoute::api_version(&()),
            Self::Tcp => TcpRoute::api_version(&()),
        }
    }
}

impl Route {
    pub fn kind(&self) -> RouteKind {
        match self {
            Self::Http(_) => RouteKind::Http,
            Self::Tls(_) => RouteKind::Tls,
            Self::Tcp(_) => RouteKind::Tcp,
        }
    }

    /// Routes are namespaced, so an object without a namespace is treated as
    /// living in `default`, as the API server would have placed it.
    pub fn id(&self) -> ResourceId {
        let (namespace, name) = match self {
            Self::Http(r) => (r.namespace(), r.name_any()),
            Self::Tls(r) => (r.namespace(), r.name_any()),
            Self::Tcp(r) => (r.namespace(), r.name_any()),
        };
        ResourceId::new(namespace.unwrap_or_else(|| "default".to_string()), name)
    }

    pub fn generation(&self) -> i64 {
        match self {
            Self::Http(r) => r.meta().generation,
            Self::Tls(r) => r.meta().generation,
            Self::Tcp(r) => r.meta().generation,
        }
        .unwrap_or_default()
    }

    pub fn resource_version(&self) -> Option<String> {
        match self {
            Self::Http(r) => r.resource_version(),
            Self::Tls(r) => r.resource_version(),
            Self::Tcp(r) => r.resource_version(),
        }
    }

    pub fn parent_statuses(&self) -> &[RouteGatewayStatus] {
        let status = match self {
            Self::Http(r) => r.status.as_ref(),
            Self::Tls(r) => r.status.as_ref(),
            Self::Tcp(r) => r.status.as_ref(),
        };
        status.map(|s| s.gateways.as_slice()).unwrap_or_default()
    }

    /// Returns a copy of this route with its per-gateway status replaced.
    /// The receiver is never modified.
    pub fn with_parent_statuses(&self, gateways: Vec<RouteGatewayStatus>) -> Self {
        let status = Some(RouteStatus { gateways });
        match self {
            Self::Http(r) => Self::Http(HttpRoute {
                status,
                ..r.clone()
            }),
            Self::Tls(r) => Self::Tls(TlsRoute {
                status,
                ..r.clone()
            }),
            Self::Tcp(r) => Self::Tcp(TcpRoute {
                status,
                ..r.clone()
            }),
        }
    }
}

impl From<HttpRoute> for Route {
    fn from(route: HttpRoute) -> Self {
        Self::Http(route)
    }
}

impl From<TlsRoute> for Route {
    fn from(route: TlsRoute) -> Self {
        Self::Tls(route)
    }
}

impl From<TcpRoute> for Route {
    fn from(route: TcpRoute) -> Self {
        Self::Tcp(route)
    }
}
