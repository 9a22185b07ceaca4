use crate::{
    k8s::gateway::{GatewayReference, HttpRoute, TcpRoute, TlsRoute},
    status::{Cache, ResourceId, Route, RouteKind},
    validation,
};
use ahash::AHashMap as HashMap;
use kubert::index::IndexNamespacedResource;
use parking_lot::RwLock;
use std::sync::Arc;

pub type SharedRouteIndex = Arc<RwLock<RouteIndex>>;

/// Runs a reconciliation pass for each route generation observed by the
/// watches and commits the result to the pending-update cache.
pub struct RouteIndex {
    cache: Cache,
    gateway: GatewayReference,
    evaluated: HashMap<(RouteKind, ResourceId), i64>,
}

impl RouteIndex {
    pub fn shared(cache: Cache) -> SharedRouteIndex {
        let gateway = cache.gateway_ref().to_gateway_reference();
        Arc::new(RwLock::new(Self {
            cache,
            gateway,
            evaluated: HashMap::new(),
        }))
    }

    fn apply_route(&mut self, route: Route) {
        let id = route.id();
        let kind = route.kind();
        let generation = route.generation();

        // Status writes bump the resource version but not the generation, so
        // a route is only re-evaluated when its spec changes.
        if self.evaluated.get(&(kind, id.clone())) == Some(&generation) {
            tracing::trace!(namespace = %id.namespace, name = %id.name, %kind, generation, "Route already evaluated");
            return;
        }
        self.evaluated.insert((kind, id.clone()), generation);

        let mut update =
            self.cache
                .conditions_accessor(id.clone(), generation, kind, route.parent_statuses());
        if !validation::check_route(&mut update, &route, &self.gateway) {
            tracing::debug!(namespace = %id.namespace, name = %id.name, %kind, "Route does not select this gateway");
            return;
        }

        if update.commit() {
            tracing::debug!(namespace = %id.namespace, name = %id.name, %kind, generation, "Committed route update");
        }
    }

    fn delete_route(&mut self, kind: RouteKind, namespace: String, name: String) {
        let id = ResourceId::new(namespace, name);
        self.evaluated.remove(&(kind, id.clone()));
        if self.cache.take(kind, &id).is_some() {
            tracing::debug!(namespace = %id.namespace, name = %id.name, %kind, "Discarded pending update for deleted route");
        }
    }
}

impl IndexNamespacedResource<HttpRoute> for RouteIndex {
    fn apply(&mut self, resource: HttpRoute) {
        self.apply_route(resource.into());
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.delete_route(RouteKind::Http, namespace, name);
    }
}

impl IndexNamespacedResource<TlsRoute> for RouteIndex {
    fn apply(&mut self, resource: TlsRoute) {
        self.apply_route(resource.into());
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.delete_route(RouteKind::Tls, namespace, name);
    }
}

impl IndexNamespacedResource<TcpRoute> for RouteIndex {
    fn apply(&mut self, resource: TcpRoute) {
        self.apply_route(resource.into());
    }

    fn delete(&mut self, namespace: String, name: String) {
        self.delete_route(RouteKind::Tcp, namespace, name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        k8s::{
            gateway::{GatewayAllowType, HttpRouteSpec, RouteGateways, TcpRouteSpec},
            ObjectMeta,
        },
        status::{CacheMetrics, ConditionType},
    };

    fn index() -> (Cache, SharedRouteIndex) {
        let cache = Cache::new(
            ResourceId::new("projectcontour".to_string(), "contour".to_string()),
            CacheMetrics::default(),
        );
        (cache.clone(), RouteIndex::shared(cache))
    }

    fn meta(name: &str, generation: i64) -> ObjectMeta {
        ObjectMeta {
            namespace: Some("default".to_string()),
            name: Some(name.to_string()),
            generation: Some(generation),
            ..Default::default()
        }
    }

    fn http_route(name: &str, generation: i64) -> HttpRoute {
        HttpRoute {
            metadata: meta(name, generation),
            spec: HttpRouteSpec {
                gateways: Some(RouteGateways {
                    allow: Some(GatewayAllowType::All),
                    gateway_refs: None,
                }),
                ..Default::default()
            },
            status: None,
        }
    }

    #[test]
    fn commits_each_generation_once() {
        let (cache, index) = index();

        index.write().apply(http_route("web", 1));
        let update = cache.take(RouteKind::Http, &ResourceId::new("default".to_string(), "web".to_string()));
        let update = update.expect("first generation must be evaluated");
        assert_eq!(update.generation, 1);
        assert!(update.get(ConditionType::ResolvedRefs).is_some());

        index.write().apply(http_route("web", 1));
        assert!(cache.is_empty());

        index.write().apply(http_route("web", 2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn requeued_update_survives_resync() {
        let (cache, index) = index();
        index.write().apply(http_route("web", 1));

        // The flusher drained the update and failed to write it.
        let failed = cache.drain().remove(0);
        assert!(cache.requeue(failed));

        // A resync of the same generation stages nothing new but leaves the
        // requeued update pending.
        index.write().apply(http_route("web", 1));
        assert_eq!(cache.len(), 1);
        let pending = cache
            .take(RouteKind::Http, &ResourceId::new("default".to_string(), "web".to_string()))
            .expect("update must remain pending");
        assert_eq!(pending.generation, 1);
    }

    #[test]
    fn unselected_routes_are_not_committed() {
        let (cache, index) = index();
        index.write().apply(TcpRoute {
            metadata: meta("db", 1),
            spec: TcpRouteSpec::default(),
            status: None,
        });
        assert!(cache.is_empty());
    }

    #[test]
    fn delete_discards_pending_update() {
        let (cache, index) = index();
        index.write().apply(http_route("web", 1));
        assert_eq!(cache.len(), 1);

        IndexNamespacedResource::<HttpRoute>::delete(
            &mut *index.write(),
            "default".to_string(),
            "web".to_string(),
        );
        assert!(cache.is_empty());

        // A recreated route is evaluated again.
        index.write().apply(http_route("web", 1));
        assert_eq!(cache.len(), 1);
    }
}
