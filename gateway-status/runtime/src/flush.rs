use crate::{
    gateway_class::{GatewayClassQueue, GatewayClassUpdate},
    k8s::{
        gateway::{GatewayClass, HttpRoute, RouteStatus, TcpRoute, TlsRoute},
        Resource,
    },
    status::{self, Cache, ConditionsUpdate, ControllerMetrics, ResourceId, Route, RouteKind},
};
use kube::{
    api::{Api, Patch, PatchParams},
    error::ErrorResponse,
    Client,
};
use std::future::Future;
use tokio::time::{self, Duration, MissedTickBehavior};

const FIELD_MANAGER: &str = "gateway-status-controller";

/// The number of times a route update is rebased onto a freshly read object
/// after the API server rejects a write as conflicting.
const MAX_CONFLICT_RETRIES: usize = 3;

/// Reads and writes the objects whose status the controller maintains.
#[async_trait::async_trait]
pub trait StatusStore: Send + Sync {
    async fn get_route(&self, kind: RouteKind, id: &ResourceId)
        -> Result<Option<Route>, FlushError>;

    async fn patch_route_status(
        &self,
        kind: RouteKind,
        id: &ResourceId,
        patch: serde_json::Value,
    ) -> Result<(), FlushError>;

    async fn patch_gateway_class_status(
        &self,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<(), FlushError>;
}

/// A [`StatusStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct ApiStore {
    client: Client,
}

/// Writes pending status updates back to the API server.
pub struct Controller<S> {
    store: S,
    cache: Cache,
    gateway_classes: GatewayClassQueue,
    flush_interval: Duration,
    request_timeout: Duration,
    metrics: ControllerMetrics,
}

#[derive(Debug, thiserror::Error)]
pub enum FlushError {
    #[error("failed to write status: {0}")]
    Api(#[from] kube::Error),

    #[error("object was modified since it was read")]
    Conflict,

    #[error("object not found")]
    NotFound,

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to encode status patch: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Written,
    Unchanged,
    Deleted,
}

// === impl Controller ===

impl<S: StatusStore> Controller<S> {
    pub fn new(
        store: S,
        cache: Cache,
        gateway_classes: GatewayClassQueue,
        flush_interval: Duration,
        request_timeout: Duration,
        metrics: ControllerMetrics,
    ) -> Self {
        Self {
            store,
            cache,
            gateway_classes,
            flush_interval,
            request_timeout,
            metrics,
        }
    }

    pub async fn run(self) {
        let mut interval = time::interval(self.flush_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cache.committed() => {}
                _ = self.gateway_classes.pushed() => {}
                _ = interval.tick() => {}
            }

            for update in self.gateway_classes.drain() {
                self.flush_gateway_class(update).await;
            }
            for update in self.cache.drain() {
                self.flush_route(update).await;
            }
        }
    }

    /// Writes a route update. An update that could not be written is
    /// returned to the cache for the next flush.
    async fn flush_route(&self, mut update: ConditionsUpdate) {
        let kind = update.kind.k8s_kind();
        let (namespace, name) = (update.id.namespace.clone(), update.id.name.clone());

        match self.write_route_with_retries(&mut update).await {
            Ok(Outcome::Written) => {
                self.metrics.write(&kind);
                tracing::info!(%namespace, %name, %kind, "Updated route status");
            }
            Ok(Outcome::Unchanged) => {
                self.metrics.skipped(&kind);
                tracing::debug!(%namespace, %name, %kind, "Route status unchanged");
            }
            Ok(Outcome::Deleted) => {
                tracing::debug!(%namespace, %name, %kind, "Route deleted before its status was written");
            }
            Err(error) => {
                self.metrics.failure(&kind);
                tracing::error!(%namespace, %name, %kind, %error, "Failed to write route status");
                if !self.cache.requeue(update) {
                    tracing::debug!(%namespace, %name, %kind, "A newer update is already pending");
                }
            }
        }
    }

    async fn write_route_with_retries(
        &self,
        update: &mut ConditionsUpdate,
    ) -> Result<Outcome, FlushError> {
        let kind = update.kind.k8s_kind();
        let mut attempt = 0;
        let result = loop {
            match self.write_route(update, attempt > 0).await {
                Err(FlushError::Conflict) if attempt < MAX_CONFLICT_RETRIES => {
                    attempt += 1;
                    self.metrics.conflict(&kind);
                    tracing::debug!(namespace = %update.id.namespace, name = %update.id.name, %kind, attempt, "Status write conflicted; rebasing");
                }
                result => break result,
            }
        };

        if matches!(result, Ok(Outcome::Written | Outcome::Unchanged)) {
            let stale = update.stale_conditions().count();
            if stale > 0 {
                self.metrics.stale(&kind, stale as u64);
            }
        }
        result
    }

    /// Reads the route, merges the update into it and writes the result,
    /// guarded by the resource version that was read.
    async fn write_route(
        &self,
        update: &mut ConditionsUpdate,
        rebase: bool,
    ) -> Result<Outcome, FlushError> {
        let read = self.store.get_route(update.kind, &update.id);
        let Some(route) = self.bounded(read).await? else {
            return Ok(Outcome::Deleted);
        };

        // After a conflict the pass's snapshot describes a state that no
        // longer exists.
        if rebase {
            update.rebase(route.parent_statuses());
        }

        let next = update.mutate(&route);
        if status::eq_time_insensitive_parent_statuses(
            route.parent_statuses(),
            next.parent_statuses(),
        ) {
            return Ok(Outcome::Unchanged);
        }

        let patch = make_route_patch(&next)?;
        let write = self
            .store
            .patch_route_status(update.kind, &update.id, patch);
        match self.bounded(write).await {
            Ok(()) => Ok(Outcome::Written),
            Err(FlushError::NotFound) => Ok(Outcome::Deleted),
            Err(error) => Err(error),
        }
    }

    async fn flush_gateway_class(&self, update: GatewayClassUpdate) {
        let kind = GatewayClass::kind(&());
        let name = update.name.clone();

        let result = match make_gateway_class_patch(&update) {
            Ok(patch) => {
                let write = self.store.patch_gateway_class_status(&name, patch);
                self.bounded(write).await
            }
            Err(error) => Err(error.into()),
        };

        match result {
            Ok(()) => {
                self.metrics.write(&kind);
                tracing::info!(%name, "Updated GatewayClass status");
            }
            // The watch delivers the newer object, which is evaluated afresh.
            Err(FlushError::Conflict) => {
                self.metrics.conflict(&kind);
                tracing::debug!(%name, "GatewayClass changed since its status was computed");
            }
            Err(FlushError::NotFound) => {
                tracing::debug!(%name, "GatewayClass deleted before its status was written");
            }
            Err(error) => {
                self.metrics.failure(&kind);
                tracing::error!(%name, %error, "Failed to write GatewayClass status");
                self.gateway_classes.requeue(update);
            }
        }
    }

    async fn bounded<T>(
        &self,
        request: impl Future<Output = Result<T, FlushError>>,
    ) -> Result<T, FlushError> {
        time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| FlushError::Timeout(self.request_timeout))?
    }
}

// === impl ApiStore ===

impl ApiStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl StatusStore for ApiStore {
    async fn get_route(
        &self,
        kind: RouteKind,
        id: &ResourceId,
    ) -> Result<Option<Route>, FlushError> {
        let client = self.client.clone();
        let route = match kind {
            RouteKind::Http => Api::<HttpRoute>::namespaced(client, &id.namespace)
                .get_opt(&id.name)
                .await?
                .map(Route::Http),
            RouteKind::Tls => Api::<TlsRoute>::namespaced(client, &id.namespace)
                .get_opt(&id.name)
                .await?
                .map(Route::Tls),
            RouteKind::Tcp => Api::<TcpRoute>::namespaced(client, &id.namespace)
                .get_opt(&id.name)
                .await?
                .map(Route::Tcp),
        };
        Ok(route)
    }

    async fn patch_route_status(
        &self,
        kind: RouteKind,
        id: &ResourceId,
        patch: serde_json::Value,
    ) -> Result<(), FlushError> {
        let client = self.client.clone();
        let params = patch_params();
        let patch = Patch::Merge(&patch);
        let result = match kind {
            RouteKind::Http => Api::<HttpRoute>::namespaced(client, &id.namespace)
                .patch_status(&id.name, &params, &patch)
                .await
                .map(|_| ()),
            RouteKind::Tls => Api::<TlsRoute>::namespaced(client, &id.namespace)
                .patch_status(&id.name, &params, &patch)
                .await
                .map(|_| ()),
            RouteKind::Tcp => Api::<TcpRoute>::namespaced(client, &id.namespace)
                .patch_status(&id.name, &params, &patch)
                .await
                .map(|_| ()),
        };
        result.map_err(classify)
    }

    async fn patch_gateway_class_status(
        &self,
        name: &str,
        patch: serde_json::Value,
    ) -> Result<(), FlushError> {
        let api = Api::<GatewayClass>::all(self.client.clone());
        let params = patch_params();
        let patch = Patch::Merge(&patch);
        api.patch_status(name, &params, &patch)
            .await
            .map(|_| ())
            .map_err(classify)
    }
}

fn patch_params() -> PatchParams {
    PatchParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    }
}

fn classify(error: kube::Error) -> FlushError {
    match error {
        kube::Error::Api(ErrorResponse { code: 409, .. }) => FlushError::Conflict,
        kube::Error::Api(ErrorResponse { code: 404, .. }) => FlushError::NotFound,
        error => FlushError::Api(error),
    }
}

/// Builds a merge patch replacing the route's per-gateway status. The
/// resource version that was read is included so that the API server
/// rejects the write if the route changed in the meantime.
pub(crate) fn make_route_patch(route: &Route) -> Result<serde_json::Value, serde_json::Error> {
    let kind = route.kind();
    let status = serde_json::to_value(RouteStatus {
        gateways: route.parent_statuses().to_vec(),
    })?;

    Ok(serde_json::json!({
        "apiVersion": kind.k8s_api_version(),
        "kind": kind.k8s_kind(),
        "metadata": resource_version_metadata(route.resource_version().as_deref()),
        "status": status,
    }))
}

pub(crate) fn make_gateway_class_patch(
    update: &GatewayClassUpdate,
) -> Result<serde_json::Value, serde_json::Error> {
    let status = serde_json::to_value(&update.status)?;
    Ok(serde_json::json!({
        "apiVersion": GatewayClass::api_version(&()),
        "kind": GatewayClass::kind(&()),
        "metadata": resource_version_metadata(update.resource_version.as_deref()),
        "status": status,
    }))
}

fn resource_version_metadata(version: Option<&str>) -> serde_json::Map<String, serde_json::Value> {
    let mut metadata = serde_json::Map::new();
    if let Some(version) = version {
        metadata.insert("resourceVersion".to_string(), version.into());
    }
    metadata
}
