use crate::{
    metrics::CacheMetrics,
    resource_id::ResourceId,
    routes::RouteKind,
    update::{Clock, ConditionsUpdate},
};
use ahash::AHashMap as HashMap;
use gateway_status_k8s_api::gateway::RouteGatewayStatus;
use parking_lot::Mutex;
use std::{
    collections::hash_map::Entry,
    ops::{Deref, DerefMut},
    sync::Arc,
};
use tokio::sync::Notify;

type Key = (RouteKind, ResourceId);

/// Buffers finalized route updates until they are flushed.
///
/// The cache is scoped to a single Gateway: every update it hands out stages
/// conditions for that Gateway's block. At most one update is held per
/// route; committing a second update for the same route before a flush
/// replaces the first.
#[derive(Clone)]
pub struct Cache {
    inner: Arc<Inner>,
}

struct Inner {
    gateway_ref: ResourceId,
    clock: Clock,
    updates: Mutex<HashMap<Key, ConditionsUpdate>>,
    committed: Notify,
    metrics: CacheMetrics,
}

/// An in-progress update for a single route.
///
/// Dereferences to the [`ConditionsUpdate`] being built. Dropping an
/// accessor without calling [`Accessor::commit`] discards the pass.
pub struct Accessor {
    update: ConditionsUpdate,
    inner: Arc<Inner>,
}

// === impl Cache ===

impl Cache {
    pub fn new(gateway_ref: ResourceId, metrics: CacheMetrics) -> Self {
        Self::with_clock(gateway_ref, metrics, chrono::Utc::now)
    }

    pub fn with_clock(gateway_ref: ResourceId, metrics: CacheMetrics, clock: Clock) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway_ref,
                clock,
                updates: Mutex::new(HashMap::new()),
                committed: Notify::new(),
                metrics,
            }),
        }
    }

    /// The Gateway this cache stages conditions for.
    pub fn gateway_ref(&self) -> &ResourceId {
        &self.inner.gateway_ref
    }

    /// Begins a pass over a route at `generation`, snapshotting the
    /// conditions this Gateway previously wrote from `parents`.
    pub fn conditions_accessor(
        &self,
        id: ResourceId,
        generation: i64,
        kind: RouteKind,
        parents: &[RouteGatewayStatus],
    ) -> Accessor {
        let update = ConditionsUpdate::new(
            id,
            kind,
            generation,
            self.inner.gateway_ref.clone(),
            parents,
            self.inner.clock,
        );
        Accessor {
            update,
            inner: self.inner.clone(),
        }
    }

    /// Removes and returns the pending update for a route, if any.
    pub fn take(&self, kind: RouteKind, id: &ResourceId) -> Option<ConditionsUpdate> {
        self.inner.updates.lock().remove(&(kind, id.clone()))
    }

    /// Returns an update that could not be written to the API server so
    /// that the next flush retries it. A pass committed for the same route since the
    /// update was drained is newer and takes precedence.
    ///
    /// Returns whether the update was stored.
    pub fn requeue(&self, update: ConditionsUpdate) -> bool {
        let key = (update.kind, update.id.clone());
        match self.inner.updates.lock().entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(update);
                self.inner.metrics.requeued.inc();
                true
            }
        }
    }

    /// Removes and returns every pending update.
    pub fn drain(&self) -> Vec<ConditionsUpdate> {
        let mut updates = self.inner.updates.lock();
        updates.drain().map(|(_, update)| update).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.updates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.updates.lock().is_empty()
    }

    /// Completes once an update has been committed since the last time a
    /// waiter was woken.
    pub async fn committed(&self) {
        self.inner.committed.notified().await
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("gateway_ref", &self.inner.gateway_ref)
            .field("pending", &self.len())
            .finish()
    }
}

// === impl Accessor ===

impl Accessor {
    /// Stores the update in the cache, replacing any update already pending
    /// for the same route. An update with no staged conditions is dropped
    /// so that a pass that found nothing never erases a route's status.
    ///
    /// Returns whether the update was stored.
    pub fn commit(self) -> bool {
        let Self { update, inner } = self;
        if update.is_empty() {
            tracing::trace!(namespace = %update.id.namespace, name = %update.id.name, kind = %update.kind, "Discarding empty update");
            inner.metrics.discarded.inc();
            return false;
        }

        let key = (update.kind, update.id.clone());
        let replaced = inner.updates.lock().insert(key, update).is_some();
        if replaced {
            inner.metrics.replaced.inc();
        }
        inner.metrics.committed.inc();
        inner.committed.notify_one();
        true
    }

    pub fn into_inner(self) -> ConditionsUpdate {
        self.update
    }
}

impl Deref for Accessor {
    type Target = ConditionsUpdate;

    fn deref(&self) -> &Self::Target {
        &self.update
    }
}

impl DerefMut for Accessor {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.update
    }
}
