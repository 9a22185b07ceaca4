use crate::{
    k8s::gateway::{GatewayClass, GatewayClassStatus},
    status,
};
use ahash::AHashMap as HashMap;
use kubert::index::IndexClusterResource;
use parking_lot::{Mutex, RwLock};
use std::{collections::hash_map::Entry, sync::Arc};
use tokio::sync::Notify;

pub type SharedGatewayClassIndex = Arc<RwLock<GatewayClassIndex>>;

/// Computes the Admitted condition for GatewayClasses owned by this
/// controller.
pub struct GatewayClassIndex {
    controller_name: String,
    updates: GatewayClassQueue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GatewayClassUpdate {
    pub name: String,
    /// The resource version the status was computed from.
    pub resource_version: Option<String>,
    pub status: GatewayClassStatus,
}

/// Status updates waiting to be written, at most one per class.
///
/// Pushing never blocks and never fails: an update for a class that already
/// has one pending replaces it.
#[derive(Clone, Debug, Default)]
pub struct GatewayClassQueue {
    inner: Arc<QueueInner>,
}

#[derive(Debug, Default)]
struct QueueInner {
    pending: Mutex<HashMap<String, GatewayClassUpdate>>,
    notify: Notify,
}

// === impl GatewayClassIndex ===

impl GatewayClassIndex {
    pub fn shared(
        controller_name: impl ToString,
        updates: GatewayClassQueue,
    ) -> SharedGatewayClassIndex {
        Arc::new(RwLock::new(Self {
            controller_name: controller_name.to_string(),
            updates,
        }))
    }
}

impl IndexClusterResource<GatewayClass> for GatewayClassIndex {
    fn apply(&mut self, class: GatewayClass) {
        let name = class.metadata.name.clone().unwrap_or_default();
        if class.spec.controller != self.controller_name {
            tracing::trace!(%name, controller = %class.spec.controller, "Ignoring GatewayClass for another controller");
            return;
        }

        let errors = status::validate_gateway_class(&class);
        for error in &errors {
            tracing::info!(%name, %error, "Invalid GatewayClass");
        }

        let Some(status) = status::gateway_class_status(&class, &errors, chrono::Utc::now()) else {
            return;
        };
        self.updates.push(GatewayClassUpdate {
            name,
            resource_version: class.metadata.resource_version.clone(),
            status,
        });
    }

    fn delete(&mut self, name: String) {
        if self.updates.remove(&name) {
            tracing::debug!(%name, "Discarded pending update for deleted GatewayClass");
        }
    }
}

// === impl GatewayClassQueue ===

impl GatewayClassQueue {
    pub fn push(&self, update: GatewayClassUpdate) {
        self.inner
            .pending
            .lock()
            .insert(update.name.clone(), update);
        self.inner.notify.notify_one();
    }

    /// Returns an update whose write failed. An update pushed for the same
    /// class in the meantime is newer and takes precedence.
    pub fn requeue(&self, update: GatewayClassUpdate) -> bool {
        match self.inner.pending.lock().entry(update.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(update);
                true
            }
        }
    }

    fn remove(&self, name: &str) -> bool {
        self.inner.pending.lock().remove(name).is_some()
    }

    pub fn drain(&self) -> Vec<GatewayClassUpdate> {
        let mut pending = self.inner.pending.lock();
        pending.drain().map(|(_, update)| update).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.pending.lock().is_empty()
    }

    /// Completes once an update has been pushed since the last time a
    /// waiter was woken.
    pub async fn pushed(&self) {
        self.inner.notify.notified().await
    }
}
