use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

#[derive(Clone, Debug, Default)]
pub struct CacheMetrics {
    pub(crate) committed: Counter,
    pub(crate) replaced: Counter,
    pub(crate) discarded: Counter,
    pub(crate) requeued: Counter,
}

#[derive(Clone, Debug, Default)]
pub struct ControllerMetrics {
    writes: Family<KindLabels, Counter>,
    skipped: Family<KindLabels, Counter>,
    conflicts: Family<KindLabels, Counter>,
    failures: Family<KindLabels, Counter>,
    stale: Family<KindLabels, Counter>,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct KindLabels {
    kind: String,
}

// === impl CacheMetrics ===

impl CacheMetrics {
    pub fn register(prom: &mut Registry) -> Self {
        let committed = Counter::default();
        prom.register(
            "updates_committed",
            "Count of route updates committed to the pending cache",
            committed.clone(),
        );

        let replaced = Counter::default();
        prom.register(
            "updates_replaced",
            "Count of pending route updates replaced by a later pass before being flushed",
            replaced.clone(),
        );

        let discarded = Counter::default();
        prom.register(
            "updates_discarded",
            "Count of route updates discarded because no conditions were staged",
            discarded.clone(),
        );

        let requeued = Counter::default();
        prom.register(
            "updates_requeued",
            "Count of route updates returned to the pending cache after a failed write",
            requeued.clone(),
        );

        Self {
            committed,
            replaced,
            discarded,
            requeued,
        }
    }
}

// === impl ControllerMetrics ===

impl ControllerMetrics {
    pub fn register(prom: &mut Registry) -> Self {
        let writes = Family::default();
        prom.register(
            "status_writes",
            "Count of status writes applied",
            writes.clone(),
        );

        let skipped = Family::default();
        prom.register(
            "status_writes_skipped",
            "Count of status writes skipped because the status was unchanged",
            skipped.clone(),
        );

        let conflicts = Family::default();
        prom.register(
            "status_write_conflicts",
            "Count of status writes rejected because the object changed since it was read",
            conflicts.clone(),
        );

        let failures = Family::default();
        prom.register(
            "status_write_failures",
            "Count of status writes that failed",
            failures.clone(),
        );

        let stale = Family::default();
        prom.register(
            "stale_conditions",
            "Count of computed conditions discarded in favor of a condition observed at a newer generation",
            stale.clone(),
        );

        Self {
            writes,
            skipped,
            conflicts,
            failures,
            stale,
        }
    }

    pub fn write(&self, kind: &str) {
        self.writes.get_or_create(&KindLabels::new(kind)).inc();
    }

    pub fn skipped(&self, kind: &str) {
        self.skipped.get_or_create(&KindLabels::new(kind)).inc();
    }

    pub fn conflict(&self, kind: &str) {
        self.conflicts.get_or_create(&KindLabels::new(kind)).inc();
    }

    pub fn failure(&self, kind: &str) {
        self.failures.get_or_create(&KindLabels::new(kind)).inc();
    }

    pub fn stale(&self, kind: &str, count: u64) {
        self.stale.get_or_create(&KindLabels::new(kind)).inc_by(count);
    }
}

impl KindLabels {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}
