use crate::{
    flush,
    gateway_class::{GatewayClassIndex, GatewayClassQueue},
    k8s::{
        gateway::{GatewayClass, HttpRoute, TcpRoute, TlsRoute},
        Resource,
    },
    routes::RouteIndex,
    status::{self, ResourceId},
};
use anyhow::{bail, Result};
use clap::Parser;
use kube::runtime::watcher;
use prometheus_client::registry::Registry;
use tokio::time::Duration;
use tracing::{info_span, Instrument};

#[derive(Debug, Parser)]
#[clap(
    name = "gateway-status",
    about = "Publishes Gateway API route and GatewayClass status conditions"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "gateway_status=info,warn",
        env = "GATEWAY_STATUS_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// The controller name GatewayClasses must reference to be admitted.
    #[clap(long, default_value = "projectcontour.io/projectcontour/contour")]
    controller_name: String,

    /// Namespace of the Gateway whose status this controller writes.
    #[clap(long, default_value = "projectcontour")]
    gateway_namespace: String,

    /// Name of the Gateway whose status this controller writes.
    #[clap(long, default_value = "contour")]
    gateway_name: String,

    /// Maximum time a committed update waits before being flushed when no
    /// other update wakes the flusher.
    #[clap(long, default_value = "1000")]
    flush_interval_ms: u64,

    /// Bounds each read and status write issued by the flusher.
    #[clap(long, default_value = "5000")]
    patch_timeout_ms: u64,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            admin,
            client,
            log_level,
            log_format,
            controller_name,
            gateway_namespace,
            gateway_name,
            flush_interval_ms,
            patch_timeout_ms,
        } = self;

        let mut prom = <Registry>::default();
        let status_reg = prom.sub_registry_with_prefix("gateway_status");
        let cache_metrics = status::CacheMetrics::register(status_reg);
        let controller_metrics = status::ControllerMetrics::register(status_reg);
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let mut runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .build()
            .await?;

        let gateway = ResourceId::new(gateway_namespace, gateway_name);
        tracing::info!(%gateway, %controller_name, "Writing status");

        let cache = status::Cache::new(gateway, cache_metrics);
        let routes = RouteIndex::shared(cache.clone());

        let http_routes = runtime.watch_all::<HttpRoute>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(routes.clone(), http_routes)
                .instrument(info_span!("httproutes")),
        );

        let tls_routes = runtime.watch_all::<TlsRoute>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(routes.clone(), tls_routes)
                .instrument(info_span!("tlsroutes")),
        );

        let tcp_routes = runtime.watch_all::<TcpRoute>(watcher::Config::default());
        tokio::spawn(
            kubert::index::namespaced(routes, tcp_routes).instrument(info_span!("tcproutes")),
        );

        let class_updates = GatewayClassQueue::default();
        let classes = GatewayClassIndex::shared(controller_name, class_updates.clone());
        let gateway_classes = runtime.watch_all::<GatewayClass>(watcher::Config::default());
        tokio::spawn(
            kubert::index::cluster(classes, gateway_classes)
                .instrument(info_span!("gatewayclasses", kind = %GatewayClass::kind(&()))),
        );

        let controller = flush::Controller::new(
            flush::ApiStore::new(runtime.client()),
            cache,
            class_updates,
            Duration::from_millis(flush_interval_ms),
            Duration::from_millis(patch_timeout_ms),
            controller_metrics,
        );
        tokio::spawn(controller.run().instrument(info_span!("flush")));

        // Block the main thread on the shutdown signal. Once it fires, wait for the background tasks to
        // complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
