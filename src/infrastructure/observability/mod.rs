//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_chain_run, record_http_request,
    PrometheusChainObserver, PrometheusMetrics,
};
