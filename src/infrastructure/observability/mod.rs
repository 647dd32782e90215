//! Observability infrastructure - Tracing and Metrics

mod config;
mod metrics;
mod tracing_setup;

pub use config::{MetricsConfig, ObservabilityConfig, TracingConfig};
pub use metrics::{
    create_metrics_router, init_metrics, record_cache_result, record_enrichment_outcome,
    record_http_request, PrometheusMetrics,
};
pub use tracing_setup::{init_logging, init_tracing, shutdown_tracing};
