//! Subscriber installation: console logs, optionally OTLP span export

use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::Registry,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use super::config::TracingConfig;
use crate::config::{LogFormat, LoggingConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// `RUST_LOG` wins over the configured level
fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}

fn console_layer(logging: &LoggingConfig) -> BoxedLayer {
    match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().compact().with_target(true).boxed(),
    }
}

/// Console logging only, for the one-shot `seed` command
pub fn init_logging(logging: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(console_layer(logging))
        .with(env_filter(logging))
        .init();
}

/// Console logging plus span export when `tracing.enabled` is set
///
/// A collector that cannot be reached at startup only costs the export; the
/// server still starts with console logging.
pub fn init_tracing(logging: &LoggingConfig, tracing_config: &TracingConfig) {
    let mut layers = vec![console_layer(logging)];
    let mut export_error = None;

    if tracing_config.enabled {
        match otlp_provider(tracing_config) {
            Ok(provider) => {
                let tracer = provider.tracer(tracing_config.service_name.clone());
                global::set_tracer_provider(provider);
                layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());
            }
            Err(e) => export_error = Some(e),
        }
    }

    let exporting = layers.len() > 1;

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(logging))
        .init();

    match export_error {
        Some(e) => tracing::warn!(error = %e, "OTLP export unavailable, logging to console only"),
        None if exporting => tracing::info!(
            endpoint = %tracing_config.otlp_endpoint,
            service = %tracing_config.service_name,
            "Exporting spans over OTLP"
        ),
        None => tracing::debug!("Span export disabled"),
    }
}

fn sampler_for(ratio: f64) -> Sampler {
    match ratio {
        r if r >= 1.0 => Sampler::AlwaysOn,
        r if r <= 0.0 => Sampler::AlwaysOff,
        r => Sampler::TraceIdRatioBased(r),
    }
}

fn otlp_provider(config: &TracingConfig) -> Result<TracerProvider, opentelemetry::trace::TraceError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()?;

    Ok(TracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(sampler_for(config.sampling_ratio))))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(Resource::new([KeyValue::new(
            "service.name",
            config.service_name.clone(),
        )]))
        .with_batch_exporter(exporter, runtime::Tokio)
        .build())
}

/// Flush pending spans before exit
pub fn shutdown_tracing() {
    global::shutdown_tracer_provider();
}
