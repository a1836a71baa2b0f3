use opentelemetry::{
    KeyValue,
    global,
};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    metrics::SdkMeterProvider,
};
use sentry::ClientInitGuard;
use sentry_tracing::EventFilter;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{
    OtelConfig,
    SentryConfig,
};

pub fn init_tracing_and_sentry(sentry_config: SentryConfig) -> Option<ClientInitGuard> {
    let guard = if sentry_config.dsn.is_empty() {
        None
    } else {
        Some(sentry::init((
            sentry_config.dsn,
            sentry::ClientOptions {
                release: Some(env!("CARGO_PKG_VERSION").into()),
                traces_sample_rate: sentry_config.sample_rate,
                ..Default::default()
            },
        )))
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr);

    let sentry_layer = sentry_tracing::layer().event_filter(|md| match md.level() {
        &tracing::Level::ERROR => EventFilter::Event,
        _ => EventFilter::Ignore,
    });

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .with(sentry_layer)
        .init();

    guard
}

/// Installs an OTLP/HTTP meter provider. Returns `None` when no endpoint is
/// configured; otherwise the caller should shut the provider down on exit so
/// pending metrics are flushed.
pub fn init_otel_metrics(
    otel_config: OtelConfig,
) -> Result<Option<SdkMeterProvider>, Box<dyn std::error::Error + Send + Sync>> {
    if otel_config.endpoint.is_empty() {
        tracing::info!("No OTEL endpoint configured, skipping metrics initialization");
        return Ok(None);
    }

    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .with_endpoint(&otel_config.endpoint)
        .build()?;

    let provider = SdkMeterProvider::builder()
        .with_periodic_exporter(exporter)
        .with_resource(
            Resource::builder()
                .with_attributes(vec![KeyValue::new("service.name", "hashring")])
                .build(),
        )
        .build();

    global::set_meter_provider(provider.clone());
    tracing::info!(
        "OpenTelemetry metrics initialized with OTLP exporter endpoint: {}",
        otel_config.endpoint
    );
    Ok(Some(provider))
}
