use std::sync::OnceLock;

use anyhow::{Context, Result};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::layer::Layer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{DEFAULT_FILTER, OtlpProtocol, TelemetryConfig};

static INIT: OnceLock<()> = OnceLock::new();
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Installs the global subscriber once; later calls are no-ops.
pub fn init_tracing(cfg: &TelemetryConfig) -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let fmt_layer = if cfg.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match cfg.otlp_endpoint.as_deref() {
        Some(endpoint) => {
            let exporter = build_span_exporter(cfg.protocol, endpoint)
                .with_context(|| format!("failed to build otlp span exporter for {endpoint}"))?;
            let provider = SdkTracerProvider::builder()
                .with_resource(build_resource(cfg))
                .with_batch_exporter(exporter)
                .build();
            let tracer = provider.tracer(cfg.service_name.clone());
            global::set_tracer_provider(provider.clone());
            global::set_text_map_propagator(TraceContextPropagator::new());
            TRACER_PROVIDER.set(provider).ok();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .with(OpenTelemetryLayer::new(tracer))
                .try_init()
                .ok();
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()
                .ok();
        }
    }

    INIT.set(()).ok();
    Ok(())
}

/// Flushes pending spans. Call before a short-lived process exits.
pub fn shutdown() {
    if let Some(Err(err)) = TRACER_PROVIDER.get().map(SdkTracerProvider::shutdown) {
        eprintln!("otlp shutdown failed: {err}");
    }
}

fn build_span_exporter(
    protocol: OtlpProtocol,
    endpoint: &str,
) -> Result<SpanExporter, opentelemetry_otlp::ExporterBuildError> {
    match protocol {
        OtlpProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build(),
        OtlpProtocol::HttpProtobuf => SpanExporter::builder()
            .with_http()
            .with_endpoint(endpoint)
            .build(),
    }
}

fn build_resource(cfg: &TelemetryConfig) -> Resource {
    Resource::builder_empty()
        .with_service_name(cfg.service_name.clone())
        .with_attributes([KeyValue::new(
            "service.version",
            cfg.service_version.clone(),
        )])
        .build()
}
