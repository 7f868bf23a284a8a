use crate::settings::config::Settings;
use anyhow::Result;
use tracing::{info, warn, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, Layer};
use tracing_subscriber::{registry, EnvFilter};

#[cfg(feature = "telemetry")]
pub fn build_otel_layer<S>() -> Result<
    tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::Tracer>,
    opentelemetry::trace::TraceError,
>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    use init_tracing_opentelemetry::{init_propagator, otlp, resource::DetectResource};
    use opentelemetry::global;
    use opentelemetry::trace::TracerProvider;

    let otel_rsrc = DetectResource::default()
        .with_fallback_service_name(env!("CARGO_PKG_NAME"))
        .with_fallback_service_version(env!("CARGO_PKG_VERSION"))
        .build();
    let tracerprovider = otlp::init_tracerprovider(otel_rsrc, otlp::identity)?;
    init_propagator()?;
    let layer = tracing_opentelemetry::layer()
        .with_error_records_to_exceptions(true)
        .with_tracer(tracerprovider.tracer(""));
    global::set_tracer_provider(tracerprovider);
    Ok(layer)
}

pub fn build_logger_text<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if cfg!(debug_assertions) {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_line_number(false)
                .with_thread_names(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
                .event_format(tracing_subscriber::fmt::format().compact()),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true),
        )
    }
}

fn default_log_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

/// `RUST_LOG` wins; otherwise everything at `info` (`debug` when the
/// settings ask for it), with the otel internals kept quiet.
pub fn build_loglevel_filter_layer(debug: bool) -> EnvFilter {
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_log_level(debug).to_string());
    EnvFilter::try_new(format!(
        "{directives},otel::tracing=trace,otel=debug,axum_tracing_opentelemetry=error"
    ))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Returns whether OTLP trace export is active.
pub fn init_telemetry_and_tracing(settings: &Settings) -> Result<bool> {
    let traces_requested = settings.traces_enabled();

    #[cfg(feature = "telemetry")]
    {
        if traces_requested {
            let subscriber = registry()
                .with(build_otel_layer()?)
                .with(build_loglevel_filter_layer(settings.debug))
                .with(build_logger_text());
            tracing::subscriber::set_global_default(subscriber)?;
            info!("init logging & tracing with OTLP export");
            return Ok(true);
        }
    }

    let subscriber = registry()
        .with(build_loglevel_filter_layer(settings.debug))
        .with(build_logger_text());
    tracing::subscriber::set_global_default(subscriber)?;

    if traces_requested {
        warn!("telemetry requests traces, but this build has no `telemetry` feature; logging only");
    }
    info!("init logging");

    Ok(false)
}
