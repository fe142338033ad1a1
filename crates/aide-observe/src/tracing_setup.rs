//! Tracing subscriber initialization with an optional OpenTelemetry bridge.
//!
//! ```no_run
//! aide_observe::init_tracing(false, "warn").unwrap();
//! // ... run ...
//! aide_observe::shutdown_tracing();
//! ```

use std::sync::OnceLock;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Map `--quiet` / `-v` counts to a default filter directive.
pub fn filter_for_verbosity(quiet: bool, verbose: u8) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,aide=debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. Logs go to stderr so
/// they never interleave with replies or `--json` output on stdout. With
/// `enable_otel`, spans (including the `gen_ai.respond` span around every
/// responder call) are also exported through the stdout span exporter.
///
/// # Errors
///
/// Fails if a global subscriber is already installed or `default_filter`
/// does not parse.
pub fn init_tracing(
    enable_otel: bool,
    default_filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives)?,
        _ => EnvFilter::try_new(default_filter)?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    if enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("aide");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush buffered spans. No-op when the OpenTelemetry bridge is off.
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: tracer provider shutdown error: {e}");
        }
    }
}
