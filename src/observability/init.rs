//! Tracing initialization and subscriber setup.

use super::exporter::{create_tracer_provider, SCOPE_NAME};
use crate::infrastructure::paths;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when none is configured or the configured one does not parse.
pub const DEFAULT_LEVEL: &str = "info";

/// Builds the filter for `level`, falling back to [`DEFAULT_LEVEL`].
///
/// Returns the filter and whether the fallback was taken.
pub fn resolve_filter(level: Option<&str>) -> (EnvFilter, bool) {
    match level.map(EnvFilter::try_new) {
        Some(Ok(filter)) => (filter, false),
        Some(Err(_)) => (EnvFilter::new(DEFAULT_LEVEL), true),
        None => (EnvFilter::new(DEFAULT_LEVEL), false),
    }
}

/// Initializes the tracing subscriber with file-based OTLP export.
///
/// Spans go through `tracing-opentelemetry` to a tracer provider whose
/// exporter appends OTLP/JSON lines to
/// `~/.local/share/zellij/gameshelf/gameshelf-otlp.json` on the host.
///
/// Observability is optional: if the data directory cannot be created the
/// plugin runs without a subscriber. Only the first call installs one.
pub fn init_tracing(config: &Config) {
    let data_dir = paths::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let (filter, fell_back) = resolve_filter(config.trace_level.as_deref());

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SCOPE_NAME)]);
    let provider = create_tracer_provider(data_dir.join(paths::TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if installed && fell_back {
        tracing::warn!(
            trace_level = config.trace_level.as_deref().unwrap_or_default(),
            "invalid trace_level, using {DEFAULT_LEVEL}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_level_uses_default_without_warning() {
        let (_, fell_back) = resolve_filter(None);
        assert!(!fell_back);
    }

    #[test]
    fn valid_level_is_kept() {
        let (_, fell_back) = resolve_filter(Some("gameshelf=debug"));
        assert!(!fell_back);
    }

    #[test]
    fn malformed_level_falls_back() {
        let (_, fell_back) = resolve_filter(Some("gameshelf=notalevel"));
        assert!(fell_back);
    }
}
