//! File-backed OpenTelemetry span exporter.
//!
//! Zellij plugins run in a WASI sandbox without network access for the SDK's
//! transports, so spans are written as OTLP/JSON lines to a rotating file in
//! the plugin's data directory instead.

use super::otlp::TracesDocument;
use super::rotating::RotatingFile;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;

/// Instrumentation scope name written with every batch.
pub const SCOPE_NAME: &str = "GameShelf";

/// Writes each export batch as one OTLP/JSON line.
#[derive(Debug)]
pub struct FileSpanExporter {
    writer: RotatingFile,
    resource: Resource,
    is_shutdown: bool,
}

impl FileSpanExporter {
    #[must_use]
    pub fn new(writer: RotatingFile, resource: Resource) -> Self {
        Self {
            writer,
            resource,
            is_shutdown: false,
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.is_shutdown {
            return Err(TraceError::from("exporter is shut down"));
        }

        let document = TracesDocument::new(&self.resource, SCOPE_NAME, batch);
        let line = serde_json::to_string(&document).map_err(|e| TraceError::from(e.to_string()))?;
        self.writer
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown = true;
    }

    fn set_resource(&mut self, resource: &Resource) {
        self.resource = resource.clone();
    }
}

/// Creates a tracer provider that exports every span synchronously to `file_path`.
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(RotatingFile::new(file_path), resource.clone());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use opentelemetry::KeyValue;

    fn exporter(dir: &tempfile::TempDir) -> FileSpanExporter {
        FileSpanExporter::new(
            RotatingFile::new(dir.path().join("otlp.json")),
            Resource::new(vec![KeyValue::new("service.name", "GameShelf")]),
        )
    }

    #[test]
    fn export_writes_one_line_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(&dir);

        exporter.export(vec![]).now_or_never().unwrap().unwrap();
        exporter.export(vec![]).now_or_never().unwrap().unwrap();

        let contents = std::fs::read_to_string(dir.path().join("otlp.json")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let doc: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(doc["resourceSpans"][0]["scopeSpans"][0]["scope"]["name"], SCOPE_NAME);
    }

    #[test]
    fn export_after_shutdown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut exporter = exporter(&dir);
        exporter.shutdown();
        assert!(exporter.export(vec![]).now_or_never().unwrap().is_err());
        assert!(!dir.path().join("otlp.json").exists());
    }
}
