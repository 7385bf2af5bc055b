//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → rotating JSON file
//! ```
//!
//! Traces land in `~/.local/share/zellij/gameshelf/gameshelf-otlp.json`, one
//! OTLP/JSON document per line, rotated at 10 MB with three numbered backups.
//! The level comes from the `trace_level` plugin option (default `info`).
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup and level resolution
//! - [`exporter`]: `SpanExporter` writing to a file
//! - [`otlp`]: OTLP/JSON document model
//! - [`rotating`]: Size-rotated line writer

pub mod exporter;
pub mod init;
pub mod otlp;
pub mod rotating;

pub use init::init_tracing;
