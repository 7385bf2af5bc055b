//! OTLP/JSON trace document model.
//!
//! Mirrors the subset of the OTLP `ExportTraceServiceRequest` JSON mapping the
//! exporter writes: resource attributes, one instrumentation scope, and for
//! each span its ids, timing, attributes, events and status. IDs are lower-case
//! hex and timestamps are decimal nanosecond strings, as the JSON mapping
//! requires.

use opentelemetry::trace::{SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// One exported line: a complete OTLP traces document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TracesDocument {
    resource_spans: Vec<ResourceSpans>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSpans {
    resource: ResourceAttributes,
    scope_spans: Vec<ScopeSpans>,
}

#[derive(Debug, Serialize)]
struct ResourceAttributes {
    attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
struct ScopeSpans {
    scope: Scope,
    spans: Vec<OtlpSpan>,
}

#[derive(Debug, Serialize)]
struct Scope {
    name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpSpan {
    trace_id: String,
    span_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    parent_span_id: String,
    name: String,
    kind: u8,
    start_time_unix_nano: String,
    end_time_unix_nano: String,
    attributes: Vec<Attribute>,
    events: Vec<OtlpEvent>,
    status: OtlpStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OtlpEvent {
    time_unix_nano: String,
    name: String,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Serialize)]
struct OtlpStatus {
    code: u8,
    #[serde(skip_serializing_if = "String::is_empty")]
    message: String,
}

/// A key and its typed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    key: String,
    value: AnyValue,
}

/// OTLP `AnyValue`; serializes as `{"stringValue": "..."}` and so on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnyValue {
    BoolValue(bool),
    /// 64-bit integers are strings in the JSON mapping.
    IntValue(String),
    DoubleValue(f64),
    StringValue(String),
}

impl From<&Value> for AnyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::BoolValue(*b),
            Value::I64(i) => Self::IntValue(i.to_string()),
            Value::F64(f) => Self::DoubleValue(*f),
            Value::String(s) => Self::StringValue(s.to_string()),
            _ => Self::StringValue(value.as_str().into_owned()),
        }
    }
}

impl From<&KeyValue> for Attribute {
    fn from(kv: &KeyValue) -> Self {
        Self {
            key: kv.key.to_string(),
            value: AnyValue::from(&kv.value),
        }
    }
}

impl TracesDocument {
    /// Builds the document for one export batch.
    #[must_use]
    pub fn new(resource: &Resource, scope: &str, batch: &[SpanData]) -> Self {
        let attributes = resource
            .iter()
            .map(|(key, value)| Attribute {
                key: key.to_string(),
                value: AnyValue::from(value),
            })
            .collect();

        Self {
            resource_spans: vec![ResourceSpans {
                resource: ResourceAttributes { attributes },
                scope_spans: vec![ScopeSpans {
                    scope: Scope {
                        name: scope.to_string(),
                    },
                    spans: batch.iter().map(OtlpSpan::from).collect(),
                }],
            }],
        }
    }

    /// Number of spans in the document.
    #[must_use]
    pub fn span_count(&self) -> usize {
        self.resource_spans
            .iter()
            .flat_map(|rs| &rs.scope_spans)
            .map(|ss| ss.spans.len())
            .sum()
    }
}

impl From<&SpanData> for OtlpSpan {
    fn from(span: &SpanData) -> Self {
        let parent_span_id = if span.parent_span_id == SpanId::INVALID {
            String::new()
        } else {
            format!("{:016x}", span.parent_span_id)
        };

        let (code, message) = match &span.status {
            Status::Unset => (0, String::new()),
            Status::Ok => (1, String::new()),
            Status::Error { description } => (2, description.to_string()),
        };

        Self {
            trace_id: format!("{:032x}", span.span_context.trace_id()),
            span_id: format!("{:016x}", span.span_context.span_id()),
            parent_span_id,
            name: span.name.to_string(),
            kind: kind_code(&span.span_kind),
            start_time_unix_nano: unix_nanos(span.start_time),
            end_time_unix_nano: unix_nanos(span.end_time),
            attributes: span.attributes.iter().map(Attribute::from).collect(),
            events: span
                .events
                .iter()
                .map(|event| OtlpEvent {
                    time_unix_nano: unix_nanos(event.timestamp),
                    name: event.name.to_string(),
                    attributes: event.attributes.iter().map(Attribute::from).collect(),
                })
                .collect(),
            status: OtlpStatus { code, message },
        }
    }
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

/// Nanoseconds since the Unix epoch as a decimal string; `"0"` before 1970.
fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn any_value_uses_otlp_field_names() {
        let json = serde_json::to_value(AnyValue::from(&Value::I64(42))).unwrap();
        assert_eq!(json, serde_json::json!({ "intValue": "42" }));

        let json = serde_json::to_value(AnyValue::from(&Value::Bool(true))).unwrap();
        assert_eq!(json, serde_json::json!({ "boolValue": true }));
    }

    #[test]
    fn attribute_from_key_value() {
        let attr = Attribute::from(&KeyValue::new("item_id", "doom"));
        let json = serde_json::to_value(attr).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "key": "item_id", "value": { "stringValue": "doom" } })
        );
    }

    #[test]
    fn empty_batch_document_carries_resource() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "GameShelf")]);
        let doc = TracesDocument::new(&resource, "GameShelf", &[]);
        assert_eq!(doc.span_count(), 0);

        let json = serde_json::to_value(&doc).unwrap();
        let rs = &json["resourceSpans"][0];
        assert_eq!(rs["resource"]["attributes"][0]["key"], "service.name");
        assert_eq!(rs["scopeSpans"][0]["scope"]["name"], "GameShelf");
    }

    #[test]
    fn nanos_are_decimal_strings() {
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert_eq!(unix_nanos(t), "1500000000");
        assert_eq!(unix_nanos(UNIX_EPOCH - Duration::from_secs(1)), "0");
    }
}
