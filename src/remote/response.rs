//! Decoding of catalog server responses.

use crate::domain::{ItemRecord, Result, ShelfError};

/// HTTP status the catalog endpoint answers with on success.
const STATUS_OK: u16 = 200;

/// Decodes a `/api/games` response into catalog records.
///
/// # Errors
///
/// - [`ShelfError::Http`] if `status` is not `200`
/// - [`ShelfError::Decode`] if the body is not a JSON array of item records
pub fn decode_catalog(status: u16, body: &[u8]) -> Result<Vec<ItemRecord>> {
    if status != STATUS_OK {
        return Err(ShelfError::Http { status });
    }

    let records: Vec<ItemRecord> = serde_json::from_slice(body)?;
    tracing::debug!(record_count = records.len(), body_len = body.len(), "catalog decoded");
    Ok(records)
}

/// Collapses a fetch result into the record list the catalog core consumes.
///
/// Failures are logged and become an empty list. The returned flag is `true`
/// when the list stands in for a failure rather than an empty catalog.
#[must_use]
pub fn records_or_empty(result: Result<Vec<ItemRecord>>) -> (Vec<ItemRecord>, bool) {
    match result {
        Ok(records) => (records, false),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load catalog, treating as empty");
            (Vec::new(), true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_array() {
        let body = br#"[{"id":"a","name":"Alpha","sizeBytes":100},{"id":"b","name":"Beta","sizeBytes":50,"hasCover":true}]"#;
        let records = decode_catalog(200, body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].name, "Beta");
        assert!(records[1].has_cover);
    }

    #[test]
    fn empty_array_is_success() {
        assert!(decode_catalog(200, b"[]").unwrap().is_empty());
    }

    #[test]
    fn non_ok_status_is_http_error() {
        let err = decode_catalog(500, b"internal").unwrap_err();
        assert!(matches!(err, ShelfError::Http { status: 500 }));
    }

    #[test]
    fn garbage_body_is_decode_error() {
        let err = decode_catalog(200, b"<html>").unwrap_err();
        assert!(matches!(err, ShelfError::Decode(_)));
    }

    #[test]
    fn failures_collapse_to_empty() {
        let (records, failed) = records_or_empty(Err(ShelfError::Http { status: 404 }));
        assert!(records.is_empty());
        assert!(failed);

        let (records, failed) = records_or_empty(Ok(vec![ItemRecord::new("a", "Alpha", 1)]));
        assert_eq!(records.len(), 1);
        assert!(!failed);
    }
}
