//! Wire schema for the remote task API
//!
//! Every success payload is wrapped in a `{ "data": ... }` envelope;
//! failures carry a structured `error` object alongside an empty
//! `data`.

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Success envelope around a single record or a page of records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// Structured error object the server attaches to failed requests
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Full error response shape: `{ data: {}, error: { .. } }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Map a non-success response body into a `SyncError`
///
/// Falls back to the bare HTTP status when the body is not the
/// structured error shape.
pub fn decode_error(status: u16, body: &str) -> SyncError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => SyncError::Api {
            status: parsed.error.status,
            name: parsed.error.name,
            message: parsed.error.message,
        },
        Err(_) => SyncError::UnexpectedStatus(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use td_core::task::{Task, TaskStatus};

    #[test]
    fn test_decode_task_envelope() {
        let json = r#"{
            "data": {
                "id": 7,
                "attributes": {
                    "title": "Buy milk",
                    "description": "2 litres",
                    "status": "Не выполнена",
                    "createdAt": "2024-03-01T10:00:00.000Z",
                    "updatedAt": "2024-03-01T10:00:00.000Z",
                    "publishedAt": "2024-03-01T10:00:00.000Z"
                }
            }
        }"#;
        let envelope: DataEnvelope<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.id, 7);
        assert_eq!(envelope.data.attributes.status, Some(TaskStatus::NotCompleted));
    }

    #[test]
    fn test_decode_null_status() {
        let json = r#"{
            "data": [{
                "id": 1,
                "attributes": {
                    "title": null,
                    "description": null,
                    "status": null,
                    "createdAt": "2024-03-01T10:00:00.000Z",
                    "updatedAt": "2024-03-01T10:00:00.000Z",
                    "publishedAt": "2024-03-01T10:00:00.000Z"
                }
            }]
        }"#;
        let envelope: DataEnvelope<Vec<Task>> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data[0].attributes.status, None);
        assert_eq!(envelope.data[0].display_status(), TaskStatus::NotCompleted);
    }

    #[test]
    fn test_decode_structured_error() {
        let body = r#"{
            "data": {},
            "error": {
                "status": 404,
                "name": "NotFoundError",
                "message": "Not Found",
                "details": {}
            }
        }"#;
        match decode_error(404, body) {
            SyncError::Api { status, name, message } => {
                assert_eq!(status, 404);
                assert_eq!(name, "NotFoundError");
                assert_eq!(message, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_fallback() {
        match decode_error(502, "<html>Bad Gateway</html>") {
            SyncError::UnexpectedStatus(502) => {}
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
