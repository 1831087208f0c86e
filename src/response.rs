//! Response normalization - wire responses to the public result model
//!
//! Every response is checked for the server's failure signal first. Both
//! patterns the protocol uses are honored: a `success` flag and an optional
//! `error` string.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::proto;

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub distance: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Vector-side score reported by hybrid search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_score: Option<f32>,
    /// Text-side score reported by hybrid search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_score: Option<f32>,
}

impl From<proto::SearchResult> for SearchResult {
    fn from(r: proto::SearchResult) -> Self {
        Self {
            id: r.id,
            distance: r.distance,
            vector: non_empty(r.vector),
            metadata: (!r.metadata.is_empty()).then_some(r.metadata),
            text: r.text,
            vector_score: r.vector_score,
            text_score: r.text_score,
        }
    }
}

/// Summary of a streamed batch insert
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub inserted_count: i32,
    pub failed_count: i32,
    pub inserted_ids: Vec<String>,
    /// Per-item error messages, in the order the server reported them
    pub errors: Vec<String>,
    pub total_time_ms: f32,
}

impl BatchOutcome {
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0 && self.errors.is_empty()
    }
}

impl From<proto::BatchInsertResponse> for BatchOutcome {
    fn from(r: proto::BatchInsertResponse) -> Self {
        Self {
            inserted_count: r.inserted_count,
            failed_count: r.failed_count,
            inserted_ids: r.inserted_ids,
            errors: r.errors,
            total_time_ms: r.total_time_ms,
        }
    }
}

/// Per-namespace statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceStats {
    pub vector_count: i64,
    pub memory_bytes: i64,
    pub dimensions: i32,
}

/// Database statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub total_vectors: i64,
    pub total_namespaces: i64,
    pub memory_usage_bytes: i64,
    pub namespace_stats: HashMap<String, NamespaceStats>,
}

impl From<proto::StatsResponse> for StatsSnapshot {
    fn from(r: proto::StatsResponse) -> Self {
        Self {
            total_vectors: r.total_vectors,
            total_namespaces: r.total_namespaces,
            memory_usage_bytes: r.memory_usage_bytes,
            namespace_stats: r
                .namespace_stats
                .into_iter()
                .map(|(ns, s)| {
                    (
                        ns,
                        NamespaceStats {
                            vector_count: s.vector_count,
                            memory_bytes: s.memory_bytes,
                            dimensions: s.dimensions,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// Server health
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    pub status: String,
    pub version: String,
    pub uptime_seconds: i64,
    pub details: HashMap<String, String>,
}

impl HealthSnapshot {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl From<proto::HealthCheckResponse> for HealthSnapshot {
    fn from(r: proto::HealthCheckResponse) -> Self {
        Self {
            status: r.status,
            version: r.version,
            uptime_seconds: r.uptime_seconds,
            details: r.details,
        }
    }
}

pub(crate) fn insert_id(response: proto::InsertResponse) -> Result<String> {
    check_status("insert", response.success, response.error)?;
    if response.id.is_empty() {
        return Err(Error::operation("insert", "server returned an empty id"));
    }
    Ok(response.id)
}

pub(crate) fn search_results(
    operation: &'static str,
    response: proto::SearchResponse,
    k: usize,
) -> Result<Vec<SearchResult>> {
    check_error(operation, response.error)?;

    let mut results = response.results;
    if results.len() > k {
        tracing::warn!(
            "{} returned {} results for k={}, truncating",
            operation,
            results.len(),
            k
        );
        results.truncate(k);
    }
    Ok(results.into_iter().map(SearchResult::from).collect())
}

pub(crate) fn update_ok(response: proto::UpdateResponse) -> Result<bool> {
    check_status("update", response.success, response.error)?;
    Ok(true)
}

pub(crate) fn deleted_count(response: proto::DeleteResponse) -> Result<i32> {
    check_status("delete", response.success, response.error)?;
    Ok(response.deleted_count)
}

fn check_status(operation: &'static str, success: bool, error: Option<String>) -> Result<()> {
    if !success {
        let message = error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(Error::operation(operation, message));
    }
    check_error(operation, error)
}

fn check_error(operation: &'static str, error: Option<String>) -> Result<()> {
    match error {
        Some(message) if !message.is_empty() => Err(Error::operation(operation, message)),
        _ => Ok(()),
    }
}

fn non_empty<T>(v: Vec<T>) -> Option<Vec<T>> {
    (!v.is_empty()).then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_result(id: &str) -> proto::SearchResult {
        proto::SearchResult {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_unset_fields_stay_unset() {
        let result = SearchResult::from(wire_result("1"));
        assert_eq!(result.distance, 0.0);
        assert!(result.vector.is_none());
        assert!(result.metadata.is_none());
        assert!(result.text.is_none());
        assert!(result.vector_score.is_none());
        assert!(result.text_score.is_none());
    }

    #[test]
    fn test_present_fields_keep_values() {
        let mut wire = wire_result("2");
        wire.vector = vec![0.1, 0.2];
        wire.metadata.insert("title".to_string(), "Doc".to_string());
        wire.text = Some(String::new());
        wire.vector_score = Some(0.0);
        wire.text_score = Some(1.5);

        let result = SearchResult::from(wire);
        assert_eq!(result.vector, Some(vec![0.1, 0.2]));
        assert_eq!(result.metadata.unwrap()["title"], "Doc");
        // An empty text the server set is not the same as no text
        assert_eq!(result.text.as_deref(), Some(""));
        assert_eq!(result.vector_score, Some(0.0));
        assert_eq!(result.text_score, Some(1.5));
    }

    #[test]
    fn test_serialization_skips_absent() {
        let result = SearchResult::from(wire_result("3"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!({"id": "3", "distance": 0.0}));
    }

    #[test]
    fn test_insert_failure_carries_message() {
        let err = insert_id(proto::InsertResponse {
            id: String::new(),
            success: false,
            error: Some("namespace is required".to_string()),
        })
        .unwrap_err();
        match err {
            Error::Operation { operation, message } => {
                assert_eq!(operation, "insert");
                assert_eq!(message, "namespace is required");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_insert_success() {
        let id = insert_id(proto::InsertResponse {
            id: "17".to_string(),
            success: true,
            error: None,
        })
        .unwrap();
        assert_eq!(id, "17");

        // success with an empty id is not usable
        let err = insert_id(proto::InsertResponse {
            success: true,
            ..Default::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_error_string_on_successful_flag() {
        let err = update_ok(proto::UpdateResponse {
            success: true,
            error: Some("partial failure".to_string()),
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "update failed: partial failure");
    }

    #[test]
    fn test_failure_without_message() {
        let err = deleted_count(proto::DeleteResponse {
            success: false,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "delete failed: unknown error");
    }

    #[test]
    fn test_search_error_and_truncation() {
        let err = search_results(
            "search",
            proto::SearchResponse {
                error: Some("query vector is required".to_string()),
                ..Default::default()
            },
            10,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Operation { .. }));

        let response = proto::SearchResponse {
            results: (0..5).map(|i| wire_result(&i.to_string())).collect(),
            total_results: 5,
            ..Default::default()
        };
        let results = search_results("search", response, 3).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "0");
        assert_eq!(results[2].id, "2");
    }

    #[test]
    fn test_empty_error_string_is_success() {
        let results = search_results(
            "search",
            proto::SearchResponse {
                error: Some(String::new()),
                ..Default::default()
            },
            10,
        )
        .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_stats_and_health() {
        let mut wire = proto::StatsResponse {
            total_vectors: 5,
            total_namespaces: 1,
            ..Default::default()
        };
        wire.namespace_stats.insert(
            "default".to_string(),
            proto::NamespaceStats {
                vector_count: 5,
                memory_bytes: 0,
                dimensions: 128,
            },
        );
        let stats = StatsSnapshot::from(wire);
        assert_eq!(stats.namespace_stats["default"].dimensions, 128);

        let health = HealthSnapshot::from(proto::HealthCheckResponse {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
            uptime_seconds: 12,
            details: HashMap::new(),
        });
        assert!(health.is_healthy());
    }
}
