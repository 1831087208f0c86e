//! Wire messages for the `vector.VectorDB` service
//!
//! Mirrors `proto/vector.proto` field for field. The server owns this
//! contract, so names, tags and optionality here must not drift from it.
//! proto3 `optional` scalars map to `Option<T>` and keep presence; repeated
//! and map fields have no presence and are empty when unset.

use std::collections::HashMap;

/// RPC method paths
pub mod path {
    pub const INSERT: &str = "/vector.VectorDB/Insert";
    pub const SEARCH: &str = "/vector.VectorDB/Search";
    pub const HYBRID_SEARCH: &str = "/vector.VectorDB/HybridSearch";
    pub const DELETE: &str = "/vector.VectorDB/Delete";
    pub const UPDATE: &str = "/vector.VectorDB/Update";
    pub const BATCH_INSERT: &str = "/vector.VectorDB/BatchInsert";
    pub const GET_STATS: &str = "/vector.VectorDB/GetStats";
    pub const HEALTH_CHECK: &str = "/vector.VectorDB/HealthCheck";
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InsertRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(float, repeated, tag = "2")]
    pub vector: Vec<f32>,
    #[prost(map = "string, string", tag = "3")]
    pub metadata: HashMap<String, String>,
    #[prost(string, optional, tag = "4")]
    pub text: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub id: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InsertResponse {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, optional, tag = "3")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(float, repeated, tag = "2")]
    pub query_vector: Vec<f32>,
    #[prost(int32, tag = "3")]
    pub k: i32,
    #[prost(int32, tag = "4")]
    pub ef_search: i32,
    #[prost(message, optional, tag = "5")]
    pub filter: Option<Filter>,
    #[prost(string, tag = "6")]
    pub distance_metric: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HybridSearchConfig {
    #[prost(string, tag = "1")]
    pub fusion_method: String,
    #[prost(float, tag = "2")]
    pub vector_weight: f32,
    #[prost(float, tag = "3")]
    pub text_weight: f32,
    #[prost(int32, tag = "4")]
    pub rrf_k: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HybridSearchRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(float, repeated, tag = "2")]
    pub query_vector: Vec<f32>,
    #[prost(string, tag = "3")]
    pub query_text: String,
    #[prost(int32, tag = "4")]
    pub k: i32,
    #[prost(int32, tag = "5")]
    pub ef_search: i32,
    #[prost(message, optional, tag = "6")]
    pub filter: Option<Filter>,
    #[prost(message, optional, tag = "7")]
    pub config: Option<HybridSearchConfig>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchResult {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(float, tag = "2")]
    pub distance: f32,
    #[prost(float, repeated, tag = "3")]
    pub vector: Vec<f32>,
    #[prost(map = "string, string", tag = "4")]
    pub metadata: HashMap<String, String>,
    #[prost(string, optional, tag = "5")]
    pub text: Option<String>,
    #[prost(float, optional, tag = "6")]
    pub vector_score: Option<f32>,
    #[prost(float, optional, tag = "7")]
    pub text_score: Option<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SearchResponse {
    #[prost(message, repeated, tag = "1")]
    pub results: Vec<SearchResult>,
    #[prost(int32, tag = "2")]
    pub total_results: i32,
    #[prost(float, tag = "3")]
    pub search_time_ms: f32,
    #[prost(string, optional, tag = "4")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(oneof = "delete_request::Selector", tags = "2, 3")]
    pub selector: Option<delete_request::Selector>,
}

pub mod delete_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Selector {
        #[prost(string, tag = "2")]
        Id(String),
        #[prost(message, tag = "3")]
        Filter(super::Filter),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeleteResponse {
    #[prost(int32, tag = "1")]
    pub deleted_count: i32,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(string, optional, tag = "3")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(string, tag = "2")]
    pub id: String,
    #[prost(float, repeated, tag = "3")]
    pub vector: Vec<f32>,
    #[prost(map = "string, string", tag = "4")]
    pub metadata: HashMap<String, String>,
    #[prost(string, optional, tag = "5")]
    pub text: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpdateResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
    #[prost(string, optional, tag = "2")]
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchInsertResponse {
    #[prost(int32, tag = "1")]
    pub inserted_count: i32,
    #[prost(int32, tag = "2")]
    pub failed_count: i32,
    #[prost(string, repeated, tag = "3")]
    pub inserted_ids: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    pub errors: Vec<String>,
    #[prost(float, tag = "5")]
    pub total_time_ms: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatsRequest {
    #[prost(string, optional, tag = "1")]
    pub namespace: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NamespaceStats {
    #[prost(int64, tag = "1")]
    pub vector_count: i64,
    #[prost(int64, tag = "2")]
    pub memory_bytes: i64,
    #[prost(int32, tag = "3")]
    pub dimensions: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatsResponse {
    #[prost(int64, tag = "1")]
    pub total_vectors: i64,
    #[prost(int64, tag = "2")]
    pub total_namespaces: i64,
    #[prost(int64, tag = "3")]
    pub memory_usage_bytes: i64,
    #[prost(map = "string, message", tag = "4")]
    pub namespace_stats: HashMap<String, NamespaceStats>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthCheckRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HealthCheckResponse {
    #[prost(string, tag = "1")]
    pub status: String,
    #[prost(string, tag = "2")]
    pub version: String,
    #[prost(int64, tag = "3")]
    pub uptime_seconds: i64,
    #[prost(map = "string, string", tag = "4")]
    pub details: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Filter {
    #[prost(oneof = "filter::FilterType", tags = "1, 2, 3, 4, 5, 6")]
    pub filter_type: Option<filter::FilterType>,
}

pub mod filter {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum FilterType {
        #[prost(message, tag = "1")]
        Comparison(super::ComparisonFilter),
        #[prost(message, tag = "2")]
        Range(super::RangeFilter),
        #[prost(message, tag = "3")]
        List(super::ListFilter),
        #[prost(message, tag = "4")]
        GeoRadius(super::GeoRadiusFilter),
        #[prost(message, tag = "5")]
        Exists(super::ExistsFilter),
        #[prost(message, tag = "6")]
        Composite(super::CompositeFilter),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ComparisonFilter {
    #[prost(string, tag = "1")]
    pub field: String,
    #[prost(string, tag = "2")]
    pub operator: String,
    #[prost(string, tag = "3")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RangeFilter {
    #[prost(string, tag = "1")]
    pub field: String,
    #[prost(string, optional, tag = "2")]
    pub gt: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub gte: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub lt: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub lte: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ListFilter {
    #[prost(string, tag = "1")]
    pub field: String,
    #[prost(string, tag = "2")]
    pub operator: String,
    #[prost(string, repeated, tag = "3")]
    pub values: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoRadiusFilter {
    #[prost(string, tag = "1")]
    pub field: String,
    #[prost(double, tag = "2")]
    pub latitude: f64,
    #[prost(double, tag = "3")]
    pub longitude: f64,
    #[prost(double, tag = "4")]
    pub radius_km: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExistsFilter {
    #[prost(string, tag = "1")]
    pub field: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CompositeFilter {
    #[prost(string, tag = "1")]
    pub operator: String,
    #[prost(message, repeated, tag = "2")]
    pub filters: Vec<Filter>,
}
