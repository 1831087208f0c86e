//! VectorDB client - typed access to the VectorDB gRPC service
//!
//! Builds well-formed wire requests from typed arguments, normalizes the
//! server's responses into a stable result model, streams batch inserts, and
//! forwards the hybrid-search fusion policy.
//!
//! - [`VectorDbClient`]: async facade, one per server session
//! - [`blocking::VectorDbClient`]: the same operations, synchronous
//! - [`VectorTransport`]: the seam for custom or in-process transports

mod batch;
pub mod blocking;
mod client;
mod config;
mod error;
mod filter;
mod fusion;
pub mod proto;
mod request;
mod response;
mod transport;

pub use batch::{BatchInsert, BatchState};
pub use client::VectorDbClient;
pub use config::ClientConfig;
pub use error::{Error, Result, TransportError};
pub use filter::{CompareOp, Filter, RangeBounds};
pub use fusion::{
    reciprocal_rank_score, weighted_score, FusionMethod, FusionPolicy,
    DEFAULT_RANK_FUSION_CONSTANT, DEFAULT_TEXT_WEIGHT, DEFAULT_VECTOR_WEIGHT,
};
pub use request::{
    DistanceMetric, HybridSearchQuery, Metadata, SearchQuery, UpdateFields, VectorRecord,
    DEFAULT_EF_SEARCH, DEFAULT_K,
};
pub use response::{BatchOutcome, HealthSnapshot, NamespaceStats, SearchResult, StatsSnapshot};
pub use transport::{Credential, Endpoint, GrpcTransport, Session, VectorTransport};
