//! Transport trait - one method per VectorDB RPC

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::proto;

/// A channel to one VectorDB server
///
/// Implementations map their own failures onto [`crate::Error`]: channel
/// problems as `Error::Transport`, server-side rejections as
/// `Error::Operation`. Request validation has already happened by the time a
/// method is called.
#[async_trait]
pub trait VectorTransport: Send + Sync {
    async fn insert(&self, request: proto::InsertRequest) -> Result<proto::InsertResponse>;

    async fn search(&self, request: proto::SearchRequest) -> Result<proto::SearchResponse>;

    async fn hybrid_search(
        &self,
        request: proto::HybridSearchRequest,
    ) -> Result<proto::SearchResponse>;

    /// Client-streaming insert; the stream ends after the last item
    async fn batch_insert(
        &self,
        requests: BoxStream<'static, proto::InsertRequest>,
    ) -> Result<proto::BatchInsertResponse>;

    async fn update(&self, request: proto::UpdateRequest) -> Result<proto::UpdateResponse>;

    async fn delete(&self, request: proto::DeleteRequest) -> Result<proto::DeleteResponse>;

    async fn get_stats(&self, request: proto::StatsRequest) -> Result<proto::StatsResponse>;

    async fn health_check(
        &self,
        request: proto::HealthCheckRequest,
    ) -> Result<proto::HealthCheckResponse>;
}
