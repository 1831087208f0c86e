//! VectorDB client facade
//!
//! ```no_run
//! use vectordb_client::{ClientConfig, SearchQuery, VectorDbClient, VectorRecord};
//!
//! # async fn run() -> vectordb_client::Result<()> {
//! let client = VectorDbClient::connect(ClientConfig::new("localhost:50051")).await?;
//!
//! let id = client
//!     .insert(VectorRecord::new("default", vec![0.1, 0.2, 0.3, 0.4]).with_entry("title", "Vector DB"))
//!     .await?;
//!
//! let results = client
//!     .search(&SearchQuery::new("default", vec![0.1, 0.2, 0.3, 0.4]).with_k(10))
//!     .await?;
//! for result in &results {
//!     println!("{} {}", result.id, result.distance);
//! }
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::batch::BatchInsert;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::proto;
use crate::request::{self, HybridSearchQuery, Metadata, SearchQuery, UpdateFields, VectorRecord};
use crate::response::{self, BatchOutcome, HealthSnapshot, SearchResult, StatsSnapshot};
use crate::transport::{Endpoint, Session, VectorTransport};

/// Client for one VectorDB server
///
/// Owns exactly one session. All methods take `&self` and share no
/// request state, so a client can be used from several tasks behind an
/// `Arc`. The session is closed by [`close`](Self::close) or on drop.
#[derive(Debug)]
pub struct VectorDbClient {
    session: Session,
    batch_buffer: usize,
}

impl VectorDbClient {
    /// Open a session to the configured server
    ///
    /// Connection happens lazily; an unreachable server is reported by the
    /// first call. Configuration problems are reported here.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let endpoint = Endpoint::from_config(&config)?;
        let session = Session::open(&endpoint, &config)?;
        Ok(Self {
            session,
            batch_buffer: config.batch_buffer,
        })
    }

    /// Use a caller-provided transport
    pub fn from_transport(transport: Arc<dyn VectorTransport>) -> Self {
        Self {
            session: Session::from_transport(transport),
            batch_buffer: ClientConfig::default().batch_buffer,
        }
    }

    /// Close the session; later calls fail with `SessionClosed`
    pub fn close(&self) {
        self.session.close();
    }

    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Insert a single vector, returning its ID
    pub async fn insert(&self, record: VectorRecord) -> Result<String> {
        let request = record.to_wire()?;
        let response = self
            .session
            .call("insert", move |t| async move { t.insert(request).await })
            .await?;
        response::insert_id(response)
    }

    /// K-nearest-neighbor search
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let request = query.to_wire()?;
        let k = query.k as usize;
        let response = self
            .session
            .call("search", move |t| async move { t.search(request).await })
            .await?;
        let results = response::search_results("search", response, k)?;
        debug!("search in '{}' returned {} results", query.namespace, results.len());
        Ok(results)
    }

    /// Vector + full-text search combined by the query's fusion policy
    pub async fn hybrid_search(&self, query: &HybridSearchQuery) -> Result<Vec<SearchResult>> {
        let request = query.to_wire()?;
        let k = query.k as usize;
        let response = self
            .session
            .call("hybrid_search", move |t| async move { t.hybrid_search(request).await })
            .await?;
        let results = response::search_results("hybrid_search", response, k)?;
        debug!(
            "hybrid search in '{}' ({}) returned {} results",
            query.namespace,
            query.fusion.method,
            results.len()
        );
        Ok(results)
    }

    /// Insert many vectors over one stream
    ///
    /// Items rejected by the server are reported in the outcome, not as an
    /// error.
    pub async fn batch_insert(
        &self,
        namespace: &str,
        items: Vec<(Vec<f32>, Metadata)>,
    ) -> Result<BatchOutcome> {
        BatchInsert::new(namespace, items, self.batch_buffer)
            .run(&self.session)
            .await
    }

    /// Update fields of an existing vector; unset fields are left unchanged
    pub async fn update(&self, namespace: &str, id: &str, fields: UpdateFields) -> Result<bool> {
        let request = request::update_request(namespace, id, &fields)?;
        let response = self
            .session
            .call("update", move |t| async move { t.update(request).await })
            .await?;
        response::update_ok(response)
    }

    /// Delete a vector by ID, returning the number deleted
    pub async fn delete(&self, namespace: &str, id: &str) -> Result<i32> {
        let request = request::delete_request(namespace, id)?;
        let response = self
            .session
            .call("delete", move |t| async move { t.delete(request).await })
            .await?;
        response::deleted_count(response)
    }

    /// Database statistics, for one namespace or all of them
    pub async fn get_stats(&self, namespace: Option<&str>) -> Result<StatsSnapshot> {
        let request = request::stats_request(namespace)?;
        let response = self
            .session
            .call("get_stats", move |t| async move { t.get_stats(request).await })
            .await?;
        Ok(response.into())
    }

    pub async fn health_check(&self) -> Result<HealthSnapshot> {
        let response = self
            .session
            .call("health_check", |t| async move {
                t.health_check(proto::HealthCheckRequest {}).await
            })
            .await?;
        Ok(response.into())
    }
}
