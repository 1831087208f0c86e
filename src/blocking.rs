//! Synchronous client
//!
//! Wraps the async client with its own current-thread runtime. Do not use it
//! from inside an async context; use [`crate::VectorDbClient`] there.

use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{HybridSearchQuery, Metadata, SearchQuery, UpdateFields, VectorRecord};
use crate::response::{BatchOutcome, HealthSnapshot, SearchResult, StatsSnapshot};
use crate::transport::VectorTransport;

/// Blocking counterpart of [`crate::VectorDbClient`]
#[derive(Debug)]
pub struct VectorDbClient {
    inner: client::VectorDbClient,
    runtime: Runtime,
}

impl VectorDbClient {
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let runtime = new_runtime()?;
        let inner = runtime.block_on(client::VectorDbClient::connect(config))?;
        Ok(Self { inner, runtime })
    }

    pub fn from_transport(transport: Arc<dyn VectorTransport>) -> Result<Self> {
        Ok(Self {
            inner: client::VectorDbClient::from_transport(transport),
            runtime: new_runtime()?,
        })
    }

    pub fn close(&self) {
        self.inner.close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn insert(&self, record: VectorRecord) -> Result<String> {
        self.runtime.block_on(self.inner.insert(record))
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        self.runtime.block_on(self.inner.search(query))
    }

    pub fn hybrid_search(&self, query: &HybridSearchQuery) -> Result<Vec<SearchResult>> {
        self.runtime.block_on(self.inner.hybrid_search(query))
    }

    pub fn batch_insert(&self, namespace: &str, items: Vec<(Vec<f32>, Metadata)>) -> Result<BatchOutcome> {
        self.runtime.block_on(self.inner.batch_insert(namespace, items))
    }

    pub fn update(&self, namespace: &str, id: &str, fields: UpdateFields) -> Result<bool> {
        self.runtime.block_on(self.inner.update(namespace, id, fields))
    }

    pub fn delete(&self, namespace: &str, id: &str) -> Result<i32> {
        self.runtime.block_on(self.inner.delete(namespace, id))
    }

    pub fn get_stats(&self, namespace: Option<&str>) -> Result<StatsSnapshot> {
        self.runtime.block_on(self.inner.get_stats(namespace))
    }

    pub fn health_check(&self) -> Result<HealthSnapshot> {
        self.runtime.block_on(self.inner.health_check())
    }
}

fn new_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Configuration(format!("failed to start runtime: {}", e)))
}
