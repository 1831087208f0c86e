//! In-process stub of the VectorDB server for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;

use vectordb_client::proto;
use vectordb_client::{
    reciprocal_rank_score, weighted_score, Error, FusionMethod, Result, TransportError,
    VectorTransport,
};

#[derive(Debug, Clone)]
struct Stored {
    id: String,
    vector: Vec<f32>,
    metadata: HashMap<String, String>,
    text: Option<String>,
}

#[derive(Default)]
struct State {
    namespaces: HashMap<String, Vec<Stored>>,
    next_id: u64,
    last_search: Option<proto::SearchRequest>,
    last_hybrid: Option<proto::HybridSearchRequest>,
    last_update: Option<proto::UpdateRequest>,
}

/// Stub server with switchable failure modes
#[derive(Default)]
pub struct StubServer {
    state: Mutex<State>,
    calls: AtomicUsize,
    batch_streams: AtomicUsize,
    /// Fail every call as if the server were down
    pub unreachable: AtomicBool,
    /// Never answer search calls
    pub stall_searches: AtomicBool,
    /// Reject inserts with this message
    pub insert_error: Mutex<Option<String>>,
    /// Drop the batch stream after this many items
    pub batch_disconnect_after: Mutex<Option<usize>>,
    /// Return more results than asked for
    pub overfill_results: AtomicBool,
}

impl StubServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of RPCs that reached the server
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batch_streams(&self) -> usize {
        self.batch_streams.load(Ordering::SeqCst)
    }

    pub fn last_search(&self) -> Option<proto::SearchRequest> {
        self.state.lock().unwrap().last_search.clone()
    }

    pub fn last_hybrid(&self) -> Option<proto::HybridSearchRequest> {
        self.state.lock().unwrap().last_hybrid.clone()
    }

    pub fn last_update(&self) -> Option<proto::UpdateRequest> {
        self.state.lock().unwrap().last_update.clone()
    }

    fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(TransportError::Unavailable {
                message: "tcp connect error: connection refused".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn insert_one(&self, req: proto::InsertRequest) -> proto::InsertResponse {
        let failure = |message: String| proto::InsertResponse {
            id: String::new(),
            success: false,
            error: Some(message),
        };

        if let Some(message) = self.insert_error.lock().unwrap().clone() {
            return failure(message);
        }
        if req.namespace.is_empty() {
            return failure("namespace is required".to_string());
        }
        if req.vector.is_empty() {
            return failure("vector is required".to_string());
        }

        let mut state = self.state.lock().unwrap();
        let dims = state
            .namespaces
            .get(&req.namespace)
            .and_then(|vs| vs.first())
            .map(|v| v.vector.len());
        if let Some(dims) = dims {
            if dims != req.vector.len() {
                return failure(format!(
                    "dimension mismatch: expected {}, got {}",
                    dims,
                    req.vector.len()
                ));
            }
        }

        let id = match req.id {
            Some(id) => id,
            None => {
                state.next_id += 1;
                state.next_id.to_string()
            }
        };
        state
            .namespaces
            .entry(req.namespace)
            .or_default()
            .push(Stored {
                id: id.clone(),
                vector: req.vector,
                metadata: req.metadata,
                text: req.text,
            });

        proto::InsertResponse {
            id,
            success: true,
            error: None,
        }
    }

    fn ranked(&self, namespace: &str, query: &[f32], metric: &str) -> Vec<(Stored, f32)> {
        let state = self.state.lock().unwrap();
        let mut scored: Vec<(Stored, f32)> = state
            .namespaces
            .get(namespace)
            .map(|vs| {
                vs.iter()
                    .map(|v| (v.clone(), distance(metric, query, &v.vector)))
                    .collect()
            })
            .unwrap_or_default();
        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }

    fn to_result(stored: &Stored, distance: f32) -> proto::SearchResult {
        proto::SearchResult {
            id: stored.id.clone(),
            distance,
            vector: stored.vector.clone(),
            metadata: stored.metadata.clone(),
            text: stored.text.clone(),
            vector_score: None,
            text_score: None,
        }
    }
}

fn distance(metric: &str, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match metric {
        "euclidean" => a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f32>()
            .sqrt(),
        "dot_product" => -dot,
        _ => {
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 {
                1.0
            } else {
                1.0 - dot / (na * nb)
            }
        }
    }
}

fn text_relevance(query: &str, text: Option<&str>) -> f32 {
    let Some(text) = text else { return 0.0 };
    let text = text.to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| text.contains(term))
        .count() as f32
}

#[async_trait]
impl VectorTransport for StubServer {
    async fn insert(&self, request: proto::InsertRequest) -> Result<proto::InsertResponse> {
        self.enter()?;
        Ok(self.insert_one(request))
    }

    async fn search(&self, request: proto::SearchRequest) -> Result<proto::SearchResponse> {
        self.enter()?;
        if self.stall_searches.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        self.state.lock().unwrap().last_search = Some(request.clone());

        let take = if self.overfill_results.load(Ordering::SeqCst) {
            usize::MAX
        } else {
            request.k as usize
        };
        let results: Vec<_> = self
            .ranked(&request.namespace, &request.query_vector, &request.distance_metric)
            .iter()
            .take(take)
            .map(|(s, d)| Self::to_result(s, *d))
            .collect();

        Ok(proto::SearchResponse {
            total_results: results.len() as i32,
            results,
            search_time_ms: 0.1,
            error: None,
        })
    }

    async fn hybrid_search(
        &self,
        request: proto::HybridSearchRequest,
    ) -> Result<proto::SearchResponse> {
        self.enter()?;
        self.state.lock().unwrap().last_hybrid = Some(request.clone());

        let config = request.config.clone().unwrap_or_default();
        let method: FusionMethod = match config.fusion_method.parse() {
            Ok(method) => method,
            Err(_) => {
                return Ok(proto::SearchResponse {
                    error: Some(format!("unknown fusion method {}", config.fusion_method)),
                    ..Default::default()
                })
            }
        };

        let by_vector = self.ranked(&request.namespace, &request.query_vector, "cosine");
        let mut by_text: Vec<(String, f32)> = by_vector
            .iter()
            .map(|(s, _)| (s.id.clone(), text_relevance(&request.query_text, s.text.as_deref())))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        by_text.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let max_text = by_text.first().map(|(_, s)| *s).unwrap_or(1.0);
        let max_dist = by_vector.iter().map(|(_, d)| *d).fold(0.0_f32, f32::max);

        let mut fused: Vec<(f64, proto::SearchResult)> = by_vector
            .iter()
            .enumerate()
            .map(|(vector_rank, (stored, dist))| {
                let text_pos = by_text.iter().position(|(id, _)| id == &stored.id);
                let text_score = text_pos.map(|p| by_text[p].1).unwrap_or(0.0);
                let score = match method {
                    FusionMethod::RankFusion => {
                        let mut ranks = vec![vector_rank + 1];
                        ranks.extend(text_pos.map(|p| p + 1));
                        reciprocal_rank_score(config.rrf_k.max(0) as u32, &ranks)
                    }
                    FusionMethod::Weighted => {
                        let vector_norm = if max_dist > 0.0 { 1.0 - dist / max_dist } else { 1.0 };
                        weighted_score(
                            config.vector_weight,
                            config.text_weight,
                            vector_norm,
                            text_score / max_text,
                        )
                    }
                };
                let mut result = Self::to_result(stored, *dist);
                result.vector_score = Some(*dist);
                result.text_score = Some(text_score);
                (score, result)
            })
            .collect();
        fused.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<_> = fused
            .into_iter()
            .take(request.k as usize)
            .map(|(_, r)| r)
            .collect();
        Ok(proto::SearchResponse {
            total_results: results.len() as i32,
            results,
            search_time_ms: 0.2,
            error: None,
        })
    }

    async fn batch_insert(
        &self,
        mut requests: BoxStream<'static, proto::InsertRequest>,
    ) -> Result<proto::BatchInsertResponse> {
        self.enter()?;
        self.batch_streams.fetch_add(1, Ordering::SeqCst);
        let disconnect_after = *self.batch_disconnect_after.lock().unwrap();

        let mut summary = proto::BatchInsertResponse::default();
        let mut position = 0usize;
        while let Some(request) = requests.next().await {
            if disconnect_after == Some(position) {
                return Err(Error::from(TransportError::Stream {
                    message: "connection reset by peer".to_string(),
                }));
            }
            let response = self.insert_one(request);
            if response.success {
                summary.inserted_count += 1;
                summary.inserted_ids.push(response.id);
            } else {
                summary.failed_count += 1;
                summary.errors.push(format!(
                    "item {}: {}",
                    position,
                    response.error.unwrap_or_default()
                ));
            }
            position += 1;
        }
        summary.total_time_ms = 1.0;
        Ok(summary)
    }

    async fn update(&self, request: proto::UpdateRequest) -> Result<proto::UpdateResponse> {
        self.enter()?;
        let mut state = self.state.lock().unwrap();
        state.last_update = Some(request.clone());

        let found = state
            .namespaces
            .get_mut(&request.namespace)
            .and_then(|vs| vs.iter_mut().find(|v| v.id == request.id));
        let Some(stored) = found else {
            return Ok(proto::UpdateResponse {
                success: false,
                error: Some(format!("vector {} not found", request.id)),
            });
        };

        if !request.vector.is_empty() {
            stored.vector = request.vector;
        }
        if !request.metadata.is_empty() {
            stored.metadata = request.metadata;
        }
        if let Some(text) = request.text {
            stored.text = if text.is_empty() { None } else { Some(text) };
        }
        Ok(proto::UpdateResponse {
            success: true,
            error: None,
        })
    }

    async fn delete(&self, request: proto::DeleteRequest) -> Result<proto::DeleteResponse> {
        self.enter()?;
        let Some(proto::delete_request::Selector::Id(id)) = request.selector else {
            return Ok(proto::DeleteResponse {
                success: false,
                error: Some("either id or filter must be specified".to_string()),
                ..Default::default()
            });
        };

        let mut state = self.state.lock().unwrap();
        let vectors = state.namespaces.entry(request.namespace).or_default();
        let before = vectors.len();
        vectors.retain(|v| v.id != id);
        if vectors.len() == before {
            return Ok(proto::DeleteResponse {
                success: false,
                error: Some(format!("vector {} not found", id)),
                ..Default::default()
            });
        }
        Ok(proto::DeleteResponse {
            deleted_count: 1,
            success: true,
            error: None,
        })
    }

    async fn get_stats(&self, request: proto::StatsRequest) -> Result<proto::StatsResponse> {
        self.enter()?;
        let state = self.state.lock().unwrap();
        let mut response = proto::StatsResponse::default();
        for (ns, vectors) in &state.namespaces {
            if request.namespace.as_deref().is_some_and(|wanted| wanted != ns) {
                continue;
            }
            response.total_vectors += vectors.len() as i64;
            response.total_namespaces += 1;
            response.namespace_stats.insert(
                ns.clone(),
                proto::NamespaceStats {
                    vector_count: vectors.len() as i64,
                    memory_bytes: 0,
                    dimensions: vectors.first().map(|v| v.vector.len() as i32).unwrap_or(0),
                },
            );
        }
        Ok(response)
    }

    async fn health_check(
        &self,
        _request: proto::HealthCheckRequest,
    ) -> Result<proto::HealthCheckResponse> {
        self.enter()?;
        let namespaces = self.state.lock().unwrap().namespaces.len();
        Ok(proto::HealthCheckResponse {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
            uptime_seconds: 42,
            details: HashMap::from([("namespaces".to_string(), namespaces.to_string())]),
        })
    }
}

/// Deterministic test vector
pub fn vector(seed: usize, dims: usize) -> Vec<f32> {
    (0..dims)
        .map(|j| ((seed * 31 + j * 17) % 97) as f32 / 97.0 + 0.01)
        .collect()
}
