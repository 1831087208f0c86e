//! Request building - typed arguments to wire requests
//!
//! Defaults are applied here and every precondition is checked before a
//! request leaves the process. Optional fields stay optional: `None` is sent
//! as "not set", never as an empty string or zero.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::fusion::FusionPolicy;
use crate::proto;

/// Default number of results
pub const DEFAULT_K: u32 = 10;
/// Default HNSW search breadth
pub const DEFAULT_EF_SEARCH: u32 = 50;

/// Metadata attached to a vector
pub type Metadata = HashMap<String, String>;

/// Similarity function used to rank candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

impl DistanceMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::DotProduct => "dot_product",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "euclidean" | "l2" => Ok(DistanceMetric::Euclidean),
            "dot_product" | "dot" => Ok(DistanceMetric::DotProduct),
            other => Err(Error::validation(format!("unknown distance metric: {}", other))),
        }
    }
}

/// A vector to insert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub namespace: String,
    pub vector: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Text for full-text search
    #[serde(default)]
    pub text: Option<String>,
    /// Custom ID; the server assigns one when unset
    #[serde(default)]
    pub id: Option<String>,
}

impl VectorRecord {
    pub fn new(namespace: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            namespace: namespace.into(),
            vector,
            metadata: Metadata::new(),
            text: None,
            id: None,
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Add a single metadata entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub(crate) fn to_wire(&self) -> Result<proto::InsertRequest> {
        require_namespace(&self.namespace)?;
        if self.vector.is_empty() {
            return Err(Error::validation("vector must not be empty"));
        }

        Ok(proto::InsertRequest {
            namespace: self.namespace.clone(),
            vector: self.vector.clone(),
            metadata: self.metadata.clone(),
            text: self.text.clone(),
            id: self.id.clone(),
        })
    }
}

/// K-nearest-neighbor query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub namespace: String,
    pub query_vector: Vec<f32>,
    /// Number of results to return
    pub k: u32,
    /// HNSW search breadth (accuracy vs speed)
    pub ef_search: u32,
    pub distance_metric: DistanceMetric,
    pub filter: Option<Filter>,
}

impl SearchQuery {
    pub fn new(namespace: impl Into<String>, query_vector: Vec<f32>) -> Self {
        Self {
            namespace: namespace.into(),
            query_vector,
            k: DEFAULT_K,
            ef_search: DEFAULT_EF_SEARCH,
            distance_metric: DistanceMetric::default(),
            filter: None,
        }
    }

    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }

    pub fn with_ef_search(mut self, ef_search: u32) -> Self {
        self.ef_search = ef_search;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub(crate) fn to_wire(&self) -> Result<proto::SearchRequest> {
        let (k, ef_search, filter) = checked_params(
            &self.namespace,
            &self.query_vector,
            self.k,
            self.ef_search,
            self.filter.as_ref(),
        )?;
        Ok(proto::SearchRequest {
            namespace: self.namespace.clone(),
            query_vector: self.query_vector.clone(),
            k,
            ef_search,
            filter,
            distance_metric: self.distance_metric.as_str().to_string(),
        })
    }
}

/// Vector + full-text query combined by a fusion policy
///
/// The server ranks the vector side by its own configured metric, so there
/// is no distance metric here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridSearchQuery {
    pub namespace: String,
    pub query_vector: Vec<f32>,
    /// Full-text query; empty means vector-only scoring on the server
    pub query_text: String,
    pub k: u32,
    pub ef_search: u32,
    pub filter: Option<Filter>,
    pub fusion: FusionPolicy,
}

impl HybridSearchQuery {
    pub fn new(
        namespace: impl Into<String>,
        query_vector: Vec<f32>,
        query_text: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            query_vector,
            query_text: query_text.into(),
            k: DEFAULT_K,
            ef_search: DEFAULT_EF_SEARCH,
            filter: None,
            fusion: FusionPolicy::default(),
        }
    }

    pub fn with_k(mut self, k: u32) -> Self {
        self.k = k;
        self
    }

    pub fn with_ef_search(mut self, ef_search: u32) -> Self {
        self.ef_search = ef_search;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_fusion(mut self, fusion: FusionPolicy) -> Self {
        self.fusion = fusion;
        self
    }

    pub(crate) fn to_wire(&self) -> Result<proto::HybridSearchRequest> {
        let (k, ef_search, filter) = checked_params(
            &self.namespace,
            &self.query_vector,
            self.k,
            self.ef_search,
            self.filter.as_ref(),
        )?;
        Ok(proto::HybridSearchRequest {
            namespace: self.namespace.clone(),
            query_vector: self.query_vector.clone(),
            query_text: self.query_text.clone(),
            k,
            ef_search,
            filter,
            config: Some(self.fusion.to_wire()?),
        })
    }
}

/// Validated (k, ef_search, filter) shared by plain and hybrid search
fn checked_params(
    namespace: &str,
    query_vector: &[f32],
    k: u32,
    ef_search: u32,
    filter: Option<&Filter>,
) -> Result<(i32, i32, Option<proto::Filter>)> {
    require_namespace(namespace)?;
    if query_vector.is_empty() {
        return Err(Error::validation("query vector must not be empty"));
    }
    let k = positive_i32("k", k)?;
    let ef_search = positive_i32("ef_search", ef_search)?;
    let filter = filter.map(Filter::to_wire).transpose()?;
    Ok((k, ef_search, filter))
}

/// Fields to change on an existing vector; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFields {
    pub vector: Option<Vec<f32>>,
    pub metadata: Option<Metadata>,
    /// `Some("")` clears the stored text
    pub text: Option<String>,
}

impl UpdateFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_none() && self.metadata.is_none() && self.text.is_none()
    }
}

pub(crate) fn update_request(
    namespace: &str,
    id: &str,
    fields: &UpdateFields,
) -> Result<proto::UpdateRequest> {
    require_namespace(namespace)?;
    require_id(id)?;

    // Repeated and map fields carry no presence on the wire: an empty one
    // reads as "keep", so an explicit empty value cannot be sent faithfully.
    let vector = match &fields.vector {
        Some(v) if v.is_empty() => {
            return Err(Error::validation("update vector must not be empty"));
        }
        Some(v) => v.clone(),
        None => Vec::new(),
    };
    let metadata = match &fields.metadata {
        Some(m) if m.is_empty() => {
            return Err(Error::validation(
                "clearing metadata is not expressible on the wire; pass None to keep it",
            ));
        }
        Some(m) => m.clone(),
        None => Metadata::new(),
    };

    Ok(proto::UpdateRequest {
        namespace: namespace.to_string(),
        id: id.to_string(),
        vector,
        metadata,
        text: fields.text.clone(),
    })
}

pub(crate) fn delete_request(namespace: &str, id: &str) -> Result<proto::DeleteRequest> {
    require_namespace(namespace)?;
    require_id(id)?;
    Ok(proto::DeleteRequest {
        namespace: namespace.to_string(),
        selector: Some(proto::delete_request::Selector::Id(id.to_string())),
    })
}

pub(crate) fn stats_request(namespace: Option<&str>) -> Result<proto::StatsRequest> {
    if let Some(ns) = namespace {
        require_namespace(ns)?;
    }
    Ok(proto::StatsRequest {
        namespace: namespace.map(str::to_string),
    })
}

pub(crate) fn batch_item(namespace: &str, vector: Vec<f32>, metadata: Metadata) -> proto::InsertRequest {
    proto::InsertRequest {
        namespace: namespace.to_string(),
        vector,
        metadata,
        text: None,
        id: None,
    }
}

pub(crate) fn require_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Err(Error::validation("namespace must not be empty"));
    }
    Ok(())
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::validation("id must not be empty"));
    }
    Ok(())
}

fn positive_i32(name: &str, value: u32) -> Result<i32> {
    if value < 1 {
        return Err(Error::validation(format!("{} must be >= 1", name)));
    }
    i32::try_from(value).map_err(|_| Error::validation(format!("{} is too large: {}", name, value)))
}
