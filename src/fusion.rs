//! Hybrid search fusion policy
//!
//! The server does the actual scoring. The client picks a strategy, forwards
//! its parameters untouched, and offers the same formulas as pure functions
//! so callers can audit the `vector_score`/`text_score` pairs they get back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::proto;

/// Default constant for reciprocal rank fusion
pub const DEFAULT_RANK_FUSION_CONSTANT: u32 = 60;
/// Default weight for vector similarity
pub const DEFAULT_VECTOR_WEIGHT: f32 = 0.7;
/// Default weight for text relevance
pub const DEFAULT_TEXT_WEIGHT: f32 = 0.3;

/// How hybrid search combines the vector and text rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionMethod {
    /// Reciprocal rank fusion
    RankFusion,
    /// Linear combination of normalized scores
    Weighted,
}

impl FusionMethod {
    /// Name used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            FusionMethod::RankFusion => "rrf",
            FusionMethod::Weighted => "weighted",
        }
    }
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FusionMethod {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rrf" | "rank_fusion" => Ok(FusionMethod::RankFusion),
            "weighted" => Ok(FusionMethod::Weighted),
            other => Err(Error::validation(format!("unknown fusion method: {}", other))),
        }
    }
}

/// Fusion strategy and its parameters
///
/// The wire descriptor always carries both weights and the rank constant, so
/// all three are kept regardless of which method is selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionPolicy {
    pub method: FusionMethod,
    pub vector_weight: f32,
    pub text_weight: f32,
    pub rank_fusion_constant: u32,
}

impl Default for FusionPolicy {
    fn default() -> Self {
        Self::rank_fusion(DEFAULT_RANK_FUSION_CONSTANT)
    }
}

impl FusionPolicy {
    /// Reciprocal rank fusion with the given constant
    pub fn rank_fusion(constant: u32) -> Self {
        Self {
            method: FusionMethod::RankFusion,
            vector_weight: DEFAULT_VECTOR_WEIGHT,
            text_weight: DEFAULT_TEXT_WEIGHT,
            rank_fusion_constant: constant,
        }
    }

    /// Weighted score fusion; weights are forwarded as given
    pub fn weighted(vector_weight: f32, text_weight: f32) -> Self {
        Self {
            method: FusionMethod::Weighted,
            vector_weight,
            text_weight,
            rank_fusion_constant: DEFAULT_RANK_FUSION_CONSTANT,
        }
    }

    /// Combined score for one candidate
    ///
    /// For rank fusion `ranks` holds the 1-based positions the candidate has
    /// in the vector and text lists (`None` when absent from a list). For
    /// weighted fusion `scores` holds its normalized scores.
    pub fn score(&self, ranks: (Option<usize>, Option<usize>), scores: (f32, f32)) -> f64 {
        match self.method {
            FusionMethod::RankFusion => {
                let ranks: Vec<usize> = [ranks.0, ranks.1].into_iter().flatten().collect();
                reciprocal_rank_score(self.rank_fusion_constant, &ranks)
            }
            FusionMethod::Weighted => {
                weighted_score(self.vector_weight, self.text_weight, scores.0, scores.1)
            }
        }
    }

    pub(crate) fn to_wire(&self) -> Result<proto::HybridSearchConfig> {
        let rrf_k = i32::try_from(self.rank_fusion_constant).map_err(|_| {
            Error::validation(format!(
                "rank fusion constant is too large: {}",
                self.rank_fusion_constant
            ))
        })?;
        Ok(proto::HybridSearchConfig {
            fusion_method: self.method.as_str().to_string(),
            vector_weight: self.vector_weight,
            text_weight: self.text_weight,
            rrf_k,
        })
    }
}

/// Σ 1 / (constant + rank) over the lists a candidate appears in
pub fn reciprocal_rank_score(constant: u32, ranks: &[usize]) -> f64 {
    ranks
        .iter()
        .map(|&rank| 1.0 / (constant as f64 + rank as f64))
        .sum()
}

/// vector_weight * vector_score + text_weight * text_score
pub fn weighted_score(vector_weight: f32, text_weight: f32, vector_score: f32, text_score: f32) -> f64 {
    vector_weight as f64 * vector_score as f64 + text_weight as f64 * text_score as f64
}
