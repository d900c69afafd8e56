//! Similarity search request and response types
//!
//! The search service compares fixed-size rhythm vectors, so shorter
//! vectors are zero-padded before they are sent.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::vector::RhythmVector;

/// Dimensionality the search service indexes
pub const SEARCH_DIMENSIONS: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub rhythm_vector: Vec<f64>,
    pub bpm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(vector: &RhythmVector, bpm: f64) -> Result<Self> {
        if vector.len() > SEARCH_DIMENSIONS {
            return Err(GridError::VectorTooLong {
                len: vector.len(),
                max: SEARCH_DIMENSIONS,
            });
        }
        Ok(SearchQuery {
            rhythm_vector: vector.padded(SEARCH_DIMENSIONS),
            bpm,
            limit: None,
        })
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in the order the service expects: every vector
    /// element under a repeated `rhythm_vector` key, then `bpm`
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<_> = self
            .rhythm_vector
            .iter()
            .map(|v| ("rhythm_vector", v.to_string()))
            .collect();
        pairs.push(("bpm", self.bpm.to_string()));
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }

    pub fn to_query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// One match returned by the search service
///
/// Depending on the backend, `id` may be absent and `distance` may be null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub id: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub distance: Option<f64>,
}
