//! HTTP client for the rhythm similarity search service

use anyhow::{Context, Result};
use drumgrid_core::{SearchQuery, SearchResult};
use reqwest::blocking::{Client, Request};

pub struct SearchClient {
    base_url: String,
    http: Client,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/search", self.base_url)
    }

    /// Build the GET request for `query` without sending it
    pub fn request(&self, query: &SearchQuery) -> Result<Request> {
        self.http
            .get(self.endpoint())
            .query(&query.query_pairs())
            .build()
            .with_context(|| format!("Invalid search URL: {}", self.endpoint()))
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let request = self.request(query)?;
        tracing::info!(url = %request.url(), "querying similarity search");

        let results: Vec<SearchResult> = self
            .http
            .execute(request)
            .with_context(|| format!("Failed to reach search service at {}", self.base_url))?
            .error_for_status()
            .context("Search service returned an error")?
            .json()
            .context("Failed to parse search results")?;

        tracing::debug!(matches = results.len(), "search finished");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drumgrid_core::RhythmVector;

    #[test]
    fn test_endpoint_trims_slash() {
        let client = SearchClient::new("http://localhost:8000/");
        assert_eq!(client.endpoint(), "http://localhost:8000/api/search");
    }

    #[test]
    fn test_request_carries_padded_vector() {
        let client = SearchClient::new("http://localhost:8000");
        let vector = RhythmVector::from(vec![1.0, 0.5, 0.0, 0.25]);
        let query = SearchQuery::new(&vector, 120.0).unwrap().with_limit(5);
        let request = client.request(&query).unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/api/search");

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let vector_values: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| k == "rhythm_vector")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(vector_values.len(), 32);
        assert_eq!(&vector_values[..5], &["1", "0.5", "0", "0.25", "0"]);
        assert!(pairs.contains(&("bpm".to_string(), "120".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "5".to_string())));
    }

    #[test]
    fn test_bad_base_url() {
        let client = SearchClient::new("not a url");
        let query = SearchQuery::new(&RhythmVector::default(), 120.0).unwrap();
        assert!(client.request(&query).is_err());
    }
}
