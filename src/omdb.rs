use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::env;
use std::time::Duration;
use tracing::debug;

use crate::error::SearchError;
use crate::models::{DetailsResponse, MovieDetails, MovieSummary, SearchResponse};

pub const OMDB_BASE: &str = "https://www.omdbapi.com/";

#[async_trait]
pub trait OmdbApi: Send + Sync {
    /// Free-text title search. Returns the envelope exactly as OMDb sent it.
    async fn search_movies(&self, query: &str) -> Result<SearchResponse, SearchError>;
    /// Lookup by IMDb identifier. Returns the envelope exactly as OMDb sent it.
    async fn movie_details(&self, imdb_id: &str) -> Result<DetailsResponse, SearchError>;

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, SearchError> {
        self.search_movies(query).await?.into_result()
    }

    async fn details(&self, imdb_id: &str) -> Result<MovieDetails, SearchError> {
        self.movie_details(imdb_id).await?.into_result()
    }
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> anyhow::Result<Self> {
        let user_agent = format!("moviesearch/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build OMDb HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = env::var("OMDB_API_KEY").context("OMDB_API_KEY not set")?;
        let base_url = env::var("OMDB_BASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| OMDB_BASE.to_string());
        Self::new(api_key, base_url)
    }

    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?apikey={}&s={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        )
    }

    pub fn details_url(&self, imdb_id: &str) -> String {
        format!(
            "{}?apikey={}&i={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(imdb_id)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SearchError> {
        let res = self.client.get(url).send().await?;
        let status = res.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SearchError::RateLimited);
        }
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }
        let text = res.text().await?;
        serde_json::from_str(&text).map_err(|e| SearchError::Decode {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl OmdbApi for OmdbClient {
    async fn search_movies(&self, query: &str) -> Result<SearchResponse, SearchError> {
        debug!(query = %query, "OMDb title search");
        self.get_json(&self.search_url(query)).await
    }

    async fn movie_details(&self, imdb_id: &str) -> Result<DetailsResponse, SearchError> {
        debug!(imdb_id = %imdb_id, "OMDb details lookup");
        self.get_json(&self.details_url(imdb_id)).await
    }
}
