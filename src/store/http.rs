//! REST adapter for the mental-games API.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | submit | `POST <slug>/` with the flat payload |
//! | stats (digit span, puzzle, arithmetic) | `GET <slug>-stats/` |
//! | stats (other games) | `GET <slug>/`, aggregated locally |
//! | dashboard | `GET dashboard-stats/` |

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url, redirect};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::schema::StoreConfig;
use crate::contract::{DashboardSummary, GameStats, StoredResult, SubmissionPayload, summarize};
use crate::error::StoreError;
use crate::game::GameId;

use super::ResultStore;

/// Largest response body accepted from the store.
const MAX_RESPONSE_SIZE: usize = 4 * 1024 * 1024;

/// Result store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpResultStore {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpResultStore {
    /// Builds a store client from `config`.
    ///
    /// Redirects are not followed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Request`] if the base URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let mut base = Url::parse(&config.base_url)
            .map_err(|e| StoreError::Request(format!("invalid base URL '{}': {e}", config.base_url)))?;
        // Url::join drops the last segment unless the path ends in '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;
        Ok(Self {
            client,
            base,
            token: config.token.clone(),
        })
    }

    /// Absolute URL of `path` under the base.
    fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        self.base
            .join(path)
            .map_err(|e| StoreError::Request(format!("invalid endpoint '{path}': {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "fetching from result store");
        let response = self.request(Method::GET, url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        if bytes.len() > MAX_RESPONSE_SIZE {
            return Err(StoreError::Decode(format!(
                "response body exceeds {MAX_RESPONSE_SIZE} byte limit"
            )));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl ResultStore for HttpResultStore {
    async fn submit_result(&self, payload: &SubmissionPayload) -> Result<(), StoreError> {
        let path = format!("{}/", payload.game().slug());
        let url = self.endpoint(&path)?;
        debug!(url = %url, "submitting result");
        let response = self.request(Method::POST, url).json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                endpoint: path,
            });
        }
        Ok(())
    }

    async fn fetch_stats(&self, game: GameId) -> Result<GameStats, StoreError> {
        match game.stats_path() {
            Some(stats) => self.get_json(&format!("{stats}/")).await,
            None => {
                let results: Vec<StoredResult> =
                    self.get_json(&format!("{}/", game.slug())).await?;
                Ok(summarize(game, &results))
            }
        }
    }

    async fn fetch_dashboard(&self) -> Result<DashboardSummary, StoreError> {
        self.get_json("dashboard-stats/").await
    }
}
