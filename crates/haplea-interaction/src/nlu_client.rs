//! NLU classify client.
//!
//! Calls the external classifier REST endpoint and returns the entity
//! bundle. The service is best-effort and untrusted: malformed or missing
//! response fields deserialize to the empty bundle, while transport and
//! status failures surface as `ClassificationUnavailable`, never as a
//! synthesized fallback command.
//!
//! Configuration priority: ~/.config/haplea/config.toml > environment
//! variables.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use haplea_core::command::EntityBundle;
use haplea_core::error::{HapleaError, Result};

use crate::config::ServiceConfig;

const DEFAULT_BASE_URL: &str = "https://api.wit.ai/message";
const DEFAULT_API_VERSION: &str = "20191216";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Anything that can classify free-form query text into an entity bundle.
///
/// The trait seam exists so consumers (and tests) can swap the live HTTP
/// client for a canned classifier.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, query: &str) -> Result<EntityBundle>;
}

/// Classifier implementation that talks to the wit-style HTTP API.
#[derive(Clone)]
pub struct WitClient {
    client: Client,
    token: String,
    base_url: String,
    api_version: String,
}

impl WitClient {
    /// Creates a new client with the provided bearer token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Loads configuration from the service config file or environment.
    ///
    /// Priority:
    /// 1. ~/.config/haplea/config.toml (`[nlu]` section)
    /// 2. Environment variables (HAPLEA_NLU_TOKEN, HAPLEA_NLU_URL)
    pub fn try_from_env() -> Result<Self> {
        if let Ok(config) = ServiceConfig::load() {
            if let Some(nlu) = config.nlu {
                let mut client = Self::new(nlu.token);
                if let Some(url) = nlu.base_url {
                    client = client.with_base_url(url);
                }
                if let Some(version) = nlu.api_version {
                    client = client.with_api_version(version);
                }
                return Ok(client);
            }
        }

        let token = env::var("HAPLEA_NLU_TOKEN").map_err(|_| {
            HapleaError::config(
                "HAPLEA_NLU_TOKEN not found in ~/.config/haplea/config.toml or environment",
            )
        })?;

        let mut client = Self::new(token);
        if let Ok(url) = env::var("HAPLEA_NLU_URL") {
            client = client.with_base_url(url);
        }
        Ok(client)
    }

    /// Overrides the endpoint after construction.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the API version tag sent with every request.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }
}

#[async_trait]
impl Classifier for WitClient {
    async fn classify(&self, query: &str) -> Result<EntityBundle> {
        log::debug!("classify request: {} chars", query.len());

        let response = self
            .client
            .get(&self.base_url)
            .bearer_auth(&self.token)
            .query(&[("v", self.api_version.as_str()), ("q", query)])
            .send()
            .await
            .map_err(|err| {
                HapleaError::classification_unavailable(format!("classify request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read classifier error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: ClassifyResponse = response.json().await.map_err(|err| {
            HapleaError::classification_unavailable(format!(
                "failed to parse classifier response: {err}"
            ))
        })?;

        log::debug!(
            "classify response: {} intent candidate(s)",
            parsed.entities.intent.len()
        );
        Ok(parsed.entities)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ClassifyResponse {
    #[serde(default)]
    entities: EntityBundle,
}

fn map_http_error(status: StatusCode, body: String) -> HapleaError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error)
        .unwrap_or(body);

    HapleaError::classification_unavailable(format!("classifier returned {status}: {message}"))
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}
