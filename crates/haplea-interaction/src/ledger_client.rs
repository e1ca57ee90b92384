//! Ledger backend client.
//!
//! Consumes the backend's two endpoints: fetch-all (with an optional
//! "entries newer than N units" filter) and create. The wire shapes are the
//! backend's: list responses arrive in a `data` envelope and creates travel
//! in an `expense` wrapper.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use haplea_core::command::EntryFilter;
use haplea_core::error::{HapleaError, Result};

use crate::config::ServiceConfig;

const DEFAULT_BASE_URL: &str = "http://localhost:4000/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A persisted ledger entry as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub merchandise: Vec<String>,
    pub spent_at: String,
    pub sum: f64,
}

/// Payload for creating an entry from a saved draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub on: NaiveDate,
    pub sum: f64,
    pub items: Vec<String>,
}

/// The ledger backend's request contract, behind a seam for tests.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    async fn fetch_all(&self, filter: Option<&EntryFilter>) -> Result<Vec<LedgerEntry>>;
    async fn create(&self, expense: &NewExpense) -> Result<()>;
}

/// HTTP implementation of [`LedgerBackend`].
#[derive(Clone)]
pub struct HttpLedgerClient {
    client: Client,
    base_url: String,
}

impl HttpLedgerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    /// Loads the backend URL from the service config file, the
    /// HAPLEA_BACKEND_URL environment variable, or the local default.
    pub fn from_env() -> Self {
        let base_url = ServiceConfig::load()
            .ok()
            .and_then(|config| config.backend.map(|b| b.base_url))
            .or_else(|| env::var("HAPLEA_BACKEND_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    fn expenses_url(&self) -> String {
        format!("{}/expenses", self.base_url)
    }
}

#[async_trait]
impl LedgerBackend for HttpLedgerClient {
    async fn fetch_all(&self, filter: Option<&EntryFilter>) -> Result<Vec<LedgerEntry>> {
        let mut request = self.client.get(self.expenses_url());
        if let Some(filter) = filter {
            request = request.query(&filter_params(filter));
        }

        let response = request
            .send()
            .await
            .map_err(|err| HapleaError::backend(format!("fetch-all failed: {err}")))?;

        if !response.status().is_success() {
            return Err(HapleaError::backend(format!(
                "fetch-all returned {}",
                response.status()
            )));
        }

        let envelope: DataEnvelope<Vec<LedgerEntry>> = response
            .json()
            .await
            .map_err(|err| HapleaError::backend(format!("failed to parse entries: {err}")))?;

        log::debug!("fetched {} ledger entries", envelope.data.len());
        Ok(envelope.data)
    }

    async fn create(&self, expense: &NewExpense) -> Result<()> {
        let response = self
            .client
            .post(self.expenses_url())
            .json(&ExpenseEnvelope { expense })
            .send()
            .await
            .map_err(|err| HapleaError::backend(format!("create failed: {err}")))?;

        if !response.status().is_success() {
            return Err(HapleaError::backend(format!(
                "create returned {}",
                response.status()
            )));
        }

        log::info!("created ledger entry on {} for {}", expense.on, expense.sum);
        Ok(())
    }
}

/// Query parameters for the "entries newer than N units" path.
fn filter_params(filter: &EntryFilter) -> Vec<(&'static str, String)> {
    vec![
        ("intent", filter.intent.to_string()),
        ("unit", filter.unit.clone()),
        ("value", filter.value.to_string()),
    ]
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Serialize)]
struct ExpenseEnvelope<'a> {
    expense: &'a NewExpense,
}
