//! HTTP client for the SerpAPI `search` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serpwatch_core::{AppConfig, Source, TimeFilter};

use crate::error::ProviderError;
use crate::provider::{QueryParams, SearchProvider};

pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search";

const USER_AGENT: &str = concat!("serpwatch/", env!("CARGO_PKG_VERSION"));

/// SerpAPI answers an exhausted query with a 200 and this notice in `error`.
const NO_RESULTS_NOTICE: &str = "hasn't returned any results";

/// SerpAPI client.
///
/// Every source goes through the same endpoint; [`query_pairs`] maps each one
/// onto its engine, pagination and recency parameters.
pub struct SerpApiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    language: String,
    country: String,
}

impl SerpApiClient {
    /// Creates a client with the given per-request timeout.
    ///
    /// A `None` API key is accepted; every query then fails with
    /// [`ProviderError::MissingApiKey`] without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_key: Option<String>,
        timeout_secs: u64,
        language: &str,
        country: &str,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            language: language.to_string(),
            country: country.to_string(),
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self::new(
            config.serpapi_key.clone(),
            config.provider_timeout_secs,
            &config.language,
            &config.country,
        )?
        .with_base_url(&config.provider_base_url))
    }

    /// Overrides the endpoint (used by tests to point at a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn request_url(&self, source: Source, params: &QueryParams) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::MissingApiKey)?;
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| ProviderError::InvalidBaseUrl {
                base_url: self.base_url.clone(),
                reason: e.to_string(),
            })?;

        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query_pairs(source, params, &self.language, &self.country) {
                pairs.append_pair(name, &value);
            }
            pairs.append_pair("api_key", api_key);
        }

        Ok(url.to_string())
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn query(
        &self,
        source: Source,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ProviderError> {
        let url = self.request_url(source, params)?;
        let engine = engine_name(source);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
                engine: engine.to_string(),
            });
        }

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
                context: format!("{source} page for \"{}\"", params.query),
                source: e,
            })?;

        if let Some(message) = value.get("error").and_then(serde_json::Value::as_str) {
            if !message.contains(NO_RESULTS_NOTICE) {
                return Err(ProviderError::Api(message.to_string()));
            }
        }

        Ok(value)
    }
}

#[must_use]
pub fn engine_name(source: Source) -> &'static str {
    match source {
        Source::GoogleOrganic | Source::GoogleNews => "google",
        Source::BingOrganic => "bing",
        Source::GoogleImages => "google_images",
        Source::GoogleAiAnswer => "google_ai_mode",
    }
}

/// Request parameters for `source`, excluding the API key.
///
/// Google engines take a 0-based `start`, Bing a 1-based `first`, and Google
/// Images a 0-based page number `ijn`. Images and AI answers ignore the time
/// filter.
#[must_use]
pub fn query_pairs(
    source: Source,
    params: &QueryParams,
    language: &str,
    country: &str,
) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("engine", engine_name(source).to_string()),
        ("q", params.query.clone()),
    ];

    match source {
        Source::GoogleOrganic | Source::GoogleNews => {
            if source == Source::GoogleNews {
                pairs.push(("tbm", "nws".to_string()));
            }
            pairs.push(("num", params.count.to_string()));
            pairs.push(("start", params.offset.to_string()));
            pairs.push(("hl", language.to_string()));
            pairs.push(("gl", country.to_string()));
            if let Some(tbs) = google_recency(params.time_filter) {
                pairs.push(("tbs", tbs.to_string()));
            }
        }
        Source::BingOrganic => {
            pairs.push(("count", params.count.to_string()));
            pairs.push(("first", (params.offset + 1).to_string()));
            pairs.push(("cc", country.to_ascii_uppercase()));
            if let Some(days) = bing_interval_days(params.time_filter) {
                pairs.push(("qft", format!("interval=\"{days}\"")));
            }
        }
        Source::GoogleImages => {
            pairs.push(("ijn", (params.offset / params.count.max(1)).to_string()));
            pairs.push(("hl", language.to_string()));
            pairs.push(("gl", country.to_string()));
        }
        Source::GoogleAiAnswer => {
            pairs.push(("hl", language.to_string()));
            pairs.push(("gl", country.to_string()));
        }
    }

    pairs
}

fn google_recency(filter: TimeFilter) -> Option<&'static str> {
    match filter {
        TimeFilter::None => None,
        TimeFilter::Day => Some("qdr:d"),
        TimeFilter::Week => Some("qdr:w"),
        TimeFilter::Month => Some("qdr:m"),
    }
}

fn bing_interval_days(filter: TimeFilter) -> Option<u32> {
    match filter {
        TimeFilter::None => None,
        TimeFilter::Day => Some(1),
        TimeFilter::Week => Some(7),
        TimeFilter::Month => Some(30),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
