//! CrowdTwist HTTP client shared by the catalog and POS endpoint families

use super::endpoint::Endpoint;
use ctbridge_core::{Error, Result};
use reqwest::{header::ACCEPT, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://";

/// Connection settings for one CrowdTwist program
#[derive(Debug, Clone)]
pub struct CrowdTwistConfig {
    /// Scheme prefix the hosts are appended to, normally `https://`
    pub base_url: String,
    pub api_key: String,
    /// Program identifier embedded in the host names
    pub client_id: String,
}

impl CrowdTwistConfig {
    pub fn new(api_key: &str, client_id: &str) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            client_id: client_id.to_string(),
        }
    }

    /// Read `CROWDTWIST_API_KEY`, `CROWDTWIST_CLIENT_ID` and the optional
    /// `CROWDTWIST_BASE_URL` from the environment
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name).map_err(|_| Error::ConfigError(format!("{} is not set", name)))
        };

        Ok(Self {
            base_url: std::env::var("CROWDTWIST_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            api_key: var("CROWDTWIST_API_KEY")?,
            client_id: var("CROWDTWIST_CLIENT_ID")?,
        })
    }

    pub fn catalog_endpoint(&self) -> Endpoint {
        Endpoint::Catalog {
            base_url: format!("{}api{}.crowdtwist.com/v2", self.base_url, self.client_id),
            api_key: self.api_key.clone(),
        }
    }

    pub fn pos_endpoint(&self) -> Endpoint {
        Endpoint::Pos {
            base_url: format!("{}pos{}.crowdtwist.com", self.base_url, self.client_id),
            api_key: self.api_key.clone(),
        }
    }
}

/// HTTP client for the CrowdTwist loyalty API
///
/// Request methods live in [`crate::api`]; every one of them validates its
/// payload before this client sends anything. Retries and timeouts are
/// left to `reqwest` defaults.
pub struct CrowdTwistClient {
    http: Client,
    catalog: Endpoint,
    pos: Endpoint,
}

impl CrowdTwistClient {
    pub fn new(config: &CrowdTwistConfig) -> Result<Self> {
        Self::with_endpoints(config.catalog_endpoint(), config.pos_endpoint())
    }

    /// Create a client against explicit hosts (staging programs, local stubs)
    pub fn with_endpoints(catalog: Endpoint, pos: Endpoint) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, catalog, pos })
    }

    pub fn catalog(&self) -> &Endpoint {
        &self.catalog
    }

    pub fn pos(&self) -> &Endpoint {
        &self.pos
    }

    /// Send a request and decode the JSON response
    ///
    /// `body` is only attached for POST and PUT. Any non-2xx status becomes
    /// an [`Error::ApiError`] built from the endpoint's error body shape.
    pub(crate) async fn send<T, B>(
        &self,
        endpoint: &Endpoint,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = endpoint.url(segments)?;
        debug!("{} {}", method, url.path());

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            if method == Method::POST || method == Method::PUT {
                request = request.json(body);
            }
        }

        let response = endpoint.authorize(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = endpoint.describe_error(status, &body);
            error!("Request to {} failed with status {}: {}", segments.join("/"), status, message);
            return Err(Error::ApiError(message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse response from {}: {}. Body preview: {}",
                segments.join("/"),
                e,
                body.chars().take(500).collect::<String>()
            );
            Error::InvalidData(e.to_string())
        })
    }
}
