//! Shopify Admin GraphQL client bound to a stored shop session

use ctbridge_core::{Error, Result, ShopSession};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, instrument};

/// Admin API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2025-04";

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a serde_json::Value>,
}

#[derive(Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

/// Authenticated Admin API client for one shop
///
/// Built by the job worker from the shop's offline session and handed to
/// job handlers. Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct AdminClient {
    http: Client,
    shop: String,
    graphql_url: String,
}

impl AdminClient {
    /// Create a client for `https://<shop>/admin/api/<version>/graphql.json`
    pub fn new(session: &ShopSession, api_version: &str) -> Result<Self> {
        let graphql_url = format!(
            "https://{}/admin/api/{}/graphql.json",
            session.shop, api_version
        );
        Self::with_graphql_url(session, &graphql_url)
    }

    /// Create a client against an explicit GraphQL URL
    pub fn with_graphql_url(session: &ShopSession, graphql_url: &str) -> Result<Self> {
        if session.shop.is_empty() {
            return Err(Error::InvalidData("session has no shop domain".to_string()));
        }
        let token = session
            .usable_token()
            .ok_or_else(|| Error::SessionNotFound(session.shop.clone()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut token_value = HeaderValue::from_str(token)
            .map_err(|e| Error::InvalidData(format!("access token is not a valid header: {}", e)))?;
        token_value.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token_value);

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            shop: session.shop.clone(),
            graphql_url: graphql_url.to_string(),
        })
    }

    pub fn shop(&self) -> &str {
        &self.shop
    }

    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Run a GraphQL query or mutation and decode its `data`
    #[instrument(skip_all, fields(shop = %self.shop))]
    pub async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Option<&serde_json::Value>,
    ) -> Result<T> {
        debug!("POST {}", self.graphql_url);

        let response = self
            .http
            .post(&self.graphql_url)
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Admin API request failed with status {}: {}", status, body);
            return Err(Error::ApiError(format!(
                "Shopify Admin API returned HTTP {}",
                status
            )));
        }

        let envelope: GraphqlResponse<T> = response.json().await.map_err(|e| {
            error!("Failed to parse Admin API response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        if !envelope.errors.is_empty() {
            let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(Error::ApiError(format!(
                "Shopify GraphQL error: {}",
                messages.join("; ")
            )));
        }

        envelope
            .data
            .ok_or_else(|| Error::InvalidData("GraphQL response has no data".to_string()))
    }
}
