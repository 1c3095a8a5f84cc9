//! The two CrowdTwist endpoint families and how each authenticates

use ctbridge_core::{CatalogErrorBody, Error, PosErrorBody, PurchaseHistoryErrorBody, Result};
use reqwest::{RequestBuilder, StatusCode, Url};

const POS_AUTH_HEADER: &str = "X-CT-Authorization";

/// A host the client talks to, together with its authentication scheme
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// Catalog API (`api<client>.crowdtwist.com/v2`), key in the `api_key` query parameter
    Catalog { base_url: String, api_key: String },
    /// Point-of-sale API (`pos<client>.crowdtwist.com`), key in the `X-CT-Authorization` header
    Pos { base_url: String, api_key: String },
}

impl Endpoint {
    pub fn base_url(&self) -> &str {
        match self {
            Endpoint::Catalog { base_url, .. } | Endpoint::Pos { base_url, .. } => base_url,
        }
    }

    /// Build the full URL for the given path segments
    ///
    /// Segments are percent-encoded individually, so ids containing `/`,
    /// `@` or spaces stay inside their segment.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(self.base_url())
            .map_err(|e| Error::ConfigError(format!("invalid base URL {}: {}", self.base_url(), e)))?;

        url.path_segments_mut()
            .map_err(|_| Error::ConfigError(format!("base URL cannot have a path: {}", self.base_url())))?
            .pop_if_empty()
            .extend(segments);

        if let Endpoint::Catalog { api_key, .. } = self {
            url.query_pairs_mut().append_pair("api_key", api_key);
        }

        Ok(url)
    }

    /// Attach header-based credentials, if this family uses them
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Endpoint::Catalog { .. } => request,
            Endpoint::Pos { api_key, .. } => {
                request.header(POS_AUTH_HEADER, format!("CTApiKey {}", api_key))
            }
        }
    }

    /// Condense a non-success response body into a single message
    pub fn describe_error(&self, status: StatusCode, body: &str) -> String {
        match self {
            Endpoint::Catalog { .. } => serde_json::from_str::<CatalogErrorBody>(body)
                .map(|err| err.summary())
                .unwrap_or_else(|_| format!("CrowdTwist API Error: HTTP {}", status)),
            Endpoint::Pos { .. } => {
                if let Ok(err) = serde_json::from_str::<PosErrorBody>(body) {
                    err.summary()
                } else if let Ok(err) = serde_json::from_str::<PurchaseHistoryErrorBody>(body) {
                    err.summary()
                } else {
                    format!("CrowdTwist POS Error: HTTP {}", status)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Endpoint {
        Endpoint::Catalog {
            base_url: "https://api42.crowdtwist.com/v2".to_string(),
            api_key: "k3y".to_string(),
        }
    }

    fn pos() -> Endpoint {
        Endpoint::Pos {
            base_url: "https://pos42.crowdtwist.com".to_string(),
            api_key: "k3y".to_string(),
        }
    }

    #[test]
    fn test_catalog_url_carries_api_key() {
        let url = catalog().url(&["reward"]).unwrap();
        assert_eq!(url.as_str(), "https://api42.crowdtwist.com/v2/reward?api_key=k3y");
    }

    #[test]
    fn test_pos_url_has_no_query_key() {
        let url = pos().url(&["purchase"]).unwrap();
        assert_eq!(url.as_str(), "https://pos42.crowdtwist.com/purchase");
    }

    #[test]
    fn test_segments_are_encoded() {
        let url = pos()
            .url(&["users", "a b/c@example.com", "purchases"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://pos42.crowdtwist.com/users/a%20b%2Fc@example.com/purchases"
        );
    }

    #[test]
    fn test_error_descriptions() {
        let status = StatusCode::BAD_REQUEST;

        assert_eq!(
            catalog().describe_error(status, r#"{"error": "E1", "message": "nope"}"#),
            "CrowdTwist API Error: E1 - nope"
        );
        assert_eq!(
            pos().describe_error(
                status,
                r#"{"system": "pos", "reason": "R", "description": "d", "message": "m"}"#
            ),
            "CrowdTwist POS Error: R - m"
        );
        assert_eq!(
            pos().describe_error(
                StatusCode::NOT_FOUND,
                r#"{"error": {"code": 404, "message": "User not found", "errors": []}}"#
            ),
            "CrowdTwist POS Error: 404 - User not found"
        );
        assert_eq!(
            pos().describe_error(StatusCode::BAD_GATEWAY, "<html>"),
            "CrowdTwist POS Error: HTTP 502 Bad Gateway"
        );
    }
}
