//! Stored shop session, as persisted by the embedded app's OAuth flow

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shop's authenticated session
///
/// Offline sessions (`is_online == false`) carry the long-lived access
/// token background jobs use to call the Admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopSession {
    pub id: String,
    /// Shop domain, e.g. `example.myshopify.com`
    pub shop: String,
    pub state: String,
    pub is_online: bool,
    pub scope: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    pub access_token: Option<String>,
    pub user_id: Option<i64>,
}

impl ShopSession {
    /// Offline session id in the `offline_<shop>` form Shopify uses
    pub fn offline(shop: &str, access_token: &str) -> Self {
        Self {
            id: format!("offline_{}", shop),
            shop: shop.to_string(),
            state: String::new(),
            is_online: false,
            scope: None,
            expires: None,
            access_token: Some(access_token.to_string()),
            user_id: None,
        }
    }

    /// The access token, if one is stored and non-empty
    pub fn usable_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}
