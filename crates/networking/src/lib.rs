//! CTBridge Networking - loyalty API client and Shopify Admin API client

pub mod api;
pub mod http;
pub mod shopify;

pub use http::{CrowdTwistClient, CrowdTwistConfig, Endpoint};
pub use shopify::AdminClient;
