//! HTTP transport for the CrowdTwist loyalty API

mod client;
mod endpoint;

pub use client::{CrowdTwistClient, CrowdTwistConfig};
pub use endpoint::Endpoint;
