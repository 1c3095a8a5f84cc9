//! Typed CrowdTwist operations
//!
//! Each operation validates its request with [`ctbridge_core::Validate`]
//! and only then hands it to the transport, so an invalid payload never
//! reaches the network.

mod catalog;
mod pos;
