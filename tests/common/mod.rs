//! Shared test utilities for the aleph_client integration harnesses.
//!
//! Import via `mod common; use common::*;` at the top of each harness file.

pub mod fake_aleph;

pub use fake_aleph::*;

use aleph_client::{AlephClient, ApiConfig, FailurePolicy, PolicyConfig};

pub const TEST_API_KEY: &str = "test-key";

/// Client pointed at `base_url` with the default failure policies.
pub fn client_for(base_url: &str) -> AlephClient {
    client_with_policy(base_url, PolicyConfig::default())
}

pub fn client_with_policy(base_url: &str, policy: PolicyConfig) -> AlephClient {
    let api = ApiConfig {
        base_url: base_url.to_string(),
        api_key: Some(TEST_API_KEY.to_string()),
    };
    AlephClient::new(&api, policy).expect("client should build")
}

pub fn inverted_policy() -> PolicyConfig {
    PolicyConfig {
        expand: FailurePolicy::Hard,
        similar: FailurePolicy::Soft,
    }
}
