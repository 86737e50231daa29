//! Storefront settings.
//!
//! # Design
//! Every field has a serde default, so a host can deserialize a partial
//! document. The request timeout selects which shared transport
//! [`Storefront::with_shared_transport`](crate::storefront::Storefront::with_shared_transport)
//! uses; `Storefront::new` takes the transport as given.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_GRAPHQL_URL: &str = "http://localhost:8080/graphql";
pub const DEFAULT_STATUS_BANNER_DELAY_MS: u64 = 2000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Endpoints and timings for a [`Storefront`](crate::storefront::Storefront).
///
/// The defaults match the bookstore deployment; hosts that load settings
/// from elsewhere can deserialize this struct and omit any field.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorefrontConfig {
    #[serde(default = "StorefrontConfig::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "StorefrontConfig::default_graphql_url")]
    pub graphql_url: String,
    #[serde(default = "StorefrontConfig::default_status_banner_delay_ms")]
    pub status_banner_delay_ms: u64,
    /// Whole-request timeout for the shared HTTP transport.
    #[serde(default = "StorefrontConfig::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl StorefrontConfig {
    fn default_api_base_url() -> String {
        DEFAULT_API_BASE_URL.to_string()
    }

    fn default_graphql_url() -> String {
        DEFAULT_GRAPHQL_URL.to_string()
    }

    fn default_status_banner_delay_ms() -> u64 {
        DEFAULT_STATUS_BANNER_DELAY_MS
    }

    fn default_request_timeout_ms() -> u64 {
        DEFAULT_REQUEST_TIMEOUT_MS
    }

    /// Both services on one host, e.g. the mock server bound to a random port.
    pub fn for_host(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            api_base_url: format!("{origin}/api"),
            graphql_url: format!("{origin}/graphql"),
            ..Self::default()
        }
    }

    pub fn status_banner_delay(&self) -> Duration {
        Duration::from_millis(self.status_banner_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            graphql_url: Self::default_graphql_url(),
            status_banner_delay_ms: Self::default_status_banner_delay_ms(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_banner_delay_is_two_seconds() {
        let config = StorefrontConfig::default();
        assert_eq!(config.status_banner_delay(), Duration::from_millis(2000));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: StorefrontConfig =
            serde_json::from_str(r#"{"api_base_url":"http://shop/api"}"#).unwrap();
        assert_eq!(config.api_base_url, "http://shop/api");
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(config.status_banner_delay_ms, 2000);
    }

    #[test]
    fn for_host_derives_both_endpoints() {
        let config = StorefrontConfig::for_host("http://127.0.0.1:4000/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:4000/api");
        assert_eq!(config.graphql_url, "http://127.0.0.1:4000/graphql");
    }
}
