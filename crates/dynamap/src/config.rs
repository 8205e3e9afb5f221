use std::{env, time::Duration};

use dynamap_core::mapping::MissingAttributePolicy;
use dynamap_core::storage::CreatePolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Table the sample entity is mapped to (default: "TestTable")
    pub table_name: String,
    /// Custom DynamoDB endpoint, e.g. DynamoDB Local
    pub endpoint_url: Option<String>,
    /// AWS region (default: "us-east-1")
    pub region: String,
    /// Per-call timeout in milliseconds (default: 5,000)
    pub request_timeout_ms: u64,
    pub create_policy: CreatePolicy,
    pub missing_attributes: MissingAttributePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DYNAMAP_TABLE_NAME` - Table name (default: "TestTable")
    /// - `AWS_ENDPOINT_URL` - Custom endpoint URL (default: unset)
    /// - `AWS_REGION` - AWS region (default: "us-east-1")
    /// - `DYNAMAP_REQUEST_TIMEOUT_MS` - Per-call timeout (default: 5,000)
    /// - `DYNAMAP_CREATE_POLICY` - `overwrite` or `reject-existing` (default: overwrite)
    /// - `DYNAMAP_MISSING_ATTRIBUTES` - `reject` or `zero` (default: reject)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            table_name: lookup("DYNAMAP_TABLE_NAME").unwrap_or_else(|| "TestTable".to_string()),
            endpoint_url: lookup("AWS_ENDPOINT_URL"),
            region: lookup("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            request_timeout_ms: lookup("DYNAMAP_REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5_000),
            create_policy: parse_or_default(&lookup, "DYNAMAP_CREATE_POLICY"),
            missing_attributes: parse_or_default(&lookup, "DYNAMAP_MISSING_ATTRIBUTES"),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        match &self.endpoint_url {
            Some(url) => format!("Local DynamoDB ({})", url),
            None => format!("AWS DynamoDB (region: {})", self.region),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> T
where
    T: std::str::FromStr<Err = String> + Default,
{
    match lookup(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(variable = key, error = %e, "Ignoring invalid configuration value");
            T::default()
        }),
        None => T::default(),
    }
}
