//! Error types for route53-ddns.

use thiserror::Error;

/// Result type alias for route53-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// Error taxonomy. Every variant is fatal; there is no retry tier.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error (unreadable file, missing or empty required key).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP transport error.
    #[error("Network error: {0}")]
    Network(String),

    /// The IP lookup endpoint answered with a non-success status.
    #[error("IP lookup failed: {0}")]
    IpLookup(String),

    /// No hosted zone matched the configured FQDN.
    #[error("Hosted zone not found for {0}")]
    ZoneNotFound(String),

    /// No A record matched the configured FQDN in the selected zone.
    #[error("No A record found for {fqdn} in zone {zone_id}")]
    RecordNotFound { zone_id: String, fqdn: String },

    /// Any failure reported by the Route 53 API.
    #[error("Route 53 error: {0}")]
    Provider(String),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}
