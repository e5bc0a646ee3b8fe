//! Route 53 API surface.
//!
//! The three calls the program consumes are modeled as a trait so the
//! pipeline can run against a test double. [`Route53Client`] is the only
//! production implementation.

mod client;

pub use client::Route53Client;

use crate::error::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

/// A hosted zone, as returned by the zone listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZone {
    /// Opaque zone identifier (kept in whatever form the API returns it).
    pub id: String,
    /// Zone name, with the trailing dot.
    pub name: String,
}

/// A resource record set within a hosted zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    /// Record name, with the trailing dot.
    pub name: String,
    /// Record type ("A", "NS", "SOA", ...).
    pub record_type: String,
    /// Record values, in listing order.
    pub values: Vec<String>,
    /// TTL in seconds, when the record carries one.
    pub ttl: Option<i64>,
}

/// The Route 53 operations consumed by the sync pipeline.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Route53Api: Send + Sync {
    /// List hosted zones, ordered by name. Only the first page is returned.
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>>;

    /// List resource record sets in a zone. Only the first page is returned.
    async fn list_record_sets(&self, zone_id: &str) -> Result<Vec<RecordSet>>;

    /// Submit an UPSERT change batch for the named A record.
    async fn upsert_a_record(
        &self,
        zone_id: &str,
        name: &str,
        value: &str,
        ttl: i64,
    ) -> Result<()>;
}
