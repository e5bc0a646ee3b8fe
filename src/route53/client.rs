//! AWS SDK implementation of the Route 53 API surface.

use super::{HostedZone, RecordSet, Route53Api};
use crate::config::Config;
use crate::error::{DdnsError, Result};
use async_trait::async_trait;
use aws_sdk_route53::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_route53::error::DisplayErrorContext;
use aws_sdk_route53::types::{Change, ChangeAction, ChangeBatch, ResourceRecord, RrType};

/// Production Route 53 client, authenticated with the static credentials
/// from the config file.
pub struct Route53Client {
    client: aws_sdk_route53::Client,
}

impl Route53Client {
    /// Build a client scoped to the configured region and credentials.
    pub fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "route53-ddns-conf",
        );

        let sdk_config = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: aws_sdk_route53::Client::from_conf(sdk_config),
        }
    }
}

/// Flatten an SDK error chain into the provider error variant.
fn provider_error(e: impl std::error::Error + Send + Sync + 'static) -> DdnsError {
    DdnsError::Provider(format!("{}", DisplayErrorContext(e)))
}

#[async_trait]
impl Route53Api for Route53Client {
    async fn list_hosted_zones(&self) -> Result<Vec<HostedZone>> {
        let output = self
            .client
            .list_hosted_zones_by_name()
            .send()
            .await
            .map_err(provider_error)?;

        Ok(output
            .hosted_zones()
            .iter()
            .map(|zone| HostedZone {
                id: zone.id().to_string(),
                name: zone.name().to_string(),
            })
            .collect())
    }

    async fn list_record_sets(&self, zone_id: &str) -> Result<Vec<RecordSet>> {
        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(zone_id)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(output
            .resource_record_sets()
            .iter()
            .map(|record| RecordSet {
                name: record.name().to_string(),
                record_type: record.r#type().as_str().to_string(),
                values: record
                    .resource_records()
                    .iter()
                    .map(|value| value.value().to_string())
                    .collect(),
                ttl: record.ttl(),
            })
            .collect())
    }

    async fn upsert_a_record(
        &self,
        zone_id: &str,
        name: &str,
        value: &str,
        ttl: i64,
    ) -> Result<()> {
        let record = ResourceRecord::builder()
            .value(value)
            .build()
            .map_err(provider_error)?;

        let record_set = aws_sdk_route53::types::ResourceRecordSet::builder()
            .name(name)
            .r#type(RrType::A)
            .ttl(ttl)
            .resource_records(record)
            .build()
            .map_err(provider_error)?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()
            .map_err(provider_error)?;

        let batch = ChangeBatch::builder()
            .changes(change)
            .build()
            .map_err(provider_error)?;

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(())
    }
}
