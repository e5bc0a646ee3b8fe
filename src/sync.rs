//! The single-pass sync pipeline: resolve the public IP, load the config,
//! read the published record, upsert it on mismatch.

use crate::config::Config;
use crate::error::{DdnsError, Result};
use crate::resolver::IpResolver;
use crate::route53::Route53Api;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// TTL applied to the record on every upsert, in seconds.
pub const RECORD_TTL: i64 = 300;

/// Terminal outcome of one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncOutcome {
    /// The published value already matched; no write was issued.
    Unchanged {
        /// The value currently published.
        current: String,
    },
    /// One upsert was issued.
    Updated {
        /// The previously published value.
        previous: String,
        /// The newly published value.
        new: String,
    },
}

/// Report of a completed pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    /// Record that was synchronized.
    pub fqdn: String,
    /// Public IP the lookup service reported.
    pub resolved_ip: String,
    /// Hosted zone the record lives in.
    pub zone_id: String,
    /// What happened.
    pub outcome: SyncOutcome,
    /// When the pass finished.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Find the hosted zone matching the FQDN and the current value of its A
/// record.
///
/// Zone and record names are matched against `{fqdn}.` — the provider
/// stores names with the trailing dot. Only the first page of each listing
/// is examined.
pub async fn find_zone_and_record(api: &dyn Route53Api, fqdn: &str) -> Result<(String, String)> {
    let qualified = format!("{fqdn}.");

    let zones = api.list_hosted_zones().await?;
    let zone = zones
        .into_iter()
        .find(|zone| zone.name == qualified)
        .ok_or_else(|| DdnsError::ZoneNotFound(fqdn.to_string()))?;

    info!(zone_id = %zone.id, zone = %zone.name, "found hosted zone");

    let records = api.list_record_sets(&zone.id).await?;
    let record = records
        .into_iter()
        .find(|record| record.record_type == "A" && record.name == qualified)
        .ok_or_else(|| DdnsError::RecordNotFound {
            zone_id: zone.id.clone(),
            fqdn: fqdn.to_string(),
        })?;

    let current = record
        .values
        .into_iter()
        .next()
        .ok_or_else(|| DdnsError::RecordNotFound {
            zone_id: zone.id.clone(),
            fqdn: fqdn.to_string(),
        })?;

    Ok((zone.id, current))
}

/// Upsert the record to the resolved IP, unless it already matches.
///
/// The change names the record as `fqdn` without the trailing dot; Route 53
/// normalizes it.
pub async fn update_if_changed(
    api: &dyn Route53Api,
    zone_id: &str,
    fqdn: &str,
    current: &str,
    resolved: &str,
) -> Result<SyncOutcome> {
    if resolved == current {
        info!(%fqdn, ip = %current, "IP address unchanged, no update needed");
        return Ok(SyncOutcome::Unchanged {
            current: current.to_string(),
        });
    }

    info!(%fqdn, from = %current, to = %resolved, "updating DNS record");
    api.upsert_a_record(zone_id, fqdn, resolved, RECORD_TTL).await?;
    info!("DNS record updated successfully");

    Ok(SyncOutcome::Updated {
        previous: current.to_string(),
        new: resolved.to_string(),
    })
}

/// Run one full pass.
///
/// Steps run strictly in order: IP resolution, config load, record read,
/// conditional update. A configuration problem is therefore only surfaced
/// once the IP lookup has succeeded.
pub async fn run<A, F>(resolver: &IpResolver, config_path: &Path, make_api: F) -> Result<SyncReport>
where
    A: Route53Api,
    F: FnOnce(&Config) -> A,
{
    let resolved_ip = resolver.resolve().await?;
    info!(ip = %resolved_ip, "resolved public IP");

    let config = Config::load_from(config_path)?;
    let api = make_api(&config);

    let (zone_id, current) = find_zone_and_record(&api, &config.fqdn).await?;
    let outcome = update_if_changed(&api, &zone_id, &config.fqdn, &current, &resolved_ip).await?;

    Ok(SyncReport {
        fqdn: config.fqdn,
        resolved_ip,
        zone_id,
        outcome,
        timestamp: chrono::Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route53::{HostedZone, MockRoute53Api, RecordSet};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ZONE_ID: &str = "/hostedzone/Z0123456789ABCDEF";

    fn example_zones() -> Vec<HostedZone> {
        vec![
            HostedZone {
                id: "/hostedzone/ZOTHER".to_string(),
                name: "other.org.".to_string(),
            },
            HostedZone {
                id: ZONE_ID.to_string(),
                name: "example.com.".to_string(),
            },
        ]
    }

    fn example_records(a_value: &str) -> Vec<RecordSet> {
        vec![
            RecordSet {
                name: "example.com.".to_string(),
                record_type: "NS".to_string(),
                values: vec!["ns-1.awsdns.example.".to_string()],
                ttl: Some(172_800),
            },
            RecordSet {
                name: "example.com.".to_string(),
                record_type: "A".to_string(),
                values: vec![a_value.to_string()],
                ttl: Some(300),
            },
        ]
    }

    fn write_conf(fqdn_line: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "AWS_REGION=eu-west-1\nAWS_ACCESS_KEY_ID=key\nAWS_SECRET_ACCESS_KEY=secret\n{fqdn_line}"
        )
        .unwrap();
        file
    }

    #[tokio::test]
    async fn test_unchanged_ip_issues_no_write() {
        let mut api = MockRoute53Api::new();
        api.expect_list_hosted_zones()
            .returning(|| Ok(example_zones()));
        api.expect_list_record_sets()
            .returning(|_| Ok(example_records("1.2.3.4")));
        api.expect_upsert_a_record().times(0);

        let (zone_id, current) = find_zone_and_record(&api, "example.com").await.unwrap();
        let outcome = update_if_changed(&api, &zone_id, "example.com", &current, "1.2.3.4")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Unchanged {
                current: "1.2.3.4".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_changed_ip_issues_exactly_one_upsert() {
        let mut api = MockRoute53Api::new();
        api.expect_list_hosted_zones()
            .returning(|| Ok(example_zones()));
        api.expect_list_record_sets()
            .withf(|zone_id| zone_id == ZONE_ID)
            .returning(|_| Ok(example_records("1.2.3.4")));
        api.expect_upsert_a_record()
            .withf(|zone_id, name, value, ttl| {
                zone_id == ZONE_ID && name == "example.com" && value == "5.6.7.8" && *ttl == 300
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let (zone_id, current) = find_zone_and_record(&api, "example.com").await.unwrap();
        let outcome = update_if_changed(&api, &zone_id, "example.com", &current, "5.6.7.8")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Updated {
                previous: "1.2.3.4".to_string(),
                new: "5.6.7.8".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_zone_not_found_stops_before_record_listing() {
        let mut api = MockRoute53Api::new();
        api.expect_list_hosted_zones().returning(|| {
            Ok(vec![HostedZone {
                id: "/hostedzone/ZOTHER".to_string(),
                name: "other.org.".to_string(),
            }])
        });
        api.expect_list_record_sets().times(0);
        api.expect_upsert_a_record().times(0);

        let err = find_zone_and_record(&api, "example.com").await.unwrap_err();

        assert!(matches!(err, DdnsError::ZoneNotFound(fqdn) if fqdn == "example.com"));
    }

    #[tokio::test]
    async fn test_missing_a_record_is_fatal() {
        let mut api = MockRoute53Api::new();
        api.expect_list_hosted_zones()
            .returning(|| Ok(example_zones()));
        api.expect_list_record_sets().returning(|_| {
            Ok(vec![RecordSet {
                name: "example.com.".to_string(),
                record_type: "NS".to_string(),
                values: vec!["ns-1.awsdns.example.".to_string()],
                ttl: Some(172_800),
            }])
        });
        api.expect_upsert_a_record().times(0);

        let err = find_zone_and_record(&api, "example.com").await.unwrap_err();

        assert!(matches!(err, DdnsError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_record_match_requires_exact_name() {
        let mut api = MockRoute53Api::new();
        api.expect_list_hosted_zones()
            .returning(|| Ok(example_zones()));
        api.expect_list_record_sets().returning(|_| {
            Ok(vec![RecordSet {
                name: "www.example.com.".to_string(),
                record_type: "A".to_string(),
                values: vec!["9.9.9.9".to_string()],
                ttl: Some(300),
            }])
        });

        let err = find_zone_and_record(&api, "example.com").await.unwrap_err();

        assert!(matches!(err, DdnsError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_run_full_pass_updates_record() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("5.6.7.8\n"))
            .mount(&mock_server)
            .await;

        let resolver = IpResolver::with_endpoint(mock_server.uri());
        let conf = write_conf("FQDN=example.com");

        let report = run(&resolver, conf.path(), |_config| {
            let mut api = MockRoute53Api::new();
            api.expect_list_hosted_zones()
                .returning(|| Ok(example_zones()));
            api.expect_list_record_sets()
                .returning(|_| Ok(example_records("1.2.3.4")));
            api.expect_upsert_a_record()
                .withf(|_, _, value, ttl| value == "5.6.7.8" && *ttl == 300)
                .times(1)
                .returning(|_, _, _, _| Ok(()));
            api
        })
        .await
        .unwrap();

        assert_eq!(report.fqdn, "example.com");
        assert_eq!(report.resolved_ip, "5.6.7.8");
        assert_eq!(report.zone_id, ZONE_ID);
        assert!(matches!(report.outcome, SyncOutcome::Updated { .. }));
    }

    #[tokio::test]
    async fn test_run_ip_failure_precedes_config_load() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let resolver = IpResolver::with_endpoint(mock_server.uri());

        // The config path does not exist; a Config error here would mean
        // loading ran before (or despite) the failed lookup.
        let err = run(
            &resolver,
            Path::new("/nonexistent/route53-ddns.conf"),
            |_config| -> MockRoute53Api { panic!("client must not be constructed") },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DdnsError::IpLookup(_)));
    }

    #[tokio::test]
    async fn test_run_missing_key_makes_no_api_calls() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("5.6.7.8"))
            .mount(&mock_server)
            .await;

        let resolver = IpResolver::with_endpoint(mock_server.uri());
        let conf = write_conf("# FQDN intentionally absent");

        let err = run(&resolver, conf.path(), |_config| -> MockRoute53Api {
            panic!("client must not be constructed")
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DdnsError::Config(message) if message.contains("FQDN")));
    }
}
