//! Configuration management for route53-ddns.

use crate::error::{DdnsError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extension of the config file sitting next to the binary.
const CONFIG_EXTENSION: &str = "conf";

/// Credentials and target record, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// AWS region the Route 53 client is scoped to.
    pub region: String,
    /// AWS access key ID.
    pub access_key_id: String,
    /// AWS secret access key.
    pub secret_access_key: String,
    /// Fully-qualified domain name of the A record to keep in sync.
    pub fqdn: String,
}

impl Config {
    /// Default config file path: the running executable's path with its
    /// extension replaced by `.conf`.
    pub fn default_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()
            .map_err(|e| DdnsError::Config(format!("Could not determine executable path: {e}")))?;

        Ok(exe.with_extension(CONFIG_EXTENSION))
    }

    /// Load configuration from a specific path.
    ///
    /// The file is plain `KEY=VALUE` lines; blank lines and `#` comments are
    /// ignored, and a single pair of surrounding quotes on a value is
    /// stripped. All four required keys must be present and non-empty.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DdnsError::Config(format!("Could not read {}: {e}", path.display())))?;

        let values = parse_key_values(&content);

        Ok(Self {
            region: required(&values, "AWS_REGION")?,
            access_key_id: required(&values, "AWS_ACCESS_KEY_ID")?,
            secret_access_key: required(&values, "AWS_SECRET_ACCESS_KEY")?,
            fqdn: required(&values, "FQDN")?,
        })
    }
}

/// Parse dotenv-style `KEY=VALUE` lines into a map.
fn parse_key_values(content: &str) -> HashMap<String, String> {
    let mut values = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            values.insert(key.trim().to_string(), unquote(value).to_string());
        }
    }

    values
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn required(values: &HashMap<String, String>, key: &str) -> Result<String> {
    match values.get(key) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        Some(_) => Err(DdnsError::Config(format!("Required key {key} is empty"))),
        None => Err(DdnsError::Config(format!("Missing required key {key}"))),
    }
}
