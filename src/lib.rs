//! # route53-ddns
//!
//! Keeps a single Route 53 "A" record pointed at the machine's current
//! public IP address. One invocation performs one pass: resolve the public
//! IP from an external echo service, load the `.conf` file next to the
//! binary, read the currently published record, and issue an UPSERT only
//! when the values differ.
//!
//! Periodic updates are driven externally (cron, a systemd timer); the
//! program has no loop and keeps no state between runs.
//!
//! ## Usage
//!
//! ```bash
//! # One sync pass (the default command)
//! route53-ddns sync
//!
//! # Show the resolved IP and the published record without writing
//! route53-ddns status
//!
//! # Check the config file and zone reachability
//! route53-ddns validate
//! ```

pub mod banner;
pub mod config;
pub mod error;
pub mod resolver;
pub mod route53;
pub mod sync;

pub use config::Config;
pub use error::{DdnsError, Result};
pub use resolver::IpResolver;
