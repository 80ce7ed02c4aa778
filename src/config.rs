//! Settings and constants.
//!
//! Command line options also read `NSXT_WIZARD_*` environment variables, which
//! `main` loads from a `.env` file first.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Highest accepted Geneve VLAN id.
pub const VLAN_MAX: u32 = 4096;
/// FQDN length must be above this...
pub const FQDN_MIN_EXCLUSIVE: usize = 3;
/// ...and at most this.
pub const FQDN_MAX: usize = 255;
/// Netmask offered for the manager nodes.
pub const DEFAULT_NETMASK: &str = "255.255.255.0";
/// Blank lines printed between wizard screens.
pub const SEPARATOR_LINES: usize = 3;

pub const CLUSTERS_PATH: &str = "/v1/nsxt-clusters";

/// Path of the IP pool listing of one cluster.
pub fn ip_pools_path(cluster_id: &str) -> String {
    format!("{CLUSTERS_PATH}/{cluster_id}/ip-address-pools")
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nsxt-wizard",
    version,
    about = "Collect NSX-T instance settings for a workload domain"
)]
pub struct Config {
    /// SDDC manager hostname
    #[arg(long, env = "NSXT_WIZARD_HOST")]
    pub host: String,

    /// Bearer token for the SDDC manager API
    #[arg(long, env = "NSXT_WIZARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Workload domain of a secondary cluster
    #[arg(long, env = "NSXT_WIZARD_DOMAIN_ID")]
    pub domain_id: Option<String>,

    /// Secondary cluster: reuse the NSX-T instance of the domain
    #[arg(long, requires = "domain_id")]
    pub secondary: bool,

    /// 3.x to 4.x migration environment (TEP IPs from DHCP only)
    #[arg(long)]
    pub migration_env: bool,

    /// Accept self-signed certificates from the SDDC manager
    #[arg(long, env = "NSXT_WIZARD_INSECURE")]
    pub insecure: bool,

    #[arg(long, default_value_t = 30)]
    pub http_timeout_secs: u64,

    #[arg(long, default_value_t = 10)]
    pub dns_timeout_secs: u64,

    /// Program used for name lookups
    #[arg(long, default_value = "nslookup")]
    pub nslookup: String,

    /// Replay answers from a file instead of prompting
    #[arg(long)]
    pub answers: Option<PathBuf>,

    #[arg(long, default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}

impl Config {
    pub fn base_url(&self) -> String {
        if self.host.starts_with("http://") || self.host.starts_with("https://") {
            self.host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", self.host.trim_end_matches('/'))
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_secs(self.dns_timeout_secs)
    }
}
