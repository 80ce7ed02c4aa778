//! Listings returned by the SDDC manager API.

use super::{Cidr, IpRange};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Paged API response body.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Page<T> {
    pub elements: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DomainRef {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    pub name: String,
    pub fqdn: String,
    #[serde(default)]
    pub ip_address: Option<Ipv4Addr>,
}

/// An NSX-T cluster known to the SDDC manager.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NsxtCluster {
    pub id: String,
    #[serde(default)]
    pub is_shareable: bool,
    #[serde(default)]
    pub domains: Vec<DomainRef>,
    pub vip: Ipv4Addr,
    pub vip_fqdn: String,
    #[serde(default)]
    pub nodes: Vec<ClusterNode>,
}

impl NsxtCluster {
    /// True if the cluster serves the given workload domain.
    pub fn serves_domain(&self, domain_id: &str) -> bool {
        self.domains.iter().any(|d| d.id == domain_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StaticSubnet {
    pub cidr: Cidr,
    #[serde(default)]
    pub ip_address_pool_ranges: Vec<IpRange>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockSubnet {
    pub cidr: Cidr,
    pub size: u64,
}

/// A static IP pool that already exists on a cluster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressPool {
    pub name: String,
    #[serde(default)]
    pub available_ip_addresses: u64,
    #[serde(default)]
    pub static_subnets: Vec<StaticSubnet>,
    #[serde(default)]
    pub block_subnets: Option<Vec<BlockSubnet>>,
}
