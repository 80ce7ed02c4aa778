//! Specification objects handed to the deployment API.
//!
//! Field names follow the JSON the downstream API expects (`camelCase`).

use super::Cidr;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// One `start-end` range of addresses inside a subnet.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpRange {
    pub start: Ipv4Addr,
    pub end: Ipv4Addr,
}

/// A static subnet of an IP address pool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    /// Ranges in the order the operator typed them.
    pub ip_address_pool_ranges: Vec<IpRange>,
    pub cidr: Cidr,
    pub gateway: Ipv4Addr,
}

/// Static IP pool used for TEP address allocation.
///
/// A pool reused from the cluster carries only its name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IpAddressPoolSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub subnets: Vec<Subnet>,
}

impl IpAddressPoolSpec {
    /// Reference to a pool that already exists on the cluster.
    pub fn reference(name: &str) -> Self {
        IpAddressPoolSpec {
            name: name.to_string(),
            description: None,
            subnets: vec![],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDetailsSpec {
    pub dns_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ip_address: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub gateway: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subnet_mask: Option<Ipv4Addr>,
}

/// One NSX-T manager node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NsxManagerSpec {
    pub name: String,
    pub network_details_spec: NetworkDetailsSpec,
}

impl NsxManagerSpec {
    /// Manager for a new deployment; the node name is the first FQDN label.
    pub fn new_node(
        fqdn: &str,
        ip_address: Ipv4Addr,
        gateway: Ipv4Addr,
        netmask: Ipv4Addr,
    ) -> Self {
        NsxManagerSpec {
            name: fqdn.split('.').next().unwrap_or(fqdn).to_string(),
            network_details_spec: NetworkDetailsSpec {
                dns_name: fqdn.to_string(),
                ip_address: Some(ip_address),
                gateway: Some(gateway),
                subnet_mask: Some(netmask),
            },
        }
    }
}

/// Top-level NSX-T configuration.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NsxtSpec {
    pub nsx_manager_specs: Vec<NsxManagerSpec>,
    pub vip: Ipv4Addr,
    pub vip_fqdn: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nsx_manager_admin_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub ip_address_pool_spec: Option<IpAddressPoolSpec>,
}

impl fmt::Debug for NsxtSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self
            .nsx_manager_admin_password
            .as_ref()
            .map(|_| "<redacted>");
        f.debug_struct("NsxtSpec")
            .field("nsx_manager_specs", &self.nsx_manager_specs)
            .field("vip", &self.vip)
            .field("vip_fqdn", &self.vip_fqdn)
            .field("nsx_manager_admin_password", &redacted)
            .field("ip_address_pool_spec", &self.ip_address_pool_spec)
            .finish()
    }
}

/// Result of one wizard run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WizardOutput {
    #[serde(rename = "nsxTSpec")]
    pub nsxt_spec: NsxtSpec,
    pub geneve_vlan: u16,
}
