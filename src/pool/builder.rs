//! Static IP pool construction.

use super::overlap::find_overlap;
use crate::models::{Cidr, IpAddressPoolSpec, Subnet};
use crate::validate::{
    validate_cidr, validate_ip, validate_ip_range_list, validate_pool_name, ValidationError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Overlapping subnet {candidate} with {existing}. Please enter valid subnet details...")]
    Overlap { candidate: Cidr, existing: Cidr },
}

/// One subnet as typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetEntry {
    pub cidr: String,
    /// Comma separated `start-end` ranges.
    pub ip_ranges: String,
    pub gateway: String,
}

impl SubnetEntry {
    pub fn new(cidr: &str, ip_ranges: &str, gateway: &str) -> Self {
        SubnetEntry {
            cidr: cidr.to_string(),
            ip_ranges: ip_ranges.to_string(),
            gateway: gateway.to_string(),
        }
    }
}

/// Accumulates subnets for one pool, keeping their CIDRs disjoint.
#[derive(Debug)]
pub struct PoolBuilder {
    name: String,
    description: Option<String>,
    subnets: Vec<Subnet>,
}

impl PoolBuilder {
    /// Start a pool; an empty description is dropped, any other is kept verbatim.
    pub fn new(name: &str, description: Option<&str>) -> Result<Self, PoolError> {
        validate_pool_name(name)?;
        Ok(PoolBuilder {
            name: name.to_string(),
            description: description.filter(|d| !d.is_empty()).map(str::to_string),
            subnets: vec![],
        })
    }

    /// CIDRs accepted so far, in entry order.
    pub fn cidrs(&self) -> Vec<Cidr> {
        self.subnets.iter().map(|s| s.cidr).collect()
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    /// Validate `entry` and append it. A rejected entry leaves the pool unchanged.
    pub fn add_subnet(&mut self, entry: &SubnetEntry) -> Result<&Subnet, PoolError> {
        let cidr = validate_cidr(&entry.cidr)?;
        let ip_address_pool_ranges = validate_ip_range_list(&entry.ip_ranges)?;
        let gateway = validate_ip(&entry.gateway)?;

        if let Some(existing) = find_overlap(&self.cidrs(), &cidr) {
            return Err(PoolError::Overlap {
                candidate: cidr,
                existing: *existing,
            });
        }

        log::info!(
            "Pool {} subnet #{}: {cidr} gateway {gateway}, {} range(s)",
            self.name,
            self.subnets.len() + 1,
            ip_address_pool_ranges.len()
        );
        self.subnets.push(Subnet {
            ip_address_pool_ranges,
            cidr,
            gateway,
        });
        Ok(&self.subnets[self.subnets.len() - 1])
    }

    pub fn build(self) -> IpAddressPoolSpec {
        IpAddressPoolSpec {
            name: self.name,
            description: self.description,
            subnets: self.subnets,
        }
    }
}

/// Build a pool from entries in order; the first rejected entry aborts.
pub fn build_pool(
    name: &str,
    description: Option<&str>,
    entries: &[SubnetEntry],
) -> Result<IpAddressPoolSpec, PoolError> {
    let mut builder = PoolBuilder::new(name, description)?;
    for entry in entries {
        builder.add_subnet(entry)?;
    }
    Ok(builder.build())
}
