//! SDDC manager API access.
//!
//! - [`ClusterApi`] - the listing capability the wizard depends on
//! - [`HttpClusterApi`] - reqwest implementation
//! - [`shared_instances`] - which clusters a domain may use

mod client;

use crate::models::{IpAddressPool, NsxtCluster};
use thiserror::Error;

pub use client::HttpClusterApi;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned {status}")]
    Status { url: String, status: u16 },
    #[error("Error parsing JSON from {url}: path={path} error={message}")]
    Parse {
        url: String,
        path: String,
        message: String,
    },
}

/// Listings read from the SDDC manager.
#[allow(async_fn_in_trait)]
pub trait ClusterApi {
    async fn nsxt_clusters(&self) -> Result<Vec<NsxtCluster>, ApiError>;
    async fn ip_address_pools(&self, cluster_id: &str) -> Result<Vec<IpAddressPool>, ApiError>;
}

/// Clusters a run may attach to.
///
/// A primary cluster may use any shareable instance. A secondary cluster must
/// use the instance already serving its domain; the management instance is
/// never shareable, so it is not offered to primary clusters.
pub fn shared_instances(
    clusters: Vec<NsxtCluster>,
    domain_id: Option<&str>,
    is_primary: bool,
) -> Vec<NsxtCluster> {
    clusters
        .into_iter()
        .filter(|c| {
            if is_primary {
                c.is_shareable
            } else {
                domain_id.is_some_and(|id| c.serves_domain(id))
            }
        })
        .collect()
}
