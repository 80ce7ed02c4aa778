//! reqwest client for the SDDC manager listings.

use super::{ApiError, ClusterApi};
use crate::config::{ip_pools_path, CLUSTERS_PATH};
use crate::models::{IpAddressPool, NsxtCluster, Page};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpClusterApi {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpClusterApi {
    /// Client for `base_url` (scheme and host, no trailing slash).
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
        accept_invalid_certs: bool,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|source| ApiError::Http {
                url: base_url.to_string(),
                source,
            })?;
        Ok(HttpClusterApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            client,
        })
    }

    /// GET a paged listing and return its elements.
    async fn get_elements<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url}");

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|source| {
            log::warn!("GET {url} failed: {source}");
            ApiError::Http {
                url: url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GET {url} returned {status}");
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ApiError::Http {
            url: url.clone(),
            source,
        })?;

        let mut json_deserializer = serde_json::Deserializer::from_str(&body);
        let page: Page<T> =
            serde_path_to_error::deserialize(&mut json_deserializer).map_err(|e| {
                log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", body);
                ApiError::Parse {
                    url: url.clone(),
                    path: e.path().to_string(),
                    message: e.inner().to_string(),
                }
            })?;

        log::info!("got {} element(s) from {url}", page.elements.len());
        Ok(page.elements)
    }
}

impl ClusterApi for HttpClusterApi {
    async fn nsxt_clusters(&self) -> Result<Vec<NsxtCluster>, ApiError> {
        self.get_elements(CLUSTERS_PATH).await
    }

    async fn ip_address_pools(&self, cluster_id: &str) -> Result<Vec<IpAddressPool>, ApiError> {
        self.get_elements(&ip_pools_path(cluster_id)).await
    }
}
