//! Name resolution.
//!
//! - [`Resolver`] - the capability the validator depends on
//! - [`NslookupResolver`] - resolves by running `nslookup`
//! - [`parse_nslookup_output`] - picks the address for a name out of lookup text

mod nslookup;

use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

pub use nslookup::{parse_nslookup_output, NslookupResolver};

/// Why a name did not resolve.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The lookup ran but reported no address for the name.
    #[error("no address record for {0}")]
    NotFound(String),
    /// The lookup tool could not run or exited with an error.
    #[error("lookup of {fqdn} failed: {reason}")]
    Failed { fqdn: String, reason: String },
    #[error("lookup of {fqdn} timed out after {timeout:?}")]
    TimedOut { fqdn: String, timeout: Duration },
}

/// Forward lookup of a host name to an IPv4 address.
#[allow(async_fn_in_trait)]
pub trait Resolver {
    async fn resolve(&self, fqdn: &str) -> Result<Ipv4Addr, LookupError>;
}

impl<R: Resolver> Resolver for &R {
    async fn resolve(&self, fqdn: &str) -> Result<Ipv4Addr, LookupError> {
        (**self).resolve(fqdn).await
    }
}
