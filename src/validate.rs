//! Operator input validation.
//!
//! Each check takes the raw string typed by the operator and returns the
//! parsed value, or a [`ValidationError`] whose message is shown before the
//! field is asked again.

use crate::config::{FQDN_MAX, FQDN_MIN_EXCLUSIVE, VLAN_MAX};
use crate::dns::{LookupError, Resolver};
use crate::models::{Cidr, IpRange};
use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;
use thiserror::Error;

lazy_static! {
    // ASCII digits only, `\d` would also take other Unicode digits
    static ref IP_RE: Regex =
        Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)$").expect("Invalid Regex?");
    static ref CIDR_RE: Regex = Regex::new(
        r"^([0-9]+\.[0-9]+\.[0-9]+\.[0-9]+)/([0-9]|[1-2][0-9]|3[0-2])$"
    )
    .expect("Invalid Regex?");
    static ref LABEL_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid Regex?");
    static ref POOL_NAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid Regex?");
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("IP format is not correct: '{0}'")]
    Ip(String),
    #[error("CIDR format is not correct: '{0}'")]
    Cidr(String),
    #[error("VLAN must be a number in between 0-4096")]
    Vlan(String),
    #[error("FQDN format is not correct: '{0}'")]
    Fqdn(String),
    #[error("Hasn't found matched IP from DNS: {0}")]
    Unresolved(#[source] LookupError),
    #[error("IP Range format is not correct: '{0}'")]
    IpRange(String),
    #[error(
        "Invalid IP pool address name. The IP address pool name should contain only \
         alphanumeric characters along with '-' or '_' without spaces"
    )]
    PoolName(String),
}

/// Dotted quad with every octet in 0-255.
pub fn validate_ip(s: &str) -> Result<Ipv4Addr, ValidationError> {
    let caps = IP_RE
        .captures(s)
        .ok_or_else(|| ValidationError::Ip(s.to_string()))?;
    let mut octets = [0u8; 4];
    for (i, octet) in octets.iter_mut().enumerate() {
        // leading zeros are fine, overflow is not
        *octet = caps[i + 1]
            .parse::<u8>()
            .map_err(|_| ValidationError::Ip(s.to_string()))?;
    }
    Ok(Ipv4Addr::from(octets))
}

/// `a.b.c.d/len` with a valid address and a prefix in 0-32.
pub fn validate_cidr(s: &str) -> Result<Cidr, ValidationError> {
    let caps = CIDR_RE
        .captures(s)
        .ok_or_else(|| ValidationError::Cidr(s.to_string()))?;
    let addr = validate_ip(&caps[1]).map_err(|_| ValidationError::Cidr(s.to_string()))?;
    let mask: u8 = caps[2]
        .parse()
        .map_err(|_| ValidationError::Cidr(s.to_string()))?;
    Cidr::from_parts(addr, mask).map_err(|_| ValidationError::Cidr(s.to_string()))
}

/// VLAN id: digits only, 0-4096.
pub fn validate_vlan(s: &str) -> Result<u16, ValidationError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::Vlan(s.to_string()));
    }
    match s.parse::<u32>() {
        Ok(vlan) if vlan <= VLAN_MAX => Ok(vlan as u16),
        _ => Err(ValidationError::Vlan(s.to_string())),
    }
}

/// Syntax part of the FQDN check, no lookup.
pub fn validate_fqdn_syntax(s: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::Fqdn(s.to_string());
    if s.len() <= FQDN_MIN_EXCLUSIVE || s.len() > FQDN_MAX {
        return Err(invalid());
    }
    if !s.contains('.') || s.starts_with('.') || s.ends_with('.') {
        return Err(invalid());
    }
    if !s.split('.').all(|label| LABEL_RE.is_match(label)) {
        return Err(invalid());
    }
    Ok(())
}

/// FQDN that is well formed and resolves; returns the resolved address.
pub async fn validate_fqdn<R: Resolver>(
    s: &str,
    resolver: &R,
) -> Result<Ipv4Addr, ValidationError> {
    validate_fqdn_syntax(s)?;
    log::debug!("Resolving IP of {s} from DNS");
    resolver
        .resolve(s)
        .await
        .map_err(ValidationError::Unresolved)
}

/// Comma separated `start-end` ranges, e.g. `10.0.0.1-10.0.0.10, 10.0.0.20-10.0.0.30`.
pub fn validate_ip_range_list(s: &str) -> Result<Vec<IpRange>, ValidationError> {
    s.split(',')
        .map(str::trim)
        .map(|token| {
            let parts: Vec<&str> = token.split('-').collect();
            if parts.len() != 2 {
                return Err(ValidationError::IpRange(token.to_string()));
            }
            Ok(IpRange {
                start: validate_ip(parts[0])?,
                end: validate_ip(parts[1])?,
            })
        })
        .collect()
}

pub fn validate_pool_name(s: &str) -> Result<(), ValidationError> {
    if POOL_NAME_RE.is_match(s) {
        Ok(())
    } else {
        Err(ValidationError::PoolName(s.to_string()))
    }
}

/// Index of the menu choice matching `s`, compared trimmed and lower-cased.
pub fn validate_option<S: AsRef<str>>(s: &str, choices: &[S]) -> Option<usize> {
    let choice = s.trim().to_lowercase();
    choices
        .iter()
        .position(|c| c.as_ref().to_lowercase() == choice)
}
