//! IPv4 network in CIDR notation.
//!
//! Provides [`Cidr`] for representing an IPv4 network as address/prefix-length,
//! along with the mask arithmetic used for overlap detection.

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::net::Ipv4Addr;

/// Longest IPv4 prefix.
pub const MAX_LENGTH: u8 = 32;

/// Netmask bits for a prefix length, `None` past 32.
///
/// ```
/// use nsxt_wizard::models::prefix_mask;
/// assert_eq!(prefix_mask(24), Some(0xFFFF_FF00));
/// ```
pub fn prefix_mask(len: u8) -> Option<u32> {
    match len {
        0 => Some(0),
        1..=MAX_LENGTH => Some(u32::MAX << (MAX_LENGTH - len)),
        _ => None,
    }
}

/// IPv4 network with a prefix length.
///
/// The address may carry host bits (`10.0.0.7/24`); [`Cidr::lo`] and
/// [`Cidr::hi`] always describe the whole network the prefix selects.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    /// The address as entered.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}

impl Cidr {
    /// Create a new [`Cidr`] from a string such as "10.0.0.0/24".
    pub fn new(addr_cidr: &str) -> Result<Cidr, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr.split_once('/').ok_or("Invalid address/mask")?;
        let Ok(addr) = addr.parse::<Ipv4Addr>() else {
            return Err(format!("Invalid address {addr}").into());
        };
        let mask: u8 = mask.parse()?;
        Cidr::from_parts(addr, mask)
    }

    /// Create a [`Cidr`] from an address and a prefix length.
    pub fn from_parts(addr: Ipv4Addr, mask: u8) -> Result<Cidr, Box<dyn Error>> {
        if mask > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(Cidr { addr, mask })
    }

    fn bits(&self) -> u32 {
        prefix_mask(self.mask.min(MAX_LENGTH)).unwrap_or(u32::MAX)
    }

    /// Lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & self.bits())
    }

    /// Highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) | !self.bits())
    }

    /// True if the two networks share at least one address.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.lo() <= other.hi() && other.lo() <= self.hi()
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
