//! Static IP pool building.
//!
//! - [`overlap`] - CIDR overlap checks against accepted subnets
//! - [`builder`] - the [`PoolBuilder`] that turns operator entries into an
//!   [`IpAddressPoolSpec`](crate::models::IpAddressPoolSpec)

mod builder;
mod overlap;

pub use builder::{build_pool, PoolBuilder, PoolError, SubnetEntry};
pub use overlap::{check_overlap, find_overlap};
