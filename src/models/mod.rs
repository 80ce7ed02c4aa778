//! Domain models for the NSX-T wizard.
//!
//! - [`Cidr`] - IPv4 network in CIDR notation
//! - [`NsxtSpec`] and friends - the specification handed to the deployment API
//! - [`NsxtCluster`] and [`IpAddressPool`] - listings read from the SDDC manager

mod cidr;
mod listing;
mod spec;

// Re-export public types
pub use cidr::{prefix_mask, Cidr, MAX_LENGTH};
pub use listing::{
    BlockSubnet, ClusterNode, DomainRef, IpAddressPool, NsxtCluster, Page, StaticSubnet,
};
pub use spec::{
    IpAddressPoolSpec, IpRange, NetworkDetailsSpec, NsxManagerSpec, NsxtSpec, Subnet, WizardOutput,
};
