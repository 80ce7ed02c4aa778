//! Interactive collection of the NSX-T spec.
//!
//! - [`prompt`] - [`Prompter`] and its terminal and replay implementations
//! - [`Wizard`] - the screens for a new or an existing NSX-T instance
//!
//! Every field is asked in a loop until it validates; a rejected value shows
//! its reason and asks the same field again.

mod prompt;

use crate::api::{shared_instances, ApiError, ClusterApi};
use crate::config::DEFAULT_NETMASK;
use crate::dns::Resolver;
use crate::models::{
    IpAddressPoolSpec, NetworkDetailsSpec, NsxManagerSpec, NsxtCluster, NsxtSpec, WizardOutput,
};
use crate::output::{format_pool_listing, Style};
use crate::pool::{PoolBuilder, PoolError, SubnetEntry};
use crate::validate::{
    validate_cidr, validate_fqdn, validate_fqdn_syntax, validate_ip, validate_ip_range_list,
    validate_option, validate_pool_name, validate_vlan, ValidationError,
};
use std::io;
use std::net::Ipv4Addr;
use thiserror::Error;

pub use prompt::{Prompter, ReplayPrompter, TerminalPrompter};

const CHOICE_PROMPT: &str = "Enter your choice(number):";
const VLAN_PROMPT: &str = "Enter Geneve vLAN ID (0-4096):";

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("terminal input failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error("No shared NSX-T instance discovered in domain {0}")]
    NoSharedInstance(String),
    #[error("No existing Static IP Pools are getting discovered on NSX-T cluster {0}")]
    NoIpPools(String),
}

#[derive(Debug, Clone, Default)]
pub struct WizardOptions {
    /// Workload domain the cluster is added to.
    pub domain_id: Option<String>,
    /// Primary cluster of the domain; secondary clusters reuse the domain's instance.
    pub is_primary: bool,
    /// 3.x to 4.x migration environment, TEP IPs come from DHCP only.
    pub migration_env: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TepAllocation {
    Dhcp,
    StaticPool,
}

pub struct Wizard<P, A, R> {
    prompter: P,
    api: A,
    resolver: R,
    options: WizardOptions,
}

impl<P: Prompter, A: ClusterApi, R: Resolver> Wizard<P, A, R> {
    pub fn new(prompter: P, api: A, resolver: R, options: WizardOptions) -> Self {
        Wizard {
            prompter,
            api,
            resolver,
            options,
        }
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Run the whole dialogue and return the collected spec.
    pub async fn run(&mut self) -> Result<WizardOutput, WizardError> {
        self.prompter
            .show(Style::Green, "Getting shared NSX-T cluster information...");
        let clusters = self.api.nsxt_clusters().await?;
        let instances = shared_instances(
            clusters,
            self.options.domain_id.as_deref(),
            self.options.is_primary,
        );
        log::info!(
            "{} NSX-T instance(s) usable (primary={})",
            instances.len(),
            self.options.is_primary
        );

        if !self.options.is_primary {
            if instances.is_empty() {
                let domain = self.options.domain_id.clone().unwrap_or_default();
                self.prompter.show(
                    Style::Red,
                    "No shared NSX-T instance discovered in current domain",
                );
                return Err(WizardError::NoSharedInstance(domain));
            }
            self.prompter.separator();
            return self.existing_instance(instances).await;
        }

        let create_new = if instances.is_empty() {
            self.prompter.show(
                Style::Yellow,
                "** No shared NSX-T instance was found, you need to create a new one",
            );
            true
        } else {
            self.prompter
                .show(Style::Cyan, "Please choose NSX-T instance option:");
            self.prompter
                .show(Style::Bold, "1) Create new NSX-T instance (default)");
            self.prompter
                .show(Style::Bold, "2) Use existing NSX-T instance");
            self.choose(CHOICE_PROMPT, 2, Some(0))? == 0
        };
        self.prompter.separator();

        if create_new {
            self.new_instance().await
        } else {
            self.existing_instance(instances).await
        }
    }

    async fn new_instance(&mut self) -> Result<WizardOutput, WizardError> {
        let geneve_vlan = self.prompt_valid(VLAN_PROMPT, None, validate_vlan)?;
        let admin_password = self.prompt_password()?;
        self.prompter.separator();

        self.prompter
            .show(Style::Cyan, "Please Enter NSX-T VIP details");
        let (vip_fqdn, vip) = self
            .prompt_fqdn("FQDN (IP address will be fetched from DNS):")
            .await?;
        let gateway = self.prompt_valid("Gateway IP address:", None, validate_ip)?;
        let netmask = self.prompt_valid(
            &format!("Subnet mask ({DEFAULT_NETMASK}):"),
            Some(DEFAULT_NETMASK),
            validate_ip,
        )?;
        self.prompter.separator();

        let mut nsx_manager_specs = Vec::with_capacity(3);
        for ordinal in ["1st", "2nd", "3rd"] {
            let (fqdn, ip) = self
                .prompt_fqdn(&format!("Enter FQDN for {ordinal} NSX-T Manager:"))
                .await?;
            nsx_manager_specs.push(NsxManagerSpec::new_node(&fqdn, ip, gateway, netmask));
            self.prompter.separator();
        }

        let ip_address_pool_spec = match self.tep_allocation()? {
            TepAllocation::Dhcp => None,
            TepAllocation::StaticPool => {
                self.prompter.separator();
                Some(self.create_static_ip_pool()?)
            }
        };
        self.prompter.separator();

        log::info!("New instance {vip_fqdn} ({vip}), VLAN {geneve_vlan}");
        Ok(WizardOutput {
            nsxt_spec: NsxtSpec {
                nsx_manager_specs,
                vip,
                vip_fqdn,
                nsx_manager_admin_password: Some(admin_password),
                ip_address_pool_spec,
            },
            geneve_vlan,
        })
    }

    async fn existing_instance(
        &mut self,
        instances: Vec<NsxtCluster>,
    ) -> Result<WizardOutput, WizardError> {
        let geneve_vlan = self.prompt_valid(VLAN_PROMPT, None, validate_vlan)?;
        self.prompter.separator();

        self.prompter
            .show(Style::Cyan, "Please select one NSX-T instance");
        for (i, instance) in instances.iter().enumerate() {
            self.prompter.show(
                Style::Bold,
                &format!("{}) NSX-T vip: {}", i + 1, instance.vip_fqdn),
            );
        }
        let selected = &instances[self.choose(CHOICE_PROMPT, instances.len(), None)?];
        self.prompter.separator();

        let ip_address_pool_spec = match self.tep_allocation()? {
            TepAllocation::Dhcp => None,
            TepAllocation::StaticPool => {
                self.prompter.separator();
                self.prompter
                    .show(Style::Cyan, "Select the option for Static IP Pool:");
                self.prompter
                    .show(Style::Bold, "1) Create New Static IP Pool(default)");
                self.prompter
                    .show(Style::Bold, "2) Re-use an Existing Static Pool");
                let create_new = self.choose(CHOICE_PROMPT, 2, Some(0))? == 0;
                self.prompter.separator();
                let pool = if create_new {
                    self.create_static_ip_pool()?
                } else {
                    self.reuse_static_ip_pool(&selected.id).await?
                };
                Some(pool)
            }
        };
        self.prompter.separator();

        let nsx_manager_specs = selected
            .nodes
            .iter()
            .map(|node| NsxManagerSpec {
                name: node.name.clone(),
                network_details_spec: NetworkDetailsSpec {
                    dns_name: node.fqdn.clone(),
                    ip_address: node.ip_address,
                    gateway: None,
                    subnet_mask: None,
                },
            })
            .collect();

        log::info!(
            "Reusing NSX-T instance {} ({}), Geneve VLAN {geneve_vlan}",
            selected.vip_fqdn,
            selected.id
        );
        Ok(WizardOutput {
            nsxt_spec: NsxtSpec {
                nsx_manager_specs,
                vip: selected.vip,
                vip_fqdn: selected.vip_fqdn.clone(),
                nsx_manager_admin_password: None,
                ip_address_pool_spec,
            },
            geneve_vlan,
        })
    }

    fn tep_allocation(&mut self) -> Result<TepAllocation, WizardError> {
        if self.options.migration_env {
            log::info!("Migration environment, TEP IPs from DHCP");
            return Ok(TepAllocation::Dhcp);
        }
        self.prompter.show(
            Style::Cyan,
            "Please choose IP Allocation for TEP IPs option:",
        );
        self.prompter.show(Style::Bold, "1) DHCP (default)");
        self.prompter.show(Style::Bold, "2) Static IP Pool");
        match self.choose(CHOICE_PROMPT, 2, Some(0))? {
            0 => Ok(TepAllocation::Dhcp),
            _ => Ok(TepAllocation::StaticPool),
        }
    }

    /// Ask for a pool name, a description and at least one subnet.
    fn create_static_ip_pool(&mut self) -> Result<IpAddressPoolSpec, WizardError> {
        self.prompter.show(Style::Cyan, "Create New Static IP Pool");
        // name and description are taken as typed, not trimmed
        let name = loop {
            let name = self.prompter.read_line("Enter Pool Name:")?;
            match validate_pool_name(&name) {
                Ok(()) => break name,
                Err(e) => self.prompter.show(Style::Red, &e.to_string()),
            }
        };
        let description = self.prompter.read_line("Enter Description(Optional):")?;
        let mut builder = PoolBuilder::new(&name, Some(&description))?;

        let mut count = 1;
        loop {
            self.prompter.separator();
            self.prompter.show(Style::Cyan, &format!("Subnet #{count}"));
            let cidr = self.prompt_valid("Enter CIDR:", None, |s| {
                validate_cidr(s).map(|_| s.to_string())
            })?;
            self.prompter.show(
                Style::Yellow,
                "** Multiple IP Ranges are supported by comma separated",
            );
            let ip_ranges = self.prompt_valid("Enter IP Range:", None, |s| {
                validate_ip_range_list(s).map(|_| s.to_string())
            })?;
            let gateway = self.prompt_valid("Enter Gateway IP:", None, |s| {
                validate_ip(s).map(|_| s.to_string())
            })?;

            match builder.add_subnet(&SubnetEntry::new(&cidr, &ip_ranges, &gateway)) {
                Ok(_) => {}
                Err(e @ PoolError::Overlap { .. }) => {
                    // same slot again, nothing of the rejected entry is kept
                    self.prompter.show(Style::Red, &e.to_string());
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            self.prompter.separator();
            let more = self
                .prompter
                .read_line("Do you want to add another subnet ? (Enter 'yes' or 'no'):")?;
            if !more.trim().eq_ignore_ascii_case("yes") {
                break;
            }
            count += 1;
        }

        Ok(builder.build())
    }

    async fn reuse_static_ip_pool(
        &mut self,
        cluster_id: &str,
    ) -> Result<IpAddressPoolSpec, WizardError> {
        self.prompter
            .show(Style::Green, "Getting Static IP Pool information...");
        let pools = self.api.ip_address_pools(cluster_id).await?;
        self.prompter.separator();
        if pools.is_empty() {
            self.prompter.show(
                Style::Red,
                "No existing Static IP Pools are getting discovered...",
            );
            return Err(WizardError::NoIpPools(cluster_id.to_string()));
        }

        self.prompter
            .show(Style::Cyan, "Please select one static ip pool:");
        self.prompter.show(
            Style::Bold,
            "-----Pool Name-------------------Subnets---------------------------Available IPs--",
        );
        for (i, pool) in pools.iter().enumerate() {
            for (n, line) in format_pool_listing(i + 1, pool).iter().enumerate() {
                let style = if n == 0 { Style::Bold } else { Style::Cyan };
                self.prompter.show(style, line);
            }
            self.prompter.show(Style::Plain, "");
        }
        let choice = self.choose(CHOICE_PROMPT, pools.len(), None)?;
        log::info!("Reusing static IP pool {}", pools[choice].name);
        Ok(IpAddressPoolSpec::reference(&pools[choice].name))
    }

    /// Ask until `validate` accepts; empty input takes `default` when given.
    fn prompt_valid<T, F>(
        &mut self,
        prompt: &str,
        default: Option<&str>,
        validate: F,
    ) -> Result<T, WizardError>
    where
        F: Fn(&str) -> Result<T, ValidationError>,
    {
        loop {
            let answer = self.read_answer(prompt, default)?;
            match validate(&answer) {
                Ok(value) => {
                    log::info!("'{prompt}' {answer}");
                    return Ok(value);
                }
                Err(e) => {
                    log::debug!("Rejected {answer:?} for '{prompt}': {e}");
                    self.prompter.show(Style::Red, &e.to_string());
                }
            }
        }
    }

    /// Ask for an FQDN until it is well formed and resolves.
    async fn prompt_fqdn(&mut self, prompt: &str) -> Result<(String, Ipv4Addr), WizardError> {
        loop {
            let fqdn = self.read_answer(prompt, None)?;
            if let Err(e) = validate_fqdn_syntax(&fqdn) {
                self.prompter.show(Style::Red, &e.to_string());
                continue;
            }
            self.prompter.show(Style::Green, "Resolving IP from DNS...");
            match validate_fqdn(&fqdn, &self.resolver).await {
                Ok(ip) => {
                    self.prompter
                        .show(Style::Green, &format!("Resolved IP address: {ip}"));
                    return Ok((fqdn, ip));
                }
                Err(e) => {
                    log::warn!("{e}");
                    self.prompter.show(Style::Red, &e.to_string());
                }
            }
        }
    }

    /// Menu with choices `1..=count`; returns the zero-based index.
    ///
    /// Empty input takes `default`, anything unknown falls back to the first choice.
    fn choose(
        &mut self,
        prompt: &str,
        count: usize,
        default: Option<usize>,
    ) -> Result<usize, WizardError> {
        let choices: Vec<String> = (1..=count).map(|n| n.to_string()).collect();
        let default_choice = default.and_then(|d| choices.get(d)).map(String::as_str);
        let answer = self.read_answer(prompt, default_choice)?;
        match validate_option(&answer, &choices) {
            Some(index) => Ok(index),
            None => {
                self.prompter
                    .show(Style::Yellow, "**Use first choice by default");
                Ok(0)
            }
        }
    }

    /// Ask twice until both entries match.
    fn prompt_password(&mut self) -> Result<String, WizardError> {
        loop {
            let password = self.prompter.read_secret("Enter Admin password:")?;
            let confirm = self.prompter.read_secret("Confirm Admin password:")?;
            if password == confirm {
                return Ok(password);
            }
            self.prompter.show(Style::Red, "Passwords don't match");
        }
    }

    fn read_answer(&mut self, prompt: &str, default: Option<&str>) -> Result<String, WizardError> {
        let answer = self.prompter.read_line(prompt)?;
        let answer = answer.trim();
        Ok(match (answer.is_empty(), default) {
            (true, Some(default)) => default.to_string(),
            _ => answer.to_string(),
        })
    }
}
