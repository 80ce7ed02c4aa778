//! Integration tests for nsxt-wizard
//!
//! These tests drive whole wizard runs with scripted answers against fake
//! listings and name resolution.

use nsxt_wizard::api::{ApiError, ClusterApi};
use nsxt_wizard::dns::{LookupError, Resolver};
use nsxt_wizard::models::{IpAddressPool, NsxtCluster};
use nsxt_wizard::output::Style;
use nsxt_wizard::pool::{build_pool, PoolError, SubnetEntry};
use nsxt_wizard::wizard::{ReplayPrompter, Wizard, WizardError, WizardOptions};
use serde_json::json;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// SDDC manager listings served from memory.
#[derive(Default)]
struct FakeApi {
    clusters: Vec<NsxtCluster>,
    pools: HashMap<String, Vec<IpAddressPool>>,
}

impl ClusterApi for FakeApi {
    async fn nsxt_clusters(&self) -> Result<Vec<NsxtCluster>, ApiError> {
        Ok(self.clusters.clone())
    }

    async fn ip_address_pools(&self, cluster_id: &str) -> Result<Vec<IpAddressPool>, ApiError> {
        Ok(self.pools.get(cluster_id).cloned().unwrap_or_default())
    }
}

/// Listing endpoint that is down.
struct BrokenApi;

impl ClusterApi for BrokenApi {
    async fn nsxt_clusters(&self) -> Result<Vec<NsxtCluster>, ApiError> {
        Err(ApiError::Status {
            url: "https://sddc.rack.local/v1/nsxt-clusters".to_string(),
            status: 503,
        })
    }

    async fn ip_address_pools(&self, _cluster_id: &str) -> Result<Vec<IpAddressPool>, ApiError> {
        unreachable!("no pools without clusters")
    }
}

/// DNS zone served from memory.
struct FakeDns(HashMap<&'static str, Ipv4Addr>);

impl FakeDns {
    fn rack() -> Self {
        FakeDns(HashMap::from([
            ("nsx-vip.rack.local", Ipv4Addr::new(10, 0, 0, 10)),
            ("nsx-a.rack.local", Ipv4Addr::new(10, 0, 0, 11)),
            ("nsx-b.rack.local", Ipv4Addr::new(10, 0, 0, 12)),
            ("nsx-c.rack.local", Ipv4Addr::new(10, 0, 0, 13)),
        ]))
    }
}

impl Resolver for FakeDns {
    async fn resolve(&self, fqdn: &str) -> Result<Ipv4Addr, LookupError> {
        self.0
            .get(fqdn)
            .copied()
            .ok_or_else(|| LookupError::NotFound(fqdn.to_string()))
    }
}

fn cluster(id: &str, shareable: bool, domains: &[&str]) -> NsxtCluster {
    serde_json::from_value(json!({
        "id": id,
        "isShareable": shareable,
        "domains": domains.iter().map(|d| json!({"id": d})).collect::<Vec<_>>(),
        "vip": "10.0.0.10",
        "vipFqdn": format!("{id}-vip.rack.local"),
        "nodes": [
            {"name": "nsx-a", "fqdn": "nsx-a.rack.local", "ipAddress": "10.0.0.11"},
            {"name": "nsx-b", "fqdn": "nsx-b.rack.local", "ipAddress": "10.0.0.12"},
            {"name": "nsx-c", "fqdn": "nsx-c.rack.local"}
        ]
    }))
    .expect("cluster fixture")
}

fn tep_pool(name: &str) -> IpAddressPool {
    serde_json::from_value(json!({
        "name": name,
        "availableIpAddresses": 11,
        "staticSubnets": [{
            "cidr": "10.1.0.0/24",
            "ipAddressPoolRanges": [{"start": "10.1.0.10", "end": "10.1.0.20"}]
        }]
    }))
    .expect("pool fixture")
}

fn primary() -> WizardOptions {
    WizardOptions {
        domain_id: None,
        is_primary: true,
        migration_env: false,
    }
}

fn secondary(domain: &str) -> WizardOptions {
    WizardOptions {
        domain_id: Some(domain.to_string()),
        is_primary: false,
        migration_env: false,
    }
}

/// Answers for the VIP and the three managers of a new instance.
const NEW_INSTANCE_NODES: [&str; 6] = [
    "nsx-vip.rack.local",
    "10.0.0.1",
    "",
    "nsx-a.rack.local",
    "nsx-b.rack.local",
    "nsx-c.rack.local",
];

#[tokio::test]
async fn test_new_instance_with_static_pool() {
    let mut answers = vec!["1614", "VMware123!", "VMware123!"];
    answers.extend(NEW_INSTANCE_NODES);
    answers.extend([
        "2",
        "tep-pool",
        "TEP pool for wld",
        "10.1.0.0/24",
        "10.1.0.10-10.1.0.20",
        "10.1.0.1",
        "yes",
        "10.1.1.0/24",
        "10.1.1.10-10.1.1.20, 10.1.1.30-10.1.1.40",
        "10.1.1.1",
        "yes",
        "10.1.0.0/25",
        "10.1.0.50-10.1.0.60",
        "10.1.0.1",
        "10.1.2.0/24",
        "10.1.2.10-10.1.2.20",
        "10.1.2.1",
        "no",
    ]);

    let mut wizard = Wizard::new(
        ReplayPrompter::new(answers),
        FakeApi::default(),
        FakeDns::rack(),
        primary(),
    );
    let output = wizard.run().await.expect("wizard run");

    let prompter = wizard.prompter();
    assert!(prompter.saw(Style::Yellow, "No shared NSX-T instance was found"));
    assert!(prompter.saw(Style::Red, "Overlapping subnet 10.1.0.0/25"));
    assert_eq!(prompter.remaining(), 0);

    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(value["geneve_vlan"], 1614);
    let spec = &value["nsxTSpec"];
    assert_eq!(spec["vip"], "10.0.0.10");
    assert_eq!(spec["vipFqdn"], "nsx-vip.rack.local");
    assert_eq!(spec["nsxManagerAdminPassword"], "VMware123!");
    assert_eq!(
        spec["nsxManagerSpecs"][1],
        json!({
            "name": "nsx-b",
            "networkDetailsSpec": {
                "dnsName": "nsx-b.rack.local",
                "ipAddress": "10.0.0.12",
                "gateway": "10.0.0.1",
                "subnetMask": "255.255.255.0"
            }
        })
    );

    let pool = &spec["ipAddressPoolSpec"];
    assert_eq!(pool["name"], "tep-pool");
    assert_eq!(pool["description"], "TEP pool for wld");
    let cidrs: Vec<&str> = pool["subnets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["cidr"].as_str().unwrap())
        .collect();
    assert_eq!(cidrs, vec!["10.1.0.0/24", "10.1.1.0/24", "10.1.2.0/24"]);
    assert_eq!(
        pool["subnets"][1]["ipAddressPoolRanges"][1],
        json!({"start": "10.1.1.30", "end": "10.1.1.40"})
    );
}

#[tokio::test]
async fn test_new_instance_dhcp_with_retries() {
    let mut answers = vec![
        // vlan out of range, then accepted
        "5000",
        "0",
        // mismatched confirmation asks for both again
        "first",
        "frist",
        "second",
        "second",
        // unknown name, then the VIP
        "nsx-x.rack.local",
    ];
    answers.extend(NEW_INSTANCE_NODES);
    answers.push("");

    let api = FakeApi {
        clusters: vec![cluster("mgmt", false, &["d-mgmt"])],
        ..Default::default()
    };
    let mut wizard = Wizard::new(
        ReplayPrompter::new(answers),
        api,
        FakeDns::rack(),
        primary(),
    );
    let output = wizard.run().await.expect("wizard run");

    let prompter = wizard.prompter();
    assert!(prompter.saw(Style::Red, "VLAN must be a number in between 0-4096"));
    assert!(prompter.saw(Style::Red, "Passwords don't match"));
    assert!(prompter.saw(Style::Red, "Hasn't found matched IP from DNS"));

    assert_eq!(output.geneve_vlan, 0);
    assert_eq!(
        output.nsxt_spec.nsx_manager_admin_password.as_deref(),
        Some("second")
    );
    assert_eq!(output.nsxt_spec.ip_address_pool_spec, None);
    let value = serde_json::to_value(&output).unwrap();
    assert!(value["nsxTSpec"].get("ipAddressPoolSpec").is_none());
}

#[tokio::test]
async fn test_migration_env_skips_tep_menu() {
    let mut answers = vec!["1614", "pw", "pw"];
    answers.extend(NEW_INSTANCE_NODES);

    let options = WizardOptions {
        migration_env: true,
        ..primary()
    };
    let mut wizard = Wizard::new(
        ReplayPrompter::new(answers),
        FakeApi::default(),
        FakeDns::rack(),
        options,
    );
    let output = wizard.run().await.expect("wizard run");
    assert_eq!(output.nsxt_spec.ip_address_pool_spec, None);
    let prompter = wizard.prompter();
    assert!(!prompter.saw(Style::Cyan, "Please choose IP Allocation"));
}

#[tokio::test]
async fn test_existing_instance_reuses_pool() {
    let api = FakeApi {
        clusters: vec![
            cluster("mgmt", false, &["d-mgmt"]),
            cluster("wld", true, &["d-1"]),
        ],
        pools: HashMap::from([(
            "wld".to_string(),
            vec![tep_pool("tep-a"), tep_pool("tep-b")],
        )]),
    };
    let answers = ["2", "1614", "1", "2", "2", "2"];
    let mut wizard = Wizard::new(
        ReplayPrompter::new(answers),
        api,
        FakeDns::rack(),
        primary(),
    );
    let output = wizard.run().await.expect("wizard run");

    // only the shareable cluster is offered
    let prompter = wizard.prompter();
    assert!(prompter.saw(Style::Bold, "1) NSX-T vip: wld-vip.rack.local"));
    assert!(!prompter.saw(Style::Bold, "mgmt-vip.rack.local"));

    let spec = &output.nsxt_spec;
    assert_eq!(spec.vip_fqdn, "wld-vip.rack.local");
    assert_eq!(spec.nsx_manager_admin_password, None);
    assert_eq!(spec.nsx_manager_specs.len(), 3);
    let third = &spec.nsx_manager_specs[2];
    assert_eq!(third.network_details_spec.ip_address, None);

    let value = serde_json::to_value(&output).unwrap();
    assert_eq!(
        value["nsxTSpec"]["ipAddressPoolSpec"],
        json!({"name": "tep-b"})
    );
}

#[tokio::test]
async fn test_secondary_uses_domain_instance() {
    let api = FakeApi {
        clusters: vec![
            cluster("wld-1", true, &["d-1"]),
            cluster("wld-2", true, &["d-2"]),
        ],
        ..Default::default()
    };
    // no create/use menu for a secondary cluster
    let answers = ["1614", "1", ""];
    let mut wizard = Wizard::new(
        ReplayPrompter::new(answers),
        api,
        FakeDns::rack(),
        secondary("d-2"),
    );
    let output = wizard.run().await.expect("wizard run");
    assert_eq!(output.nsxt_spec.vip_fqdn, "wld-2-vip.rack.local");
    assert_eq!(output.nsxt_spec.ip_address_pool_spec, None);
}

#[tokio::test]
async fn test_secondary_without_instance() {
    let api = FakeApi {
        clusters: vec![cluster("wld-1", true, &["d-1"])],
        ..Default::default()
    };
    let mut wizard = Wizard::new(
        ReplayPrompter::new(Vec::<String>::new()),
        api,
        FakeDns::rack(),
        secondary("d-9"),
    );
    let err = wizard.run().await.unwrap_err();
    assert!(
        matches!(&err, WizardError::NoSharedInstance(d) if d == "d-9"),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_reuse_without_pools() {
    let api = FakeApi {
        clusters: vec![cluster("wld", true, &["d-1"])],
        ..Default::default()
    };
    let answers = ["2", "1614", "1", "2", "2"];
    let mut wizard = Wizard::new(
        ReplayPrompter::new(answers),
        api,
        FakeDns::rack(),
        primary(),
    );
    let err = wizard.run().await.unwrap_err();
    assert!(
        matches!(&err, WizardError::NoIpPools(id) if id == "wld"),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_listing_failure_ends_run() {
    let mut wizard = Wizard::new(
        ReplayPrompter::new(["1"]),
        BrokenApi,
        FakeDns::rack(),
        primary(),
    );
    let err = wizard.run().await.unwrap_err();
    assert!(matches!(err, WizardError::Api(ApiError::Status { status: 503, .. })));
    assert_eq!(wizard.prompter().remaining(), 1);
}

#[tokio::test]
async fn test_answers_run_out() {
    let mut wizard = Wizard::new(
        ReplayPrompter::new(["1614", "pw"]),
        FakeApi::default(),
        FakeDns::rack(),
        primary(),
    );
    let err = wizard.run().await.unwrap_err();
    assert!(matches!(err, WizardError::Io(_)), "{err:?}");
}

#[test]
fn test_build_pool_aborts_on_overlap() {
    let entries = [
        SubnetEntry::new("10.1.0.0/24", "10.1.0.10-10.1.0.20", "10.1.0.1"),
        SubnetEntry::new("10.1.0.128/25", "10.1.0.130-10.1.0.140", "10.1.0.129"),
        SubnetEntry::new("10.1.5.0/24", "10.1.5.10-10.1.5.20", "10.1.5.1"),
    ];
    let err = build_pool("tep-pool", None, &entries).unwrap_err();
    assert!(matches!(err, PoolError::Overlap { .. }), "{err:?}");

    let disjoint = [entries[0].clone(), entries[2].clone()];
    let pool = build_pool("tep-pool", Some(""), &disjoint).expect("disjoint subnets");
    assert_eq!(pool.subnets.len(), 2);
    assert_eq!(pool.description, None);
}

#[cfg(unix)]
mod end_to_end {
    use super::*;
    use clap::Parser;
    use nsxt_wizard::collect_spec;
    use nsxt_wizard::config::Config;
    use std::os::unix::fs::PermissionsExt;

    const NSLOOKUP_SCRIPT: &str = r#"#!/bin/sh
printf 'Server:\t\t127.0.0.53\nAddress:\t127.0.0.53#53\n\nName:\t%s\nAddress: 10.0.0.7\n' "$1"
"#;

    /// Stand-in for `nslookup` that answers every name with 10.0.0.7.
    fn fake_nslookup(dir: &std::path::Path) -> String {
        let path = dir.join("nslookup");
        std::fs::write(&path, NSLOOKUP_SCRIPT).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_collect_spec_new_instance() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/nsxt-clusters")
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_body(r#"{"elements": []}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let nslookup = fake_nslookup(dir.path());
        let url = server.url();
        let config = Config::try_parse_from([
            "nsxt-wizard",
            "--host",
            url.as_str(),
            "--token",
            "tok",
            "--nslookup",
            nslookup.as_str(),
        ])
        .unwrap();

        let mut answers = vec!["1614", "pw", "pw"];
        answers.extend(NEW_INSTANCE_NODES);
        answers.push("1");
        let output = collect_spec(&config, ReplayPrompter::new(answers))
            .await
            .expect("wizard run");
        mock.assert_async().await;

        assert_eq!(output.nsxt_spec.vip, Ipv4Addr::new(10, 0, 0, 7));
        let names: Vec<&str> = output
            .nsxt_spec
            .nsx_manager_specs
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["nsx-a", "nsx-b", "nsx-c"]);
    }
}
