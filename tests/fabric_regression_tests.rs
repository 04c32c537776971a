#[cfg(test)]
mod fabric_regression_tests {
    use std::collections::HashSet;
    use std::fs;
    use std::path::Path;

    use fabricconf::config::{Config, Fabric, GeneralConfig};
    use fabricconf::emit::{router_file_name, RouterRecord, TopologyRecord, TOPOLOGY_FILE};
    use fabricconf::orchestrator::{compile_routers, generate_fabric_config, run_import};
    use fabricconf::routing::RuleOrder;

    const ROUTE_HEADER: &str = "Kernel IP routing table\nsnapshot\nDestination Gateway Genmask Flags Iface\n==========\n==========\n";

    fn read_router(dir: &Path, id: u64) -> RouterRecord {
        let content = fs::read_to_string(dir.join(router_file_name(id))).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Three routers in a line: r1 - r2 - r3
    fn write_import_fixture(dir: &Path) {
        fs::write(
            dir.join("topo.txt"),
            "# interface adjacency\nr1-eth0 r2-eth0\nr2-eth0 r1-eth0\nr2-eth1 r3-eth0\n",
        )
        .unwrap();

        let routes = dir.join("routes");
        fs::create_dir_all(&routes).unwrap();
        fs::write(
            routes.join("r1"),
            format!("{ROUTE_HEADER}0.0.0.0/0     10.0.0.2  UG  eth0\n10.3.0.0/16   10.0.0.2  UG  eth0\n"),
        )
        .unwrap();
        fs::write(
            routes.join("r2"),
            format!(
                "{ROUTE_HEADER}10.3.0.0/16   10.0.1.2  UG  eth1\n10.1.0.0/16   10.0.0.1  UG  eth0\n10.2.0.0/16   0.0.0.0   U   incoming\n10.3.7.0/24   10.0.1.2  UG  eth1\n"
            ),
        )
        .unwrap();
        fs::write(routes.join("r3"), format!("{ROUTE_HEADER}0.0.0.0/0 10.0.1.1 UG eth0\n")).unwrap();
    }

    #[test]
    fn test_generate_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let config = Config {
            general: GeneralConfig {
                output: output.clone(),
                log_level: None,
                exclude_host_links: false,
            },
            fabric: Fabric::Generate {
                topology: "FatTree-4".to_string(),
                addresses_per_host: 2,
                seed: Some(1234),
            },
        };
        config.validate().unwrap();

        let summary = generate_fabric_config(&config).unwrap();
        assert_eq!(summary.switches, 20);
        assert_eq!(summary.hosts, 16);
        // 2x2 address pairs per host pair per switch on the path
        assert_eq!(summary.rules, 4 * 16 * (1 + 2 * 3 + 12 * 5));

        let topology: TopologyRecord =
            serde_json::from_str(&fs::read_to_string(output.join(TOPOLOGY_FILE)).unwrap()).unwrap();
        assert_eq!(topology.topology.len(), 96);

        for id in 1..=20 {
            let router = read_router(&output, id);
            assert_eq!(router.id, id);
            let ports: HashSet<u64> = router.ports.iter().copied().collect();
            for rule in &router.rules {
                assert_eq!(rule.match_bits.split(',').count(), 13);
                assert_eq!(rule.out_ports.len(), 1);
                assert!(ports.contains(&rule.out_ports[0]));
                assert!(!rule.in_ports.contains(&rule.out_ports[0]));
            }
        }
    }

    #[test]
    fn test_generate_excluding_host_links() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let config = Config {
            general: GeneralConfig {
                output: output.clone(),
                log_level: None,
                exclude_host_links: true,
            },
            fabric: Fabric::Generate {
                topology: "FatTree-4".to_string(),
                addresses_per_host: 1,
                seed: Some(1),
            },
        };

        generate_fabric_config(&config).unwrap();
        let topology: TopologyRecord =
            serde_json::from_str(&fs::read_to_string(output.join(TOPOLOGY_FILE)).unwrap()).unwrap();
        assert_eq!(topology.topology.len(), 64);
    }

    #[test]
    fn test_import_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_import_fixture(dir.path());

        let fabric = run_import(
            &dir.path().join("topo.txt"),
            &dir.path().join("routes"),
            RuleOrder::AscendingPrefix,
        )
        .unwrap();

        // duplicate adjacency line creates a single link
        assert_eq!(fabric.topology.links().len(), 2);
        assert_eq!(fabric.topology.node("r1").unwrap().ports.len(), 1);

        let routers = compile_routers(&fabric);
        assert_eq!(routers.len(), 3);

        let r2 = &routers[1];
        assert_eq!(r2.id, 2);
        // incoming record dropped, remaining sorted least specific first
        assert_eq!(r2.rules.len(), 3);
        let dst_third_octets: Vec<&str> = r2.rules.iter().map(|r| r.match_bits.split(',').nth(6).unwrap()).collect();
        assert_eq!(dst_third_octets, vec!["xxxxxxxx", "xxxxxxxx", "00000111"]);

        // no explicit ingress: every other port of r2
        let r2_ports = &fabric.topology.node("r2").unwrap().ports;
        for rule in &r2.rules {
            assert_eq!(rule.in_ports.len(), r2_ports.len() - 1);
            assert!(rule.match_bits.starts_with("xxxxxxxx,xxxxxxxx,xxxxxxxx,xxxxxxxx,"));
        }
    }

    #[test]
    fn test_import_longest_prefix_first() {
        let dir = tempfile::tempdir().unwrap();
        write_import_fixture(dir.path());

        let fabric = run_import(
            &dir.path().join("topo.txt"),
            &dir.path().join("routes"),
            RuleOrder::LongestPrefixFirst,
        )
        .unwrap();

        let masks: Vec<u8> = fabric.flows.entries("r2").iter().map(|e| e.dst_mask()).collect();
        assert_eq!(masks, vec![24, 16, 16]);
        let masks: Vec<u8> = fabric.flows.entries("r1").iter().map(|e| e.dst_mask()).collect();
        assert_eq!(masks, vec![16, 0]);
    }

    #[test]
    fn test_import_unresolved_interface_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write_import_fixture(dir.path());
        fs::write(
            dir.path().join("routes").join("r3"),
            format!("{ROUTE_HEADER}10.1.0.0/16 10.0.1.1 UG eth9\n"),
        )
        .unwrap();

        let err = run_import(
            &dir.path().join("topo.txt"),
            &dir.path().join("routes"),
            RuleOrder::AscendingPrefix,
        )
        .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("eth9"), "unexpected error: {message}");
        assert!(message.contains("r3"), "unexpected error: {message}");
    }

    #[test]
    fn test_import_via_config_file() {
        let dir = tempfile::tempdir().unwrap();
        write_import_fixture(dir.path());
        let output = dir.path().join("generated");
        let config_path = dir.path().join("fabric.yaml");
        fs::write(
            &config_path,
            format!(
                "general:\n  output: \"{}\"\nfabric:\n  mode: import\n  topology: topo.txt\n  routes: routes\n",
                output.display()
            ),
        )
        .unwrap();

        let config = fabricconf::config_loader::load_config(&config_path).unwrap();
        let summary = generate_fabric_config(&config).unwrap();
        assert_eq!(summary.switches, 3);
        assert_eq!(summary.hosts, 0);
        assert_eq!(summary.rules, 2 + 3 + 1);

        let r3 = read_router(&output, 3);
        assert_eq!(r3.rules.len(), 1);
        assert!(output.join(TOPOLOGY_FILE).exists());
    }
}
