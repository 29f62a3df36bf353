//! End-to-end fixture lifecycle against a recording command runner.

use std::collections::BTreeSet;
use std::sync::Arc;

use zk_topo_fixture::cells::expected_cells;
use zk_topo_fixture::testing::RecordingRunner;
use zk_topo_fixture::{FixtureConfig, SequentialPorts, TopoServer, ZkTopoServer};

fn config(root: &std::path::Path) -> FixtureConfig {
    FixtureConfig {
        log_dir: root.join("vtlogroot"),
        tmp_root: root.join("vttmp"),
        hostname: Some("lifecycle-host".into()),
        port_start: 21000,
        ..FixtureConfig::default()
    }
}

fn server(root: &std::path::Path, runner: Arc<RecordingRunner>) -> ZkTopoServer {
    let cfg = config(root);
    let ports = SequentialPorts::new(cfg.port_start, cfg.port_limit);
    ZkTopoServer::with_collaborators(cfg, runner, Box::new(ports))
}

#[tokio::test]
async fn setup_wipe_teardown() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(RecordingRunner::new());
    let mut server = server(dir.path(), runner.clone());

    // setup
    let ctx = server.setup(false).await.unwrap();
    assert!(ctx.config_path().exists());

    let raw = std::fs::read_to_string(ctx.config_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let object = json.as_object().expect("config is a JSON object");
    assert_eq!(object.len(), 8);

    let keys: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    let expected = expected_cells();
    let expected: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
    assert_eq!(keys, expected);

    let test_ca = object["test_ca"].as_str().unwrap();
    assert!(!test_ca.contains(','));
    assert_eq!(test_ca, "localhost:21002");

    let config_path = ctx.config_path().display().to_string();
    let touches: Vec<_> = runner
        .calls()
        .into_iter()
        .filter(|c| c.args.first().map(String::as_str) == Some("touch"))
        .collect();
    assert_eq!(touches.len(), 3);
    for touch in &touches {
        assert_eq!(touch.env("ZK_CLIENT_CONFIG"), Some(config_path.as_str()));
    }

    // wipe
    runner.clear();
    server.wipe().await.unwrap();
    assert!(runner
        .calls()
        .iter()
        .all(|c| c.env("ZK_CLIENT_CONFIG") == Some(config_path.as_str())));
    let lines = runner.command_lines();
    assert_eq!(
        lines,
        vec![
            "zk rm -rf /zk/test_nj/vt/*",
            "zk rm -rf /zk/test_ny/vt/*",
            "zk rm -rf /zk/global/vt/*",
            "zk rm -f /zk/test_nj/vt",
            "zk rm -f /zk/test_ny/vt",
            "zk rm -f /zk/global/vt",
        ]
    );

    // teardown, with a failing zkctl
    runner.clear();
    runner.fail_matching("zkctl");
    server.teardown().await;

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, std::path::PathBuf::from("zkctl"));
    assert_eq!(calls[0].args.last().map(String::as_str), Some("teardown"));
    assert!(!calls[0].args.iter().any(|a| a == "shutdown"));
}

#[tokio::test]
async fn bad_host_is_appended_exactly_once() {
    for add_bad_host in [false, true] {
        let dir = tempfile::tempdir().unwrap();
        let runner = Arc::new(RecordingRunner::new());
        let mut server = server(dir.path(), runner);

        let ctx = server.setup(add_bad_host).await.unwrap();
        let cells = zk_topo_fixture::CellMap::read_from(ctx.config_path())
            .await
            .unwrap();
        let test_ca = cells.get("test_ca").unwrap();

        let base = "localhost:21002";
        if add_bad_host {
            assert_eq!(test_ca, format!("{},does.not.exist:1234", base));
            assert_eq!(test_ca.matches("does.not.exist").count(), 1);
        } else {
            assert_eq!(test_ca, base);
        }
    }
}

#[tokio::test]
async fn ensemble_and_zkocc_ports_are_disjoint() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(RecordingRunner::new());
    let mut server = server(dir.path(), runner.clone());

    server.setup(false).await.unwrap();

    let ensemble = server.ensemble().unwrap().ports;
    let zkocc = server.zkocc_ports().unwrap();
    assert!(!ensemble.overlaps(&zkocc));
    assert_eq!(ensemble.ports().collect::<Vec<_>>(), vec![21000, 21001, 21002]);
    assert_eq!(zkocc.ports().collect::<Vec<_>>(), vec![21003, 21004, 21005]);

    let init = &runner.calls()[0];
    assert!(init
        .args
        .contains(&"1@lifecycle-host:21000:21001:21002".to_string()));
}

#[tokio::test]
async fn context_binds_child_environment() {
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(RecordingRunner::new());
    let mut server = server(dir.path(), runner);
    let ctx = server.setup(false).await.unwrap();

    let mut cmd = tokio::process::Command::new("sh");
    cmd.args(["-c", "cat \"$ZK_CLIENT_CONFIG\""]);
    let output = ctx.apply(&mut cmd).output().await.unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["global"], "localhost:21002");
}

#[test]
fn flags_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path(), Arc::new(RecordingRunner::new()));
    for _ in 0..3 {
        assert_eq!(server.flags(), vec!["-topo_implementation", "zookeeper"]);
    }
}
