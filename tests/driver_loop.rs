//! End-to-end tests for the action handlers and the driver loop.
//!
//! A capture server on a loopback listener records every line the fuzzer
//! sends and never answers, so drains end on the idle window exactly as
//! they would against a quiet game server. The tests then assert on the
//! recorded wire traffic and on the registry left behind.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mushfuzz::catalog::{ObjectType, PERMISSIONS};
use mushfuzz::driver::{fuzz_add_flag, fuzz_remove_flag, fuzz_set_flag};
use mushfuzz::{FlagRegistry, FuzzConfig, FuzzDriver, GameSession};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const IDLE_TIMEOUT: Duration = Duration::from_millis(50);

/// Accept one connection and record every line received until the client
/// hangs up. Nothing is ever written back.
fn spawn_capture_server(listener: TcpListener) -> JoinHandle<Vec<String>> {
    tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        let mut reader = BufReader::new(socket);
        let mut lines = Vec::new();
        let mut buf = String::new();
        loop {
            buf.clear();
            if reader.read_line(&mut buf).await.expect("read line") == 0 {
                return lines;
            }
            lines.push(buf.trim_end_matches('\n').to_string());
        }
    })
}

fn test_config() -> FuzzConfig {
    FuzzConfig {
        connect_timeout: CONNECT_TIMEOUT,
        idle_timeout: IDLE_TIMEOUT,
        ..FuzzConfig::default()
    }
}

async fn capture_session() -> (GameSession, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    let server = spawn_capture_server(listener);
    let session = GameSession::connect(&addr, CONNECT_TIMEOUT, IDLE_TIMEOUT)
        .await
        .expect("connect");
    (session, server)
}

#[tokio::test]
async fn test_add_flag_registers_and_emits_wire_command() {
    let (mut session, server) = capture_session().await;
    let config = test_config();
    let mut registry = FlagRegistry::new();
    let mut rng = StdRng::seed_from_u64(42);

    fuzz_add_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("add flag");

    assert_eq!(registry.len(), 1);
    let (name, types) = registry.iter().next().expect("one entry");
    let name = name.to_string();
    let types = types.to_vec();

    drop(session);
    let sent = server.await.expect("server task");
    assert_eq!(sent.len(), 1);

    let rest = sent[0].strip_prefix("@flag/add ").expect("command prefix");
    let (wire_name, fields) = rest.split_once('=').expect("assignment");
    assert_eq!(wire_name, name);

    // Letter, types, setters, unsetters. The letter field is always empty.
    let fields: Vec<&str> = fields.split(',').collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(fields[0], "");

    let wire_types: Vec<&str> = fields[1].split_whitespace().collect();
    let recorded: Vec<&str> = types.iter().map(ObjectType::as_str).collect();
    assert_eq!(wire_types, recorded);

    for perm_field in [fields[2], fields[3]] {
        let tokens: Vec<&str> = perm_field.split_whitespace().collect();
        assert!(tokens.contains(&"wizard"), "line: {}", sent[0]);
        for token in tokens {
            assert!(PERMISSIONS.contains(&token), "unknown token {token}");
        }
    }
}

#[tokio::test]
async fn test_add_flag_regenerates_until_name_is_free() {
    let (mut session, server) = capture_session().await;
    let config = FuzzConfig {
        alphabet: vec!['A', 'B'],
        min_name_len: 2,
        max_name_len: 3,
        ..test_config()
    };
    // Only four two-letter names exist over this alphabet; occupy three so
    // the generator has to keep drawing until it lands on the last one.
    let mut registry = FlagRegistry::new();
    for name in ["AA", "AB", "BA"] {
        registry.insert(name.to_string(), Vec::new()).expect("seed");
    }
    let mut rng = StdRng::seed_from_u64(7);

    fuzz_add_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("add flag");

    assert_eq!(registry.len(), 4);
    assert!(registry.contains("BB"));

    drop(session);
    let sent = server.await.expect("server task");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with("@flag/add BB="), "line: {}", sent[0]);
}

#[tokio::test]
async fn test_remove_and_set_are_noops_on_empty_registry() {
    let (mut session, server) = capture_session().await;
    let config = test_config();
    let mut registry = FlagRegistry::new();
    let mut rng = StdRng::seed_from_u64(1);

    fuzz_remove_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("remove");
    fuzz_set_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("set");
    assert!(registry.is_empty());

    // The sentinel is the only line the server may ever see; anything
    // before it would mean a no-op touched the wire.
    session.send_line("sentinel").await.expect("send");
    drop(session);
    let sent = server.await.expect("server task");
    assert_eq!(sent, vec!["sentinel".to_string()]);
}

#[tokio::test]
async fn test_set_flag_without_type_restriction_draws_from_full_table() {
    let (mut session, server) = capture_session().await;
    let config = test_config();
    let mut registry = FlagRegistry::new();
    registry.insert("ZQ7".to_string(), Vec::new()).expect("seed");
    let mut rng = StdRng::seed_from_u64(3);

    fuzz_set_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("set flag");

    // A set never changes the registry.
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("ZQ7"));

    drop(session);
    let sent = server.await.expect("server task");
    assert_eq!(sent.len(), 1);

    let rest = sent[0].strip_prefix("@set ").expect("command prefix");
    let (target, flag) = rest.split_once('=').expect("assignment");
    assert!(
        ["#1", "#0", "#3", "#7"].contains(&target),
        "target {target} not in the dbref table"
    );
    assert!(flag == "ZQ7" || flag == "!ZQ7", "line: {}", sent[0]);
}

#[tokio::test]
async fn test_set_flag_with_restricted_types_targets_matching_dbref() {
    let (mut session, server) = capture_session().await;
    let config = test_config();
    let mut registry = FlagRegistry::new();
    registry
        .insert("DOORISH".to_string(), vec![ObjectType::Exit])
        .expect("seed");
    let mut rng = StdRng::seed_from_u64(5);

    fuzz_set_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("set flag");

    drop(session);
    let sent = server.await.expect("server task");
    assert_eq!(sent.len(), 1);

    let rest = sent[0].strip_prefix("@set ").expect("command prefix");
    let (target, flag) = rest.split_once('=').expect("assignment");
    assert_eq!(target, "#7", "exit-only flag must target the exit object");
    assert!(flag == "DOORISH" || flag == "!DOORISH");
}

#[tokio::test]
async fn test_remove_flag_sends_delete_and_forgets() {
    let (mut session, server) = capture_session().await;
    let config = test_config();
    let mut registry = FlagRegistry::new();
    registry.insert("ZQ7".to_string(), Vec::new()).expect("seed");
    let mut rng = StdRng::seed_from_u64(11);

    fuzz_remove_flag(&mut session, &mut registry, &mut rng, &config)
        .await
        .expect("remove flag");

    assert!(registry.is_empty());

    drop(session);
    let sent = server.await.expect("server task");
    assert_eq!(sent, vec!["@flag/delete ZQ7".to_string()]);
}

async fn run_driver_against_capture(seed: u64, iterations: u64) -> Vec<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let sock_addr = listener.local_addr().expect("local addr");
    let server = spawn_capture_server(listener);

    let config = FuzzConfig {
        host: sock_addr.ip().to_string(),
        port: sock_addr.port(),
        seed,
        max_iterations: Some(iterations),
        ..test_config()
    };
    let mut driver = FuzzDriver::new(config).expect("config");
    driver.run().await.expect("run");
    assert_eq!(driver.iterations(), iterations);

    server.await.expect("server task")
}

#[tokio::test]
async fn test_same_seed_replays_identical_command_stream() {
    let first = run_driver_against_capture(99, 20).await;
    let second = run_driver_against_capture(99, 20).await;

    assert_eq!(first[0], "connect one");
    assert_eq!(first, second);
}
