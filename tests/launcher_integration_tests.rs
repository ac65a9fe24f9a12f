//! Integration tests for the launch supervisor
//!
//! These tests run real child processes through `sh` and verify:
//! - The client's exit code becomes the launch outcome
//! - A shutdown signal stops both children
//! - An early server exit ends the run

#![cfg(unix)]

use game_client::models::LauncherConfig;
use game_client::services::{LaunchError, LaunchOutcome, Launcher};
use tokio::time::{Duration, timeout};

fn sh(script: &str) -> (String, Vec<String>) {
    ("sh".to_string(), vec!["-c".to_string(), script.to_string()])
}

fn launcher(server: &str, client: &str, startup_delay_ms: u64) -> Launcher {
    let (server_command, server_args) = sh(server);
    let (client_command, client_args) = sh(client);
    Launcher::new(LauncherConfig {
        server_command,
        server_args,
        client_command,
        client_args,
        startup_delay_ms,
    })
}

#[tokio::test]
async fn test_client_exit_code_is_outcome() {
    let launcher = launcher("echo ready; sleep 30", "echo playing; exit 3", 20);

    let outcome = timeout(
        Duration::from_secs(5),
        launcher.run_until(std::future::pending()),
    )
    .await
    .expect("Launcher did not finish")
    .unwrap();

    assert_eq!(outcome, LaunchOutcome::ClientExited(Some(3)));
    assert_eq!(outcome.exit_code(), 3);
}

#[tokio::test]
async fn test_shutdown_stops_both_children() {
    let launcher = launcher("sleep 30", "sleep 30", 10);

    let outcome = timeout(
        Duration::from_secs(5),
        launcher.run_until(tokio::time::sleep(Duration::from_millis(200))),
    )
    .await
    .expect("Launcher ignored shutdown")
    .unwrap();

    assert_eq!(outcome, LaunchOutcome::Interrupted);
}

#[tokio::test]
async fn test_server_exit_before_client_start() {
    let launcher = launcher("exit 7", "exit 0", 2_000);

    let outcome = timeout(
        Duration::from_secs(5),
        launcher.run_until(std::future::pending()),
    )
    .await
    .expect("Launcher did not notice the server exit")
    .unwrap();

    assert_eq!(outcome, LaunchOutcome::ServerExited(Some(7)));
}

#[tokio::test]
async fn test_missing_client_stops_server() {
    let mut config = LauncherConfig {
        startup_delay_ms: 10,
        client_command: "game-client-binary-that-does-not-exist".to_string(),
        ..LauncherConfig::default()
    };
    (config.server_command, config.server_args) = sh("sleep 30");

    let result = timeout(
        Duration::from_secs(5),
        Launcher::new(config).run_until(std::future::pending()),
    )
    .await
    .expect("Launcher hung after client spawn failure");

    assert!(matches!(
        result,
        Err(LaunchError::Spawn { label: "client", .. })
    ));
}
