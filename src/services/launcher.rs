use crate::models::LauncherConfig;
use std::future::Future;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};

/// Errors from supervising the server and client processes
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to start {label} ({command}): {source}")]
    Spawn {
        label: &'static str,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for {label}: {source}")]
    Wait {
        label: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// One child process and the tag its output is prefixed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub label: &'static str,
    pub command: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn server(config: &LauncherConfig) -> Self {
        Self {
            label: "server",
            command: config.server_command.clone(),
            args: config.server_args.clone(),
        }
    }

    pub fn client(config: &LauncherConfig) -> Self {
        Self {
            label: "client",
            command: config.client_command.clone(),
            args: config.client_args.clone(),
        }
    }
}

/// How a supervised run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The client exited; carries its exit code when it has one
    ClientExited(Option<i32>),
    /// The server exited on its own
    ServerExited(Option<i32>),
    /// A shutdown signal arrived
    Interrupted,
}

impl LaunchOutcome {
    /// Exit code for the launcher process itself.
    pub fn exit_code(self) -> i32 {
        match self {
            LaunchOutcome::ClientExited(code) => code.unwrap_or(1),
            LaunchOutcome::ServerExited(_) => 1,
            LaunchOutcome::Interrupted => 0,
        }
    }
}

/// Starts the game server, then the client host, and keeps both in step.
///
/// The server gets a head start of `startup_delay_ms`. Whichever side ends
/// first, the launcher makes sure no child outlives it.
///
/// # Example
/// ```ignore
/// let launcher = Launcher::new(config.launcher.clone());
/// let outcome = launcher.run_until(shutdown_signal()).await?;
/// std::process::exit(outcome.exit_code());
/// ```
pub struct Launcher {
    config: LauncherConfig,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    pub async fn run_until<S>(&self, shutdown: S) -> Result<LaunchOutcome, LaunchError>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let server_spec = ProcessSpec::server(&self.config);
        let mut server = spawn_labeled(&server_spec)?;

        let delay = Duration::from_millis(self.config.startup_delay_ms);
        tracing::info!("Waiting {:?} before starting the client", delay);

        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested during server startup");
                stop(&mut server, server_spec.label).await;
                return Ok(LaunchOutcome::Interrupted);
            }
            status = server.wait() => {
                let status = exited(server_spec.label, status)?;
                tracing::error!("Server exited before the client started");
                return Ok(LaunchOutcome::ServerExited(status.code()));
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let client_spec = ProcessSpec::client(&self.config);
        let mut client = match spawn_labeled(&client_spec) {
            Ok(child) => child,
            Err(e) => {
                stop(&mut server, server_spec.label).await;
                return Err(e);
            }
        };

        let outcome = tokio::select! {
            status = client.wait() => {
                exited(client_spec.label, status).map(|s| LaunchOutcome::ClientExited(s.code()))
            }
            status = server.wait() => {
                exited(server_spec.label, status).map(|s| LaunchOutcome::ServerExited(s.code()))
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested");
                Ok(LaunchOutcome::Interrupted)
            }
        };

        stop(&mut client, client_spec.label).await;
        stop(&mut server, server_spec.label).await;

        outcome
    }
}

fn exited(
    label: &'static str,
    status: std::io::Result<ExitStatus>,
) -> Result<ExitStatus, LaunchError> {
    let status = status.map_err(|source| LaunchError::Wait { label, source })?;
    tracing::info!("{} exited: {}", label, status);
    Ok(status)
}

/// Spawn a child with piped output forwarded to our stdout/stderr.
fn spawn_labeled(spec: &ProcessSpec) -> Result<Child, LaunchError> {
    tracing::info!("Starting {}: {} {:?}", spec.label, spec.command, spec.args);

    let mut child = Command::new(&spec.command)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            label: spec.label,
            command: spec.command.clone(),
            source,
        })?;

    let label = spec.label;
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            if let Err(e) = forward_lines(label, stdout, tokio::io::stdout()).await {
                tracing::debug!("{} stdout forwarding stopped: {}", label, e);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            if let Err(e) = forward_lines(label, stderr, tokio::io::stderr()).await {
                tracing::debug!("{} stderr forwarding stopped: {}", label, e);
            }
        });
    }

    Ok(child)
}

/// Kill `child` unless it has already exited.
async fn stop(child: &mut Child, label: &'static str) {
    match child.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            tracing::info!("Stopping {}", label);
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to stop {}: {}", label, e);
            }
        }
    }
}

/// Copy `reader` to `writer` line by line, prefixing each line with `[label]`.
///
/// # Returns
/// Number of lines forwarded
pub async fn forward_lines<R, W>(label: &str, reader: R, mut writer: W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut count = 0;

    while let Some(line) = lines.next_line().await? {
        writer
            .write_all(format!("[{label}] {line}\n").as_bytes())
            .await?;
        count += 1;
    }

    writer.flush().await?;
    Ok(count)
}

/// Resolves on Ctrl-C, or on SIGTERM where that exists.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
