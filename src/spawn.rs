//! Child process execution with transparent stdio and signal forwarding
//!
//! The launcher always invokes the binary's client-mode entrypoint and wires
//! the child's standard streams straight to the parent's. Stdout and stdin
//! carry the relayed protocol, so no byte may be buffered, translated, or
//! intercepted in transit; everything human-readable goes to stderr.

use crate::error::{LaunchError, LaunchResult};
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

/// Subcommand token prepended to every launch
///
/// The netgauge binary exposes several subcommands; the launcher only ever
/// starts the client.
pub const CLIENT_SUBCOMMAND: &str = "client";

/// Spawn the client and wait for it, relaying shutdown signals
///
/// The child inherits the parent's environment overlaid with
/// `env_overrides` (override wins), and the parent's stdin/stdout/stderr
/// directly. Returns the child's exit code.
pub async fn run(
    path: &Path,
    args: &[String],
    env_overrides: &HashMap<String, String>,
) -> LaunchResult<i32> {
    run_with_stdio(
        path,
        args,
        env_overrides,
        Stdio::inherit(),
        Stdio::inherit(),
        Stdio::inherit(),
    )
    .await
}

/// [`run`] with explicit stdio wiring, so tests can connect file-backed streams
pub(crate) async fn run_with_stdio(
    path: &Path,
    args: &[String],
    env_overrides: &HashMap<String, String>,
    stdin: Stdio,
    stdout: Stdio,
    stderr: Stdio,
) -> LaunchResult<i32> {
    debug!("Spawning {} {} {:?}", path.display(), CLIENT_SUBCOMMAND, args);

    let mut child = Command::new(path)
        .arg(CLIENT_SUBCOMMAND)
        .args(args)
        .envs(env_overrides)
        .stdin(stdin)
        .stdout(stdout)
        .stderr(stderr)
        .spawn()
        .map_err(|e| LaunchError::spawn(path.display().to_string(), e))?;

    wait_relaying_signals(&mut child).await
}

#[cfg(unix)]
async fn wait_relaying_signals(child: &mut Child) -> LaunchResult<i32> {
    // Relay lives exactly as long as this child; dropping it deregisters
    // the handlers so later invocations start clean.
    let mut relay = SignalRelay::new()?;

    loop {
        tokio::select! {
            status = child.wait() => {
                let status = status
                    .map_err(|e| LaunchError::io("waiting for child process", e))?;
                return Ok(exit_code(status));
            }
            signo = relay.recv() => {
                relay.forward(child, signo);
            }
        }
    }
}

#[cfg(windows)]
async fn wait_relaying_signals(child: &mut Child) -> LaunchResult<i32> {
    loop {
        tokio::select! {
            status = child.wait() => {
                let status = status
                    .map_err(|e| LaunchError::io("waiting for child process", e))?;
                return Ok(status.code().unwrap_or(1));
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("Forwarding interrupt to child");
                let _ = child.start_kill();
            }
        }
    }
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    // Shell convention for signal deaths: no exit code exists, report 128+n
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

/// Forwards the parent's shutdown signals to one child, unchanged
///
/// Subscribes to interrupt, terminate, and hangup; the child receives the
/// same signal the parent did rather than being orphaned or killed with a
/// different one. Scoped: created after a successful spawn, dropped when the
/// child is reaped.
#[cfg(unix)]
struct SignalRelay {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalRelay {
    fn new() -> LaunchResult<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        let listen = |kind: SignalKind| {
            signal(kind).map_err(|e| LaunchError::io("registering signal handler", e))
        };

        Ok(Self {
            interrupt: listen(SignalKind::interrupt())?,
            terminate: listen(SignalKind::terminate())?,
            hangup: listen(SignalKind::hangup())?,
        })
    }

    /// Wait for the next relayed signal, returning its number
    async fn recv(&mut self) -> libc::c_int {
        loop {
            tokio::select! {
                s = self.interrupt.recv() => if s.is_some() { return libc::SIGINT },
                s = self.terminate.recv() => if s.is_some() { return libc::SIGTERM },
                s = self.hangup.recv() => if s.is_some() { return libc::SIGHUP },
            }
        }
    }

    /// Deliver `signo` to the child, if it is still running
    fn forward(&self, child: &Child, signo: libc::c_int) {
        if let Some(pid) = child.id() {
            debug!("Forwarding signal {} to pid {}", signo, pid);
            // SAFETY: pid names a child process owned by this handle
            unsafe {
                libc::kill(pid as libc::pid_t, signo);
            }
        }
    }
}
