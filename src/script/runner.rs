//! Script runner for executing scripts inside the working root
//!
//! A run validates the target (see [`validate_script`]), hands it to the
//! located interpreter with the working root as current directory, and races
//! the child's exit against a wall-clock timeout. stdout and stderr are drained
//! concurrently so the child never blocks on a full pipe, and whatever was
//! captured is kept when the timeout fires.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{GatewayError, Result};
use crate::script::interpreter::InterpreterLocator;
use crate::script::validator::{validate_script, ScriptKind};
use crate::security::WorkingRoot;

/// Default timeout for script execution in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum captured output per stream in bytes (1MB)
pub const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// How long to keep reading pipes after the child is gone. A grandchild can
/// inherit the pipes and hold them open.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

const READ_CHUNK: usize = 8 * 1024;

/// A request to run one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub script_path: String,
    pub args: Vec<String>,
}

impl ExecutionRequest {
    pub fn new(script_path: impl Into<String>) -> Self {
        Self {
            script_path: script_path.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// What happened when a script ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionOutcome {
    /// Exit code (None if the process timed out or was killed by a signal)
    pub exit_code: Option<i32>,
    /// Signal that killed the process, if it did not exit on its own
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    /// The configured limit, reported when `timed_out` is set
    pub timeout_ms: u64,
    pub duration_ms: u64,
}

/// Configuration for script execution
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Wall-clock limit for the child (default: 30 seconds)
    pub timeout: Duration,

    /// Which files may be run (default: `.py`, "Python")
    pub kind: ScriptKind,

    /// Captured bytes kept per stream (default: 1MB)
    pub max_output_bytes: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            kind: ScriptKind::default(),
            max_output_bytes: MAX_OUTPUT_SIZE,
        }
    }
}

impl RunnerConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_kind(mut self, kind: ScriptKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_max_output_bytes(mut self, size: usize) -> Self {
        self.max_output_bytes = size;
        self
    }
}

/// Runs scripts confined to a working root.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    locator: Arc<dyn InterpreterLocator>,
    config: RunnerConfig,
}

impl ScriptRunner {
    pub fn new(locator: impl InterpreterLocator + 'static) -> Self {
        Self::with_config(locator, RunnerConfig::default())
    }

    pub fn with_config(locator: impl InterpreterLocator + 'static, config: RunnerConfig) -> Self {
        Self {
            locator: Arc::new(locator),
            config,
        }
    }

    /// Run a script, blocking the calling thread until it exits or times out.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`ScriptRunner::run_async`] there.
    pub fn run(&self, root: &WorkingRoot, request: &ExecutionRequest) -> Result<ExecutionOutcome> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| GatewayError::io("starting process supervisor", e))?;

        runtime.block_on(self.run_async(root, request))
    }

    pub async fn run_async(
        &self,
        root: &WorkingRoot,
        request: &ExecutionRequest,
    ) -> Result<ExecutionOutcome> {
        let script = validate_script(root, &request.script_path, &self.config.kind)?;
        let interpreter = self.locator.locate()?;
        let exec_context = || format!("executing {} file", self.config.kind.label);

        let mut std_command = std::process::Command::new(&interpreter);
        std_command
            .arg(script.as_path())
            .args(&request.args)
            .current_dir(root.as_path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Own process group, so a timeout takes the script's children with it
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_command.process_group(0);
        }

        let mut command = Command::from(std_command);
        command.kill_on_drop(true);

        info!(
            script = %request.script_path,
            interpreter = %interpreter.display(),
            args = request.args.len(),
            "spawning script"
        );

        let start = Instant::now();
        let mut child = command.spawn().map_err(|e| GatewayError::io(exec_context(), e))?;
        // Taken now: tokio stops reporting the id once the child is reaped
        let pid = child.id();

        let limit = self.config.max_output_bytes;
        let stdout = Capture::default();
        let stderr = Capture::default();
        let mut readers = [
            child.stdout.take().map(|pipe| spawn_drain(pipe, stdout.clone(), limit)),
            child.stderr.take().map(|pipe| spawn_drain(pipe, stderr.clone(), limit)),
        ];

        let status = match tokio::time::timeout(self.config.timeout, child.wait()).await {
            Ok(status) => Some(status.map_err(|e| GatewayError::io(exec_context(), e))?),
            Err(_) => {
                warn!(
                    script = %request.script_path,
                    timeout = ?self.config.timeout,
                    "script timed out, killing it"
                );
                terminate(&mut child).await;
                None
            }
        };

        // Background jobs the script left behind share its group and would
        // otherwise keep the pipes open.
        kill_group(pid);

        let drained = tokio::time::timeout(DRAIN_GRACE, async {
            for reader in readers.iter_mut().flatten() {
                if let Err(e) = reader.await {
                    debug!(error = %e, "output reader failed");
                }
            }
        })
        .await;

        if drained.is_err() {
            debug!("output pipe still open after child exit, keeping what was read");
            for reader in readers.iter().flatten() {
                reader.abort();
            }
        }

        let outcome = ExecutionOutcome {
            exit_code: status.and_then(|s| s.code()),
            signal: status.and_then(exit_signal),
            stdout: stdout.into_text(),
            stderr: stderr.into_text(),
            timed_out: status.is_none(),
            timeout_ms: self.config.timeout.as_millis() as u64,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            script = %request.script_path,
            exit_code = ?outcome.exit_code,
            signal = ?outcome.signal,
            timed_out = outcome.timed_out,
            duration_ms = outcome.duration_ms,
            "script finished"
        );

        Ok(outcome)
    }

    /// Path of the interpreter scripts would be handed to.
    pub fn interpreter(&self) -> Result<PathBuf> {
        self.locator.locate()
    }
}

/// Kill the child and everything in its process group, without a grace signal.
async fn terminate(child: &mut Child) {
    kill_group(child.id());

    if let Err(e) = child.kill().await {
        debug!(error = %e, "kill after timeout failed");
    }
}

/// SIGKILL the process group led by `pid` (created by `process_group(0)`).
#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = pid {
        // ESRCH just means the group is already gone
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            if e != nix::errno::Errno::ESRCH {
                debug!(pid, error = %e, "killpg failed");
            }
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

#[cfg(unix)]
fn exit_signal(status: std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: std::process::ExitStatus) -> Option<i32> {
    None
}

/// Bytes read from one child stream, shared with its reader task.
#[derive(Debug, Clone, Default)]
struct Capture {
    inner: Arc<Mutex<CaptureState>>,
}

#[derive(Debug, Default)]
struct CaptureState {
    bytes: Vec<u8>,
    truncated: bool,
}

impl Capture {
    fn push(&self, chunk: &[u8], limit: usize) {
        let mut state = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let room = limit.saturating_sub(state.bytes.len());
        if chunk.len() > room {
            state.truncated = true;
        }
        let keep = chunk.len().min(room);
        state.bytes.extend_from_slice(&chunk[..keep]);
    }

    fn into_text(self) -> String {
        let state = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let mut text = String::from_utf8_lossy(&state.bytes).into_owned();
        if state.truncated {
            text.push_str("...");
        }
        text
    }
}

/// Read a pipe to EOF. Bytes past `limit` are read and dropped so the child
/// never stalls on a full pipe.
fn spawn_drain<R>(mut pipe: R, capture: Capture, limit: usize) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            match pipe.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => capture.push(&chunk[..n], limit),
                Err(e) => {
                    debug!(error = %e, "reading child output failed");
                    break;
                }
            }
        }
    })
}
