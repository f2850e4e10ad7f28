//! Shell execution of directives

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use super::ExecutionResult;

/// Hard wall-clock budget for a single directive
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs directives through the platform shell
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    timeout: Duration,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self {
            timeout: COMMAND_TIMEOUT,
        }
    }
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `directive` as one shell command line.
    ///
    /// Inherits the working directory and environment. Never returns an
    /// error: every failure mode is described in the result text.
    #[instrument(skip(self), fields(timeout_secs = self.timeout.as_secs()))]
    pub async fn run(&self, directive: &str) -> ExecutionResult {
        if directive.is_empty() {
            return ExecutionResult::rejected();
        }

        let mut cmd = shell_command(directive);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so a timeout can take down everything the shell started
        #[cfg(unix)]
        cmd.process_group(0);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(error = %e, "Failed to spawn shell");
                return ExecutionResult::launch_failed(e);
            }
        };
        debug!(pid = ?child.id(), "Spawned shell");
        // Dropped before the shell is reaped (a cancelled turn), it kills the group
        let group = GroupGuard::new(&child);

        let waited = timeout(self.timeout, collect_output(&mut child)).await;
        let result = match waited {
            Ok(Ok(output)) => {
                debug!(status = ?output.status.code(), "Command finished");
                ExecutionResult::from_output(output)
            }
            Ok(Err(e)) => {
                terminate(&mut child).await;
                ExecutionResult::launch_failed(e)
            }
            Err(_) => {
                warn!("Command timed out, terminating");
                terminate(&mut child).await;
                ExecutionResult::timed_out(self.timeout)
            }
        };
        group.disarm();
        result
    }
}

/// Kills a shell's process group on drop unless disarmed
struct GroupGuard {
    pgid: Option<u32>,
}

impl GroupGuard {
    fn new(child: &Child) -> Self {
        Self { pgid: child.id() }
    }

    /// The shell has been reaped, leave the group alone
    fn disarm(mut self) {
        self.pgid = None;
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        let Some(pgid) = self.pgid else {
            return;
        };
        debug!(pgid, "Run cancelled, killing process group");

        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            if let Err(e) = killpg(Pid::from_raw(pgid as i32), Signal::SIGKILL) {
                debug!(pgid, error = %e, "killpg failed");
            }
        }
    }
}

fn shell_command(directive: &str) -> Command {
    let (shell, shell_arg) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };

    let mut cmd = Command::new(shell);
    cmd.arg(shell_arg).arg(directive);
    cmd
}

async fn collect_output(child: &mut Child) -> std::io::Result<Output> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (stdout, stderr, status) = tokio::join!(read_all(stdout), read_all(stderr), child.wait());

    Ok(Output {
        status: status?,
        stdout: stdout?,
        stderr: stderr?,
    })
}

async fn read_all<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Kill the shell's process group (or just the shell) and reap it
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        use nix::sys::signal::{killpg, Signal};
        use nix::unistd::Pid;

        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!(pid, error = %e, "killpg failed");
        }
    }

    if let Err(e) = child.start_kill() {
        debug!(error = %e, "start_kill failed");
    }

    let status: std::io::Result<ExitStatus> = child.wait().await;
    debug!(status = ?status.map(|s| s.code()), "Reaped timed out command");
}
