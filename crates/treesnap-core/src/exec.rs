//! Thin asynchronous wrapper around subprocess execution.

use crate::error::Result;
use std::path::Path;
use tokio::process::Command;

/// Captured output of a finished subprocess.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Whether the subprocess exited with status 0.
    pub success: bool,
    /// Captured standard output, lossily decoded as UTF-8.
    pub stdout: String,
    /// Captured standard error, lossily decoded as UTF-8.
    pub stderr: String,
    /// Exit code, if the subprocess exited normally.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Error text for a failed invocation: the captured stderr, or the
    /// exit status when the subprocess wrote nothing to stderr.
    pub fn error_text(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            match self.exit_code {
                Some(code) => format!("process exited with status {}", code),
                None => "process terminated by signal".to_string(),
            }
        } else {
            stderr.to_string()
        }
    }
}

/// Run a program in `dir` and wait for it to exit.
///
/// Exactly one subprocess per call; no streaming and no timeout, so a
/// hung subprocess suspends its caller until it exits. Spawn failures
/// surface as IO errors; a nonzero exit is reported through the returned
/// [`CommandOutput`], not as an `Err`.
pub async fn run_command(program: &str, args: &[&str], dir: &Path) -> Result<CommandOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.current_dir(dir);

    let output = cmd.output().await?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code(),
    })
}
