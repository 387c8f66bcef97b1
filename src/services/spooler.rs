//! Print spooler access through the CUPS command-line tools.
//!
//! Commands are always spawned with an argument vector. Printer names and
//! file paths are never interpolated into a shell string.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::SpoolerSettings;

/// A single submission: send `file` to `printer`, `copies` times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintCommand {
    pub printer: String,
    pub copies: u32,
    pub file: PathBuf,
}

impl PrintCommand {
    /// Arguments for `lp`. `--` ends option parsing before the file path.
    pub fn lp_args(&self) -> Vec<OsString> {
        vec![
            "-d".into(),
            self.printer.clone().into(),
            "-n".into(),
            self.copies.to_string().into(),
            "--".into(),
            self.file.clone().into_os_string(),
        ]
    }
}

/// Captured text of a process that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpoolerOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Spooler invocation failures.
#[derive(Debug, thiserror::Error)]
pub enum SpoolerError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{detail}")]
    Failed { detail: String },

    #[error("{program} did not finish within {} seconds", .limit.as_secs())]
    TimedOut { program: String, limit: Duration },
}

/// The host's print subsystem.
#[async_trait]
pub trait Spooler: Send + Sync {
    /// Submit a job and return the spooler's output.
    async fn submit(&self, command: &PrintCommand) -> Result<SpoolerOutput, SpoolerError>;

    /// Raw printer status listing (`lpstat -p` format).
    async fn status_listing(&self) -> Result<String, SpoolerError>;
}

/// [`Spooler`] that shells out to `lp` and `lpstat`.
pub struct CupsSpooler {
    settings: SpoolerSettings,
}

impl CupsSpooler {
    pub fn new(settings: SpoolerSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Spooler for CupsSpooler {
    async fn submit(&self, command: &PrintCommand) -> Result<SpoolerOutput, SpoolerError> {
        let args = command.lp_args();
        info!(
            program = %self.settings.lp_command,
            args = ?args,
            "Executing print command"
        );
        run(&self.settings.lp_command, &args, self.settings.timeout).await
    }

    async fn status_listing(&self) -> Result<String, SpoolerError> {
        let output = run(
            &self.settings.lpstat_command,
            &[OsString::from("-p")],
            self.settings.timeout,
        )
        .await?;
        Ok(output.stdout)
    }
}

/// Run `program` to completion, optionally bounded by `timeout`.
///
/// The child is killed if the timeout elapses.
async fn run(
    program: &str,
    args: &[OsString],
    timeout: Option<Duration>,
) -> Result<SpoolerOutput, SpoolerError> {
    let mut command = Command::new(program);
    command.args(args).stdin(Stdio::null()).kill_on_drop(true);

    let pending = command.output();
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, pending)
            .await
            .map_err(|_| SpoolerError::TimedOut {
                program: program.to_string(),
                limit,
            })?,
        None => pending.await,
    };

    let output = result.map_err(|source| SpoolerError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    debug!(program = %program, status = %output.status, "spooler command exited");

    if !output.status.success() {
        return Err(SpoolerError::Failed {
            detail: failure_detail(&stdout, &stderr, output.status),
        });
    }

    Ok(SpoolerOutput { stdout, stderr })
}

/// Best description of a failed run: stderr, then stdout, then the exit status.
fn failure_detail(stdout: &str, stderr: &str, status: ExitStatus) -> String {
    [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("print command exited with {}", status))
}
