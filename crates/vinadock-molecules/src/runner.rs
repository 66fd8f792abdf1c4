//! External process execution behind a swappable trait.

use async_trait::async_trait;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use vinadock_common::{DockError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Converter,
    DockingEngine,
}

impl ToolKind {
    pub fn label(self) -> &'static str {
        match self {
            ToolKind::Converter => "babel",
            ToolKind::DockingEngine => "vina",
        }
    }
}

/// A fully built command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tool: ToolKind,
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    pub fn new(tool: ToolKind, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Arguments as UTF-8 strings, lossily.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status and captured stderr of a finished tool.
#[derive(Debug, Clone, Default)]
pub struct ToolOutcome {
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion. A non-zero exit is reported in the outcome, not as an error.
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutcome>;
}

/// Runs tools as child processes with `tokio::process`.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutcome> {
        debug!("Executing: {}", invocation);

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, cmd.output())
                .await
                .map_err(|_| DockError::Timeout {
                    tool: invocation.tool.label(),
                    secs: limit.as_secs(),
                })??,
            None => cmd.output().await?,
        };

        let outcome = ToolOutcome {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        if !outcome.success() {
            warn!(
                tool = invocation.tool.label(),
                code = ?outcome.code,
                "{} exited unsuccessfully: {}",
                invocation.tool.label(),
                outcome.stderr
            );
        }
        Ok(outcome)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_runner_reports_exit_code() {
        let inv = Invocation::new(ToolKind::Converter, "sh")
            .arg("-c")
            .arg("echo oops >&2; exit 3");
        let outcome = ProcessRunner::new().run(&inv).await.unwrap();
        assert_eq!(outcome.code, Some(3));
        assert_eq!(outcome.stderr, "oops");
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_process_runner_honours_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new(ToolKind::Converter, "sh")
            .arg("-c")
            .arg("touch marker")
            .current_dir(dir.path());
        let outcome = ProcessRunner::new().run(&inv).await.unwrap();
        assert!(outcome.success());
        assert!(dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_process_runner_timeout() {
        let inv = Invocation::new(ToolKind::DockingEngine, "sleep").arg("5");
        let runner = ProcessRunner::new().with_timeout(Some(Duration::from_millis(50)));
        let err = runner.run(&inv).await.unwrap_err();
        assert!(matches!(err, DockError::Timeout { tool: "vina", .. }));
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new(ToolKind::Converter, "/usr/bin/obabel")
            .arg("-i")
            .arg("pdb");
        assert_eq!(inv.to_string(), "/usr/bin/obabel -i pdb");
    }
}
