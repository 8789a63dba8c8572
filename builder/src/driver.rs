//! Execution driver.
//!
//! Runs the `buildah` script for a spec one line at a time through a shell.
//! Exactly one child process is in flight; each is awaited before the next
//! line starts. What happens after a failing line is governed by
//! [`FailurePolicy`].

use std::process::Stdio;

use async_trait::async_trait;
use kiln_core::config::{DriverConfig, FailurePolicy};
use kiln_core::error::{KilnError, Result};

use crate::compile::script;
use crate::spec::BuildSpec;

/// Exit code recorded when a process ends without one (killed by a signal).
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// Runs a single command line and reports its exit code.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `line` to completion and return its exit code.
    async fn run(&self, line: &str) -> Result<i32>;
}

/// Runs lines as `<shell> -c <line>` with inherited stdio.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, line: &str) -> Result<i32> {
        let mut cmd = tokio::process::Command::new(&self.shell);
        cmd.arg("-c")
            .arg(line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // Reap the child if this future is dropped mid-wait
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let status = child.wait().await?;
        Ok(status.code().unwrap_or(SIGNAL_EXIT_CODE))
    }
}

/// Outcome of one executed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// The command line as run
    pub command: String,
    /// Process exit code
    pub exit_code: i32,
}

impl StepOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Result of running a whole script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Outcomes of the lines that ran, in order
    pub steps: Vec<StepOutcome>,
}

impl BuildReport {
    /// True when every line that ran exited with 0.
    pub fn success(&self) -> bool {
        self.steps.iter().all(StepOutcome::success)
    }

    /// Lines that exited unsuccessfully.
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.success())
    }
}

/// Sequential script executor.
pub struct Driver<R = ShellRunner> {
    runner: R,
    config: DriverConfig,
}

impl Driver<ShellRunner> {
    /// Driver running lines through `config.shell`.
    pub fn new(config: DriverConfig) -> Self {
        let runner = ShellRunner::new(config.shell.clone());
        Self { runner, config }
    }
}

impl<R: CommandRunner> Driver<R> {
    /// Driver with a custom runner.
    pub fn with_runner(runner: R, config: DriverConfig) -> Self {
        Self { runner, config }
    }

    /// Compile `spec` to a script committing `image_name` and run it.
    pub async fn build(&self, spec: &BuildSpec, image_name: &str) -> Result<BuildReport> {
        let lines = script(spec, image_name);
        self.run_script(&lines).await
    }

    /// Run already-rendered lines in order.
    ///
    /// # Errors
    ///
    /// Returns `KilnError::Io` when a process cannot be spawned, and
    /// `KilnError::Execution` for the first failing line under
    /// [`FailurePolicy::Abort`]. Under [`FailurePolicy::Continue`] failures
    /// are logged and recorded in the report instead.
    pub async fn run_script(&self, lines: &[String]) -> Result<BuildReport> {
        let total = lines.len();
        let mut report = BuildReport::default();

        for (idx, line) in lines.iter().enumerate() {
            let step = idx + 1;
            if self.config.quiet {
                tracing::debug!(step, total, command = %line, "Running build step");
            } else {
                tracing::info!(step, total, command = %line, "Running build step");
            }

            let exit_code = self.runner.run(line).await?;
            let outcome = StepOutcome {
                command: line.clone(),
                exit_code,
            };

            if !outcome.success() {
                tracing::error!(step, exit_code, command = %line, "Error running step");
                if self.config.failure_policy == FailurePolicy::Abort {
                    tracing::warn!(
                        step,
                        skipped = total - step,
                        "Aborting build after failed step"
                    );
                    return Err(KilnError::Execution {
                        command: outcome.command,
                        exit_code,
                    });
                }
            }
            report.steps.push(outcome);
        }

        Ok(report)
    }
}
