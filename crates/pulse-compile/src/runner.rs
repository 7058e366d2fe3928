/*
 * runner.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Subprocess invocation for compiler and resolver passes.
 */

//! Subprocess invocation for compiler and resolver passes.
//!
//! The orchestrator never spawns processes itself. It hands an
//! [`Invocation`] to a [`CommandRunner`], which is constructed once by the
//! caller and injected, so tests can substitute a scripted runner.
//!
//! Runners never return errors: a non-zero exit, a timeout, or a missing
//! executable all come back as a failed [`PassOutput`] whose text explains
//! what happened.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

/// A single external command to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Tool name (resolved to a binary by the runner)
    pub program: String,
    /// Command-line arguments
    pub args: Vec<String>,
    /// Time budget after which the pass is treated as failed
    pub timeout: Duration,
}

impl Invocation {
    /// Create an invocation.
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// Human-readable command line, for logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassStatus {
    /// The process exited with this code (-1 if killed by a signal)
    Exited(i32),
    /// The process exceeded its time budget and was killed
    TimedOut,
    /// The executable could not be found
    NotFound,
    /// The process could not be started or awaited
    SpawnFailed(String),
}

/// Outcome of running one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutput {
    /// How the pass ended
    pub status: PassStatus,
    /// Captured stdout followed by stderr, or a diagnostic line
    pub output: String,
}

impl PassOutput {
    /// A process that ran to completion.
    pub fn exited(code: i32, output: impl Into<String>) -> Self {
        Self {
            status: PassStatus::Exited(code),
            output: output.into(),
        }
    }

    /// A process that was killed after `timeout`.
    pub fn timed_out(program: &str, timeout: Duration) -> Self {
        Self {
            status: PassStatus::TimedOut,
            output: format!(
                "Command timed out after {}s: {}",
                timeout.as_secs(),
                program
            ),
        }
    }

    /// An executable that does not exist.
    pub fn not_found(program: &str) -> Self {
        Self {
            status: PassStatus::NotFound,
            output: format!("Command not found: {}", program),
        }
    }

    /// A process that could not be started or awaited.
    pub fn spawn_failed(program: &str, error: &std::io::Error) -> Self {
        let message = format!("Failed to run {}: {}", program, error);
        Self {
            status: PassStatus::SpawnFailed(error.to_string()),
            output: message,
        }
    }

    /// True iff the process exited with code 0.
    pub fn success(&self) -> bool {
        self.status == PassStatus::Exited(0)
    }
}

/// Runs compiler and resolver invocations.
///
/// Implementations must be `Send + Sync`: one runner is shared by every
/// compile request in the process.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` in `cwd` and wait for it (up to its timeout).
    async fn run(&self, invocation: &Invocation, cwd: &Path) -> PassOutput;
}

/// Resolves tool names to binaries.
///
/// Lookup order for a tool `name`:
/// 1. `PULSE_TEX_<NAME>` environment variable pointing at a file
/// 2. System PATH via `which`
///
/// Results are memoised per tool. Unresolved tools resolve to the bare name,
/// so spawning them reports "not found".
#[derive(Debug, Default)]
pub struct ToolLocator {
    resolved: Mutex<HashMap<String, Option<PathBuf>>>,
}

impl ToolLocator {
    /// Create an empty locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment variable that overrides the binary for `name`.
    pub fn env_var(name: &str) -> String {
        format!("PULSE_TEX_{}", name.to_uppercase().replace('-', "_"))
    }

    /// Find the binary for `name`, if installed.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        let mut resolved = self
            .resolved
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        resolved
            .entry(name.to_string())
            .or_insert_with(|| find_binary(name))
            .clone()
    }

    /// The program to spawn for `name`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.lookup(name).unwrap_or_else(|| PathBuf::from(name))
    }
}

fn find_binary(name: &str) -> Option<PathBuf> {
    if let Ok(path) = std::env::var(ToolLocator::env_var(name)) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
        tracing::warn!(
            tool = name,
            path = %path.display(),
            "ignoring tool override that is not a file"
        );
    }
    which::which(name).ok()
}

/// Runs invocations as native subprocesses.
#[derive(Debug, Default)]
pub struct NativeRunner {
    tools: ToolLocator,
}

impl NativeRunner {
    /// Create a runner with a fresh tool locator.
    pub fn new() -> Self {
        Self::default()
    }

    /// The runner's tool locator.
    pub fn tools(&self) -> &ToolLocator {
        &self.tools
    }
}

#[async_trait]
impl CommandRunner for NativeRunner {
    async fn run(&self, invocation: &Invocation, cwd: &Path) -> PassOutput {
        let program = self.tools.resolve(&invocation.program);
        tracing::debug!(
            command = %invocation.command_line(),
            binary = %program.display(),
            cwd = %cwd.display(),
            "running pass"
        );

        let child = tokio::process::Command::new(&program)
            .args(&invocation.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return PassOutput::not_found(&invocation.program);
            }
            Err(e) => return PassOutput::spawn_failed(&invocation.program, &e),
        };

        // Dropping the future on timeout drops the child, which kills it.
        match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));
                PassOutput::exited(output.status.code().unwrap_or(-1), text)
            }
            Ok(Err(e)) => PassOutput::spawn_failed(&invocation.program, &e),
            Err(_) => PassOutput::timed_out(&invocation.program, invocation.timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let inv = Invocation::new(
            "pdflatex",
            ["-interaction=nonstopmode", "main.tex"],
            Duration::from_secs(1),
        );
        assert_eq!(inv.command_line(), "pdflatex -interaction=nonstopmode main.tex");
    }

    #[test]
    fn test_pass_output_success() {
        assert!(PassOutput::exited(0, "ok").success());
        assert!(!PassOutput::exited(1, "bad").success());
        assert!(!PassOutput::not_found("biber").success());
        assert!(!PassOutput::timed_out("biber", Duration::from_secs(5)).success());
    }

    #[test]
    fn test_diagnostic_lines() {
        assert_eq!(
            PassOutput::not_found("bibtex").output,
            "Command not found: bibtex"
        );
        assert_eq!(
            PassOutput::timed_out("tectonic", Duration::from_secs(180)).output,
            "Command timed out after 180s: tectonic"
        );
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(ToolLocator::env_var("pdflatex"), "PULSE_TEX_PDFLATEX");
        assert_eq!(ToolLocator::env_var("my-tex"), "PULSE_TEX_MY_TEX");
    }

    #[test]
    fn test_unresolved_tool_falls_back_to_name() {
        let tools = ToolLocator::new();
        let name = "pulse-tex-no-such-tool-8c1f";
        assert_eq!(tools.lookup(name), None);
        assert_eq!(tools.resolve(name), PathBuf::from(name));
    }

    #[cfg(unix)]
    #[test]
    fn test_runner_resolves_tools_on_path() {
        let runner = NativeRunner::new();
        let sh = runner.tools().lookup("sh").unwrap();
        assert!(sh.is_file());
        assert_eq!(runner.tools().resolve("sh"), sh);
    }

    #[tokio::test]
    async fn test_missing_executable_is_failed_pass() {
        let runner = NativeRunner::new();
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new(
            "pulse-tex-no-such-tool-8c1f",
            ["main.tex"],
            Duration::from_secs(5),
        );

        let out = runner.run(&inv, dir.path()).await;
        assert_eq!(out.status, PassStatus::NotFound);
        assert!(out.output.contains("Command not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_and_output_captured() {
        let runner = NativeRunner::new();
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new(
            "sh",
            ["-c", "echo out; echo err 1>&2; exit 3"],
            Duration::from_secs(10),
        );

        let out = runner.run(&inv, dir.path()).await;
        assert_eq!(out.status, PassStatus::Exited(3));
        assert_eq!(out.output, "out\nerr\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let runner = NativeRunner::new();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let inv = Invocation::new("sh", ["-c", "cat marker.txt"], Duration::from_secs(10));

        let out = runner.run(&inv, dir.path()).await;
        assert!(out.success());
        assert_eq!(out.output, "here");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_is_failed_pass() {
        let runner = NativeRunner::new();
        let dir = tempfile::tempdir().unwrap();
        let inv = Invocation::new("sh", ["-c", "sleep 5"], Duration::from_millis(100));

        let out = runner.run(&inv, dir.path()).await;
        assert_eq!(out.status, PassStatus::TimedOut);
        assert!(out.output.starts_with("Command timed out"));
    }
}
