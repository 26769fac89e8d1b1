//! Package query execution.

use crate::error::{FactError, Result};
use std::fmt;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Placeholder substituted with the capability name in query argv templates.
pub const CAPABILITY_PLACEHOLDER: &str = "{capability}";

/// A package query to run: program plus arguments, no shell involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryCommand {
    program: String,
    args: Vec<String>,
}

impl QueryCommand {
    /// Create a query command from a program and its arguments.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a query from an argv template, substituting `{capability}`.
    ///
    /// Returns `None` for an empty template.
    pub fn from_template(argv: &[String], capability: &str) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self {
            program: program.replace(CAPABILITY_PLACEHOLDER, capability),
            args: args
                .iter()
                .map(|a| a.replace(CAPABILITY_PLACEHOLDER, capability))
                .collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for QueryCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished query process.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error. Captured for diagnostics only.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,
}

impl QueryOutput {
    /// Create an output with the given exit code and stdout.
    pub fn new(exit_code: Option<i32>, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
            duration: Duration::ZERO,
        }
    }

    /// Whether the process exited with status 0.
    pub fn exited_zero(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs package queries.
///
/// The probe only talks to this trait, so tests can feed it canned output
/// instead of spawning a package manager.
pub trait QueryRunner: Send + Sync {
    /// Run the query to completion and capture its output.
    fn run(&self, command: &QueryCommand) -> Result<QueryOutput>;
}

/// Runs queries as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner that waits for the child without a deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child and fail with [`FactError::Timeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn spawn_failed(command: &QueryCommand, err: std::io::Error) -> FactError {
        FactError::SpawnFailed {
            program: command.program().to_string(),
            message: err.to_string(),
        }
    }

    fn timed_out(command: &QueryCommand, timeout: Duration) -> FactError {
        FactError::Timeout {
            program: command.program().to_string(),
            timeout,
        }
    }

    fn run_blocking(&self, command: &QueryCommand) -> Result<QueryOutput> {
        let start = Instant::now();

        let output = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_failed(command, e))?;

        Ok(QueryOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        })
    }

    /// Run with one deadline covering both the child's exit and the pipes
    /// closing, so a background descendant holding stdout cannot outlive it.
    fn run_with_deadline(&self, command: &QueryCommand, timeout: Duration) -> Result<QueryOutput> {
        let start = Instant::now();

        let mut child = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::spawn_failed(command, e))?;

        // Drain pipes on helper threads so a chatty child never blocks on a full pipe.
        let (tx, rx) = mpsc::channel();
        drain(child.stdout.take(), Captured::Stdout, tx.clone());
        drain(child.stderr.take(), Captured::Stderr, tx);

        let status = match child.wait_timeout(timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Self::timed_out(command, timeout));
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        };

        let mut stdout = None;
        let mut stderr = None;
        while stdout.is_none() || stderr.is_none() {
            let remaining = timeout.saturating_sub(start.elapsed());
            match rx.recv_timeout(remaining) {
                Ok(Captured::Stdout(text)) => stdout = Some(text),
                Ok(Captured::Stderr(text)) => stderr = Some(text),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::debug!("'{}' exited but its output pipes stayed open", command);
                    return Err(Self::timed_out(command, timeout));
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        Ok(QueryOutput {
            exit_code: status.code(),
            stdout: stdout.unwrap_or_default(),
            stderr: stderr.unwrap_or_default(),
            duration: start.elapsed(),
        })
    }
}

impl QueryRunner for SystemRunner {
    fn run(&self, command: &QueryCommand) -> Result<QueryOutput> {
        tracing::debug!("Running package query: {}", command);
        let output = match self.timeout {
            Some(timeout) => self.run_with_deadline(command, timeout)?,
            None => self.run_blocking(command)?,
        };
        tracing::trace!(
            "Query '{}' exited with {:?} in {:?}",
            command,
            output.exit_code,
            output.duration
        );
        Ok(output)
    }
}

/// Full contents of one output pipe, read to EOF.
enum Captured {
    Stdout(String),
    Stderr(String),
}

fn drain<R>(pipe: Option<R>, wrap: fn(String) -> Captured, tx: mpsc::Sender<Captured>)
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(wrap(String::from_utf8_lossy(&buf).to_string()));
    });
}
