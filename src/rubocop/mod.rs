//! Driving the external `rubocop` binary.
//!
//! Runner: spawn (no shell) -> capped capture -> exit status normalization.
//! Exit code 1 with output means "offenses found" and is a success.

pub mod report;

use std::io::ErrorKind;
use std::process::Stdio;

use anyhow::{Context, bail};
use shell_words::split as shell_split;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::{Result, RubocopError};

pub use report::{LintReport, parse_report};

/// Default cap for each captured stream.
pub const DEFAULT_MAX_BUFFER: usize = 10 * 1024 * 1024;

/// Exit status rubocop uses when it found offenses.
const OFFENSES_FOUND: i32 = 1;

/// Captured output of one linter invocation.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub stdout: String,
    pub stderr: String,
}

/// Spawns the linter. Cheap to clone; holds no process state.
#[derive(Debug, Clone)]
pub struct Runner {
    program: String,
    base_args: Vec<String>,
    max_buffer: usize,
}

impl Runner {
    pub fn new(program: impl Into<String>, base_args: Vec<String>, max_buffer: usize) -> Self {
        Self {
            program: program.into(),
            base_args,
            max_buffer,
        }
    }

    /// Build a runner from a command line such as `bundle exec rubocop`.
    pub fn from_command_line(raw: &str, max_buffer: usize) -> anyhow::Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            bail!("RuboCop command is empty");
        }
        let mut parts =
            shell_split(trimmed).context("Failed to parse RuboCop command (shell splitting)")?;
        if parts.is_empty() || parts[0].is_empty() {
            bail!("Empty program name in RuboCop command");
        }
        let program = parts.remove(0);
        Ok(Self::new(program, parts, max_buffer))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn base_args(&self) -> &[String] {
        &self.base_args
    }

    /// Run the linter with `args` appended to the configured base arguments.
    pub async fn execute<S: AsRef<str>>(&self, args: &[S]) -> Result<Output> {
        let argv: Vec<&str> = self
            .base_args
            .iter()
            .map(String::as_str)
            .chain(args.iter().map(AsRef::as_ref))
            .collect();
        tracing::debug!(program = %self.program, ?argv, "spawning rubocop");

        let mut child = Command::new(&self.program)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RubocopError::NotInstalled,
                _ => RubocopError::execution(
                    format!("failed to start '{}': {e}", self.program),
                    None,
                    None,
                ),
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RubocopError::execution("stdout was not captured", None, None))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RubocopError::execution("stderr was not captured", None, None))?;

        // On overflow the error short-circuits and dropping `child` kills it.
        let (stdout, stderr) = tokio::try_join!(
            read_capped(stdout, self.max_buffer, "stdout"),
            read_capped(stderr, self.max_buffer, "stderr"),
        )?;

        let status = child.wait().await.map_err(|e| {
            RubocopError::execution(format!("failed waiting for rubocop: {e}"), None, None)
        })?;

        let output = Output {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        };

        if status.success() {
            return Ok(output);
        }
        if status.code() == Some(OFFENSES_FOUND) && !output.stdout.is_empty() {
            tracing::debug!("rubocop reported offenses (exit 1)");
            return Ok(output);
        }

        let message = match status.code() {
            Some(code) => format!("rubocop exited with status {code}"),
            None => "rubocop was terminated by a signal".to_string(),
        };
        Err(RubocopError::execution(
            message,
            status.code(),
            Some(output.stderr),
        ))
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new("rubocop", Vec::new(), DEFAULT_MAX_BUFFER)
    }
}

async fn read_capped<R: AsyncRead + Unpin>(
    mut reader: R,
    max: usize,
    stream: &'static str,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await.map_err(|e| {
            RubocopError::execution(format!("failed reading rubocop {stream}: {e}"), None, None)
        })?;
        if n == 0 {
            return Ok(buf);
        }
        if buf.len() + n > max {
            return Err(RubocopError::execution(
                format!("rubocop {stream} exceeded the maximum buffer of {max} bytes"),
                None,
                None,
            ));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// A logical lint request.
#[derive(Debug, Clone, Default)]
pub struct LintParams {
    pub path: String,
    pub auto_correct: bool,
    pub only: Option<String>,
    pub except: Option<String>,
}

impl LintParams {
    /// `--format json [-A] [--only X] [--except Y] <path>`
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--format".to_string(), "json".to_string()];
        if self.auto_correct {
            args.push("-A".to_string());
        }
        if let Some(only) = self.only.as_deref().filter(|s| !s.is_empty()) {
            args.push("--only".to_string());
            args.push(only.to_string());
        }
        if let Some(except) = self.except.as_deref().filter(|s| !s.is_empty()) {
            args.push("--except".to_string());
            args.push(except.to_string());
        }
        args.push(self.path.clone());
        args
    }
}

/// `--show-cops [cop]`
pub fn show_cops_args(cop: Option<&str>) -> Vec<String> {
    let mut args = vec!["--show-cops".to_string()];
    if let Some(cop) = cop {
        args.push(cop.to_string());
    }
    args
}

/// `--auto-gen-config <path>`
pub fn auto_gen_config_args(path: &str) -> Vec<String> {
    vec!["--auto-gen-config".to_string(), path.to_string()]
}
