// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! External command execution (mount, rsync)

use crate::error::{MigrateError, Result};
use async_trait::async_trait;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

/// A program and its full argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command`, failing unless it exits with status zero
    async fn run(&self, command: &CommandLine) -> Result<()>;
}

/// Runs commands as child processes of this one
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    #[instrument(skip(self), fields(program = %command.program))]
    async fn run(&self, command: &CommandLine) -> Result<()> {
        let failed = |e: std::io::Error| MigrateError::CommandFailed {
            command: command.to_string(),
            reason: e.to_string(),
        };

        // stdout streams through so rsync progress shows as it happens
        let child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(failed)?;
        let output = child.wait_with_output().await.map_err(failed)?;

        if output.status.success() {
            debug!("{} succeeded", command.program);
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let reason = match output.status.code() {
            Some(code) => format!("exit status {}: {}", code, stderr.trim()),
            None => format!("terminated by signal: {}", stderr.trim()),
        };

        Err(MigrateError::CommandFailed {
            command: command.to_string(),
            reason,
        })
    }
}
