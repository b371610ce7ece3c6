//! Process invoker for `xcrun simctl`
//!
//! Every command in the crate ends up here: the argument vector is appended
//! to a fixed prefix (`simctl` by default), the process runs to completion,
//! and stdout/stderr come back as one captured text.

use std::ffi::OsStr;
use std::io::Read;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Result, SimError};

/// Default launcher for simctl
pub const XCRUN: &str = "xcrun";

#[derive(Debug, Clone)]
pub struct Simctl {
    program: String,
    prefix: Vec<String>,
}

impl Simctl {
    /// Invoke `<program> simctl <args...>`
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_prefix(program, ["simctl"])
    }

    /// Invoke `<program> <prefix...> <args...>`
    pub fn with_prefix<I, S>(program: impl Into<String>, prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            prefix: prefix.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run simctl and wait for it to exit.
    ///
    /// Stdout and stderr share one pipe, so the captured text keeps the order
    /// simctl printed it in. On success the text is trimmed; on a non-zero
    /// exit it is returned verbatim inside [`SimError::CommandFailed`], since
    /// simctl does not separate its error messages from normal output.
    pub fn run<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        debug!("{} {:?} {:?}", self.program, self.prefix, args);

        let (mut reader, writer) = std::io::pipe().map_err(SimError::Spawn)?;
        let err_writer = writer.try_clone().map_err(SimError::Spawn)?;

        // The Command holds the write ends; it must be dropped before reading
        // or the pipe never reaches EOF.
        let mut child = {
            let mut command = Command::new(&self.program);
            command
                .args(&self.prefix)
                .args(&args)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(err_writer);
            command.spawn().map_err(SimError::Spawn)?
        };

        let mut captured = Vec::new();
        let read = reader.read_to_end(&mut captured);
        let status = child.wait()?;
        read?;

        let text = String::from_utf8_lossy(&captured).into_owned();
        if status.success() {
            Ok(text.trim().to_string())
        } else {
            debug!("simctl exited with {}", status);
            Err(SimError::CommandFailed { output: text })
        }
    }
}

impl Default for Simctl {
    fn default() -> Self {
        Self::new(XCRUN)
    }
}
