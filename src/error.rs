//! Error type shared by the invoker, parsers and device resolution

use std::io;

use thiserror::Error;

/// Failures surfaced by talking to `simctl` and decoding what it prints
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SimError {
    /// simctl exited non-zero; `output` is everything it printed, untouched
    #[error("simctl command failed:\n{output}")]
    CommandFailed { output: String },

    #[error("no booted simulator found (boot one or pass --device)")]
    NoBootedDevice,

    #[error("invalid JSON from simctl: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("failed to launch simctl: {0}")]
    Spawn(#[source] io::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid plist: {0}")]
    Plist(#[from] plist::Error),
}

impl SimError {
    pub fn validation(msg: impl Into<String>) -> Self {
        SimError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
