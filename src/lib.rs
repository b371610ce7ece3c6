//! simkit library - simctl invocation, output parsers and command handlers

pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod simctl;

pub use config::Config;
pub use error::SimError;
pub use models::{App, AppType, Device, DeviceState, KeychainItem};
pub use simctl::Simctl;
