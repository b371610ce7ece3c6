//! Command implementations for the simkit CLI
//!
//! - devices: Device listing and target resolution
//! - apps: Installed app listing
//! - defaults: Read/write/delete/list app defaults
//! - keychain: Keychain items for an app
//! - notify: Push notifications (built or custom payloads)
//! - device: Device IO (shake, location, status bar, URLs)
//! - install: Install / uninstall apps
//! - files: Send files to the device

pub mod apps;
pub mod defaults;
pub mod device;
pub mod devices;
pub mod files;
pub mod install;
pub mod keychain;
pub mod notify;

use anyhow::Result;
use serde::Serialize;

use crate::config::Config;
use crate::simctl::Simctl;

/// Everything a command needs: the invoker and the resolved configuration
pub struct Session {
    pub sim: Simctl,
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            sim: Simctl::new(config.xcrun.clone()),
            config,
        }
    }

    /// Build a session around a custom invoker
    pub fn with_simctl(sim: Simctl, config: Config) -> Self {
        Self { sim, config }
    }

    /// UDID of the target device: `--device`/config if set, else the booted one
    pub fn udid(&self) -> Result<String> {
        Ok(devices::resolve_device(&self.sim, self.config.device.as_deref())?)
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
