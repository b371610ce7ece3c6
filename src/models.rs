//! Records decoded from simctl output

use std::fmt;

use serde::{Deserialize, Serialize};

const RUNTIME_PREFIX: &str = "com.apple.CoreSimulator.SimRuntime.";

/// Simulator lifecycle state as reported by `simctl list devices --json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceState {
    Shutdown,
    Booted,
    Booting,
    #[serde(rename = "Shutting Down")]
    ShuttingDown,
    Creating,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceState::Shutdown => write!(f, "Shutdown"),
            DeviceState::Booted => write!(f, "Booted"),
            DeviceState::Booting => write!(f, "Booting"),
            DeviceState::ShuttingDown => write!(f, "Shutting Down"),
            DeviceState::Creating => write!(f, "Creating"),
            DeviceState::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub udid: String,
    pub name: String,
    pub state: DeviceState,
    /// Runtime identifier, e.g. `com.apple.CoreSimulator.SimRuntime.iOS-17-0`
    pub runtime: String,
    pub is_available: bool,
}

impl Device {
    pub fn is_booted(&self) -> bool {
        self.state == DeviceState::Booted
    }

    pub fn runtime_version(&self) -> String {
        runtime_version(&self.runtime)
    }
}

/// `com.apple.CoreSimulator.SimRuntime.iOS-17-0` -> `iOS 17 0`
pub fn runtime_version(runtime: &str) -> String {
    runtime
        .strip_prefix(RUNTIME_PREFIX)
        .unwrap_or(runtime)
        .replace('-', " ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    User,
    System,
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppType::User => write!(f, "user"),
            AppType::System => write!(f, "system"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct App {
    pub bundle_id: String,
    pub name: String,
    pub path: String,
    pub app_type: AppType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeychainItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}
