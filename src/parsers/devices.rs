//! Device list decoding (`simctl list devices --json`)

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::models::{Device, DeviceState};

#[derive(Deserialize)]
struct DeviceList {
    /// Runtime identifier -> devices; the runtime is only known from the key
    devices: BTreeMap<String, Vec<RawDevice>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDevice {
    udid: String,
    name: String,
    state: DeviceState,
    #[serde(default = "default_available")]
    is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Flatten the per-runtime device map into a single list.
///
/// Runtimes are visited in sorted order, so the result is deterministic.
pub fn parse_device_list(json: &str) -> Result<Vec<Device>> {
    let list: DeviceList = serde_json::from_str(json)?;

    let devices = list
        .devices
        .into_iter()
        .flat_map(|(runtime, devices)| {
            devices.into_iter().map(move |d| Device {
                udid: d.udid,
                name: d.name,
                state: d.state,
                runtime: runtime.clone(),
                is_available: d.is_available,
            })
        })
        .collect();

    Ok(devices)
}

/// UDID of the first booted device
pub fn find_booted(devices: &[Device]) -> Result<String> {
    devices
        .iter()
        .find(|d| d.is_booted())
        .map(|d| d.udid.clone())
        .ok_or(SimError::NoBootedDevice)
}
