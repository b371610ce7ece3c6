//! Device listing and target resolution

use std::sync::LazyLock;
use std::time::Instant;

use anyhow::Result;
use colored::Colorize;
use log::debug;
use regex::Regex;

use crate::error::{self, SimError};
use crate::models::Device;
use crate::parsers::{find_booted, parse_device_list};
use crate::simctl::Simctl;
use super::{print_json, Session};

static UDID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}$").unwrap()
});

/// All simulators across all runtimes
pub fn list_devices(sim: &Simctl) -> error::Result<Vec<Device>> {
    let output = sim.run(["list", "devices", "--json"])?;
    parse_device_list(&output)
}

/// UDID of the first booted simulator
pub fn current_device(sim: &Simctl) -> error::Result<String> {
    find_booted(&list_devices(sim)?)
}

/// Turn `--device` into a UDID.
///
/// UDIDs and the `booted` alias are passed through untouched; anything else
/// is looked up by name, preferring a booted match.
pub fn resolve_device(sim: &Simctl, explicit: Option<&str>) -> error::Result<String> {
    let Some(wanted) = explicit else {
        return current_device(sim);
    };
    if wanted == "booted" || UDID_RE.is_match(wanted) {
        return Ok(wanted.to_string());
    }

    debug!("resolving device by name: {}", wanted);
    let devices = list_devices(sim)?;
    select_by_name(&devices, wanted)
}

fn select_by_name(devices: &[Device], name: &str) -> error::Result<String> {
    let mut matches: Vec<&Device> = devices.iter().filter(|d| d.name == name).collect();
    matches.sort_by_key(|d| (!d.is_booted(), !d.is_available));
    matches
        .first()
        .map(|d| d.udid.clone())
        .ok_or_else(|| SimError::DeviceNotFound(name.to_string()))
}

/// Booted first, then by name
fn sort_for_display(devices: &mut [Device]) {
    devices.sort_by(|a, b| {
        b.is_booted()
            .cmp(&a.is_booted())
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.runtime.cmp(&b.runtime))
    });
}

pub fn cmd_devices(session: &Session, json: bool, booted_only: bool) -> Result<()> {
    let start = Instant::now();

    let mut devices = list_devices(&session.sim)?;
    if booted_only {
        devices.retain(Device::is_booted);
    }
    sort_for_display(&mut devices);

    if json {
        return print_json(&devices);
    }

    if devices.is_empty() {
        println!("{}", "No simulators found".yellow());
    } else {
        println!("{}", format!("Simulators ({}):", devices.len()).bold());
        for device in &devices {
            let state = if device.is_booted() {
                device.state.to_string().green()
            } else {
                device.state.to_string().dimmed()
            };
            let unavailable = if device.is_available { "" } else { " (unavailable)" };
            println!(
                "  {} {} [{}] {}{}",
                device.name.cyan(),
                device.runtime_version(),
                state,
                device.udid.dimmed(),
                unavailable.red()
            );
        }
    }

    eprintln!("\n{}", format!("Time: {:?}", start.elapsed()).dimmed());
    Ok(())
}
