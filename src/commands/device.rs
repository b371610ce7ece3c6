//! Device IO: shake, simulated location, status bar overrides, URLs

use anyhow::{Context, Result};
use colored::Colorize;

use crate::error::SimError;
use super::Session;

/// Fields for `simctl status_bar override`; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBarOverride {
    pub time: Option<String>,
    pub battery_level: Option<u8>,
    pub cellular_bars: Option<u8>,
    pub wifi_bars: Option<u8>,
}

impl StatusBarOverride {
    pub fn is_empty(&self) -> bool {
        self.time.is_none()
            && self.battery_level.is_none()
            && self.cellular_bars.is_none()
            && self.wifi_bars.is_none()
    }

    /// Flags appended after `status_bar <udid> override`
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(time) = &self.time {
            args.extend(["--time".to_string(), time.clone()]);
        }
        if let Some(level) = self.battery_level {
            args.extend(["--batteryLevel".to_string(), level.to_string()]);
        }
        if let Some(bars) = self.cellular_bars {
            args.extend(["--cellularBars".to_string(), bars.to_string()]);
        }
        if let Some(bars) = self.wifi_bars {
            args.extend(["--wifiBars".to_string(), bars.to_string()]);
        }
        args
    }
}

/// `lat,lon` as simctl expects it
pub fn format_location(lat: f64, lon: f64) -> Result<String, SimError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(SimError::validation(format!("latitude {} out of range [-90, 90]", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(SimError::validation(format!("longitude {} out of range [-180, 180]", lon)));
    }
    Ok(format!("{},{}", lat, lon))
}

pub fn cmd_shake(session: &Session) -> Result<()> {
    let udid = session.udid()?;
    session
        .sim
        .run(["io", udid.as_str(), "shake"])
        .context("Failed to shake device")?;
    println!("{}", "Shook device".green());
    Ok(())
}

pub fn cmd_location(session: &Session, lat: f64, lon: f64) -> Result<()> {
    let coords = format_location(lat, lon)?;
    let udid = session.udid()?;
    session
        .sim
        .run(["location", udid.as_str(), "set", coords.as_str()])
        .context("Failed to set location")?;
    println!("{} {}", "Location set to".green(), coords);
    Ok(())
}

pub fn cmd_location_clear(session: &Session) -> Result<()> {
    let udid = session.udid()?;
    session
        .sim
        .run(["location", udid.as_str(), "clear"])
        .context("Failed to clear location")?;
    println!("{}", "Location cleared".green());
    Ok(())
}

pub fn cmd_status_bar(session: &Session, overrides: &StatusBarOverride) -> Result<()> {
    if overrides.is_empty() {
        println!(
            "{}",
            "Nothing to override: pass --time, --battery-level, --cellular-bars or --wifi-bars".yellow()
        );
        return Ok(());
    }

    let udid = session.udid()?;
    let mut args = vec!["status_bar".to_string(), udid, "override".to_string()];
    args.extend(overrides.args());
    session
        .sim
        .run(&args)
        .context("Failed to override status bar")?;
    println!("{}", "Status bar overridden".green());
    Ok(())
}

pub fn cmd_status_bar_clear(session: &Session) -> Result<()> {
    let udid = session.udid()?;
    session
        .sim
        .run(["status_bar", udid.as_str(), "clear"])
        .context("Failed to clear status bar")?;
    println!("{}", "Status bar cleared".green());
    Ok(())
}

pub fn cmd_open_url(session: &Session, url: &str) -> Result<()> {
    let udid = session.udid()?;
    session
        .sim
        .run(["openurl", udid.as_str(), url])
        .with_context(|| format!("Failed to open {}", url))?;
    println!("{} {}", "Opened".green(), url);
    Ok(())
}
