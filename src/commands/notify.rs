//! Push notifications (`simctl push`)

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use serde_json::{json, Map, Value};
use tempfile::NamedTempFile;

use crate::error::{self, SimError};
use super::Session;

/// Payload key simctl uses to route a push to an app
pub const TARGET_BUNDLE_KEY: &str = "Simulator Target Bundle";

#[derive(Debug, Clone, Default)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub subtitle: Option<String>,
    pub badge: Option<u32>,
    pub sound: Option<String>,
}

impl Notification {
    /// Minimal APNs payload for this notification
    pub fn payload(&self, bundle_id: &str) -> Value {
        let mut alert = Map::new();
        alert.insert("title".to_string(), json!(self.title));
        alert.insert("body".to_string(), json!(self.body));
        if let Some(subtitle) = &self.subtitle {
            alert.insert("subtitle".to_string(), json!(subtitle));
        }

        let mut aps = Map::new();
        aps.insert("alert".to_string(), Value::Object(alert));
        if let Some(badge) = self.badge {
            aps.insert("badge".to_string(), json!(badge));
        }
        if let Some(sound) = &self.sound {
            aps.insert("sound".to_string(), json!(sound));
        }

        json!({
            "aps": aps,
            TARGET_BUNDLE_KEY: bundle_id,
        })
    }
}

/// A payload on disk; temporary payloads are removed when dropped
pub enum PayloadFile {
    Existing(PathBuf),
    Temp(NamedTempFile),
}

impl PayloadFile {
    pub fn path(&self) -> &Path {
        match self {
            PayloadFile::Existing(path) => path.as_path(),
            PayloadFile::Temp(file) => file.path(),
        }
    }

    /// Remove a temporary payload; failures are logged and ignored
    pub fn cleanup(self) {
        if let PayloadFile::Temp(file) = self {
            if let Err(e) = file.close() {
                warn!("failed to remove temporary payload: {}", e);
            }
        }
    }
}

/// Write `payload` to a uniquely named temporary `.apns` file
pub fn write_temp_payload(payload: &Value) -> error::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("simkit-push-")
        .suffix(".apns")
        .tempfile()?;
    write_payload(&mut file, payload)?;
    debug!("payload written to {}", file.path().display());
    Ok(file)
}

// Serialization of a `Value` only fails on IO, so the error is reported as such
fn write_payload<W: Write>(mut writer: W, payload: &Value) -> error::Result<()> {
    serde_json::to_writer_pretty(&mut writer, payload).map_err(io::Error::from)?;
    writer.flush()?;
    Ok(())
}

/// `input` is an existing file path or a literal JSON object.
///
/// Literal payloads get the target bundle key injected when missing and are
/// written to a temporary file.
pub fn prepare_payload(input: &str, bundle_id: &str) -> error::Result<PayloadFile> {
    let path = Path::new(input);
    if path.is_file() {
        return Ok(PayloadFile::Existing(path.to_path_buf()));
    }

    let mut payload: Value = serde_json::from_str(input).map_err(|e| {
        SimError::validation(format!("payload is neither a file nor valid JSON: {}", e))
    })?;
    let Some(object) = payload.as_object_mut() else {
        return Err(SimError::validation("payload must be a JSON object"));
    };
    if !object.contains_key(TARGET_BUNDLE_KEY) {
        object.insert(TARGET_BUNDLE_KEY.to_string(), json!(bundle_id));
    }

    Ok(PayloadFile::Temp(write_temp_payload(&payload)?))
}

fn deliver(session: &Session, bundle_id: &str, payload: PayloadFile) -> Result<()> {
    let udid = session.udid();
    let result = udid.and_then(|udid| {
        let path = payload.path().to_string_lossy().into_owned();
        session
            .sim
            .run(["push", udid.as_str(), bundle_id, path.as_str()])
            .with_context(|| format!("Failed to deliver notification to {}", bundle_id))
    });
    payload.cleanup();
    result.map(|_| ())
}

pub fn cmd_notify(session: &Session, bundle_id: &str, notification: &Notification) -> Result<()> {
    let file = write_temp_payload(&notification.payload(bundle_id))?;
    deliver(session, bundle_id, PayloadFile::Temp(file))?;

    println!("{} {}: {}", "Sent notification to".green(), bundle_id.cyan(), notification.title);
    Ok(())
}

pub fn cmd_push(session: &Session, bundle_id: &str, payload: &str) -> Result<()> {
    let file = prepare_payload(payload, bundle_id)?;
    deliver(session, bundle_id, file)?;

    println!("{} {}", "Pushed payload to".green(), bundle_id.cyan());
    Ok(())
}
