//! `simctl listapps` parser
//!
//! listapps prints an old-style (NeXTSTEP) plist, one top-level block per
//! installed app:
//!
//! ```text
//!     "com.apple.Bridge" =     {
//!         ApplicationType = System;
//!         CFBundleDisplayName = Watch;
//!         GroupContainers =         {
//!             "group.com.apple.bridge" = "file:///...";
//!         };
//!         Path = "/Applications/Bridge.app";
//!     };
//! ```
//!
//! Only the flat `key = value;` lines of each block are collected; nested
//! dictionaries and arrays are skipped.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{App, AppType};

static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^\s*"([^"]+)"\s*=\s*\{\s*$"#).unwrap());

type Record = (String, HashMap<String, String>);

/// Parse listapps output into apps sorted by display name
pub fn parse_app_list(text: &str) -> Vec<App> {
    let mut apps = Vec::new();
    let mut current: Option<Record> = None;
    // Nesting inside the current block; only depth 0 lines are fields
    let mut depth = 0usize;

    for line in text.lines() {
        let trimmed = line.trim();

        if depth == 0 {
            if let Some(caps) = BLOCK_RE.captures(line) {
                flush(current.take(), &mut apps);
                current = Some((caps[1].to_string(), HashMap::new()));
                continue;
            }
        }

        let Some((_, fields)) = current.as_mut() else {
            continue;
        };

        if is_opener(trimmed) {
            depth += 1;
            continue;
        }
        if is_closer(trimmed) {
            if depth == 0 {
                flush(current.take(), &mut apps);
            } else {
                depth -= 1;
            }
            continue;
        }
        if depth > 0 {
            continue;
        }

        if let Some((key, value)) = trimmed.split_once('=') {
            let key = strip_value(key);
            if !key.is_empty() {
                fields.insert(key.to_string(), strip_value(value).to_string());
            }
        }
    }
    flush(current, &mut apps);

    apps.sort_by(|a, b| a.name.cmp(&b.name));
    apps
}

fn is_opener(line: &str) -> bool {
    line.ends_with('{') || line.ends_with('(')
}

fn is_closer(line: &str) -> bool {
    line.starts_with('}') || line.starts_with(')')
}

fn strip_value(s: &str) -> &str {
    s.trim_matches(|c: char| c == '"' || c == ';' || c.is_whitespace())
}

fn flush(record: Option<Record>, apps: &mut Vec<App>) {
    let Some((bundle_id, fields)) = record else {
        return;
    };
    if fields.is_empty() {
        return;
    }
    if let Some(app) = to_app(bundle_id, fields) {
        apps.push(app);
    }
}

fn to_app(bundle_id: String, mut fields: HashMap<String, String>) -> Option<App> {
    let path = fields.remove("Path").or_else(|| fields.remove("Bundle"))?;
    let name = fields
        .remove("CFBundleDisplayName")
        .or_else(|| fields.remove("CFBundleName"))
        .unwrap_or_else(|| bundle_id.clone());
    let app_type = match fields.get("ApplicationType").map(String::as_str) {
        Some("System") => AppType::System,
        _ => AppType::User,
    };

    Some(App { bundle_id, name, path, app_type })
}
