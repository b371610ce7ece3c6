//! Installed app listing (`simctl listapps`)

use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::models::{App, AppType};
use crate::parsers::parse_app_list;
use super::{print_json, Session};

/// Apps on the target device, sorted by display name
pub fn fetch_apps(session: &Session) -> Result<Vec<App>> {
    let udid = session.udid()?;
    let output = session
        .sim
        .run(["listapps", udid.as_str()])
        .context("Failed to list apps")?;
    Ok(parse_app_list(&output))
}

/// Keep apps matching `filter` (bundle id or name, case-insensitive) and `app_type`
pub fn filter_apps(apps: &mut Vec<App>, filter: Option<&str>, app_type: Option<AppType>) {
    if let Some(t) = app_type {
        apps.retain(|a| a.app_type == t);
    }
    if let Some(f) = filter {
        let f = f.to_lowercase();
        apps.retain(|a| a.bundle_id.to_lowercase().contains(&f) || a.name.to_lowercase().contains(&f));
    }
}

pub fn cmd_apps(session: &Session, json: bool, filter: Option<&str>, app_type: Option<AppType>) -> Result<()> {
    let start = Instant::now();

    let mut apps = fetch_apps(session)?;
    filter_apps(&mut apps, filter, app_type);

    if json {
        return print_json(&apps);
    }

    if apps.is_empty() {
        println!("{}", "No apps found".yellow());
    } else {
        println!("{}", format!("Installed apps ({}):", apps.len()).bold());
        for app in &apps {
            let kind = match app.app_type {
                AppType::System => "system".dimmed(),
                AppType::User => "user".green(),
            };
            println!("  {} {} [{}]", app.name.bold(), app.bundle_id.cyan(), kind);
            println!("    {}", app.path.dimmed());
        }
    }

    eprintln!("\n{}", format!("Time: {:?}", start.elapsed()).dimmed());
    Ok(())
}
