//! Install / uninstall apps

use std::ffi::OsStr;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::error::SimError;
use super::Session;

/// Only `.app` bundles install on a simulator
pub fn validate_app_bundle(path: &Path) -> Result<(), SimError> {
    if !path.exists() {
        return Err(SimError::validation(format!("{} does not exist", path.display())));
    }
    let is_app = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("app"))
        .unwrap_or(false);
    if !is_app {
        return Err(SimError::validation(format!("{} is not an .app bundle", path.display())));
    }
    Ok(())
}

/// `y` / `yes`, any case
pub fn is_confirmed(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_confirmed(&answer))
}

pub fn cmd_install(session: &Session, path: &Path) -> Result<()> {
    validate_app_bundle(path)?;
    let udid = session.udid()?;

    println!("Installing {}...", path.display());
    session
        .sim
        .run([OsStr::new("install"), OsStr::new(&udid), path.as_os_str()])
        .with_context(|| format!("Failed to install {}", path.display()))?;

    println!("{} {}", "Installed".green(), path.display());
    Ok(())
}

pub fn cmd_uninstall(session: &Session, bundle_id: &str, force: bool) -> Result<()> {
    let udid = session.udid()?;

    if !force && !confirm(&format!("Uninstall {}?", bundle_id))? {
        println!("{}", "Cancelled".yellow());
        return Ok(());
    }

    session
        .sim
        .run(["uninstall", udid.as_str(), bundle_id])
        .with_context(|| format!("Failed to uninstall {}", bundle_id))?;

    println!("{} {}", "Uninstalled".green(), bundle_id.cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_confirmed() {
        assert!(is_confirmed("y\n"));
        assert!(is_confirmed("YES"));
        assert!(is_confirmed(" Yes "));
        assert!(!is_confirmed(""));
        assert!(!is_confirmed("n"));
        assert!(!is_confirmed("yep"));
    }

    #[test]
    fn test_validate_app_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let app = dir.path().join("Demo.app");
        std::fs::create_dir(&app).unwrap();
        let ipa = dir.path().join("Demo.ipa");
        std::fs::write(&ipa, b"zip").unwrap();

        assert!(validate_app_bundle(&app).is_ok());
        assert!(matches!(validate_app_bundle(&ipa), Err(SimError::Validation(_))));
        assert!(validate_app_bundle(&dir.path().join("Missing.app")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_install_and_forced_uninstall_argv() {
        use crate::commands::testing::Recorder;

        let rec = Recorder::new();
        let app = rec.dir().join("Demo.app");
        std::fs::create_dir(&app).unwrap();

        cmd_install(&rec.session, &app).unwrap();
        cmd_uninstall(&rec.session, "com.example.demo", true).unwrap();

        assert_eq!(
            rec.calls(),
            vec![
                format!("install booted {}", app.display()),
                "uninstall booted com.example.demo".to_string(),
            ]
        );
    }
}
