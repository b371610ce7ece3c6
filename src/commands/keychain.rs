//! Keychain items belonging to an app

use anyhow::Result;
use colored::Colorize;
use log::{debug, warn};

use crate::error;
use crate::models::KeychainItem;
use crate::parsers::parse_keychain_dump;
use crate::simctl::Simctl;
use super::{print_json, Session};

const DUMP_KEYCHAIN: &str = "security dump-keychain -d";

/// Keychain items whose service mentions `bundle_id`.
///
/// Tries a raw dump inside the simulator first. If that is refused, only the
/// app's data container is resolved (so a missing app still errors) and the
/// result is empty: the container keychain is not readable from the host.
pub fn fetch_keychain_items(sim: &Simctl, udid: &str, bundle_id: &str) -> error::Result<Vec<KeychainItem>> {
    match sim.run(["spawn", udid, "/bin/sh", "-c", DUMP_KEYCHAIN]) {
        Ok(output) => Ok(parse_keychain_dump(&output, bundle_id)),
        Err(e) => {
            warn!("keychain dump failed, falling back to app container: {}", e);
            let container = sim.run(["get_app_container", udid, bundle_id, "data"])?;
            debug!("data container for {}: {}", bundle_id, container);
            Ok(Vec::new())
        }
    }
}

pub fn cmd_keychain(session: &Session, bundle_id: &str, json: bool) -> Result<()> {
    let udid = session.udid()?;
    let items = fetch_keychain_items(&session.sim, &udid, bundle_id)?;

    if json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("{}", format!("No keychain items found for {}", bundle_id).yellow());
        return Ok(());
    }

    println!("{}", format!("Keychain items for {} ({}):", bundle_id, items.len()).bold());
    for item in &items {
        println!("  {}", item.service.cyan());
        if let Some(account) = &item.account {
            println!("    account: {}", account);
        }
        if let Some(group) = &item.access_group {
            println!("    access group: {}", group.dimmed());
        }
        if let Some(data) = &item.data {
            println!("    data: {}", data);
        }
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::SimError;

    // Fake simctl: arguments arrive as $1..$n
    fn fake(script: &str) -> Simctl {
        Simctl::with_prefix("sh", ["-c", script, "sh"])
    }

    #[test]
    fn test_dump_is_parsed() {
        let sim = fake(r#"printf 'keychain: "/db"\n    "svce"<blob>="com.example.app"\n    "acct"<blob>="me"\n'"#);
        let items = fetch_keychain_items(&sim, "UDID", "com.example.app").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].account.as_deref(), Some("me"));
    }

    #[test]
    fn test_fallback_is_empty() {
        let sim = fake(r#"if [ "$1" = spawn ]; then echo denied; exit 1; fi; echo /containers/data"#);
        let items = fetch_keychain_items(&sim, "UDID", "com.example.app").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_fallback_surfaces_missing_app() {
        let sim = fake("echo 'No such app'; exit 2");
        match fetch_keychain_items(&sim, "UDID", "com.missing") {
            Err(SimError::CommandFailed { output }) => assert_eq!(output, "No such app\n"),
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_dump_runs_security_in_device_shell() {
        use crate::commands::testing::Recorder;

        let rec = Recorder::with_output("keychain: \"/db\"\n    \"svce\"<blob>=\"com.example.app\"\n");
        cmd_keychain(&rec.session, "com.example.app", true).unwrap();
        assert_eq!(rec.calls(), vec!["spawn booted /bin/sh -c security dump-keychain -d"]);
    }
}
