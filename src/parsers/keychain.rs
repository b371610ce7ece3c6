//! Keychain dump parser (`security dump-keychain -d` text)
//!
//! Records look like:
//!
//! ```text
//! keychain: "/Library/Keychains/keychain-2-debug.db"
//! class: "genp"
//! attributes:
//!     "acct"<blob>="user@example.com"
//!     "agrp"<blob>="TEAMID.com.example.app"
//!     "svce"<blob>="com.example.app.session"
//! data:
//! "s3cr3t"
//! ```

use std::collections::HashMap;

use crate::models::KeychainItem;

const RECORD_MARKER: &str = "keychain:";

/// Items whose service contains `bundle_id` as a substring
pub fn parse_keychain_dump(text: &str, bundle_id: &str) -> Vec<KeychainItem> {
    let mut items = Vec::new();
    let mut record: HashMap<String, String> = HashMap::new();
    let mut expect_data = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with(RECORD_MARKER) {
            close(std::mem::take(&mut record), bundle_id, &mut items);
            expect_data = false;
            continue;
        }

        if trimmed == "data:" {
            expect_data = true;
            continue;
        }
        if expect_data {
            expect_data = false;
            if trimmed.starts_with('"') {
                record
                    .entry("data".to_string())
                    .or_insert_with(|| trimmed.trim_matches('"').to_string());
                continue;
            }
        }

        if let Some((key, value)) = attribute(trimmed) {
            record.insert(key.to_string(), value.to_string());
        }
    }
    close(record, bundle_id, &mut items);

    items
}

/// Split `"acct"<blob>="value"` into (`acct`, `value`)
fn attribute(line: &str) -> Option<(&str, &str)> {
    let eq = line.find("=\"")?;
    let rest = &line[eq + 2..];
    let value = match rest.find('"') {
        Some(end) => &rest[..end],
        None => rest,
    };

    let key = line[..eq].trim().trim_start_matches('"');
    let key = key.split(['"', '<']).next().unwrap_or(key).trim();
    Some((key, value))
}

fn close(record: HashMap<String, String>, bundle_id: &str, items: &mut Vec<KeychainItem>) {
    if record.is_empty() {
        return;
    }
    let Some(service) = record.get("svce") else {
        return;
    };
    if !service.contains(bundle_id) {
        return;
    }

    items.push(KeychainItem {
        account: record.get("acct").cloned(),
        service: service.clone(),
        access_group: record.get("agrp").cloned(),
        data: record.get("data").cloned(),
        created: None,
        modified: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_split() {
        assert_eq!(attribute(r#""acct"<blob>="me""#), Some(("acct", "me")));
        assert_eq!(attribute(r#"svce="plain""#), Some(("svce", "plain")));
        assert_eq!(attribute(r#""labl"<blob>=<NULL>"#), None);
    }

    #[test]
    fn test_filters_by_service_substring() {
        let text = r#"keychain: "/db"
    "acct"<blob>="alice"
    "svce"<blob>="com.example.target.auth"
    "agrp"<blob>="TEAM.com.example.target"
keychain: "/db"
    "acct"<blob>="bob"
    "svce"<blob>="com.other.app"
keychain: "/db"
    "acct"<blob>="carol"
    "svce"<blob>="com.example.target"
data:
"token-123"
"#;
        let items = parse_keychain_dump(text, "com.example.target");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].account.as_deref(), Some("alice"));
        assert_eq!(items[0].access_group.as_deref(), Some("TEAM.com.example.target"));
        assert_eq!(items[0].data, None);
        assert_eq!(items[1].account.as_deref(), Some("carol"));
        assert_eq!(items[1].service, "com.example.target");
        assert_eq!(items[1].data.as_deref(), Some("token-123"));
        assert!(items.iter().all(|i| i.created.is_none() && i.modified.is_none()));
    }

    #[test]
    fn test_record_without_service_is_dropped() {
        let text = "keychain: \"/db\"\n    \"acct\"<blob>=\"nobody\"\n";
        assert!(parse_keychain_dump(text, "com.example").is_empty());
    }
}
