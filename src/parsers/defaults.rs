//! `defaults` output: XML plist exports and the domain list

use plist::Value;

use crate::error::Result;

/// Parse the XML plist printed by `defaults export <domain> -`
pub fn parse_defaults_export(xml: &str) -> Result<Value> {
    Ok(Value::from_reader_xml(xml.as_bytes())?)
}

/// `defaults domains` prints one comma separated line
pub fn parse_domains(text: &str) -> Vec<String> {
    let mut domains: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from)
        .collect();
    domains.sort();
    domains
}

/// Lossy conversion for `--json` output. Binary data becomes a byte count.
pub fn plist_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;

    match value {
        Value::Dictionary(dict) => Json::Object(
            dict.iter()
                .map(|(k, v)| (k.clone(), plist_to_json(v)))
                .collect(),
        ),
        Value::Array(items) => Json::Array(items.iter().map(plist_to_json).collect()),
        Value::Boolean(b) => Json::Bool(*b),
        Value::String(s) => Json::String(s.clone()),
        Value::Integer(i) => {
            if let Some(n) = i.as_signed() {
                Json::from(n)
            } else if let Some(n) = i.as_unsigned() {
                Json::from(n)
            } else {
                Json::Null
            }
        }
        Value::Real(f) => serde_json::Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::Date(d) => Json::String(d.to_xml_format()),
        Value::Data(bytes) => Json::String(format!("<{} bytes>", bytes.len())),
        Value::Uid(uid) => Json::from(uid.get()),
        _ => Json::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>onboardingDone</key>
	<true/>
	<key>launchCount</key>
	<integer>7</integer>
	<key>username</key>
	<string>alice</string>
	<key>tags</key>
	<array>
		<string>a</string>
		<string>b</string>
	</array>
</dict>
</plist>
"#;

    #[test]
    fn test_parse_export() {
        let value = parse_defaults_export(EXPORT).unwrap();
        let dict = value.as_dictionary().unwrap();
        assert_eq!(dict.get("username").and_then(Value::as_string), Some("alice"));
        assert_eq!(dict.get("onboardingDone").and_then(Value::as_boolean), Some(true));
    }

    #[test]
    fn test_to_json() {
        let value = parse_defaults_export(EXPORT).unwrap();
        let json = plist_to_json(&value);
        assert_eq!(json["launchCount"], 7);
        assert_eq!(json["tags"][1], "b");
        assert_eq!(json["onboardingDone"], true);
    }

    #[test]
    fn test_garbage_is_error() {
        assert!(parse_defaults_export("Domain com.x does not exist").is_err());
    }

    #[test]
    fn test_parse_domains() {
        let domains = parse_domains("com.zeta, com.apple.Maps,  ,com.alpha\n");
        assert_eq!(domains, vec!["com.alpha", "com.apple.Maps", "com.zeta"]);
    }
}
