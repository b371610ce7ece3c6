//! App defaults (`simctl spawn <udid> defaults ...`)

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use log::debug;
use plist::Value;

use crate::error::SimError;
use crate::parsers::{parse_defaults_export, parse_domains, plist_to_json};
use super::{print_json, Session};

/// Value type for `defaults write`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueType {
    #[value(name = "string")]
    Str,
    Int,
    Float,
    Bool,
}

impl ValueType {
    fn name(self) -> &'static str {
        match self {
            ValueType::Str => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            ValueType::Str => "-string",
            ValueType::Int => "-int",
            ValueType::Float => "-float",
            ValueType::Bool => "-bool",
        }
    }

    /// Check `value` parses as this type; returns the form passed to `defaults`
    pub fn normalize(self, value: &str) -> Result<String, SimError> {
        let invalid = || SimError::validation(format!("'{}' is not a valid {} value", value, self.name()));
        match self {
            ValueType::Str => Ok(value.to_string()),
            ValueType::Int => value.trim().parse::<i64>().map(|n| n.to_string()).map_err(|_| invalid()),
            ValueType::Float => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(|n| n.to_string())
                .ok_or_else(invalid),
            ValueType::Bool => match value.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok("true".to_string()),
                "false" | "no" | "0" => Ok("false".to_string()),
                _ => Err(invalid()),
            },
        }
    }
}

pub fn cmd_read(session: &Session, bundle_id: &str, key: Option<&str>, json: bool) -> Result<()> {
    let udid = session.udid()?;
    let output = session
        .sim
        .run(["spawn", udid.as_str(), "defaults", "export", bundle_id, "-"])
        .with_context(|| format!("Failed to read defaults for {}", bundle_id))?;

    // Display only; fall back to the raw text when it is not a plist
    let value = match parse_defaults_export(&output) {
        Ok(value) => value,
        Err(e) => {
            debug!("defaults export not parseable: {}", e);
            println!("{}", output);
            return Ok(());
        }
    };

    let value = match key {
        Some(k) => match value.as_dictionary().and_then(|d| d.get(k)) {
            Some(v) => v.clone(),
            None => return Err(SimError::validation(format!("key '{}' not found in {}", k, bundle_id)).into()),
        },
        None => value,
    };

    if json {
        return print_json(&plist_to_json(&value));
    }

    match key {
        Some(k) => println!("{} = {}", k.cyan(), render_inline(&value)),
        None => {
            println!("{}", format!("Defaults for {}:", bundle_id).bold());
            print!("{}", render_plist(&value, 1));
        }
    }
    Ok(())
}

pub fn cmd_write(session: &Session, bundle_id: &str, key: &str, value: &str, value_type: ValueType) -> Result<()> {
    let value = value_type.normalize(value)?;
    let udid = session.udid()?;
    session
        .sim
        .run(["spawn", udid.as_str(), "defaults", "write", bundle_id, key, value_type.flag(), value.as_str()])
        .with_context(|| format!("Failed to write {} for {}", key, bundle_id))?;

    println!("{} {} = {}", "Wrote".green(), key.cyan(), value);
    Ok(())
}

pub fn cmd_delete(session: &Session, bundle_id: &str, key: Option<&str>) -> Result<()> {
    let udid = session.udid()?;
    let mut args = vec!["spawn", udid.as_str(), "defaults", "delete", bundle_id];
    if let Some(k) = key {
        args.push(k);
    }
    session
        .sim
        .run(&args)
        .with_context(|| format!("Failed to delete defaults for {}", bundle_id))?;

    match key {
        Some(k) => println!("{} {} from {}", "Deleted".green(), k.cyan(), bundle_id),
        None => println!("{} all defaults for {}", "Deleted".green(), bundle_id),
    }
    Ok(())
}

pub fn cmd_list(session: &Session, json: bool) -> Result<()> {
    let udid = session.udid()?;
    let output = session
        .sim
        .run(["spawn", udid.as_str(), "defaults", "domains"])
        .context("Failed to list defaults domains")?;
    let domains = parse_domains(&output);

    if json {
        return print_json(&domains);
    }

    println!("{}", format!("Defaults domains ({}):", domains.len()).bold());
    for domain in &domains {
        println!("  {}", domain);
    }
    Ok(())
}

fn render_inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Date(d) => d.to_xml_format(),
        Value::Data(bytes) => format!("<{} bytes>", bytes.len()),
        Value::Uid(uid) => format!("uid {}", uid.get()),
        Value::Array(items) if items.is_empty() => "()".to_string(),
        Value::Dictionary(dict) if dict.is_empty() => "{}".to_string(),
        _ => format!("\n{}", render_plist(value, 1).trim_end()),
    }
}

/// Indented `key = value` rendering of nested plists
fn render_plist(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let mut out = String::new();

    match value {
        Value::Dictionary(dict) => {
            for (k, v) in dict.iter() {
                match v {
                    Value::Dictionary(d) if !d.is_empty() => {
                        let _ = writeln!(out, "{}{} =", pad, k.cyan());
                        out.push_str(&render_plist(v, indent + 1));
                    }
                    Value::Array(a) if !a.is_empty() => {
                        let _ = writeln!(out, "{}{} =", pad, k.cyan());
                        out.push_str(&render_plist(v, indent + 1));
                    }
                    _ => {
                        let _ = writeln!(out, "{}{} = {}", pad, k.cyan(), render_inline(v));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::Dictionary(_) | Value::Array(_) => {
                        let _ = writeln!(out, "{}-", pad);
                        out.push_str(&render_plist(item, indent + 1));
                    }
                    _ => {
                        let _ = writeln!(out, "{}- {}", pad, render_inline(item));
                    }
                }
            }
        }
        other => {
            let _ = writeln!(out, "{}{}", pad, render_inline(other));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_values() {
        assert_eq!(ValueType::Int.normalize(" 42 ").unwrap(), "42");
        assert_eq!(ValueType::Bool.normalize("YES").unwrap(), "true");
        assert_eq!(ValueType::Float.normalize("1.5").unwrap(), "1.5");
        assert_eq!(ValueType::Str.normalize(" keep ").unwrap(), " keep ");
        assert!(matches!(ValueType::Int.normalize("four"), Err(SimError::Validation(_))));
        assert!(ValueType::Bool.normalize("maybe").is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        for value in ["NaN", "inf", "-infinity"] {
            assert!(matches!(ValueType::Float.normalize(value), Err(SimError::Validation(_))), "{}", value);
        }
    }

    #[test]
    fn test_render_plist() {
        colored::control::set_override(false);
        let mut inner = plist::Dictionary::new();
        inner.insert("depth".to_string(), Value::Integer(2.into()));
        let mut dict = plist::Dictionary::new();
        dict.insert("name".to_string(), Value::String("alice".to_string()));
        dict.insert("nested".to_string(), Value::Dictionary(inner));
        dict.insert("list".to_string(), Value::Array(vec![Value::Boolean(true)]));

        let text = render_plist(&Value::Dictionary(dict), 0);
        assert_eq!(text, "name = alice\nnested =\n  depth = 2\nlist =\n  - true\n");
    }

    #[cfg(unix)]
    mod invocations {
        use super::*;
        use crate::commands::testing::Recorder;

        const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>launchCount</key>
    <integer>3</integer>
</dict>
</plist>
"#;

        #[test]
        fn test_write_passes_type_flag_and_normalized_value() {
            let rec = Recorder::new();
            cmd_write(&rec.session, "com.example.app", "launchCount", " 42 ", ValueType::Int).unwrap();
            cmd_write(&rec.session, "com.example.app", "onboarded", "YES", ValueType::Bool).unwrap();

            assert_eq!(
                rec.calls(),
                vec![
                    "spawn booted defaults write com.example.app launchCount -int 42",
                    "spawn booted defaults write com.example.app onboarded -bool true",
                ]
            );
        }

        #[test]
        fn test_invalid_value_never_reaches_simctl() {
            let rec = Recorder::new();
            assert!(cmd_write(&rec.session, "com.example.app", "ratio", "NaN", ValueType::Float).is_err());
            assert!(rec.calls().is_empty());
        }

        #[test]
        fn test_delete_key_and_whole_domain() {
            let rec = Recorder::new();
            cmd_delete(&rec.session, "com.example.app", Some("launchCount")).unwrap();
            cmd_delete(&rec.session, "com.example.app", None).unwrap();

            assert_eq!(
                rec.calls(),
                vec![
                    "spawn booted defaults delete com.example.app launchCount",
                    "spawn booted defaults delete com.example.app",
                ]
            );
        }

        #[test]
        fn test_read_exports_to_stdout() {
            let rec = Recorder::with_output(EXPORT);
            cmd_read(&rec.session, "com.example.app", Some("launchCount"), true).unwrap();
            assert_eq!(rec.calls(), vec!["spawn booted defaults export com.example.app -"]);
        }

        #[test]
        fn test_read_missing_key_is_an_error() {
            let rec = Recorder::with_output(EXPORT);
            for json in [true, false] {
                let err = cmd_read(&rec.session, "com.example.app", Some("missing"), json).unwrap_err();
                assert!(matches!(err.downcast_ref::<SimError>(), Some(SimError::Validation(_))));
                assert!(err.to_string().contains("missing"));
            }
        }

        #[test]
        fn test_list_runs_domains() {
            let rec = Recorder::with_output("com.apple.Maps, com.example.app");
            cmd_list(&rec.session, true).unwrap();
            assert_eq!(rec.calls(), vec!["spawn booted defaults domains"]);
        }
    }
}
