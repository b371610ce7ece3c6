//! Parsers for simctl output
//!
//! simctl speaks several dialects, each handled by its own module:
//! - devices: `list devices --json` (JSON)
//! - apps: `listapps` (old-style plist text dump)
//! - keychain: `security dump-keychain` text output
//! - defaults: `defaults export` (XML plist) and `defaults domains`
//!
//! The text dumps are undocumented formats; the parsers are best-effort
//! line scanners and are pinned by the fixtures in `tests/fixtures/`.

pub mod apps;
pub mod defaults;
pub mod devices;
pub mod keychain;

pub use apps::parse_app_list;
pub use defaults::{parse_defaults_export, parse_domains, plist_to_json};
pub use devices::{find_booted, parse_device_list};
pub use keychain::parse_keychain_dump;
