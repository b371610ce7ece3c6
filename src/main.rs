//! simkit - convenience CLI over `xcrun simctl`

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use simkit::commands::{self, defaults::ValueType, device::StatusBarOverride, notify::Notification, Session};
use simkit::{AppType, Config};

#[derive(Parser)]
#[command(name = "simkit")]
#[command(about = "Convenience commands for iOS Simulators on top of xcrun simctl")]
#[command(version)]
struct Cli {
    /// Target device: UDID or name (default: the booted simulator)
    #[arg(short, long, global = true)]
    device: Option<String>,

    /// Debug logging (SIMKIT_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List simulators across all runtimes
    Devices {
        /// Only booted simulators
        #[arg(long)]
        booted: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List installed apps
    Apps {
        /// Filter by bundle id or name (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
        /// Only system apps
        #[arg(long, conflicts_with = "user")]
        system: bool,
        /// Only user apps
        #[arg(long)]
        user: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read and modify app defaults
    Defaults {
        #[command(subcommand)]
        action: DefaultsAction,
    },
    /// Show keychain items stored by an app
    Keychain {
        /// Bundle identifier
        bundle_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Send a simple notification to an app
    Notify {
        /// Bundle identifier
        bundle_id: String,
        /// Notification title
        #[arg(short, long)]
        title: String,
        /// Notification body
        #[arg(short, long, default_value = "")]
        body: String,
        /// Notification subtitle
        #[arg(long)]
        subtitle: Option<String>,
        /// App icon badge count
        #[arg(long)]
        badge: Option<u32>,
        /// Sound name (e.g. "default")
        #[arg(long)]
        sound: Option<String>,
    },
    /// Push a custom APNs payload (file path or JSON string)
    Push {
        /// Bundle identifier
        bundle_id: String,
        /// Payload file or literal JSON
        payload: String,
    },
    /// Device IO and overrides
    Device {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Install an .app bundle
    Install {
        /// Path to the .app
        path: PathBuf,
    },
    /// Uninstall an app
    Uninstall {
        /// Bundle identifier
        bundle_id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Send a file: photos/videos to the media library, anything else to downloads
    Send {
        /// File to send
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum DefaultsAction {
    /// Print an app's defaults (or a single key)
    Read {
        /// Bundle identifier / defaults domain
        bundle_id: String,
        /// Key to read
        key: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a single key
    Write {
        bundle_id: String,
        key: String,
        value: String,
        /// Value type
        #[arg(short = 't', long = "type", value_enum, default_value = "string")]
        value_type: ValueType,
    },
    /// Delete a key, or the whole domain when no key is given
    Delete {
        bundle_id: String,
        key: Option<String>,
    },
    /// List defaults domains
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DeviceAction {
    /// Shake gesture
    Shake,
    /// Set simulated location
    Location {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Stop simulating location
    LocationClear,
    /// Override status bar values
    StatusBar {
        /// Time text, e.g. "9:41"
        #[arg(long)]
        time: Option<String>,
        /// Battery level 0-100
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        battery_level: Option<u8>,
        /// Cellular bars 0-4
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
        cellular_bars: Option<u8>,
        /// Wi-Fi bars 0-3
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
        wifi_bars: Option<u8>,
    },
    /// Remove status bar overrides
    StatusBarClear,
    /// Open a URL on the device
    OpenUrl {
        url: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("SIMKIT_LOG", default))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if cli.device.is_some() {
        config.device = cli.device;
    }
    let session = Session::new(config);

    match cli.command {
        Commands::Devices { booted, json } => commands::devices::cmd_devices(&session, json, booted),
        Commands::Apps { filter, system, user, json } => {
            let app_type = match (system, user) {
                (true, _) => Some(AppType::System),
                (_, true) => Some(AppType::User),
                _ => None,
            };
            commands::apps::cmd_apps(&session, json, filter.as_deref(), app_type)
        }
        Commands::Defaults { action } => match action {
            DefaultsAction::Read { bundle_id, key, json } => {
                commands::defaults::cmd_read(&session, &bundle_id, key.as_deref(), json)
            }
            DefaultsAction::Write { bundle_id, key, value, value_type } => {
                commands::defaults::cmd_write(&session, &bundle_id, &key, &value, value_type)
            }
            DefaultsAction::Delete { bundle_id, key } => {
                commands::defaults::cmd_delete(&session, &bundle_id, key.as_deref())
            }
            DefaultsAction::List { json } => commands::defaults::cmd_list(&session, json),
        },
        Commands::Keychain { bundle_id, json } => commands::keychain::cmd_keychain(&session, &bundle_id, json),
        Commands::Notify { bundle_id, title, body, subtitle, badge, sound } => {
            let notification = Notification { title, body, subtitle, badge, sound };
            commands::notify::cmd_notify(&session, &bundle_id, &notification)
        }
        Commands::Push { bundle_id, payload } => commands::notify::cmd_push(&session, &bundle_id, &payload),
        Commands::Device { action } => match action {
            DeviceAction::Shake => commands::device::cmd_shake(&session),
            DeviceAction::Location { latitude, longitude } => {
                commands::device::cmd_location(&session, latitude, longitude)
            }
            DeviceAction::LocationClear => commands::device::cmd_location_clear(&session),
            DeviceAction::StatusBar { time, battery_level, cellular_bars, wifi_bars } => {
                let overrides = StatusBarOverride { time, battery_level, cellular_bars, wifi_bars };
                commands::device::cmd_status_bar(&session, &overrides)
            }
            DeviceAction::StatusBarClear => commands::device::cmd_status_bar_clear(&session),
            DeviceAction::OpenUrl { url } => commands::device::cmd_open_url(&session, &url),
        },
        Commands::Install { path } => commands::install::cmd_install(&session, &path),
        Commands::Uninstall { bundle_id, force } => commands::install::cmd_uninstall(&session, &bundle_id, force),
        Commands::Send { file } => commands::files::cmd_send(&session, &file),
    }
}
