//! Send files to the simulator
//!
//! Photos and videos go through `addmedia` so they show up in the Photos
//! library; anything else is copied into the downloads directory inside the
//! simulator (`$HOME/Downloads` unless configured).

use std::ffi::OsStr;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;

use crate::config::DEFAULT_DOWNLOADS_DIR;
use crate::error::SimError;
use super::Session;

// Run through `/bin/sh` inside the simulator so `$HOME` is the device's.
// `$1` is the configured directory (empty for the default), `$2` the file.
const MKDIR_SCRIPT: &str = r#"mkdir -p "${1:-$HOME/Downloads}""#;
const COPY_SCRIPT: &str = r#"cp "$2" "${1:-$HOME/Downloads}/""#;

const MEDIA_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "heic", "heif", "webp", "mp4", "mov", "m4v",
];

pub fn is_media(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn cmd_send(session: &Session, file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(SimError::validation(format!("{} is not a file", file.display())).into());
    }
    let udid = session.udid()?;

    if is_media(file) {
        session
            .sim
            .run([OsStr::new("addmedia"), OsStr::new(&udid), file.as_os_str()])
            .with_context(|| format!("Failed to add {} to the media library", file.display()))?;
        println!("{} {}", "Added to Photos:".green(), file.display());
        return Ok(());
    }

    let configured = session.config.downloads_dir.as_deref().unwrap_or("");
    let shown = if configured.is_empty() { DEFAULT_DOWNLOADS_DIR } else { configured };

    // A failure here surfaces through the copy below
    if let Err(e) = session
        .sim
        .run(["spawn", udid.as_str(), "/bin/sh", "-c", MKDIR_SCRIPT, "sh", configured])
    {
        debug!("mkdir {} failed: {}", shown, e);
    }

    session
        .sim
        .run([
            OsStr::new("spawn"),
            OsStr::new(&udid),
            OsStr::new("/bin/sh"),
            OsStr::new("-c"),
            OsStr::new(COPY_SCRIPT),
            OsStr::new("sh"),
            OsStr::new(configured),
            file.as_os_str(),
        ])
        .with_context(|| format!("Failed to copy {} to {}", file.display(), shown))?;

    println!("{} {} -> {}", "Copied".green(), file.display(), shown.cyan());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_media() {
        assert!(is_media(Path::new("/tmp/photo.JPG")));
        assert!(is_media(Path::new("clip.mov")));
        assert!(!is_media(Path::new("notes.txt")));
        assert!(!is_media(Path::new("Makefile")));
    }

    #[cfg(unix)]
    #[test]
    fn test_document_copied_even_if_mkdir_fails() {
        use crate::commands::testing::Recorder;

        // $5 is the script handed to the spawned shell
        let rec = Recorder::with_script("case \"$5\" in mkdir*) exit 1;; esac");
        let doc = rec.dir().join("notes.txt");
        std::fs::write(&doc, "hello").unwrap();

        cmd_send(&rec.session, &doc).unwrap();

        let calls = rec.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], format!("spawn booted /bin/sh -c {} sh ", MKDIR_SCRIPT));
        assert_eq!(calls[1], format!("spawn booted /bin/sh -c {} sh  {}", COPY_SCRIPT, doc.display()));
    }

    // Runs the spawned command on the host with HOME pointed at a scratch dir
    #[cfg(unix)]
    fn local_device(home: &Path, downloads_dir: Option<&str>) -> Session {
        use crate::config::Config;
        use crate::simctl::Simctl;

        let script = format!("[ \"$1\" = spawn ] || exit 9; shift 2; HOME='{}' exec \"$@\"", home.display());
        let sim = Simctl::with_prefix("sh", ["-c".to_string(), script, "sh".to_string()]);
        let config = Config {
            device: Some("booted".to_string()),
            downloads_dir: downloads_dir.map(str::to_string),
            ..Config::default()
        };
        Session::with_simctl(sim, config)
    }

    #[cfg(unix)]
    #[test]
    fn test_document_lands_in_device_home_downloads() {
        let home = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        let doc = src.path().join("report.pdf");
        std::fs::write(&doc, "pdf").unwrap();

        cmd_send(&local_device(home.path(), None), &doc).unwrap();

        let copied = home.path().join("Downloads").join("report.pdf");
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "pdf");
    }

    #[cfg(unix)]
    #[test]
    fn test_configured_downloads_dir_is_used() {
        let home = tempfile::tempdir().unwrap();
        let target = home.path().join("inbox");
        let doc = home.path().join("notes.txt");
        std::fs::write(&doc, "hello").unwrap();

        let session = local_device(home.path(), Some(target.to_str().unwrap()));
        cmd_send(&session, &doc).unwrap();

        assert!(target.join("notes.txt").is_file());
        assert!(!home.path().join("Downloads").exists());
    }

    #[test]
    fn test_missing_file_rejected() {
        let session = Session::new(crate::config::Config::default());
        let err = cmd_send(&session, Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
