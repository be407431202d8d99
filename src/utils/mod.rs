//! Utility functions and helpers.

pub mod date;
pub mod http;
pub mod oauth;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Default settings file name, next to the executable.
pub const CONFIG_FILE: &str = "config.txt";

/// Default watermark file name, next to the executable.
pub const WATERMARK_FILE: &str = ".lotro_devtracker_ts";

/// Directory holding the running executable.
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?.canonicalize()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Use `explicit` when given, otherwise `name` inside `dir`.
pub fn resolve_path(explicit: Option<PathBuf>, dir: &Path, name: &str) -> PathBuf {
    explicit.unwrap_or_else(|| dir.join(name))
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        let dir = Path::new("/opt/devtracker");
        assert_eq!(
            resolve_path(None, dir, CONFIG_FILE),
            PathBuf::from("/opt/devtracker/config.txt")
        );
        assert_eq!(
            resolve_path(Some(PathBuf::from("/etc/devtracker/config.txt")), dir, CONFIG_FILE),
            PathBuf::from("/etc/devtracker/config.txt")
        );
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("\n    11-21-2018 09:20 AM\n    \n    by SSG_RedPanda\n  "),
            "11-21-2018 09:20 AM by SSG_RedPanda"
        );
    }
}
