//! Persisted user preferences (the theme colour).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const PREFS_PATH_ENV: &str = "GSI_CHECKER_PREFS_PATH";
pub const DEFAULT_THEME_COLOR: u32 = 0xFF1A_73E8;

pub const THEME_PALETTE: &[(&str, u32)] = &[
    ("blue", 0xFF1A_73E8),
    ("pink", 0xFFE9_1E63),
    ("purple", 0xFF9C_27B0),
    ("green", 0xFF4C_AF50),
    ("orange", 0xFFFF_9800),
    ("red", 0xFFF4_4336),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preferences {
    #[serde(default = "default_theme_color")]
    pub theme_color: u32,
}

fn default_theme_color() -> u32 {
    DEFAULT_THEME_COLOR
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme_color: DEFAULT_THEME_COLOR,
        }
    }
}

impl Preferences {
    /// `(r, g, b)` of the theme colour, alpha dropped.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let c = self.theme_color;
        ((c >> 16) as u8, (c >> 8) as u8, c as u8)
    }
}

pub fn prefs_path() -> PathBuf {
    if let Ok(path) = std::env::var(PREFS_PATH_ENV) {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".gsi_checker_prefs.json")
}

pub fn load_prefs() -> Result<Preferences> {
    load_prefs_from_path(&prefs_path())
}

pub fn save_prefs(prefs: &Preferences) -> Result<()> {
    save_prefs_to_path(prefs, &prefs_path())
}

pub fn load_prefs_from_path(path: &Path) -> Result<Preferences> {
    if !path.exists() {
        debug!(path = %path.display(), "no preferences file, using defaults");
        return Ok(Preferences::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| Error::Preferences(format!("failed to read {}: {err}", path.display())))?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_prefs_to_path(prefs: &Preferences, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| {
            Error::Preferences(format!("failed to create {}: {err}", parent.display()))
        })?;
    }
    let payload = serde_json::to_string_pretty(prefs)?;
    fs::write(path, payload)
        .map_err(|err| Error::Preferences(format!("failed to write {}: {err}", path.display())))?;
    info!(path = %path.display(), color = %format!("#{:06X}", prefs.theme_color & 0xFF_FFFF), "saved preferences");
    Ok(())
}

/// Accepts a palette name or `#RRGGBB`. Colours are stored opaque.
pub fn parse_color(input: &str) -> Result<u32> {
    let needle = input.trim().to_ascii_lowercase();
    if let Some((_, color)) = THEME_PALETTE.iter().find(|(name, _)| *name == needle) {
        return Ok(*color);
    }
    let hex = needle
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .ok_or_else(|| Error::InvalidColor(input.to_string()))?;
    u32::from_str_radix(hex, 16)
        .map(|rgb| 0xFF00_0000 | rgb)
        .map_err(|_| Error::InvalidColor(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let prefs = load_prefs_from_path(&dir.path().join("prefs.json")).unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn saved_color_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let prefs = Preferences {
            theme_color: parse_color("green").unwrap(),
        };
        save_prefs_to_path(&prefs, &path).unwrap();
        assert_eq!(load_prefs_from_path(&path).unwrap().theme_color, 0xFF4C_AF50);
    }

    #[test]
    fn empty_object_uses_default_color() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(load_prefs_from_path(&path).unwrap().theme_color, DEFAULT_THEME_COLOR);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_prefs_from_path(&path), Err(Error::Json(_))));
    }

    #[test]
    fn unusable_parent_dir_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let err = save_prefs_to_path(&Preferences::default(), &blocker.join("prefs.json"))
            .unwrap_err();
        match err {
            Error::Preferences(msg) => assert!(msg.starts_with("failed to create"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parses_names_and_hex() {
        assert_eq!(parse_color("Red").unwrap(), 0xFFF4_4336);
        assert_eq!(parse_color("#00ff00").unwrap(), 0xFF00_FF00);
        assert!(matches!(parse_color("#12345"), Err(Error::InvalidColor(_))));
        assert!(matches!(parse_color("#zzzzzz"), Err(Error::InvalidColor(_))));
        assert!(matches!(parse_color("teal"), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn rgb_drops_alpha() {
        let prefs = Preferences {
            theme_color: 0xFF1A_73E8,
        };
        assert_eq!(prefs.rgb(), (0x1A, 0x73, 0xE8));
    }
}
