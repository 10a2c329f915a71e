//! Small persisted context carried across runs: the chat conversation id,
//! the theme preference, and the backend session cookie. Kept explicit and
//! passed through the app rather than living in ambient globals.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub auth_cookie: Option<String>,
}

impl Session {
    /// Load the session file, falling back to defaults when it is missing
    /// or unreadable. A corrupt session file must never block startup.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => Session::default(),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create session directory at {}", parent.display())
            })?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write session file at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let session = Session::load(&dir.path().join("session.json"));
        assert_eq!(session, Session::default());
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(Session::load(&path), Session::default());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let session = Session {
            conversation_id: Some("conv-42".into()),
            theme: ThemePreference::Light,
            auth_cookie: Some("session=abc123".into()),
        };

        session.save(&path).unwrap();
        assert_eq!(Session::load(&path), session);
    }

    #[test]
    fn theme_toggle_flips_between_variants() {
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
    }
}
