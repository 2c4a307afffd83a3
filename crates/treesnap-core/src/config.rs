//! Snapshot settings loaded from the workspace `treesnap.toml`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the settings file looked up in the workspace root.
pub const SETTINGS_FILE: &str = "treesnap.toml";

fn default_enabled() -> bool {
    true
}

fn default_output_file() -> PathBuf {
    PathBuf::from("Context/tree.txt")
}

fn default_filter_patterns() -> String {
    "(vendor|public|seeds|migrate)".to_string()
}

/// Snapshot settings.
///
/// These are reloaded from disk on every trigger, so edits take effect
/// without restarting the watcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Master on/off switch checked before every regeneration.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Snapshot destination, relative to the workspace root unless absolute.
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Tracked paths matching this regex are excluded from the snapshot.
    /// The match is case-sensitive and applied per line.
    #[serde(default = "default_filter_patterns")]
    pub filter_patterns: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            output_file: default_output_file(),
            filter_patterns: default_filter_patterns(),
        }
    }
}

impl Settings {
    /// Load settings for a workspace.
    ///
    /// Resolution order for the file: an explicit override path, the
    /// `TREESNAP_CONFIG` environment variable, then `<root>/treesnap.toml`.
    /// A missing file yields pure defaults. Individual fields can then be
    /// overridden through `TREESNAP_ENABLED`, `TREESNAP_OUTPUT_FILE`, and
    /// `TREESNAP_FILTER_PATTERNS`.
    pub fn load(root: &Path, override_path: Option<&Path>) -> Result<Self> {
        let path = override_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("TREESNAP_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| root.join(SETTINGS_FILE));

        let mut settings = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("failed to parse {}: {}", path.display(), e))
            })?
        } else {
            Self::default()
        };

        if let Ok(enabled) = std::env::var("TREESNAP_ENABLED") {
            settings.enabled = matches!(enabled.as_str(), "1" | "true" | "yes");
        }
        if let Ok(output) = std::env::var("TREESNAP_OUTPUT_FILE") {
            settings.output_file = PathBuf::from(output);
        }
        if let Ok(patterns) = std::env::var("TREESNAP_FILTER_PATTERNS") {
            settings.filter_patterns = patterns;
        }

        Ok(settings)
    }

    /// Resolve the snapshot destination against a workspace root.
    pub fn output_path(&self, root: &Path) -> PathBuf {
        if self.output_file.is_absolute() {
            self.output_file.clone()
        } else {
            root.join(&self.output_file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(dir.path(), None).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(settings.enabled);
        assert_eq!(settings.output_file, PathBuf::from("Context/tree.txt"));
        assert_eq!(settings.filter_patterns, "(vendor|public|seeds|migrate)");
    }

    #[test]
    fn partial_file_keeps_field_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "enabled = false\n").unwrap();

        let settings = Settings::load(dir.path(), None).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.output_file, PathBuf::from("Context/tree.txt"));
        assert_eq!(settings.filter_patterns, "(vendor|public|seeds|migrate)");
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "enabled = false\noutput_file = \"docs/files.txt\"\nfilter_patterns = \"target\"\n",
        )
        .unwrap();

        let settings = Settings::load(dir.path(), None).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.output_file, PathBuf::from("docs/files.txt"));
        assert_eq!(settings.filter_patterns, "target");
    }

    #[test]
    fn explicit_override_path_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "enabled = false\n").unwrap();
        let other = dir.path().join("alternate.toml");
        std::fs::write(&other, "filter_patterns = \"node_modules\"\n").unwrap();

        let settings = Settings::load(dir.path(), Some(&other)).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.filter_patterns, "node_modules");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "enabled = \"not a bool\"\n").unwrap();

        let err = Settings::load(dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn output_path_joins_relative_to_root() {
        let settings = Settings::default();
        let resolved = settings.output_path(Path::new("/repo"));
        assert_eq!(resolved, PathBuf::from("/repo/Context/tree.txt"));
    }

    #[test]
    fn output_path_keeps_absolute_destinations() {
        let settings = Settings {
            output_file: PathBuf::from("/tmp/tree.txt"),
            ..Settings::default()
        };
        assert_eq!(
            settings.output_path(Path::new("/repo")),
            PathBuf::from("/tmp/tree.txt")
        );
    }
}
