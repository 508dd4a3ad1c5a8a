//! Application configuration for LessonForge.
//!
//! User config lives at `~/.lessonforge/lessonforge.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LessonForgeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "lessonforge.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".lessonforge";

// ---------------------------------------------------------------------------
// Config structs (matching lessonforge.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content repository settings.
    #[serde(default)]
    pub content: ContentConfig,
}

/// `[content]` section — where the content repository lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory of the content repository.
    #[serde(default = "default_content_root")]
    pub root: String,

    /// Directory under the root holding course trees.
    #[serde(default = "default_course_dir")]
    pub course_dir: String,

    /// Directory under the root holding shared datasets.
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: String,

    /// Directory under the root holding shared SQL schemas.
    #[serde(default = "default_schema_dir")]
    pub schema_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            course_dir: default_course_dir(),
            dataset_dir: default_dataset_dir(),
            schema_dir: default_schema_dir(),
        }
    }
}

fn default_content_root() -> String {
    "~/lessonforge-content".into()
}
fn default_course_dir() -> String {
    "courses".into()
}
fn default_dataset_dir() -> String {
    "datasets".into()
}
fn default_schema_dir() -> String {
    "schemas".into()
}

// ---------------------------------------------------------------------------
// Content roots (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Resolved on-disk roots of the content repository.
#[derive(Debug, Clone)]
pub struct ContentRoots {
    /// Root of course trees (`<course>/<module>/<exercise>.yaml`).
    pub course_root: PathBuf,
    /// Root of shared datasets, addressed by relative path.
    pub dataset_root: PathBuf,
    /// Root of shared SQL schemas, addressed by schema id.
    pub schema_root: PathBuf,
}

impl ContentRoots {
    /// Derive all three roots under a single repository root, using the
    /// default directory names.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            course_root: root.join(default_course_dir()),
            dataset_root: root.join(default_dataset_dir()),
            schema_root: root.join(default_schema_dir()),
        }
    }
}

impl From<&AppConfig> for ContentRoots {
    fn from(config: &AppConfig) -> Self {
        let root = expand_home(&config.content.root);
        Self {
            course_root: root.join(&config.content.course_dir),
            dataset_root: root.join(&config.content.dataset_dir),
            schema_root: root.join(&config.content.schema_dir),
        }
    }
}

/// Expand a leading `~/` against the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.lessonforge/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LessonForgeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.lessonforge/lessonforge.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LessonForgeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LessonForgeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LessonForgeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LessonForgeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LessonForgeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("root"));
        assert!(toml_str.contains("courses"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.content.course_dir, "courses");
        assert_eq!(parsed.content.schema_dir, "schemas");
    }

    #[test]
    fn config_with_overrides() {
        let toml_str = r#"
[content]
root = "/srv/content"
dataset_dir = "data"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.content.root, "/srv/content");
        assert_eq!(config.content.dataset_dir, "data");
        // Unset fields fall back to defaults
        assert_eq!(config.content.course_dir, "courses");
    }

    #[test]
    fn roots_from_app_config() {
        let mut config = AppConfig::default();
        config.content.root = "/srv/content".into();
        let roots = ContentRoots::from(&config);
        assert_eq!(roots.course_root, PathBuf::from("/srv/content/courses"));
        assert_eq!(roots.dataset_root, PathBuf::from("/srv/content/datasets"));
        assert_eq!(roots.schema_root, PathBuf::from("/srv/content/schemas"));
    }

    #[test]
    fn roots_under_single_root() {
        let roots = ContentRoots::under("/tmp/content");
        assert_eq!(roots.schema_root, PathBuf::from("/tmp/content/schemas"));
    }
}
