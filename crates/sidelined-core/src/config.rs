// Configuration loading and parsing (dashboard.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the single configuration file inside `config/`.
pub const CONFIG_FILE: &str = "dashboard.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// dashboard.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the injury CSV. Relative paths resolve against the working
    /// directory.
    pub csv_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            out_dir: default_out_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewsConfig {
    /// How many players the performance-drop chart shows.
    #[serde(default = "default_top_drops")]
    pub top_drops: usize,
    /// How many players the comeback leaderboard shows.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        ViewsConfig {
            top_drops: default_top_drops(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

fn default_out_dir() -> String {
    "eda_outputs".to_string()
}

fn default_top_drops() -> usize {
    15
}

fn default_leaderboard_size() -> usize {
    20
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/dashboard.toml` relative to
/// `base_dir`.
///
/// This does not seed from defaults; prefer `load_config()`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(base_dir);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse a configuration document without touching the filesystem.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Location of the configuration file under `base_dir`.
pub fn config_path(base_dir: &Path) -> PathBuf {
    base_dir.join("config").join(CONFIG_FILE)
}

/// Seed `config/dashboard.toml` from `defaults/` when it does not exist yet.
///
/// Returns the written path, or `None` when nothing needed copying. A user's
/// existing file is never overwritten.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = config_path(base_dir);
    if target.exists() {
        return Ok(None);
    }
    let seed = base_dir.join("defaults").join(CONFIG_FILE);
    if !seed.is_file() {
        // A config/ directory without the file is reported by the loader.
        if base_dir.join("config").is_dir() {
            return Ok(None);
        }
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no config/ or defaults/{CONFIG_FILE} in {}; run from the project root",
                base_dir.display()
            ),
        });
    }

    let copy_err = |path: &Path, e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("{}: {e}", path.display()),
    };
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| copy_err(dir, e))?;
    }
    std::fs::copy(&seed, &target).map_err(|e| copy_err(&target, e))?;
    Ok(Some(target))
}

/// Load config relative to the current working directory, seeding it from
/// `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    seed_config(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.csv_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.csv_path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.export.out_dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "export.out_dir".into(),
            message: "must not be empty".into(),
        });
    }

    let sizes: &[(&str, usize)] = &[
        ("views.top_drops", config.views.top_drops),
        ("views.leaderboard_size", config.views.leaderboard_size),
    ];
    for (name, val) in sizes {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, where `defaults/` lives.
    fn project_root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("sidelined_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        tmp
    }

    #[test]
    fn default_config_file_is_valid() {
        let text = fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE))
            .expect("defaults/dashboard.toml should exist");
        let config = parse_config(&text).expect("defaults should parse");
        assert_eq!(
            config.data.csv_path,
            "data/player_injuries_impact_cleaned.csv"
        );
        assert_eq!(config.export.out_dir, "eda_outputs");
        assert_eq!(config.views.top_drops, 15);
        assert_eq!(config.views.leaderboard_size, 20);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let config = parse_config("[data]\ncsv_path = \"x.csv\"\n").unwrap();
        assert_eq!(config.export.out_dir, "eda_outputs");
        assert_eq!(config.views.top_drops, 15);
        assert_eq!(config.views.leaderboard_size, 20);
    }

    #[test]
    fn missing_data_section_is_parse_error() {
        assert!(parse_config("[views]\ntop_drops = 3\n").is_err());
    }

    #[test]
    fn seed_copies_defaults_then_loads() {
        let tmp = scratch_dir("config_copy");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        let seeded = seed_config(&tmp).unwrap();
        assert_eq!(seeded, Some(config_path(&tmp)));
        assert!(config_path(&tmp).is_file());

        // Second call copies nothing and keeps the user's edits.
        fs::write(config_path(&tmp), "[data]\ncsv_path = \"mine.csv\"\n").unwrap();
        assert_eq!(seed_config(&tmp).unwrap(), None);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.data.csv_path, "mine.csv");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seed_without_any_directory_fails() {
        let tmp = scratch_dir("config_none");
        let err = seed_config(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seed_leaves_bare_config_dir_to_loader() {
        let tmp = scratch_dir("config_bare");
        fs::create_dir_all(tmp.join("config")).unwrap();
        assert_eq!(seed_config(&tmp).unwrap(), None);
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_config_file_reports_path() {
        let tmp = scratch_dir("config_missing");
        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with(Path::new("config").join(CONFIG_FILE)));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_top_drops() {
        let tmp = scratch_dir("config_zero_top");
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            "[data]\ncsv_path = \"x.csv\"\n[views]\ntop_drops = 0\n",
        )
        .unwrap();
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "views.top_drops");
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_blank_csv_path() {
        let tmp = scratch_dir("config_blank_path");
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(
            tmp.join("config").join(CONFIG_FILE),
            "[data]\ncsv_path = \"  \"\n",
        )
        .unwrap();
        let err = load_config_from(&tmp).unwrap_err();
        assert!(err.to_string().contains("data.csv_path"));
        let _ = fs::remove_dir_all(&tmp);
    }
}
