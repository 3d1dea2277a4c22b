use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_MAX_ROWS, DEFAULT_MAX_WIDTH, DEFAULT_PREVIEW_ROWS,
};
use crate::imaging::ImageTarget;
use crate::tabular::TabularTarget;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where converted files are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Terminal rendering of previews and charts
    #[serde(default)]
    pub display: DisplayConfig,

    /// Conversion targets used when none is given
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
    /// Replace existing files with the same name
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            overwrite: true,
        }
    }
}

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rows shown in a dataset preview
    pub preview_rows: usize,
    /// Chart height in terminal lines
    pub chart_height: u16,
    /// Rows plotted before the chart is cut off
    pub chart_max_rows: usize,
    /// Upper bound on rendered width
    pub max_width: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            chart_height: DEFAULT_CHART_HEIGHT,
            chart_max_rows: DEFAULT_CHART_MAX_ROWS,
            max_width: DEFAULT_MAX_WIDTH,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub image_format: ImageTarget,
    #[serde(default)]
    pub table_format: TabularTarget,
}

/// Load configuration from multiple sources
///
/// Later sources win: defaults, global file, project file, `DATASWEEPER_`
/// environment variables, then an explicit `--config` file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.toml");
        if global_config.exists() {
            figment = figment.merge(Toml::file(&global_config));
        }
    }

    let local_config = PathBuf::from(".datasweeper/config.toml");
    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    // Add environment variables (DATASWEEPER_ prefix, "__" for nesting)
    figment = figment.merge(
        Env::prefixed("DATASWEEPER_")
            .ignore(&["NAME", "EMAIL", "PASSWORD"])
            .split("__"),
    );

    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        figment = figment.merge(Toml::file(path));
    }

    figment.extract().context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "datasweeper").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    Ok(())
}

/// Create a default configuration file if it doesn't exist
///
/// Returns the path and whether a new file was written.
pub fn init_config(path: Option<PathBuf>) -> Result<(PathBuf, bool)> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()
            .context("Could not determine configuration directory")?
            .join("config.toml"),
    };

    if path.exists() {
        return Ok((path, false));
    }
    save_config(&Config::default(), &path)?;
    Ok((path, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.display.preview_rows, 5);
        assert_eq!(config.output.dir, PathBuf::from("."));
        assert!(config.output.overwrite);
        assert_eq!(config.defaults.image_format, ImageTarget::Png);
        assert_eq!(config.defaults.table_format, TabularTarget::Csv);
    }

    #[test]
    fn test_init_writes_once_and_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let (written, created) = init_config(Some(path.clone())).unwrap();
        assert_eq!(written, path);
        assert!(created);

        let (_, created_again) = init_config(Some(path.clone())).unwrap();
        assert!(!created_again);

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[display]\npreview_rows = 10\nchart_height = 8\nchart_max_rows = 5\nmax_width = 100\n\n[defaults]\ntable_format = \"excel\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.display.preview_rows, 10);
        assert_eq!(config.defaults.table_format, TabularTarget::Excel);
        assert_eq!(config.defaults.image_format, ImageTarget::Png);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_config(Some(&temp_dir.path().join("nope.toml"))).is_err());
    }
}
