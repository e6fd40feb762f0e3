use crate::constants;
use crate::error::{DataLakeError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub visualization: VisualizationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory the `data` and `data_lake` directories live in
    pub project_root: PathBuf,
    pub data_dir: String,
    pub lake_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            data_dir: constants::DATA_DIR.to_string(),
            lake_dir: constants::LAKE_DIR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualizationConfig {
    /// Transformed-layer CSV the charts are drawn from, relative to the project root
    pub csv_path: PathBuf,
}

impl Default for VisualizationConfig {
    fn default() -> Self {
        Self {
            csv_path: Path::new(constants::LAKE_DIR)
                .join(constants::TRANSFORMED_LAYER)
                .join("sample.csv"),
        }
    }
}

impl Config {
    /// Load `config.toml` (or the given file). A missing default file yields the
    /// defaults; a missing explicit file is an error. `DATA_LAKE_ROOT` overrides
    /// the project root.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        if let Ok(root) = std::env::var(constants::ROOT_ENV_VAR) {
            if !root.trim().is_empty() {
                config.paths.project_root = PathBuf::from(root.trim());
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DataLakeError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.paths.project_root = root.into();
        self
    }

    pub fn data_path(&self) -> PathBuf {
        self.paths.project_root.join(&self.paths.data_dir)
    }

    pub fn data_lake_path(&self) -> PathBuf {
        self.paths.project_root.join(&self.paths.lake_dir)
    }

    pub fn layer_path(&self, layer_dir: &str) -> PathBuf {
        self.data_lake_path().join(layer_dir)
    }

    pub fn runs_path(&self) -> PathBuf {
        self.data_lake_path().join(constants::RUNS_DIR)
    }

    pub fn visualization_csv(&self) -> PathBuf {
        if self.visualization.csv_path.is_absolute() {
            self.visualization.csv_path.clone()
        } else {
            self.paths.project_root.join(&self.visualization.csv_path)
        }
    }
}
