use crate::constants::{DATASET_ROOT_ENV, DEFAULT_CONFIG_FILE, OUTPUT_DIR_ENV};
use crate::error::{IntegrationError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset_root: PathBuf,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub outputs: OutputConfig,
    pub reader: ReaderConfig,
}

/// File names written under `output_dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub web_data: String,
    pub summary: String,
    pub detailed_results: String,
    pub coverage_report: String,
    pub coverage_json: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Bytes sampled from the head of a file for delimiter sniffing.
    pub sample_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("dataset"),
            output_dir: PathBuf::from("output"),
            log_dir: PathBuf::from("logs"),
            outputs: OutputConfig::default(),
            reader: ReaderConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            web_data: "korea_democracy_data.json".to_string(),
            summary: "korea_democracy_integration_summary.txt".to_string(),
            detailed_results: "korea_democracy_detailed_results.json".to_string(),
            coverage_report: "korea_data_coverage_report.txt".to_string(),
            coverage_json: "korea_data_coverage.json".to_string(),
        }
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self { sample_bytes: 1024 }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly named file must exist; the default `korea_democracy.toml`
    /// is optional and missing keys fall back to defaults. Environment
    /// variables then override the dataset root and output directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Command-line paths win over the file and the environment.
    pub fn apply_cli_overrides(&mut self, dataset_root: Option<PathBuf>, output_dir: Option<PathBuf>) {
        if let Some(root) = dataset_root {
            self.dataset_root = root;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IntegrationError::Config(format!(
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

    fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var(DATASET_ROOT_ENV) {
            if !root.trim().is_empty() {
                self.dataset_root = PathBuf::from(root);
            }
        }
        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.reader.sample_bytes == 0 {
            return Err(IntegrationError::Config(
                "reader.sample_bytes must be greater than zero".to_string(),
            ));
        }
        if !self.outputs.web_data.ends_with(".json") {
            return Err(IntegrationError::Config(format!(
                "outputs.web_data must be a .json file name, got '{}'",
                self.outputs.web_data
            )));
        }
        Ok(())
    }
}
