use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use config::{Config, ConfigError, File, Environment};

#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    // Database location: the store file is <data_path>/<db_name>.sqlite
    #[serde(default = "default_data_path")]
    pub data_path: String,
    #[serde(default = "default_db_name")]
    pub db_name: String,

    // Batch report parameters
    #[serde(default = "default_report_questions")]
    pub report_questions: Vec<i64>,
    #[serde(default = "default_rare_answer_threshold")]
    pub rare_answer_threshold: i64,
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    // File paths and other settings
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

// Default function implementations
fn default_data_path() -> String {
    "data".to_string()
}

fn default_db_name() -> String {
    "mental_health".to_string()
}

fn default_report_questions() -> Vec<i64> {
    vec![1, 2, 3, 4, 5, 6]
}

fn default_rare_answer_threshold() -> i64 {
    5
}

fn default_histogram_bins() -> usize {
    10
}

fn default_manifest_path() -> String {
    "report_manifest.json".to_string()
}

impl AppConfig {
    pub fn from_env_or_file() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Try to load from a config file (e.g., config.toml)
        config.merge(File::with_name("config").required(false))?;

        // Override with environment variables if they exist
        config.merge(Environment::with_prefix("SDP"))?;

        // Parse the config into the AppConfig struct
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Full path of the survey database file.
    pub fn db_file_path(&self) -> PathBuf {
        Path::new(&self.data_path).join(format!("{}.sqlite", self.db_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_file_path_joins_data_path_and_name() {
        let config = AppConfig {
            data_path: "surveys".to_string(),
            db_name: "mental_health".to_string(),
            report_questions: vec![1],
            rare_answer_threshold: 5,
            histogram_bins: 10,
            manifest_path: "report_manifest.json".to_string(),
        };
        assert_eq!(
            config.db_file_path(),
            PathBuf::from("surveys").join("mental_health.sqlite")
        );
    }
}
