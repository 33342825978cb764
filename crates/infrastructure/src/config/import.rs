//! Importer configuration.

use application::{CommitMode, ImportServiceConfig};
use serde::{Deserialize, Serialize};

/// Route importer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportAppConfig {
    /// `per_payload` (default) or `batch`
    #[serde(default)]
    pub commit_mode: CommitMode,

    /// Extension of payload files picked up from a directory
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
}

fn default_file_extension() -> String {
    "json".to_string()
}

impl Default for ImportAppConfig {
    fn default() -> Self {
        Self {
            commit_mode: CommitMode::default(),
            file_extension: default_file_extension(),
        }
    }
}

impl From<&ImportAppConfig> for ImportServiceConfig {
    fn from(config: &ImportAppConfig) -> Self {
        Self {
            commit_mode: config.commit_mode,
        }
    }
}
