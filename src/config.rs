//! Configuration file support.
//!
//! Loads config from ~/.adstudio/config.toml. Values resolve as
//! CLI flags > env vars > config file > defaults.

use serde::Deserialize;
use std::path::PathBuf;

/// Default Vertex AI region.
pub const DEFAULT_LOCATION: &str = "us-central1";
/// Default number of campaign variants per brief.
pub const DEFAULT_VARIANT_COUNT: usize = 2;

/// Configuration for adstudio.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Google Cloud project id (enables the Vertex AI image endpoint)
    pub project_id: Option<String>,

    /// Google Cloud region
    pub location: Option<String>,

    /// Text generation model
    pub text_model: Option<String>,

    /// Primary image generation model
    pub image_model: Option<String>,

    /// Fallback image generation model
    pub image_fallback_model: Option<String>,

    /// Variants requested per brief
    pub variant_count: Option<usize>,
}

impl Config {
    /// Load config from ~/.adstudio/config.toml
    pub fn load() -> Self {
        let path = config_path();

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".adstudio")
        .join("config.toml")
}
