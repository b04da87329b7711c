#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{ColorParam, StatusPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://cataas.com";
pub const DEFAULT_OUTPUT_PATH: &str = "output/cat-card.jpg";
pub const MAX_DIMENSION: u32 = 8192;

/// Settings for one card run. Resolved once at startup and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct CardConfig {
    pub greeting: String,
    pub who: String,
    pub width: u32,
    pub height: u32,
    pub color: String,
    pub size: u32,
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub status_policy: StatusPolicy,
    pub color_param: ColorParam,
    pub output_path: PathBuf,
    pub jpeg_quality: u8,
    pub overwrite: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            greeting: "Hello".to_string(),
            who: "You".to_string(),
            width: 400,
            height: 500,
            color: "Pink".to_string(),
            size: 100,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 30,
            status_policy: StatusPolicy::default(),
            color_param: ColorParam::default(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            jpeg_quality: 80,
            overwrite: true,
        }
    }
}

impl CardConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Validate for CardConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range("width", self.width, 1, MAX_DIMENSION)?;
        validation::validate_range("height", self.height, 1, MAX_DIMENSION)?;
        validation::validate_url("api_base_url", &self.api_base_url)?;
        validation::validate_range("timeout_secs", self.timeout_secs, 1, 600)?;
        validation::validate_range("jpeg_quality", self.jpeg_quality, 1, 100)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extension("output_path", &self.output_path, &["jpg", "jpeg"])?;
        Ok(())
    }
}
