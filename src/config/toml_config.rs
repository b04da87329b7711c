use crate::config::CardConfig;
use crate::domain::model::{ColorParam, StatusPolicy};
use crate::utils::error::{CardError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Optional card settings file. Every field may be omitted; whatever is set
/// here overrides the built-in defaults and is in turn overridden by flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub card: Option<CardSection>,
    pub api: Option<ApiSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardSection {
    pub greeting: Option<String>,
    pub who: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub color: Option<String>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub status_policy: Option<StatusPolicy>,
    pub color_param: Option<ColorParam>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    pub path: Option<PathBuf>,
    pub quality: Option<u8>,
    pub overwrite: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CardError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CardError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CARD_GREETING})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CardError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 把檔案中有設定的欄位覆蓋到 config 上
    pub fn apply_to(&self, config: &mut CardConfig) {
        if let Some(card) = &self.card {
            if let Some(greeting) = &card.greeting {
                config.greeting = greeting.clone();
            }
            if let Some(who) = &card.who {
                config.who = who.clone();
            }
            if let Some(width) = card.width {
                config.width = width;
            }
            if let Some(height) = card.height {
                config.height = height;
            }
            if let Some(color) = &card.color {
                config.color = color.clone();
            }
            if let Some(size) = card.size {
                config.size = size;
            }
        }

        if let Some(api) = &self.api {
            if let Some(base_url) = &api.base_url {
                config.api_base_url = base_url.clone();
            }
            if let Some(timeout) = api.timeout_seconds {
                config.timeout_secs = timeout;
            }
            if let Some(policy) = api.status_policy {
                config.status_policy = policy;
            }
            if let Some(color_param) = api.color_param {
                config.color_param = color_param;
            }
        }

        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                config.output_path = path.clone();
            }
            if let Some(quality) = output.quality {
                config.jpeg_quality = quality;
            }
            if let Some(overwrite) = output.overwrite {
                config.overwrite = overwrite;
            }
        }
    }
}
