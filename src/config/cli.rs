use crate::config::toml_config::TomlConfig;
use crate::config::CardConfig;
use crate::domain::model::{ColorParam, StatusPolicy};
use crate::utils::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Flags left unset fall back to the TOML file, then to the built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "cat-card")]
#[command(about = "Fetch two captioned cats and put them side by side on one card")]
pub struct CliArgs {
    #[arg(long, help = "Caption for the left image [default: Hello]")]
    pub greeting: Option<String>,

    #[arg(long, help = "Caption for the right image [default: You]")]
    pub who: Option<String>,

    #[arg(long, help = "Width of each image in pixels [default: 400]")]
    pub width: Option<u32>,

    #[arg(long, help = "Height of each image in pixels [default: 500]")]
    pub height: Option<u32>,

    #[arg(long, help = "Caption color passed to the service [default: Pink]")]
    pub color: Option<String>,

    #[arg(long, help = "Caption size passed to the service [default: 100]")]
    pub size: Option<u32>,

    #[arg(long, help = "Read card settings from a TOML file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Base URL of the image service [default: https://cataas.com]")]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Per-request deadline in seconds [default: 30]")]
    pub timeout_secs: Option<u64>,

    #[arg(long, help = "Treat non-2xx response bodies as image data")]
    pub accept_any_status: bool,

    #[arg(long, help = "Send color=<value> instead of the legacy color<value>")]
    pub fix_color_param: bool,

    #[arg(long, help = "Output file, relative to the working directory [default: output/cat-card.jpg]")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "JPEG quality 1-100 [default: 80]")]
    pub quality: Option<u8>,

    #[arg(long, help = "Fail instead of overwriting an existing output file")]
    pub no_clobber: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Exit non-zero when the run fails")]
    pub fail_on_error: bool,
}

impl CliArgs {
    /// defaults -> TOML -> flags
    pub fn resolve(&self) -> Result<CardConfig> {
        let mut config = CardConfig::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading card settings from {}", path.display());
            TomlConfig::from_file(path)?.apply_to(&mut config);
        }

        self.apply_to(&mut config);
        Ok(config)
    }

    fn apply_to(&self, config: &mut CardConfig) {
        if let Some(greeting) = &self.greeting {
            config.greeting = greeting.clone();
        }
        if let Some(who) = &self.who {
            config.who = who.clone();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(color) = &self.color {
            config.color = color.clone();
        }
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(base_url) = &self.api_base_url {
            config.api_base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if self.accept_any_status {
            config.status_policy = StatusPolicy::AcceptAny;
        }
        if self.fix_color_param {
            config.color_param = ColorParam::Fixed;
        }
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(quality) = self.quality {
            config.jpeg_quality = quality;
        }
        if self.no_clobber {
            config.overwrite = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_flags_gives_defaults() {
        let args = CliArgs::parse_from(["cat-card"]);
        let config = args.resolve().unwrap();
        assert_eq!(config.greeting, "Hello");
        assert_eq!(config.who, "You");
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 500);
        assert_eq!(config.color, "Pink");
        assert_eq!(config.size, 100);
        assert!(config.overwrite);
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = CliArgs::parse_from([
            "cat-card",
            "--greeting",
            "Hi",
            "--who",
            "Bob",
            "--width",
            "200",
            "--height",
            "300",
            "--accept-any-status",
            "--fix-color-param",
            "--no-clobber",
        ]);
        let config = args.resolve().unwrap();
        assert_eq!(config.greeting, "Hi");
        assert_eq!(config.who, "Bob");
        assert_eq!(config.width, 200);
        assert_eq!(config.height, 300);
        assert_eq!(config.status_policy, StatusPolicy::AcceptAny);
        assert_eq!(config.color_param, ColorParam::Fixed);
        assert!(!config.overwrite);
    }

    #[test]
    fn test_flags_win_over_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[card]\ngreeting = \"From File\"\nwho = \"File Who\"").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let args = CliArgs::parse_from(["cat-card", "--config", &path, "--who", "Flag Who"]);
        let config = args.resolve().unwrap();

        assert_eq!(config.greeting, "From File");
        assert_eq!(config.who, "Flag Who");
    }

    #[test]
    fn test_log_format_json() {
        let args = CliArgs::parse_from(["cat-card", "--log-format", "json"]);
        assert_eq!(args.log_format, LogFormat::Json);
    }
}
