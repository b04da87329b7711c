use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Image {slot} could not be decoded: {source}")]
    Decode {
        slot: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output file already exists: {path}")]
    OutputExists { path: String },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Run cancelled before completion")]
    Cancelled,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidation { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Image,
    Filesystem,
    Configuration,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CardError::Http(_) | CardError::Timeout { .. } | CardError::HttpStatus { .. } => {
                ErrorCategory::Network
            }
            CardError::Decode { .. } | CardError::Image(_) => ErrorCategory::Image,
            CardError::Io(_) | CardError::OutputExists { .. } => ErrorCategory::Filesystem,
            CardError::Config { .. }
            | CardError::InvalidConfigValue { .. }
            | CardError::ConfigValidation { .. } => ErrorCategory::Configuration,
            CardError::Task(_) | CardError::Cancelled => ErrorCategory::Runtime,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路問題通常重試即可
            CardError::Http(_) | CardError::Timeout { .. } | CardError::HttpStatus { .. } => {
                ErrorSeverity::Medium
            }
            CardError::Cancelled => ErrorSeverity::Low,
            CardError::Decode { .. } | CardError::Image(_) | CardError::OutputExists { .. } => {
                ErrorSeverity::High
            }
            CardError::Config { .. }
            | CardError::InvalidConfigValue { .. }
            | CardError::ConfigValidation { .. } => ErrorSeverity::High,
            CardError::Io(_) | CardError::Task(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CardError::Http(_) => "Could not reach the image service".to_string(),
            CardError::Timeout { after, .. } => {
                format!("The image service did not answer within {:?}", after)
            }
            CardError::HttpStatus { status, .. } => {
                format!("The image service answered with HTTP {}", status)
            }
            CardError::Decode { slot, .. } => {
                format!("The service returned something that is not an image for {}", slot)
            }
            CardError::Image(_) => "Could not encode the composite image".to_string(),
            CardError::Io(e) => format!("Could not write the output file: {}", e),
            CardError::OutputExists { path } => format!("{} already exists", path),
            CardError::Task(_) => "Image processing was interrupted".to_string(),
            CardError::Cancelled => "Run was cancelled".to_string(),
            CardError::Config { message } => format!("Invalid configuration: {}", message),
            CardError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            CardError::ConfigValidation { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and --api-base-url, or raise --timeout-secs"
            }
            ErrorCategory::Image => {
                "The service may have returned an error page; retry or check the captions"
            }
            ErrorCategory::Filesystem => match self {
                CardError::OutputExists { .. } => "Remove the file or drop --no-clobber",
                _ => "Make sure the output directory exists and is writable",
            },
            ErrorCategory::Configuration => "Review the command-line flags and the TOML file",
            ErrorCategory::Runtime => "Run the command again",
        }
    }

    /// `--fail-on-error` 時使用的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, CardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_retryable() {
        let err = CardError::HttpStatus {
            url: "https://cataas.com/cat/says/Hi".to_string(),
            status: 404,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.exit_code(), 2);
        assert!(err.user_friendly_message().contains("404"));
    }

    #[test]
    fn test_write_failure_is_critical() {
        let err = CardError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such directory",
        ));
        assert_eq!(err.category(), ErrorCategory::Filesystem);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_output_exists_suggests_dropping_no_clobber() {
        let err = CardError::OutputExists {
            path: "output/cat-card.jpg".to_string(),
        };
        assert!(err.recovery_suggestion().contains("--no-clobber"));
    }
}
