pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{http::HttpImageSource, storage::LocalStorage};
#[cfg(feature = "cli")]
pub use config::cli::CliArgs;
pub use config::CardConfig;

pub use crate::core::{compositor::Compositor, engine::CardEngine, pipeline::CatCardPipeline};
pub use utils::error::{CardError, Result};
