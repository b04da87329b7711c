pub mod compositor;
pub mod engine;
pub mod pipeline;
pub mod request;

pub use crate::domain::model::{
    CompositeImage, FetchedImage, ImagePair, ImageRequest, LayoutEntry, Slot, TransferMode,
};
pub use crate::domain::ports::{ImageSource, Pipeline, Storage};
pub use crate::utils::error::Result;
