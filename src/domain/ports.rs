use crate::domain::model::{CompositeImage, FetchedImage, ImagePair, ImageRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &Path) -> impl std::future::Future<Output = Result<bool>> + Send;
}

pub trait ImageSource: Send + Sync {
    fn fetch(
        &self,
        request: &ImageRequest,
    ) -> impl std::future::Future<Output = Result<FetchedImage>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    /// Runs before any network traffic; a failure here skips the whole run.
    async fn preflight(&self) -> Result<()> {
        Ok(())
    }
    async fn extract(&self) -> Result<ImagePair>;
    async fn transform(&self, images: ImagePair) -> Result<CompositeImage>;
    async fn load(&self, card: CompositeImage) -> Result<String>;
}
