use crate::config::CardConfig;
use crate::core::compositor::Compositor;
use crate::core::request::RequestBuilder;
use crate::core::{CompositeImage, ImagePair, ImageSource, Pipeline, Storage};
use crate::utils::error::{CardError, Result};
use crate::utils::validation::Validate;
use url::Url;

/// Fetches the two captioned images, puts them side by side and writes the card.
pub struct CatCardPipeline<S: Storage, F: ImageSource> {
    storage: S,
    source: F,
    config: CardConfig,
    requests: RequestBuilder,
    compositor: Compositor,
}

impl<S: Storage, F: ImageSource> CatCardPipeline<S, F> {
    pub fn new(storage: S, source: F, config: CardConfig) -> Result<Self> {
        config.validate()?;

        let base = Url::parse(&config.api_base_url).map_err(|e| CardError::InvalidConfigValue {
            field: "api_base_url".to_string(),
            value: config.api_base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            storage,
            source,
            requests: RequestBuilder::new(base, &config),
            compositor: Compositor::from_config(&config),
            config,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, F: ImageSource> Pipeline for CatCardPipeline<S, F> {
    async fn preflight(&self) -> Result<()> {
        let path = &self.config.output_path;
        if !self.config.overwrite && self.storage.exists(path).await? {
            return Err(CardError::OutputExists {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    async fn extract(&self) -> Result<ImagePair> {
        let request_a = self.requests.build(&self.config.greeting);
        let request_b = self.requests.build(&self.config.who);

        // 兩個請求同時進行；結果依請求位置配對，與完成順序無關
        let (a, b) = tokio::try_join!(
            self.source.fetch(&request_a),
            self.source.fetch(&request_b)
        )?;

        Ok(ImagePair { a, b })
    }

    async fn transform(&self, images: ImagePair) -> Result<CompositeImage> {
        let compositor = self.compositor;
        let card =
            tokio::task::spawn_blocking(move || compositor.compose(&images.a.bytes, &images.b.bytes))
                .await??;

        tracing::debug!(
            "Composed {}x{} card ({} bytes)",
            card.width,
            card.height,
            card.bytes.len()
        );
        Ok(card)
    }

    async fn load(&self, card: CompositeImage) -> Result<String> {
        let path = &self.config.output_path;

        tracing::debug!("Writing card ({} bytes) to storage", card.bytes.len());
        self.storage.write_file(path, &card.bytes).await?;

        tracing::info!("The file was saved!");
        Ok(path.display().to_string())
    }
}
