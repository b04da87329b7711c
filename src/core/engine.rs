use crate::core::{CompositeImage, Pipeline};
use crate::utils::error::{CardError, Result};
use crate::utils::monitor::SystemMonitor;
use std::future::Future;

pub struct CardEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CardEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs the whole card pipeline. The first failing stage stops the run
    /// and its error is returned; nothing is written unless every stage
    /// before the write succeeded.
    pub async fn run(&self) -> Result<String> {
        let card = self.build_card().await?;
        self.write_card(card).await
    }

    /// Like `run`, but gives up with `CardError::Cancelled` if `shutdown`
    /// resolves before the card is ready; in-flight requests are dropped.
    /// Once the write has started it runs to completion, so a written card is
    /// never reported as cancelled.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<String>
    where
        F: Future<Output = ()>,
    {
        let card = tokio::select! {
            card = self.build_card() => card?,
            _ = shutdown => {
                tracing::warn!("Shutdown requested, abandoning run");
                return Err(CardError::Cancelled);
            }
        };
        self.write_card(card).await
    }

    async fn build_card(&self) -> Result<CompositeImage> {
        tracing::info!("Starting cat card run");

        self.pipeline.preflight().await?;

        tracing::info!("Fetching images...");
        let images = self.pipeline.extract().await?;
        tracing::info!(
            "Fetched images A ({} bytes) and B ({} bytes)",
            images.a.bytes.len(),
            images.b.bytes.len()
        );
        self.monitor.log_stats("fetch");

        tracing::info!("Composing card...");
        let card = self.pipeline.transform(images).await?;
        tracing::info!("Composed {}x{} card", card.width, card.height);
        self.monitor.log_stats("compose");

        Ok(card)
    }

    async fn write_card(&self, card: CompositeImage) -> Result<String> {
        tracing::info!("Writing card...");
        let output_path = self.pipeline.load(card).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("write");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FetchedImage, ImagePair};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct StageCounts {
        extract: AtomicUsize,
        transform: AtomicUsize,
        load: AtomicUsize,
    }

    struct ScriptedPipeline {
        counts: Arc<StageCounts>,
        fail_extract: bool,
        fail_transform: bool,
        hang: bool,
        write_delay: Option<Duration>,
    }

    impl ScriptedPipeline {
        fn new(counts: Arc<StageCounts>) -> Self {
            Self {
                counts,
                fail_extract: false,
                fail_transform: false,
                hang: false,
                write_delay: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Result<ImagePair> {
            self.counts.extract.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail_extract {
                return Err(CardError::Timeout {
                    url: "http://127.0.0.1/cat/says/Hi".to_string(),
                    after: Duration::from_secs(1),
                });
            }
            let image = FetchedImage {
                bytes: vec![1],
                status: 200,
            };
            Ok(ImagePair {
                a: image.clone(),
                b: image,
            })
        }

        async fn transform(&self, _images: ImagePair) -> Result<CompositeImage> {
            self.counts.transform.fetch_add(1, Ordering::SeqCst);
            if self.fail_transform {
                return Err(CardError::Image(image::ImageError::IoError(
                    std::io::Error::other("bad pixels"),
                )));
            }
            Ok(CompositeImage {
                bytes: vec![2],
                width: 2,
                height: 1,
            })
        }

        async fn load(&self, _card: CompositeImage) -> Result<String> {
            if let Some(delay) = self.write_delay {
                tokio::time::sleep(delay).await;
            }
            self.counts.load.fetch_add(1, Ordering::SeqCst);
            Ok("output/cat-card.jpg".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_executes_every_stage_once() {
        let counts = Arc::new(StageCounts::default());
        let engine = CardEngine::new(ScriptedPipeline::new(counts.clone()));

        let output = engine.run().await.unwrap();

        assert_eq!(output, "output/cat-card.jpg");
        assert_eq!(counts.extract.load(Ordering::SeqCst), 1);
        assert_eq!(counts.transform.load(Ordering::SeqCst), 1);
        assert_eq!(counts.load.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_compose_and_write() {
        let counts = Arc::new(StageCounts::default());
        let mut pipeline = ScriptedPipeline::new(counts.clone());
        pipeline.fail_extract = true;
        let engine = CardEngine::new(pipeline);

        let result = engine.run().await;

        assert!(matches!(result, Err(CardError::Timeout { .. })));
        assert_eq!(counts.transform.load(Ordering::SeqCst), 0);
        assert_eq!(counts.load.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_compose_failure_reaches_caller() {
        let counts = Arc::new(StageCounts::default());
        let mut pipeline = ScriptedPipeline::new(counts.clone());
        pipeline.fail_transform = true;
        let engine = CardEngine::new_with_monitoring(pipeline, true);

        let result = engine.run().await;

        assert!(matches!(result, Err(CardError::Image(_))));
        assert_eq!(counts.load.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_hung_run() {
        let counts = Arc::new(StageCounts::default());
        let mut pipeline = ScriptedPipeline::new(counts.clone());
        pipeline.hang = true;
        let engine = CardEngine::new(pipeline);

        let result = engine
            .run_until(tokio::time::sleep(Duration::from_millis(50)))
            .await;

        assert!(matches!(result, Err(CardError::Cancelled)));
        assert_eq!(counts.load.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_during_write_lets_write_finish() {
        let counts = Arc::new(StageCounts::default());
        let mut pipeline = ScriptedPipeline::new(counts.clone());
        pipeline.write_delay = Some(Duration::from_millis(200));
        let engine = CardEngine::new(pipeline);

        let result = engine
            .run_until(tokio::time::sleep(Duration::from_millis(20)))
            .await;

        assert_eq!(result.unwrap(), "output/cat-card.jpg");
        assert_eq!(counts.load.load(Ordering::SeqCst), 1);
    }
}
