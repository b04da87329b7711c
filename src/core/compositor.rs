use crate::config::CardConfig;
use crate::domain::model::{CompositeImage, LayoutEntry, Slot};
use crate::utils::error::{CardError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage};

/// Places image A and B next to each other on one canvas and encodes it as JPEG.
///
/// No scaling and no alpha blending: each source overwrites its region of the
/// canvas, anything past the canvas edge is clipped, and uncovered pixels
/// stay black.
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    width: u32,
    height: u32,
    quality: u8,
}

impl Compositor {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            quality,
        }
    }

    pub fn from_config(config: &CardConfig) -> Self {
        Self::new(config.width, config.height, config.jpeg_quality)
    }

    pub fn canvas_size(&self) -> Result<(u32, u32)> {
        let canvas_width =
            self.width
                .checked_mul(2)
                .ok_or_else(|| CardError::InvalidConfigValue {
                    field: "width".to_string(),
                    value: self.width.to_string(),
                    reason: "card canvas would be wider than u32::MAX".to_string(),
                })?;
        Ok((canvas_width, self.height))
    }

    pub fn layout(&self) -> [LayoutEntry; 2] {
        [
            LayoutEntry {
                slot: Slot::A,
                x: 0,
                y: 0,
            },
            LayoutEntry {
                slot: Slot::B,
                x: self.width,
                y: 0,
            },
        ]
    }

    pub fn compose(&self, a: &[u8], b: &[u8]) -> Result<CompositeImage> {
        let (canvas_width, canvas_height) = self.canvas_size()?;
        let mut canvas = RgbImage::new(canvas_width, canvas_height);

        for entry in self.layout() {
            let source = match entry.slot {
                Slot::A => a,
                Slot::B => b,
            };
            let decoded = image::load_from_memory(source).map_err(|source| CardError::Decode {
                slot: entry.slot.label(),
                source,
            })?;
            tracing::debug!(
                slot = %entry.slot,
                width = decoded.width(),
                height = decoded.height(),
                x = entry.x,
                "Placing image"
            );
            imageops::replace(&mut canvas, &decoded.to_rgb8(), entry.x.into(), entry.y.into());
        }

        let mut bytes = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut bytes, self.quality);
        encoder.encode_image(&canvas)?;

        Ok(CompositeImage {
            bytes,
            width: canvas_width,
            height: canvas_height,
        })
    }
}
