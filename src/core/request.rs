use crate::config::CardConfig;
use crate::domain::model::{ColorParam, ImageRequest, TransferMode};
use url::Url;

const CAPTION_PATH: [&str; 2] = ["cat", "says"];

/// Turns a caption into an `ImageRequest` against the configured service.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base: Url,
    width: u32,
    height: u32,
    color: String,
    size: u32,
    color_param: ColorParam,
}

impl RequestBuilder {
    /// `base` must be an http(s) URL; see `CardConfig::validate`.
    pub fn new(base: Url, config: &CardConfig) -> Self {
        Self {
            base,
            width: config.width,
            height: config.height,
            color: config.color.clone(),
            size: config.size,
            color_param: config.color_param,
        }
    }

    /// Captions are percent-encoded as one path segment. The color value goes
    /// into the query untouched.
    pub fn build(&self, caption: &str) -> ImageRequest {
        let mut url = self.base.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(CAPTION_PATH).push(caption);
        }

        let query = format!(
            "width={}&height={}&color{}{}&s={}",
            self.width,
            self.height,
            self.color_param.separator(),
            self.color,
            self.size
        );
        url.set_query(Some(&query));

        ImageRequest {
            url: url.to_string(),
            transfer_mode: TransferMode::Binary,
        }
    }
}
