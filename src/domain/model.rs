use serde::{Deserialize, Serialize};
use std::fmt;

/// How the response body of a request is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Raw bytes, no charset negotiation.
    Binary,
}

impl TransferMode {
    pub fn accept_header(&self) -> &'static str {
        match self {
            TransferMode::Binary => "image/*",
        }
    }
}

/// A fully resolved request target for one captioned image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub url: String,
    pub transfer_mode: TransferMode,
}

/// Which side of the card an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn label(&self) -> &'static str {
        match self {
            Slot::A => "A",
            Slot::B => "B",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub status: u16,
}

/// Both fetched images, paired with their request slot.
#[derive(Debug, Clone)]
pub struct ImagePair {
    pub a: FetchedImage,
    pub b: FetchedImage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub slot: Slot,
    pub x: u32,
    pub y: u32,
}

/// Encoded JPEG of the finished card.
#[derive(Debug, Clone)]
pub struct CompositeImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Whether a completed HTTP response counts as a usable payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    #[default]
    SuccessOnly,
    /// Pass any body downstream regardless of status.
    AcceptAny,
}

impl StatusPolicy {
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            StatusPolicy::SuccessOnly => (200..300).contains(&status),
            StatusPolicy::AcceptAny => true,
        }
    }
}

/// Shape of the `color` query parameter sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorParam {
    /// `&color<value>`, no `=`. This is what deployed cards have always sent.
    #[default]
    Legacy,
    /// `&color=<value>`
    Fixed,
}

impl ColorParam {
    pub fn separator(&self) -> &'static str {
        match self {
            ColorParam::Legacy => "",
            ColorParam::Fixed => "=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_only_rejects_error_pages() {
        let policy = StatusPolicy::default();
        assert!(policy.accepts(200));
        assert!(policy.accepts(204));
        assert!(!policy.accepts(301));
        assert!(!policy.accepts(404));
        assert!(!policy.accepts(500));
    }

    #[test]
    fn test_accept_any_passes_everything() {
        assert!(StatusPolicy::AcceptAny.accepts(404));
        assert!(StatusPolicy::AcceptAny.accepts(503));
    }

    #[test]
    fn test_color_param_separator() {
        assert_eq!(ColorParam::default().separator(), "");
        assert_eq!(ColorParam::Fixed.separator(), "=");
    }
}
