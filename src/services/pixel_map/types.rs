use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelSnapshot {
    pub pixel_id: u32,
    pub has_wish: bool,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl PixelSnapshot {
    pub fn unclaimed(pixel_id: u32, color: impl Into<String>) -> Self {
        Self {
            pixel_id,
            has_wish: false,
            color: color.into(),
            wish_text: None,
            wallet_address: None,
            image_url: None,
        }
    }

    /// A claimed pixel must carry its wish text and donation address.
    pub fn is_consistent(&self) -> bool {
        !self.has_wish
            || (self.wish_text.as_deref().is_some_and(|text| !text.is_empty())
                && self
                    .wallet_address
                    .as_deref()
                    .is_some_and(|address| !address.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelStats {
    pub total_pixels: u32,
    pub pixels_with_wishes: u32,
    pub available_pixels: u32,
    pub wish_percentage: f64,
}
