use serde::{Deserialize, Serialize};

/// Handle to an image the host has already uploaded or staged. Upload itself is the host's
/// business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

/// What the user has typed so far. Kept across failed submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishDraft {
    pub wish_text: String,
    pub color: String,
    pub wallet_address: String,
    pub image: Option<ImageRef>,
}

impl WishDraft {
    pub fn new(color: impl Into<String>, wallet_address: Option<&str>) -> Self {
        Self {
            wish_text: String::new(),
            color: color.into(),
            wallet_address: wallet_address.unwrap_or_default().to_string(),
            image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishPayload {
    pub wish_text: String,
    pub color: String,
    pub wallet_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
}
