use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};

use crate::{
    error::{AppError, Result},
    infrastructure::pixels::PixelService,
    services::pixel_map::types::PixelSnapshot,
};

pub mod types;
pub mod validation;

pub use types::{ImageRef, WishDraft, WishPayload};
pub use validation::{normalize_color, validate};

/// Hands validated wishes to the pixel service. It only returns results; applying them is
/// up to the caller.
#[derive(Clone)]
pub struct WishCoordinator {
    pixels: Arc<dyn PixelService>,
}

impl WishCoordinator {
    pub fn new(pixels: Arc<dyn PixelService>) -> Self {
        Self { pixels }
    }

    /// Submits once, without retrying. Resolves to the server's canonical pixel.
    pub fn submit(
        &self,
        pixel_id: u32,
        payload: WishPayload,
    ) -> BoxFuture<'static, Result<PixelSnapshot>> {
        let pixels = self.pixels.clone();

        async move {
            let pixel = pixels
                .submit_wish(pixel_id, &payload)
                .await
                .map_err(|error| AppError::SubmissionRejected(error.reason))?;

            if pixel.pixel_id != pixel_id || !pixel.has_wish || !pixel.is_consistent() {
                tracing::warn!(
                    pixel_id,
                    returned = pixel.pixel_id,
                    "Unexpected pixel in submit response"
                );
                return Err(AppError::SubmissionRejected(
                    "Server returned an incomplete pixel".into(),
                ));
            }

            tracing::info!(pixel_id, "Wish submitted");
            Ok(pixel)
        }
        .boxed()
    }
}
