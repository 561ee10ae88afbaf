use futures::future::BoxFuture;

use crate::{
    error::ServiceResult,
    services::{
        pixel_map::types::{PixelSnapshot, PixelStats},
        wish::types::WishPayload,
    },
};

/// Pixel data service (`GET /pixels`, `GET /pixels/stats/overview`,
/// `POST /pixels/submit-wish/{id}`).
pub trait PixelService: Send + Sync {
    fn list_pixels(&self) -> BoxFuture<'_, ServiceResult<Vec<PixelSnapshot>>>;

    fn stats(&self) -> BoxFuture<'_, ServiceResult<PixelStats>>;

    /// Returns the server's canonical copy of the claimed pixel.
    fn submit_wish<'a>(
        &'a self,
        pixel_id: u32,
        payload: &'a WishPayload,
    ) -> BoxFuture<'a, ServiceResult<PixelSnapshot>>;
}
