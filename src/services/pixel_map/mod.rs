use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, Result},
    infrastructure::pixels::PixelService,
    services::pixel_map::types::{PixelSnapshot, PixelStats},
};

pub mod types;

/// Local copy of the grid as last listed by the pixel service.
#[derive(Debug, Default)]
pub struct PixelMap {
    pixels: Vec<PixelSnapshot>,
    index: HashMap<u32, usize>,
    stats: Option<PixelStats>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl PixelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(&self) -> &[PixelSnapshot] {
        &self.pixels
    }

    pub fn get(&self, pixel_id: u32) -> Option<&PixelSnapshot> {
        self.index.get(&pixel_id).map(|&position| &self.pixels[position])
    }

    pub fn stats(&self) -> Option<&PixelStats> {
        self.stats.as_ref()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Relists the grid. Stats are best effort: a failing stats call keeps the previous
    /// figures.
    pub async fn refresh(&mut self, service: &dyn PixelService) -> Result<()> {
        let pixels = service
            .list_pixels()
            .await
            .map_err(|error| AppError::PixelMapUnavailable(error.reason))?;

        self.replace(pixels);

        match service.stats().await {
            Ok(stats) => self.stats = Some(stats),
            Err(error) => tracing::debug!(error = %error, "Pixel stats unavailable"),
        }

        self.refreshed_at = Some(Utc::now());
        tracing::debug!(count = self.pixels.len(), "Pixel map refreshed");
        Ok(())
    }

    /// Replaces the listing. A pixel already known to be claimed keeps its wish even if the
    /// new listing disagrees.
    pub fn replace(&mut self, pixels: Vec<PixelSnapshot>) {
        let mut next = Vec::with_capacity(pixels.len());
        let mut index = HashMap::with_capacity(pixels.len());

        for pixel in pixels {
            let pixel = match self.get(pixel.pixel_id) {
                Some(known) if known.has_wish && !pixel.has_wish => {
                    tracing::warn!(
                        pixel_id = pixel.pixel_id,
                        "Listing un-claims a pixel, keeping the wish"
                    );
                    known.clone()
                }
                _ => pixel,
            };

            match index.get(&pixel.pixel_id) {
                Some(&position) => next[position] = pixel,
                None => {
                    index.insert(pixel.pixel_id, next.len());
                    next.push(pixel);
                }
            }
        }

        self.pixels = next;
        self.index = index;
    }

    /// Records a server-confirmed pixel. Returns `false` when the pixel already held a wish,
    /// in which case nothing changes.
    pub fn record(&mut self, pixel: PixelSnapshot) -> bool {
        match self.index.get(&pixel.pixel_id) {
            Some(&position) if self.pixels[position].has_wish => {
                tracing::warn!(pixel_id = pixel.pixel_id, "Pixel already claimed, ignoring update");
                false
            }
            Some(&position) => {
                self.pixels[position] = pixel;
                true
            }
            None => {
                self.index.insert(pixel.pixel_id, self.pixels.len());
                self.pixels.push(pixel);
                true
            }
        }
    }
}
