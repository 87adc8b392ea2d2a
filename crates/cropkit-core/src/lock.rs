//! Output-size lock: an optional fixed export size constraining the region.
//!
//! When a lock is set the crop region is re-fit to the lock's aspect ratio
//! while still covering at least its previous footprint. The lock itself is
//! clamped into `[MIN_SIZE, image dimension]` per axis before use.

use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::region::{CropRegion, MIN_SIZE};

/// A fixed export size. Each dimension is >= `MIN_SIZE` and <= the
/// corresponding image dimension (enforced by [`OutputLock::clamped`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLock {
    pub width: u32,
    pub height: u32,
}

impl OutputLock {
    /// Clamp a requested lock size into the valid range for `image`.
    pub fn clamped(requested: Size, image: Size) -> Self {
        let min = MIN_SIZE as u32;
        Self {
            width: requested.width.max(min).min(image.width.max(min)),
            height: requested.height.max(min).min(image.height.max(min)),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Width / height aspect ratio of the lock.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Recompute `region` to match the lock's aspect ratio while covering at
    /// least the region's existing footprint.
    ///
    /// Two candidates are tried: one holding `width >= region.width` (height
    /// derived from the aspect ratio) and one holding `height >=
    /// region.height` (width derived). The width-preserving candidate wins
    /// when it fits entirely inside the image, otherwise the
    /// height-preserving one is used. The origin is shifted the minimum
    /// amount needed to stay inside the bounds, and any remaining overflow is
    /// cut at the image edge.
    pub fn refit_region(&self, region: CropRegion, image: Size) -> CropRegion {
        let aspect = self.aspect();
        let area = region.to_cardinal();

        let width_preserving = {
            let width = (area.width.max(self.width)) as f64;
            (width, width / aspect)
        };
        let height_preserving = {
            let height = (area.height.max(self.height)) as f64;
            (height * aspect, height)
        };

        let fits = |candidate: &(f64, f64)| {
            candidate.0 <= image.width as f64 && candidate.1 <= image.height as f64
        };
        let (width, height) = if fits(&width_preserving) {
            width_preserving
        } else {
            height_preserving
        };

        let width = width.round() as i32;
        let height = height.round() as i32;

        let x = area
            .x
            .min(image.width as i32 - width)
            .max(0);
        let y = area
            .y
            .min(image.height as i32 - height)
            .max(0);

        CropRegion::new(
            x,
            y,
            (x + width).min(image.width as i32),
            (y + height).min(image.height as i32),
        )
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
