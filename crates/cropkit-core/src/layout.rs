//! Coordinate mapping between the on-screen surface and image pixels.
//!
//! The drawing surface shows the image scaled to fit its container, so every
//! pointer position has to be translated into native image pixels before the
//! gesture engine can use it. [`LayoutReference`] captures the surface's
//! offset and the per-axis scale factor; it is recomputed whenever the
//! surface is resized or a new image is loaded, and read everywhere else.

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Ratio, Size};

/// A raw pointer position on the surface, in (fractional) screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacePosition {
    pub x: f64,
    pub y: f64,
}

impl SurfacePosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Surface placement and scale relative to the native image.
///
/// `x`/`y` are the surface's on-screen offset; `ratio` is the per-axis
/// `surface / image` scale factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutReference {
    pub x: f64,
    pub y: f64,
    pub ratio: Ratio,
}

impl LayoutReference {
    pub fn new(x: f64, y: f64, ratio: Ratio) -> Self {
        Self { x, y, ratio }
    }

    /// Map a raw pointer position into image-pixel coordinates.
    ///
    /// Subtracts the surface offset, divides by the axis ratios and rounds to
    /// the nearest pixel. Positions outside the top/left edge saturate to 0;
    /// there is no upper clamp here, callers clamp against image bounds where
    /// needed.
    pub fn to_image_space(&self, surface: SurfacePosition) -> Position {
        let x = ((surface.x - self.x) / self.ratio.horizontal).round().max(0.0);
        let y = ((surface.y - self.y) / self.ratio.vertical).round().max(0.0);
        Position::new(x as i32, y as i32)
    }
}

/// Largest size <= `container` that preserves the image's aspect ratio.
///
/// Chooses the scale factor of the constrained axis: width factor when the
/// image is the landscape-constrained dimension, height factor when it is
/// height-constrained. An image that already fits is not upscaled; it is
/// clamped per axis instead.
pub fn effective_size(container: Size, image: Size) -> Size {
    if image.is_empty() || container.is_empty() {
        return Size::default();
    }

    let width_factor = container.width as f64 / image.width as f64;
    let height_factor = container.height as f64 / image.height as f64;

    let landscape_constrained = width_factor < height_factor;
    let portrait_constrained = width_factor > height_factor;
    let stretch_horizontally = width_factor < 1.0;
    let stretch_vertically = height_factor < 1.0;

    if stretch_horizontally && landscape_constrained {
        Size {
            width: (image.width as f64 * width_factor).round() as u32,
            height: (image.height as f64 * width_factor).round() as u32,
        }
    } else if stretch_vertically && portrait_constrained {
        Size {
            width: (image.width as f64 * height_factor).round() as u32,
            height: (image.height as f64 * height_factor).round() as u32,
        }
    } else {
        Size {
            width: image.width.min(container.width),
            height: image.height.min(container.height),
        }
    }
}

/// Per-axis `surface / image` scale factor.
///
/// Recomputed after every effective-size change. Both axes are expected to
/// be equal but are stored independently for robustness against layout
/// rounding.
pub fn compute_ratio(surface: Size, image: Size) -> Ratio {
    if image.is_empty() {
        return Ratio::default();
    }
    Ratio {
        horizontal: surface.width as f64 / image.width as f64,
        vertical: surface.height as f64 / image.height as f64,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1u32..=4000, 1u32..=4000).prop_map(|(width, height)| Size { width, height })
    }

    proptest! {
        /// Property: the effective size never exceeds the container.
        #[test]
        fn prop_effective_size_fits_container(
            container in size_strategy(),
            image in size_strategy(),
        ) {
            let size = effective_size(container, image);
            prop_assert!(size.width <= container.width);
            prop_assert!(size.height <= container.height);
        }

        /// Property: the effective size preserves aspect ratio up to rounding
        /// whenever the image had to be scaled down.
        #[test]
        fn prop_effective_size_preserves_aspect(
            container in size_strategy(),
            image in size_strategy(),
        ) {
            let size = effective_size(container, image);
            let scaled = size != Size::new(
                image.width.min(container.width),
                image.height.min(container.height),
            );
            if scaled && !size.is_empty() {
                let original = image.width as f64 / image.height as f64;
                let effective = size.width as f64 / size.height as f64;
                // Rounding each axis to an integer pixel bounds the error.
                let tolerance = original / size.height as f64 + 1.0 / size.height as f64;
                prop_assert!(
                    (original - effective).abs() <= tolerance,
                    "aspect drifted: {} vs {}",
                    original,
                    effective
                );
            }
        }

        /// Property: mapped positions are never negative.
        #[test]
        fn prop_to_image_space_non_negative(
            offset_x in -100.0f64..=100.0,
            offset_y in -100.0f64..=100.0,
            ratio in 0.05f64..=4.0,
            x in -500.0f64..=500.0,
            y in -500.0f64..=500.0,
        ) {
            let layout = LayoutReference::new(offset_x, offset_y, Ratio::new(ratio, ratio));
            let position = layout.to_image_space(SurfacePosition::new(x, y));
            prop_assert!(position.x >= 0);
            prop_assert!(position.y >= 0);
        }
    }
}
