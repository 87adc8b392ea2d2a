//! The crop region and its self-correcting geometry operations.
//!
//! A [`CropRegion`] is the user's rectangular selection in image-pixel
//! coordinates. Every operation here clamps instead of failing: resizes never
//! drop below [`MIN_SIZE`], translations never leave the image bounds, and
//! re-clamps after a layout change shift-then-shrink the region back inside.

use serde::{Deserialize, Serialize};

use crate::geometry::{Area, CardinalArea, Position, Size};
use crate::handles::{identity_for_deltas, HandleIdentity};

/// Minimum crop span in image pixels, per axis.
pub const MIN_SIZE: i32 = 20;

/// The user's selection, expressed by its four edges in image pixels.
///
/// Invariants (maintained by every operation, given in-bounds inputs):
/// `right - left >= MIN_SIZE`, `bottom - top >= MIN_SIZE`, fully inside the
/// image bounds. When the image itself is smaller than `MIN_SIZE` the span
/// degrades to the full image instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl CropRegion {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn as_area(&self) -> Area {
        Area {
            top: self.top,
            right: self.right,
            bottom: self.bottom,
            left: self.left,
        }
    }

    pub fn to_cardinal(&self) -> CardinalArea {
        self.as_area().to_cardinal()
    }

    /// Inclusive containment test against the region's interior.
    pub fn contains(&self, position: Position) -> bool {
        self.as_area().contains(position)
    }

    /// Materialize the first region of a create gesture.
    ///
    /// Returns `None` while the drag is still inside the dead-zone (no
    /// movement on one of the axes). Otherwise the region is a minimum-size
    /// rectangle anchored at the drag origin and oriented toward the drag
    /// direction, paired with the trailing corner that subsequent moves
    /// resize.
    pub fn from_initial_drag(
        origin: Position,
        deltas: Position,
    ) -> Option<(CropRegion, HandleIdentity)> {
        if deltas.x == 0 || deltas.y == 0 {
            return None;
        }

        let (left, right) = if deltas.x > 0 {
            (origin.x, origin.x + MIN_SIZE)
        } else {
            (origin.x - MIN_SIZE, origin.x)
        };
        let (top, bottom) = if deltas.y > 0 {
            (origin.y, origin.y + MIN_SIZE)
        } else {
            (origin.y - MIN_SIZE, origin.y)
        };

        let region = CropRegion {
            left,
            top,
            right,
            bottom,
        };
        Some((region, identity_for_deltas(deltas)))
    }

    /// Recompute the edges controlled by `handle` so the opposite edge stays
    /// fixed and the controlled edge follows `pointer`.
    ///
    /// The pointer is clamped into the image bounds first, and the gap from
    /// the fixed edge never drops below [`MIN_SIZE`]. Edge-midpoint handles
    /// move a single axis; corner handles move both.
    pub fn resize_toward(&self, handle: HandleIdentity, pointer: Position, bounds: Size) -> Self {
        let pointer = Position::new(
            pointer.x.clamp(0, bounds.width as i32),
            pointer.y.clamp(0, bounds.height as i32),
        );

        let mut next = *self;

        if handle.controls_left() {
            let gap = (next.right - pointer.x).max(MIN_SIZE);
            next.left = next.right - gap;
        } else if handle.controls_right() {
            let gap = (pointer.x - next.left).max(MIN_SIZE);
            next.right = next.left + gap;
        }

        if handle.controls_top() {
            let gap = (next.bottom - pointer.y).max(MIN_SIZE);
            next.top = next.bottom - gap;
        } else if handle.controls_bottom() {
            let gap = (pointer.y - next.top).max(MIN_SIZE);
            next.bottom = next.top + gap;
        }

        next
    }

    /// Translate all four edges by `deltas`, clamped so the region never
    /// exits `[0, width] x [0, height]`.
    ///
    /// Returns the translated region and the movement actually applied. A
    /// clamped axis applies less than requested; the caller absorbs the
    /// difference into its drag anchor so drift does not accumulate while
    /// the pointer is out of bounds.
    pub fn translate_clamped(&self, deltas: Position, bounds: Size) -> (Self, Position) {
        let width = bounds.width as i32;
        let height = bounds.height as i32;

        let applied_x = if deltas.x > 0 {
            (self.right + deltas.x).min(width) - self.right
        } else if deltas.x < 0 {
            (self.left + deltas.x).max(0) - self.left
        } else {
            0
        };
        let applied_y = if deltas.y > 0 {
            (self.bottom + deltas.y).min(height) - self.bottom
        } else if deltas.y < 0 {
            (self.top + deltas.y).max(0) - self.top
        } else {
            0
        };

        let next = CropRegion {
            left: self.left + applied_x,
            top: self.top + applied_y,
            right: self.right + applied_x,
            bottom: self.bottom + applied_y,
        };
        (next, Position::new(applied_x, applied_y))
    }

    /// Force the region back inside the image bounds, preserving the minimum
    /// span where the image allows it.
    ///
    /// Used after a surface resize or an externally supplied region. Shifts
    /// first, then shrinks edges that still stick out.
    pub fn clamp_to(&self, bounds: Size) -> Self {
        let width = bounds.width as i32;
        let height = bounds.height as i32;

        let mut next = *self;

        // Shift back inside without changing the span when possible.
        if next.right > width {
            let shift = next.right - width;
            next.left -= shift;
            next.right -= shift;
        }
        if next.left < 0 {
            let shift = -next.left;
            next.left += shift;
            next.right = (next.right + shift).min(width);
        }
        if next.bottom > height {
            let shift = next.bottom - height;
            next.top -= shift;
            next.bottom -= shift;
        }
        if next.top < 0 {
            let shift = -next.top;
            next.top += shift;
            next.bottom = (next.bottom + shift).min(height);
        }

        // Restore the minimum span where the image is large enough.
        if next.width() < MIN_SIZE {
            next.right = (next.left + MIN_SIZE).min(width);
            next.left = (next.right - MIN_SIZE).max(0);
        }
        if next.height() < MIN_SIZE {
            next.bottom = (next.top + MIN_SIZE).min(height);
            next.top = (next.bottom - MIN_SIZE).max(0);
        }

        next
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
