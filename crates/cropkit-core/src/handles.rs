//! The eight-handle geometry model around the crop region.
//!
//! Handles sit on the four corners and four edge midpoints of the region:
//!
//! ```text
//!    LT           TM            RT
//!     +------------+------------+
//!     |                         |
//!  LM +                         + RM
//!     |                         |
//!     +------------+------------+
//!    LB           BM            RB
//! ```
//!
//! Handle positions are *derived* from the crop region and never the source
//! of truth; [`HandleSet::sync_to_region`] re-derives all eight after every
//! geometry change.

use serde::{Deserialize, Serialize};

use crate::geometry::{Area, Position, Ratio};

/// On-screen handle diameter for mouse input, in surface pixels.
pub const HANDLE_SIZE_MOUSE: f64 = 8.0;

/// On-screen handle diameter for touch input, in surface pixels.
///
/// Larger than the mouse size so the physical touch target stays usable.
pub const HANDLE_SIZE_TOUCH: f64 = 20.0;

/// One of the eight handle positions on the region boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandleIdentity {
    /// Left-top corner.
    Lt,
    /// Left edge midpoint.
    Lm,
    /// Left-bottom corner.
    Lb,
    /// Right-top corner.
    Rt,
    /// Right edge midpoint.
    Rm,
    /// Right-bottom corner.
    Rb,
    /// Top edge midpoint.
    Tm,
    /// Bottom edge midpoint.
    Bm,
}

impl HandleIdentity {
    /// All eight identities in a fixed iteration order.
    pub const ALL: [HandleIdentity; 8] = [
        HandleIdentity::Lt,
        HandleIdentity::Lm,
        HandleIdentity::Lb,
        HandleIdentity::Rt,
        HandleIdentity::Rm,
        HandleIdentity::Rb,
        HandleIdentity::Tm,
        HandleIdentity::Bm,
    ];

    /// True for the four corner handles.
    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            HandleIdentity::Lt | HandleIdentity::Lb | HandleIdentity::Rt | HandleIdentity::Rb
        )
    }

    /// True when the handle controls the left edge.
    pub fn controls_left(&self) -> bool {
        matches!(
            self,
            HandleIdentity::Lt | HandleIdentity::Lm | HandleIdentity::Lb
        )
    }

    /// True when the handle controls the right edge.
    pub fn controls_right(&self) -> bool {
        matches!(
            self,
            HandleIdentity::Rt | HandleIdentity::Rm | HandleIdentity::Rb
        )
    }

    /// True when the handle controls the top edge.
    pub fn controls_top(&self) -> bool {
        matches!(
            self,
            HandleIdentity::Lt | HandleIdentity::Tm | HandleIdentity::Rt
        )
    }

    /// True when the handle controls the bottom edge.
    pub fn controls_bottom(&self) -> bool {
        matches!(
            self,
            HandleIdentity::Lb | HandleIdentity::Bm | HandleIdentity::Rb
        )
    }

    fn index(&self) -> usize {
        match self {
            HandleIdentity::Lt => 0,
            HandleIdentity::Lm => 1,
            HandleIdentity::Lb => 2,
            HandleIdentity::Rt => 3,
            HandleIdentity::Rm => 4,
            HandleIdentity::Rb => 5,
            HandleIdentity::Tm => 6,
            HandleIdentity::Bm => 7,
        }
    }
}

/// Cursor hint derived from what the pointer is hovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorHint {
    Auto,
    Move,
    ResizeEw,
    ResizeNs,
    ResizeNesw,
    ResizeNwse,
}

impl CursorHint {
    /// CSS cursor keyword for the host's pointer style.
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorHint::Auto => "auto",
            CursorHint::Move => "move",
            CursorHint::ResizeEw => "ew-resize",
            CursorHint::ResizeNs => "ns-resize",
            CursorHint::ResizeNesw => "nesw-resize",
            CursorHint::ResizeNwse => "nwse-resize",
        }
    }
}

/// Resize cursor for a handle. Opposite corners share a diagonal hint.
pub fn cursor_for(identity: HandleIdentity) -> CursorHint {
    match identity {
        HandleIdentity::Lt | HandleIdentity::Rb => CursorHint::ResizeNwse,
        HandleIdentity::Lb | HandleIdentity::Rt => CursorHint::ResizeNesw,
        HandleIdentity::Tm | HandleIdentity::Bm => CursorHint::ResizeNs,
        HandleIdentity::Lm | HandleIdentity::Rm => CursorHint::ResizeEw,
    }
}

/// Trailing corner for an initial drag: the corner opposite the drag origin,
/// chosen by the sign of the movement deltas.
pub fn identity_for_deltas(deltas: Position) -> HandleIdentity {
    let increment_horizontal = deltas.x > 0;
    let increment_vertical = deltas.y > 0;

    if increment_horizontal {
        if increment_vertical {
            HandleIdentity::Rb
        } else {
            HandleIdentity::Rt
        }
    } else if increment_vertical {
        HandleIdentity::Lb
    } else {
        HandleIdentity::Lt
    }
}

/// The eight handle positions derived from the current crop region.
#[derive(Debug, Clone, Default)]
pub struct HandleSet {
    positions: Option<[Position; 8]>,
}

impl HandleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive all eight handle positions from `region`, or clear them.
    pub fn sync_to_region(&mut self, region: Option<Area>) {
        self.positions = region.map(|area| {
            let mid_x = area.left + area.width() / 2;
            let mid_y = area.top + area.height() / 2;
            let mut positions = [Position::default(); 8];
            positions[HandleIdentity::Lt.index()] = Position::new(area.left, area.top);
            positions[HandleIdentity::Lm.index()] = Position::new(area.left, mid_y);
            positions[HandleIdentity::Lb.index()] = Position::new(area.left, area.bottom);
            positions[HandleIdentity::Rt.index()] = Position::new(area.right, area.top);
            positions[HandleIdentity::Rm.index()] = Position::new(area.right, mid_y);
            positions[HandleIdentity::Rb.index()] = Position::new(area.right, area.bottom);
            positions[HandleIdentity::Tm.index()] = Position::new(mid_x, area.top);
            positions[HandleIdentity::Bm.index()] = Position::new(mid_x, area.bottom);
            positions
        });
    }

    /// Position of a single handle, if a region exists.
    pub fn position(&self, identity: HandleIdentity) -> Option<Position> {
        self.positions.map(|positions| positions[identity.index()])
    }

    /// Hit radius in image pixels for the current zoom and input modality.
    ///
    /// The on-screen diameter is constant per modality; dividing by the
    /// surface ratio keeps the physical hit size independent of zoom. When
    /// layout rounding leaves the axes unequal the smaller factor wins, so
    /// the handle never shrinks below its on-screen size.
    pub fn hit_radius(ratio: Ratio, is_touch: bool) -> f64 {
        let diameter = if is_touch {
            HANDLE_SIZE_TOUCH
        } else {
            HANDLE_SIZE_MOUSE
        };
        let scale = ratio.min_axis().max(f64::EPSILON);
        (diameter / (2.0 * scale)).round() + 0.5
    }

    /// First handle whose circular hit region contains `position`.
    pub fn hit_test(
        &self,
        position: Position,
        ratio: Ratio,
        is_touch: bool,
    ) -> Option<HandleIdentity> {
        let positions = self.positions?;
        let radius = Self::hit_radius(ratio, is_touch);
        let radius_sq = radius * radius;

        HandleIdentity::ALL.into_iter().find(|identity| {
            let center = positions[identity.index()];
            let dx = (position.x - center.x) as f64;
            let dy = (position.y - center.y) as f64;
            dx * dx + dy * dy <= radius_sq
        })
    }

    /// Iterate handle positions for rendering.
    pub fn iter(&self) -> impl Iterator<Item = (HandleIdentity, Position)> + '_ {
        self.positions.into_iter().flat_map(|positions| {
            HandleIdentity::ALL
                .into_iter()
                .map(move |identity| (identity, positions[identity.index()]))
        })
    }
}
