//! The crop-tool gesture engine.
//!
//! Interprets a normalized pointer stream (already mapped into image-pixel
//! coordinates) into create / move / resize edits against the crop region.
//! The state machine owns the region exclusively; readers only ever see
//! snapshots taken between events.
//!
//! Transition table (pointer-down):
//! - handle hit            -> `Resize` (the handle is remembered)
//! - inside the region     -> `Move`
//! - no region exists      -> `Create`
//! - outside, region exists-> ignored
//!
//! Pointer-up always returns to `None`; the region itself persists.

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Ratio, Size};
use crate::handles::{cursor_for, CursorHint, HandleIdentity, HandleSet};
use crate::region::CropRegion;

/// What the user is currently doing with the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragAction {
    #[default]
    None,
    /// Dragging out a first rectangle; no region exists yet.
    Create,
    /// Dragging the whole region.
    Move,
    /// Dragging a single handle.
    Resize,
}

/// The active gesture. `action == None` implies both `handle` and `anchor`
/// are `None`; only one gesture is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub action: DragAction,
    pub handle: Option<HandleIdentity>,
    pub anchor: Option<Position>,
}

impl DragState {
    fn begin(action: DragAction, anchor: Position, handle: Option<HandleIdentity>) -> Self {
        Self {
            action,
            handle,
            anchor: Some(anchor),
        }
    }
}

/// Normalized pointer event kind. Touch vs mouse is resolved upstream; only
/// the modality flag survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// A pointer event in image-pixel coordinates, as consumed by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolPointerEvent {
    pub kind: PointerKind,
    pub position: Position,
    pub is_touch: bool,
}

/// What a tool did with a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToolResponse {
    /// Cursor hint for the surface, when hovering produced one.
    pub cursor: Option<CursorHint>,
    /// True when the region geometry changed and a redraw is needed.
    pub region_changed: bool,
}

/// A capability handler composed by the editor. The host enables whichever
/// tools its mode selects instead of branching on mode bits throughout.
pub trait EditorTool {
    fn pointer_event(&mut self, event: ToolPointerEvent) -> ToolResponse;
    fn reset(&mut self);
    fn update_geometry(&mut self, image: Size, ratio: Ratio);
}

/// The interactive crop tool: drag state machine plus the region it owns.
#[derive(Debug, Default)]
pub struct CropTool {
    state: DragState,
    region: Option<CropRegion>,
    handles: HandleSet,
    image: Size,
    ratio: Ratio,
    is_touch: bool,
}

impl CropTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current region, if a create gesture has completed one.
    pub fn region(&self) -> Option<CropRegion> {
        self.region
    }

    /// Replace the region from outside the gesture path (output-lock refit).
    /// The value is re-clamped against the image bounds.
    pub fn set_region(&mut self, region: Option<CropRegion>) {
        self.region = region.map(|region| region.clamp_to(self.image));
        self.handles.sync_to_region(self.region.map(|r| r.as_area()));
    }

    /// Handle positions derived from the current region.
    pub fn handles(&self) -> &HandleSet {
        &self.handles
    }

    /// True while a gesture is in flight.
    pub fn is_dragging(&self) -> bool {
        self.state.action != DragAction::None
    }

    pub fn drag_action(&self) -> DragAction {
        self.state.action
    }

    fn pointer_down(&mut self, position: Position, is_touch: bool) -> ToolResponse {
        self.is_touch = is_touch;

        if let Some(handle) = self.handles.hit_test(position, self.ratio, self.is_touch) {
            self.state = DragState::begin(DragAction::Resize, position, Some(handle));
        } else if self.region.is_some_and(|region| region.contains(position)) {
            self.state = DragState::begin(DragAction::Move, position, None);
        } else if self.region.is_none() {
            self.state = DragState::begin(DragAction::Create, position, None);
        }
        // Clicks in the outer area with an existing region are ignored.

        ToolResponse::default()
    }

    fn pointer_move(&mut self, position: Position) -> ToolResponse {
        match self.state.action {
            DragAction::None => ToolResponse {
                cursor: self.hover_cursor(position),
                region_changed: false,
            },
            DragAction::Resize => {
                let handle = self
                    .state
                    .handle
                    .unwrap_or_else(|| panic!("resize gesture without an active handle"));
                self.resize_region(handle, position)
            }
            DragAction::Create => {
                if let Some(corner) = self.state.handle {
                    // The first rectangle exists; keep resizing its trailing
                    // corner.
                    self.resize_region(corner, position)
                } else {
                    self.materialize_region(position)
                }
            }
            DragAction::Move => self.move_region(position),
        }
    }

    fn pointer_up(&mut self) -> ToolResponse {
        self.state = DragState::default();
        ToolResponse::default()
    }

    /// Cursor hint for an idle pointer. Never mutates the region.
    fn hover_cursor(&self, position: Position) -> Option<CursorHint> {
        let region = self.region?;

        let hint = match self.handles.hit_test(position, self.ratio, self.is_touch) {
            Some(handle) => cursor_for(handle),
            None if region.contains(position) => CursorHint::Move,
            None => CursorHint::Auto,
        };
        Some(hint)
    }

    fn materialize_region(&mut self, position: Position) -> ToolResponse {
        let anchor = self
            .state
            .anchor
            .unwrap_or_else(|| panic!("create gesture without an anchor position"));

        let deltas = position.delta_from(anchor);
        let Some((region, corner)) = CropRegion::from_initial_drag(anchor, deltas) else {
            // Still inside the dead-zone.
            return ToolResponse::default();
        };

        // Let the trailing corner catch up with the pointer right away, then
        // force the result inside the image.
        let region = region
            .resize_toward(corner, position, self.image)
            .clamp_to(self.image);

        self.region = Some(region);
        self.state.handle = Some(corner);
        self.handles.sync_to_region(Some(region.as_area()));

        ToolResponse {
            cursor: None,
            region_changed: true,
        }
    }

    fn resize_region(&mut self, handle: HandleIdentity, position: Position) -> ToolResponse {
        let region = self
            .region
            .unwrap_or_else(|| panic!("resize gesture without a region"));

        let next = region.resize_toward(handle, position, self.image);
        if next == region {
            return ToolResponse::default();
        }

        self.region = Some(next);
        self.handles.sync_to_region(Some(next.as_area()));
        ToolResponse {
            cursor: None,
            region_changed: true,
        }
    }

    fn move_region(&mut self, position: Position) -> ToolResponse {
        let region = self
            .region
            .unwrap_or_else(|| panic!("move gesture without a region"));
        let anchor = self
            .state
            .anchor
            .unwrap_or_else(|| panic!("move gesture without an anchor position"));

        let deltas = position.delta_from(anchor);
        let (next, applied) = region.translate_clamped(deltas, self.image);

        if applied == Position::default() {
            return ToolResponse::default();
        }

        // Absorb the applied movement into the anchor: when an axis was
        // clamped the anchor keeps the un-applied remainder out of future
        // deltas, so the region responds immediately once the pointer
        // re-enters bounds.
        self.state.anchor = Some(Position::new(anchor.x + applied.x, anchor.y + applied.y));

        self.region = Some(next);
        self.handles.sync_to_region(Some(next.as_area()));
        ToolResponse {
            cursor: None,
            region_changed: true,
        }
    }
}

impl EditorTool for CropTool {
    fn pointer_event(&mut self, event: ToolPointerEvent) -> ToolResponse {
        match event.kind {
            PointerKind::Down => self.pointer_down(event.position, event.is_touch),
            PointerKind::Move => self.pointer_move(event.position),
            PointerKind::Up => self.pointer_up(),
        }
    }

    fn reset(&mut self) {
        self.state = DragState::default();
        self.region = None;
        self.handles.sync_to_region(None);
    }

    fn update_geometry(&mut self, image: Size, ratio: Ratio) {
        self.image = image;
        self.ratio = ratio;
        if let Some(region) = self.region {
            let clamped = region.clamp_to(image);
            self.region = Some(clamped);
            self.handles.sync_to_region(Some(clamped.as_area()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::MIN_SIZE;

    fn tool() -> CropTool {
        let mut tool = CropTool::new();
        tool.update_geometry(Size::new(200, 200), Ratio::default());
        tool
    }

    fn down(tool: &mut CropTool, x: i32, y: i32) -> ToolResponse {
        tool.pointer_event(ToolPointerEvent {
            kind: PointerKind::Down,
            position: Position::new(x, y),
            is_touch: false,
        })
    }

    fn moved(tool: &mut CropTool, x: i32, y: i32) -> ToolResponse {
        tool.pointer_event(ToolPointerEvent {
            kind: PointerKind::Move,
            position: Position::new(x, y),
            is_touch: false,
        })
    }

    fn up(tool: &mut CropTool) -> ToolResponse {
        tool.pointer_event(ToolPointerEvent {
            kind: PointerKind::Up,
            position: Position::default(),
            is_touch: false,
        })
    }

    fn tool_with_region(left: i32, top: i32, right: i32, bottom: i32) -> CropTool {
        let mut tool = tool();
        tool.set_region(Some(CropRegion::new(left, top, right, bottom)));
        tool
    }

    #[test]
    fn test_down_with_no_region_starts_create() {
        let mut tool = tool();
        down(&mut tool, 100, 100);
        assert_eq!(tool.drag_action(), DragAction::Create);
        assert!(tool.region().is_none());
    }

    #[test]
    fn test_create_dead_zone_requires_both_axes() {
        let mut tool = tool();
        down(&mut tool, 100, 100);

        let response = moved(&mut tool, 110, 100);
        assert!(!response.region_changed);
        assert!(tool.region().is_none());

        let response = moved(&mut tool, 110, 110);
        assert!(response.region_changed);
        assert!(tool.region().is_some());
    }

    #[test]
    fn test_create_drag_scenario() {
        // Down at (100,100), drag to (140,130): region covers exactly that
        // span, trailing corner RB.
        let mut tool = tool();
        down(&mut tool, 100, 100);
        moved(&mut tool, 140, 130);

        assert_eq!(tool.region(), Some(CropRegion::new(100, 100, 140, 130)));
        assert_eq!(tool.drag_action(), DragAction::Create);

        up(&mut tool);
        assert_eq!(tool.drag_action(), DragAction::None);
        assert_eq!(tool.region(), Some(CropRegion::new(100, 100, 140, 130)));
    }

    #[test]
    fn test_create_small_drag_clamps_to_min_size() {
        let mut tool = tool();
        down(&mut tool, 100, 100);
        moved(&mut tool, 105, 103);

        let region = tool.region().unwrap();
        assert_eq!(region.width(), MIN_SIZE);
        assert_eq!(region.height(), MIN_SIZE);
        assert_eq!(region.left, 100);
        assert_eq!(region.top, 100);
    }

    #[test]
    fn test_create_continues_as_resize_on_trailing_corner() {
        let mut tool = tool();
        down(&mut tool, 100, 100);
        moved(&mut tool, 140, 130);
        moved(&mut tool, 160, 150);

        assert_eq!(tool.region(), Some(CropRegion::new(100, 100, 160, 150)));
    }

    #[test]
    fn test_create_drag_up_left_near_border_stays_inside() {
        let mut tool = tool();
        down(&mut tool, 5, 5);
        moved(&mut tool, 2, 2);

        let region = tool.region().unwrap();
        assert!(region.left >= 0 && region.top >= 0);
        assert_eq!(region.width(), MIN_SIZE);
        assert_eq!(region.height(), MIN_SIZE);
    }

    #[test]
    fn test_down_on_handle_starts_resize() {
        let mut tool = tool_with_region(10, 10, 110, 110);
        down(&mut tool, 110, 110);
        assert_eq!(tool.drag_action(), DragAction::Resize);
    }

    #[test]
    fn test_resize_rb_clamps_to_image_bounds() {
        let mut tool = tool_with_region(10, 10, 110, 110);
        down(&mut tool, 110, 110);
        moved(&mut tool, 250, 250);

        assert_eq!(tool.region(), Some(CropRegion::new(10, 10, 200, 200)));
    }

    #[test]
    fn test_down_inside_region_starts_move() {
        let mut tool = tool_with_region(10, 10, 110, 110);
        down(&mut tool, 60, 60);
        assert_eq!(tool.drag_action(), DragAction::Move);
    }

    #[test]
    fn test_down_outside_existing_region_is_ignored() {
        let mut tool = tool_with_region(10, 10, 110, 110);
        down(&mut tool, 180, 180);
        assert_eq!(tool.drag_action(), DragAction::None);

        // And moving afterwards only hints, never mutates.
        let before = tool.region();
        moved(&mut tool, 190, 190);
        assert_eq!(tool.region(), before);
    }

    #[test]
    fn test_move_translates_region() {
        let mut tool = tool_with_region(10, 10, 60, 60);
        down(&mut tool, 30, 30);
        moved(&mut tool, 50, 40);

        assert_eq!(tool.region(), Some(CropRegion::new(30, 20, 80, 70)));
    }

    #[test]
    fn test_move_clamps_and_absorbs_anchor() {
        let mut tool = tool_with_region(150, 10, 190, 50);
        down(&mut tool, 170, 30);

        // Push well past the right edge: region stops at the border.
        moved(&mut tool, 250, 30);
        assert_eq!(tool.region(), Some(CropRegion::new(160, 10, 200, 50)));

        // Coming back responds immediately: the anchor absorbed the clamped
        // movement, so no dead travel accumulates.
        moved(&mut tool, 170, 30);
        assert_eq!(tool.region(), Some(CropRegion::new(150, 10, 190, 50)));
    }

    #[test]
    fn test_idle_hover_hints_without_mutation() {
        let mut tool = tool_with_region(10, 10, 110, 110);

        let on_corner = moved(&mut tool, 110, 110);
        assert_eq!(on_corner.cursor, Some(CursorHint::ResizeNwse));
        assert!(!on_corner.region_changed);

        let inside = moved(&mut tool, 60, 60);
        assert_eq!(inside.cursor, Some(CursorHint::Move));

        let outside = moved(&mut tool, 180, 180);
        assert_eq!(outside.cursor, Some(CursorHint::Auto));

        assert_eq!(tool.region(), Some(CropRegion::new(10, 10, 110, 110)));
        assert_eq!(tool.drag_action(), DragAction::None);
    }

    #[test]
    fn test_idle_hover_without_region_gives_no_hint() {
        let mut tool = tool();
        let response = moved(&mut tool, 50, 50);
        assert_eq!(response.cursor, None);
    }

    #[test]
    fn test_pointer_up_clears_state_keeps_region() {
        let mut tool = tool_with_region(10, 10, 110, 110);
        down(&mut tool, 110, 110);
        moved(&mut tool, 150, 150);
        up(&mut tool);

        assert_eq!(tool.drag_action(), DragAction::None);
        assert!(tool.region().is_some());

        // The drag-state invariant: no action implies no handle, no anchor.
        assert_eq!(tool.state, DragState::default());
    }

    #[test]
    fn test_reset_clears_region_and_handles() {
        let mut tool = tool_with_region(10, 10, 110, 110);
        tool.reset();

        assert!(tool.region().is_none());
        assert!(tool.handles().iter().next().is_none());
        assert_eq!(tool.drag_action(), DragAction::None);
    }

    #[test]
    fn test_update_geometry_reclamps_region() {
        let mut tool = tool_with_region(100, 100, 200, 200);
        tool.update_geometry(Size::new(150, 150), Ratio::default());

        let region = tool.region().unwrap();
        assert!(region.right <= 150 && region.bottom <= 150);
    }

    #[test]
    fn test_touch_modality_enlarges_hit_target() {
        let mut tool = tool_with_region(50, 50, 150, 150);

        // 8 pixels left of the RB corner: a mouse press misses the handle
        // and falls inside the region, a touch press grabs it.
        tool.pointer_event(ToolPointerEvent {
            kind: PointerKind::Down,
            position: Position::new(142, 150),
            is_touch: false,
        });
        assert_eq!(tool.drag_action(), DragAction::Move);
        up(&mut tool);

        tool.pointer_event(ToolPointerEvent {
            kind: PointerKind::Down,
            position: Position::new(142, 150),
            is_touch: true,
        });
        assert_eq!(tool.drag_action(), DragAction::Resize);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
