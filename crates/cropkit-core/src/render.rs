//! Overlay rendering as a pure display list.
//!
//! The engine never touches a platform drawing surface; [`build_scene`]
//! produces the full redraw as an ordered list of [`DrawCommand`]s that the
//! host replays onto its 2D context. The scene is purely a function of the
//! current region and layout, so calling it twice with unchanged inputs
//! yields the same commands.

use serde::Serialize;

use crate::geometry::{Area, Position, Ratio, Size};
use crate::handles::HandleSet;
use crate::region::CropRegion;

/// Dim fill painted over everything outside the region.
pub const MASK_FILL: &str = "rgba(0, 0, 0, 0.7)";

/// Stroke for the image bounds and the region outline.
pub const AREA_STROKE: &str = "rgb(1, 0, 0)";

/// Handle interior.
pub const HANDLE_FILL: &str = "rgb(255, 255, 255)";

/// Handle border.
pub const HANDLE_STROKE: &str = "rgba(0, 0, 0, 0.8)";

/// One drawing step, in image-pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Clear the whole surface.
    Clear,
    /// Repaint the base image at its native resolution, origin top-left.
    DrawImage,
    /// Stroke a rectangle outline.
    StrokeRect {
        area: Area,
        style: &'static str,
        line_width: f64,
    },
    /// Fill the band between `outer` and `inner` (even-odd rule), leaving
    /// the interior of `inner` untouched.
    MaskRect {
        outer: Area,
        inner: Area,
        style: &'static str,
    },
    /// A filled, bordered circle for one handle.
    FillCircle {
        center: Position,
        radius: f64,
        fill: &'static str,
        stroke: &'static str,
        line_width: f64,
    },
}

/// Build the full redraw for the current editor state.
///
/// Always clears and repaints the base image; the dimmed mask, the two
/// outlines and the eight handles are painted on top only when a region
/// exists. Handles come last so they stay visible over every outline.
pub fn build_scene(
    region: Option<CropRegion>,
    handles: &HandleSet,
    image: Size,
    ratio: Ratio,
    is_touch: bool,
) -> Vec<DrawCommand> {
    let mut scene = vec![DrawCommand::Clear, DrawCommand::DrawImage];

    let Some(region) = region else {
        return scene;
    };

    let outer = Area::new(0, image.width as i32, image.height as i32, 0);
    let inner = region.as_area();
    let line_width = ratio.horizontal.max(f64::EPSILON);

    scene.push(DrawCommand::StrokeRect {
        area: outer,
        style: AREA_STROKE,
        line_width,
    });
    scene.push(DrawCommand::MaskRect {
        outer,
        inner,
        style: MASK_FILL,
    });
    scene.push(DrawCommand::StrokeRect {
        area: inner,
        style: AREA_STROKE,
        line_width,
    });

    let radius = HandleSet::hit_radius(ratio, is_touch);
    for (_, center) in handles.iter() {
        scene.push(DrawCommand::FillCircle {
            center,
            radius,
            fill: HANDLE_FILL,
            stroke: HANDLE_STROKE,
            line_width,
        });
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles_for(region: CropRegion) -> HandleSet {
        let mut handles = HandleSet::new();
        handles.sync_to_region(Some(region.as_area()));
        handles
    }

    #[test]
    fn test_scene_without_region_only_repaints_image() {
        let handles = HandleSet::new();
        let scene = build_scene(
            None,
            &handles,
            Size::new(200, 200),
            Ratio::default(),
            false,
        );
        assert_eq!(scene, vec![DrawCommand::Clear, DrawCommand::DrawImage]);
    }

    #[test]
    fn test_scene_with_region_paints_mask_outlines_and_handles() {
        let region = CropRegion::new(10, 10, 110, 110);
        let handles = handles_for(region);
        let scene = build_scene(
            Some(region),
            &handles,
            Size::new(200, 200),
            Ratio::default(),
            false,
        );

        // Clear, image, outer stroke, mask, inner stroke, 8 handles.
        assert_eq!(scene.len(), 13);
        assert_eq!(scene[0], DrawCommand::Clear);
        assert_eq!(scene[1], DrawCommand::DrawImage);
        assert!(matches!(scene[3], DrawCommand::MaskRect { .. }));
        assert!(scene[5..]
            .iter()
            .all(|command| matches!(command, DrawCommand::FillCircle { .. })));
    }

    #[test]
    fn test_scene_mask_cuts_out_region_interior() {
        let region = CropRegion::new(10, 10, 110, 110);
        let handles = handles_for(region);
        let scene = build_scene(
            Some(region),
            &handles,
            Size::new(200, 200),
            Ratio::default(),
            false,
        );

        let mask = scene
            .iter()
            .find_map(|command| match command {
                DrawCommand::MaskRect { outer, inner, .. } => Some((*outer, *inner)),
                _ => None,
            })
            .unwrap();
        assert_eq!(mask.0, Area::new(0, 200, 200, 0));
        assert_eq!(mask.1, region.as_area());
    }

    #[test]
    fn test_scene_is_idempotent() {
        let region = CropRegion::new(10, 10, 110, 110);
        let handles = handles_for(region);
        let image = Size::new(200, 200);

        let first = build_scene(Some(region), &handles, image, Ratio::default(), false);
        let second = build_scene(Some(region), &handles, image, Ratio::default(), false);
        assert_eq!(first, second);
    }

    #[test]
    fn test_touch_scene_uses_larger_handles() {
        let region = CropRegion::new(10, 10, 110, 110);
        let handles = handles_for(region);
        let image = Size::new(200, 200);

        let radius_of = |scene: &[DrawCommand]| {
            scene
                .iter()
                .find_map(|command| match command {
                    DrawCommand::FillCircle { radius, .. } => Some(*radius),
                    _ => None,
                })
                .unwrap()
        };

        let mouse = build_scene(Some(region), &handles, image, Ratio::default(), false);
        let touch = build_scene(Some(region), &handles, image, Ratio::default(), true);
        assert!(radius_of(&touch) > radius_of(&mouse));
    }
}
