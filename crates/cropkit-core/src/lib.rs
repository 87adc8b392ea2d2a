//! Cropkit Core - Interactive crop/scale editing engine
//!
//! This crate provides the headless core of Cropkit: geometry primitives,
//! the surface-to-image coordinate mapper, the eight-handle crop gesture
//! machine, overlay scene building, and the pixel pipeline used for export.
//!
//! The engine is platform-agnostic: hosts feed it pointer events and
//! resize/image notifications and replay the [`render::DrawCommand`] scenes
//! it produces onto whatever 2D surface they own.

pub mod editor;
pub mod geometry;
pub mod gesture;
pub mod handles;
pub mod layout;
pub mod lock;
pub mod pipeline;
pub mod region;
pub mod render;

pub use editor::{
    EditionSnapshot, EditorError, EditorMode, EditorOptions, ImageEditor, PointerEvent,
};
pub use geometry::{Area, CardinalArea, Position, Ratio, Size};
pub use gesture::{CropTool, DragAction, EditorTool, PointerKind};
pub use handles::{CursorHint, HandleIdentity, HandleSet};
pub use layout::{compute_ratio, effective_size, LayoutReference, SurfacePosition};
pub use lock::OutputLock;
pub use pipeline::{EncodedImage, OutputFormat, Pipeline, PipelineError, Raster};
pub use region::{CropRegion, MIN_SIZE};
pub use render::{build_scene, DrawCommand};
