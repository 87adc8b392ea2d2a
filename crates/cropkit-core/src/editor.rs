//! The editor facade: tool composition, layout bookkeeping and export.
//!
//! [`ImageEditor`] wires the capability handlers selected by the editor mode
//! to the coordinate mapper and the pixel pipeline. The host feeds it a
//! normalized pointer stream plus resize/image notifications and reads back
//! immutable [`EditionSnapshot`]s, cursor hints, overlay scenes and encoded
//! exports.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::{CropTool, EditorTool, PointerKind, ToolPointerEvent};
use crate::geometry::{CardinalArea, Ratio, Size};
use crate::handles::CursorHint;
use crate::layout::{compute_ratio, effective_size, LayoutReference, SurfacePosition};
use crate::lock::OutputLock;
use crate::pipeline::{EncodedImage, OutputFormat, Pipeline, PipelineError, Raster};
use crate::region::CropRegion;
use crate::render::{build_scene, DrawCommand};

/// Errors surfaced by the editor facade.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The supplied bytes could not be decoded as an image.
    #[error("Image decode failed: {0}")]
    Decode(String),

    /// An operation that needs a loaded image was called without one.
    #[error("No image loaded")]
    NoImage,

    /// A pipeline step failed during export.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Capability bitmask recognized at construction.
///
/// Kept bit-compatible with the host wire format (CROP=1, SCALE=2, ALL=3);
/// internally the editor composes one handler per selected capability
/// instead of branching on bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorMode(u8);

impl EditorMode {
    pub const CROP: EditorMode = EditorMode(1);
    pub const SCALE: EditorMode = EditorMode(1 << 1);
    pub const ALL: EditorMode = EditorMode(0b11);

    /// Build from raw bits; unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        EditorMode(bits & Self::ALL.0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn contains(&self, other: EditorMode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for EditorMode {
    fn default() -> Self {
        Self::ALL
    }
}

/// Construction-time configuration.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EditorOptions {
    pub mode: EditorMode,
    /// Optional initial output lock, applied once an image is loaded.
    pub locked_output_size: Option<Size>,
}

/// A pointer event as delivered by the host, in surface coordinates.
/// Touch vs mouse is normalized upstream; only the modality flag remains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub surface_position: SurfacePosition,
    pub is_touch: bool,
}

/// Read-only projection of the edition state for UI binding.
///
/// Taken at a point in time; never a live reference, so a reader can never
/// observe a half-updated region mid-gesture. `version` increments on every
/// geometry change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditionSnapshot {
    pub region: Option<CardinalArea>,
    pub ratio: Ratio,
    pub output_lock: Option<Size>,
    pub image_size: Option<Size>,
    pub surface_size: Size,
    pub version: u64,
}

/// Placeholder scale capability handler.
///
/// Scale has no gesture surface of its own; scaled export is driven by the
/// output lock. The handler exists so SCALE composes like any other tool.
#[derive(Debug, Default)]
pub struct ScaleTool;

impl EditorTool for ScaleTool {
    fn pointer_event(&mut self, _event: ToolPointerEvent) -> crate::gesture::ToolResponse {
        crate::gesture::ToolResponse::default()
    }

    fn reset(&mut self) {}

    fn update_geometry(&mut self, _image: Size, _ratio: Ratio) {}
}

/// The interactive image-crop/scale editor.
#[derive(Debug, Default)]
pub struct ImageEditor {
    mode: EditorMode,
    crop_tool: Option<CropTool>,
    scale_tool: Option<ScaleTool>,
    image: Option<Raster>,
    container: Size,
    surface_size: Size,
    layout: LayoutReference,
    output_lock: Option<OutputLock>,
    /// Lock supplied at construction, applied to the first loaded image.
    initial_lock: Option<Size>,
    last_touch: bool,
    version: u64,
}

impl ImageEditor {
    pub fn new(options: EditorOptions) -> Self {
        let mode = options.mode;
        Self {
            mode,
            crop_tool: mode.contains(EditorMode::CROP).then(CropTool::new),
            scale_tool: mode.contains(EditorMode::SCALE).then(ScaleTool::default),
            initial_lock: options.locked_output_size,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Native size of the loaded image, if any.
    pub fn image_size(&self) -> Option<Size> {
        self.image.as_ref().map(Raster::size)
    }

    pub fn region(&self) -> Option<CropRegion> {
        self.crop_tool.as_ref().and_then(CropTool::region)
    }

    /// Decode and install a new image.
    ///
    /// Success clears the region and the output lock and recomputes the
    /// layout. Failure reverts the editor to the no-image state instead of
    /// leaving a half-initialized image behind.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<Size, EditorError> {
        match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                let raster = Raster::new(width, height, rgba.into_raw());
                Ok(self.install_image(raster))
            }
            Err(error) => {
                self.clear_image();
                Err(EditorError::Decode(error.to_string()))
            }
        }
    }

    /// Install an image the host decoded itself.
    pub fn set_image(&mut self, raster: Raster) -> Size {
        self.install_image(raster)
    }

    fn install_image(&mut self, raster: Raster) -> Size {
        let size = raster.size();
        self.image = Some(raster);
        self.output_lock = None;
        for tool in self.tools() {
            tool.reset();
        }
        self.update_layout();
        // The construction-time lock applies to the first image only.
        if let Some(lock) = self.initial_lock.take() {
            self.set_output_lock(Some(lock));
        }
        self.version += 1;
        size
    }

    fn clear_image(&mut self) {
        self.image = None;
        self.surface_size = Size::default();
        self.layout = LayoutReference::default();
        for tool in self.tools() {
            tool.reset();
        }
        self.version += 1;
    }

    /// Re-derive the layout after the hosting surface changed.
    ///
    /// `container` is the available on-screen area, `offset` the surface's
    /// on-screen position. Any existing region is re-clamped.
    pub fn surface_resized(&mut self, container: Size, offset: SurfacePosition) {
        self.container = container;
        self.layout.x = offset.x;
        self.layout.y = offset.y;
        self.update_layout();
    }

    fn update_layout(&mut self) {
        let Some(image) = self.image.as_ref().map(Raster::size) else {
            return;
        };
        self.surface_size = effective_size(self.container, image);
        self.layout.ratio = compute_ratio(self.surface_size, image);

        let ratio = self.layout.ratio;
        for tool in self.tools() {
            tool.update_geometry(image, ratio);
        }
        self.version += 1;
    }

    fn tools(&mut self) -> impl Iterator<Item = &mut dyn EditorTool> {
        self.crop_tool
            .iter_mut()
            .map(|tool| tool as &mut dyn EditorTool)
            .chain(
                self.scale_tool
                    .iter_mut()
                    .map(|tool| tool as &mut dyn EditorTool),
            )
    }

    /// Feed one normalized pointer event through the active tools.
    ///
    /// Returns a cursor hint when idle hovering produced one. Events are
    /// ignored until an image is loaded.
    pub fn pointer_event(&mut self, event: PointerEvent) -> Option<CursorHint> {
        if self.image.is_none() {
            return None;
        }

        self.last_touch = event.is_touch;
        let tool_event = ToolPointerEvent {
            kind: event.kind,
            position: self.layout.to_image_space(event.surface_position),
            is_touch: event.is_touch,
        };

        let mut cursor = None;
        let mut changed = false;
        for tool in self.tools() {
            let response = tool.pointer_event(tool_event);
            cursor = cursor.or(response.cursor);
            changed |= response.region_changed;
        }
        if changed {
            self.version += 1;
        }
        cursor
    }

    /// Set or clear the locked output size.
    ///
    /// The lock is clamped into `[MIN_SIZE, image dimension]` per axis; an
    /// existing region is re-fit to the lock's aspect ratio. Returns the
    /// re-fit region, or `None` when the lock was cleared or no region
    /// exists yet.
    pub fn set_output_lock(&mut self, size: Option<Size>) -> Option<CropRegion> {
        let image = self.image.as_ref().map(Raster::size)?;

        self.version += 1;
        match size {
            Some(requested) => {
                let lock = OutputLock::clamped(requested, image);
                self.output_lock = Some(lock);

                let region = self.region()?;
                let refit = lock.refit_region(region, image);
                if let Some(tool) = self.crop_tool.as_mut() {
                    tool.set_region(Some(refit));
                }
                Some(refit)
            }
            None => {
                self.output_lock = None;
                None
            }
        }
    }

    pub fn output_lock(&self) -> Option<Size> {
        self.output_lock.map(|lock| lock.size())
    }

    /// Clear the region and any in-flight gesture; the image stays loaded.
    pub fn reset(&mut self) {
        for tool in self.tools() {
            tool.reset();
        }
        self.version += 1;
    }

    /// Immutable projection of the current edition state.
    pub fn snapshot(&self) -> EditionSnapshot {
        EditionSnapshot {
            region: self.region().map(|region| region.to_cardinal()),
            ratio: self.layout.ratio,
            output_lock: self.output_lock(),
            image_size: self.image_size(),
            surface_size: self.surface_size,
            version: self.version,
        }
    }

    /// Overlay display list for the current state.
    pub fn scene(&self) -> Vec<DrawCommand> {
        let image = self.image_size().unwrap_or_default();
        match self.crop_tool.as_ref() {
            Some(tool) => build_scene(
                tool.region(),
                tool.handles(),
                image,
                self.layout.ratio,
                self.last_touch,
            ),
            None => build_scene(
                None,
                &Default::default(),
                image,
                self.layout.ratio,
                self.last_touch,
            ),
        }
    }

    /// Materialize the current edition as an encoded image.
    ///
    /// Returns `Ok(None)` when CROP is active but no region has been drawn
    /// yet: a routine precondition, not a fault. Calling without an image
    /// loaded is an error. The pipeline runs on a copy of the image raster;
    /// the editing state is never touched.
    pub fn apply(
        &self,
        format: OutputFormat,
        quality: Option<u8>,
    ) -> Result<Option<EncodedImage>, EditorError> {
        let Some(image) = self.image.as_ref() else {
            return Err(EditorError::NoImage);
        };

        let mut pipeline = Pipeline::from_raster(image.clone())?;

        if self.mode.contains(EditorMode::CROP) {
            let Some(region) = self.region() else {
                return Ok(None);
            };
            pipeline = pipeline.crop(region.as_area())?;
        }

        if self.mode.contains(EditorMode::SCALE) {
            if let Some(lock) = self.output_lock {
                pipeline = pipeline.scale(lock.size())?;
            }
        }

        Ok(Some(pipeline.encode(format, quality)?))
    }
}
