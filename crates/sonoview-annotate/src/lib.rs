//! # SonoView Annotate
//!
//! Annotation and measurement geometry for the SonoView image viewer.
//!
//! ## Core Components
//!
//! - **Model**: Shape kinds (lines, rectangles, polygons, distances, angles,
//!   areas, perimeters and ellipses), their measurements, outlines and labels
//! - **Viewport**: Screen/image coordinate conversion, either aspect-fit or
//!   through a live view-projection transform
//! - **Interaction**: Tool selection and the pointer-driven drawing state machine
//! - **Hit testing**: Picking the topmost shape under the cursor
//! - **Layers**: Read-only list of annotations with their measurements
//! - **Render**: Line batches and labels for the display layer
//! - **Serialization**: Annotation files, with migration of legacy kind names
//!
//! ## Architecture
//!
//! ```text
//! InteractionController
//!   ├── CoordinateConverter (screen <-> image)
//!   ├── ShapeStore (completed shapes, draw order)
//!   ├── in-progress Shape (preview)
//!   └── AnnotationEvent queue
//!
//! Scene (per frame)
//!   └── LineBatch / Label
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sonoview_annotate::{CoordinateConverter, InteractionController, Tool};
//!
//! let converter = CoordinateConverter::new(512.0, 512.0, 800.0, 600.0);
//! let mut controller = InteractionController::new(converter);
//! controller.set_active_tool(Some(Tool::Distance));
//! controller.pointer_down(100.0, 100.0);
//! controller.pointer_move(300.0, 100.0);
//! controller.pointer_up(300.0, 100.0);
//!
//! for entry in controller.layer_entries() {
//!     println!("{}: {}", entry.name, entry.summary);
//! }
//! ```

pub mod events;
pub mod interaction;
pub mod layers;
pub mod model;
pub mod render;
pub mod serialization;
pub mod shape_store;
pub mod viewport;

pub use events::{AnnotationEvent, Delta, EventCategory};
pub use hit_test::{point_near_shape, point_to_segment_distance, topmost_at};
pub use interaction::{InteractionController, Tool};
pub use layers::{LayerEntry, MeasurementRow};
pub use model::{
    Classification, KindSpec, Measurement, Point, Quantity, Rect, Rgb, Segment, Shape,
    ShapeFactory, ShapeId, ShapeKind, ToolStyle,
};
pub use render::{Label, LineBatch, RenderData, RenderOptions, Scene};
pub use serialization::{migrate_kind, AnnotationFile, ImageInfo, ShapeRecord};
pub use shape_store::ShapeStore;
pub use viewport::{CoordinateConverter, Projection, TransformGate, ViewTransform};
