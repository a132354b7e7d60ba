//! # SonoView
//!
//! Annotation and measurement engine for an ultrasound / DICOM image viewer:
//! - Lines, rectangles, polygons and ellipses drawn over the image
//! - Distance, angle, area and perimeter measurements in pixels or millimetres
//! - Coordinate mapping that follows the host view's zoom, pan and rotation
//! - Hit testing, layer listing and classification of annotations
//!
//! ## Architecture
//!
//! SonoView is organized as a workspace with multiple crates:
//!
//! 1. **sonoview-core** - Errors, unit scale, constants, event bus
//! 2. **sonoview-settings** - Engine configuration files
//! 3. **sonoview-annotate** - Shape model, coordinate conversion, interaction,
//!    hit testing, render and layer views, annotation files
//! 4. **sonoview** - Logging setup and the headless replay binary

pub mod replay;

pub use sonoview_annotate as annotate;

pub use sonoview_core::{
    format_angle, BusEvent, ConfigError, Error, EventBus, EventBusConfig, EventFilter, Result,
    SubscriptionId, ToolError, UnitScale,
};

pub use sonoview_settings::{Config, InteractionSettings, RenderingSettings, TransformSettings};

pub use sonoview_annotate::{
    AnnotationEvent, AnnotationFile, Classification, CoordinateConverter, InteractionController,
    LayerEntry, Point, Projection, Scene, Shape, ShapeId, ShapeKind, Tool, ViewTransform,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    // stdout carries the layer listing
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
