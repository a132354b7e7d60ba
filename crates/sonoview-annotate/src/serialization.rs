//! Save and load annotation files.
//!
//! Annotation files are pretty-printed JSON holding the image geometry and
//! every completed shape of a session. Files written by older viewers use
//! different kind names; those are migrated on load by [`migrate_kind`].

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::interaction::InteractionController;
use crate::model::{restore_shape, Classification, Point, Shape, ShapeId, ShapeKind};

/// Annotation file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete annotation file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationFile {
    pub version: String,
    pub metadata: AnnotationMetadata,
    pub image: ImageInfo,
    pub shapes: Vec<ShapeRecord>,
}

/// File metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Geometry of the annotated image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub width: f64,
    pub height: f64,
    /// Millimetres per pixel, if calibrated.
    #[serde(default)]
    pub pixel_spacing: Option<f64>,
}

fn default_visible() -> bool {
    true
}

/// Serialized shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub id: u64,
    pub kind: String,
    pub points: Vec<(f64, f64)>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub classification: Option<String>,
}

/// Maps current and legacy kind names to a [`ShapeKind`].
///
/// Legacy names: `freeform`, `circle` and `polyline` were drawn as polygons,
/// `rect` is a rectangle, and measurement kinds may carry a `measure_` prefix.
pub fn migrate_kind(name: &str) -> Option<ShapeKind> {
    let lowered = name.trim().to_lowercase();
    let name = lowered.strip_prefix("measure_").unwrap_or(&lowered);
    match name {
        "freeform" | "circle" | "polyline" => Some(ShapeKind::Polygon),
        "rect" => Some(ShapeKind::Rectangle),
        other => ShapeKind::from_name(other),
    }
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape) -> Self {
        Self {
            id: shape.id().0,
            kind: shape.kind().as_str().to_string(),
            points: shape.points().iter().map(|p| (p.x, p.y)).collect(),
            visible: shape.is_visible(),
            classification: shape.classification().map(|c| c.to_string()),
        }
    }

    /// Rebuilds the shape.
    ///
    /// Returns `Ok(None)` (with a warning) when the point count is invalid
    /// for the kind, and an error for unknown kinds.
    pub fn to_shape(&self) -> Result<Option<Shape>> {
        let Some(kind) = migrate_kind(&self.kind) else {
            anyhow::bail!("Unknown shape type: {}", self.kind);
        };
        if kind.as_str() != self.kind {
            tracing::debug!("Migrated shape kind {} -> {}", self.kind, kind);
        }

        let spec = kind.spec();
        let count = self.points.len();
        if count < spec.min_points || spec.max_points.is_some_and(|max| count > max) {
            tracing::warn!(
                "Skipping {} {}: {} points is invalid for this kind",
                kind,
                self.id,
                count
            );
            return Ok(None);
        }

        let classification = match self.classification.as_deref() {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case("none") => None,
            Some(s) => match s.parse::<Classification>() {
                Ok(c) => Some(c),
                Err(e) => {
                    tracing::warn!("{} on shape {}; leaving it unclassified", e, self.id);
                    None
                }
            },
        };

        let points = self.points.iter().map(|&(x, y)| Point::new(x, y)).collect();
        Ok(Some(restore_shape(
            ShapeId(self.id),
            kind,
            points,
            self.visible,
            classification,
        )))
    }
}

impl AnnotationFile {
    /// Create an empty annotation file
    pub fn new(name: impl Into<String>, image: ImageInfo) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: AnnotationMetadata {
                name: name.into(),
                created: now,
                modified: now,
            },
            image,
            shapes: Vec::new(),
        }
    }

    /// Snapshot of a session. Incomplete shapes are never written.
    pub fn from_shapes<'a, I>(name: impl Into<String>, image: ImageInfo, shapes: I) -> Self
    where
        I: IntoIterator<Item = &'a Shape>,
    {
        let mut file = Self::new(name, image);
        file.shapes = shapes
            .into_iter()
            .filter(|s| s.is_completed())
            .map(ShapeRecord::from_shape)
            .collect();
        file
    }

    /// Snapshot of a controller's shapes and image geometry.
    pub fn from_controller(name: impl Into<String>, controller: &InteractionController) -> Self {
        let converter = controller.converter();
        let (width, height) = converter.image_size();
        let image = ImageInfo {
            width,
            height,
            pixel_spacing: converter.units().mm_per_pixel(),
        };
        Self::from_shapes(name, image, controller.shapes().iter())
    }

    /// Save annotations to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize annotations")?;

        std::fs::write(path.as_ref(), json).context("Failed to write annotation file")?;

        tracing::info!(
            "Saved {} shapes to {}",
            self.shapes.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Load annotations from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .context("Failed to read annotation file")?;

        let mut file: AnnotationFile =
            serde_json::from_str(&content).context("Failed to parse annotation file")?;

        file.metadata.modified = Utc::now();

        tracing::info!(
            "Loaded {} shape records from {}",
            file.shapes.len(),
            path.as_ref().display()
        );
        Ok(file)
    }

    /// Rebuilds all valid shapes, in file order.
    pub fn to_shapes(&self) -> Result<Vec<Shape>> {
        let mut shapes = Vec::with_capacity(self.shapes.len());
        for record in &self.shapes {
            if let Some(shape) = record
                .to_shape()
                .with_context(|| format!("Invalid shape record {}", record.id))?
            {
                shapes.push(shape);
            }
        }
        Ok(shapes)
    }

    /// Replaces the controller's shapes and image geometry with this file's.
    ///
    /// Returns the number of shapes restored. Future ids continue after the
    /// highest loaded id.
    pub fn apply_to(&self, controller: &mut InteractionController) -> Result<usize> {
        let shapes = self.to_shapes()?;
        controller.clear_all();
        let converter = controller.converter_mut();
        converter.set_image_size(self.image.width, self.image.height);
        converter.set_pixel_spacing(self.image.pixel_spacing);
        Ok(controller.restore_shapes(shapes))
    }
}
