//! Layer panel view and per-shape operations.
//!
//! The layer panel lists every stored shape (visible or hidden) in draw
//! order and lets the user hide, classify and select them. These
//! operations live on [`InteractionController`] because it owns the shapes
//! and the event queue.

use serde::Serialize;
use sonoview_core::UnitScale;

use crate::events::AnnotationEvent;
use crate::hit_test;
use crate::interaction::InteractionController;
use crate::model::{Classification, Shape, ShapeId, ShapeKind};

/// One formatted measurement row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    pub name: String,
    pub value: String,
}

/// A shape as shown in the layer panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerEntry {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub name: String,
    pub measurements: Vec<MeasurementRow>,
    /// All measurements on one line, e.g. `Width: 4.0 px, Height: 2.0 px`.
    pub summary: String,
    pub visible: bool,
    pub selected: bool,
    pub classification: Option<Classification>,
    pub color_hex: String,
}

impl LayerEntry {
    /// Builds the panel row for a shape.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape to describe
    /// * `units` - Unit scale used to format measurements
    pub fn from_shape(shape: &Shape, units: &UnitScale) -> Self {
        let measurements: Vec<MeasurementRow> = shape
            .measurements()
            .iter()
            .map(|m| MeasurementRow {
                name: m.name.to_string(),
                value: m.format(units),
            })
            .collect();
        let summary = measurements
            .iter()
            .map(|m| format!("{}: {}", m.name, m.value))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: shape.id(),
            kind: shape.kind(),
            name: shape.display_name(),
            measurements,
            summary,
            visible: shape.is_visible(),
            selected: shape.is_selected(),
            classification: shape.classification(),
            color_hex: shape.color().to_hex(),
        }
    }
}

impl InteractionController {
    /// Panel rows for every stored shape, in draw order.
    pub fn layer_entries(&self) -> Vec<LayerEntry> {
        let units = self.converter().units();
        self.store
            .iter()
            .map(|shape| LayerEntry::from_shape(shape, units))
            .collect()
    }

    /// Shows or hides one shape.
    ///
    /// # Returns
    ///
    /// `true` if the shape exists and its visibility changed.
    pub fn set_visibility(&mut self, id: ShapeId, visible: bool) -> bool {
        let Some(shape) = self.store.get_mut(id) else {
            return false;
        };
        if shape.is_visible() == visible {
            return false;
        }
        shape.set_visible(visible);
        tracing::debug!("Shape {} visible={}", id, visible);
        self.push_event(AnnotationEvent::ShapeChanged { id });
        true
    }

    /// Hides every shape if any is visible, otherwise shows them all.
    ///
    /// # Returns
    ///
    /// The visibility now applied to all shapes.
    pub fn toggle_all_visibility(&mut self) -> bool {
        let visible = !self.store.iter().any(Shape::is_visible);
        let ids: Vec<ShapeId> = self.store.draw_order_iter().collect();
        for id in ids {
            self.set_visibility(id, visible);
        }
        visible
    }

    /// Sets or clears a shape's classification. The colour follows it.
    pub fn set_classification(
        &mut self,
        id: ShapeId,
        classification: Option<Classification>,
    ) -> bool {
        let Some(shape) = self.store.get_mut(id) else {
            return false;
        };
        shape.set_classification(classification);
        tracing::debug!(
            "Shape {} classified as {}",
            id,
            classification.map_or("none".to_string(), |c| c.to_string())
        );
        self.push_event(AnnotationEvent::ShapeChanged { id });
        true
    }

    /// Currently selected shape.
    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    /// Selects a shape by id, or clears the selection with `None`.
    ///
    /// # Returns
    ///
    /// `true` if the selection changed.
    pub fn select(&mut self, id: Option<ShapeId>) -> bool {
        let id = id.filter(|id| self.store.contains(*id));
        if id == self.selected {
            return false;
        }
        for shape in self.store.iter_mut() {
            shape.set_selected(Some(shape.id()) == id);
        }
        self.selected = id;
        self.push_event(AnnotationEvent::SelectionChanged { id });
        true
    }

    /// Selects the topmost visible shape under a screen point.
    ///
    /// The configured hit tolerance (screen pixels) is converted to image
    /// pixels first. Clicking empty space clears the selection.
    pub fn select_at(&mut self, x: f64, y: f64) -> Option<ShapeId> {
        let point = self.converter().screen_to_image(x, y);
        let tolerance = self.converter().tolerance_to_image(self.hit_tolerance_px);
        let hit = hit_test::topmost_at_with(&self.store, point, tolerance, &self.options);
        self.select(hit);
        hit
    }
}
