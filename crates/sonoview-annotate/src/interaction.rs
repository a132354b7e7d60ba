//! Pointer interaction state machine.
//!
//! [`InteractionController`] turns pointer input in screen coordinates into
//! shapes in image coordinates. It owns the session's shapes, id factory
//! and coordinate converter, and reports everything it does as a queue of
//! [`AnnotationEvent`]s.
//!
//! Tools come in four styles:
//! - **Drag** (Line, Rectangle, Distance, Ellipse): press, drag, release.
//! - **Multi-click** (Polygon, Area, Perimeter): click per vertex,
//!   double-click to finish.
//! - **Fixed-count** (Angle): the third click completes the shape.
//! - **View** (Pan, WindowLevel): drags emit deltas and create no shapes.

use sonoview_core::{Error, Result, ToolError};
use sonoview_settings::Config;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::events::{AnnotationEvent, Delta};
use crate::model::{Point, Shape, ShapeFactory, ShapeId, ShapeKind, ToolStyle};
use crate::render::{RenderOptions, Scene};
use crate::shape_store::ShapeStore;
use crate::viewport::{CoordinateConverter, TransformGate};
use sonoview_core::constants::{HIT_TOLERANCE_PX, PAN_SENSITIVITY, WINDOW_LEVEL_SENSITIVITY};

/// Interaction tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Line,
    Rectangle,
    Distance,
    Ellipse,
    Polygon,
    Area,
    Perimeter,
    Angle,
    Pan,
    WindowLevel,
}

impl Tool {
    /// Shape kind drawn by this tool, or `None` for view tools.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Line => Some(ShapeKind::Line),
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Distance => Some(ShapeKind::Distance),
            Tool::Ellipse => Some(ShapeKind::Ellipse),
            Tool::Polygon => Some(ShapeKind::Polygon),
            Tool::Area => Some(ShapeKind::Area),
            Tool::Perimeter => Some(ShapeKind::Perimeter),
            Tool::Angle => Some(ShapeKind::Angle),
            Tool::Pan | Tool::WindowLevel => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self.shape_kind() {
            Some(kind) => kind.as_str(),
            None if self == Tool::Pan => "pan",
            None => "wl",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = ToolError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "pan" => Ok(Tool::Pan),
            "wl" | "window_level" | "windowlevel" => Ok(Tool::WindowLevel),
            other => match ShapeKind::from_name(other) {
                Some(ShapeKind::Line) => Ok(Tool::Line),
                Some(ShapeKind::Rectangle) => Ok(Tool::Rectangle),
                Some(ShapeKind::Polygon) => Ok(Tool::Polygon),
                Some(ShapeKind::Distance) => Ok(Tool::Distance),
                Some(ShapeKind::Angle) => Ok(Tool::Angle),
                Some(ShapeKind::Area) => Ok(Tool::Area),
                Some(ShapeKind::Perimeter) => Ok(Tool::Perimeter),
                Some(ShapeKind::Ellipse) => Ok(Tool::Ellipse),
                None => Err(ToolError::Unknown {
                    name: s.to_string(),
                }),
            },
        }
    }
}

/// Owns the shapes of one image session and drives them from pointer input.
#[derive(Debug)]
pub struct InteractionController {
    converter: CoordinateConverter,
    pub(crate) store: ShapeStore,
    factory: ShapeFactory,
    active_tool: Option<Tool>,
    /// Shape being drawn by the active shape tool.
    in_progress: Option<Shape>,
    /// Last cursor position in image pixels, for multi-click previews.
    cursor: Option<Point>,
    /// Screen position of the last pan/window-level sample.
    drag_anchor: Option<Point>,
    events: VecDeque<AnnotationEvent>,
    pub(crate) selected: Option<ShapeId>,
    pub(crate) options: RenderOptions,
    pub(crate) hit_tolerance_px: f64,
    window_level_sensitivity: f64,
    pan_sensitivity: f64,
}

impl InteractionController {
    pub fn new(converter: CoordinateConverter) -> Self {
        Self {
            converter,
            store: ShapeStore::new(),
            factory: ShapeFactory::new(),
            active_tool: None,
            in_progress: None,
            cursor: None,
            drag_anchor: None,
            events: VecDeque::new(),
            selected: None,
            options: RenderOptions::default(),
            hit_tolerance_px: HIT_TOLERANCE_PX,
            window_level_sensitivity: WINDOW_LEVEL_SENSITIVITY,
            pan_sensitivity: PAN_SENSITIVITY,
        }
    }

    /// Applies tolerances, sensitivities, render options and gate precision.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.hit_tolerance_px = config.interaction.hit_tolerance_px;
        self.window_level_sensitivity = config.interaction.window_level_sensitivity;
        self.pan_sensitivity = config.interaction.pan_sensitivity;
        self.options = RenderOptions::from_settings(&config.rendering);
        self.converter = self
            .converter
            .with_gate(TransformGate::new(config.transform.gate_decimals));
        self
    }

    pub fn converter(&self) -> &CoordinateConverter {
        &self.converter
    }

    /// Mutable access for viewport resizes and live transforms.
    pub fn converter_mut(&mut self) -> &mut CoordinateConverter {
        &mut self.converter
    }

    pub fn shapes(&self) -> &ShapeStore {
        &self.store
    }

    pub fn factory(&self) -> &ShapeFactory {
        &self.factory
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.active_tool
    }

    /// Whether a shape is currently being drawn.
    pub fn is_drawing(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Switches tool, discarding any in-progress work.
    pub fn set_active_tool(&mut self, tool: Option<Tool>) {
        tracing::debug!(
            "Tool {} -> {}",
            tool_label(self.active_tool),
            tool_label(tool)
        );
        self.abort_in_progress();
        self.active_tool = tool;
        self.events.push_back(AnnotationEvent::PreviewCleared);
    }

    /// Switches tool by name. `"none"` deselects.
    ///
    /// Unknown names are rejected and the tool is left unchanged.
    pub fn select_tool(&mut self, name: &str) -> Result<()> {
        if name.trim().eq_ignore_ascii_case("none") {
            self.set_active_tool(None);
            return Ok(());
        }
        let tool = name.parse::<Tool>().map_err(Error::from)?;
        self.set_active_tool(Some(tool));
        Ok(())
    }

    /// Discards in-progress work.
    pub fn cancel(&mut self) {
        tracing::debug!("Cancel");
        self.abort_in_progress();
        self.events.push_back(AnnotationEvent::PreviewCleared);
    }

    /// Updates the pixel spacing used for labels; every stored shape changes.
    pub fn set_pixel_spacing(&mut self, mm_per_pixel: Option<f64>) {
        self.converter.set_pixel_spacing(mm_per_pixel);
        tracing::info!("Pixel spacing set to {}", self.converter.units());
        let ids: Vec<ShapeId> = self.store.draw_order_iter().collect();
        self.events
            .extend(ids.into_iter().map(|id| AnnotationEvent::ShapeChanged { id }));
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        let Some(tool) = self.active_tool else {
            return;
        };
        let Some(kind) = tool.shape_kind() else {
            self.drag_anchor = Some(Point::new(x, y));
            return;
        };
        let p = self.converter.screen_to_image(x, y);

        match kind.spec().tool_style {
            ToolStyle::Drag => {
                if self.in_progress.is_some() {
                    tracing::debug!("Discarding unfinished drag");
                }
                let mut shape = self.factory.create(kind);
                shape.add_point(p.x, p.y);
                shape.add_point(p.x, p.y);
                tracing::debug!("Drag start {} at ({:.1}, {:.1})", kind, p.x, p.y);
                self.emit_preview(tool, shape.points().to_vec());
                self.in_progress = Some(shape);
            }
            ToolStyle::MultiClick | ToolStyle::FixedCount => {
                let shape = self
                    .in_progress
                    .get_or_insert_with(|| self.factory.create(kind));
                shape.add_point(p.x, p.y);
                let count = shape.points().len();
                tracing::debug!("{} vertex {} at ({:.1}, {:.1})", kind, count, p.x, p.y);

                let full = kind.spec().max_points.is_some_and(|max| count >= max);
                if kind.spec().tool_style == ToolStyle::FixedCount && full {
                    self.finish_in_progress();
                } else {
                    let points = shape.points().to_vec();
                    self.emit_preview(tool, points);
                }
            }
        }
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let Some(tool) = self.active_tool else {
            return;
        };

        match tool {
            Tool::Pan | Tool::WindowLevel => {
                let Some(anchor) = self.drag_anchor else {
                    return;
                };
                self.drag_anchor = Some(Point::new(x, y));
                let (dx, dy) = (x - anchor.x, y - anchor.y);
                let delta = if tool == Tool::Pan {
                    Delta::Pan {
                        dx: dx * self.pan_sensitivity,
                        dy: dy * self.pan_sensitivity,
                    }
                } else {
                    Delta::WindowLevel {
                        window: dx * self.window_level_sensitivity,
                        level: -dy * self.window_level_sensitivity,
                    }
                };
                self.events.push_back(AnnotationEvent::DeltaEmitted(delta));
            }
            _ => {
                let p = self.converter.screen_to_image(x, y);
                let Some(shape) = self.in_progress.as_mut() else {
                    return;
                };
                if shape.kind().spec().tool_style == ToolStyle::Drag {
                    shape.update_last_point(p.x, p.y);
                    let points = shape.points().to_vec();
                    self.emit_preview(tool, points);
                } else {
                    self.cursor = Some(p);
                    let mut points = shape.points().to_vec();
                    points.push(p);
                    self.emit_preview(tool, points);
                }
            }
        }
    }

    pub fn pointer_up(&mut self, _x: f64, _y: f64) {
        match self.active_tool {
            Some(Tool::Pan | Tool::WindowLevel) => {
                self.drag_anchor = None;
            }
            Some(_) => {
                let dragging = self
                    .in_progress
                    .as_ref()
                    .is_some_and(|s| s.kind().spec().tool_style == ToolStyle::Drag);
                if dragging {
                    self.finish_in_progress();
                }
            }
            None => {}
        }
    }

    /// Finishes a multi-click shape if it has enough vertices.
    pub fn double_click(&mut self, _x: f64, _y: f64) {
        let ready = self.in_progress.as_ref().is_some_and(|s| {
            s.kind().spec().tool_style == ToolStyle::MultiClick && s.has_min_points()
        });
        if ready {
            self.finish_in_progress();
        } else {
            tracing::debug!("Double-click ignored");
        }
    }

    /// Deletes a stored shape.
    pub fn delete(&mut self, id: ShapeId) -> bool {
        let Some(shape) = self.store.remove(id) else {
            return false;
        };
        tracing::info!("Deleted {}", shape.display_name());
        if self.selected == Some(id) {
            self.selected = None;
            self.events
                .push_back(AnnotationEvent::SelectionChanged { id: None });
        }
        self.events.push_back(AnnotationEvent::ShapeRemoved { id });
        true
    }

    /// Removes every shape and any in-progress work.
    pub fn clear_all(&mut self) {
        self.abort_in_progress();
        let removed = self.store.clear();
        tracing::info!("Cleared {} shapes", removed);
        if self.selected.take().is_some() {
            self.events
                .push_back(AnnotationEvent::SelectionChanged { id: None });
        }
        self.events.push_back(AnnotationEvent::ShapesCleared);
        self.events.push_back(AnnotationEvent::PreviewCleared);
    }

    /// Takes all queued events in order.
    pub fn drain_events(&mut self) -> Vec<AnnotationEvent> {
        self.events.drain(..).collect()
    }

    /// Current preview geometry in image pixels.
    pub fn preview(&self) -> Option<(ShapeKind, Vec<Point>)> {
        let shape = self.in_progress.as_ref()?;
        let mut points = shape.points().to_vec();
        if shape.kind().spec().tool_style != ToolStyle::Drag {
            points.extend(self.cursor);
        }
        Some((shape.kind(), points))
    }

    /// Builds the render scene for the current frame.
    pub fn scene(&self) -> Scene {
        let preview = self.preview();
        Scene::build(
            self.store.iter(),
            preview.as_ref().map(|(kind, pts)| (*kind, pts.as_slice())),
            &self.converter,
            &self.options,
        )
    }

    /// Stores shapes loaded from a file, keeping their ids.
    pub fn restore_shapes(&mut self, shapes: Vec<Shape>) -> usize {
        let mut restored = 0;
        for shape in shapes {
            let id = shape.id();
            if self.store.insert(shape) {
                self.factory.advance_past(id);
                self.events.push_back(AnnotationEvent::ShapeChanged { id });
                restored += 1;
            }
        }
        restored
    }

    pub(crate) fn push_event(&mut self, event: AnnotationEvent) {
        self.events.push_back(event);
    }

    fn emit_preview(&mut self, tool: Tool, points: Vec<Point>) {
        self.events
            .push_back(AnnotationEvent::PreviewUpdated { tool, points });
    }

    fn finish_in_progress(&mut self) {
        let Some(mut shape) = self.in_progress.take() else {
            return;
        };
        self.cursor = None;
        if shape.complete() {
            tracing::info!("Committed {}", shape.display_name());
            self.events.push_back(AnnotationEvent::ShapeCommitted {
                shape: shape.clone(),
            });
            self.store.insert(shape);
        }
        self.events.push_back(AnnotationEvent::PreviewCleared);
    }

    fn abort_in_progress(&mut self) {
        if let Some(shape) = self.in_progress.take() {
            tracing::debug!("Discarded unfinished {}", shape.kind());
        }
        self.cursor = None;
        self.drag_anchor = None;
    }
}

fn tool_label(tool: Option<Tool>) -> &'static str {
    tool.map_or("none", Tool::name)
}
