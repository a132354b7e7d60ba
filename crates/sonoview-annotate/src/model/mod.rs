//! Geometric shape model for annotations and measurements.
//!
//! Every shape is a [`Shape`] value tagged with a closed [`ShapeKind`].
//! Kind-specific behaviour (point limits, measurements, outline geometry,
//! label placement, colour) lives in a static [`KindSpec`] table of pure
//! functions, so adding a kind means adding one table row.
//!
//! All coordinates are image pixels.

use serde::{Deserialize, Serialize};
use sonoview_core::UnitScale;
use std::fmt;
use std::str::FromStr;

use crate::render::{RenderData, RenderOptions};

mod angle;
mod ellipse;
mod line;
mod polygon;
mod rectangle;

pub use angle::angle_degrees;
pub use ellipse::{ellipse_axes, ellipse_outline, ramanujan_perimeter};
pub use polygon::{centroid, polyline_length, shoelace_area};
pub use rectangle::corners;

/// A point in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Axis-aligned rectangle as `(x, y, width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding rectangle of a point list, or all zeros below two points.
    pub fn from_points(points: &[Point]) -> Self {
        if points.len() < 2 {
            return Self::default();
        }
        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const CYAN: Rgb = Rgb::new(0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` representation.
    pub fn to_hex(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

/// Tissue classification attached to an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Thrombus,
    Plaque,
    Calcification,
}

impl Classification {
    pub const ALL: [Classification; 3] = [
        Classification::Thrombus,
        Classification::Plaque,
        Classification::Calcification,
    ];

    /// Display colour for shapes carrying this class.
    pub fn color(&self) -> Rgb {
        match self {
            // #FF6B6B
            Classification::Thrombus => Rgb::new(1.0, 0.42, 0.42),
            // #FFD93D
            Classification::Plaque => Rgb::new(1.0, 0.85, 0.24),
            // #6BCBFF
            Classification::Calcification => Rgb::new(0.42, 0.80, 1.0),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Thrombus => write!(f, "Thrombus"),
            Classification::Plaque => write!(f, "Plaque"),
            Classification::Calcification => write!(f, "Calcification"),
        }
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "thrombus" => Ok(Classification::Thrombus),
            "plaque" => Ok(Classification::Plaque),
            "calcification" => Ok(Classification::Calcification),
            _ => Err(format!("Unknown classification: {}", s)),
        }
    }
}

/// Kind of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Rectangle,
    Polygon,
    Distance,
    Angle,
    Area,
    Perimeter,
    Ellipse,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Line,
        ShapeKind::Rectangle,
        ShapeKind::Polygon,
        ShapeKind::Distance,
        ShapeKind::Angle,
        ShapeKind::Area,
        ShapeKind::Perimeter,
        ShapeKind::Ellipse,
    ];

    /// Behaviour table row for this kind.
    pub fn spec(self) -> &'static KindSpec {
        &KIND_SPECS[self as usize]
    }

    /// Lowercase identifier used in files and tool names.
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Distance => "distance",
            ShapeKind::Angle => "angle",
            ShapeKind::Area => "area",
            ShapeKind::Perimeter => "perimeter",
            ShapeKind::Ellipse => "ellipse",
        }
    }

    /// Parse a current identifier. Legacy names are handled by the file loader.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }

    /// Geometry for an in-progress shape of this kind (never closed).
    pub fn preview_segments(self, points: &[Point], options: &RenderOptions) -> Vec<Segment> {
        let spec = self.spec();
        let mut segments = (spec.outline)(points, options, false);
        if points.len() >= 2 {
            segments.extend((spec.decorations)(points));
        }
        segments
    }

    /// Whether this kind is a measurement (as opposed to a plain annotation).
    pub fn is_measurement(self) -> bool {
        !matches!(
            self,
            ShapeKind::Line | ShapeKind::Rectangle | ShapeKind::Polygon
        )
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spec().name)
    }
}

/// How a kind is built from pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStyle {
    /// Press, drag, release.
    Drag,
    /// Click per vertex, double-click to finish.
    MultiClick,
    /// Click per vertex, completes at `max_points`.
    FixedCount,
}

/// A typed measured quantity in image pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    /// Length in pixels.
    Length(f64),
    /// Area in square pixels.
    Area(f64),
    /// Angle in degrees.
    Angle(f64),
    Count(usize),
}

impl Quantity {
    /// Format against a unit scale.
    pub fn format(&self, scale: &UnitScale) -> String {
        match *self {
            Quantity::Length(px) => scale.format_length(px),
            Quantity::Area(px2) => scale.format_area(px2),
            Quantity::Angle(deg) => sonoview_core::format_angle(deg),
            Quantity::Count(n) => n.to_string(),
        }
    }

    /// Raw numeric value.
    pub fn value(&self) -> f64 {
        match *self {
            Quantity::Length(v) | Quantity::Area(v) | Quantity::Angle(v) => v,
            Quantity::Count(n) => n as f64,
        }
    }
}

/// A named measurement of a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub name: &'static str,
    pub quantity: Quantity,
}

impl Measurement {
    pub fn new(name: &'static str, quantity: Quantity) -> Self {
        Self { name, quantity }
    }

    pub fn format(&self, scale: &UnitScale) -> String {
        self.quantity.format(scale)
    }
}

/// Static per-kind behaviour.
pub struct KindSpec {
    /// Display name.
    pub name: &'static str,
    pub min_points: usize,
    /// Upper bound on points, if any.
    pub max_points: Option<usize>,
    /// Whether the outline joins the last point back to the first.
    pub closed: bool,
    pub tool_style: ToolStyle,
    /// Colour used when no classification is set.
    pub color: Rgb,
    /// Index into `measure` output used for the label.
    pub primary: usize,
    pub measure: fn(&[Point]) -> Vec<Measurement>,
    /// Outline segments; the flag requests the closing edge.
    pub outline: fn(&[Point], &RenderOptions, bool) -> Vec<Segment>,
    /// Drawn in addition to the outline but never hit-tested.
    pub decorations: fn(&[Point]) -> Vec<Segment>,
    pub bounds: fn(&[Point]) -> Rect,
    pub label_anchor: fn(&[Point], &RenderOptions) -> Point,
}

fn no_decorations(_: &[Point]) -> Vec<Segment> {
    Vec::new()
}

fn bounds_center(points: &[Point], _: &RenderOptions) -> Point {
    Rect::from_points(points).center()
}

static KIND_SPECS: [KindSpec; 8] = [
    KindSpec {
        name: "Line",
        min_points: 2,
        max_points: Some(2),
        closed: false,
        tool_style: ToolStyle::Drag,
        color: Rgb::CYAN,
        primary: 0,
        measure: line::measure_length,
        outline: line::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: bounds_center,
    },
    KindSpec {
        name: "Rectangle",
        min_points: 2,
        max_points: Some(2),
        closed: true,
        tool_style: ToolStyle::Drag,
        color: Rgb::CYAN,
        primary: 2,
        measure: rectangle::measure,
        outline: rectangle::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: bounds_center,
    },
    KindSpec {
        name: "Polygon",
        min_points: 3,
        max_points: None,
        closed: true,
        tool_style: ToolStyle::MultiClick,
        color: Rgb::CYAN,
        primary: 0,
        measure: polygon::measure_polygon,
        outline: polygon::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: bounds_center,
    },
    KindSpec {
        name: "Distance",
        min_points: 2,
        max_points: Some(2),
        closed: false,
        tool_style: ToolStyle::Drag,
        color: Rgb::new(0.0, 1.0, 0.5),
        primary: 0,
        measure: line::measure_distance,
        outline: line::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: line::raised_midpoint,
    },
    KindSpec {
        name: "Angle",
        min_points: 3,
        max_points: Some(3),
        closed: false,
        tool_style: ToolStyle::FixedCount,
        color: Rgb::new(1.0, 0.65, 0.0),
        primary: 0,
        measure: angle::measure,
        outline: angle::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: angle::label_anchor,
    },
    KindSpec {
        name: "Area",
        min_points: 3,
        max_points: None,
        closed: true,
        tool_style: ToolStyle::MultiClick,
        color: Rgb::new(0.6, 0.4, 1.0),
        primary: 0,
        measure: polygon::measure_area,
        outline: polygon::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: polygon::centroid_anchor,
    },
    KindSpec {
        name: "Perimeter",
        min_points: 2,
        max_points: None,
        closed: false,
        tool_style: ToolStyle::MultiClick,
        color: Rgb::new(1.0, 0.8, 0.2),
        primary: 0,
        measure: polygon::measure_perimeter,
        outline: polygon::outline,
        decorations: no_decorations,
        bounds: Rect::from_points,
        label_anchor: polygon::raised_middle_vertex,
    },
    KindSpec {
        name: "Ellipse",
        min_points: 2,
        max_points: Some(2),
        closed: true,
        tool_style: ToolStyle::Drag,
        color: Rgb::new(1.0, 0.5, 0.8),
        primary: 2,
        measure: ellipse::measure,
        outline: ellipse::outline,
        decorations: ellipse::axis_lines,
        bounds: ellipse::bounds,
        label_anchor: ellipse::label_anchor,
    },
];

/// Identifier of a shape within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates monotonically increasing shape ids for one session.
#[derive(Debug, Clone)]
pub struct ShapeFactory {
    next_id: u64,
}

impl ShapeFactory {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Create an empty, incomplete shape with a fresh id.
    pub fn create(&mut self, kind: ShapeKind) -> Shape {
        let id = ShapeId(self.next_id);
        self.next_id += 1;
        Shape::with_id(id, kind)
    }

    /// Id the next created shape will get.
    pub fn peek_next(&self) -> ShapeId {
        ShapeId(self.next_id)
    }

    /// Ensure future ids are greater than `id`.
    pub fn advance_past(&mut self, id: ShapeId) {
        self.next_id = self.next_id.max(id.0.saturating_add(1));
    }
}

impl Default for ShapeFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// A drawn annotation or measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    id: ShapeId,
    kind: ShapeKind,
    points: Vec<Point>,
    completed: bool,
    visible: bool,
    selected: bool,
    color: Rgb,
    classification: Option<Classification>,
}

impl Shape {
    /// Shape with an explicit id. Prefer [`ShapeFactory::create`].
    pub fn with_id(id: ShapeId, kind: ShapeKind) -> Self {
        Self {
            id,
            kind,
            points: Vec::new(),
            completed: false,
            visible: true,
            selected: false,
            color: kind.spec().color,
            classification: None,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    /// Set or clear the classification; the colour follows it.
    pub fn set_classification(&mut self, classification: Option<Classification>) {
        self.classification = classification;
        self.color = classification
            .map(|c| c.color())
            .unwrap_or(self.kind.spec().color);
    }

    /// Append a point.
    ///
    /// Returns false once completed or when the kind's point limit is reached.
    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        if self.completed {
            return false;
        }
        if let Some(max) = self.kind.spec().max_points {
            if self.points.len() >= max {
                return false;
            }
        }
        self.points.push(Point::new(x, y));
        true
    }

    /// Move the most recent point. Used while dragging.
    pub fn update_last_point(&mut self, x: f64, y: f64) -> bool {
        if self.completed {
            return false;
        }
        match self.points.last_mut() {
            Some(last) => {
                *last = Point::new(x, y);
                true
            }
            None => false,
        }
    }

    /// Mark the shape complete if it has enough points.
    pub fn complete(&mut self) -> bool {
        if self.completed || self.points.len() < self.kind.spec().min_points {
            return false;
        }
        self.completed = true;
        true
    }

    /// Whether the shape has enough points to complete.
    pub fn has_min_points(&self) -> bool {
        self.points.len() >= self.kind.spec().min_points
    }

    /// Named measurements. Zero-valued below the minimum point count.
    pub fn measurements(&self) -> Vec<Measurement> {
        (self.kind.spec().measure)(&self.points)
    }

    /// Measurement shown on the label.
    pub fn primary_measurement(&self) -> Option<Measurement> {
        self.measurements().get(self.kind.spec().primary).copied()
    }

    pub fn bounding_rect(&self) -> Rect {
        (self.kind.spec().bounds)(&self.points)
    }

    /// Segments used for hit testing.
    pub fn outline(&self, options: &RenderOptions) -> Vec<Segment> {
        let spec = self.kind.spec();
        (spec.outline)(&self.points, options, spec.closed && self.completed)
    }

    /// Line geometry for the renderer: outline plus decorations.
    pub fn render_data(&self, options: &RenderOptions) -> RenderData {
        let mut segments = self.outline(options);
        if self.points.len() >= 2 {
            segments.extend((self.kind.spec().decorations)(&self.points));
        }
        RenderData::new(segments, self.color)
    }

    pub fn label_position(&self) -> Point {
        self.label_position_with(&RenderOptions::default())
    }

    pub fn label_position_with(&self, options: &RenderOptions) -> Point {
        (self.kind.spec().label_anchor)(&self.points, options)
    }

    pub fn label_text(&self, scale: &UnitScale) -> String {
        self.primary_measurement()
            .map(|m| m.format(scale))
            .unwrap_or_default()
    }

    /// Name for list panels, e.g. `Distance 4`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.kind.spec().name, self.id)
    }
}

/// Rebuild a shape from stored parts. Used by the file loader.
pub(crate) fn restore_shape(
    id: ShapeId,
    kind: ShapeKind,
    points: Vec<Point>,
    visible: bool,
    classification: Option<Classification>,
) -> Shape {
    let mut shape = Shape::with_id(id, kind);
    shape.points = points;
    shape.completed = true;
    shape.visible = visible;
    shape.set_classification(classification);
    shape
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(kind: ShapeKind, points: &[(f64, f64)]) -> Shape {
        let mut s = ShapeFactory::new().create(kind);
        for &(x, y) in points {
            assert!(s.add_point(x, y));
        }
        s
    }

    #[test]
    fn test_table_is_indexed_by_kind() {
        for kind in ShapeKind::ALL {
            assert_eq!(kind.spec().name.to_lowercase(), kind.as_str());
            assert_eq!(ShapeKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_completed_shape_rejects_edits() {
        let mut s = shape(ShapeKind::Line, &[(0.0, 0.0), (3.0, 4.0)]);
        assert!(s.complete());
        assert!(!s.complete());
        assert!(!s.add_point(1.0, 1.0));
        assert!(!s.update_last_point(9.0, 9.0));
        assert_eq!(s.points()[1], Point::new(3.0, 4.0));
    }

    #[test]
    fn test_max_points() {
        let mut s = shape(ShapeKind::Angle, &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(!s.add_point(2.0, 2.0));
        assert_eq!(s.points().len(), 3);
    }

    #[test]
    fn test_complete_requires_min_points() {
        let mut s = shape(ShapeKind::Polygon, &[(0.0, 0.0), (1.0, 0.0)]);
        assert!(!s.complete());
        assert!(s.add_point(1.0, 1.0));
        assert!(s.complete());
    }

    #[test]
    fn test_update_last_point_on_empty() {
        let mut s = ShapeFactory::new().create(ShapeKind::Line);
        assert!(!s.update_last_point(1.0, 1.0));
    }

    #[test]
    fn test_factory_ids_are_monotonic() {
        let mut factory = ShapeFactory::new();
        let a = factory.create(ShapeKind::Line);
        let b = factory.create(ShapeKind::Angle);
        assert!(b.id() > a.id());
        factory.advance_past(ShapeId(40));
        assert_eq!(factory.create(ShapeKind::Line).id(), ShapeId(41));
        factory.advance_past(ShapeId(3));
        assert_eq!(factory.peek_next(), ShapeId(42));
    }

    #[test]
    fn test_classification_sets_color() {
        let mut s = shape(ShapeKind::Polygon, &[]);
        assert_eq!(s.color(), Rgb::CYAN);
        s.set_classification(Some(Classification::Plaque));
        assert_eq!(s.color().to_hex(), "#FFD93D");
        s.set_classification(None);
        assert_eq!(s.color(), Rgb::CYAN);
    }

    #[test]
    fn test_hex() {
        assert_eq!(Classification::Thrombus.color().to_hex(), "#FF6B6B");
        assert_eq!(Classification::Calcification.color().to_hex(), "#6BCBFF");
        assert_eq!(Rgb::CYAN.to_hex(), "#00FFFF");
    }

    #[test]
    fn test_display_name_and_label() {
        let mut s = shape(ShapeKind::Distance, &[(0.0, 0.0), (3.0, 4.0)]);
        s.complete();
        assert_eq!(s.display_name(), format!("Distance {}", s.id()));
        assert_eq!(s.label_text(&UnitScale::pixels()), "5.0 px");
        assert_eq!(s.label_text(&UnitScale::new(Some(2.0))), "10.00 mm");
    }

    #[test]
    fn test_rectangle_label_is_area() {
        let s = shape(ShapeKind::Rectangle, &[(0.0, 0.0), (10.0, 5.0)]);
        assert_eq!(s.label_text(&UnitScale::pixels()), "50 px²");
    }

    #[test]
    fn test_bounding_rect_below_two_points() {
        let s = shape(ShapeKind::Line, &[(5.0, 5.0)]);
        assert_eq!(s.bounding_rect(), Rect::default());
    }

    #[test]
    fn test_measurement_kinds() {
        assert!(!ShapeKind::Line.is_measurement());
        assert!(ShapeKind::Angle.is_measurement());
    }
}
