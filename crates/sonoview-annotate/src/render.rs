//! Render-side views of the shape model.
//!
//! The engine does not draw. It hands the renderer plain line geometry:
//! per-shape [`RenderData`] and a per-frame [`Scene`] that batches lines by
//! colour and places measurement labels.

use sonoview_core::constants::{ELLIPSE_SEGMENTS, LABEL_OFFSET};
use sonoview_settings::RenderingSettings;

use crate::model::{Point, Rgb, Segment, Shape, ShapeId, ShapeKind};
use crate::viewport::CoordinateConverter;

/// Parameters for generating render geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Segments used to approximate ellipse outlines.
    pub ellipse_segments: usize,
    /// Offset in image pixels used to lift labels off their geometry.
    pub label_offset: f64,
}

impl RenderOptions {
    pub fn from_settings(settings: &RenderingSettings) -> Self {
        Self {
            ellipse_segments: settings.ellipse_segments,
            label_offset: settings.label_offset_px,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            ellipse_segments: ELLIPSE_SEGMENTS,
            label_offset: LABEL_OFFSET,
        }
    }
}

/// Line geometry of a single shape.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderData {
    pub segments: Vec<Segment>,
    pub color: Rgb,
}

impl RenderData {
    pub fn new(segments: Vec<Segment>, color: Rgb) -> Self {
        Self { segments, color }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Vertices and index pairs for one line draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBatch {
    pub color: Rgb,
    /// `[x, y, 0]` in image pixels.
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<[u32; 2]>,
}

impl LineBatch {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn push_segment(&mut self, segment: &Segment) {
        let base = self.vertices.len() as u32;
        self.vertices
            .push([segment.start.x as f32, segment.start.y as f32, 0.0]);
        self.vertices
            .push([segment.end.x as f32, segment.end.y as f32, 0.0]);
        self.indices.push([base, base + 1]);
    }

    pub fn line_count(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A measurement label.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub shape: ShapeId,
    pub text: String,
    /// Anchor in image pixels.
    pub anchor: Point,
    /// Anchor in screen pixels.
    pub screen: Point,
    pub color: Rgb,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// One batch per distinct colour, in first-seen order.
    pub batches: Vec<LineBatch>,
    /// In-progress geometry, drawn in cyan.
    pub preview: Option<LineBatch>,
    pub labels: Vec<Label>,
}

impl Scene {
    /// Builds the scene for the visible shapes and an optional preview.
    pub fn build<'a, I>(
        shapes: I,
        preview: Option<(ShapeKind, &[Point])>,
        converter: &CoordinateConverter,
        options: &RenderOptions,
    ) -> Self
    where
        I: IntoIterator<Item = &'a Shape>,
    {
        let mut scene = Scene::default();

        for shape in shapes.into_iter().filter(|s| s.is_visible()) {
            let data = shape.render_data(options);
            if data.is_empty() {
                continue;
            }
            let batch = scene.batch_for(data.color);
            for segment in &data.segments {
                batch.push_segment(segment);
            }

            if shape.is_completed() {
                let anchor = shape.label_position_with(options);
                scene.labels.push(Label {
                    shape: shape.id(),
                    text: shape.label_text(converter.units()),
                    anchor,
                    screen: converter.image_to_screen(anchor.x, anchor.y),
                    color: shape.color(),
                });
            }
        }

        if let Some((kind, points)) = preview {
            let segments = kind.preview_segments(points, options);
            if !segments.is_empty() {
                let mut batch = LineBatch::new(Rgb::CYAN);
                segments.iter().for_each(|s| batch.push_segment(s));
                scene.preview = Some(batch);
            }
        }

        scene
    }

    fn batch_for(&mut self, color: Rgb) -> &mut LineBatch {
        let index = match self.batches.iter().position(|b| b.color == color) {
            Some(index) => index,
            None => {
                self.batches.push(LineBatch::new(color));
                self.batches.len() - 1
            }
        };
        &mut self.batches[index]
    }

    pub fn line_count(&self) -> usize {
        self.batches.iter().map(LineBatch::line_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, ShapeFactory};

    fn completed(factory: &mut ShapeFactory, kind: ShapeKind, pts: &[(f64, f64)]) -> Shape {
        let mut s = factory.create(kind);
        for &(x, y) in pts {
            s.add_point(x, y);
        }
        assert!(s.complete());
        s
    }

    #[test]
    fn test_batches_group_by_color() {
        let mut f = ShapeFactory::new();
        let a = completed(&mut f, ShapeKind::Line, &[(0.0, 0.0), (1.0, 0.0)]);
        let b = completed(&mut f, ShapeKind::Line, &[(0.0, 1.0), (1.0, 1.0)]);
        let mut c = completed(&mut f, ShapeKind::Rectangle, &[(0.0, 0.0), (2.0, 2.0)]);
        c.set_classification(Some(Classification::Thrombus));

        let conv = CoordinateConverter::new(10.0, 10.0, 10.0, 10.0);
        let scene = Scene::build([&a, &b, &c], None, &conv, &RenderOptions::default());

        assert_eq!(scene.batches.len(), 2);
        assert_eq!(scene.batches[0].line_count(), 2);
        assert_eq!(scene.batches[1].line_count(), 4);
        assert_eq!(scene.labels.len(), 3);
        assert!(scene.preview.is_none());
    }

    #[test]
    fn test_hidden_shapes_are_skipped() {
        let mut f = ShapeFactory::new();
        let mut a = completed(&mut f, ShapeKind::Distance, &[(0.0, 0.0), (3.0, 4.0)]);
        a.set_visible(false);
        let conv = CoordinateConverter::new(10.0, 10.0, 10.0, 10.0);
        let scene = Scene::build([&a], None, &conv, &RenderOptions::default());
        assert!(scene.batches.is_empty());
        assert!(scene.labels.is_empty());
    }

    #[test]
    fn test_ellipse_includes_axes() {
        let mut f = ShapeFactory::new();
        let e = completed(&mut f, ShapeKind::Ellipse, &[(5.0, 5.0), (8.0, 7.0)]);
        let data = e.render_data(&RenderOptions::default());
        assert_eq!(data.segments.len(), 48 + 2);
    }

    #[test]
    fn test_polygon_closes_only_when_completed() {
        let mut f = ShapeFactory::new();
        let mut p = f.create(ShapeKind::Polygon);
        for (x, y) in [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0)] {
            p.add_point(x, y);
        }
        let opts = RenderOptions::default();
        assert_eq!(p.render_data(&opts).segments.len(), 2);
        p.complete();
        assert_eq!(p.render_data(&opts).segments.len(), 3);
    }

    #[test]
    fn test_preview_batch_and_label_screen_anchor() {
        let mut f = ShapeFactory::new();
        let d = completed(&mut f, ShapeKind::Distance, &[(0.0, 50.0), (20.0, 50.0)]);
        let conv = CoordinateConverter::new(100.0, 100.0, 200.0, 200.0);
        let pts = [Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)];
        let scene = Scene::build(
            [&d],
            Some((ShapeKind::Polygon, &pts[..])),
            &conv,
            &RenderOptions::default(),
        );

        let preview = scene.preview.expect("preview batch");
        assert_eq!(preview.color, Rgb::CYAN);
        assert_eq!(preview.line_count(), 2);

        let label = &scene.labels[0];
        assert_eq!(label.text, "20.0 px");
        assert_eq!(label.anchor, Point::new(10.0, 35.0));
        assert_eq!(label.screen, Point::new(20.0, 70.0));
    }
}
