//! Coordinate conversion between the viewport (screen) and the image.
//!
//! Shapes are stored in image pixel coordinates so they stay anchored to
//! image content while the host view is zoomed, panned or rotated. Two
//! mappings are supported:
//!
//! - **Baseline**: the image is aspect-fitted and centred in the viewport.
//! - **Live transform**: the host supplies its view and projection
//!   matrices. Screen points are unprojected onto the image plane `z = 0`,
//!   where world coordinates equal image pixel coordinates.
//!
//! Live transforms pass through a [`TransformGate`] so identical matrices
//! arriving every frame do not cause redundant updates.

use glam::{DMat4, DVec3, DVec4};
use sonoview_core::constants::{EPSILON, TRANSFORM_GATE_DECIMALS};
use sonoview_core::UnitScale;
use std::fmt;

use crate::model::Point;

/// Allowed deviation of `inverse · (P · V)` from the identity.
const INVERSE_TOLERANCE: f64 = 1e-6;

/// Camera projection supplied by the host view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Right-handed orthographic projection.
    Orthographic {
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        near: f64,
        far: f64,
    },
    /// Right-handed perspective projection. `fov_y` is in radians.
    Perspective {
        fov_y: f64,
        aspect: f64,
        near: f64,
        far: f64,
    },
}

impl Projection {
    /// Projection matrix with depth mapped to `0..=1`.
    pub fn matrix(&self) -> DMat4 {
        match *self {
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => DMat4::orthographic_rh(left, right, bottom, top, near, far),
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => DMat4::perspective_rh(fov_y, aspect, near, far),
        }
    }

    fn components(&self) -> [f64; 7] {
        match *self {
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => [0.0, left, right, bottom, top, near, far],
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => [1.0, fov_y, aspect, near, far, 0.0, 0.0],
        }
    }
}

/// View and projection of the host camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub view: DMat4,
    pub projection: Projection,
}

impl ViewTransform {
    pub fn new(view: DMat4, projection: Projection) -> Self {
        Self { view, projection }
    }

    /// Combined `P · V`.
    pub fn view_projection(&self) -> DMat4 {
        self.projection.matrix() * self.view
    }
}

/// Lets a transform through only when it differs from the previous one
/// after rounding every component to a fixed number of decimals.
///
/// The gate holds plain data and is `Send`, so a poller on another thread
/// can filter transforms before scheduling work on the UI thread.
#[derive(Debug, Clone)]
pub struct TransformGate {
    decimals: u32,
    last: Option<Vec<i64>>,
}

impl TransformGate {
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals,
            last: None,
        }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Returns true (and remembers the transform) if it changed.
    pub fn admit(&mut self, transform: &ViewTransform) -> bool {
        let key = self.fingerprint(transform);
        if self.last.as_ref() == Some(&key) {
            tracing::trace!("Transform gate: unchanged");
            return false;
        }
        tracing::debug!("Transform gate: changed");
        self.last = Some(key);
        true
    }

    /// Forget the last transform so the next one always passes.
    pub fn reset(&mut self) {
        self.last = None;
    }

    fn fingerprint(&self, transform: &ViewTransform) -> Vec<i64> {
        let factor = 10f64.powi(self.decimals as i32);
        transform
            .view
            .to_cols_array()
            .iter()
            .chain(transform.projection.components().iter())
            .map(|v| (v * factor).round() as i64)
            .collect()
    }
}

impl Default for TransformGate {
    fn default() -> Self {
        Self::new(TRANSFORM_GATE_DECIMALS)
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveTransform {
    transform: ViewTransform,
    view_projection: DMat4,
    inverse: DMat4,
}

impl LiveTransform {
    fn new(transform: ViewTransform) -> Option<Self> {
        let view_projection = transform.view_projection();
        if !is_invertible(&view_projection) {
            return None;
        }
        let inverse = view_projection.inverse();
        if !inverse.is_finite()
            || !(inverse * view_projection).abs_diff_eq(DMat4::IDENTITY, INVERSE_TOLERANCE)
        {
            return None;
        }
        Some(Self {
            transform,
            view_projection,
            inverse,
        })
    }
}

/// Derived state, recomputed as a whole whenever an input changes.
#[derive(Debug, Clone, Copy)]
struct ConverterState {
    image_width: f64,
    image_height: f64,
    widget_width: f64,
    widget_height: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    degenerate: bool,
    live: Option<LiveTransform>,
    units: UnitScale,
}

impl ConverterState {
    fn compute(
        image: (f64, f64),
        widget: (f64, f64),
        live: Option<LiveTransform>,
        units: UnitScale,
    ) -> Self {
        let (iw, ih) = image;
        let (vw, vh) = widget;
        let valid = [iw, ih, vw, vh].iter().all(|d| d.is_finite() && *d > 0.0);
        let scale = if valid { (vw / iw).min(vh / ih) } else { 0.0 };
        let degenerate = !valid || !scale.is_finite() || scale <= 0.0;

        let (scale, offset_x, offset_y) = if degenerate {
            (1.0, 0.0, 0.0)
        } else {
            (scale, (vw - iw * scale) / 2.0, (vh - ih * scale) / 2.0)
        };

        Self {
            image_width: iw,
            image_height: ih,
            widget_width: vw,
            widget_height: vh,
            scale,
            offset_x,
            offset_y,
            degenerate,
            live,
            units,
        }
    }
}

/// Maps between screen (viewport pixel) and image pixel coordinates.
#[derive(Debug, Clone)]
pub struct CoordinateConverter {
    state: ConverterState,
    gate: TransformGate,
}

impl CoordinateConverter {
    /// Creates a converter for an image shown in a viewport.
    pub fn new(image_width: f64, image_height: f64, widget_width: f64, widget_height: f64) -> Self {
        Self {
            state: ConverterState::compute(
                (image_width, image_height),
                (widget_width, widget_height),
                None,
                UnitScale::pixels(),
            ),
            gate: TransformGate::default(),
        }
    }

    /// Replaces the change-detection gate (e.g. with configured precision).
    pub fn with_gate(mut self, gate: TransformGate) -> Self {
        self.gate = gate;
        self
    }

    fn recompute(&mut self, image: (f64, f64), widget: (f64, f64), units: UnitScale) {
        self.state = ConverterState::compute(image, widget, self.state.live, units);
    }

    /// Sets the native image size.
    pub fn set_image_size(&mut self, width: f64, height: f64) {
        let widget = (self.state.widget_width, self.state.widget_height);
        self.recompute((width, height), widget, self.state.units);
    }

    /// Sets the viewport size (typically called when the window resizes).
    pub fn set_widget_size(&mut self, width: f64, height: f64) {
        let image = (self.state.image_width, self.state.image_height);
        self.recompute(image, (width, height), self.state.units);
    }

    /// Sets millimetres per pixel. Invalid values leave the image uncalibrated.
    pub fn set_pixel_spacing(&mut self, mm_per_pixel: Option<f64>) {
        let image = (self.state.image_width, self.state.image_height);
        let widget = (self.state.widget_width, self.state.widget_height);
        self.recompute(image, widget, UnitScale::new(mm_per_pixel));
    }

    /// Installs a live view transform.
    ///
    /// Returns true if the mapping changed. Transforms equal to the current
    /// one (at gate precision) and singular transforms are ignored.
    pub fn set_view_transform(&mut self, transform: ViewTransform) -> bool {
        let Some(live) = LiveTransform::new(transform) else {
            tracing::warn!("Rejected singular view transform");
            return false;
        };
        if !self.gate.admit(&transform) {
            return false;
        }
        self.state = ConverterState {
            live: Some(live),
            ..self.state
        };
        true
    }

    /// Drops the live transform and returns to the baseline mapping.
    pub fn clear_view_transform(&mut self) -> bool {
        self.gate.reset();
        if self.state.live.is_none() {
            return false;
        }
        self.state = ConverterState {
            live: None,
            ..self.state
        };
        true
    }

    /// The active live transform, if any.
    pub fn view_transform(&self) -> Option<&ViewTransform> {
        self.state.live.as_ref().map(|l| &l.transform)
    }

    pub fn has_view_transform(&self) -> bool {
        self.state.live.is_some()
    }

    /// Unit scale of the loaded image.
    pub fn units(&self) -> &UnitScale {
        &self.state.units
    }

    /// Baseline scale (screen pixels per image pixel).
    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Baseline offset of the image's top-left corner in the viewport.
    pub fn offset(&self) -> (f64, f64) {
        (self.state.offset_x, self.state.offset_y)
    }

    pub fn image_size(&self) -> (f64, f64) {
        (self.state.image_width, self.state.image_height)
    }

    pub fn widget_size(&self) -> (f64, f64) {
        (self.state.widget_width, self.state.widget_height)
    }

    /// Whether the inputs are unusable and the mapping is the identity.
    pub fn is_degenerate(&self) -> bool {
        self.state.degenerate
    }

    /// Converts a screen point to image coordinates.
    ///
    /// Baseline formula:
    /// ```text
    /// image_x = (screen_x - offset_x) / scale
    /// image_y = (screen_y - offset_y) / scale
    /// ```
    pub fn screen_to_image(&self, x: f64, y: f64) -> Point {
        let s = &self.state;
        if s.degenerate {
            return Point::new(x, y);
        }
        if let Some(p) = s.live.as_ref().and_then(|l| self.unproject(l, x, y)) {
            return p;
        }
        Point::new((x - s.offset_x) / s.scale, (y - s.offset_y) / s.scale)
    }

    /// Converts an image point to screen coordinates.
    ///
    /// Baseline formula:
    /// ```text
    /// screen_x = image_x * scale + offset_x
    /// screen_y = image_y * scale + offset_y
    /// ```
    pub fn image_to_screen(&self, x: f64, y: f64) -> Point {
        let s = &self.state;
        if s.degenerate {
            return Point::new(x, y);
        }
        if let Some(p) = s.live.as_ref().and_then(|l| self.project(l, x, y)) {
            return p;
        }
        Point::new(x * s.scale + s.offset_x, y * s.scale + s.offset_y)
    }

    /// World position of an image point. The image lies on `z = 0`.
    pub fn image_to_world(&self, x: f64, y: f64) -> DVec3 {
        DVec3::new(x, y, 0.0)
    }

    pub fn screen_to_world(&self, x: f64, y: f64) -> DVec3 {
        let p = self.screen_to_image(x, y);
        self.image_to_world(p.x, p.y)
    }

    /// Converts a tolerance in screen pixels to image pixels around the
    /// viewport centre.
    pub fn tolerance_to_image(&self, screen_px: f64) -> f64 {
        let s = &self.state;
        if s.degenerate {
            return screen_px;
        }
        let (cx, cy) = (s.widget_width / 2.0, s.widget_height / 2.0);
        let measured = self
            .screen_to_image(cx, cy)
            .distance_to(&self.screen_to_image(cx + screen_px, cy));
        if measured.is_finite() && (measured > 0.0 || screen_px == 0.0) {
            measured
        } else {
            screen_px / s.scale
        }
    }

    fn to_ndc(&self, x: f64, y: f64) -> (f64, f64) {
        let s = &self.state;
        (2.0 * x / s.widget_width - 1.0, 1.0 - 2.0 * y / s.widget_height)
    }

    fn unproject(&self, live: &LiveTransform, x: f64, y: f64) -> Option<Point> {
        let (nx, ny) = self.to_ndc(x, y);
        let near = homogenize(live.inverse * DVec4::new(nx, ny, 0.0, 1.0))?;
        let far = homogenize(live.inverse * DVec4::new(nx, ny, 1.0, 1.0))?;
        let dir = far - near;
        if dir.z.abs() < EPSILON {
            return None;
        }
        let t = -near.z / dir.z;
        let hit = near + dir * t;
        hit.is_finite().then(|| Point::new(hit.x, hit.y))
    }

    fn project(&self, live: &LiveTransform, x: f64, y: f64) -> Option<Point> {
        let ndc = homogenize(live.view_projection * DVec4::new(x, y, 0.0, 1.0))?;
        let s = &self.state;
        let sx = (ndc.x + 1.0) / 2.0 * s.widget_width;
        let sy = (1.0 - ndc.y) / 2.0 * s.widget_height;
        (sx.is_finite() && sy.is_finite()).then(|| Point::new(sx, sy))
    }
}

/// Scale-free singularity test.
///
/// The determinant of `P · V` shrinks with the image extent and depth range,
/// so it is compared against the product of the column lengths (Hadamard's
/// bound) rather than an absolute threshold. The ratio is 1 for orthogonal
/// columns and 0 for a singular matrix.
fn is_invertible(m: &DMat4) -> bool {
    let det = m.determinant();
    let bound: f64 = [m.x_axis, m.y_axis, m.z_axis, m.w_axis]
        .iter()
        .map(|c| c.length())
        .product();
    det.is_finite() && bound.is_finite() && bound > 0.0 && (det / bound).abs() >= EPSILON
}

fn homogenize(v: DVec4) -> Option<DVec3> {
    if v.w.abs() < EPSILON {
        None
    } else {
        Some(v.truncate() / v.w)
    }
}

impl fmt::Display for CoordinateConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.state;
        write!(
            f,
            "image {}x{} in {}x{} (scale {:.4}, offset {:.1},{:.1}{})",
            s.image_width,
            s.image_height,
            s.widget_width,
            s.widget_height,
            s.scale,
            s.offset_x,
            s.offset_y,
            if s.live.is_some() { ", live" } else { "" }
        )
    }
}
