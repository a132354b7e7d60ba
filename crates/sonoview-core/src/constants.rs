//! Shared constants for geometry, formatting and interaction defaults.

/// Tolerance used when comparing floating point geometry.
pub const EPSILON: f64 = 1e-9;

/// Number of segments used to approximate an ellipse outline.
pub const ELLIPSE_SEGMENTS: usize = 48;

/// Default hit-test tolerance, in screen pixels.
pub const HIT_TOLERANCE_PX: f64 = 10.0;

/// Vertical offset (image pixels) applied to labels drawn above a line.
pub const LABEL_OFFSET: f64 = 15.0;

/// Offset (image pixels) from the vertex to an angle label.
pub const ANGLE_LABEL_OFFSET: f64 = 20.0;

/// Decimal places kept when fingerprinting a view transform.
pub const TRANSFORM_GATE_DECIMALS: u32 = 4;

/// Multiplier applied to window/level drag deltas.
pub const WINDOW_LEVEL_SENSITIVITY: f64 = 1.0;

/// Multiplier applied to pan drag deltas.
pub const PAN_SENSITIVITY: f64 = 1.0;

/// Square millimetres per square centimetre.
pub const MM2_PER_CM2: f64 = 100.0;
