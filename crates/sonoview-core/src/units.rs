//! Physical unit scale for measurement display
//!
//! Converts raw image-pixel quantities into millimetres and square
//! centimetres when the loaded image carries a pixel spacing, and formats
//! them for labels and the layer panel. Without a spacing everything is
//! reported in pixels.

use crate::constants::MM2_PER_CM2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Millimetres per image pixel for the loaded image, if known.
///
/// Owned by the coordinate converter of the current image and passed by
/// reference into every formatting call.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitScale {
    mm_per_pixel: Option<f64>,
}

impl UnitScale {
    /// Scale with no physical calibration (pixel units).
    pub const fn pixels() -> Self {
        Self { mm_per_pixel: None }
    }

    /// Build a scale from an optional pixel spacing.
    ///
    /// Non-positive or non-finite spacings are treated as unset.
    pub fn new(mm_per_pixel: Option<f64>) -> Self {
        Self {
            mm_per_pixel: mm_per_pixel.filter(|s| s.is_finite() && *s > 0.0),
        }
    }

    /// The accepted spacing, if any.
    pub fn mm_per_pixel(&self) -> Option<f64> {
        self.mm_per_pixel
    }

    /// Whether measurements are reported in physical units.
    pub fn is_calibrated(&self) -> bool {
        self.mm_per_pixel.is_some()
    }

    /// Format an image-pixel length.
    ///
    /// `"{:.2} mm"` when calibrated, `"{:.1} px"` otherwise.
    pub fn format_length(&self, pixels: f64) -> String {
        match self.mm_per_pixel {
            Some(s) => format!("{:.2} mm", pixels * s),
            None => format!("{:.1} px", pixels),
        }
    }

    /// Format an image-pixel area.
    ///
    /// Calibrated areas are converted px² → mm² → cm².
    pub fn format_area(&self, square_pixels: f64) -> String {
        match self.mm_per_pixel {
            Some(s) => format!("{:.2} cm²", square_pixels * s * s / MM2_PER_CM2),
            None => format!("{:.0} px²", square_pixels),
        }
    }
}

impl fmt::Display for UnitScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mm_per_pixel {
            Some(s) => write!(f, "{} mm/px", s),
            None => write!(f, "uncalibrated"),
        }
    }
}

/// Format an angle in degrees.
pub fn format_angle(degrees: f64) -> String {
    format!("{:.1}°", degrees)
}
