//! SonoView Settings Crate
//!
//! Handles engine configuration: interaction tolerances, rendering
//! parameters and view-transform gating, persisted as JSON or TOML.

pub mod config;

pub use config::{Config, InteractionSettings, RenderingSettings, TransformSettings};
