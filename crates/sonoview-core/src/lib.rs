//! # SonoView Core
//!
//! Core types and utilities shared by the SonoView annotation crates.
//! Provides the error hierarchy, the physical unit scale used to format
//! measurements, shared constants, and a typed event bus for handing
//! interaction output to rendering and panel collaborators.

pub mod constants;
pub mod error;
pub mod event_bus;
pub mod units;

pub use error::{ConfigError, Error, Result, ToolError};

pub use event_bus::{
    BusEvent, EventBus, EventBusConfig, EventBusError, EventFilter, SubscriptionId,
};

pub use units::{format_angle, UnitScale};
