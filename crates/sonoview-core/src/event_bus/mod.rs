//! # Event Bus Module
//!
//! Typed publish/subscribe plumbing for handing engine output to
//! rendering, list-panel and logging collaborators.
//!
//! The bus is generic over any event type implementing [`BusEvent`], so
//! each crate defines its own event enum and categories. There is no
//! process-wide instance: the host owns its bus and passes it where needed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sonoview_core::event_bus::{EventBus, EventFilter};
//!
//! let bus: EventBus<AnnotationEvent> = EventBus::new();
//! let id = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Shape]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! for event in controller.drain_events() {
//!     bus.publish(event).ok();
//! }
//!
//! bus.unsubscribe(id);
//! ```

mod bus;

pub use bus::*;
