//! Events produced by the interaction state machine.
//!
//! The controller queues [`AnnotationEvent`]s; the host drains them after
//! each input and forwards them to rendering and list-panel collaborators,
//! optionally through a [`sonoview_core::EventBus`].

use sonoview_core::BusEvent;
use std::fmt;

use crate::interaction::Tool;
use crate::model::{Point, Shape, ShapeId};

/// Incremental view adjustment from a Pan or WindowLevel drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delta {
    /// Screen-pixel pan offset.
    Pan { dx: f64, dy: f64 },
    /// Window width and level change.
    WindowLevel { window: f64, level: f64 },
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// In-progress geometry
    Preview,
    /// Shape collection changes
    Shape,
    /// View deltas
    Delta,
    /// Selection changes
    Selection,
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventCategory::Preview => write!(f, "Preview"),
            EventCategory::Shape => write!(f, "Shape"),
            EventCategory::Delta => write!(f, "Delta"),
            EventCategory::Selection => write!(f, "Selection"),
        }
    }
}

/// Output of the interaction state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationEvent {
    /// In-progress geometry changed. Points are in image pixels.
    PreviewUpdated { tool: Tool, points: Vec<Point> },
    /// In-progress geometry is gone.
    PreviewCleared,
    /// A completed shape was added to the store.
    ShapeCommitted { shape: Shape },
    DeltaEmitted(Delta),
    ShapeRemoved { id: ShapeId },
    ShapesCleared,
    /// Visibility, classification or labels of a stored shape changed.
    ShapeChanged { id: ShapeId },
    SelectionChanged { id: Option<ShapeId> },
}

impl BusEvent for AnnotationEvent {
    type Category = EventCategory;

    fn category(&self) -> EventCategory {
        match self {
            AnnotationEvent::PreviewUpdated { .. } | AnnotationEvent::PreviewCleared => {
                EventCategory::Preview
            }
            AnnotationEvent::ShapeCommitted { .. }
            | AnnotationEvent::ShapeRemoved { .. }
            | AnnotationEvent::ShapesCleared
            | AnnotationEvent::ShapeChanged { .. } => EventCategory::Shape,
            AnnotationEvent::DeltaEmitted(_) => EventCategory::Delta,
            AnnotationEvent::SelectionChanged { .. } => EventCategory::Selection,
        }
    }

    fn description(&self) -> String {
        match self {
            AnnotationEvent::PreviewUpdated { tool, points } => {
                format!("Preview {} ({} points)", tool, points.len())
            }
            AnnotationEvent::PreviewCleared => "Preview cleared".to_string(),
            AnnotationEvent::ShapeCommitted { shape } => {
                format!("Committed {}", shape.display_name())
            }
            AnnotationEvent::DeltaEmitted(Delta::Pan { dx, dy }) => {
                format!("Pan by ({:.1}, {:.1})", dx, dy)
            }
            AnnotationEvent::DeltaEmitted(Delta::WindowLevel { window, level }) => {
                format!("Window/level by ({:.1}, {:.1})", window, level)
            }
            AnnotationEvent::ShapeRemoved { id } => format!("Removed shape {}", id),
            AnnotationEvent::ShapesCleared => "Cleared all shapes".to_string(),
            AnnotationEvent::ShapeChanged { id } => format!("Shape {} changed", id),
            AnnotationEvent::SelectionChanged { id: Some(id) } => format!("Selected shape {}", id),
            AnnotationEvent::SelectionChanged { id: None } => "Selection cleared".to_string(),
        }
    }
}
