use crate::model::{Shape, ShapeId};

/// Ordered collection of completed shapes.
///
/// `ShapeStore` keeps shapes in draw order: the first shape is drawn first
/// (bottom-most) and the last is drawn last (top-most). Only completed
/// shapes are accepted, so everything in the store is a final measurement.
///
/// # Design
///
/// Sessions hold tens of shapes, so lookups by id are linear scans over a
/// `Vec`, which keeps draw order and iteration trivial.
#[derive(Debug, Clone, Default)]
pub struct ShapeStore {
    shapes: Vec<Shape>,
}

impl ShapeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self { shapes: Vec::new() }
    }

    /// Appends a completed shape on top of the draw order.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape to insert
    ///
    /// # Returns
    ///
    /// `true` if inserted. Incomplete shapes and duplicate ids are rejected.
    pub fn insert(&mut self, shape: Shape) -> bool {
        if !shape.is_completed() {
            tracing::warn!("Refusing to store incomplete {}", shape.display_name());
            return false;
        }
        if self.contains(shape.id()) {
            tracing::warn!("Shape id {} already stored", shape.id());
            return false;
        }
        self.shapes.push(shape);
        true
    }

    /// Removes a shape by id, returning it if found.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Removes every shape and returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.shapes.len();
        self.shapes.clear();
        count
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Iterates shapes in draw order (bottom to top).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.iter_mut()
    }

    /// Ids in draw order.
    pub fn draw_order_iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().map(Shape::id)
    }

    /// Highest stored id, if any.
    pub fn max_id(&self) -> Option<ShapeId> {
        self.shapes.iter().map(Shape::id).max()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
