//! Ordered and indexed storage for parsed drawables.

use super::shape::Drawable;
use crate::geometry::{BoundingBox, Transform};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("identifier '{0}' is already defined")]
    DuplicateId(String),
}

/// Every drawable parsed from one document.
///
/// Objects are kept in insertion order. The render list holds only objects
/// registered as renderable; the name index holds every object with an id.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    canvas_size: (u32, u32),
    objects: Vec<Drawable>,
    render: Vec<usize>,
    named: HashMap<String, usize>,
}

impl ObjectStore {
    pub fn new(canvas_size: (u32, u32)) -> Self {
        Self {
            canvas_size,
            objects: Vec::new(),
            render: Vec::new(),
            named: HashMap::new(),
        }
    }

    /// Native document canvas size (width, height).
    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas_size
    }

    /// Registers a drawable.
    ///
    /// # Errors
    /// Fails without modifying the store if the drawable's id is already taken.
    pub fn insert(&mut self, drawable: Drawable, render: bool) -> Result<(), StoreError> {
        if let Some(id) = &drawable.id {
            if self.named.contains_key(id) {
                return Err(StoreError::DuplicateId(id.clone()));
            }
        }

        let index = self.objects.len();
        if let Some(id) = &drawable.id {
            self.named.insert(id.clone(), index);
        }
        if render {
            self.render.push(index);
        }
        self.objects.push(drawable);
        Ok(())
    }

    /// Looks up any registered object by id, renderable or not.
    pub fn get(&self, id: &str) -> Option<&Drawable> {
        self.named.get(id).map(|&index| &self.objects[index])
    }

    /// Renderable objects in drawing order.
    pub fn iter(&self) -> impl Iterator<Item = &Drawable> {
        self.render.iter().map(|&index| &self.objects[index])
    }

    /// Number of renderable objects.
    pub fn len(&self) -> usize {
        self.render.len()
    }

    pub fn is_empty(&self) -> bool {
        self.render.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.render.clear();
        self.named.clear();
    }

    /// Transform mapping the document canvas onto `destination`.
    pub fn fitting_transform(&self, destination: &BoundingBox) -> Transform {
        let (w, h) = self.canvas_size;
        Transform::fit((w as f64, h as f64), destination)
    }
}
