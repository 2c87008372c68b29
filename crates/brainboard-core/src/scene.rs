//! Layers and the scene that orders them.

use crate::error::EditError;
use crate::shapes::{Element, ElementId, TextMeasure};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Id of the layer every new scene starts with.
pub const DEFAULT_LAYER_ID: &str = "default";

/// Layer identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Direction for [`Scene::move_layer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerMove {
    /// Toward the front (later in the stacking order).
    Up,
    /// Toward the back.
    Down,
}

/// An independently visible and lockable bucket of elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    /// Elements back to front.
    pub elements: Vec<Element>,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            locked: false,
            elements: Vec::new(),
        }
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Elements under `point`, topmost first.
    pub fn elements_at_point<'a>(
        &'a self,
        point: Point,
        measure: &'a dyn TextMeasure,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .iter()
            .rev()
            .filter(move |e| e.hit_test(point, measure))
    }

    /// Union of element bounds.
    pub fn bounds(&self, measure: &dyn TextMeasure) -> Option<Rect> {
        crate::geometry::union_all(self.elements.iter().map(|e| e.bounds(measure)))
    }
}

/// The ordered layer stack plus the active layer.
///
/// Always holds at least one layer and the active id always resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    layers: Vec<Layer>,
    active: LayerId,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with a single empty default layer.
    pub fn new() -> Self {
        let layer = Layer::new(LayerId::new(DEFAULT_LAYER_ID), "Default Layer");
        Self {
            active: layer.id.clone(),
            layers: vec![layer],
        }
    }

    /// Build a scene from decoded layers. Returns `None` for an empty stack.
    /// An unknown active id falls back to the first layer.
    pub fn from_layers(layers: Vec<Layer>, active: Option<LayerId>) -> Option<Self> {
        let first = layers.first()?.id.clone();
        let active = active
            .filter(|id| layers.iter().any(|l| &l.id == id))
            .unwrap_or(first);
        Some(Self { layers, active })
    }

    /// Layers back to front.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| &l.id == id)
    }

    pub fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| &l.id == id)
    }

    fn layer_index(&self, id: &LayerId) -> Result<usize, EditError> {
        self.layers
            .iter()
            .position(|l| &l.id == id)
            .ok_or_else(|| EditError::LayerNotFound(id.to_string()))
    }

    pub fn active_layer_id(&self) -> &LayerId {
        &self.active
    }

    pub fn active_layer(&self) -> &Layer {
        // The active id is kept valid by every mutation below.
        self.layers
            .iter()
            .find(|l| l.id == self.active)
            .unwrap_or(&self.layers[0])
    }

    pub fn active_layer_mut(&mut self) -> &mut Layer {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == self.active)
            .unwrap_or(0);
        &mut self.layers[index]
    }

    /// Make `id` the active layer.
    pub fn set_active(&mut self, id: &LayerId) -> Result<(), EditError> {
        self.layer_index(id)?;
        self.active = id.clone();
        Ok(())
    }

    /// Append a layer named `Layer N` and make it active.
    pub fn add_layer(&mut self) -> LayerId {
        let layer = Layer::new(LayerId::generate(), format!("Layer {}", self.layers.len() + 1));
        let id = layer.id.clone();
        self.layers.push(layer);
        self.active = id.clone();
        id
    }

    /// Delete a layer and its elements. The last layer cannot be deleted.
    pub fn remove_layer(&mut self, id: &LayerId) -> Result<Layer, EditError> {
        let index = self.layer_index(id)?;
        if self.layers.len() <= 1 {
            return Err(EditError::LastLayer);
        }
        let removed = self.layers.remove(index);
        if &self.active == id {
            self.active = self.layers[0].id.clone();
        }
        Ok(removed)
    }

    /// Swap a layer with its neighbor. Returns false at either end of the stack.
    pub fn move_layer(&mut self, id: &LayerId, direction: LayerMove) -> Result<bool, EditError> {
        let index = self.layer_index(id)?;
        let target = match direction {
            LayerMove::Up if index + 1 < self.layers.len() => index + 1,
            LayerMove::Down if index > 0 => index - 1,
            _ => return Ok(false),
        };
        self.layers.swap(index, target);
        Ok(true)
    }

    /// Replace the whole stack. Rejected if `layers` is empty.
    pub fn replace_layers(&mut self, layers: Vec<Layer>, active: Option<LayerId>) -> bool {
        let active = active.or_else(|| Some(self.active.clone()));
        match Self::from_layers(layers, active) {
            Some(scene) => {
                *self = scene;
                true
            }
            None => false,
        }
    }

    /// Find an element by id in any layer.
    pub fn find_element(&self, id: &ElementId) -> Option<(&Layer, &Element)> {
        self.layers
            .iter()
            .find_map(|l| l.get(id).map(|e| (l, e)))
    }

    /// Visible layers back to front.
    pub fn visible_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Union of the bounds of every element on a visible layer.
    pub fn visible_bounds(&self, measure: &dyn TextMeasure) -> Option<Rect> {
        crate::geometry::union_all(self.visible_layers().filter_map(|l| l.bounds(measure)))
    }

    pub fn element_count(&self) -> usize {
        self.layers.iter().map(|l| l.elements.len()).sum()
    }
}
