//! Collaboration messages and their application to the scene.
//!
//! Transport is the host's job: outgoing messages are queued as JSON strings
//! and drained with [`CollaborationManager::take_outgoing`]; incoming strings
//! are handed to [`CollaborationManager::apply`]. Remote changes are applied
//! as-is, without history and without honoring layer locks.

use crate::codec::{ElementRecord, LayerRecord, encode_layers};
use crate::scene::{Layer, LayerId, Scene};
use crate::shapes::{Element, UserId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Messages exchanged between participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CollabMessage {
    /// A new element on a layer.
    #[serde(rename_all = "camelCase")]
    Draw {
        element: ElementRecord,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer_id: Option<String>,
    },
    /// Empty the active layer.
    Clear,
    /// Replace some properties of one layer.
    #[serde(rename_all = "camelCase")]
    LayerUpdate { layer_id: String, layer: LayerPatch },
    /// Replace the whole layer stack.
    #[serde(rename_all = "camelCase")]
    Sync {
        layers: Vec<LayerRecord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active_layer: Option<String>,
    },
    /// Cursor position of a participant.
    #[serde(rename_all = "camelCase")]
    UserMove { user_id: UserId, x: f64, y: f64 },
}

/// Fields of a layer carried by a `layerUpdate`. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<ElementRecord>>,
}

impl LayerPatch {
    /// A patch carrying every field of `layer`.
    pub fn full(layer: &Layer) -> Self {
        let record = LayerRecord::from(layer);
        Self {
            name: Some(record.name),
            visible: Some(record.visible),
            locked: Some(record.locked),
            elements: Some(record.elements),
        }
    }
}

/// What an applied remote message changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteChange {
    /// Nothing was applied.
    None,
    /// Elements or properties of one layer changed.
    Layer(LayerId),
    /// The whole layer stack was replaced.
    Scene,
    /// Only the presence map changed.
    Presence(UserId),
}

impl RemoteChange {
    /// Whether scene content changed.
    pub fn is_scene_change(&self) -> bool {
        matches!(self, RemoteChange::Layer(_) | RemoteChange::Scene)
    }
}

/// Outgoing queue and remote presence for one participant.
#[derive(Debug, Clone)]
pub struct CollaborationManager {
    enabled: bool,
    local_user: UserId,
    outgoing: Vec<String>,
    peers: HashMap<UserId, Point>,
}

impl CollaborationManager {
    pub fn new(local_user: UserId, enabled: bool) -> Self {
        Self {
            enabled,
            local_user,
            outgoing: Vec::new(),
            peers: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable collaboration and drop anything still queued.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.outgoing.clear();
    }

    /// Queue a message for sending. Dropped while disabled.
    pub fn queue(&mut self, message: &CollabMessage) {
        if !self.enabled {
            return;
        }
        match serde_json::to_string(message) {
            Ok(json) => self.outgoing.push(json),
            Err(e) => log::warn!("Dropping outgoing message: {}", e),
        }
    }

    pub fn broadcast_draw(&mut self, element: &Element, layer: &LayerId) {
        self.queue(&CollabMessage::Draw {
            element: ElementRecord::from(element),
            layer_id: Some(layer.as_str().to_string()),
        });
    }

    pub fn broadcast_clear(&mut self) {
        self.queue(&CollabMessage::Clear);
    }

    pub fn broadcast_layer(&mut self, layer: &Layer) {
        self.queue(&CollabMessage::LayerUpdate {
            layer_id: layer.id.as_str().to_string(),
            layer: LayerPatch::full(layer),
        });
    }

    pub fn broadcast_sync(&mut self, scene: &Scene) {
        self.queue(&CollabMessage::Sync {
            layers: encode_layers(scene.layers()),
            active_layer: Some(scene.active_layer_id().as_str().to_string()),
        });
    }

    pub fn broadcast_cursor(&mut self, point: Point) {
        self.queue(&CollabMessage::UserMove {
            user_id: self.local_user,
            x: point.x,
            y: point.y,
        });
    }

    /// Take pending outgoing messages (drains the queue).
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Last known cursor of every remote participant.
    pub fn peers(&self) -> &HashMap<UserId, Point> {
        &self.peers
    }

    /// Parse and apply a received message. Malformed input is logged and ignored.
    pub fn apply_json(&mut self, scene: &mut Scene, json: &str) -> RemoteChange {
        match serde_json::from_str::<CollabMessage>(json) {
            Ok(message) => self.apply(scene, message),
            Err(e) => {
                log::warn!("Ignoring malformed collaboration message: {}", e);
                RemoteChange::None
            }
        }
    }

    /// Apply a received message to `scene`.
    pub fn apply(&mut self, scene: &mut Scene, message: CollabMessage) -> RemoteChange {
        match message {
            CollabMessage::Draw { element, layer_id } => {
                let element = match Element::try_from(element) {
                    Ok(element) => element,
                    Err(e) => {
                        log::warn!("Ignoring remote draw: {}", e);
                        return RemoteChange::None;
                    }
                };
                let target = layer_id
                    .map(LayerId::new)
                    .filter(|id| scene.layer(id).is_some())
                    .unwrap_or_else(|| scene.active_layer_id().clone());
                let Some(layer) = scene.layer_mut(&target) else {
                    return RemoteChange::None;
                };
                if layer.contains(element.id()) {
                    log::debug!("Remote element {} already present", element.id());
                    return RemoteChange::None;
                }
                layer.elements.push(element);
                RemoteChange::Layer(target)
            }
            CollabMessage::Clear => {
                let layer = scene.active_layer_mut();
                layer.elements.clear();
                RemoteChange::Layer(layer.id.clone())
            }
            CollabMessage::LayerUpdate { layer_id, layer: patch } => {
                let id = LayerId::new(layer_id);
                let elements = match patch.elements.map(|records| {
                    records
                        .into_iter()
                        .map(Element::try_from)
                        .collect::<Result<Vec<_>, _>>()
                }) {
                    Some(Ok(elements)) => Some(elements),
                    Some(Err(e)) => {
                        log::warn!("Ignoring remote layer update for {}: {}", id, e);
                        return RemoteChange::None;
                    }
                    None => None,
                };
                let Some(layer) = scene.layer_mut(&id) else {
                    log::warn!("Remote layer update for unknown layer {}", id);
                    return RemoteChange::None;
                };
                if let Some(name) = patch.name {
                    layer.name = name;
                }
                if let Some(visible) = patch.visible {
                    layer.visible = visible;
                }
                if let Some(locked) = patch.locked {
                    layer.locked = locked;
                }
                if let Some(elements) = elements {
                    layer.elements = elements;
                }
                RemoteChange::Layer(id)
            }
            CollabMessage::Sync { layers, active_layer } => {
                let decoded = layers
                    .into_iter()
                    .map(Layer::try_from)
                    .collect::<Result<Vec<_>, _>>();
                match decoded {
                    Ok(layers) if !layers.is_empty() => {
                        let active = active_layer.map(LayerId::new);
                        if scene.replace_layers(layers, active) {
                            log::info!("Applied remote sync ({} layers)", scene.layers().len());
                            RemoteChange::Scene
                        } else {
                            RemoteChange::None
                        }
                    }
                    Ok(_) => {
                        log::warn!("Ignoring remote sync with no layers");
                        RemoteChange::None
                    }
                    Err(e) => {
                        log::warn!("Ignoring remote sync: {}", e);
                        RemoteChange::None
                    }
                }
            }
            CollabMessage::UserMove { user_id, x, y } => {
                if user_id == self.local_user {
                    return RemoteChange::None;
                }
                self.peers.insert(user_id, Point::new(x, y));
                RemoteChange::Presence(user_id)
            }
        }
    }
}
