//! Brainboard Core Library
//!
//! Platform-agnostic scene model and editing engine for the Brainboard
//! whiteboard: elements, layers, tools, history, persistence and the
//! collaboration message protocol. Rendering lives in `brainboard-render`.

pub mod canvas;
pub mod codec;
pub mod collaboration;
pub mod config;
pub mod eraser;
pub mod error;
pub mod geometry;
pub mod history;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod tools;

pub use canvas::{Canvas, IdGenerator};
pub use codec::{BoardDocument, CodecError, ElementRecord, LayerRecord, MinimalDocument};
pub use collaboration::{CollabMessage, CollaborationManager, LayerPatch, RemoteChange};
pub use config::{BoardSettings, EditorConfig};
pub use error::{EditError, Notice, NoticeLevel};
pub use history::History;
pub use scene::{Layer, LayerId, LayerMove, Scene};
pub use selection::{Handle, HandleKind, ManipulationState, get_handles, hit_test_handles};
pub use shapes::{Element, ElementId, ElementKind, ElementStyle, TextMeasure, UserId};
pub use snap::{GRID_SIZE, snap_to_grid};
pub use tools::{ToolKind, ToolManager};
