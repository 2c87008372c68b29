//! Engine configuration and per-board settings.

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::shapes::{DEFAULT_COLOR, DEFAULT_STROKE_WIDTH, UserId};
use crate::snap::GRID_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables fixed for the lifetime of an engine.
///
/// Missing fields in a JSON config take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Participant id stamped on new elements.
    pub user_id: UserId,
    /// Eraser radius in scene pixels.
    pub eraser_size: f64,
    /// Grid spacing for snapping and display.
    pub grid_size: f64,
    /// Smallest width/height a box can be resized to.
    pub min_box_size: f64,
    /// Pick distance around resize handles.
    pub handle_tolerance: f64,
    /// Number of history snapshots kept.
    pub history_limit: usize,
    /// Idle time before an autosave fires.
    pub autosave_debounce_secs: u64,
    /// Margin added around content when exporting.
    pub export_padding: f64,
    /// Color of new elements until the user picks another.
    pub default_color: String,
    /// Stroke width of new elements until the user picks another.
    pub default_line_width: f64,
    /// Queue outgoing collaboration messages.
    pub collaboration: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            eraser_size: 10.0,
            grid_size: GRID_SIZE,
            min_box_size: 20.0,
            handle_tolerance: 8.0,
            history_limit: DEFAULT_HISTORY_LIMIT,
            autosave_debounce_secs: 5,
            export_padding: 50.0,
            default_color: DEFAULT_COLOR.to_string(),
            default_line_width: DEFAULT_STROKE_WIDTH,
            collaboration: true,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_secs(self.autosave_debounce_secs)
    }
}

/// User-adjustable settings stored with the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSettings {
    pub current_color: String,
    pub line_width: f64,
    pub show_grid: bool,
    pub snap_to_grid: bool,
}

impl BoardSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            current_color: config.default_color.clone(),
            line_width: config.default_line_width,
            show_grid: false,
            snap_to_grid: false,
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}
