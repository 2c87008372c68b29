//! Edit errors and the user-facing notices they produce.

use thiserror::Error;

/// Rejected edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Layer \"{layer}\" is locked")]
    LayerLocked { layer: String },
    #[error("Cannot delete the last layer")]
    LastLayer,
    #[error("Layer not found: {0}")]
    LayerNotFound(String),
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    #[error("Nothing is selected")]
    NothingSelected,
}

impl EditError {
    /// Short heading for the notice shown to the user.
    pub fn title(&self) -> &'static str {
        match self {
            EditError::LayerLocked { .. } => "Layer Locked",
            EditError::LastLayer => "Cannot Delete Layer",
            EditError::LayerNotFound(_) | EditError::ElementNotFound(_) => "Not Found",
            EditError::NothingSelected => "No Selection",
        }
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible message queued by the engine for the host to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

impl From<&EditError> for Notice {
    fn from(err: &EditError) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: err.title().to_string(),
            message: err.to_string(),
        }
    }
}
