//! Scripted session input.
//!
//! One JSON object per line, tagged by `"type"`:
//!
//! ```text
//! {"type": "select_tool", "tool": "polygon"}
//! {"type": "click", "lat": 51.5, "lng": 7.4}
//! {"type": "double_click", "lat": 51.5, "lng": 7.4}
//! {"type": "list"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use geoscribe_core::{FeatureId, LatLng, Layer, PointerEvent, SearchResult, SelectedTool};
use serde::Deserialize;

/// A single scripted user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptCommand {
    SelectTool { tool: SelectedTool },
    /// Toolbar click: re-selecting the active tool deselects it.
    ToggleTool { tool: SelectedTool },
    Click { lat: f64, lng: f64 },
    DoubleClick { lat: f64, lng: f64 },
    /// Right click / context menu.
    Secondary { lat: f64, lng: f64 },
    ToggleLayer { layer: Layer },
    Remove { id: FeatureId },
    /// Remove by position in the feature list (0-based).
    RemoveAt { index: usize },
    Clear,
    Center { lat: f64, lng: f64 },
    Zoom { level: i32 },
    ZoomIn,
    ZoomOut,
    SearchResult { display_name: String, lat: f64, lng: f64 },
    List,
}

impl ScriptCommand {
    /// The pointer event this command stands for, if any.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        let event = match *self {
            ScriptCommand::Click { lat, lng } => PointerEvent::PrimaryClick(LatLng::new(lat, lng)),
            ScriptCommand::DoubleClick { lat, lng } => PointerEvent::DoubleClick(LatLng::new(lat, lng)),
            ScriptCommand::Secondary { lat, lng } => {
                PointerEvent::SecondaryAction(LatLng::new(lat, lng))
            }
            _ => return None,
        };
        Some(event)
    }

    pub fn search_result(&self) -> Option<SearchResult> {
        match self {
            ScriptCommand::SearchResult { display_name, lat, lng } => Some(SearchResult {
                display_name: display_name.clone(),
                position: LatLng::new(*lat, *lng),
            }),
            _ => None,
        }
    }
}

/// Parse one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, serde_json::Error> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed).map(Some)
}
