//! Drawing tools: turning pointer input into committed features.
//!
//! [`apply`] is the pure transition function. [`DrawingController`] keeps the
//! current [`DrawState`], follows the store's selected tool and carries out the
//! store-directed commands.

mod controller;
mod machine;

pub use controller::DrawingController;
pub use machine::{
    DrawCommand, DrawEvent, DrawNotice, DrawState, PointerEvent, Transition, apply, auto_label,
};

use serde::{Deserialize, Serialize};

/// Tool selected in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectedTool {
    #[default]
    None,
    Pan,
    Point,
    Polygon,
    /// Reserved. Accepted as a selection but arms nothing.
    Rectangle,
}
