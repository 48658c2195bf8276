//! Drawing state machine.

use super::SelectedTool;
use crate::feature::{FeatureDraft, FeatureKind, FeatureProperties, MIN_POLYGON_VERTICES};
use crate::geometry::LatLng;
use chrono::{DateTime, Local, Utc};

/// Transient drawing state. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrawState {
    /// No drawing tool armed; pointer events are ignored.
    #[default]
    Idle,
    /// Every primary click drops a point.
    PointArmed,
    /// Collecting polygon vertices.
    PolygonArmed(Vec<LatLng>),
}

impl DrawState {
    /// Fresh state for a newly selected tool.
    pub fn for_tool(tool: SelectedTool) -> Self {
        match tool {
            SelectedTool::Point => DrawState::PointArmed,
            SelectedTool::Polygon => DrawState::PolygonArmed(Vec::new()),
            SelectedTool::None | SelectedTool::Pan | SelectedTool::Rectangle => DrawState::Idle,
        }
    }

    /// Buffered polygon vertices (empty outside polygon drawing).
    pub fn vertices(&self) -> &[LatLng] {
        match self {
            DrawState::PolygonArmed(vertices) => vertices,
            DrawState::Idle | DrawState::PointArmed => &[],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    fn is_armed_for(&self, tool: SelectedTool) -> bool {
        matches!(
            (self, tool),
            (DrawState::PointArmed, SelectedTool::Point)
                | (DrawState::PolygonArmed(_), SelectedTool::Polygon)
        )
    }
}

/// Pointer input, already converted to map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    PrimaryClick(LatLng),
    SecondaryAction(LatLng),
    DoubleClick(LatLng),
}

/// Everything the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawEvent {
    ToolChanged(SelectedTool),
    Pointer(PointerEvent),
}

impl From<PointerEvent> for DrawEvent {
    fn from(event: PointerEvent) -> Self {
        DrawEvent::Pointer(event)
    }
}

/// User-facing feedback about a drawing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawNotice {
    PolygonCreated { vertices: usize },
    PolygonCancelled,
    /// A polygon was finished with too few vertices and nothing was committed.
    NotEnoughVertices { have: usize, need: usize },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Add this feature to the store.
    Commit(FeatureDraft),
    /// Change the store's selected tool.
    SelectTool(SelectedTool),
    /// Show the in-progress polygon outline through these vertices.
    Preview(Vec<LatLng>),
    /// Remove any in-progress outline and vertex markers.
    ClearPreview,
    Notify(DrawNotice),
}

/// Result of [`apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: DrawState,
    pub commands: Vec<DrawCommand>,
}

impl Transition {
    fn to(state: DrawState) -> Self {
        Self {
            state,
            commands: Vec::new(),
        }
    }

    fn with(state: DrawState, commands: Vec<DrawCommand>) -> Self {
        Self { state, commands }
    }
}

/// Default name for a new feature, e.g. `"Polygon 14:03:27"` in local time.
pub fn auto_label(kind: FeatureKind, now: DateTime<Utc>) -> String {
    format!(
        "{} {}",
        kind.label(),
        now.with_timezone(&Local).format("%H:%M:%S")
    )
}

/// Advance the drawing state by one event.
///
/// Pure: `now` only stamps committed features.
pub fn apply(state: DrawState, event: DrawEvent, now: DateTime<Utc>) -> Transition {
    match event {
        DrawEvent::ToolChanged(tool) => change_tool(state, tool),
        DrawEvent::Pointer(pointer) => handle_pointer(state, pointer, now),
    }
}

fn change_tool(state: DrawState, tool: SelectedTool) -> Transition {
    if state.is_armed_for(tool) {
        return Transition::to(state);
    }

    let mut commands = Vec::new();
    if state.vertex_count() > 0 {
        commands.push(DrawCommand::ClearPreview);
    }
    Transition::with(DrawState::for_tool(tool), commands)
}

fn handle_pointer(state: DrawState, event: PointerEvent, now: DateTime<Utc>) -> Transition {
    match (state, event) {
        (DrawState::PointArmed, PointerEvent::PrimaryClick(pos)) => {
            let properties = FeatureProperties::new(auto_label(FeatureKind::Point, now), now);
            Transition::with(
                DrawState::PointArmed,
                vec![DrawCommand::Commit(FeatureDraft::point(pos, properties))],
            )
        }

        (DrawState::PolygonArmed(mut vertices), PointerEvent::PrimaryClick(pos)) => {
            vertices.push(pos);
            let commands = if vertices.len() >= 2 {
                vec![DrawCommand::Preview(vertices.clone())]
            } else {
                Vec::new()
            };
            Transition::with(DrawState::PolygonArmed(vertices), commands)
        }

        (DrawState::PolygonArmed(vertices), PointerEvent::DoubleClick(_)) => {
            finish_polygon(vertices, now)
        }

        (DrawState::PolygonArmed(vertices), PointerEvent::SecondaryAction(_))
            if !vertices.is_empty() =>
        {
            // The tool stays armed so the next click starts a new polygon.
            Transition::with(
                DrawState::PolygonArmed(Vec::new()),
                vec![
                    DrawCommand::ClearPreview,
                    DrawCommand::Notify(DrawNotice::PolygonCancelled),
                ],
            )
        }

        (state, _) => Transition::to(state),
    }
}

fn finish_polygon(vertices: Vec<LatLng>, now: DateTime<Utc>) -> Transition {
    let count = vertices.len();

    if count == 0 {
        return Transition::to(DrawState::PolygonArmed(vertices));
    }

    if count < MIN_POLYGON_VERTICES {
        return Transition::with(
            DrawState::PolygonArmed(vertices),
            vec![DrawCommand::Notify(DrawNotice::NotEnoughVertices {
                have: count,
                need: MIN_POLYGON_VERTICES,
            })],
        );
    }

    let properties = FeatureProperties::new(auto_label(FeatureKind::Polygon, now), now);
    Transition::with(
        DrawState::Idle,
        vec![
            DrawCommand::Commit(FeatureDraft::polygon(vertices, properties)),
            DrawCommand::ClearPreview,
            DrawCommand::SelectTool(SelectedTool::None),
            DrawCommand::Notify(DrawNotice::PolygonCreated { vertices: count }),
        ],
    )
}
