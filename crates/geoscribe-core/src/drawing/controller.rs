//! Drives the drawing state machine against a [`MapStore`].

use super::machine::{DrawCommand, DrawEvent, DrawState, PointerEvent, apply};
use super::SelectedTool;
use crate::geometry::LatLng;
use crate::storage::Storage;
use crate::store::MapStore;
use chrono::Utc;

/// Owns the transient drawing session.
///
/// The store's selected tool is authoritative. Before each pointer event the
/// controller checks it and re-arms if the toolbar changed it in between.
#[derive(Debug, Default)]
pub struct DrawingController {
    state: DrawState,
    /// Tool the current state was armed for.
    observed_tool: SelectedTool,
}

impl DrawingController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Buffered polygon vertices, for drawing markers.
    pub fn vertices(&self) -> &[LatLng] {
        self.state.vertices()
    }

    /// Number of buffered polygon vertices.
    pub fn vertex_count(&self) -> usize {
        self.state.vertex_count()
    }

    /// Select a tool on the store and re-arm accordingly.
    pub fn select_tool<S: Storage>(&mut self, store: &mut MapStore<S>, tool: SelectedTool) -> Vec<DrawCommand> {
        store.set_selected_tool(tool);
        self.sync_tool(store.selected_tool())
    }

    /// Follow a tool change made elsewhere.
    ///
    /// Returns presentation commands (e.g. clearing a half-drawn outline).
    pub fn sync_tool(&mut self, tool: SelectedTool) -> Vec<DrawCommand> {
        if tool == self.observed_tool {
            return Vec::new();
        }
        log::debug!("drawing: tool {:?} -> {:?}", self.observed_tool, tool);
        self.observed_tool = tool;
        self.step(DrawEvent::ToolChanged(tool))
    }

    /// Process one pointer event.
    ///
    /// Store-directed commands (`Commit`, `SelectTool`) are carried out here.
    /// All commands, including those, are returned so a renderer can update
    /// previews and show notices.
    pub fn handle<S: Storage>(&mut self, store: &mut MapStore<S>, event: PointerEvent) -> Vec<DrawCommand> {
        let mut commands = self.sync_tool(store.selected_tool());
        let produced = self.step(event.into());

        for command in &produced {
            match command {
                DrawCommand::Commit(draft) => {
                    if let Err(e) = store.add_feature(draft.clone()) {
                        log::warn!("Drawn feature not committed: {}", e);
                    }
                }
                DrawCommand::SelectTool(tool) => {
                    store.set_selected_tool(*tool);
                    self.observed_tool = *tool;
                }
                DrawCommand::Preview(_) | DrawCommand::ClearPreview | DrawCommand::Notify(_) => {}
            }
        }

        commands.extend(produced);
        commands
    }

    fn step(&mut self, event: DrawEvent) -> Vec<DrawCommand> {
        let state = std::mem::take(&mut self.state);
        let transition = apply(state, event, Utc::now());
        self.state = transition.state;
        transition.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::DrawNotice;
    use crate::feature::{FeatureKind, Geometry};
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn setup() -> (MapStore<MemoryStorage>, DrawingController) {
        (MapStore::open(Arc::new(MemoryStorage::new())), DrawingController::new())
    }

    fn click(lat: f64, lng: f64) -> PointerEvent {
        PointerEvent::PrimaryClick(LatLng::new(lat, lng))
    }

    #[test]
    fn test_point_tool_commits_to_store() {
        let (mut store, mut drawing) = setup();
        drawing.select_tool(&mut store, SelectedTool::Point);

        drawing.handle(&mut store, click(52.52, 13.405));
        drawing.handle(&mut store, click(48.85, 2.35));

        assert_eq!(store.feature_count(), 2);
        assert!(store.features().iter().all(|f| f.kind() == FeatureKind::Point));
        assert_eq!(store.selected_tool(), SelectedTool::Point);
    }

    #[test]
    fn test_polygon_happy_path() {
        let (mut store, mut drawing) = setup();
        drawing.select_tool(&mut store, SelectedTool::Polygon);

        drawing.handle(&mut store, click(0.0, 0.0));
        drawing.handle(&mut store, click(4.0, 0.0));
        drawing.handle(&mut store, click(0.0, 3.0));
        assert_eq!(drawing.vertex_count(), 3);
        let commands = drawing.handle(&mut store, PointerEvent::DoubleClick(LatLng::new(0.0, 3.0)));

        let features = store.features();
        assert_eq!(features.len(), 1);
        assert_eq!(
            features[0].geometry,
            Geometry::Polygon(vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(4.0, 0.0),
                LatLng::new(0.0, 3.0),
            ])
        );
        assert_eq!(store.selected_tool(), SelectedTool::None);
        assert_eq!(drawing.state(), &DrawState::Idle);
        assert!(commands.contains(&DrawCommand::Notify(DrawNotice::PolygonCreated { vertices: 3 })));
    }

    #[test]
    fn test_polygon_cancel() {
        let (mut store, mut drawing) = setup();
        drawing.select_tool(&mut store, SelectedTool::Polygon);

        drawing.handle(&mut store, click(0.0, 0.0));
        drawing.handle(&mut store, click(1.0, 1.0));
        drawing.handle(&mut store, PointerEvent::SecondaryAction(LatLng::new(1.0, 1.0)));

        assert_eq!(store.feature_count(), 0);
        assert_eq!(drawing.vertex_count(), 0);
        assert_eq!(store.selected_tool(), SelectedTool::Polygon);

        // Still armed: a new polygon can start right away.
        drawing.handle(&mut store, click(5.0, 5.0));
        assert_eq!(drawing.vertex_count(), 1);
    }

    #[test]
    fn test_polygon_under_count() {
        let (mut store, mut drawing) = setup();
        drawing.select_tool(&mut store, SelectedTool::Polygon);

        drawing.handle(&mut store, click(0.0, 0.0));
        drawing.handle(&mut store, click(1.0, 1.0));
        let before = drawing.state().clone();
        let commands = drawing.handle(&mut store, PointerEvent::DoubleClick(LatLng::new(1.0, 1.0)));

        assert_eq!(store.feature_count(), 0);
        assert_eq!(drawing.state(), &before);
        assert_eq!(store.selected_tool(), SelectedTool::Polygon);
        assert_eq!(
            commands,
            vec![DrawCommand::Notify(DrawNotice::NotEnoughVertices { have: 2, need: 3 })]
        );
    }

    #[test]
    fn test_external_tool_change_discards_vertices() {
        let (mut store, mut drawing) = setup();
        drawing.select_tool(&mut store, SelectedTool::Polygon);
        drawing.handle(&mut store, click(0.0, 0.0));
        drawing.handle(&mut store, click(1.0, 1.0));

        // Toolbar switches tools directly on the store.
        store.set_selected_tool(SelectedTool::Pan);
        let commands = drawing.handle(&mut store, click(2.0, 2.0));

        assert_eq!(commands, vec![DrawCommand::ClearPreview]);
        assert_eq!(drawing.state(), &DrawState::Idle);
        assert_eq!(store.feature_count(), 0);
    }

    #[test]
    fn test_idle_clicks_do_nothing() {
        let (mut store, mut drawing) = setup();
        let commands = drawing.handle(&mut store, click(0.0, 0.0));

        assert!(commands.is_empty());
        assert_eq!(store.feature_count(), 0);
    }

    #[test]
    fn test_polygon_commit_is_persisted() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = MapStore::open(Arc::clone(&storage));
        let mut drawing = DrawingController::new();

        drawing.select_tool(&mut store, SelectedTool::Polygon);
        for (lat, lng) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)] {
            drawing.handle(&mut store, click(lat, lng));
        }
        drawing.handle(&mut store, PointerEvent::DoubleClick(LatLng::new(1.0, 0.0)));

        let reopened = MapStore::open(storage);
        assert_eq!(reopened.feature_count(), 1);
        assert_eq!(reopened.features()[0].vertex_count(), 4);
    }
}
