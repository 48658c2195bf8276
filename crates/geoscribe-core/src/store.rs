//! Map state container.
//!
//! [`MapStore`] is the single source of truth for the viewport, layer
//! visibility, committed features, the selected tool and the loading flag.
//! Features and layers are written through to storage after every change;
//! everything else lives only in memory.

use crate::drawing::SelectedTool;
use crate::feature::{Feature, FeatureDraft, FeatureError, FeatureId};
use crate::geometry::LatLng;
use crate::persist::{self, DEFAULT_STORAGE_KEY, PersistedState};
use crate::storage::Storage;
use crate::view::{Layer, LayerVisibility, SEARCH_RESULT_ZOOM, SearchResult, ViewState};
use std::sync::Arc;

/// Store construction settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Key the persisted subset is stored under.
    pub storage_key: String,
    /// Viewport used on every start (the viewport is never persisted).
    pub default_view: ViewState,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_view: ViewState::default(),
        }
    }
}

/// Map state plus its persistence round-trip.
pub struct MapStore<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    config: StoreConfig,
    view: ViewState,
    layers: LayerVisibility,
    /// Committed features in insertion (z-)order. Replaced, never edited in
    /// place while a reader holds a snapshot.
    features: Arc<Vec<Feature>>,
    selected_tool: SelectedTool,
    is_loading: bool,
}

impl<S: Storage> MapStore<S> {
    /// Open a store with the default configuration.
    pub fn open(storage: Arc<S>) -> Self {
        Self::open_with_config(storage, StoreConfig::default())
    }

    /// Open a store, restoring the persisted subset from `storage`.
    ///
    /// A missing or unreadable record silently yields an empty store.
    pub fn open_with_config(storage: Arc<S>, config: StoreConfig) -> Self {
        let PersistedState {
            drawn_features,
            layers,
        } = persist::load(storage.as_ref(), &config.storage_key);

        Self {
            storage,
            view: config.default_view,
            config,
            layers,
            features: Arc::new(drawn_features),
            selected_tool: SelectedTool::None,
            is_loading: false,
        }
    }

    // --- viewport ---

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn center(&self) -> LatLng {
        self.view.center
    }

    pub fn zoom(&self) -> i32 {
        self.view.zoom
    }

    pub fn set_center(&mut self, center: LatLng) {
        log::debug!("center -> ({}, {})", center.lat, center.lng);
        self.view.center = center;
    }

    pub fn set_zoom(&mut self, zoom: i32) {
        log::debug!("zoom -> {}", zoom);
        self.view.zoom = zoom;
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.view.zoom.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.view.zoom.saturating_sub(1));
    }

    /// Jump to a place-search hit.
    pub fn focus_search_result(&mut self, result: &SearchResult) {
        log::info!("Moving to '{}'", result.display_name);
        self.set_center(result.position);
        self.set_zoom(SEARCH_RESULT_ZOOM);
    }

    // --- layers ---

    pub fn layers(&self) -> LayerVisibility {
        self.layers
    }

    pub fn is_layer_visible(&self, layer: Layer) -> bool {
        self.layers.is_visible(layer)
    }

    pub fn toggle_layer(&mut self, layer: Layer) {
        self.layers = self.layers.toggled(layer);
        log::debug!("layer {} -> {}", layer.name(), self.layers.is_visible(layer));
        self.persist();
    }

    // --- features ---

    /// Snapshot of the committed features in z-order.
    ///
    /// Later mutations never affect a snapshot already handed out.
    pub fn features(&self) -> Arc<Vec<Feature>> {
        Arc::clone(&self.features)
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == id)
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Commit a feature and return its newly assigned id.
    ///
    /// Polygons with fewer than three vertices are rejected and nothing is
    /// stored.
    pub fn add_feature(&mut self, draft: FeatureDraft) -> Result<FeatureId, FeatureError> {
        if let Err(e) = draft.geometry.validate() {
            log::warn!("Rejected '{}': {}", draft.properties.name, e);
            return Err(e);
        }
        let feature = Feature::from_draft(draft);
        let id = feature.id;
        log::info!("Added {} '{}' ({})", feature.kind().label(), feature.name(), id);
        Arc::make_mut(&mut self.features).push(feature);
        self.persist();
        Ok(id)
    }

    /// Remove a feature by id. Unknown ids are ignored.
    ///
    /// Returns whether a feature was removed.
    pub fn remove_feature(&mut self, id: FeatureId) -> bool {
        let Some(index) = self.features.iter().position(|f| f.id == id) else {
            log::debug!("remove_feature: no feature {}", id);
            return false;
        };
        let removed = Arc::make_mut(&mut self.features).remove(index);
        log::info!("Removed {} '{}' ({})", removed.kind().label(), removed.name(), id);
        self.persist();
        true
    }

    pub fn clear_all_features(&mut self) {
        log::info!("Clearing {} features", self.features.len());
        self.features = Arc::new(Vec::new());
        self.persist();
    }

    // --- tool and loading flag ---

    pub fn selected_tool(&self) -> SelectedTool {
        self.selected_tool
    }

    pub fn set_selected_tool(&mut self, tool: SelectedTool) {
        log::debug!("tool -> {:?}", tool);
        self.selected_tool = tool;
    }

    /// Toolbar behaviour: picking the active tool again deselects it.
    pub fn toggle_tool(&mut self, tool: SelectedTool) {
        let next = if self.selected_tool == tool {
            SelectedTool::None
        } else {
            tool
        };
        self.set_selected_tool(next);
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    // --- persistence ---

    /// Copy of the durable subset.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            drawn_features: self.features.as_ref().clone(),
            layers: self.layers,
        }
    }

    /// Write features and layers through to storage. Failures are logged and
    /// the in-memory change stands.
    fn persist(&self) {
        if let Err(e) = persist::save(
            self.storage.as_ref(),
            &self.config.storage_key,
            &self.features,
            &self.layers,
        ) {
            log::error!("Failed to persist map state: {}", e);
        }
    }
}
