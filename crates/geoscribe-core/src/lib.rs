//! geoscribe Core Library
//!
//! Platform-agnostic state and logic for authoring point and polygon features
//! on a map: the feature store with its persistence contract, the drawing
//! state machine, and geometry helpers.

pub mod drawing;
pub mod feature;
pub mod geometry;
pub mod persist;
pub mod storage;
pub mod store;
pub mod view;

pub use drawing::{DrawCommand, DrawNotice, DrawState, DrawingController, PointerEvent, SelectedTool};
pub use feature::{
    Feature, FeatureDraft, FeatureError, FeatureId, FeatureKind, FeatureProperties, Geometry,
};
pub use geometry::{LatLng, calculate_area, calculate_distance};
pub use persist::{DEFAULT_STORAGE_KEY, PersistedState};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use store::{MapStore, StoreConfig};
pub use view::{Layer, LayerVisibility, SearchResult, ViewState};
