//! Viewport and display-layer state.

use crate::geometry::LatLng;
use serde::{Deserialize, Serialize};

/// Map center used when nothing else is known (North Rhine-Westphalia).
pub const DEFAULT_CENTER: LatLng = LatLng::new(51.478, 7.555);

/// Zoom level used when nothing else is known.
pub const DEFAULT_ZOOM: i32 = 10;

/// Zoom level applied when jumping to a geocoding result.
pub const SEARCH_RESULT_ZOOM: i32 = 12;

/// What part of the map is on screen.
///
/// Values are passed through as given: latitude, longitude and zoom are not
/// range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub center: LatLng,
    pub zoom: i32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ViewState {
    pub fn new(center: LatLng, zoom: i32) -> Self {
        Self { center, zoom }
    }
}

/// Display layers that can be switched on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layer {
    Satellite,
    DrawnFeatures,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Satellite, Layer::DrawnFeatures];

    /// Name used in the persisted record.
    pub fn name(&self) -> &'static str {
        match self {
            Layer::Satellite => "satellite",
            Layer::DrawnFeatures => "drawnFeatures",
        }
    }
}

/// Visibility flag per [`Layer`]. Every layer starts visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerVisibility {
    #[serde(default = "visible")]
    pub satellite: bool,
    #[serde(default = "visible")]
    pub drawn_features: bool,
}

fn visible() -> bool {
    true
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self {
            satellite: true,
            drawn_features: true,
        }
    }
}

impl LayerVisibility {
    pub fn is_visible(&self, layer: Layer) -> bool {
        match layer {
            Layer::Satellite => self.satellite,
            Layer::DrawnFeatures => self.drawn_features,
        }
    }

    /// Copy with `layer` flipped.
    pub fn toggled(mut self, layer: Layer) -> Self {
        let flag = match layer {
            Layer::Satellite => &mut self.satellite,
            Layer::DrawnFeatures => &mut self.drawn_features,
        };
        *flag = !*flag;
        self
    }
}

/// Top hit of an external place search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub display_name: String,
    pub position: LatLng,
}
