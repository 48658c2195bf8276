//! Vector features authored on the map.

use crate::geometry::{LatLng, calculate_area, ring_length};
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for features.
pub type FeatureId = Uuid;

/// Minimum number of vertices a polygon needs.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Reasons a feature is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Polygon needs at least {need} vertices, has {have}")]
    TooFewVertices { have: usize, need: usize },
    #[error("Coordinates do not match feature type '{0}'")]
    CoordinateMismatch(&'static str),
}

/// Feature geometry.
///
/// Polygon rings are stored open: the first vertex is not repeated at the end.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LatLng),
    Polygon(Vec<LatLng>),
}

/// Geometry kind, without the coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Point,
    Polygon,
}

impl FeatureKind {
    /// Human-readable label, also used as the auto-name prefix.
    pub fn label(&self) -> &'static str {
        match self {
            FeatureKind::Point => "Point",
            FeatureKind::Polygon => "Polygon",
        }
    }
}

impl Geometry {
    pub fn kind(&self) -> FeatureKind {
        match self {
            Geometry::Point(_) => FeatureKind::Point,
            Geometry::Polygon(_) => FeatureKind::Polygon,
        }
    }

    /// All vertices in order.
    pub fn vertices(&self) -> &[LatLng] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::Polygon(ring) => ring,
        }
    }

    /// Check the vertex-count invariant: polygons need at least
    /// [`MIN_POLYGON_VERTICES`] vertices.
    pub fn validate(&self) -> Result<(), FeatureError> {
        match self {
            Geometry::Polygon(ring) if ring.len() < MIN_POLYGON_VERTICES => {
                Err(FeatureError::TooFewVertices {
                    have: ring.len(),
                    need: MIN_POLYGON_VERTICES,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Descriptive properties attached to a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FeatureProperties {
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            description: None,
            created_at,
        }
    }
}

/// A feature that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDraft {
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl FeatureDraft {
    pub fn point(position: LatLng, properties: FeatureProperties) -> Self {
        Self {
            geometry: Geometry::Point(position),
            properties,
        }
    }

    pub fn polygon(ring: Vec<LatLng>, properties: FeatureProperties) -> Self {
        Self {
            geometry: Geometry::Polygon(ring),
            properties,
        }
    }
}

/// A committed feature.
///
/// Serialized as `{"id", "type", "coordinates", "properties"}` where
/// `coordinates` is a single `[lat, lng]` pair for points and a list of
/// pairs for polygons. Ids must be UUIDs; records keyed by any other id form
/// (such as timestamp strings) fail to load and are replaced by defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawFeature", try_from = "RawFeature")]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

/// Wire form of [`Feature`].
#[derive(Serialize, Deserialize)]
struct RawFeature {
    id: FeatureId,
    #[serde(rename = "type")]
    kind: FeatureKind,
    coordinates: RawCoordinates,
    properties: FeatureProperties,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawCoordinates {
    Single(LatLng),
    Ring(Vec<LatLng>),
}

impl From<Feature> for RawFeature {
    fn from(feature: Feature) -> Self {
        let kind = feature.kind();
        let coordinates = match feature.geometry {
            Geometry::Point(p) => RawCoordinates::Single(p),
            Geometry::Polygon(ring) => RawCoordinates::Ring(ring),
        };
        Self {
            id: feature.id,
            kind,
            coordinates,
            properties: feature.properties,
        }
    }
}

impl TryFrom<RawFeature> for Feature {
    type Error = FeatureError;

    fn try_from(raw: RawFeature) -> Result<Self, Self::Error> {
        let geometry = match (raw.kind, raw.coordinates) {
            (FeatureKind::Point, RawCoordinates::Single(p)) => Geometry::Point(p),
            (FeatureKind::Polygon, RawCoordinates::Ring(ring)) => Geometry::Polygon(ring),
            (kind, _) => return Err(FeatureError::CoordinateMismatch(kind.label())),
        };
        geometry.validate()?;
        Ok(Self {
            id: raw.id,
            geometry,
            properties: raw.properties,
        })
    }
}

impl Feature {
    /// Attach a freshly generated id to a draft.
    pub(crate) fn from_draft(draft: FeatureDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry: draft.geometry,
            properties: draft.properties,
        }
    }

    pub fn kind(&self) -> FeatureKind {
        self.geometry.kind()
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertices().len()
    }

    /// Planar area of a polygon in square degrees; `None` for points.
    ///
    /// See [`calculate_area`] for the projection caveat.
    pub fn area(&self) -> Option<f64> {
        match &self.geometry {
            Geometry::Polygon(ring) => {
                let points: Vec<Point> = ring.iter().map(|p| p.to_point()).collect();
                Some(calculate_area(&points))
            }
            Geometry::Point(_) => None,
        }
    }

    /// Great-circle perimeter of a polygon in kilometres; `None` for points.
    pub fn perimeter_km(&self) -> Option<f64> {
        match &self.geometry {
            Geometry::Polygon(ring) => Some(ring_length(ring)),
            Geometry::Point(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(name: &str) -> FeatureProperties {
        FeatureProperties::new(name, Utc::now())
    }

    #[test]
    fn test_point_serialization_shape() {
        let feature = Feature::from_draft(FeatureDraft::point(LatLng::new(52.52, 13.405), props("Test Point")));
        let value = serde_json::to_value(&feature).unwrap();

        assert_eq!(value["type"], "point");
        assert_eq!(value["coordinates"], serde_json::json!([52.52, 13.405]));
        assert_eq!(value["properties"]["name"], "Test Point");
        assert!(value["properties"].get("createdAt").is_some());
        assert!(value["properties"].get("description").is_none());
    }

    #[test]
    fn test_polygon_json_roundtrip() {
        let ring = vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 4.0), LatLng::new(3.0, 0.0)];
        let mut feature = Feature::from_draft(FeatureDraft::polygon(ring, props("Field")));
        feature.properties.description = Some("north pasture".to_string());

        let json = serde_json::to_string(&feature).unwrap();
        let back: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, feature);
    }

    #[test]
    fn test_mismatched_coordinates_rejected() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "type": "polygon",
            "coordinates": [1.0, 2.0],
            "properties": {"name": "bad", "createdAt": "2024-05-01T12:00:00Z"}
        }"#;
        assert!(serde_json::from_str::<Feature>(json).is_err());
    }

    #[test]
    fn test_short_polygon_ring_rejected() {
        let json = r#"{
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "type": "polygon",
            "coordinates": [[1.0, 2.0], [3.0, 4.0]],
            "properties": {"name": "sliver", "createdAt": "2024-05-01T12:00:00Z"}
        }"#;
        assert!(serde_json::from_str::<Feature>(json).is_err());

        let empty = Geometry::Polygon(Vec::new());
        assert_eq!(
            empty.validate(),
            Err(FeatureError::TooFewVertices { have: 0, need: 3 })
        );
        assert!(Geometry::Point(LatLng::default()).validate().is_ok());
    }

    #[test]
    fn test_timestamp_ids_do_not_parse() {
        let json = r#"{
            "id": "1714566000000",
            "type": "point",
            "coordinates": [1.0, 2.0],
            "properties": {"name": "legacy", "createdAt": "2024-05-01T12:00:00Z"}
        }"#;
        assert!(serde_json::from_str::<Feature>(json).is_err());
    }

    #[test]
    fn test_unique_ids() {
        let a = Feature::from_draft(FeatureDraft::point(LatLng::default(), props("a")));
        let b = Feature::from_draft(FeatureDraft::point(LatLng::default(), props("b")));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_measurements() {
        let point = Feature::from_draft(FeatureDraft::point(LatLng::default(), props("p")));
        assert_eq!(point.kind(), FeatureKind::Point);
        assert_eq!(point.vertex_count(), 1);
        assert_eq!(point.area(), None);
        assert_eq!(point.perimeter_km(), None);

        // lat/lng swapped relative to (x, y): the triangle still spans 4 x 3.
        let ring = vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 4.0), LatLng::new(3.0, 0.0)];
        let polygon = Feature::from_draft(FeatureDraft::polygon(ring, props("t")));
        assert_eq!(polygon.kind(), FeatureKind::Polygon);
        assert_eq!(polygon.vertex_count(), 3);
        assert_eq!(polygon.area(), Some(6.0));
        assert!(polygon.perimeter_km().unwrap() > 0.0);
    }
}
