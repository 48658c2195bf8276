//! Geographic coordinates and pure measurement helpers.
//!
//! Area is computed with the shoelace formula directly on the raw coordinate
//! values. No map projection is applied, so for latitude/longitude input the
//! result is in "square degrees" and is only meaningful as a local
//! approximation over small extents. Distances use the haversine formula on a
//! spherical Earth.
//!
//! None of these functions validate their input: non-finite values propagate
//! through to a `NaN` result.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in degrees.
///
/// Serialized as a two-element `[lat, lng]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Planar view of this position (x = longitude, y = latitude).
    pub fn to_point(self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(pos: LatLng) -> Self {
        [pos.lat, pos.lng]
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Planar area enclosed by an implicitly closed ring.
///
/// The last vertex connects back to the first. Rings with fewer than three
/// vertices have no area and return `0.0`. The result is always
/// non-negative regardless of winding direction.
pub fn calculate_area(ring: &[Point]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let sum: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();

    sum.abs() / 2.0
}

/// Great-circle distance between two positions, in kilometres.
pub fn calculate_distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Length of a closed ring along great circles, in kilometres.
///
/// Includes the closing edge from the last vertex back to the first.
/// Fewer than two vertices yield `0.0`.
pub fn ring_length(ring: &[LatLng]) -> f64 {
    if ring.len() < 2 {
        return 0.0;
    }

    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(&a, &b)| calculate_distance(a, b))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_area() {
        let ring = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0)];
        assert_eq!(calculate_area(&ring), 6.0);
    }

    #[test]
    fn test_area_degenerate_rings() {
        assert_eq!(calculate_area(&[]), 0.0);
        assert_eq!(calculate_area(&[Point::new(1.0, 1.0)]), 0.0);
        assert_eq!(calculate_area(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_area_ignores_winding() {
        let ccw = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        let mut cw = ccw;
        cw.reverse();
        assert_eq!(calculate_area(&ccw), 4.0);
        assert_eq!(calculate_area(&cw), 4.0);
    }

    #[test]
    fn test_area_propagates_nan() {
        let ring = [Point::new(0.0, 0.0), Point::new(f64::NAN, 0.0), Point::new(0.0, 3.0)];
        assert!(calculate_area(&ring).is_nan());
    }

    #[test]
    fn test_distance_same_point() {
        let berlin = LatLng::new(52.52, 13.405);
        assert_eq!(calculate_distance(berlin, berlin), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let berlin = LatLng::new(52.52, 13.405);
        let paris = LatLng::new(48.8566, 2.3522);
        assert_eq!(calculate_distance(berlin, paris), calculate_distance(paris, berlin));
    }

    #[test]
    fn test_distance_known_values() {
        // One degree of latitude is ~111.19 km on a 6371 km sphere.
        let d = calculate_distance(LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01, "got {d}");

        let berlin = LatLng::new(52.52, 13.405);
        let paris = LatLng::new(48.8566, 2.3522);
        let d = calculate_distance(berlin, paris);
        assert!((d - 878.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn test_distance_triangle_inequality() {
        let a = LatLng::new(51.478, 7.555);
        let b = LatLng::new(40.7128, -74.006);
        let c = LatLng::new(-33.8688, 151.2093);
        let ab = calculate_distance(a, b);
        let bc = calculate_distance(b, c);
        let ac = calculate_distance(a, c);
        assert!(ac <= ab + bc + 1e-9);
    }

    #[test]
    fn test_distance_propagates_nan() {
        let d = calculate_distance(LatLng::new(f64::NAN, 0.0), LatLng::new(1.0, 1.0));
        assert!(d.is_nan());
    }

    #[test]
    fn test_ring_length_includes_closing_edge() {
        let ring = [LatLng::new(0.0, 0.0), LatLng::new(1.0, 0.0)];
        let one_way = calculate_distance(ring[0], ring[1]);
        assert!((ring_length(&ring) - 2.0 * one_way).abs() < 1e-9);
        assert_eq!(ring_length(&ring[..1]), 0.0);
    }

    #[test]
    fn test_latlng_serializes_as_pair() {
        let json = serde_json::to_string(&LatLng::new(52.5, 13.4)).unwrap();
        assert_eq!(json, "[52.5,13.4]");
        let back: LatLng = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LatLng::new(52.5, 13.4));
    }
}
