//! Signals derived from a feature snapshot.
//!
//! Geometry uses a local equirectangular projection, which is accurate enough
//! at the 500 m - 1 km scale of a site buffer.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::snapshot::{FeatureSnapshot, GeoPoint, OsmElement};

/// Metres per degree of latitude
pub const METRES_PER_DEG_LAT: f64 = 111_320.0;

const SQ_M_PER_HECTARE: f64 = 10_000.0;

/// Metres per degree of longitude at `lat_deg`
pub fn metres_per_deg_lon(lat_deg: f64) -> f64 {
    METRES_PER_DEG_LAT * lat_deg.to_radians().cos()
}

/// Planar distance between two points (m)
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let m_per_lon = metres_per_deg_lon((a.lat + b.lat) / 2.0);
    let dx = (b.lon - a.lon) * m_per_lon;
    let dy = (b.lat - a.lat) * METRES_PER_DEG_LAT;
    dx.hypot(dy)
}

/// Shoelace area of a ring (m²), projected about its first vertex's latitude
pub fn ring_area_m2(ring: &[GeoPoint]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let m_per_lon = metres_per_deg_lon(ring[0].lat);
    let xy: Vec<(f64, f64)> = ring
        .iter()
        .map(|p| (p.lon * m_per_lon, p.lat * METRES_PER_DEG_LAT))
        .collect();

    let twice_area: f64 = (0..xy.len())
        .map(|i| {
            let (x0, y0) = xy[i];
            let (x1, y1) = xy[(i + 1) % xy.len()];
            x0 * y1 - x1 * y0
        })
        .sum();
    twice_area.abs() / 2.0
}

/// Summed area of the closed rings among `elements`; open ways are ignored
fn closed_area_m2<'a>(elements: impl Iterator<Item = &'a OsmElement>) -> f64 {
    elements.filter_map(|e| e.closed_ring()).map(|ring| ring_area_m2(&ring)).sum()
}

/// Nearest vertex distance from `site` over `elements`
fn nearest_vertex_m<'a>(site: GeoPoint, elements: impl Iterator<Item = &'a OsmElement>) -> Option<f64> {
    elements
        .flat_map(|e| e.vertices())
        .map(|v| distance_m(site, v))
        .fold(None, |best: Option<f64>, d| Some(best.map_or(d, |b| b.min(d))))
}

/// Everything the terrain rules look at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSignals {
    /// Area of the circular site buffer (m²)
    pub buffer_area_m2: f64,
    /// Closed urban-landuse polygon area (m²)
    pub urban_area_m2: f64,
    /// Closed water polygon area (m²)
    pub water_area_m2: f64,
    /// Urban area / buffer area, at most 1
    pub urban_fraction: f64,
    /// Water area / buffer area, at most 1
    pub water_fraction: f64,
    /// Building features in the snapshot
    pub building_count: usize,
    /// Buildings per hectare of buffer
    pub buildings_per_ha: f64,
    /// Distance to the nearest water or coastline vertex (m); `None` if there is none
    pub distance_to_water_m: Option<f64>,
}

impl TerrainSignals {
    /// Derive signals for `site` from a snapshot taken over a buffer of `radius_m`
    pub fn from_snapshot(site: GeoPoint, snapshot: &FeatureSnapshot, radius_m: f64) -> Self {
        let buffer_area_m2 = PI * radius_m * radius_m;
        let urban_area_m2 = closed_area_m2(snapshot.urban());
        let water_area_m2 = closed_area_m2(snapshot.water());
        let building_count = snapshot.buildings().count();

        let coast = nearest_vertex_m(site, snapshot.coastline());
        let water = nearest_vertex_m(site, snapshot.water());
        let distance_to_water_m = match (coast, water) {
            (Some(c), Some(w)) => Some(c.min(w)),
            (c, w) => c.or(w),
        };

        TerrainSignals {
            buffer_area_m2,
            urban_area_m2,
            water_area_m2,
            urban_fraction: (urban_area_m2 / buffer_area_m2).min(1.0),
            water_fraction: (water_area_m2 / buffer_area_m2).min(1.0),
            building_count,
            buildings_per_ha: building_count as f64 / (buffer_area_m2 / SQ_M_PER_HECTARE),
            distance_to_water_m,
        }
    }

    /// True when water/coastline lies within `limit_m`
    pub fn water_within(&self, limit_m: f64) -> bool {
        self.distance_to_water_m.is_some_and(|d| d <= limit_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Square of `side_m` with its south-west corner at (lat, lon), closed
    fn square(lat: f64, lon: f64, side_m: f64) -> Vec<GeoPoint> {
        let dlat = side_m / METRES_PER_DEG_LAT;
        let dlon = side_m / metres_per_deg_lon(lat);
        vec![
            GeoPoint::new(lat, lon),
            GeoPoint::new(lat, lon + dlon),
            GeoPoint::new(lat + dlat, lon + dlon),
            GeoPoint::new(lat + dlat, lon),
            GeoPoint::new(lat, lon),
        ]
    }

    #[test]
    fn test_distance_north() {
        let a = GeoPoint::new(-33.0, 151.0);
        let b = GeoPoint::new(-33.0 + 100.0 / METRES_PER_DEG_LAT, 151.0);
        assert!((distance_m(a, b) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_ring_area_square() {
        let ring = square(0.0, 0.0, 100.0);
        assert!((ring_area_m2(&ring) - 10_000.0).abs() < 1.0);
    }

    #[test]
    fn test_buffer_is_about_78_ha() {
        let signals = TerrainSignals::from_snapshot(GeoPoint::new(0.0, 0.0), &FeatureSnapshot::default(), 500.0);
        assert!((signals.buffer_area_m2 / 10_000.0 - 78.54).abs() < 0.01);
        assert_eq!(signals.building_count, 0);
        assert_eq!(signals.distance_to_water_m, None);
    }

    #[test]
    fn test_building_density() {
        let site = GeoPoint::new(-27.47, 153.02);
        let buildings: Vec<OsmElement> = (0..157)
            .map(|_| OsmElement::new("way", &[("building", "house")], vec![]))
            .collect();
        let signals = TerrainSignals::from_snapshot(site, &FeatureSnapshot::new(buildings), 500.0);
        // 157 / 78.54 ha ≈ 2.0
        assert!((signals.buildings_per_ha - 1.999).abs() < 0.01);
    }

    #[test]
    fn test_open_ways_contribute_no_area() {
        let site = GeoPoint::new(0.0, 0.0);
        let mut open = square(0.0, 0.0, 300.0);
        open.pop();
        let snapshot = FeatureSnapshot::new(vec![
            OsmElement::new("way", &[("landuse", "residential")], square(0.0, 0.0, 200.0)),
            OsmElement::new("way", &[("landuse", "commercial")], open),
        ]);
        let signals = TerrainSignals::from_snapshot(site, &snapshot, 500.0);
        assert!((signals.urban_area_m2 - 40_000.0).abs() < 5.0);
        assert!((signals.urban_fraction - 40_000.0 / signals.buffer_area_m2).abs() < 1e-4);
    }

    #[test]
    fn test_fractions_are_capped() {
        let site = GeoPoint::new(0.0, 0.0);
        let snapshot = FeatureSnapshot::new(vec![OsmElement::new(
            "way",
            &[("natural", "water")],
            square(-0.01, -0.01, 3_000.0),
        )]);
        let signals = TerrainSignals::from_snapshot(site, &snapshot, 500.0);
        assert_eq!(signals.water_fraction, 1.0);
    }

    #[test]
    fn test_distance_uses_coastline_and_water() {
        let site = GeoPoint::new(0.0, 0.0);
        let near = GeoPoint::new(150.0 / METRES_PER_DEG_LAT, 0.0);
        let far = GeoPoint::new(600.0 / METRES_PER_DEG_LAT, 0.0);
        let snapshot = FeatureSnapshot::new(vec![
            OsmElement::new("way", &[("natural", "coastline")], vec![far]),
            OsmElement::new("way", &[("water", "river")], vec![near]),
        ]);
        let signals = TerrainSignals::from_snapshot(site, &snapshot, 500.0);
        let d = signals.distance_to_water_m.unwrap();
        assert!((d - 150.0).abs() < 1e-6);
        assert!(signals.water_within(250.0));
        assert!(!signals.water_within(100.0));
    }
}
