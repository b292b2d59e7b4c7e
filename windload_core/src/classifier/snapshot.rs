//! Geodata feature snapshot (Overpass `out body geom` JSON).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A WGS84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        GeoPoint { lat, lon }
    }

    /// Reject coordinates outside WGS84 bounds or non-finite
    pub fn validated(lat: f64, lon: f64) -> CalcResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CalcError::invalid_input("lat", lat.to_string(), "Latitude must be within -90..90"));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CalcError::invalid_input("lon", lon.to_string(), "Longitude must be within -180..180"));
        }
        Ok(GeoPoint { lat, lon })
    }
}

/// One OSM element with its tags and inline geometry.
///
/// Relations carry their geometry on members, which is not read: they count
/// as features (e.g., a building) but contribute no area or vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OsmElement {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Vertex list; Overpass may emit `null` for vertices it could not resolve
    #[serde(default)]
    geometry: Vec<Option<GeoPoint>>,
}

impl OsmElement {
    /// Build an element from tags and a vertex list
    pub fn new(kind: &str, tags: &[(&str, &str)], geometry: Vec<GeoPoint>) -> Self {
        OsmElement {
            kind: kind.to_string(),
            id: 0,
            tags: tags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            geometry: geometry.into_iter().map(Some).collect(),
        }
    }

    /// Resolved vertices, in order
    pub fn vertices(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.geometry.iter().flatten().copied()
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// `landuse` = residential | industrial | commercial
    pub fn is_urban(&self) -> bool {
        self.tag("landuse").is_some_and(|v| {
            ["residential", "industrial", "commercial"]
                .iter()
                .any(|u| v.eq_ignore_ascii_case(u))
        })
    }

    /// `natural=water` or any `water=*`
    pub fn is_water(&self) -> bool {
        self.tag("natural") == Some("water") || self.tag("water").is_some()
    }

    /// `natural=coastline`
    pub fn is_coastline(&self) -> bool {
        self.tag("natural") == Some("coastline")
    }

    /// Any `building=*`
    pub fn is_building(&self) -> bool {
        self.tag("building").is_some()
    }

    /// Closed ring: at least 3 vertices and the last equals the first
    pub fn closed_ring(&self) -> Option<Vec<GeoPoint>> {
        let ring: Vec<GeoPoint> = self.vertices().collect();
        if ring.len() < 3 {
            return None;
        }
        let (first, last) = (ring[0], ring[ring.len() - 1]);
        (first.lat == last.lat && first.lon == last.lon).then_some(ring)
    }
}

/// All features returned for one site query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub elements: Vec<OsmElement>,
}

/// Overpass response envelope. A query that hits the server-side limit still
/// answers 200, with partial `elements` and a `remark` naming the error.
#[derive(Debug, Deserialize)]
struct OverpassPayload {
    elements: Vec<OsmElement>,
    #[serde(default)]
    remark: Option<String>,
}

impl FeatureSnapshot {
    pub fn new(elements: Vec<OsmElement>) -> Self {
        FeatureSnapshot { elements }
    }

    /// Parse an Overpass JSON response body.
    ///
    /// A body without `elements`, or one whose `remark` reports a runtime
    /// error (timeout, out of memory), is rejected rather than read as an
    /// empty or partial snapshot.
    pub fn from_overpass_json(body: &str) -> CalcResult<Self> {
        let payload: OverpassPayload = serde_json::from_str(body)
            .map_err(|e| CalcError::geodata_response(format!("malformed payload: {}", e)))?;
        if let Some(remark) = payload.remark.as_deref() {
            if remark.to_ascii_lowercase().contains("runtime error") {
                return Err(CalcError::geodata_response(format!("Overpass remark: {}", remark)));
            }
        }
        Ok(FeatureSnapshot { elements: payload.elements })
    }

    pub fn urban(&self) -> impl Iterator<Item = &OsmElement> {
        self.elements.iter().filter(|e| e.is_urban())
    }

    pub fn water(&self) -> impl Iterator<Item = &OsmElement> {
        self.elements.iter().filter(|e| e.is_water())
    }

    pub fn coastline(&self) -> impl Iterator<Item = &OsmElement> {
        self.elements.iter().filter(|e| e.is_coastline())
    }

    pub fn buildings(&self) -> impl Iterator<Item = &OsmElement> {
        self.elements.iter().filter(|e| e.is_building())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "way", "id": 1, "tags": {"building": "house"},
             "geometry": [{"lat": -33.0, "lon": 151.0}, {"lat": -33.0001, "lon": 151.0}]},
            {"type": "relation", "id": 2, "tags": {"building": "yes"}, "members": []},
            {"type": "way", "id": 3, "tags": {"landuse": "Residential"},
             "geometry": [{"lat": 0.0, "lon": 0.0}, null, {"lat": 0.0, "lon": 0.001}]},
            {"type": "way", "id": 4, "tags": {"natural": "coastline"}},
            {"type": "way", "id": 5, "tags": {"water": "lake"}},
            {"type": "way", "id": 6, "tags": {"landuse": "farmland"}}
        ]
    }"#;

    #[test]
    fn test_parse_and_partition() {
        let snapshot = FeatureSnapshot::from_overpass_json(SAMPLE).unwrap();
        assert_eq!(snapshot.elements.len(), 6);
        assert_eq!(snapshot.buildings().count(), 2);
        assert_eq!(snapshot.urban().count(), 1);
        assert_eq!(snapshot.coastline().count(), 1);
        assert_eq!(snapshot.water().count(), 1);
    }

    #[test]
    fn test_null_vertices_are_skipped() {
        let snapshot = FeatureSnapshot::from_overpass_json(SAMPLE).unwrap();
        let urban = snapshot.urban().next().unwrap();
        assert_eq!(urban.vertices().count(), 2);
    }

    #[test]
    fn test_missing_elements_is_rejected() {
        let err = FeatureSnapshot::from_overpass_json(r#"{"error": "busy"}"#).unwrap_err();
        assert_eq!(err.error_code(), "GEODATA_RESPONSE");
    }

    #[test]
    fn test_server_timeout_remark_is_rejected() {
        let body = r#"{
            "version": 0.6,
            "elements": [],
            "remark": "runtime error: Query timed out in \"query\" at line 3 after 15 seconds."
        }"#;
        let err = FeatureSnapshot::from_overpass_json(body).unwrap_err();
        assert_eq!(err.error_code(), "GEODATA_RESPONSE");
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_informational_remark_is_accepted() {
        let body = r#"{"elements": [], "remark": "runtime remark: Timeout is set to 15 seconds."}"#;
        let snapshot = FeatureSnapshot::from_overpass_json(body).unwrap();
        assert!(snapshot.elements.is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        let err = FeatureSnapshot::from_overpass_json("<html>busy</html>").unwrap_err();
        assert_eq!(err.error_code(), "GEODATA_RESPONSE");
    }

    #[test]
    fn test_closed_ring_detection() {
        let p = |lat, lon| GeoPoint::new(lat, lon);
        let closed = OsmElement::new("way", &[("natural", "water")], vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(0.0, 0.0)]);
        let open = OsmElement::new("way", &[("natural", "water")], vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0)]);
        let degenerate = OsmElement::new("way", &[("natural", "water")], vec![p(0.0, 0.0), p(0.0, 0.0)]);
        assert!(closed.closed_ring().is_some());
        assert!(open.closed_ring().is_none());
        assert!(degenerate.closed_ring().is_none());
    }

    #[test]
    fn test_geo_point_validation() {
        assert!(GeoPoint::validated(-33.86, 151.21).is_ok());
        assert!(GeoPoint::validated(91.0, 0.0).is_err());
        assert!(GeoPoint::validated(0.0, f64::NAN).is_err());
    }
}
