//! # Terrain Classification
//!
//! Estimates the terrain category around a site from OpenStreetMap features.
//!
//! ```text
//! (lat, lon) ──Overpass──▶ FeatureSnapshot ──▶ TerrainSignals ──rules──▶ TerrainCategory
//! ```
//!
//! - [`snapshot`] - the feature payload and tag predicates
//! - [`signals`] - buffer areas, building density and distance to water
//! - [`rules`] - the ordered first-match rule table
//! - [`overpass`] - query text and HTTP client (feature `geodata`)
//!
//! Classifying a snapshot is a pure function of the snapshot. Fetching it is
//! the only network call in the crate; when it fails for any reason the
//! classifier answers [`FALLBACK_CATEGORY`] (TC2.5) instead of an error, so a
//! failed lookup never lands on the most exposed category.
//!
//! The category is advisory: an explicit terrain override on the wind input
//! always takes precedence.
//!
//! ## Example
//!
//! ```rust
//! use windload_core::classifier::{classify_snapshot, ClassifierConfig, FeatureSnapshot, GeoPoint};
//! use windload_core::tables::TerrainCategory;
//!
//! let snapshot = FeatureSnapshot::from_overpass_json(r#"{"elements": []}"#).unwrap();
//! let result = classify_snapshot(GeoPoint::new(-31.95, 115.86), &snapshot, &ClassifierConfig::default());
//! assert_eq!(result.category, TerrainCategory::Tc2);
//! assert_eq!(result.rule, "open-terrain");
//! ```

pub mod overpass;
pub mod rules;
pub mod signals;
pub mod snapshot;

pub use rules::{evaluate, TerrainRule, RULES};
pub use signals::TerrainSignals;
pub use snapshot::{FeatureSnapshot, GeoPoint, OsmElement};

#[cfg(feature = "geodata")]
pub use overpass::OverpassClient;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
#[cfg(feature = "geodata")]
use tracing::warn;

use crate::tables::TerrainCategory;

/// Category returned when the feature query fails
pub const FALLBACK_CATEGORY: TerrainCategory = TerrainCategory::Tc2Point5;

/// Rule name reported for a fallback result
pub const FALLBACK_RULE: &str = "query-failed";

/// Public Overpass interpreter
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Extra time the HTTP client waits beyond the server-side query limit (s)
pub const CLIENT_TIMEOUT_MARGIN_SECS: u64 = 5;

/// Classifier settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Overpass interpreter URL
    pub endpoint: String,
    /// Server-side query limit passed to Overpass as `[timeout:N]` (s)
    pub timeout_secs: u64,
    /// Buffer for buildings and urban landuse (m)
    pub urban_radius_m: f64,
    /// Buffer for water and coastline (m)
    pub water_radius_m: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            endpoint: DEFAULT_OVERPASS_URL.to_string(),
            timeout_secs: 15,
            urban_radius_m: 500.0,
            water_radius_m: 1000.0,
        }
    }
}

impl ClassifierConfig {
    /// Server-side query limit
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client timeout. Always longer than [`timeout`](Self::timeout), so an
    /// overrunning query comes back as an Overpass error remark first.
    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.saturating_add(CLIENT_TIMEOUT_MARGIN_SECS))
    }
}

/// Where a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationSource {
    /// Rules evaluated over a fetched snapshot
    Classified,
    /// The feature query failed
    Fallback,
}

/// Outcome of classifying a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainClassification {
    pub category: TerrainCategory,
    /// Name of the matching rule, or `query-failed`
    pub rule: String,
    pub source: ClassificationSource,
    /// Signals the rules saw (absent on fallback)
    pub signals: Option<TerrainSignals>,
}

impl TerrainClassification {
    /// The fixed result for a failed query
    pub fn fallback() -> Self {
        TerrainClassification {
            category: FALLBACK_CATEGORY,
            rule: FALLBACK_RULE.to_string(),
            source: ClassificationSource::Fallback,
            signals: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ClassificationSource::Fallback
    }
}

/// Classify a site from an already-fetched snapshot
pub fn classify_snapshot(site: GeoPoint, snapshot: &FeatureSnapshot, config: &ClassifierConfig) -> TerrainClassification {
    let signals = TerrainSignals::from_snapshot(site, snapshot, config.urban_radius_m);
    let rule = evaluate(&signals);
    debug!(
        lat = site.lat,
        lon = site.lon,
        buildings = signals.building_count,
        buildings_per_ha = signals.buildings_per_ha,
        urban_fraction = signals.urban_fraction,
        water_fraction = signals.water_fraction,
        distance_to_water_m = ?signals.distance_to_water_m,
        rule = rule.name,
        category = %rule.category,
        "terrain classified"
    );
    TerrainClassification {
        category: rule.category,
        rule: rule.name.to_string(),
        source: ClassificationSource::Classified,
        signals: Some(signals),
    }
}

/// Live classifier: one Overpass request per call.
#[cfg(feature = "geodata")]
#[derive(Debug, Clone)]
pub struct TerrainClassifier {
    client: OverpassClient,
}

#[cfg(feature = "geodata")]
impl TerrainClassifier {
    pub fn new(config: ClassifierConfig) -> crate::errors::CalcResult<Self> {
        Ok(TerrainClassifier {
            client: OverpassClient::new(config)?,
        })
    }

    /// Classify the site at (lat, lon). Never fails; see [`FALLBACK_CATEGORY`].
    pub async fn classify(&self, lat: f64, lon: f64) -> TerrainClassification {
        let site = match GeoPoint::validated(lat, lon) {
            Ok(site) => site,
            Err(e) => {
                warn!(error = %e, "invalid site coordinates, using fallback terrain");
                return TerrainClassification::fallback();
            }
        };

        match self.client.fetch(site).await {
            Ok(snapshot) => classify_snapshot(site, &snapshot, self.client.config()),
            Err(e) => {
                warn!(
                    lat,
                    lon,
                    code = e.error_code(),
                    error = %e,
                    fallback = %FALLBACK_CATEGORY,
                    "terrain query failed, using fallback terrain"
                );
                TerrainClassification::fallback()
            }
        }
    }
}

/// Classify one site with a freshly built client
#[cfg(feature = "geodata")]
pub async fn classify_site(config: ClassifierConfig, lat: f64, lon: f64) -> TerrainClassification {
    match TerrainClassifier::new(config) {
        Ok(classifier) => classifier.classify(lat, lon).await,
        Err(e) => {
            warn!(error = %e, "could not build terrain classifier, using fallback terrain");
            TerrainClassification::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::signals::METRES_PER_DEG_LAT;

    fn buildings(n: usize) -> Vec<OsmElement> {
        (0..n).map(|_| OsmElement::new("way", &[("building", "yes")], vec![])).collect()
    }

    #[test]
    fn test_dense_suburb_snapshot() {
        // 943 buildings / 78.54 ha ≈ 12 per ha
        let snapshot = FeatureSnapshot::new(buildings(943));
        let result = classify_snapshot(GeoPoint::new(-37.8, 144.9), &snapshot, &ClassifierConfig::default());
        assert_eq!(result.category, TerrainCategory::Tc3);
        assert_eq!(result.source, ClassificationSource::Classified);
        assert!(result.signals.is_some());
    }

    #[test]
    fn test_beachfront_snapshot() {
        let site = GeoPoint::new(-28.0, 153.43);
        let mut elements = buildings(236); // ≈ 3 per ha
        elements.push(OsmElement::new(
            "way",
            &[("natural", "coastline")],
            vec![GeoPoint::new(site.lat + 100.0 / METRES_PER_DEG_LAT, site.lon)],
        ));
        let result = classify_snapshot(site, &FeatureSnapshot::new(elements), &ClassifierConfig::default());
        assert_eq!(result.category, TerrainCategory::Tc1);
        assert_eq!(result.rule, "coastal-exposed");
    }

    #[test]
    fn test_classification_is_deterministic() {
        let snapshot = FeatureSnapshot::new(buildings(400));
        let site = GeoPoint::new(-34.9, 138.6);
        let config = ClassifierConfig::default();
        assert_eq!(classify_snapshot(site, &snapshot, &config), classify_snapshot(site, &snapshot, &config));
    }

    #[test]
    fn test_fallback_is_mid_category() {
        let fallback = TerrainClassification::fallback();
        assert_eq!(fallback.category, TerrainCategory::Tc2Point5);
        assert!(fallback.is_fallback());
        assert!(fallback.signals.is_none());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: ClassifierConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.endpoint, DEFAULT_OVERPASS_URL);
        assert_eq!(config.urban_radius_m, 500.0);
    }

    #[test]
    fn test_client_outlasts_server_limit() {
        for timeout_secs in [0, 1, 15, 180] {
            let config = ClassifierConfig { timeout_secs, ..ClassifierConfig::default() };
            assert!(config.client_timeout() > config.timeout());
        }
        assert_eq!(ClassifierConfig::default().client_timeout(), Duration::from_secs(20));
    }

    /// Serve one canned HTTP response on a loopback port and return its
    /// interpreter URL.
    #[cfg(feature = "geodata")]
    async fn serve_once(status: &'static str, content_type: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            // Drain the request (headers, then Content-Length bytes of query)
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let Ok(n) = socket.read(&mut chunk).await else { return };
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .filter_map(|line| line.split_once(':'))
                        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}/api/interpreter", addr)
    }

    #[cfg(feature = "geodata")]
    fn local_config(endpoint: String) -> ClassifierConfig {
        ClassifierConfig { endpoint, timeout_secs: 2, ..ClassifierConfig::default() }
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_valid_payload_is_classified() {
        let endpoint = serve_once("200 OK", "application/json", r#"{"version": 0.6, "elements": []}"#).await;
        let result = classify_site(local_config(endpoint), -31.95, 115.86).await;
        assert_eq!(result.source, ClassificationSource::Classified);
        assert_eq!(result.category, TerrainCategory::Tc2);
        assert_eq!(result.rule, "open-terrain");
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_gateway_timeout_falls_back() {
        let endpoint = serve_once("504 Gateway Timeout", "text/html", "<html>timeout</html>").await;
        let result = classify_site(local_config(endpoint), -31.95, 115.86).await;
        assert!(result.is_fallback());
        assert_eq!(result.category, FALLBACK_CATEGORY);
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_html_body_falls_back() {
        let endpoint = serve_once("200 OK", "text/html", "<html>busy</html>").await;
        let result = classify_site(local_config(endpoint), -31.95, 115.86).await;
        assert!(result.is_fallback());
        assert_eq!(result.category, FALLBACK_CATEGORY);
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_server_timeout_remark_falls_back() {
        let endpoint = serve_once(
            "200 OK",
            "application/json",
            r#"{"version": 0.6, "elements": [], "remark": "runtime error: Query timed out in \"query\" at line 3 after 2 seconds."}"#,
        )
        .await;
        let result = classify_site(local_config(endpoint), -31.95, 115.86).await;
        assert!(result.is_fallback());
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert_eq!(result.rule, FALLBACK_RULE);
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_body_without_elements_falls_back() {
        let endpoint = serve_once("200 OK", "application/json", r#"{"error": "busy"}"#).await;
        let result = classify_site(local_config(endpoint), -31.95, 115.86).await;
        assert!(result.is_fallback());
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back() {
        let config = ClassifierConfig {
            endpoint: "http://127.0.0.1:9/api/interpreter".to_string(),
            timeout_secs: 2,
            ..ClassifierConfig::default()
        };
        let result = classify_site(config, -33.86, 151.21).await;
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert_eq!(result.source, ClassificationSource::Fallback);
    }

    #[cfg(feature = "geodata")]
    #[tokio::test]
    async fn test_invalid_coordinates_fall_back_without_request() {
        let result = classify_site(ClassifierConfig::default(), 123.0, 0.0).await;
        assert!(result.is_fallback());
    }
}
