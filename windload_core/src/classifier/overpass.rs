//! Overpass API query and client.
//!
//! One classification issues exactly one POST to the configured interpreter
//! endpoint. The query body is sent as raw Overpass QL.

use super::snapshot::GeoPoint;
use super::ClassifierConfig;

#[cfg(feature = "geodata")]
use super::snapshot::FeatureSnapshot;
#[cfg(feature = "geodata")]
use crate::errors::{CalcError, CalcResult};

/// Overpass QL for urban landuse and buildings within the urban radius and
/// water/coastline within the water radius of `site`.
pub fn build_query(site: GeoPoint, config: &ClassifierConfig) -> String {
    let GeoPoint { lat, lon } = site;
    let r = config.urban_radius_m;
    let w = config.water_radius_m;
    format!(
        "[out:json][timeout:{timeout}];\n\
         (\n  \
           way(around:{r},{lat},{lon})[\"landuse\"~\"residential|industrial|commercial\"];\n  \
           relation(around:{r},{lat},{lon})[\"landuse\"~\"residential|industrial|commercial\"];\n  \
           way(around:{w},{lat},{lon})[\"natural\"=\"water\"];\n  \
           relation(around:{w},{lat},{lon})[\"natural\"=\"water\"];\n  \
           way(around:{w},{lat},{lon})[\"water\"];\n  \
           relation(around:{w},{lat},{lon})[\"water\"];\n  \
           way(around:{w},{lat},{lon})[\"natural\"=\"coastline\"];\n  \
           way(around:{r},{lat},{lon})[\"building\"];\n  \
           relation(around:{r},{lat},{lon})[\"building\"];\n\
         );\n\
         out body geom;\n",
        timeout = config.timeout_secs,
    )
}

/// HTTP client for the Overpass interpreter
#[cfg(feature = "geodata")]
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: reqwest::Client,
    config: ClassifierConfig,
}

#[cfg(feature = "geodata")]
impl OverpassClient {
    /// Build a client that waits a little longer than the server-side limit
    pub fn new(config: ClassifierConfig) -> CalcResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("windload/", env!("CARGO_PKG_VERSION")))
            .timeout(config.client_timeout())
            .build()
            .map_err(|e| CalcError::geodata_request(format!("failed to create HTTP client: {}", e)))?;
        Ok(OverpassClient { http, config })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Fetch the feature snapshot around `site`
    pub async fn fetch(&self, site: GeoPoint) -> CalcResult<FeatureSnapshot> {
        let query = build_query(site, &self.config);

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(query)
            .send()
            .await
            .map_err(|e| CalcError::geodata_request(format!("network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(CalcError::geodata_response(format!("Overpass returned {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CalcError::geodata_request(format!("failed to read response: {}", e)))?;

        FeatureSnapshot::from_overpass_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_uses_both_radii() {
        let config = ClassifierConfig::default();
        let q = build_query(GeoPoint::new(-33.5, 151.25), &config);
        assert!(q.starts_with("[out:json][timeout:15];"));
        assert!(q.contains("way(around:500,-33.5,151.25)[\"building\"]"));
        assert!(q.contains("way(around:1000,-33.5,151.25)[\"natural\"=\"coastline\"]"));
        assert!(q.contains("relation(around:500,-33.5,151.25)[\"landuse\"~\"residential|industrial|commercial\"]"));
        assert!(q.trim_end().ends_with("out body geom;"));
    }
}
