//! Terrain categories.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Terrain category, ordered by increasing ground roughness.
///
/// `Ord` follows that ordering, so `TerrainCategory::Tc1 < TerrainCategory::Tc4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TerrainCategory {
    /// Exposed open terrain, open water, coastal foreshore
    #[serde(rename = "TC1")]
    Tc1,
    /// Open terrain with well-scattered obstructions
    #[serde(rename = "TC2")]
    Tc2,
    /// Developing outer urban areas, scattered housing
    #[serde(rename = "TC2.5")]
    Tc2Point5,
    /// Suburban housing, light industrial
    #[serde(rename = "TC3")]
    Tc3,
    /// City centres, large closely-spaced buildings
    #[serde(rename = "TC4")]
    Tc4,
}

impl TerrainCategory {
    /// All terrain categories, least to most obstructed
    pub const ALL: [TerrainCategory; 5] = [
        TerrainCategory::Tc1,
        TerrainCategory::Tc2,
        TerrainCategory::Tc2Point5,
        TerrainCategory::Tc3,
        TerrainCategory::Tc4,
    ];

    /// Table key (e.g., "TC2.5")
    pub fn code(&self) -> &'static str {
        match self {
            TerrainCategory::Tc1 => "TC1",
            TerrainCategory::Tc2 => "TC2",
            TerrainCategory::Tc2Point5 => "TC2.5",
            TerrainCategory::Tc3 => "TC3",
            TerrainCategory::Tc4 => "TC4",
        }
    }

    /// Normalise free text ("tc 2.5", "TC25", "Terrain Category 3").
    ///
    /// Returns `None` when the text names no category.
    pub fn normalise(raw: &str) -> Option<Self> {
        let key: String = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
        let number = key
            .strip_prefix("TERRAINCATEGORY")
            .or_else(|| key.strip_prefix("TC"))?;
        match number {
            "1" => Some(TerrainCategory::Tc1),
            "2" => Some(TerrainCategory::Tc2),
            "2.5" | "25" => Some(TerrainCategory::Tc2Point5),
            "3" => Some(TerrainCategory::Tc3),
            "4" => Some(TerrainCategory::Tc4),
            _ => None,
        }
    }

    /// Parse for interactive input, rejecting unknown text
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        TerrainCategory::normalise(s)
            .ok_or_else(|| CalcError::invalid_input("terrain", s, "Expected TC1, TC2, TC2.5, TC3 or TC4"))
    }

    /// Short description for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainCategory::Tc1 => "TC1 (exposed open terrain / water)",
            TerrainCategory::Tc2 => "TC2 (open terrain, scattered obstructions)",
            TerrainCategory::Tc2Point5 => "TC2.5 (developing outer urban)",
            TerrainCategory::Tc3 => "TC3 (suburban)",
            TerrainCategory::Tc4 => "TC4 (city centre)",
        }
    }
}

impl std::fmt::Display for TerrainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_variants() {
        assert_eq!(TerrainCategory::normalise("tc1"), Some(TerrainCategory::Tc1));
        assert_eq!(TerrainCategory::normalise("TC 2.5"), Some(TerrainCategory::Tc2Point5));
        assert_eq!(TerrainCategory::normalise("TC25"), Some(TerrainCategory::Tc2Point5));
        assert_eq!(TerrainCategory::normalise("Terrain Category 3"), Some(TerrainCategory::Tc3));
        assert_eq!(TerrainCategory::normalise("TC5"), None);
        assert_eq!(TerrainCategory::normalise("open"), None);
    }

    #[test]
    fn test_ordering_follows_roughness() {
        assert!(TerrainCategory::Tc1 < TerrainCategory::Tc2);
        assert!(TerrainCategory::Tc2 < TerrainCategory::Tc2Point5);
        assert!(TerrainCategory::Tc2Point5 < TerrainCategory::Tc3);
        assert!(TerrainCategory::Tc3 < TerrainCategory::Tc4);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&TerrainCategory::Tc2Point5).unwrap();
        assert_eq!(json, "\"TC2.5\"");
        let back: TerrainCategory = serde_json::from_str("\"TC4\"").unwrap();
        assert_eq!(back, TerrainCategory::Tc4);
    }
}
