//! Wind pipeline input.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::tables::{CardinalDirection, DesignLife, TerrainCategory};

use super::overrides::OverrideSet;

/// Lateral-load core of the structure, for period estimation and damping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoreMaterial {
    /// Steel moment-resisting frame
    SteelMrf,
    /// Steel eccentrically braced frame
    #[serde(alias = "steel_ebr")]
    SteelEbf,
    /// Concrete moment-resisting frame
    ConcreteMrf,
    /// Timber and all other structures
    TimberOther,
}

impl CoreMaterial {
    pub const ALL: [CoreMaterial; 4] = [
        CoreMaterial::SteelMrf,
        CoreMaterial::SteelEbf,
        CoreMaterial::ConcreteMrf,
        CoreMaterial::TimberOther,
    ];

    /// Period coefficient k_t in T1 = 1.25·k_t·h^0.75
    pub fn kt(&self) -> f64 {
        match self {
            CoreMaterial::SteelMrf => 0.11,
            CoreMaterial::SteelEbf => 0.06,
            CoreMaterial::ConcreteMrf => 0.075,
            CoreMaterial::TimberOther => 0.05,
        }
    }

    /// Structural damping ratio ζ
    pub fn damping_ratio(&self) -> f64 {
        match self {
            CoreMaterial::ConcreteMrf => 0.03,
            _ => DEFAULT_DAMPING_RATIO,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CoreMaterial::SteelMrf => "steel_mrf",
            CoreMaterial::SteelEbf => "steel_ebf",
            CoreMaterial::ConcreteMrf => "concrete_mrf",
            CoreMaterial::TimberOther => "timber_other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CoreMaterial::SteelMrf => "Steel moment-resisting frame",
            CoreMaterial::SteelEbf => "Steel eccentrically braced frame",
            CoreMaterial::ConcreteMrf => "Concrete moment-resisting frame",
            CoreMaterial::TimberOther => "Timber / other",
        }
    }

    /// Parse a code or common shorthand ("steel-mrf", "concrete", "timber")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "steel_mrf" | "steel" => Ok(CoreMaterial::SteelMrf),
            "steel_ebf" | "steel_ebr" | "ebf" => Ok(CoreMaterial::SteelEbf),
            "concrete_mrf" | "concrete" => Ok(CoreMaterial::ConcreteMrf),
            "timber_other" | "timber" | "other" => Ok(CoreMaterial::TimberOther),
            _ => Err(CalcError::invalid_input(
                "core_material",
                s,
                "Expected steel_mrf, steel_ebf, concrete_mrf or timber_other",
            )),
        }
    }
}

impl std::fmt::Display for CoreMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Damping ratio when the core material is unknown
pub const DEFAULT_DAMPING_RATIO: f64 = 0.02;

/// Damping ratio for an optional core material
pub fn damping_ratio_for(core: Option<CoreMaterial>) -> f64 {
    core.map_or(DEFAULT_DAMPING_RATIO, |c| c.damping_ratio())
}

/// Input parameters for a site wind load.
///
/// Every field is optional: missing values make the dependent results
/// unavailable rather than failing the calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "region": "B1",
///   "design_life": "50-years",
///   "importance_level": 2,
///   "height_m": 10.0,
///   "terrain_classified": "TC2.5",
///   "overrides": { "shielding": 0.9 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindInput {
    /// Region label as returned by the region lookup (e.g., "B1", "A0")
    pub region: Option<String>,

    pub design_life: Option<DesignLife>,

    /// Importance level 1-4
    pub importance_level: Option<u8>,

    /// Average roof height h (m)
    pub height_m: Option<f64>,

    /// Terrain chosen by the user; wins over the classified terrain
    pub terrain_override: Option<TerrainCategory>,

    /// Terrain from the site classifier
    pub terrain_classified: Option<TerrainCategory>,

    /// Selects a single-direction Md instead of the conservative value
    pub wind_direction: Option<CardinalDirection>,

    pub core_material: Option<CoreMaterial>,

    /// Natural frequency n (Hz), used when no period can be estimated
    pub natural_frequency_hz: Option<f64>,

    pub overrides: OverrideSet,
}

impl WindInput {
    /// Convenience constructor for the common case
    pub fn new(region: &str, design_life: DesignLife, importance_level: u8, height_m: f64) -> Self {
        WindInput {
            region: Some(region.to_string()),
            design_life: Some(design_life),
            importance_level: Some(importance_level),
            height_m: Some(height_m),
            ..WindInput::default()
        }
    }

    /// Height, if finite and non-negative
    pub fn height(&self) -> Option<f64> {
        self.height_m.filter(|h| h.is_finite() && *h >= 0.0)
    }

    /// Supplied natural frequency, if finite
    pub fn natural_frequency(&self) -> Option<f64> {
        self.natural_frequency_hz.filter(|n| n.is_finite())
    }

    /// Terrain used for the calculation: override, else classified
    pub fn effective_terrain(&self) -> Option<TerrainCategory> {
        self.terrain_override.or(self.terrain_classified)
    }

    /// Copy with non-finite or negative numbers replaced by absent
    pub fn sanitised(&self) -> Self {
        WindInput {
            height_m: self.height(),
            natural_frequency_hz: self.natural_frequency(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kt_and_damping() {
        assert_eq!(CoreMaterial::SteelMrf.kt(), 0.11);
        assert_eq!(CoreMaterial::SteelEbf.kt(), 0.06);
        assert_eq!(CoreMaterial::ConcreteMrf.kt(), 0.075);
        assert_eq!(CoreMaterial::TimberOther.kt(), 0.05);
        assert_eq!(CoreMaterial::ConcreteMrf.damping_ratio(), 0.03);
        assert_eq!(damping_ratio_for(Some(CoreMaterial::SteelMrf)), 0.02);
        assert_eq!(damping_ratio_for(None), 0.02);
    }

    #[test]
    fn test_core_material_parsing() {
        assert_eq!(CoreMaterial::from_str_flexible("Steel-MRF").unwrap(), CoreMaterial::SteelMrf);
        assert_eq!(CoreMaterial::from_str_flexible("steel_ebr").unwrap(), CoreMaterial::SteelEbf);
        assert_eq!(CoreMaterial::from_str_flexible("concrete").unwrap(), CoreMaterial::ConcreteMrf);
        assert!(CoreMaterial::from_str_flexible("masonry").is_err());

        let legacy: CoreMaterial = serde_json::from_str("\"steel_ebr\"").unwrap();
        assert_eq!(legacy, CoreMaterial::SteelEbf);
    }

    #[test]
    fn test_sanitise_drops_bad_numbers() {
        let input = WindInput {
            height_m: Some(f64::NAN),
            natural_frequency_hz: Some(f64::INFINITY),
            ..WindInput::default()
        };
        let clean = input.sanitised();
        assert_eq!(clean.height_m, None);
        assert_eq!(clean.natural_frequency_hz, None);

        let negative = WindInput { height_m: Some(-3.0), ..WindInput::default() };
        assert_eq!(negative.height(), None);
    }

    #[test]
    fn test_terrain_override_wins() {
        let input = WindInput {
            terrain_override: Some(TerrainCategory::Tc1),
            terrain_classified: Some(TerrainCategory::Tc3),
            ..WindInput::default()
        };
        assert_eq!(input.effective_terrain(), Some(TerrainCategory::Tc1));
    }

    #[test]
    fn test_input_json() {
        let input: WindInput = serde_json::from_str(
            r#"{
                "region": "B1",
                "design_life": "50-years",
                "importance_level": 2,
                "height_m": 10.0,
                "terrain_classified": "TC2.5",
                "wind_direction": "NE",
                "core_material": "concrete_mrf",
                "overrides": {"level_m": 0}
            }"#,
        )
        .unwrap();
        assert_eq!(input.design_life, Some(DesignLife::FiftyYears));
        assert_eq!(input.terrain_classified, Some(TerrainCategory::Tc2Point5));
        assert_eq!(input.wind_direction, Some(CardinalDirection::NE));
        assert_eq!(input.core_material, Some(CoreMaterial::ConcreteMrf));
        assert_eq!(input.overrides.level_m.value(), Some(0.0));
    }
}
