//! Terrain rule cascade.
//!
//! Rules are evaluated top to bottom and the first match wins:
//!
//! | # | Rule               | Category | Condition                                                  |
//! |---|--------------------|----------|------------------------------------------------------------|
//! | 1 | `coastal-exposed`  | TC1      | water ≤ 250 m, ≤ 5 bldg/ha, urban ≤ 0.15                   |
//! | 2 | `water-dominant`   | TC1      | water fraction ≥ 0.30, ≤ 5 bldg/ha, urban ≤ 0.10           |
//! | 3 | `dense-urban-core` | TC4      | no water within 400 m, and ≥ 25 bldg/ha or (urban ≥ 0.65 and ≥ 15 bldg/ha) |
//! | 4 | `suburban`         | TC3      | ≥ 10 bldg/ha                                               |
//! | 5 | `scattered`        | TC2.5    | 2 < bldg/ha < 10                                           |
//! | 6 | `open-terrain`     | TC2      | anything else                                              |

use crate::tables::TerrainCategory;

use super::signals::TerrainSignals;

/// Beachfront / foreshore distance (m)
pub const NEAR_COAST_M: f64 = 250.0;
/// Within this distance of water TC4 is never assigned (m)
pub const COASTAL_ZONE_M: f64 = 400.0;
/// Water fraction treated as water-dominant
pub const WATER_DOMINANT_FRACTION: f64 = 0.30;
/// Maximum density for TC1
pub const TC1_MAX_DENSITY: f64 = 5.0;
/// Maximum urban fraction for a coastal-exposed TC1 site
pub const TC1_COASTAL_MAX_URBAN: f64 = 0.15;
/// Maximum urban fraction for a water-dominant TC1 site
pub const TC1_WATER_MAX_URBAN: f64 = 0.10;
/// Density alone that makes TC4
pub const TC4_DENSITY: f64 = 25.0;
/// Urban fraction that, with [`TC4_URBAN_DENSITY`], makes TC4
pub const TC4_URBAN_FRACTION: f64 = 0.65;
/// Density that, with [`TC4_URBAN_FRACTION`], makes TC4
pub const TC4_URBAN_DENSITY: f64 = 15.0;
/// House-size obstructions per hectare for TC3
pub const TC3_DENSITY: f64 = 10.0;
/// Upper bound of open terrain
pub const TC2_MAX_DENSITY: f64 = 2.0;

/// One row of the cascade
#[derive(Debug, Clone, Copy)]
pub struct TerrainRule {
    pub name: &'static str,
    pub category: TerrainCategory,
    predicate: fn(&TerrainSignals) -> bool,
}

impl TerrainRule {
    pub fn matches(&self, signals: &TerrainSignals) -> bool {
        (self.predicate)(signals)
    }
}

fn coastal_exposed(s: &TerrainSignals) -> bool {
    s.water_within(NEAR_COAST_M)
        && s.buildings_per_ha <= TC1_MAX_DENSITY
        && s.urban_fraction <= TC1_COASTAL_MAX_URBAN
}

fn water_dominant(s: &TerrainSignals) -> bool {
    s.water_fraction >= WATER_DOMINANT_FRACTION
        && s.buildings_per_ha <= TC1_MAX_DENSITY
        && s.urban_fraction <= TC1_WATER_MAX_URBAN
}

fn dense_urban_core(s: &TerrainSignals) -> bool {
    !s.water_within(COASTAL_ZONE_M)
        && (s.buildings_per_ha >= TC4_DENSITY
            || (s.urban_fraction >= TC4_URBAN_FRACTION && s.buildings_per_ha >= TC4_URBAN_DENSITY))
}

fn suburban(s: &TerrainSignals) -> bool {
    s.buildings_per_ha >= TC3_DENSITY
}

fn scattered(s: &TerrainSignals) -> bool {
    s.buildings_per_ha > TC2_MAX_DENSITY && s.buildings_per_ha < TC3_DENSITY
}

fn always(_: &TerrainSignals) -> bool {
    true
}

/// The cascade, in priority order. The last rule always matches.
pub static RULES: [TerrainRule; 6] = [
    TerrainRule { name: "coastal-exposed", category: TerrainCategory::Tc1, predicate: coastal_exposed },
    TerrainRule { name: "water-dominant", category: TerrainCategory::Tc1, predicate: water_dominant },
    TerrainRule { name: "dense-urban-core", category: TerrainCategory::Tc4, predicate: dense_urban_core },
    TerrainRule { name: "suburban", category: TerrainCategory::Tc3, predicate: suburban },
    TerrainRule { name: "scattered", category: TerrainCategory::Tc2Point5, predicate: scattered },
    TerrainRule { name: "open-terrain", category: TerrainCategory::Tc2, predicate: always },
];

/// First rule matching `signals`
pub fn evaluate(signals: &TerrainSignals) -> &'static TerrainRule {
    RULES
        .iter()
        .find(|rule| rule.matches(signals))
        .unwrap_or(&RULES[RULES.len() - 1])
}
