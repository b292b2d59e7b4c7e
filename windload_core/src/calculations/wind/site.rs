//! Site wind speed: stages 1-6.
//!
//! ```text
//! Vsit = V_R × Mc × Md × (Mz,cat × Ms × Mt)        rounded to 0.01 m/s
//! Cshp = Cpe × Ka × Kce × K1 × Kp                   rounded to 0.001
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::round_to;
use crate::tables::{AnnualPoe, RecurrenceLabel, Region, TerrainCategory, WindTables};
use crate::units::MetresPerSecond;

use super::input::WindInput;

/// External pressure coefficient used when no override is given
pub const DEFAULT_CPE: f64 = 0.80;

/// Neutral value of Ms and Mt
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Where a multiplier value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiplierSource {
    /// Neutral value, nothing supplied
    Default,
    /// Region-keyed table
    Table,
    /// Single-direction table
    Directional,
    /// User override
    Override,
}

/// Where the terrain category came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerrainSource {
    Override,
    Classified,
    /// Nothing supplied; TC2 used for interpolation
    Default,
}

/// Factors making up Cshp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeFactorParts {
    pub cpe: f64,
    pub ka: f64,
    pub kce: f64,
    pub k1: f64,
    pub kp: f64,
}

impl ShapeFactorParts {
    pub fn with_cpe(cpe: f64) -> Self {
        ShapeFactorParts { cpe, ka: 1.0, kce: 1.0, k1: 1.0, kp: 1.0 }
    }

    /// Cshp, rounded to 3 decimals
    pub fn cshp(&self) -> f64 {
        round_to(self.cpe * self.ka * self.kce * self.k1 * self.kp, 3)
    }
}

/// Stages 1-6 of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteWindSpeed {
    /// Region label as supplied
    pub raw_region: Option<String>,
    /// Canonical region, `None` when unrecognised
    pub region: Option<Region>,
    pub annual_poe: Option<AnnualPoe>,
    pub recurrence: Option<RecurrenceLabel>,
    /// Regional wind speed V_R
    pub regional_wind_speed: Option<MetresPerSecond>,

    /// Climate change multiplier Mc
    pub mc: Option<f64>,
    /// Direction multiplier Md
    pub md: Option<f64>,
    pub md_source: MultiplierSource,

    /// Terrain used for Mz,cat and Ih
    pub terrain: Option<TerrainCategory>,
    pub terrain_source: TerrainSource,
    /// Terrain/height multiplier Mz,cat
    pub mzcat: Option<f64>,

    /// Shielding multiplier Ms
    pub ms: f64,
    pub ms_source: MultiplierSource,
    /// Topographic multiplier Mt
    pub mt: f64,
    pub mt_source: MultiplierSource,

    /// Aerodynamic shape factor
    pub cshp: f64,
    pub cshp_parts: ShapeFactorParts,

    /// Site design wind speed Vsit
    pub v_sit: Option<MetresPerSecond>,
}

/// Ms or Mt: the override only when it differs from 1.0
fn site_multiplier(value: Option<f64>) -> (f64, MultiplierSource) {
    match value {
        Some(v) => (v, MultiplierSource::Override),
        None => (NEUTRAL_MULTIPLIER, MultiplierSource::Default),
    }
}

impl SiteWindSpeed {
    /// Resolve stages 1-6 for a sanitised input
    pub fn resolve(tables: &WindTables, input: &WindInput) -> Self {
        let raw_region = input.region.clone();
        let region = raw_region.as_deref().and_then(Region::normalise);

        // 1. V_R
        let annual_poe = match (input.design_life, input.importance_level) {
            (Some(life), Some(importance)) => tables.annual_poe(life, importance),
            _ => None,
        };
        let recurrence = annual_poe.and_then(|poe| tables.recurrence_for(poe));
        let regional_wind_speed = match (region, recurrence) {
            (Some(r), Some(rec)) => tables.regional_wind_speed(r, rec),
            _ => None,
        };

        // 2. Mc, Md
        let mc = region.and_then(|r| tables.climate_change_multiplier(r));
        let (md, md_source) = if let Some(v) = input.overrides.direction.value() {
            (Some(v), MultiplierSource::Override)
        } else if let Some(v) = region
            .zip(input.wind_direction)
            .and_then(|(r, dir)| tables.directional_multiplier(r, dir))
        {
            (Some(v), MultiplierSource::Directional)
        } else {
            (region.and_then(|r| tables.direction_multiplier(r)), MultiplierSource::Table)
        };

        // 3. Mz,cat
        let (terrain, terrain_source) = match (input.terrain_override, input.terrain_classified) {
            (Some(t), _) => (Some(t), TerrainSource::Override),
            (None, Some(t)) => (Some(t), TerrainSource::Classified),
            (None, None) => (None, TerrainSource::Default),
        };
        let mzcat = tables.terrain_height_multiplier(raw_region.as_deref(), terrain, input.height());

        // 4. Ms, Mt
        let (ms, ms_source) = site_multiplier(input.overrides.shielding.non_neutral(NEUTRAL_MULTIPLIER));
        let (mt, mt_source) = site_multiplier(input.overrides.topographic.non_neutral(NEUTRAL_MULTIPLIER));

        // 5. Cshp
        let cshp_parts = ShapeFactorParts::with_cpe(input.overrides.shape_factor.cpe.value().unwrap_or(DEFAULT_CPE));
        let cshp = cshp_parts.cshp();

        // 6. Vsit
        let v_sit = match (regional_wind_speed, mc, md, mzcat) {
            (Some(v_r), Some(mc), Some(md), Some(mz)) => {
                let exposure = mz * ms * mt;
                Some(MetresPerSecond(round_to(v_r * mc * md * exposure, 2)))
            }
            _ => None,
        };

        SiteWindSpeed {
            raw_region,
            region,
            annual_poe,
            recurrence,
            regional_wind_speed: regional_wind_speed.map(MetresPerSecond),
            mc,
            md,
            md_source,
            terrain,
            terrain_source,
            mzcat,
            ms,
            ms_source,
            mt,
            mt_source,
            cshp,
            cshp_parts,
            v_sit,
        }
    }

    /// Vsit in m/s, when available and positive
    pub fn positive_speed(&self) -> Option<f64> {
        self.v_sit.map(|v| v.0).filter(|v| *v > 0.0)
    }
}
