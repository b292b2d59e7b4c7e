//! # Wind Tables
//!
//! Immutable lookup tables for the wind-load pipeline (AS/NZS 1170.2 style).
//!
//! | Table                     | Keyed by                        | Reference   |
//! |---------------------------|---------------------------------|-------------|
//! | Regional wind speed V_R   | region × recurrence             | Table 3.1   |
//! | Annual PoE                | design life × importance level  | Table 3.1 note |
//! | PoE → recurrence          | annual PoE                      |             |
//! | Climate multiplier Mc     | region                          | Table 3.3   |
//! | Direction multiplier Md   | region (and direction)          | Table 3.2(A)|
//! | Terrain/height Mz,cat     | terrain × height (interpolated) | Table 4.1   |
//! | Turbulence intensity Ih   | terrain × height (interpolated) | Table 6.1   |
//!
//! The standard tables are embedded in the crate as TOML and parsed once, on
//! first use, into a process-wide [`WindTables`]. A different edition can be
//! loaded from disk with [`WindTables::load`] and passed to the pipeline
//! explicitly. Tables are never mutated after construction, so a
//! `&WindTables` can be shared freely between threads.
//!
//! ## Example
//!
//! ```rust
//! use windload_core::tables::{DesignLife, Region, TerrainCategory, WindTables};
//!
//! let tables = WindTables::standard();
//! let poe = tables.annual_poe(DesignLife::FiftyYears, 3).unwrap();
//! let recurrence = tables.recurrence_for(poe).unwrap();
//! let v_r = tables.regional_wind_speed(Region::C, recurrence).unwrap();
//! assert_eq!(v_r, 70.0);
//!
//! let mzcat = tables.terrain_height_multiplier(Some("C"), Some(TerrainCategory::Tc3), Some(10.0));
//! assert_eq!(mzcat, Some(0.83));
//! ```

pub mod design_life;
pub mod interpolation;
pub mod region;
pub mod terrain;

pub use design_life::{AnnualPoe, DesignLife, RecurrenceLabel};
pub use interpolation::HeightTable;
pub use region::{is_region_a0, CardinalDirection, Region, REGION_A0_LABEL};
pub use terrain::TerrainCategory;

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};

/// Embedded standard table data
const STANDARD_TABLES_TOML: &str = include_str!("../../data/wind_tables.toml");

/// Design life / importance pair pinned to 1/50 regardless of the published cell
const PINNED_POE: (DesignLife, u8, AnnualPoe) = (DesignLife::FiftyYears, 2, AnnualPoe::one_in(50));

/// Region A0: heights up to this limit use the TC2 column for every terrain
pub const A0_TC2_LIMIT_M: f64 = 100.0;

/// Region A0: Mz,cat above `A0_TC2_LIMIT_M`, all terrains
pub const A0_UPPER_MULTIPLIER: f64 = 1.24;

/// Terrain used for interpolation when none is known
pub const DEFAULT_TERRAIN: TerrainCategory = TerrainCategory::Tc2;

static STANDARD_TABLES: Lazy<WindTables> = Lazy::new(|| {
    WindTables::from_toml_str(STANDARD_TABLES_TOML)
        .expect("embedded wind tables are valid (checked by tests::test_standard_tables_parse)")
});

/// One cell of the annual PoE table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoeEntry {
    pub design_life: DesignLife,
    pub importance: u8,
    pub poe: AnnualPoe,
}

/// All wind tables, validated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindTables {
    regional_wind_speed: BTreeMap<Region, BTreeMap<RecurrenceLabel, f64>>,
    annual_poe: Vec<PoeEntry>,
    poe_to_recurrence: BTreeMap<AnnualPoe, RecurrenceLabel>,
    climate_change_multiplier: BTreeMap<Region, f64>,
    direction_multiplier: BTreeMap<Region, f64>,
    directional_multiplier: BTreeMap<Region, BTreeMap<CardinalDirection, f64>>,
    terrain_height_multiplier: HeightTable,
    turbulence_intensity: HeightTable,
}

// ============================================================================
// File format
// ============================================================================

/// TOML layout before validation; keys stay as strings so unknown codes get a useful error
#[derive(Debug, Deserialize)]
struct RawTables {
    regional_wind_speed: BTreeMap<String, BTreeMap<String, f64>>,
    annual_poe: Vec<PoeEntry>,
    poe_to_recurrence: BTreeMap<String, String>,
    climate_change_multiplier: BTreeMap<String, f64>,
    direction_multiplier: BTreeMap<String, f64>,
    directional_multiplier: BTreeMap<String, BTreeMap<String, f64>>,
    terrain_height_multiplier: RawHeightTable,
    turbulence_intensity: RawHeightTable,
}

#[derive(Debug, Deserialize)]
struct RawHeightTable {
    heights: Vec<f64>,
    columns: BTreeMap<String, Vec<f64>>,
}

fn parse_region(table: &str, key: &str) -> CalcResult<Region> {
    // Table keys must be canonical; sub-region aliases are an input convenience only
    Region::ALL
        .into_iter()
        .find(|r| r.code() == key)
        .ok_or_else(|| CalcError::table_data(table, format!("unknown region '{}'", key)))
}

fn region_map(table: &str, raw: BTreeMap<String, f64>) -> CalcResult<BTreeMap<Region, f64>> {
    let mut out = BTreeMap::new();
    for (key, value) in raw {
        require_positive(table, &key, value)?;
        out.insert(parse_region(table, &key)?, value);
    }
    require_all_regions(table, &out)?;
    Ok(out)
}

fn require_positive(table: &str, key: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::table_data(table, format!("{} must be positive, got {}", key, value)));
    }
    Ok(())
}

fn require_all_regions<V>(table: &str, map: &BTreeMap<Region, V>) -> CalcResult<()> {
    match Region::ALL.into_iter().find(|r| !map.contains_key(r)) {
        Some(missing) => Err(CalcError::table_data(table, format!("missing region {}", missing))),
        None => Ok(()),
    }
}

fn height_table(name: &str, raw: RawHeightTable) -> CalcResult<HeightTable> {
    let mut columns = BTreeMap::new();
    for (key, values) in raw.columns {
        let terrain = TerrainCategory::normalise(&key)
            .ok_or_else(|| CalcError::table_data(name, format!("unknown terrain '{}'", key)))?;
        columns.insert(terrain, values);
    }
    HeightTable::new(name, raw.heights, columns)
}

impl TryFrom<RawTables> for WindTables {
    type Error = CalcError;

    fn try_from(raw: RawTables) -> CalcResult<Self> {
        let mut regional_wind_speed = BTreeMap::new();
        for (region_key, speeds) in raw.regional_wind_speed {
            let region = parse_region("regional_wind_speed", &region_key)?;
            let mut column = BTreeMap::new();
            for (label, speed) in speeds {
                require_positive("regional_wind_speed", &format!("{}.{}", region_key, label), speed)?;
                let recurrence = RecurrenceLabel::from_code(&label).ok_or_else(|| {
                    CalcError::table_data("regional_wind_speed", format!("unknown recurrence '{}'", label))
                })?;
                column.insert(recurrence, speed);
            }
            regional_wind_speed.insert(region, column);
        }
        require_all_regions("regional_wind_speed", &regional_wind_speed)?;

        for entry in &raw.annual_poe {
            if !(1..=4).contains(&entry.importance) {
                return Err(CalcError::table_data(
                    "annual_poe",
                    format!("importance level {} outside 1-4", entry.importance),
                ));
            }
        }

        let mut poe_to_recurrence = BTreeMap::new();
        for (poe, label) in raw.poe_to_recurrence {
            let poe = AnnualPoe::parse(&poe).map_err(|e| CalcError::table_data("poe_to_recurrence", e.to_string()))?;
            let recurrence = RecurrenceLabel::from_code(&label).ok_or_else(|| {
                CalcError::table_data("poe_to_recurrence", format!("unknown recurrence '{}'", label))
            })?;
            poe_to_recurrence.insert(poe, recurrence);
        }
        if let Some(entry) = raw.annual_poe.iter().find(|e| !poe_to_recurrence.contains_key(&e.poe)) {
            return Err(CalcError::table_data(
                "annual_poe",
                format!("no poe_to_recurrence entry for {}", entry.poe),
            ));
        }

        let mut directional_multiplier = BTreeMap::new();
        for (region_key, by_direction) in raw.directional_multiplier {
            let region = parse_region("directional_multiplier", &region_key)?;
            let mut column = BTreeMap::new();
            for (dir, value) in by_direction {
                require_positive("directional_multiplier", &format!("{}.{}", region_key, dir), value)?;
                let direction = CardinalDirection::from_str_flexible(&dir)
                    .map_err(|e| CalcError::table_data("directional_multiplier", e.to_string()))?;
                column.insert(direction, value);
            }
            directional_multiplier.insert(region, column);
        }
        require_all_regions("directional_multiplier", &directional_multiplier)?;

        Ok(WindTables {
            regional_wind_speed,
            annual_poe: raw.annual_poe,
            poe_to_recurrence,
            climate_change_multiplier: region_map("climate_change_multiplier", raw.climate_change_multiplier)?,
            direction_multiplier: region_map("direction_multiplier", raw.direction_multiplier)?,
            directional_multiplier,
            terrain_height_multiplier: height_table("terrain_height_multiplier", raw.terrain_height_multiplier)?,
            turbulence_intensity: height_table("turbulence_intensity", raw.turbulence_intensity)?,
        })
    }
}

// ============================================================================
// Loading
// ============================================================================

impl WindTables {
    /// The standard tables embedded in the crate (parsed on first call)
    pub fn standard() -> &'static WindTables {
        &STANDARD_TABLES
    }

    /// Parse and validate tables from a TOML document
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        let raw: RawTables = toml::from_str(source)?;
        let tables = WindTables::try_from(raw)?;
        debug!(
            poe_cells = tables.annual_poe.len(),
            mzcat_rows = tables.terrain_height_multiplier.heights().len(),
            ih_rows = tables.turbulence_intensity.heights().len(),
            "wind tables loaded"
        );
        Ok(tables)
    }

    /// Load tables from a TOML file on disk
    pub fn load(path: &Path) -> CalcResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        WindTables::from_toml_str(&source)
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Annual probability of exceedance for a design life and importance level.
    ///
    /// 50 years or less at importance level 2 is pinned to 1/50, whatever the
    /// table cell says. Pairs with no cell return `None`.
    pub fn annual_poe(&self, design_life: DesignLife, importance: u8) -> Option<AnnualPoe> {
        let (pinned_life, pinned_importance, pinned_poe) = PINNED_POE;
        if design_life == pinned_life && importance == pinned_importance {
            return Some(pinned_poe);
        }
        self.annual_poe_cell(design_life, importance)
    }

    /// The literal table cell, without the 1/50 pin
    pub fn annual_poe_cell(&self, design_life: DesignLife, importance: u8) -> Option<AnnualPoe> {
        self.annual_poe
            .iter()
            .find(|e| e.design_life == design_life && e.importance == importance)
            .map(|e| e.poe)
    }

    /// Recurrence column for an annual PoE
    pub fn recurrence_for(&self, poe: AnnualPoe) -> Option<RecurrenceLabel> {
        self.poe_to_recurrence.get(&poe).copied()
    }

    /// Regional wind speed V_R (m/s)
    pub fn regional_wind_speed(&self, region: Region, recurrence: RecurrenceLabel) -> Option<f64> {
        self.regional_wind_speed.get(&region)?.get(&recurrence).copied()
    }

    /// Climate change multiplier Mc
    pub fn climate_change_multiplier(&self, region: Region) -> Option<f64> {
        self.climate_change_multiplier.get(&region).copied()
    }

    /// Conservative (all-direction maximum) wind direction multiplier Md
    pub fn direction_multiplier(&self, region: Region) -> Option<f64> {
        self.direction_multiplier.get(&region).copied()
    }

    /// Wind direction multiplier Md for a single cardinal direction
    pub fn directional_multiplier(&self, region: Region, direction: CardinalDirection) -> Option<f64> {
        self.directional_multiplier.get(&region)?.get(&direction).copied()
    }

    /// Terrain/height multiplier Mz,cat.
    ///
    /// `raw_region` is the region label before normalisation: region A0 uses
    /// the TC2 column up to 100 m and 1.24 above, whatever the terrain. Other
    /// regions interpolate the given terrain's column, defaulting to TC2.
    /// Missing or non-finite height gives `None`.
    pub fn terrain_height_multiplier(
        &self,
        raw_region: Option<&str>,
        terrain: Option<TerrainCategory>,
        height_m: Option<f64>,
    ) -> Option<f64> {
        let z = height_m.filter(|h| h.is_finite())?.max(0.0);

        if raw_region.is_some_and(is_region_a0) {
            if z <= A0_TC2_LIMIT_M {
                return Some(self.terrain_height_multiplier.value(TerrainCategory::Tc2, z));
            }
            // 100 < z ≤ 200 is tabulated as 1.24; above 200 m is clamped to the same value
            return Some(A0_UPPER_MULTIPLIER);
        }

        Some(self.terrain_height_multiplier.value(terrain.unwrap_or(DEFAULT_TERRAIN), z))
    }

    /// Turbulence intensity Ih at height (TC2 when terrain is unknown)
    pub fn turbulence_intensity(&self, terrain: Option<TerrainCategory>, height_m: Option<f64>) -> Option<f64> {
        let z = height_m.filter(|h| h.is_finite())?;
        Some(self.turbulence_intensity.value(terrain.unwrap_or(DEFAULT_TERRAIN), z))
    }

    /// The Mz,cat table itself
    pub fn terrain_height_table(&self) -> &HeightTable {
        &self.terrain_height_multiplier
    }

    /// The Ih table itself
    pub fn turbulence_table(&self) -> &HeightTable {
        &self.turbulence_intensity
    }
}
