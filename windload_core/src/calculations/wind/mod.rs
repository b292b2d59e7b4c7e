//! # Site Wind Load
//!
//! Design wind pressure for a structure at a site, in three layers:
//!
//! | Layer              | Stages | Produces                                      |
//! |--------------------|--------|-----------------------------------------------|
//! | [`SiteWindSpeed`]  | 1-6    | V_R, Mc, Md, Mz,cat, Ms, Mt, Cshp, Vsit       |
//! | [`DynamicResponse`]| 7-18   | T1, f, gR, Lh, Ih, N, Et, b, S, s, Bs, Hs, ζ, Cdyn |
//! | [`DesignPressure`] | 19     | p in Pa and kPa                               |
//!
//! The calculation never fails. A quantity that cannot be resolved is `None`,
//! and so is everything that depends on it; unrelated quantities still
//! compute. Non-finite numbers in the input are treated as absent.
//!
//! ## Example
//!
//! ```rust
//! use windload_core::calculations::wind::{calculate, WindInput};
//! use windload_core::tables::DesignLife;
//!
//! let input = WindInput::new("B1", DesignLife::FiftyYears, 2, 10.0);
//! let result = calculate(&input);
//!
//! assert_eq!(result.site.v_sit.map(|v| v.0), Some(41.8));
//! assert_eq!(result.dynamic.cdyn, Some(1.0));
//! assert!(result.pressure.kpa.is_some());
//! ```

pub mod dynamic;
pub mod input;
pub mod overrides;
pub mod pressure;
pub mod site;

pub use dynamic::DynamicResponse;
pub use input::{CoreMaterial, WindInput};
pub use overrides::{NumericOverride, OverrideSet, ShapeFactorOverride};
pub use pressure::DesignPressure;
pub use site::{MultiplierSource, ShapeFactorParts, SiteWindSpeed, TerrainSource};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tables::WindTables;

/// AS/NZS 1170 references for reported quantities
pub mod clause_ref {
    /// Annual probability of exceedance
    pub const ANNUAL_POE: &str = "AS/NZS 1170.0 Table 3.3";
    /// Regional wind speed V_R
    pub const REGIONAL_WIND_SPEED: &str = "AS/NZS 1170.2 Table 3.1(A)";
    /// Climate change multiplier Mc
    pub const MC: &str = "AS/NZS 1170.2 Cl 3.4";
    /// Wind direction multiplier Md
    pub const MD: &str = "AS/NZS 1170.2 Table 3.2(A)";
    /// Terrain/height multiplier Mz,cat
    pub const MZCAT: &str = "AS/NZS 1170.2 Table 4.1";
    /// Shielding multiplier Ms
    pub const MS: &str = "AS/NZS 1170.2 Cl 4.3";
    /// Topographic multiplier Mt
    pub const MT: &str = "AS/NZS 1170.2 Cl 4.4";
    /// Aerodynamic shape factor Cshp
    pub const CSHP: &str = "AS/NZS 1170.2 Eq 5.2(1)";
    /// Site wind speed Vsit
    pub const VSIT: &str = "AS/NZS 1170.2 Eq 2.2";
    /// First-mode period T1
    pub const PERIOD: &str = "AS 1170.4 Eq 6.2(7)";
    /// Gust response factor gR
    pub const GR: &str = "AS/NZS 1170.2 Eq 6.2(2)";
    /// Turbulence length scale Lh
    pub const LH: &str = "AS/NZS 1170.2 Cl 6.2.2";
    /// Turbulence intensity Ih
    pub const IH: &str = "AS/NZS 1170.2 Table 6.1";
    /// Reduced frequency N
    pub const REDUCED_FREQUENCY: &str = "AS/NZS 1170.2 Eq 6.2(4)";
    /// Spectrum of turbulence Et
    pub const ET: &str = "AS/NZS 1170.2 Eq 6.2(3)";
    /// Size reduction factor S
    pub const SIZE_REDUCTION: &str = "AS/NZS 1170.2 Eq 6.2(5)";
    /// Background factor Bs
    pub const BS: &str = "AS/NZS 1170.2 Eq 6.2(2)";
    /// Height participation factor Hs
    pub const HS: &str = "AS/NZS 1170.2 Cl 6.2.2";
    /// Dynamic response factor Cdyn
    pub const CDYN: &str = "AS/NZS 1170.2 Eq 6.2(1)";
    /// Design wind pressure
    pub const PRESSURE: &str = "AS/NZS 1170.2 Eq 2.4(1)";
}

/// Full result of a wind calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindResult {
    pub site: SiteWindSpeed,
    pub dynamic: DynamicResponse,
    pub pressure: DesignPressure,
}

impl WindResult {
    /// True when the design pressure was resolved
    pub fn is_complete(&self) -> bool {
        self.pressure.pa.is_some()
    }
}

/// Calculate with the standard embedded tables
pub fn calculate(input: &WindInput) -> WindResult {
    calculate_with(WindTables::standard(), input)
}

/// Calculate with a specific table edition
pub fn calculate_with(tables: &WindTables, input: &WindInput) -> WindResult {
    let input = input.sanitised();

    let site = SiteWindSpeed::resolve(tables, &input);
    let dynamic = DynamicResponse::resolve(tables, &input, &site);
    let pressure = DesignPressure::resolve(&site, &dynamic);

    debug!(
        region = ?site.region,
        v_sit = ?site.v_sit.map(|v| v.0),
        cdyn = ?dynamic.cdyn,
        pressure_pa = ?pressure.pa.map(|p| p.0),
        "wind load calculated"
    );

    WindResult { site, dynamic, pressure }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{DesignLife, TerrainCategory};

    fn reference() -> WindInput {
        WindInput::new("B1", DesignLife::FiftyYears, 2, 10.0)
    }

    #[test]
    fn test_reference_site_end_to_end() {
        let result = calculate(&reference());
        assert_eq!(result.site.v_sit.map(|v| v.0), Some(41.8));
        assert_eq!(result.dynamic.cdyn, Some(1.0));

        let pa = result.pressure.pa.unwrap().0;
        assert!((pa - 0.5 * 1.2 * 41.8 * 41.8 * 0.8).abs() < 1e-9);
        assert!((pa - 838.6752).abs() < 1e-6);
        assert!(result.is_complete());
    }

    #[test]
    fn test_deterministic() {
        let a = calculate(&reference());
        let b = calculate(&reference());
        assert_eq!(a, b);
        assert_eq!(a.pressure.pa.unwrap().0.to_bits(), b.pressure.pa.unwrap().0.to_bits());
    }

    #[test]
    fn test_kpa_is_pa_over_1000() {
        let mut input = WindInput::new("D", DesignLife::HundredYears, 4, 80.0);
        input.core_material = Some(CoreMaterial::SteelMrf);
        input.terrain_classified = Some(TerrainCategory::Tc3);
        for candidate in [reference(), input] {
            let result = calculate(&candidate);
            let pa = result.pressure.pa.unwrap().0;
            assert_eq!(result.pressure.kpa.unwrap().0, pa / 1000.0);
        }
    }

    #[test]
    fn test_no_pressure_without_cdyn() {
        let mut input = reference();
        input.height_m = Some(40.0);
        let result = calculate(&input);
        assert!(result.site.v_sit.is_some());
        assert_eq!(result.dynamic.cdyn, None);
        assert_eq!(result.pressure.pa, None);
        assert_eq!(result.pressure.kpa, None);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_cdyn_is_one_up_to_25m() {
        for h in [1.0, 12.5, 24.99, 25.0] {
            let mut input = WindInput::new("C", DesignLife::TwentyFiveYears, 3, h);
            input.core_material = Some(CoreMaterial::ConcreteMrf);
            input.terrain_override = Some(TerrainCategory::Tc4);
            assert_eq!(calculate(&input).dynamic.cdyn, Some(1.0), "h = {h}");
        }
    }

    #[test]
    fn test_empty_input_degrades_gracefully() {
        let result = calculate(&WindInput::default());
        assert_eq!(result.site.v_sit, None);
        assert_eq!(result.site.cshp, 0.8);
        assert_eq!(result.site.ms, 1.0);
        assert_eq!(result.dynamic.cdyn, None);
        assert_eq!(result.dynamic.damping_ratio, 0.02);
        assert_eq!(result.pressure.pa, None);
    }

    #[test]
    fn test_missing_importance_blocks_speed_only() {
        let mut input = reference();
        input.importance_level = None;
        let result = calculate(&input);
        assert_eq!(result.site.annual_poe, None);
        assert_eq!(result.site.regional_wind_speed, None);
        assert_eq!(result.site.v_sit, None);
        assert_eq!(result.site.mzcat, Some(1.0));
        assert_eq!(result.dynamic.cdyn, Some(1.0));
        assert_eq!(result.dynamic.hs, Some(1.25));
        assert_eq!(result.pressure.pa, None);
    }

    #[test]
    fn test_nan_height_is_absent() {
        let mut input = reference();
        input.height_m = Some(f64::NAN);
        let result = calculate(&input);
        assert_eq!(result.dynamic.height, None);
        assert_eq!(result.site.mzcat, None);
        assert_eq!(result.dynamic.cdyn, None);
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(calculate(&reference())).unwrap();
        assert_eq!(json["site"]["region"], "B1");
        assert_eq!(json["site"]["annual_poe"], "1/50");
        assert_eq!(json["site"]["recurrence"], "V50");
        assert_eq!(json["site"]["v_sit"], 41.8);
        assert_eq!(json["site"]["md_source"], "Table");
        assert_eq!(json["dynamic"]["cdyn"], 1.0);
        assert!(json["dynamic"]["period"].is_null());
        assert!(json["pressure"]["kpa"].is_number());
    }
}
