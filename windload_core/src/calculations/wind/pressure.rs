//! Design wind pressure: stage 19.

use serde::{Deserialize, Serialize};

use crate::units::{Kilopascals, Pascals};

use super::dynamic::DynamicResponse;
use super::site::SiteWindSpeed;

/// Density of air ρ_air (kg/m³)
pub const AIR_DENSITY: f64 = 1.2;

/// p = 0.5·ρ_air·Vsit²·Cshp·Cdyn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignPressure {
    pub pa: Option<Pascals>,
    pub kpa: Option<Kilopascals>,
}

impl DesignPressure {
    /// Requires Vsit > 0 and Cdyn > 0
    pub fn resolve(site: &SiteWindSpeed, dynamic: &DynamicResponse) -> Self {
        let cdyn = dynamic.cdyn.filter(|c| *c > 0.0);
        let pa = match (site.positive_speed(), cdyn) {
            (Some(v), Some(cdyn)) => Some(Pascals(0.5 * AIR_DENSITY * v * v * site.cshp * cdyn)),
            _ => None,
        };
        DesignPressure {
            pa,
            kpa: pa.map(Kilopascals::from),
        }
    }
}
