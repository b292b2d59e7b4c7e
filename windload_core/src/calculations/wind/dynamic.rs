//! Dynamic response: stages 7-18.
//!
//! Structures up to 25 m take Cdyn = 1.0. Above that the first-mode period is
//! estimated from the core material and the dynamic response factor is built
//! from the gust, turbulence, size-reduction and background factors:
//!
//! ```text
//! Cdyn = [1 + 2·Ih·sqrt(gv²·Bs + Hs·gR²·S·Et/ζ)] / [1 + 2·gv·Ih]
//! ```
//!
//! Every intermediate factor is reported, each independently optional.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::tables::WindTables;
use crate::units::{Hertz, Metres, Seconds};

use super::input::{damping_ratio_for, WindInput};
use super::site::SiteWindSpeed;

/// Heights at or below this take Cdyn = 1.0 (m)
pub const STATIC_HEIGHT_LIMIT_M: f64 = 25.0;

/// Peak factor for the upwind velocity fluctuations g_v
pub const GV: f64 = 3.4;

/// Stages 7-18 of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicResponse {
    /// Height h used (absent when missing or invalid)
    pub height: Option<Metres>,
    /// Period coefficient k_t
    pub kt: Option<f64>,
    /// First-mode period T1
    pub period: Option<Seconds>,
    /// Frequency from the estimated period
    pub frequency: Option<Hertz>,
    /// Frequency n used downstream: estimated, else supplied
    pub natural_frequency: Option<Hertz>,
    /// Gust response factor gR
    pub g_r: Option<f64>,
    /// Turbulence length scale Lh (m)
    pub lh_m: Option<f64>,
    /// Turbulence intensity Ih
    pub ih: Option<f64>,
    /// Reduced frequency N
    pub reduced_frequency: Option<f64>,
    /// Spectrum of turbulence Et
    pub et: Option<f64>,
    /// Reference width b (m)
    pub width_m: Option<f64>,
    /// Size reduction factor S
    pub size_reduction: Option<f64>,
    /// Reference level s (m)
    pub level_m: Option<f64>,
    /// Background factor Bs
    pub bs: Option<f64>,
    /// Height participation factor Hs
    pub hs: Option<f64>,
    /// Damping ratio ζ
    pub damping_ratio: f64,
    /// Dynamic response factor Cdyn
    pub cdyn: Option<f64>,
}

/// gR = sqrt(1.2 + 2·ln(600·n)); `None` for n ≤ 0 or a non-positive radicand
pub fn gust_response_factor(n: f64) -> Option<f64> {
    if !n.is_finite() || n <= 0.0 {
        return None;
    }
    let radicand = 1.2 + 2.0 * (600.0 * n).ln();
    (radicand > 0.0).then(|| radicand.sqrt())
}

/// Lh = 85·(h/10)^0.25 for h > 0
pub fn turbulence_length_scale(h: f64) -> Option<f64> {
    (h > 0.0).then(|| 85.0 * (h / 10.0).powf(0.25))
}

/// Et = π·N / (1 + 70.8·N²)^(5/6)
pub fn turbulence_spectrum(n_reduced: f64) -> Option<f64> {
    n_reduced
        .is_finite()
        .then(|| PI * n_reduced / (1.0 + 70.8 * n_reduced.powi(2)).powf(5.0 / 6.0))
}

impl DynamicResponse {
    /// Resolve stages 7-18 for a sanitised input and its site wind speed
    pub fn resolve(tables: &WindTables, input: &WindInput, site: &SiteWindSpeed) -> Self {
        let h = input.height();

        // 7. Period and frequency
        let tall = h.is_some_and(|h| h > STATIC_HEIGHT_LIMIT_M);
        let kt = if tall { input.core_material.map(|c| c.kt()) } else { None };
        let period = match (h, kt) {
            (Some(h), Some(kt)) => Some(1.25 * kt * h.powf(0.75)),
            _ => None,
        };
        let frequency = period.map(|t| 1.0 / t).filter(|f| f.is_finite());

        // 8. gR
        let na = frequency.or(input.natural_frequency());
        let g_r = na.and_then(gust_response_factor);

        // 9. Lh, Ih
        let lh_m = h.and_then(turbulence_length_scale);
        let ih = tables.turbulence_intensity(site.terrain, h);

        // 10-11. N, Et
        let v_des = site.positive_speed();
        let reduced_frequency = match (na, lh_m, ih, v_des) {
            (Some(n), Some(lh), Some(ih), Some(v)) => Some(n * lh * (1.0 + GV * ih) / v),
            _ => None,
        };
        let et = reduced_frequency.and_then(turbulence_spectrum);

        // 12-13. b, S
        let h_pos = h.filter(|h| *h > 0.0);
        let width_m = input.overrides.width_m.positive().or(h_pos.map(|h| 0.5 * h));
        let size_reduction = match (na, h_pos, width_m, ih, v_des) {
            (Some(n), Some(h), Some(b), Some(ih), Some(v)) => {
                let factor = 1.0 + GV * ih;
                let along = 1.0 + 3.5 * n * h * factor / v;
                let across = 1.0 + 4.0 * n * b * factor / v;
                Some(1.0 / (along * across))
            }
            _ => None,
        };

        // 14-15. s, Bs
        let (level_m, bs) = match (h_pos, lh_m.filter(|lh| *lh > 0.0)) {
            (Some(h), Some(lh)) => {
                let s = input.overrides.level_m.value().map_or(0.5 * h, |s| s.clamp(0.0, h));
                let spread = (0.26 * (h - s).powi(2) + 0.46 * (0.5 * h).powi(2)).sqrt();
                (Some(s), Some(1.0 / (1.0 + spread / lh)))
            }
            _ => (None, None),
        };

        // 16. Hs
        let hs = h_pos.map(|h| {
            let s = level_m.unwrap_or(0.5 * h);
            1.0 + (s / h).powi(2)
        });

        // 17. ζ
        let damping_ratio = damping_ratio_for(input.core_material);

        // 18. Cdyn
        let cdyn = match h {
            Some(h) if h <= STATIC_HEIGHT_LIMIT_M => Some(1.0),
            Some(_) => match (ih, bs, size_reduction, et, hs, g_r) {
                (Some(ih), Some(bs), Some(s), Some(et), Some(hs), Some(g_r)) if damping_ratio > 0.0 => {
                    let resonant = hs * g_r.powi(2) * s * et / damping_ratio;
                    Some((1.0 + 2.0 * ih * (GV.powi(2) * bs + resonant).sqrt()) / (1.0 + 2.0 * GV * ih))
                }
                _ => None,
            },
            None => None,
        };

        DynamicResponse {
            height: h.map(Metres),
            kt,
            period: period.map(Seconds),
            frequency: frequency.map(Hertz),
            natural_frequency: na.map(Hertz),
            g_r,
            lh_m,
            ih,
            reduced_frequency,
            et,
            width_m,
            size_reduction,
            level_m,
            bs,
            hs,
            damping_ratio,
            cdyn,
        }
    }
}
