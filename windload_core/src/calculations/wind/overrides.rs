//! User overrides for the wind pipeline.
//!
//! Each numeric override is either [`NumericOverride::Absent`] or
//! [`NumericOverride::Explicit`]. In JSON it is a plain number or
//! `null`/missing. Non-finite values never become an explicit override.

use serde::{Deserialize, Serialize};

/// A caller-supplied number that may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum NumericOverride {
    #[default]
    Absent,
    Explicit(f64),
}

impl NumericOverride {
    /// The explicit value, if finite
    pub fn value(&self) -> Option<f64> {
        match *self {
            NumericOverride::Explicit(v) if v.is_finite() => Some(v),
            _ => None,
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.value().is_some()
    }

    /// The explicit value unless it equals `neutral`
    pub fn non_neutral(&self, neutral: f64) -> Option<f64> {
        self.value().filter(|v| *v != neutral)
    }

    /// The explicit value if strictly positive
    pub fn positive(&self) -> Option<f64> {
        self.value().filter(|v| *v > 0.0)
    }
}

impl From<f64> for NumericOverride {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            NumericOverride::Explicit(value)
        } else {
            NumericOverride::Absent
        }
    }
}

impl From<Option<f64>> for NumericOverride {
    fn from(value: Option<f64>) -> Self {
        value.map_or(NumericOverride::Absent, NumericOverride::from)
    }
}

impl From<NumericOverride> for Option<f64> {
    fn from(value: NumericOverride) -> Self {
        value.value()
    }
}

/// Shape factor override; only Cpe is adjustable
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeFactorOverride {
    #[serde(default)]
    pub cpe: NumericOverride,
}

/// All overrides accepted by the pipeline.
///
/// ## JSON Example
///
/// ```json
/// {
///   "direction": 0.95,
///   "shielding": 0.9,
///   "level_m": 0.0,
///   "shape_factor": { "cpe": 0.7 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSet {
    /// Direction multiplier Md
    pub direction: NumericOverride,
    /// Shielding multiplier Ms (1.0 counts as no override)
    pub shielding: NumericOverride,
    /// Topographic multiplier Mt (1.0 counts as no override)
    pub topographic: NumericOverride,
    /// Reference width b for the size reduction factor (m); used when > 0
    pub width_m: NumericOverride,
    /// Reference level s (m); any value including 0 is used, clamped to [0, h]
    pub level_m: NumericOverride,
    pub shape_factor: ShapeFactorOverride,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_is_absent() {
        assert_eq!(NumericOverride::from(f64::NAN), NumericOverride::Absent);
        assert_eq!(NumericOverride::from(f64::INFINITY), NumericOverride::Absent);
        assert_eq!(NumericOverride::Explicit(f64::NEG_INFINITY).value(), None);
    }

    #[test]
    fn test_zero_is_explicit() {
        let level = NumericOverride::from(0.0);
        assert_eq!(level.value(), Some(0.0));
        assert!(level.is_explicit());
        assert_eq!(level.positive(), None);
    }

    #[test]
    fn test_neutral_value_filtered() {
        assert_eq!(NumericOverride::from(1.0).non_neutral(1.0), None);
        assert_eq!(NumericOverride::from(0.85).non_neutral(1.0), Some(0.85));
        assert_eq!(NumericOverride::Absent.non_neutral(1.0), None);
    }

    #[test]
    fn test_json_shape() {
        let set: OverrideSet =
            serde_json::from_str(r#"{"shielding": 0.9, "level_m": 0, "width_m": null, "shape_factor": {"cpe": 0.7}}"#)
                .unwrap();
        assert_eq!(set.shielding, NumericOverride::Explicit(0.9));
        assert_eq!(set.level_m, NumericOverride::Explicit(0.0));
        assert_eq!(set.width_m, NumericOverride::Absent);
        assert_eq!(set.direction, NumericOverride::Absent);
        assert_eq!(set.shape_factor.cpe.value(), Some(0.7));

        let json = serde_json::to_value(set).unwrap();
        assert_eq!(json["shielding"], 0.9);
        assert!(json["direction"].is_null());
    }
}
