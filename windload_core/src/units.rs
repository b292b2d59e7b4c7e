//! # Unit Types
//!
//! Type-safe wrappers for the SI quantities reported by the wind pipeline.
//! Each is a plain `f64` newtype that serializes as a bare number.
//!
//! ## SI Units
//!
//! - Length: metres (m)
//! - Speed: metres per second (m/s)
//! - Pressure: pascals (Pa), kilopascals (kPa)
//! - Frequency / period: hertz (Hz), seconds (s)
//!
//! No other unit systems are supported.
//!
//! ## Example
//!
//! ```rust
//! use windload_core::units::{Hertz, Kilopascals, Pascals, Seconds};
//!
//! let p = Pascals(838.0);
//! let kpa: Kilopascals = p.into();
//! assert_eq!(kpa.0, 0.838);
//!
//! let period = Seconds(2.0);
//! let f: Hertz = period.into();
//! assert_eq!(f.0, 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

// ============================================================================
// Length & Speed
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metres(pub f64);

/// Speed in metres per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetresPerSecond(pub f64);

// ============================================================================
// Pressure
// ============================================================================

/// Pressure in pascals (N/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Pressure in kilopascals (1 kPa = 1000 Pa)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilopascals(pub f64);

impl From<Pascals> for Kilopascals {
    fn from(pa: Pascals) -> Self {
        Kilopascals(pa.0 / 1000.0)
    }
}

impl From<Kilopascals> for Pascals {
    fn from(kpa: Kilopascals) -> Self {
        Pascals(kpa.0 * 1000.0)
    }
}

// ============================================================================
// Frequency & Period
// ============================================================================

/// Frequency in hertz
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hertz(pub f64);

/// Period in seconds
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(pub f64);

impl From<Seconds> for Hertz {
    fn from(period: Seconds) -> Self {
        Hertz(1.0 / period.0)
    }
}

impl From<Hertz> for Seconds {
    fn from(f: Hertz) -> Self {
        Seconds(1.0 / f.0)
    }
}

// ============================================================================
// Scalar arithmetic
// ============================================================================

macro_rules! impl_scalar_ops {
    ($type:ty) => {
        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_scalar_ops!(Metres);
impl_scalar_ops!(MetresPerSecond);
impl_scalar_ops!(Pascals);
impl_scalar_ops!(Kilopascals);
impl_scalar_ops!(Hertz);
impl_scalar_ops!(Seconds);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascals_to_kilopascals() {
        let pa = Pascals(1250.0);
        let kpa: Kilopascals = pa.into();
        assert_eq!(kpa.0, 1.25);

        let back: Pascals = kpa.into();
        assert_eq!(back.0, 1250.0);
    }

    #[test]
    fn test_period_frequency_reciprocal() {
        let f: Hertz = Seconds(0.25).into();
        assert_eq!(f.0, 4.0);
        let t: Seconds = Hertz(0.5).into();
        assert_eq!(t.0, 2.0);
    }

    #[test]
    fn test_scalar_ops() {
        let h = Metres(40.0);
        assert_eq!((h * 0.5).value(), 20.0);
        assert_eq!((h / 4.0).value(), 10.0);
    }

    #[test]
    fn test_serialization() {
        let v = MetresPerSecond(41.8);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "41.8");

        let roundtrip: MetresPerSecond = serde_json::from_str(&json).unwrap();
        assert_eq!(v, roundtrip);
    }
}
