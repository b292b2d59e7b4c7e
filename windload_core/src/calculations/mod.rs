//! # Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(&input) -> *Result` - Pure calculation function
//!
//! ## Available Calculations
//!
//! - [`wind`] - Site design wind pressure

pub mod wind;

pub use wind::{calculate, calculate_with, WindInput, WindResult};

/// Round to `decimals` places, half away from zero
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
