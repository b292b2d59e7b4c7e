//! # windload_core - Site Wind Load Engine
//!
//! `windload_core` computes a site-specific design wind pressure in the
//! AS/NZS 1170.2 style: region → recurrence-adjusted wind speed → exposure
//! multipliers → shape and dynamic response factors → design pressure. It
//! also estimates the terrain category around a site from OpenStreetMap data.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: The pipeline is a pure function of its input and the tables
//! - **Partial results**: Every quantity is independently optional; nothing aborts the calculation
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Immutable tables**: Parsed once, shared freely between threads
//!
//! ## Quick Start
//!
//! ```rust
//! use windload_core::{calculate, WindInput};
//! use windload_core::tables::{DesignLife, TerrainCategory};
//!
//! let mut input = WindInput::new("B1", DesignLife::FiftyYears, 2, 10.0);
//! input.terrain_classified = Some(TerrainCategory::Tc2);
//!
//! let result = calculate(&input);
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"v_sit\": 41.8"));
//! ```
//!
//! ## Modules
//!
//! - [`tables`] - Wind tables and height interpolation
//! - [`classifier`] - Terrain category from geodata, with a fixed fallback
//! - [`calculations`] - The wind-load pipeline
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//!
//! ## Features
//!
//! - `geodata` (default) - the Overpass HTTP client used by the live classifier

pub mod calculations;
pub mod classifier;
pub mod errors;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::wind::{calculate, calculate_with, CoreMaterial, OverrideSet, WindInput, WindResult};
pub use classifier::{ClassifierConfig, TerrainClassification};
pub use errors::{CalcError, CalcResult};
pub use tables::WindTables;
