//! Piecewise-linear lookup over height-keyed tables.
//!
//! ```text
//! x ≤ x[0]      → y[0]
//! x ≥ x[last]   → y[last]
//! x[i] ≤ x ≤ x[i+1] → y[i] + (x − x[i])·(y[i+1] − y[i])/(x[i+1] − x[i])
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{CalcError, CalcResult};
use crate::tables::TerrainCategory;

/// Linearly interpolate `values` at `x` over ascending `breakpoints`, clamping at both ends.
///
/// `breakpoints` and `values` must be the same non-zero length; `HeightTable`
/// guarantees that for table data.
///
/// ```rust
/// use windload_core::tables::interpolation::interpolate;
///
/// let heights = [5.0, 10.0, 20.0];
/// let values = [1.0, 2.0, 4.0];
/// assert_eq!(interpolate(&heights, &values, 15.0), 3.0);
/// assert_eq!(interpolate(&heights, &values, 1.0), 1.0);
/// assert_eq!(interpolate(&heights, &values, 99.0), 4.0);
/// ```
pub fn interpolate(breakpoints: &[f64], values: &[f64], x: f64) -> f64 {
    let n = breakpoints.len().min(values.len());
    if n == 0 {
        return f64::NAN;
    }
    if x <= breakpoints[0] {
        return values[0];
    }
    if x >= breakpoints[n - 1] {
        return values[n - 1];
    }

    for i in 0..n - 1 {
        let (x0, x1) = (breakpoints[i], breakpoints[i + 1]);
        if x >= x0 && x <= x1 {
            return lerp(x0, values[i], x1, values[i + 1], x);
        }
    }

    values[n - 1]
}

/// Two-point line through (x0, y0) and (x1, y1), evaluated at x
fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    if x1 == x0 {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// A terrain × height table (e.g., Mz,cat or Ih).
///
/// Construction validates the data, so every lookup on a built table succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightTable {
    heights: Vec<f64>,
    columns: BTreeMap<TerrainCategory, Vec<f64>>,
}

impl HeightTable {
    /// Build a table, checking breakpoints ascend strictly and every terrain has a full column.
    pub fn new(
        name: &str,
        heights: Vec<f64>,
        columns: BTreeMap<TerrainCategory, Vec<f64>>,
    ) -> CalcResult<Self> {
        if heights.is_empty() {
            return Err(CalcError::table_data(name, "no height breakpoints"));
        }
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(CalcError::table_data(name, "height breakpoints must be finite"));
        }
        if heights.windows(2).any(|w| w[1] <= w[0]) {
            return Err(CalcError::table_data(name, "height breakpoints must be strictly increasing"));
        }
        for terrain in TerrainCategory::ALL {
            let column = columns
                .get(&terrain)
                .ok_or_else(|| CalcError::table_data(name, format!("missing column {}", terrain)))?;
            if column.len() != heights.len() {
                return Err(CalcError::table_data(
                    name,
                    format!(
                        "column {} has {} values for {} heights",
                        terrain,
                        column.len(),
                        heights.len()
                    ),
                ));
            }
            if column.iter().any(|v| !v.is_finite()) {
                return Err(CalcError::table_data(name, format!("column {} has a non-finite value", terrain)));
            }
        }

        Ok(HeightTable { heights, columns })
    }

    /// Height breakpoints (m)
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Tabulated values for one terrain category
    pub fn column(&self, terrain: TerrainCategory) -> &[f64] {
        self.columns.get(&terrain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Interpolated value for `terrain` at `height_m`
    pub fn value(&self, terrain: TerrainCategory, height_m: f64) -> f64 {
        interpolate(&self.heights, self.column(terrain), height_m)
    }
}
