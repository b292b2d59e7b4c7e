//! Wind regions and wind directions.
//!
//! Region labels arrive from a boundary lookup as free text ("A2", "b1",
//! "A (0 to 5)"). They normalise to the five canonical codes used to key the
//! wind tables. Anything else is unrecognised and resolves to `None`; it is
//! never an error inside the pipeline.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Raw region label that selects the special Mz,cat rule (see `WindTables::terrain_height_multiplier`).
pub const REGION_A0_LABEL: &str = "A0";

/// Canonical wind region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    /// Region A (non-cyclonic, sub-regions A0-A5)
    A,
    /// Region B1 (non-cyclonic)
    B1,
    /// Region B2 (non-cyclonic)
    B2,
    /// Region C (cyclonic)
    C,
    /// Region D (cyclonic)
    D,
}

impl Region {
    /// All canonical regions, in table order
    pub const ALL: [Region; 5] = [Region::A, Region::B1, Region::B2, Region::C, Region::D];

    /// Table key (e.g., "A", "B1")
    pub fn code(&self) -> &'static str {
        match self {
            Region::A => "A",
            Region::B1 => "B1",
            Region::B2 => "B2",
            Region::C => "C",
            Region::D => "D",
        }
    }

    /// Normalise a free-form region label.
    ///
    /// Whitespace is ignored and matching is case-insensitive. Sub-regions
    /// A0-A5 fold into `A`. Returns `None` for anything unrecognised.
    ///
    /// ```rust
    /// use windload_core::tables::Region;
    ///
    /// assert_eq!(Region::normalise(" a3 "), Some(Region::A));
    /// assert_eq!(Region::normalise("A (0 to 5)"), Some(Region::A));
    /// assert_eq!(Region::normalise("NZ1"), None);
    /// ```
    pub fn normalise(raw: &str) -> Option<Region> {
        let key: String = raw.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase();
        match key.as_str() {
            "A" | "A0" | "A1" | "A2" | "A3" | "A4" | "A5" | "A(0TO5)" => Some(Region::A),
            "B1" => Some(Region::B1),
            "B2" => Some(Region::B2),
            "C" => Some(Region::C),
            "D" => Some(Region::D),
            _ => None,
        }
    }

    /// Parse a region for interactive input, rejecting unknown labels
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        Region::normalise(s).ok_or_else(|| {
            CalcError::invalid_input("region", s, "Expected one of A, A0-A5, B1, B2, C, D")
        })
    }

    /// Cyclonic regions (C and D)
    pub fn is_cyclonic(&self) -> bool {
        matches!(self, Region::C | Region::D)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// True when the raw label is exactly region A0 (before normalisation folds it into A)
pub fn is_region_a0(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(REGION_A0_LABEL)
}

/// Cardinal wind direction for the per-direction Md table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CardinalDirection {
    /// All directions, clockwise from north
    pub const ALL: [CardinalDirection; 8] = [
        CardinalDirection::N,
        CardinalDirection::NE,
        CardinalDirection::E,
        CardinalDirection::SE,
        CardinalDirection::S,
        CardinalDirection::SW,
        CardinalDirection::W,
        CardinalDirection::NW,
    ];

    /// Table key (e.g., "NE")
    pub fn code(&self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SW => "SW",
            CardinalDirection::W => "W",
            CardinalDirection::NW => "NW",
        }
    }

    /// Parse from common string representations ("ne", "North-East", "northeast")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_uppercase().replace([' ', '-', '_'], "").as_str() {
            "N" | "NORTH" => Ok(CardinalDirection::N),
            "NE" | "NORTHEAST" => Ok(CardinalDirection::NE),
            "E" | "EAST" => Ok(CardinalDirection::E),
            "SE" | "SOUTHEAST" => Ok(CardinalDirection::SE),
            "S" | "SOUTH" => Ok(CardinalDirection::S),
            "SW" | "SOUTHWEST" => Ok(CardinalDirection::SW),
            "W" | "WEST" => Ok(CardinalDirection::W),
            "NW" | "NORTHWEST" => Ok(CardinalDirection::NW),
            _ => Err(CalcError::invalid_input("wind_direction", s, "Expected N, NE, E, SE, S, SW, W or NW")),
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
