//! Design working life, annual probability of exceedance and recurrence labels.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Design working life category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DesignLife {
    /// Construction equipment / temporary works
    #[serde(rename = "temporary")]
    Temporary,
    /// Less than 6 months
    #[serde(rename = "under-6-months")]
    UnderSixMonths,
    /// 5 years or less
    #[serde(rename = "5-years")]
    FiveYears,
    /// 25 years or less
    #[serde(rename = "25-years")]
    TwentyFiveYears,
    /// 50 years or less
    #[serde(rename = "50-years")]
    FiftyYears,
    /// 100 years or more
    #[serde(rename = "100-years")]
    HundredYears,
}

impl DesignLife {
    /// All design life categories for selection lists
    pub const ALL: [DesignLife; 6] = [
        DesignLife::Temporary,
        DesignLife::UnderSixMonths,
        DesignLife::FiveYears,
        DesignLife::TwentyFiveYears,
        DesignLife::FiftyYears,
        DesignLife::HundredYears,
    ];

    /// Table key (matches the serde name)
    pub fn code(&self) -> &'static str {
        match self {
            DesignLife::Temporary => "temporary",
            DesignLife::UnderSixMonths => "under-6-months",
            DesignLife::FiveYears => "5-years",
            DesignLife::TwentyFiveYears => "25-years",
            DesignLife::FiftyYears => "50-years",
            DesignLife::HundredYears => "100-years",
        }
    }

    /// Parse from common string representations ("50", "50-years", "lt6", "temp")
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "temporary" | "temp" | "construction" => Ok(DesignLife::Temporary),
            "under-6-months" | "lt6" | "<6-months" | "6-months" => Ok(DesignLife::UnderSixMonths),
            "5-years" | "5" | "5y" => Ok(DesignLife::FiveYears),
            "25-years" | "25" | "25y" => Ok(DesignLife::TwentyFiveYears),
            "50-years" | "50" | "50y" => Ok(DesignLife::FiftyYears),
            "100-years" | "100" | "100y" => Ok(DesignLife::HundredYears),
            _ => Err(CalcError::invalid_input(
                "design_life",
                s,
                "Expected temporary, under-6-months, 5-years, 25-years, 50-years or 100-years",
            )),
        }
    }

    /// Display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            DesignLife::Temporary => "Construction equipment / temporary",
            DesignLife::UnderSixMonths => "Less than 6 months",
            DesignLife::FiveYears => "5 years or less",
            DesignLife::TwentyFiveYears => "25 years or less",
            DesignLife::FiftyYears => "50 years or less",
            DesignLife::HundredYears => "100 years or more",
        }
    }
}

impl std::fmt::Display for DesignLife {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Annual probability of exceedance, written "1/N".
///
/// Serializes as the string form so it can key JSON maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnnualPoe {
    one_in: u32,
}

impl AnnualPoe {
    /// Probability of 1 in `years`
    pub const fn one_in(years: u32) -> Self {
        AnnualPoe { one_in: years }
    }

    /// Return period in years (N in "1/N")
    pub fn return_period_years(&self) -> u32 {
        self.one_in
    }

    /// Parse "1/N" (whitespace tolerated)
    pub fn parse(s: &str) -> CalcResult<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let years = compact
            .strip_prefix("1/")
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| CalcError::invalid_input("annual_poe", s, "Expected the form 1/N with N > 0"))?;
        Ok(AnnualPoe::one_in(years))
    }
}

impl std::fmt::Display for AnnualPoe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1/{}", self.one_in)
    }
}

impl TryFrom<String> for AnnualPoe {
    type Error = CalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AnnualPoe::parse(&value)
    }
}

impl From<AnnualPoe> for String {
    fn from(poe: AnnualPoe) -> Self {
        poe.to_string()
    }
}

/// Recurrence column of the regional wind speed table (V_R for R years)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecurrenceLabel {
    V1,
    V5,
    V10,
    V20,
    V25,
    V50,
    V100,
    V200,
    V250,
    V500,
    V1000,
    V2000,
    V2500,
    V5000,
    V10000,
}

impl RecurrenceLabel {
    /// All recurrence columns, shortest return period first
    pub const ALL: [RecurrenceLabel; 15] = [
        RecurrenceLabel::V1,
        RecurrenceLabel::V5,
        RecurrenceLabel::V10,
        RecurrenceLabel::V20,
        RecurrenceLabel::V25,
        RecurrenceLabel::V50,
        RecurrenceLabel::V100,
        RecurrenceLabel::V200,
        RecurrenceLabel::V250,
        RecurrenceLabel::V500,
        RecurrenceLabel::V1000,
        RecurrenceLabel::V2000,
        RecurrenceLabel::V2500,
        RecurrenceLabel::V5000,
        RecurrenceLabel::V10000,
    ];

    /// Return period in years
    pub fn years(&self) -> u32 {
        match self {
            RecurrenceLabel::V1 => 1,
            RecurrenceLabel::V5 => 5,
            RecurrenceLabel::V10 => 10,
            RecurrenceLabel::V20 => 20,
            RecurrenceLabel::V25 => 25,
            RecurrenceLabel::V50 => 50,
            RecurrenceLabel::V100 => 100,
            RecurrenceLabel::V200 => 200,
            RecurrenceLabel::V250 => 250,
            RecurrenceLabel::V500 => 500,
            RecurrenceLabel::V1000 => 1000,
            RecurrenceLabel::V2000 => 2000,
            RecurrenceLabel::V2500 => 2500,
            RecurrenceLabel::V5000 => 5000,
            RecurrenceLabel::V10000 => 10000,
        }
    }

    /// Table key (e.g., "V50")
    pub fn code(&self) -> String {
        format!("V{}", self.years())
    }

    /// Look up a column by its table key
    pub fn from_code(code: &str) -> Option<Self> {
        let years: u32 = code.trim().strip_prefix('V')?.parse().ok()?;
        RecurrenceLabel::ALL.into_iter().find(|r| r.years() == years)
    }
}

impl std::fmt::Display for RecurrenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "V{}", self.years())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_design_life_flexible_parsing() {
        assert_eq!(DesignLife::from_str_flexible("50").unwrap(), DesignLife::FiftyYears);
        assert_eq!(DesignLife::from_str_flexible("lt6").unwrap(), DesignLife::UnderSixMonths);
        assert_eq!(DesignLife::from_str_flexible("100 years").unwrap(), DesignLife::HundredYears);
        assert!(DesignLife::from_str_flexible("forever").is_err());
    }

    #[test]
    fn test_design_life_serde_matches_code() {
        for life in DesignLife::ALL {
            let json = serde_json::to_string(&life).unwrap();
            assert_eq!(json, format!("\"{}\"", life.code()));
        }
    }

    #[test]
    fn test_annual_poe_parse_and_display() {
        let poe = AnnualPoe::parse("1 / 500").unwrap();
        assert_eq!(poe.return_period_years(), 500);
        assert_eq!(poe.to_string(), "1/500");
        assert!(AnnualPoe::parse("1/0").is_err());
        assert!(AnnualPoe::parse("2/500").is_err());
    }

    #[test]
    fn test_annual_poe_serializes_as_string() {
        let json = serde_json::to_string(&AnnualPoe::one_in(50)).unwrap();
        assert_eq!(json, "\"1/50\"");
        let back: AnnualPoe = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AnnualPoe::one_in(50));
    }

    #[test]
    fn test_recurrence_codes() {
        for label in RecurrenceLabel::ALL {
            assert_eq!(RecurrenceLabel::from_code(&label.code()), Some(label));
        }
        assert_eq!(RecurrenceLabel::from_code("V7"), None);
        assert_eq!(RecurrenceLabel::from_code("50"), None);
    }
}
