//! Extraction yield from a refractometer reading.

use serde::Serialize;
use std::fmt;

pub const IDEAL_EXTRACTION: (f64, f64) = (18.0, 22.0);
pub const IDEAL_STRENGTH: (f64, f64) = (1.15, 1.45);

/// Percent of the dry coffee mass that ended up dissolved in the cup.
/// Zero when either weight is not positive.
pub fn extraction_yield(tds_percent: f64, brew_weight: f64, coffee_weight: f64) -> f64 {
    if brew_weight <= 0.0 || coffee_weight <= 0.0 {
        return 0.0;
    }
    (tds_percent / 100.0 * brew_weight) / coffee_weight * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStatus {
    UnderExtracted,
    Ideal,
    OverExtracted,
}

impl ExtractionStatus {
    pub fn classify(yield_percent: f64) -> Self {
        let (min, max) = IDEAL_EXTRACTION;
        if yield_percent < min {
            ExtractionStatus::UnderExtracted
        } else if yield_percent > max {
            ExtractionStatus::OverExtracted
        } else {
            ExtractionStatus::Ideal
        }
    }

    /// What to change on the next brew.
    pub fn advice(self) -> &'static str {
        match self {
            ExtractionStatus::UnderExtracted => "grind finer, brew longer or use hotter water",
            ExtractionStatus::Ideal => "keep the recipe as is",
            ExtractionStatus::OverExtracted => "grind coarser, brew shorter or use cooler water",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExtractionStatus::UnderExtracted => "Under",
            ExtractionStatus::Ideal => "Ideal",
            ExtractionStatus::OverExtracted => "Over",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrengthStatus {
    Weak,
    Ideal,
    Strong,
}

impl StrengthStatus {
    pub fn classify(tds_percent: f64) -> Self {
        let (min, max) = IDEAL_STRENGTH;
        if tds_percent < min {
            StrengthStatus::Weak
        } else if tds_percent > max {
            StrengthStatus::Strong
        } else {
            StrengthStatus::Ideal
        }
    }
}

impl fmt::Display for StrengthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrengthStatus::Weak => "Weak",
            StrengthStatus::Ideal => "Ideal",
            StrengthStatus::Strong => "Strong",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtractionReport {
    pub extraction_yield: f64,
    pub strength: f64,
    pub extraction: ExtractionStatus,
    pub strength_status: StrengthStatus,
}

impl ExtractionReport {
    pub fn measure(tds_percent: f64, brew_weight: f64, coffee_weight: f64) -> Self {
        let extraction_yield = extraction_yield(tds_percent, brew_weight, coffee_weight);
        Self {
            extraction_yield,
            strength: tds_percent,
            extraction: ExtractionStatus::classify(extraction_yield),
            strength_status: StrengthStatus::classify(tds_percent),
        }
    }
}
