use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrindSize {
    #[serde(rename = "Fine")]
    Fine,
    #[serde(rename = "Medium-Fine")]
    MediumFine,
    #[serde(rename = "Medium")]
    Medium,
    #[serde(rename = "Medium-Coarse")]
    MediumCoarse,
    #[serde(rename = "Coarse")]
    Coarse,
}

impl GrindSize {
    pub fn label(&self) -> &'static str {
        match self {
            GrindSize::Fine => "Fine",
            GrindSize::MediumFine => "Medium-Fine",
            GrindSize::Medium => "Medium",
            GrindSize::MediumCoarse => "Medium-Coarse",
            GrindSize::Coarse => "Coarse",
        }
    }
}

impl fmt::Display for GrindSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single timed action within a technique.
///
/// `water_amount` is cumulative: it is the total weight of water in the brewer
/// once this step is done, not the size of this pour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrewingStep {
    pub time: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_amount: Option<f64>,
    #[serde(default)]
    pub is_pour: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrewingTechnique {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub ratio: f64,
    pub default_coffee_amount: f64,
    pub grind_size: GrindSize,
    pub water_temp: f64,
    pub total_time: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub steps: Vec<BrewingStep>,
}

impl BrewingTechnique {
    /// Water weight the technique was written for.
    pub fn default_total_water(&self) -> f64 {
        self.default_coffee_amount * self.ratio
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrewingMethod {
    pub id: String,
    pub name: String,
    pub description: String,
    pub techniques: Vec<BrewingTechnique>,
}
