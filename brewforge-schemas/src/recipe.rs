use serde::{Deserialize, Serialize};

/// Live calculator selection, owned by whoever drives the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CalculatorState {
    pub method_id: String,
    pub technique_index: usize,
    pub coffee_amount: f64,
    pub ratio: f64,
}

/// The part of the calculator state that can be shared as a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RecipeState {
    pub method_id: String,
    pub technique_index: usize,
    pub coffee_amount: f64,
    pub ratio: f64,
}

/// Full navigation state: active tab plus whatever recipe fields survived validation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppState {
    pub tab: String,
    pub method_id: Option<String>,
    pub technique_index: Option<usize>,
    pub coffee_amount: Option<f64>,
    pub ratio: Option<f64>,
}

impl From<CalculatorState> for RecipeState {
    fn from(state: CalculatorState) -> Self {
        Self {
            method_id: state.method_id,
            technique_index: state.technique_index,
            coffee_amount: state.coffee_amount,
            ratio: state.ratio,
        }
    }
}

impl From<RecipeState> for CalculatorState {
    fn from(recipe: RecipeState) -> Self {
        Self {
            method_id: recipe.method_id,
            technique_index: recipe.technique_index,
            coffee_amount: recipe.coffee_amount,
            ratio: recipe.ratio,
        }
    }
}
