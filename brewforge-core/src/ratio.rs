use crate::registry::Registry;
use brewforge_schemas::{method::BrewingTechnique, recipe::CalculatorState};
use tracing::warn;

/// Water needed for `coffee` grams at a water/coffee `ratio`, rounded to the gram.
pub fn compute_water(coffee: f64, ratio: f64) -> f64 {
    (coffee * ratio).round()
}

/// How much a technique's pours must grow or shrink for a custom dose and ratio.
///
/// Returns `None` when the technique has no base water to scale against.
pub fn scale_factor(technique: &BrewingTechnique, coffee: f64, ratio: f64) -> Option<f64> {
    let base = technique.default_total_water();
    if base > 0.0 {
        Some((coffee * ratio) / base)
    } else {
        None
    }
}

/// Returns a copy of `technique` adjusted to the given dose and ratio.
pub fn scale_technique(technique: &BrewingTechnique, coffee: f64, ratio: f64) -> BrewingTechnique {
    let mut scaled = technique.clone();
    scaled.default_coffee_amount = coffee;
    scaled.ratio = ratio;

    let Some(factor) = scale_factor(technique, coffee, ratio) else {
        warn!(technique = %technique.name, "technique has no base water, leaving pours unscaled");
        return scaled;
    };

    for step in &mut scaled.steps {
        step.water_amount = step.water_amount.map(|w| (w * factor).round());
    }
    scaled
}

/// Selection changes on the calculator, mirroring the method/technique pickers.
pub trait CalculatorOps {
    /// State for technique 0 of `method_id`, or `None` if the method is unknown.
    fn for_method(registry: &Registry, method_id: &str) -> Option<CalculatorState>;
    fn select_method(&mut self, registry: &Registry, method_id: &str) -> bool;
    fn select_technique(&mut self, registry: &Registry, index: usize) -> bool;
    fn water_amount(&self) -> f64;
}

impl CalculatorOps for CalculatorState {
    fn for_method(registry: &Registry, method_id: &str) -> Option<CalculatorState> {
        let technique = registry.technique(method_id, 0)?;
        Some(CalculatorState {
            method_id: method_id.to_string(),
            technique_index: 0,
            coffee_amount: technique.default_coffee_amount,
            ratio: technique.ratio,
        })
    }

    /// Switching method always resets to its first technique and that technique's defaults.
    fn select_method(&mut self, registry: &Registry, method_id: &str) -> bool {
        match Self::for_method(registry, method_id) {
            Some(state) => {
                *self = state;
                true
            }
            None => false,
        }
    }

    fn select_technique(&mut self, registry: &Registry, index: usize) -> bool {
        match registry.technique(&self.method_id, index) {
            Some(technique) => {
                self.technique_index = index;
                self.coffee_amount = technique.default_coffee_amount;
                self.ratio = technique.ratio;
                true
            }
            None => false,
        }
    }

    fn water_amount(&self) -> f64 {
        compute_water(self.coffee_amount, self.ratio)
    }
}
