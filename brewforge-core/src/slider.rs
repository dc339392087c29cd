//! Input ranges for the dose and ratio controls, tuned per brewing method.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamps `value` into range and rounds it onto the step grid anchored at `min`.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        // Round away float noise like 1.5 + 3 * 0.1 = 1.8000000000000003.
        let snapped = ((self.min + steps * self.step) * 1e6).round() / 1e6;
        snapped.min(self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    pub coffee: SliderRange,
    pub ratio: SliderRange,
}

const DEFAULT_CONFIG: SliderConfig = SliderConfig {
    coffee: SliderRange::new(5.0, 60.0, 0.5),
    ratio: SliderRange::new(1.0, 25.0, 0.5),
};

pub fn slider_config(method_id: &str) -> SliderConfig {
    match method_id {
        "espresso" => SliderConfig {
            coffee: SliderRange::new(15.0, 25.0, 0.5),
            ratio: SliderRange::new(1.5, 3.0, 0.1),
        },
        "cold-brew" => SliderConfig {
            coffee: SliderRange::new(30.0, 50.0, 1.0),
            ratio: SliderRange::new(6.0, 10.0, 0.5),
        },
        "french-press" => SliderConfig {
            coffee: SliderRange::new(15.0, 40.0, 0.5),
            ratio: SliderRange::new(12.0, 18.0, 0.5),
        },
        "moka-pot" => SliderConfig {
            coffee: SliderRange::new(15.0, 50.0, 1.0),
            ratio: SliderRange::new(5.0, 10.0, 0.5),
        },
        _ => DEFAULT_CONFIG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_methods_get_the_default_ranges() {
        assert_eq!(slider_config("v60"), DEFAULT_CONFIG);
        assert_eq!(slider_config("nonexistent"), DEFAULT_CONFIG);
    }

    #[test]
    fn espresso_uses_fine_ratio_steps() {
        let config = slider_config("espresso");
        assert_eq!(config.ratio.step, 0.1);
        assert_eq!(config.ratio.snap(1.83), 1.8);
        assert_eq!(config.coffee.snap(40.0), 25.0);
    }

    #[test]
    fn snap_clamps_and_rounds_to_step() {
        let range = slider_config("cold-brew").coffee;
        assert_eq!(range.snap(10.0), 30.0);
        assert_eq!(range.snap(37.6), 38.0);
        assert_eq!(range.snap(f64::NAN), 30.0);
        assert!(range.contains(range.snap(99.0)));
    }
}
