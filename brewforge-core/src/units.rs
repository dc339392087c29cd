//! Display conversions. Everything is stored and computed in grams, millilitres
//! and degrees Celsius; these helpers only produce strings for the chosen unit system.

use brewforge_schemas::units::UnitSystem;

const GRAMS_PER_OUNCE: f64 = 28.35;
const ML_PER_FL_OZ: f64 = 29.57;

pub fn grams_to_ounces(grams: f64) -> f64 {
    grams / GRAMS_PER_OUNCE
}

pub fn ounces_to_grams(ounces: f64) -> f64 {
    ounces * GRAMS_PER_OUNCE
}

pub fn ml_to_fl_oz(ml: f64) -> f64 {
    ml / ML_PER_FL_OZ
}

pub fn fl_oz_to_ml(fl_oz: f64) -> f64 {
    fl_oz * ML_PER_FL_OZ
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn format_coffee(grams: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => format!("{:.1}oz", grams_to_ounces(grams)),
        UnitSystem::Metric if grams.fract() == 0.0 => format!("{:.0}g", grams),
        UnitSystem::Metric => format!("{:.1}g", grams),
    }
}

pub fn format_water(ml: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => format!("{:.1}fl oz", ml_to_fl_oz(ml)),
        UnitSystem::Metric => format!("{}ml", ml.round()),
    }
}

pub fn format_temperature(celsius: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Imperial => format!("{}°F", celsius_to_fahrenheit(celsius).round()),
        UnitSystem::Metric => format!("{}°C", celsius.round()),
    }
}

/// `m:ss`, truncating fractional seconds.
pub fn format_clock(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let mins = (seconds / 60.0).floor();
    let secs = (seconds % 60.0).floor();
    format!("{}:{:02}", mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn metric_coffee_drops_trailing_zero() {
        assert_eq!(format_coffee(18.0, UnitSystem::Metric), "18g");
        assert_eq!(format_coffee(18.5, UnitSystem::Metric), "18.5g");
    }

    #[test]
    fn imperial_formatting() {
        assert_eq!(format_coffee(18.0, UnitSystem::Imperial), "0.6oz");
        assert_eq!(format_water(300.0, UnitSystem::Imperial), "10.1fl oz");
        assert_eq!(format_temperature(96.0, UnitSystem::Imperial), "205°F");
        assert_eq!(format_temperature(100.0, UnitSystem::Imperial), "212°F");
    }

    #[test]
    fn metric_water_and_temperature_round() {
        assert_eq!(format_water(299.6, UnitSystem::Metric), "300ml");
        assert_eq!(format_temperature(93.2, UnitSystem::Metric), "93°C");
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(210.0), "3:30");
        assert_eq!(format_clock(59.99), "0:59");
        assert_eq!(format_clock(43_200.0), "720:00");
    }

    proptest! {
        #[test]
        fn temperature_round_trips(celsius in 0.0f64..=100.0) {
            let back = fahrenheit_to_celsius(celsius_to_fahrenheit(celsius));
            prop_assert!((back - celsius).abs() < 1e-9);
        }

        #[test]
        fn mass_and_volume_round_trip(value in 0.0f64..2000.0) {
            prop_assert!((ounces_to_grams(grams_to_ounces(value)) - value).abs() < 1e-9);
            prop_assert!((fl_oz_to_ml(ml_to_fl_oz(value)) - value).abs() < 1e-9);
        }
    }
}
