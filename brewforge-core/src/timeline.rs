//! Cumulative-water-over-time curves for charting a technique.
//!
//! Steps only say how much water should be in the brewer at a given second.
//! Drawing those as vertical jumps looks nothing like pouring, so each pour is
//! spread into a short ramp of samples before the next plateau.
//!
//! The bloom ramp belongs to the first pour that carries water, not to
//! whichever step sits at time 0. A technique that opens with a dry pour
//! marker gets a plateau there and blooms on its first real pour.

use crate::error::BrewError;
use brewforge_schemas::method::BrewingTechnique;
use serde::Serialize;

const BLOOM_RAMP_SECS: f64 = 5.0;
const MIN_POUR_SECS: f64 = 10.0;
const MAX_POUR_SECS: f64 = 30.0;
const POUR_FRACTION: f64 = 0.7;
const SAMPLE_SPACING_SECS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub time: f64,
    pub water: f64,
    pub label: String,
}

impl TimelinePoint {
    fn new(time: f64, water: f64, label: impl Into<String>) -> Self {
        Self {
            time,
            water,
            label: label.into(),
        }
    }
}

/// A derived, time-sorted sequence of [`TimelinePoint`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    points: Vec<TimelinePoint>,
    duration: f64,
}

impl Timeline {
    /// Expands `technique` into a curve that ends at `total_water` grams.
    ///
    /// # Errors
    ///
    /// Returns [`BrewError::ZeroBaseWater`] when the technique's default dose
    /// times ratio is zero, since pours cannot be scaled against it.
    pub fn derive(technique: &BrewingTechnique, total_water: f64) -> Result<Self, BrewError> {
        let base_water = technique.default_total_water();
        if base_water == 0.0 || !base_water.is_finite() {
            return Err(BrewError::ZeroBaseWater(technique.name.clone()));
        }
        let scale = total_water / base_water;

        let mut points = vec![TimelinePoint::new(0.0, 0.0, "Start")];
        let mut current_water = 0.0;
        let mut previous_time = 0.0;
        let mut bloomed = false;

        for step in &technique.steps {
            let step_time = f64::from(step.time);

            match step.water_amount.filter(|_| step.is_pour) {
                Some(water) => {
                    let scaled = (water * scale).round();
                    let interval = step_time - previous_time;

                    if !bloomed {
                        points.push(TimelinePoint::new(
                            previous_time + BLOOM_RAMP_SECS.min(interval / 2.0),
                            scaled,
                            step.description.as_str(),
                        ));
                        bloomed = true;
                    } else {
                        let duration = (interval * POUR_FRACTION).clamp(MIN_POUR_SECS, MAX_POUR_SECS);
                        let samples = ((duration / SAMPLE_SPACING_SECS).floor() as usize).max(2);
                        for i in 1..=samples {
                            let (i, n) = (i as f64, samples as f64);
                            let label = if i == n { step.description.as_str() } else { "" };
                            points.push(TimelinePoint::new(
                                previous_time + duration * i / n,
                                (current_water + (scaled - current_water) * i / n).round(),
                                label,
                            ));
                        }
                    }
                    current_water = scaled;
                }
                None => {
                    points.push(TimelinePoint::new(step_time, current_water, step.description.as_str()));
                }
            }

            previous_time = step_time;
        }

        let duration = f64::from(technique.total_time);
        points.push(TimelinePoint::new(duration, current_water, "End"));
        // Stable, so samples sharing a time keep insertion order.
        points.sort_by(|a, b| a.time.total_cmp(&b.time));

        Ok(Self { points, duration })
    }

    pub fn points(&self) -> &[TimelinePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimelinePoint> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn max_water(&self) -> f64 {
        self.points.iter().map(|p| p.water).fold(0.0, f64::max)
    }

    /// Water on the curve at `time`, interpolating linearly between samples.
    pub fn water_at(&self, time: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if time <= first.time {
            return first.water;
        }
        for pair in self.points.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if time <= b.time {
                if b.time == a.time {
                    return b.water;
                }
                let fraction = (time - a.time) / (b.time - a.time);
                return a.water + (b.water - a.water) * fraction;
            }
        }
        self.points.last().map_or(0.0, |p| p.water)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelinePoint;
    type IntoIter = std::slice::Iter<'a, TimelinePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
