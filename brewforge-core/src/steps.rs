use brewforge_schemas::method::BrewingStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Past,
    Active,
    Upcoming,
}

/// Index of the step that is active `elapsed` seconds into a brew.
///
/// That is the last step whose time has been reached. When several steps share
/// that timestamp, the first of them is returned so simultaneous actions are
/// read from the top. Before the first step, and for an empty list, this is 0.
pub fn resolve_step_index(steps: &[BrewingStep], elapsed: f64) -> usize {
    let Some(mut index) = steps.iter().rposition(|s| f64::from(s.time) <= elapsed) else {
        return 0;
    };
    let time = steps[index].time;
    while index > 0 && steps[index - 1].time == time {
        index -= 1;
    }
    index
}

pub fn step_status(index: usize, active: usize) -> StepStatus {
    match index.cmp(&active) {
        std::cmp::Ordering::Less => StepStatus::Past,
        std::cmp::Ordering::Equal => StepStatus::Active,
        std::cmp::Ordering::Greater => StepStatus::Upcoming,
    }
}
