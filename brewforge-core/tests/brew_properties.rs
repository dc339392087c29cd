use brewforge_core::{
    codec,
    ratio::{compute_water, CalculatorOps},
    registry::Registry,
    slider::slider_config,
    steps::resolve_step_index,
    timeline::Timeline,
    timer::{TimerBuilder, TimerState, VirtualClock, VirtualTicker},
};
use brewforge_schemas::recipe::{CalculatorState, RecipeState};
use proptest::prelude::*;
use std::{cell::Cell, cell::RefCell, rc::Rc, time::Duration};

fn registry() -> Registry {
    Registry::builtin().unwrap()
}

/// Every (method id, technique index) pair in the built-in catalog.
fn technique_refs() -> Vec<(String, usize)> {
    registry()
        .methods()
        .iter()
        .flat_map(|m| (0..m.techniques.len()).map(move |i| (m.id.clone(), i)))
        .collect()
}

fn technique_strategy() -> impl Strategy<Value = (String, usize)> {
    proptest::sample::select(technique_refs())
}

proptest! {
    #[test]
    fn water_is_the_rounded_product(coffee in 0.0f64..200.0, ratio in 0.0f64..30.0) {
        prop_assert_eq!(compute_water(coffee, ratio), (coffee * ratio).round());
    }

    #[test]
    fn water_grows_with_the_dose(coffee in 0.0f64..100.0, extra in 0.0f64..100.0, ratio in 0.0f64..30.0) {
        prop_assert!(compute_water(coffee + extra, ratio) >= compute_water(coffee, ratio));
    }

    #[test]
    fn water_grows_with_the_ratio(coffee in 0.0f64..100.0, ratio in 0.0f64..30.0, extra in 0.0f64..30.0) {
        prop_assert!(compute_water(coffee, ratio + extra) >= compute_water(coffee, ratio));
    }

    #[test]
    fn timelines_are_sorted_and_bounded(
        (method_id, index) in technique_strategy(),
        coffee in 5.0f64..60.0,
        ratio in 1.0f64..25.0,
    ) {
        let registry = registry();
        let technique = registry.technique(&method_id, index).unwrap();
        let timeline = Timeline::derive(technique, compute_water(coffee, ratio)).unwrap();

        let first = &timeline.points()[0];
        prop_assert_eq!((first.time, first.water), (0.0, 0.0));
        for pair in timeline.points().windows(2) {
            prop_assert!(pair[0].time <= pair[1].time);
            prop_assert!(pair[0].water <= pair[1].water, "water fell from {} to {}", pair[0].water, pair[1].water);
        }
        prop_assert!(timeline.iter().any(|p| p.label == "End" && p.time == timeline.duration()));
        prop_assert!(timeline.iter().all(|p| p.water >= 0.0 && p.water <= timeline.max_water()));
    }

    #[test]
    fn active_step_has_been_reached_and_starts_its_run(
        (method_id, index) in technique_strategy(),
        elapsed in 0.0f64..2000.0,
    ) {
        let registry = registry();
        let steps = &registry.technique(&method_id, index).unwrap().steps;
        let active = resolve_step_index(steps, elapsed);

        prop_assert!(active < steps.len());
        if active > 0 {
            prop_assert!(f64::from(steps[active].time) <= elapsed);
            prop_assert!(steps[active - 1].time < steps[active].time);
        }
        if let Some(next) = steps.get(active + 1) {
            prop_assert!(f64::from(next.time) > elapsed || next.time == steps[active].time);
        }
    }

    #[test]
    fn recipes_survive_a_share_link(
        (method_id, technique_index) in technique_strategy(),
        coffee_steps in 0u32..=110,
        ratio_steps in 0u32..=48,
    ) {
        let config = slider_config(&method_id);
        let recipe = RecipeState {
            method_id,
            technique_index,
            coffee_amount: config.coffee.snap(5.0 + f64::from(coffee_steps) * 0.5),
            ratio: config.ratio.snap(1.0 + f64::from(ratio_steps) * 0.5),
        };
        let url = codec::share_url("https://brew.example/", &recipe);
        let query = url.split_once('?').unwrap().1;
        prop_assert_eq!(codec::decode_recipe(&codec::parse_query(query), &registry()), Some(recipe));
    }

    #[test]
    fn timer_completes_once_and_never_overshoots(
        total_secs in 1u64..300,
        advances_ms in proptest::collection::vec(0u64..20_000, 1..60),
    ) {
        let clock = VirtualClock::new();
        let ticker = VirtualTicker::new();
        let reports = Rc::new(RefCell::new(Vec::new()));
        let completions = Rc::new(Cell::new(0u32));

        let sink = Rc::clone(&reports);
        let done = Rc::clone(&completions);
        let mut timer = TimerBuilder::new(total_secs as f64, clock.clone(), ticker.clone())
            .on_tick(move |t| sink.borrow_mut().push(t))
            .on_complete(move || done.set(done.get() + 1))
            .auto_start(true)
            .build()
            .unwrap();

        for ms in &advances_ms {
            clock.advance(Duration::from_millis(*ms));
            timer.pump();
        }

        let total = total_secs as f64;
        let reports = reports.borrow();
        prop_assert!(reports.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(reports.iter().all(|t| *t <= total));

        let reached = advances_ms.iter().sum::<u64>() >= total_secs * 1000;
        prop_assert_eq!(completions.get(), u32::from(reached));
        prop_assert_eq!(timer.state() == TimerState::Completed, reached);
        if reached {
            prop_assert_eq!(reports.last().copied(), Some(total));
            prop_assert_eq!(ticker.pending_frames(), 0);
        }
    }
}

#[test]
fn method_switch_resets_to_the_first_technique() {
    let registry = registry();
    let mut state = CalculatorState::for_method(&registry, "v60").unwrap();
    assert!(state.select_technique(&registry, 1));
    state.coffee_amount = 30.0;

    assert!(state.select_method(&registry, "chemex"));
    let chemex = registry.technique("chemex", 0).unwrap();
    assert_eq!(state.technique_index, 0);
    assert_eq!(state.coffee_amount, chemex.default_coffee_amount);
    assert_eq!(state.ratio, chemex.ratio);

    assert!(!state.select_method(&registry, "percolator"));
    assert_eq!(state.method_id, "chemex");
}
