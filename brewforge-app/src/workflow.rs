use crate::{
    cli::{ChartArgs, GuideArgs, RecipeArgs, TdsArgs, TechniqueArgs},
    config::AppConfig,
    plotting,
};
use anyhow::{anyhow, bail, Context, Result};
use brewforge_core::{
    codec,
    export::TimelineWriter,
    extraction::ExtractionReport,
    ratio::{scale_technique, CalculatorOps},
    registry::Registry,
    slider::slider_config,
    steps::{resolve_step_index, step_status, StepStatus},
    store::{PreferenceStore, Preferences},
    timeline::Timeline,
    timer::{Clock, IntervalTicker, SystemClock, Ticker, TimerBuilder},
    units::{format_clock, format_coffee, format_temperature, format_water},
};
use brewforge_schemas::{
    method::BrewingTechnique,
    recipe::{CalculatorState, RecipeState},
    units::UnitSystem,
};
use std::{
    cell::Cell,
    fs,
    io::Write,
    path::{Path, PathBuf},
    rc::Rc,
};
use tracing::{debug, info, warn};

/// Everything a command needs: the catalog, resolved settings and stored preferences.
pub struct Session<S: PreferenceStore> {
    pub registry: Registry,
    pub config: AppConfig,
    pub preferences: Preferences<S>,
}

impl<S: PreferenceStore> Session<S> {
    pub fn new(registry: Registry, config: AppConfig, preferences: Preferences<S>) -> Self {
        Self {
            registry,
            config,
            preferences,
        }
    }

    fn units(&self) -> UnitSystem {
        self.preferences.unit_system()
    }

    pub fn list(&self, out: &mut impl Write) -> Result<()> {
        for method in self.registry.sorted_by_favorites(self.preferences.favorites()) {
            let star = if self.preferences.is_favorite(&method.id) { "★" } else { " " };
            writeln!(out, "{} {:<16} {}", star, method.id, method.name)?;
            for (i, technique) in method.techniques.iter().enumerate() {
                writeln!(out, "     [{}] {} (1:{})", i, technique.name, technique.ratio)?;
            }
        }
        Ok(())
    }

    pub fn show(&self, args: &TechniqueArgs, out: &mut impl Write) -> Result<()> {
        let method_name = self
            .registry
            .method(&args.method)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        let technique = self.registry.require_technique(&args.method, args.technique)?;
        let units = self.units();

        match &technique.author {
            Some(author) => writeln!(out, "{} · {} by {}", method_name, technique.name, author)?,
            None => writeln!(out, "{} · {}", method_name, technique.name)?,
        }
        writeln!(
            out,
            "Ratio 1:{} · {} coffee · {} water",
            technique.ratio,
            format_coffee(technique.default_coffee_amount, units),
            format_water(technique.default_total_water().round(), units),
        )?;
        writeln!(
            out,
            "Grind {} · {} · {} total",
            technique.grind_size,
            format_temperature(technique.water_temp, units),
            format_clock(f64::from(technique.total_time)),
        )?;
        writeln!(out, "\n{}", technique.description)?;
        if let Some(history) = &technique.history {
            writeln!(out, "\nHistory\n{}", history)?;
        }
        if let Some(explanation) = &technique.explanation {
            writeln!(out, "\nWhy it works\n{}", explanation)?;
        }
        writeln!(out, "\nSteps")?;
        write_steps(out, technique, units)?;
        Ok(())
    }

    /// Dose and ratio snapped onto the method's slider ranges, defaulting to the technique's own.
    pub fn resolve_recipe(
        &self,
        selection: &TechniqueArgs,
        coffee: Option<f64>,
        ratio: Option<f64>,
    ) -> Result<CalculatorState> {
        self.registry.require_technique(&selection.method, selection.technique)?;
        let mut state = CalculatorState::for_method(&self.registry, &selection.method)
            .ok_or_else(|| anyhow!("Brewing method '{}' has no techniques", selection.method))?;
        state.select_technique(&self.registry, selection.technique);

        let sliders = slider_config(&state.method_id);
        if let Some(coffee) = coffee {
            state.coffee_amount = sliders.coffee.snap(coffee);
            if state.coffee_amount != coffee {
                warn!(requested = coffee, used = state.coffee_amount, "coffee dose adjusted to the slider range");
            }
        }
        if let Some(ratio) = ratio {
            state.ratio = sliders.ratio.snap(ratio);
            if state.ratio != ratio {
                warn!(requested = ratio, used = state.ratio, "ratio adjusted to the slider range");
            }
        }
        debug!(?state, "resolved recipe");
        Ok(state)
    }

    pub fn calc(&self, args: &RecipeArgs, out: &mut impl Write) -> Result<()> {
        let state = self.resolve_recipe(&args.selection, args.coffee, args.ratio)?;
        let technique = self.technique_for(&state)?;
        let scaled = scale_technique(technique, state.coffee_amount, state.ratio);
        let units = self.units();

        writeln!(out, "{} · {}", state.method_id, technique.name)?;
        writeln!(
            out,
            "{} coffee at 1:{} → {} water",
            format_coffee(state.coffee_amount, units),
            state.ratio,
            format_water(state.water_amount(), units),
        )?;
        writeln!(out, "\nSteps")?;
        write_steps(out, &scaled, units)?;
        writeln!(out, "\nShare: {}", codec::share_url(&self.config.base_url, &state.into()))?;
        Ok(())
    }

    pub fn guide(&self, args: &GuideArgs, out: &mut impl Write) -> Result<()> {
        let state = match (&args.recipe, &args.method) {
            (Some(link), _) => CalculatorState::from(self.decode_link(link)?),
            (None, Some(method)) => {
                let selection = TechniqueArgs {
                    method: method.clone(),
                    technique: args.technique,
                };
                self.resolve_recipe(&selection, args.coffee, args.ratio)?
            }
            (None, None) => bail!("Pass a method id or --recipe"),
        };
        let technique = scale_technique(self.technique_for(&state)?, state.coffee_amount, state.ratio);
        let timeline = Timeline::derive(&technique, state.water_amount())?;

        info!(method = %state.method_id, speed = args.speed, "starting brew guide");
        writeln!(
            out,
            "{} · {} coffee · {} water · {}",
            technique.name,
            format_coffee(state.coffee_amount, self.units()),
            format_water(state.water_amount(), self.units()),
            format_clock(f64::from(technique.total_time)),
        )?;
        run_guide(
            out,
            &technique,
            &timeline,
            SystemClock::with_speed(args.speed),
            IntervalTicker::new(self.config.frame_period()),
            self.units(),
        )
    }

    pub fn chart(&self, args: &ChartArgs, out: &mut impl Write) -> Result<()> {
        let root = args.out.clone().unwrap_or_else(|| self.config.output_dir.clone());

        if args.ratios {
            let dir = create_run_dir(&root, "ratios")?;
            let path = dir.join("ratio_comparison.png");
            plotting::plot_ratio_comparison(&path, &self.registry.ratio_table())?;
            writeln!(out, "Ratio chart saved to {}", path.display())?;
            return Ok(());
        }

        let method = args
            .method
            .clone()
            .ok_or_else(|| anyhow!("Pass a method id or --ratios"))?;
        let selection = TechniqueArgs {
            method,
            technique: args.technique,
        };
        let state = self.resolve_recipe(&selection, args.coffee, args.ratio)?;
        let technique = self.technique_for(&state)?;
        let timeline = Timeline::derive(technique, state.water_amount())?;

        let dir = create_run_dir(&root, &state.method_id)?;
        let csv_path = dir.join("timeline.csv");
        let rows = TimelineWriter::create(&csv_path)?.write_timeline(&timeline)?;
        let png_path = dir.join("pour_structure.png");
        let title = format!("{} · {}", technique.name, format_water(state.water_amount(), self.units()));
        plotting::plot_pour_structure(&png_path, &title, &timeline)?;

        writeln!(out, "Wrote {} timeline rows to {}", rows, csv_path.display())?;
        writeln!(out, "Pour chart saved to {}", png_path.display())?;
        Ok(())
    }

    pub fn favorite(&mut self, method_id: &str, out: &mut impl Write) -> Result<()> {
        let name = self
            .registry
            .method(method_id)
            .map(|m| m.name.clone())
            .ok_or_else(|| anyhow!("Brewing method '{}' not found in catalog", method_id))?;
        if self.preferences.toggle_favorite(method_id) {
            writeln!(out, "★ {} added to favorites", name)?;
        } else {
            writeln!(out, "{} removed from favorites", name)?;
        }
        Ok(())
    }

    pub fn units_command(&mut self, system: Option<UnitSystem>, out: &mut impl Write) -> Result<()> {
        if let Some(system) = system {
            self.preferences.set_unit_system(system);
        }
        writeln!(out, "Units: {}", self.units())?;
        Ok(())
    }

    pub fn tds(&self, args: &TdsArgs, out: &mut impl Write) -> Result<()> {
        let report = ExtractionReport::measure(args.tds, args.brew, args.coffee);
        let units = self.units();
        writeln!(
            out,
            "{} coffee, {} beverage, TDS {}%",
            format_coffee(args.coffee, units),
            format_coffee(args.brew, units),
            args.tds
        )?;
        writeln!(out, "Extraction yield: {:.1}% ({})", report.extraction_yield, report.extraction)?;
        writeln!(out, "Strength: {}% ({})", report.strength, report.strength_status)?;
        writeln!(out, "Next brew: {}", report.extraction.advice())?;
        Ok(())
    }

    pub fn share(&self, args: &RecipeArgs, out: &mut impl Write) -> Result<()> {
        let state = self.resolve_recipe(&args.selection, args.coffee, args.ratio)?;
        writeln!(out, "{}", codec::share_url(&self.config.base_url, &state.into()))?;
        Ok(())
    }

    pub fn decode(&self, link: &str, out: &mut impl Write) -> Result<()> {
        let recipe = self.decode_link(link)?;
        let technique = self.registry.require_technique(&recipe.method_id, recipe.technique_index)?;
        let state = CalculatorState::from(recipe);
        let units = self.units();
        writeln!(out, "Method:    {}", state.method_id)?;
        writeln!(out, "Technique: [{}] {}", state.technique_index, technique.name)?;
        writeln!(out, "Coffee:    {}", format_coffee(state.coffee_amount, units))?;
        writeln!(out, "Ratio:     1:{}", state.ratio)?;
        writeln!(out, "Water:     {}", format_water(state.water_amount(), units))?;
        Ok(())
    }

    fn decode_link(&self, link: &str) -> Result<RecipeState> {
        let query = link.split_once('?').map_or(link, |(_, query)| query);
        let params = codec::parse_query(query);
        if let Some(recipe) = codec::decode_recipe(&params, &self.registry) {
            return Ok(recipe);
        }
        let partial = codec::decode_app_state(&params, &self.registry);
        debug!(?partial, "recipe link only partially valid");
        match partial.method_id {
            Some(method) => bail!(
                "Recipe link for '{}' is incomplete or out of range (technique {:?}, coffee {:?}, ratio {:?})",
                method,
                partial.technique_index,
                partial.coffee_amount,
                partial.ratio
            ),
            None => bail!("'{}' is not a recipe link for a known method", link),
        }
    }

    fn technique_for(&self, state: &CalculatorState) -> Result<&BrewingTechnique> {
        Ok(self.registry.require_technique(&state.method_id, state.technique_index)?)
    }
}

/// Drives the countdown to completion, printing each step as it becomes active.
pub fn run_guide<C: Clock, T: Ticker>(
    out: &mut impl Write,
    technique: &BrewingTechnique,
    timeline: &Timeline,
    clock: C,
    ticker: T,
    units: UnitSystem,
) -> Result<()> {
    let elapsed = Rc::new(Cell::new(0.0));
    let sink = Rc::clone(&elapsed);
    let mut timer = TimerBuilder::for_technique(technique, clock, ticker)
        .on_tick(move |t| sink.set(t))
        .auto_start(true)
        .build()?;

    let steps = &technique.steps;
    let mut shown = None;
    loop {
        let now = elapsed.get();
        let active = resolve_step_index(steps, now);
        if shown != Some(active) {
            shown = Some(active);
            // Steps sharing the active step's time are all due now.
            let due_at = steps.get(active).map(|step| step.time);
            for step in steps.iter().skip(active).take_while(|s| Some(s.time) == due_at) {
                writeln!(out, "▶ {}  {}{}", format_clock(f64::from(step.time)), step.description, water_suffix(step.water_amount, units))?;
            }
            let upcoming = steps
                .iter()
                .enumerate()
                .find(|(i, s)| step_status(*i, active) == StepStatus::Upcoming && due_at.is_some_and(|t| s.time > t));
            if let Some((_, next)) = upcoming {
                writeln!(out, "  next at {}: {}", format_clock(f64::from(next.time)), next.description)?;
            }
        }
        if !timer.pump() {
            break;
        }
    }

    let total = timer.total();
    writeln!(
        out,
        "Brew complete at {} · {} poured",
        format_clock(total),
        format_water(timeline.water_at(total), units)
    )?;
    Ok(())
}

fn write_steps(out: &mut impl Write, technique: &BrewingTechnique, units: UnitSystem) -> Result<()> {
    for step in &technique.steps {
        writeln!(
            out,
            "  {:>5}  {}{}",
            format_clock(f64::from(step.time)),
            step.description,
            water_suffix(step.water_amount, units)
        )?;
    }
    Ok(())
}

fn water_suffix(water: Option<f64>, units: UnitSystem) -> String {
    water.map_or_else(String::new, |w| format!(" ({})", format_water(w, units)))
}

/// `<root>/<label>_<UTC timestamp>`, created on disk.
pub fn create_run_dir(root: &Path, label: &str) -> Result<PathBuf> {
    let dir = root.join(format!("{}_{}", label, chrono::Utc::now().format("%Y%m%d_%H%M%S")));
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create output directory: {:?}", dir))?;
    Ok(dir)
}
