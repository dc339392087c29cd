use brewforge_schemas::units::UnitSystem;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "brewforge",
    version,
    about = "Coffee brewing ratio calculator and brew guide",
    long_about = "Scale brewing recipes to any dose and ratio, follow a timed step-by-step guide,\n\
                  chart pour structure and share recipes as links."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Load brewing methods from this directory of YAML files instead of the built-in catalog.
    #[arg(long, value_name = "DIR", global = true)]
    pub catalog: Option<PathBuf>,

    /// Preference file holding favorites and the unit system.
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// YAML configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List brewing methods, favorites first.
    List,

    /// Show a technique in detail.
    Show(TechniqueArgs),

    /// Calculate water and scaled steps for a dose and ratio.
    Calc(RecipeArgs),

    /// Run the brew timer and print each step as it becomes active.
    Guide(GuideArgs),

    /// Draw the pour-structure chart and export its timeline as CSV.
    Chart(ChartArgs),

    /// Toggle a method in or out of the favorites.
    Favorite {
        /// Method id, e.g. `v60`.
        method: String,
    },

    /// Show or set the display unit system.
    Units {
        /// `metric` or `imperial`; omit to print the current setting.
        system: Option<UnitSystem>,
    },

    /// Extraction yield and strength from a refractometer reading.
    Tds(TdsArgs),

    /// Print a shareable link for a recipe.
    Share(RecipeArgs),

    /// Decode a recipe link or query string.
    Decode {
        /// Full URL or bare query string.
        query: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct TechniqueArgs {
    /// Method id, e.g. `v60`.
    pub method: String,

    /// Technique index within the method.
    #[arg(short, long, default_value_t = 0)]
    pub technique: usize,
}

#[derive(Args, Debug, Clone)]
pub struct RecipeArgs {
    #[command(flatten)]
    pub selection: TechniqueArgs,

    /// Coffee dose in grams. Defaults to the technique's dose.
    #[arg(short, long)]
    pub coffee: Option<f64>,

    /// Water to coffee ratio. Defaults to the technique's ratio.
    #[arg(short, long)]
    pub ratio: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct GuideArgs {
    /// Method id. Required unless --recipe is given.
    #[arg(required_unless_present = "recipe")]
    pub method: Option<String>,

    #[arg(short, long, default_value_t = 0)]
    pub technique: usize,

    #[arg(short, long)]
    pub coffee: Option<f64>,

    #[arg(short, long)]
    pub ratio: Option<f64>,

    /// Start from a shared recipe link instead.
    #[arg(long, conflicts_with = "method")]
    pub recipe: Option<String>,

    /// Clock multiplier, e.g. 10 runs a 3:30 brew in 21 seconds.
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,
}

#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    /// Method id. Required unless --ratios is given.
    #[arg(required_unless_present = "ratios")]
    pub method: Option<String>,

    #[arg(short, long, default_value_t = 0)]
    pub technique: usize,

    #[arg(short, long)]
    pub coffee: Option<f64>,

    #[arg(short, long)]
    pub ratio: Option<f64>,

    /// Draw the ratio comparison across every technique instead.
    #[arg(long)]
    pub ratios: bool,

    /// Parent directory for the run folder.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct TdsArgs {
    /// Dry coffee weight in grams.
    #[arg(long, default_value_t = 20.0)]
    pub coffee: f64,

    /// Beverage weight in grams.
    #[arg(long, default_value_t = 300.0)]
    pub brew: f64,

    /// Refractometer reading in percent.
    #[arg(long, default_value_t = 1.3)]
    pub tds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn guide_accepts_a_recipe_link_without_a_method() {
        let cli = Cli::try_parse_from(["brewforge", "guide", "--recipe", "method=v60&tech=0&coffee=18&ratio=16"]).unwrap();
        match cli.command {
            Command::Guide(args) => {
                assert!(args.method.is_none());
                assert_eq!(args.speed, 1.0);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::try_parse_from(["brewforge", "calc", "chemex", "-c", "30", "-vv", "--store", "p.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.store, Some(PathBuf::from("p.json")));
        match cli.command {
            Command::Calc(args) => {
                assert_eq!(args.selection.method, "chemex");
                assert_eq!(args.coffee, Some(30.0));
                assert_eq!(args.ratio, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn units_parses_the_system_name() {
        let cli = Cli::try_parse_from(["brewforge", "units", "imperial"]).unwrap();
        assert!(matches!(cli.command, Command::Units { system: Some(UnitSystem::Imperial) }));
        assert!(Cli::try_parse_from(["brewforge", "units", "cubits"]).is_err());
    }
}
