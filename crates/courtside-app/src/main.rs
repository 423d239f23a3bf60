// courtside entry point.
//
// Startup sequence:
// 1. Parse command line
// 2. Initialize tracing (stderr, so stdout stays clean for reports)
// 3. Load config, copying defaults on first run
// 4. Load the CSV dataset
// 5. Run the requested subcommand and print the report

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use courtside_app::config;
use courtside_app::dataset::Dataset;
use courtside_app::pipeline::{self, AnalyzedPlayer, Comparison, RankedMatch};
use courtside_core::compare::ScalarMetric;
use courtside_core::model::SeasonLabel;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Player-season metrics and similarity scores", long_about = None)]
struct Cli {
    /// Directory holding config/, defaults/ and the data directory
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    /// Print JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute derived metrics for one player-season
    Metrics {
        name: String,
        /// Season label, e.g. 2019-20. Defaults to the current season.
        season: Option<SeasonLabel>,
    },
    /// Score the similarity of two player-seasons
    Compare {
        name_a: String,
        season_a: SeasonLabel,
        name_b: String,
        season_b: SeasonLabel,
    },
    /// Rank every player-season on file by similarity to one target
    Similar {
        name: String,
        /// Defaults to the current season.
        season: Option<SeasonLabel>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = config::load_config(&cli.base_dir).context("failed to load configuration")?;
    let data_dir = config.data_dir(&cli.base_dir);
    let dataset = Dataset::load(&data_dir, &config.data.files)
        .with_context(|| format!("failed to load dataset from {}", data_dir.display()))?;
    info!(
        "Loaded {} players from {}",
        dataset.player_count(),
        data_dir.display()
    );

    match cli.command {
        Command::Metrics { name, season } => {
            let season = season.unwrap_or_else(current_season);
            let analyzed = pipeline::analyze_player(&dataset, &name, season)
                .with_context(|| format!("failed to analyze {name} {season}"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&analyzed)?);
            } else {
                print_metrics(&analyzed);
            }
        }
        Command::Compare {
            name_a,
            season_a,
            name_b,
            season_b,
        } => {
            let comparison = pipeline::compare_players(
                &dataset,
                &config.comparator,
                (&name_a, season_a),
                (&name_b, season_b),
            )
            .context("comparison failed")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&comparison)?);
            } else {
                print_comparison(&comparison);
            }
        }
        Command::Similar {
            name,
            season,
            limit,
        } => {
            let season = season.unwrap_or_else(current_season);
            let matches = pipeline::find_similar(
                &dataset,
                &config.comparator,
                (&name, season),
                &dataset.player_season_keys(),
                limit,
            )
            .with_context(|| format!("similarity search for {name} {season} failed"))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                print_matches(&name, season, &matches);
            }
        }
    }

    Ok(())
}

fn print_metrics(analyzed: &AnalyzedPlayer) {
    let m = &analyzed.metrics;
    println!("{} ({})", analyzed.name, m.season);
    println!("  team possessions     {:>8.2}", m.team_possessions);
    println!("  points / 100         {:>8.2}", m.per_100.pts);
    println!("  assists / 100        {:>8.2}", m.per_100.ast);
    println!("  turnovers / 100      {:>8.2}", m.per_100.tov);
    println!("  box creation         {:>8.2}", m.box_creation);
    println!("  offensive load       {:>8.2}", m.offensive_load);
    println!("  usage rate           {:>8.2}", m.usage_rate);
    println!("  shooting quality     {:>8.2}", m.shooting_quality());
    println!("  spacing              {:>8.2}", m.spacing());
    println!("  height (cm)          {:>8.2}", m.height_cm());
    match m.wingspan() {
        Some(w) => println!("  wingspan (cm)        {:>8.2}", w),
        None => println!("  wingspan (cm)             n/a"),
    }
    println!("  shot distance");
    for split in &m.splits {
        println!("    {:<18} {:>6.2}", split.bucket, split.attempt_share);
    }
}

fn print_comparison(c: &Comparison) {
    println!(
        "{} ({}) vs {} ({})",
        c.a.name, c.a.metrics.season, c.b.name, c.b.metrics.season
    );
    for metric in ScalarMetric::ALL {
        match c.similarity.ratio_for(metric) {
            Some(ratio) => println!("  {:<18} {:>7.2}", metric.label(), ratio),
            None => println!("  {:<18}  skipped", metric.label()),
        }
    }
    println!("  {:<18} {:>7.2}", "shot distance", c.similarity.splits_ratio);
    println!("  similarity         {:>7.2}", c.similarity.score);
}

fn print_matches(name: &str, season: SeasonLabel, matches: &[RankedMatch]) {
    println!("Most similar to {name} ({season})");
    for (rank, m) in matches.iter().enumerate() {
        println!("  {:>2}. {:<28} {}  {:>7.2}", rank + 1, m.name, m.season, m.score);
    }
}

fn current_season() -> SeasonLabel {
    SeasonLabel::containing(chrono::Local::now().date_naive())
}

/// Initialize tracing to stderr; reports go to stdout.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtside=info,courtside_app=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
