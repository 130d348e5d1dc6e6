use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use periodize_core::config::check_taper_window;
use periodize_core::estimators::speed_band_fraction;
use periodize_core::patterns::describe_zone_table;
use periodize_core::{
    acwr, critical_speed_kmh, generate, target_speed_kmh, DerivedPatterns, GeneratedPlan,
    LoadFlag, PlanConfig, RawCompetition, TimeTrial, Zone,
};
use periodize_ingest::{
    export_workbook, load_baseline_csv, load_competitions_csv, load_daily_minutes_csv,
    write_plan_json,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

/// Accepted aerobic-capacity input range (ml/kg/min).
const CAPACITY_RANGE: std::ops::RangeInclusive<f64> = 30.0..=95.0;

#[derive(Parser, Debug)]
#[command(
    name = "periodize",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PERIODIZE_BUILD_SHA"), ")"),
    about = "Periodized biathlon training plans from a baseline calendar"
)]
struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a plan from a baseline calendar, a capacity value and competitions
    Generate(GenerateArgs),

    /// Print the patterns learned from a baseline calendar
    Patterns {
        #[arg(long)]
        baseline: PathBuf,

        /// Taper window in days (defaults to config)
        #[arg(long)]
        window: Option<u32>,
    },

    /// Standalone load and speed estimators
    Estimate {
        #[command(subcommand)]
        command: EstimateCommand,
    },

    /// Write a default ~/.periodize/config.toml
    InitConfig,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Baseline calendar CSV (Date, Zone 1..5, Strength, Type)
    #[arg(long)]
    baseline: PathBuf,

    /// Athlete VO2max (ml/kg/min)
    #[arg(long)]
    capacity: f64,

    /// Competition as DATE:KIND, e.g. 2026-01-10:main (repeatable)
    #[arg(long = "competition")]
    competitions: Vec<String>,

    /// CSV of competitions (Date, Type)
    #[arg(long = "competitions")]
    competitions_csv: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Reference capacity the baseline was written for
    #[arg(long)]
    reference: Option<f64>,

    /// Taper window in days
    #[arg(long)]
    window: Option<u32>,

    /// Directory for plan.csv and weekly_summary.csv
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also write the plan as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Rows to print after generation (0 disables)
    #[arg(long)]
    preview: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum EstimateCommand {
    /// Critical speed from two time trials, with per-zone target speeds
    CriticalSpeed {
        /// First trial distance (m)
        #[arg(long)]
        d1: f64,
        /// First trial time (s)
        #[arg(long)]
        t1: f64,
        /// Second trial distance (m)
        #[arg(long)]
        d2: f64,
        /// Second trial time (s)
        #[arg(long)]
        t2: f64,
    },

    /// Acute:chronic workload ratio from a daily minutes CSV (oldest first)
    Acwr {
        #[arg(long)]
        minutes: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => cmd_generate(args),
        Command::Patterns { baseline, window } => cmd_patterns(baseline, window),
        Command::Estimate { command } => match command {
            EstimateCommand::CriticalSpeed { d1, t1, d2, t2 } => {
                cmd_critical_speed(TimeTrial::new(d1, t1), TimeTrial::new(d2, t2))
            }
            EstimateCommand::Acwr { minutes } => cmd_acwr(minutes),
        },
        Command::InitConfig => config::init_config(),
    }
}

fn validate_capacity(capacity: f64) -> Result<()> {
    if !CAPACITY_RANGE.contains(&capacity) {
        bail!(
            "capacity {capacity} outside {}..={}",
            CAPACITY_RANGE.start(),
            CAPACITY_RANGE.end()
        );
    }
    Ok(())
}

/// Flags override the `[plan]` section of the config file.
fn plan_config(base: PlanConfig, args: &GenerateArgs) -> PlanConfig {
    let mut cfg = base;
    if let Some(seed) = args.seed {
        cfg = cfg.with_seed(seed);
    }
    if let Some(reference) = args.reference {
        cfg = cfg.with_reference_capacity(reference);
    }
    if let Some(window) = args.window {
        cfg = cfg.with_taper_window(window);
    }
    cfg
}

fn collect_competitions(args: &GenerateArgs) -> Result<Vec<RawCompetition>> {
    let mut out = Vec::new();
    if let Some(path) = &args.competitions_csv {
        out.extend(load_competitions_csv(path)?);
    }
    out.extend(args.competitions.iter().map(|s| RawCompetition::parse_pair(s)));
    Ok(out)
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    validate_capacity(args.capacity)?;
    let cfg = config::load_config()?;
    let plan_cfg = plan_config(cfg.plan.clone(), &args);
    debug!(?plan_cfg, "effective plan config");

    let baseline = load_baseline_csv(&args.baseline)?;
    let competitions = collect_competitions(&args)?;
    info!(
        days = baseline.len(),
        competitions = competitions.len(),
        "loaded inputs"
    );

    let plan = generate(&baseline, args.capacity, &competitions, &plan_cfg)
        .context("generating plan")?;

    let out_dir = args.out_dir.unwrap_or(cfg.output.dir);
    let paths = export_workbook(&plan, &out_dir)?;
    println!("Wrote {}", paths.plan.display());
    println!("Wrote {}", paths.weekly.display());

    if let Some(json_path) = &args.json {
        let f = std::fs::File::create(json_path)
            .with_context(|| format!("write {}", json_path.display()))?;
        write_plan_json(&plan, f)?;
        println!("Wrote {}", json_path.display());
    }

    print_preview(&plan, args.preview.unwrap_or(cfg.output.preview_rows));
    Ok(())
}

fn print_preview(plan: &GeneratedPlan, rows: usize) {
    if rows == 0 {
        return;
    }
    let cal = &plan.calendar;
    println!(
        "\n{} days, capacity ratio {:.3}, {} competitions",
        cal.len(),
        plan.capacity_ratio,
        plan.competitions.len()
    );
    println!(
        "{:<10}  {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}  {:<11} {:<9} {}",
        "Date", "Z1", "Z2", "Z3", "Z4", "Z5", "Str", "Phase", "Theme", "Start"
    );
    for day in cal.days().iter().take(rows) {
        let m = &day.zone_minutes;
        println!(
            "{:<10}  {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1}  {:<11} {:<9} {}",
            day.date.to_string(),
            m[Zone::Z1],
            m[Zone::Z2],
            m[Zone::Z3],
            m[Zone::Z4],
            m[Zone::Z5],
            m[Zone::Strength],
            day.phase.map(|p| p.label()).unwrap_or("-"),
            day.week_theme.map(|t| t.label()).unwrap_or("-"),
            day.display_label()
        );
    }
    if cal.len() > rows {
        println!("... {} more", cal.len() - rows);
    }
}

fn cmd_patterns(baseline: PathBuf, window: Option<u32>) -> Result<()> {
    let cfg = config::load_config()?;
    let window = check_taper_window(window.unwrap_or(cfg.plan.taper_window_days))?;
    let baseline = load_baseline_csv(&baseline)?;
    let patterns = DerivedPatterns::derive(&baseline, window);

    println!("# Taper profile (offset = days before start)\n");
    for (offset, day) in patterns.taper.iter() {
        println!(
            "-{offset:<2} total={:>6.1}  {}",
            day.total_minutes,
            describe_zone_table(&day.zone_proportions)
        );
    }

    println!("\n# Focus pattern\n");
    println!(
        "high={:.3} low={:.3}",
        patterns.focus.high_multiplier, patterns.focus.low_multiplier
    );

    println!("\n# Preparatory terciles\n");
    for (name, table) in ["early", "mid", "late"]
        .iter()
        .zip(patterns.terciles.as_array())
    {
        println!("{name:<5} {}", describe_zone_table(table));
    }
    Ok(())
}

fn cmd_critical_speed(a: TimeTrial, b: TimeTrial) -> Result<()> {
    let Some(cs) = critical_speed_kmh(a, b) else {
        bail!("critical speed undefined: both trials have the same duration");
    };
    println!("Critical speed: {cs:.2} km/h\n");
    for zone in Zone::ALL {
        let (Some((lo_frac, hi_frac)), Some((lo, hi))) =
            (speed_band_fraction(zone), target_speed_kmh(zone, cs))
        else {
            continue;
        };
        println!(
            "{:<7} {:>3.0}-{:>3.0}% CS  {lo:>5.2}-{hi:>5.2} km/h",
            zone.column_name(),
            lo_frac * 100.0,
            hi_frac * 100.0
        );
    }
    Ok(())
}

fn cmd_acwr(minutes: PathBuf) -> Result<()> {
    let series = load_daily_minutes_csv(&minutes)?;
    let ratio = acwr(&series);
    match ratio {
        Some(r) => println!("ACWR: {r:.2} ({} days)", series.len()),
        None => println!("ACWR: undefined (no chronic load over the last 28 days)"),
    }
    if LoadFlag::from_acwr(ratio) == LoadFlag::HighLoad {
        println!("Warning: acute load spike (ACWR >= 1.5)");
    }
    Ok(())
}
