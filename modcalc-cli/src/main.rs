mod reports;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use modcalc_engine::{
    ComparisonMode, DEFAULT_PATH_LIMIT, LevelVector, StrengthenOptions, StrengthenOutcome,
    affix_odds, catalog, compute,
};
use util::parse_id_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    Console,
    /// Pretty-printed JSON
    Json,
    /// Markdown summary
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Any slot may cover any target level
    OrderIndependent,
    /// Each slot must reach its own target level
    PositionWise,
}

impl From<ModeArg> for ComparisonMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::OrderIndependent => ComparisonMode::OrderIndependent,
            ModeArg::PositionWise => ComparisonMode::PositionWise,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "modcalc", version)]
#[command(about = "Exact odds for mod affix rolls and strengthen upgrades")]
struct Args {
    /// Output report format
    #[arg(long, value_enum, global = true, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Odds that five strengthen upgrades reach the target levels
    Strengthen(StrengthenArgs),
    /// Odds that every rolled affix falls inside a target range
    Affix(AffixArgs),
    /// List the affix pool
    Catalog,
}

#[derive(Debug, clap::Args)]
struct StrengthenArgs {
    /// Starting levels of the four affixes, e.g. 1,2,3,1
    #[arg(long)]
    initial: LevelVector,

    /// Levels to reach, e.g. 3,4,5,2
    #[arg(long)]
    target: LevelVector,

    /// How finished levels are compared against the target
    #[arg(long, value_enum, default_value_t = ModeArg::OrderIndependent)]
    mode: ModeArg,

    /// Record and show individual upgrade paths
    #[arg(long)]
    paths: bool,

    /// Maximum paths to record (0 records all)
    #[arg(long, default_value_t = DEFAULT_PATH_LIMIT)]
    path_limit: usize,
}

#[derive(Debug, clap::Args)]
struct AffixArgs {
    /// Number of affixes rolled onto the mod
    #[arg(long)]
    slots: i64,

    /// Wanted affix ids (comma-separated, 1-10)
    #[arg(long)]
    targets: String,

    /// List every winning draw (up to 1000)
    #[arg(long)]
    combinations: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_some() {
        colored::control::set_override(false);
    }

    let mut output_target = OutputTarget::new(args.output.clone())?;
    run_command(&args, &mut output_target)?;
    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run_command(args: &Args, out: &mut dyn Write) -> Result<()> {
    match &args.command {
        Command::Strengthen(cmd) => {
            let outcome = run_strengthen(cmd)?;
            match args.report {
                ReportFormat::Console => reports::generate_strengthen_console(out, &outcome),
                ReportFormat::Json => reports::generate_json_report(out, &outcome),
                ReportFormat::Markdown => reports::generate_strengthen_markdown(out, &outcome),
            }
        }
        Command::Affix(cmd) => {
            let ids = parse_id_list(&cmd.targets)?;
            let odds = affix_odds(cmd.slots, &ids, cmd.combinations)
                .context("cannot compute affix odds")?;
            match args.report {
                ReportFormat::Console => reports::generate_affix_console(out, &odds, catalog()),
                ReportFormat::Json => reports::generate_json_report(out, &odds),
                ReportFormat::Markdown => reports::generate_affix_markdown(out, &odds, catalog()),
            }
        }
        Command::Catalog => match args.report {
            ReportFormat::Console => reports::generate_catalog_console(out, catalog()),
            ReportFormat::Json => reports::generate_json_report(out, catalog()),
            ReportFormat::Markdown => reports::generate_catalog_markdown(out, catalog()),
        },
    }
}

fn strengthen_options(cmd: &StrengthenArgs) -> StrengthenOptions {
    let options = StrengthenOptions::new(cmd.mode.into());
    if cmd.paths {
        options.with_paths((cmd.path_limit > 0).then_some(cmd.path_limit))
    } else {
        options
    }
}

fn run_strengthen(cmd: &StrengthenArgs) -> Result<StrengthenOutcome> {
    compute(&cmd.initial, &cmd.target, strengthen_options(cmd))
        .context("cannot compute strengthen odds")
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
