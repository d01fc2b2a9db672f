mod generate;
mod simulate;
mod timeline;

use std::path::{Path, PathBuf};

use anyhow::Context;
use beatlane_core::chart::Chart;
use beatlane_core::config::CoreConfig;
use clap::{ArgAction, Parser, Subcommand};

use crate::simulate::SimulateOptions;

#[derive(Debug, Parser)]
#[command(name = "beatlane")]
#[command(about = "Headless tools for the beatlane timing core", long_about = None)]
struct Cli {
    /// -v for info, -vv for debug. RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Core config JSON; defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a random chart.
    Generate {
        #[arg(long)]
        seed: Option<u64>,
        /// Writes to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "Generated")]
        title: String,
    },
    /// Autoplay a chart and print the result.
    Simulate {
        chart: PathBuf,
        /// Constant press offset; negative presses early.
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        offset_ms: f64,
        /// Uniform random press error in +/- this many ms.
        #[arg(long, default_value_t = 0.0)]
        jitter_ms: f64,
        /// Skip every Nth note.
        #[arg(long)]
        miss_every: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print a four-lane text timeline of a chart.
    Timeline { chart: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config = match &cli.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => CoreConfig::default(),
    };

    match cli.command {
        Command::Generate {
            seed,
            output,
            title,
        } => {
            let file = generate::generate_chart(seed, &title, config.editor.bpm);
            match output {
                Some(path) => {
                    chart_schema::save_chart_json_to_path(&file, &path)?;
                    log::info!("wrote {} notes to {}", file.notes.len(), path.display());
                }
                None => {
                    let json = serde_json::to_string_pretty(&file)
                        .context("failed to serialize chart")?;
                    println!("{json}");
                }
            }
        }
        Command::Simulate {
            chart,
            offset_ms,
            jitter_ms,
            miss_every,
            seed,
            json,
        } => {
            let chart = load_chart(&chart)?;
            let options = SimulateOptions {
                offset_ms,
                jitter_ms,
                miss_every,
                seed,
            };
            let result = simulate::run_simulation(&chart, &config.game, &options)?;
            if json {
                let out =
                    serde_json::to_string_pretty(&result).context("failed to serialize result")?;
                println!("{out}");
            } else {
                print!("{}", simulate::format_result(&result));
            }
        }
        Command::Timeline { chart } => {
            let chart = load_chart(&chart)?;
            print!("{}", timeline::render_timeline(&chart));
        }
    }

    Ok(())
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn load_chart(path: &Path) -> anyhow::Result<Chart> {
    let file = chart_schema::load_chart_json_from_path(path)
        .with_context(|| format!("failed to load chart: {}", path.display()))?;
    Chart::from_file(&file).with_context(|| format!("invalid chart: {}", path.display()))
}
