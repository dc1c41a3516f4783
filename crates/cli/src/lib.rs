pub mod commands;
pub mod render;
pub mod telemetry;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use shelfscope_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};

use crate::commands::{CommandContext, CommandResult};

#[derive(Debug, Parser)]
#[command(
    name = "shelfscope",
    about = "Seller analytics over a retail order dataset",
    long_about = "Rank department best sellers, find textually similar products, and recommend \
                  best sellers from departments a seller has not entered yet.",
    after_help = "Examples:\n  shelfscope seed --dir data\n  shelfscope trending --chart\n  \
                  shelfscope top produce\n  shelfscope similar Banana --limit 5\n  \
                  shelfscope diversify \"Banana, Organic Strawberries\" --json"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    #[arg(long, global = true, help = "Path to a shelfscope.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Directory holding the five CSV tables")]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[arg(
        long,
        global = true,
        value_parser = parse_log_format,
        help = "Log format (compact|pretty|json)"
    )]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Most ordered products across the marketplace")]
    Trending {
        #[arg(long, help = "Number of products to show")]
        limit: Option<usize>,
        #[arg(long, help = "Append a horizontal bar chart")]
        chart: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List department names accepted by `top`")]
    Departments {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Best-selling products within one department")]
    Top {
        #[arg(help = "Department name, exactly as stored")]
        department: String,
        #[arg(long, help = "Number of products to show")]
        limit: Option<usize>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Catalog products textually similar to a product you sell")]
    Similar {
        #[arg(help = "Product name (case-insensitive)")]
        product: String,
        #[arg(long, help = "Number of products to show")]
        limit: Option<usize>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Best sellers from departments you do not sell in yet")]
    Diversify {
        #[arg(help = "Products you already sell, comma separated")]
        owned: String,
        #[arg(long, help = "Maximum number of recommendations")]
        limit: Option<usize>,
        #[arg(long, help = "Maximum recommendations from any one department")]
        per_department: Option<usize>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Write a small deterministic demo dataset")]
    Seed {
        #[arg(long, help = "Target directory (defaults to the configured data dir)")]
        dir: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and dataset readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    value.parse().map_err(|error: shelfscope_core::config::ConfigError| error.to_string())
}

impl GlobalArgs {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                data_dir: self.data_dir.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let context = CommandContext::new(cli.global.load_options());

    // An invalid config still gets a logger; the command reports the config error itself.
    let logging_config = AppConfig::load(context.options.clone()).unwrap_or_default();
    telemetry::init_logging(&logging_config)?;

    let result = execute(&context, cli.command);
    println!("{}", result.output);
    Ok(ExitCode::from(result.exit_code))
}

fn execute(context: &CommandContext, command: Command) -> CommandResult {
    match command {
        Command::Trending { limit, chart, json } => {
            commands::trending::run(context, limit, json, chart)
        }
        Command::Departments { json } => commands::departments::run(context, json),
        Command::Top { department, limit, json } => {
            commands::top::run(context, &department, limit, json)
        }
        Command::Similar { product, limit, json } => {
            commands::similar::run(context, &product, limit, json)
        }
        Command::Diversify { owned, limit, per_department, json } => {
            commands::diversify::run(context, &owned, limit, per_department, json)
        }
        Command::Seed { dir } => commands::seed::run(context, dir),
        Command::Config => CommandResult::text(commands::config::run(context)),
        Command::Doctor { json } => commands::doctor::run(context, json),
    }
}
