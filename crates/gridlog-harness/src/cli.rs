#![forbid(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use gridlog_core::{LogFormat, LoggingConfig};
use gridlog_runtime::SessionConfig;

use crate::error::{HarnessError, Result};
use crate::fixtures;
use crate::script::{Script, ScriptReport, run_script};

#[derive(Debug, Parser)]
#[command(
    name = "gridlog-harness",
    about = "Run scripted editing sessions against an in-memory workbook",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub logging: LogArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Log output format: pretty, compact, or json.
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// EnvFilter directive. `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_filter: String,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the built-in demo script and print its report.
    Demo,

    /// Run a JSON script file and print its report.
    Run(RunArgs),

    /// Print a built-in script as JSON.
    #[command(name = "print-demo")]
    PrintDemo,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Path to the script.
    pub script: PathBuf,

    /// TOML session config, replacing the script's `config` section.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit non-zero if any step failed.
    #[arg(long)]
    pub strict: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli.logging)?;
    match cli.command {
        Commands::Demo => {
            let script = fixtures::demo_script();
            print_json(&execute(&script))
        }
        Commands::Run(args) => run_script_file(&args),
        Commands::PrintDemo => print_json(&fixtures::demo_script()),
    }
}

fn init_logging(args: &LogArgs) -> Result<()> {
    let config = LoggingConfig::default()
        .with_filter(args.log_filter.clone())
        .with_format(args.log_format);
    gridlog_core::logging::init(&config).map_err(|e| HarnessError::Logging(e.to_string()))
}

/// Parse a script file.
pub fn load_script(path: &Path) -> Result<Script> {
    let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn run_script_file(args: &RunArgs) -> Result<()> {
    let mut script = load_script(&args.script)?;
    if let Some(path) = &args.config {
        script.config = SessionConfig::from_toml_file(path)?;
    }
    script.config = script.config.validated()?;

    let report = execute(&script);
    print_json(&report)?;
    if args.strict && !report.failures.is_empty() {
        return Err(HarnessError::StepsFailed {
            failed: report.failures.len(),
        });
    }
    Ok(())
}

fn execute(script: &Script) -> ScriptReport {
    tracing::info!(
        target: "gridlog.harness",
        steps = script.steps.len(),
        owner = %script.owner,
        "running script"
    );
    run_script(script)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").map_err(|source| HarnessError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })
}
