//! restgen code generator
//!
//! Generates API clients and enum serializers from annotated Rust sources.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use restgen_gen::config::GeneratorConfig;
use restgen_gen::errors::GeneratorError;
use restgen_gen::output::write_units;
use restgen_gen::pipeline::{GenerationReport, Generator};
use restgen_gen::source::SourceUnit;
use tracing::debug;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

/// restgen code generator - turns annotated traits and enums into clients and serializers
#[derive(Parser, Debug)]
#[command(name = "restgen-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source files or directories to scan (directories are walked for .rs files)
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Directory module paths are derived from
    #[arg(long, default_value = "src")]
    src_root: PathBuf,

    /// Output directory for generated units
    #[arg(short, long, default_value = "target/restgen")]
    output: PathBuf,

    /// Config file [default: ./restgen.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Suffix appended to trait names for client names
    #[arg(long)]
    client_suffix: Option<String>,

    /// Also write every unit to this directory
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Report format on stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Initialize tracing from RUST_LOG or the verbosity count
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,restgen_gen=info".to_string(),
            2 => "info,restgen_gen=debug".to_string(),
            _ => "debug,restgen_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// Expands directories into the `.rs` files below them, sorted.
fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(
                WalkDir::new(input)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|entry| entry.file_type().is_file())
                    .map(|entry| entry.into_path())
                    .filter(|path| path.extension().is_some_and(|ext| ext == "rs")),
            );
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn resolve_config(cli: &Cli) -> Result<GeneratorConfig, GeneratorError> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::discover(Path::new("."))?,
    };
    if let Some(suffix) = &cli.client_suffix {
        config.client_suffix = suffix.clone();
    }
    if let Some(dir) = &cli.dump_dir {
        config.debug.dump_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(report: &GenerationReport, output: &Path, dry_run: bool) {
    for unit in &report.units {
        let target = if dry_run {
            "(dry run)".dimmed().to_string()
        } else {
            output.join(unit.file_name()).display().to_string()
        };
        println!("{} {} -> {}", "generated".green().bold(), unit.hint, target);
    }
    for diagnostic in &report.diagnostics {
        println!("{} {}", "skipped".yellow().bold(), diagnostic);
    }
    if report.cancelled {
        println!("{}", "cancelled before all declarations were processed".red());
    }
    println!(
        "{} unit(s), {} diagnostic(s)",
        report.units.len().to_string().bold(),
        report.diagnostics.len().to_string().bold()
    );
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    let files = collect_inputs(&cli.input);
    debug!(files = files.len(), "collected inputs");

    let units = files
        .iter()
        .map(|file| SourceUnit::load(file, Some(&cli.src_root)))
        .collect::<Result<Vec<_>, _>>()?;

    let report = Generator::new(config)?.generate(&units)?;

    if cli.dry_run {
        for unit in &report.units {
            eprintln!("=== {} ===\n{}", unit.file_name(), unit.code);
        }
    } else {
        write_units(&cli.output, &report.units)?;
    }

    match cli.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => print_summary(&report, &cli.output, cli.dry_run),
    }

    Ok(())
}
