use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

use incomelens_core::time::report_date_in_tz;
use incomelens_finance::{IncomeEngine, PayrollMatch, ReportContext};

mod config;
mod export;
mod render;
mod state;
mod telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "incomelens",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("INCOMELENS_BUILD_SHA"), ")"),
    about = "Derive an explainable income report from a bank-data snapshot"
)]
struct Cli {
    /// Config file (default: ~/.incomelens/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an income report from a snapshot JSON file
    Report {
        /// Provider snapshot or legacy report JSON
        #[arg(long)]
        snapshot: PathBuf,

        /// Report date (YYYY-MM-DD); defaults to today in the configured timezone
        #[arg(long)]
        as_of: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also export the transaction ledger as CSV
        #[arg(long)]
        ledger_csv: Option<PathBuf>,
    },

    /// Show how the payroll rules label each description
    Classify {
        #[arg(required = true)]
        descriptions: Vec<String>,
    },

    /// Manage ~/.incomelens/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_override = cli.config.as_deref();

    let cfg = config::load_config(config_override)?;
    telemetry::init(&cfg.logging.level)?;

    match cli.command {
        Command::Report {
            snapshot,
            as_of,
            format,
            output,
            ledger_csv,
        } => {
            let engine = IncomeEngine::new(cfg.engine.clone()).context("invalid [engine] config")?;
            let as_of = match as_of {
                Some(d) => d,
                None => report_date_in_tz(Utc::now(), &cfg.report.timezone)?,
            };
            run_report(&engine, &snapshot, as_of, format, output.as_deref(), ledger_csv.as_deref())?;
        }

        Command::Classify { descriptions } => {
            let engine = IncomeEngine::new(cfg.engine.clone()).context("invalid [engine] config")?;
            let classifier = engine.classifier();
            println!("rules v{}", classifier.version());
            for desc in &descriptions {
                let verdict = match classifier.explain(desc) {
                    PayrollMatch::Included { keyword } => format!("payroll   (matched \"{keyword}\")"),
                    PayrollMatch::Excluded { keyword } => format!("excluded  (matched \"{keyword}\")"),
                    PayrollMatch::Unmatched => "unmatched".to_string(),
                };
                println!("{verdict:<34} {desc}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(config_override)?,
            ConfigCommand::Show => {
                let path = config::config_path(config_override)?;
                let text = toml::to_string_pretty(&cfg).context("serialize config")?;
                println!("# {}", path.display());
                print!("{text}");
            }
        },
    }

    Ok(())
}

fn run_report(
    engine: &IncomeEngine,
    snapshot: &Path,
    as_of: NaiveDate,
    format: OutputFormat,
    output: Option<&Path>,
    ledger_csv: Option<&Path>,
) -> Result<()> {
    if !snapshot.exists() {
        bail!("Snapshot not found: {}", snapshot.display());
    }
    let raw = std::fs::read_to_string(snapshot)
        .with_context(|| format!("read {}", snapshot.display()))?;
    let input = incomelens_ingest::parse_snapshot(&raw)
        .with_context(|| format!("parsing {}", snapshot.display()))?;

    let ctx = ReportContext::new(as_of, Utc::now());
    let report = engine.generate(&input, &ctx);
    debug!(rows = report.transactions.len(), "report ready");

    let rendered = match format {
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(&report).context("serialize report")?;
            s.push('\n');
            s
        }
        OutputFormat::Text => render::render_text(&report),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("write {}", path.display()))?;
            eprintln!("Wrote report: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    if let Some(path) = ledger_csv {
        export::write_ledger_file(path, &report.transactions)?;
        eprintln!("Wrote ledger ({} rows): {}", report.transactions.len(), path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_build_label_is_sha_or_unknown() {
        let label = env!("INCOMELENS_BUILD_SHA");
        let sha = label.strip_suffix("-dirty").unwrap_or(label);
        assert!(
            sha == "unknown" || (!sha.is_empty() && sha.chars().all(|c| c.is_ascii_hexdigit())),
            "unexpected build label {label:?}"
        );
        let version = Cli::command().render_version();
        assert!(version.contains(&format!("({label})")));
    }
}
