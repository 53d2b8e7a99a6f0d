use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::{is_newest_first, parse_statement_date, sort_newest_first, statement_span, tokenize};
use tally_ingest::{load_keywords, read_statement};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod analysis;
mod config;
mod console;
mod menu;

use analysis::Analysis;
use config::{Config, load_config};
use console::StdConsole;
use menu::{MainMenu, Outputs};

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Keyword-based spending totals for card statements")]
struct Cli {
    /// Config file (default: ./tally.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a statement, print per-category totals, then review interactively
    Analyze {
        /// Statement CSV (default: files.statement from config)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Keyword file of token:category pairs (default: files.keywords)
        #[arg(long)]
        keywords: Option<PathBuf>,

        /// First day to include, MM/DD/YYYY
        #[arg(long, value_parser = parse_statement_date, requires = "to")]
        from: Option<NaiveDate>,

        /// Last day to include, MM/DD/YYYY
        #[arg(long, value_parser = parse_statement_date, requires = "from")]
        to: Option<NaiveDate>,

        /// Where to write the totals (default: files.report)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print totals and exit without prompting
        #[arg(long, default_value_t = false)]
        no_interactive: bool,
    },

    /// List the categories named in the keyword file
    Categories {
        #[arg(long)]
        keywords: Option<PathBuf>,
    },

    /// Show the keyword candidates extracted from a description
    Tokenize {
        description: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    init_logging(&cfg.log.level);

    match cli.command {
        Command::Analyze {
            csv,
            keywords,
            from,
            to,
            report,
            no_interactive,
        } => {
            let range = from.zip(to);
            analyze(&cfg, csv, keywords, range, report, !no_interactive)?;
        }

        Command::Categories { keywords } => {
            let path = keywords.unwrap_or_else(|| cfg.files.keywords.clone());
            let dictionary = load_keywords(&path)?;
            for category in dictionary.known_categories() {
                println!("{category}");
            }
        }

        Command::Tokenize { description } => {
            let tokens: Vec<String> = tokenize(&description).collect();
            println!("{}", tokens.join(" "));
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn analyze(
    cfg: &Config,
    csv: Option<PathBuf>,
    keywords: Option<PathBuf>,
    range: Option<(NaiveDate, NaiveDate)>,
    report: Option<PathBuf>,
    interactive: bool,
) -> Result<()> {
    let keywords_path = keywords.unwrap_or_else(|| cfg.files.keywords.clone());
    let dictionary = load_keywords(&keywords_path)?;

    let csv_path = csv.unwrap_or_else(|| cfg.files.statement.clone());
    if !csv_path.exists() {
        bail!("statement not found: {} (pass --csv <path>)", csv_path.display());
    }
    let mut statement = read_statement(&csv_path, &cfg.statement)
        .with_context(|| format!("parsing {}", csv_path.display()))?;
    if !is_newest_first(&statement) {
        warn!(path = %csv_path.display(), "statement is not newest-first, sorting it");
        sort_newest_first(&mut statement);
    }
    let Some(full_span) = statement_span(&statement) else {
        println!("No transactions in {}", csv_path.display());
        return Ok(());
    };
    println!("Parsed {} transactions from {}", statement.len(), csv_path.display());

    let analysis = Analysis::new(
        statement,
        dictionary,
        cfg.classify.ignore_patterns(),
        cfg.classify.match_policy.into(),
    );
    let outputs = Outputs {
        keywords: Some(keywords_path),
        report: Some(report.unwrap_or_else(|| cfg.files.report.clone())),
    };
    let mut console = StdConsole;
    let mut menu = MainMenu::new(analysis, &mut console, outputs);

    match range {
        Some((from, to)) => menu.apply_range(from, to)?,
        None if interactive => {
            if !menu.prompt_initial_range()? {
                bail!("input ended before a valid date range was entered");
            }
        }
        None => menu.apply_range(full_span.0, full_span.1)?,
    }

    if interactive {
        menu.run()?;
    }
    Ok(())
}
