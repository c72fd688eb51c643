//! Advocates CLI
//!
//! Command-line interface for the advocate directory.
//! Provides both one-shot listing/searching and an interactive table.

use advocates::highlight::Highlighter;
use advocates::{filter_with, logging, tui, Advocate, AppConfig, MatchRules, SpecialtyMatch};
use clap::{Parser, Subcommand, ValueEnum};
use console::{measure_text_width, style, truncate_str};
use indicatif::{HumanDuration, ProgressBar};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Advocates - searchable advocate directory
///
/// Fetches the full advocate list once and filters it locally.
#[derive(Parser)]
#[command(name = "advocates")]
#[command(version)]
#[command(about = "Searchable advocate directory", long_about = None)]
struct Cli {
    /// Advocate API endpoint
    #[arg(long, env = "ADVOCATES_ENDPOINT", default_value = advocates::loader::DEFAULT_ENDPOINT, global = true)]
    endpoint: String,

    /// Read the `{ "data": [...] }` envelope from a file instead of the endpoint
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    timeout_secs: u64,

    /// Quiet period before a search runs, in milliseconds
    #[arg(long, default_value = "500", global = true)]
    debounce_ms: u64,

    /// How specialties are matched
    #[arg(long, value_enum, default_value = "per-element", global = true)]
    specialties: SpecialtyMatch,

    /// Also match against phone numbers
    #[arg(long, global = true)]
    match_phone: bool,

    /// Log file (default: advocates.log in the temp directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive, searchable advocate table
    Browse,

    /// Print every advocate
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Print the advocates matching a keyword
    Search {
        /// Keyword (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            endpoint: self.endpoint.clone(),
            file: self.file.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            quiet_period: Duration::from_millis(self.debounce_ms),
            rules: MatchRules {
                specialties: self.specialties,
                match_phone: self.match_phone,
            },
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("{} could not open log file {}: {}", style("Warning:").yellow().bold(), log_path.display(), e);
    }
    tracing::info!("advocates {} starting up", advocates::VERSION);

    let config = cli.config();

    let result = match cli.command {
        Commands::Browse => tui::run(&config),
        Commands::List { output } => cmd_search(&config, "", output),
        Commands::Search { query, output } => cmd_search(&config, &query, output),
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Fetch once, filter, print
fn cmd_search(config: &AppConfig, query: &str, output: OutputFormat) -> advocates::Result<()> {
    let source = config.source();
    let start = Instant::now();

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Fetching advocates from {}", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let fetched = advocates::loader::spawn(source).wait();
    spinner.finish_and_clear();
    let canonical = fetched?;

    let results = filter_with(&canonical, query, &config.rules);

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "data": results }))?);
        }
        OutputFormat::Text => print_table(&results, canonical.len(), query, config, start.elapsed()),
    }

    Ok(())
}

const COLUMNS: [(&str, usize); 7] = [
    ("First Name", 12),
    ("Last Name", 12),
    ("City", 14),
    ("Degree", 8),
    ("Specialties", 36),
    ("Experience", 10),
    ("Phone Number", 12),
];

fn print_table(results: &[Advocate], total: usize, query: &str, config: &AppConfig, elapsed: Duration) {
    let term = advocates::filter::normalize(query);
    let highlighter = Highlighter::new(&term);
    let phone_highlighter = if config.rules.match_phone { highlighter.as_ref() } else { None };

    println!();
    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(name, width)| format!("{:width$}", name, width = *width))
        .collect();
    println!("  {}", style(header.join(" ")).bold().underlined());

    if results.is_empty() {
        println!("  {}", style("No result found.").dim());
    }

    for advocate in results {
        let specialties = advocate
            .specialties
            .iter()
            .map(|s| styled(s, highlighter.as_ref()))
            .collect::<Vec<_>>()
            .join(", ");
        let cells = [
            styled(&advocate.first_name, highlighter.as_ref()),
            styled(&advocate.last_name, highlighter.as_ref()),
            styled(&advocate.city, highlighter.as_ref()),
            styled(&advocate.degree, highlighter.as_ref()),
            specialties,
            styled(&advocate.years_of_experience.to_string(), highlighter.as_ref()),
            styled(&advocate.phone_number.to_string(), phone_highlighter),
        ];

        let line: Vec<String> = cells
            .iter()
            .zip(COLUMNS.iter())
            .map(|(cell, (_, width))| pad(cell, *width))
            .collect();
        println!("  {}", line.join(" "));
    }

    println!();
    println!(
        "{} {} of {} advocates in {}",
        style("✓").green().bold(),
        style(results.len()).cyan(),
        total,
        style(HumanDuration(elapsed)).cyan()
    );
}

/// Cell text with occurrences of the term highlighted
fn styled(text: &str, highlighter: Option<&Highlighter>) -> String {
    match highlighter {
        Some(h) => h
            .segments(text)
            .iter()
            .map(|segment| {
                if segment.matched {
                    style(segment.text).black().on_yellow().to_string()
                } else {
                    segment.text.to_string()
                }
            })
            .collect(),
        None => text.to_string(),
    }
}

/// Fit to exactly `width` visible columns, ignoring ANSI escapes
fn pad(cell: &str, width: usize) -> String {
    let cell = truncate_str(cell, width, "\u{2026}");
    let visible = measure_text_width(&cell);
    format!("{}{}", cell, " ".repeat(width.saturating_sub(visible)))
}
