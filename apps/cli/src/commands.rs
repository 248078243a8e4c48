//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use facultydir_core::{PassSummary, ProgressReporter, run_enrichment_pass, run_merge_pass};
use facultydir_fetch::HttpFetcher;
use facultydir_shared::{AppConfig, init_config, load_config, load_config_from, validate_config};
use facultydir_signals::extract_signals;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

/// `extraction_method` recorded for pages read from disk.
const FILE_METHOD: &str = "file";

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// facultydir: build a faculty directory from HR data, department listings,
/// and faculty websites.
#[derive(Parser)]
#[command(
    name = "facultydir",
    version,
    about = "Merge HR faculty records with scraped listings and enrich them from faculty websites.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.facultydir/facultydir.toml).
    #[arg(long, global = true, env = "FACULTYDIR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data directory holding inputs and outputs (overrides config).
    #[arg(long, global = true, env = "FACULTYDIR_DATA_DIR")]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Merge the HR extract with scraped department batches into a roster.
    Merge {
        /// Clear blank scraped fields so they cannot overwrite HR values.
        #[arg(long)]
        drop_blank_fields: bool,
    },

    /// Enrich the roster from each faculty member's website.
    Enrich {
        /// Minimum milliseconds between website fetches (overrides config).
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Per-request timeout in seconds (overrides config).
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Allow fetching loopback and private-network hosts.
        #[arg(long)]
        allow_private_hosts: bool,
    },

    /// Extract text signals from a saved HTML page and print them as JSON.
    Extract {
        /// HTML file to read.
        html_file: PathBuf,

        /// URL the page was served from; relative CV links resolve against it.
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "facultydir=info",
        1 => "facultydir=debug",
        _ => "facultydir=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Command::Merge { drop_blank_fields } => {
            let mut config = resolve_config(config_path, data_dir)?;
            if drop_blank_fields {
                config.merge.drop_blank_scraped_fields = true;
            }
            cmd_merge(&config)
        }
        Command::Enrich {
            interval_ms,
            timeout_secs,
            allow_private_hosts,
        } => {
            let mut config = resolve_config(config_path, data_dir)?;
            if let Some(ms) = interval_ms {
                config.pacing.website_interval_ms = ms;
            }
            if let Some(secs) = timeout_secs {
                config.fetch.timeout_secs = secs;
            }
            if allow_private_hosts {
                config.fetch.allow_private_hosts = true;
            }
            cmd_enrich(&config).await
        }
        Command::Extract {
            html_file,
            base_url,
        } => cmd_extract(&html_file, base_url.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path, data_dir),
        },
    }
}

/// Load config from `--config` or the default location, apply `--data-dir`,
/// and validate.
fn resolve_config(path: Option<&Path>, data_dir: Option<&str>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    if let Some(dir) = data_dir {
        config.paths.data_dir = dir.to_string();
    }
    validate_config(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_merge(config: &AppConfig) -> Result<()> {
    info!(data_dir = %config.paths.data_dir, "merging faculty listings");

    let reporter = CliProgress::new();
    let result = run_merge_pass(config, &reporter)?;
    let stats = &result.stats;

    println!();
    println!("  Roster merged!");
    println!("  Batches:   {}", stats.batches);
    println!("  Matched:   {}", stats.matched);
    println!("  Web only:  {}", stats.web_only);
    println!("  HR only:   {}", stats.authoritative_only);
    print_summary(&result.summary);

    Ok(())
}

async fn cmd_enrich(config: &AppConfig) -> Result<()> {
    info!(
        data_dir = %config.paths.data_dir,
        interval_ms = config.pacing.website_interval_ms,
        "enriching roster from faculty websites"
    );

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let reporter = CliProgress::new();
    let result = run_enrichment_pass(config, &fetcher, &reporter).await?;
    let stats = &result.stats;

    println!();
    println!("  Roster enriched!");
    println!("  With website: {}", stats.with_website);
    println!("  Extracted:    {}", stats.succeeded);
    println!("  Failed:       {}", stats.failed);
    print_summary(&result.summary);

    Ok(())
}

fn print_summary(summary: &PassSummary) {
    println!("  Faculty:   {}", summary.total_faculty);
    println!("  Roster:    {}", summary.roster_path.display());
    println!("  Report:    {}", summary.report_path.display());
    println!("  Time:      {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

fn cmd_extract(html_file: &Path, base_url: Option<&str>) -> Result<()> {
    let markup = std::fs::read_to_string(html_file)
        .map_err(|e| eyre!("cannot read '{}': {e}", html_file.display()))?;

    let base = match base_url {
        Some(raw) => Url::parse(raw).map_err(|e| eyre!("invalid base URL '{raw}': {e}"))?,
        None => {
            let abs = std::fs::canonicalize(html_file)?;
            Url::from_file_path(&abs)
                .map_err(|()| eyre!("cannot build a file URL for '{}'", abs.display()))?
        }
    };

    let signals = extract_signals(&markup, base.as_str());
    info!(
        file = %html_file.display(),
        keywords = signals.research_keywords.len(),
        cv = signals.cv_url.is_some(),
        "extracted page signals"
    );

    let data = signals.into_website_data(base.to_string(), FILE_METHOD, Utc::now());
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>, data_dir: Option<&str>) -> Result<()> {
    let config = resolve_config(path, data_dir)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn record_done(&self, name: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("[{current}/{total}] {name}"));
    }

    fn done(&self, _summary: &PassSummary) {
        self.spinner.finish_and_clear();
    }
}
