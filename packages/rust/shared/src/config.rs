//! Application configuration for the faculty directory.
//!
//! User config lives at `~/.facultydir/facultydir.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FacultyDirError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "facultydir.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".facultydir";

// ---------------------------------------------------------------------------
// Config structs (matching facultydir.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source identifiers stamped into provenance.
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Input/output file locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Delay between network operations.
    #[serde(default)]
    pub pacing: PacingConfig,

    /// Website fetch settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Merge behaviour.
    #[serde(default)]
    pub merge: MergeConfig,
}

/// `[sources]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Identifier of the authoritative HR extract.
    #[serde(default = "default_hr_source_id")]
    pub hr_source_id: String,

    /// Identifier of the department listing scrape.
    #[serde(default = "default_web_source_id")]
    pub web_source_id: String,

    /// Identifier of the faculty website pass.
    #[serde(default = "default_website_source_id")]
    pub website_source_id: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            hr_source_id: default_hr_source_id(),
            web_source_id: default_web_source_id(),
            website_source_id: default_website_source_id(),
        }
    }
}

fn default_hr_source_id() -> String {
    "FIS_All_Tenured_TT.xlsx".into()
}
fn default_web_source_id() -> String {
    "web_scraping".into()
}
fn default_website_source_id() -> String {
    "web_scraping_faculty_websites".into()
}

/// `[paths]` section. File names are relative to `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_hr_file")]
    pub hr_file: String,
    #[serde(default = "default_inventory_file")]
    pub inventory_file: String,
    /// Directory holding one scraped batch per department.
    #[serde(default = "default_batch_dir")]
    pub batch_dir: String,
    #[serde(default = "default_roster_file")]
    pub roster_file: String,
    #[serde(default = "default_enriched_file")]
    pub enriched_file: String,
    #[serde(default = "default_roster_report_file")]
    pub roster_report_file: String,
    #[serde(default = "default_website_report_file")]
    pub website_report_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            hr_file: default_hr_file(),
            inventory_file: default_inventory_file(),
            batch_dir: default_batch_dir(),
            roster_file: default_roster_file(),
            enriched_file: default_enriched_file(),
            roster_report_file: default_roster_report_file(),
            website_report_file: default_website_report_file(),
        }
    }
}

impl PathsConfig {
    /// Resolve a file name against `data_dir`.
    pub fn resolve(&self, file: &str) -> PathBuf {
        Path::new(&self.data_dir).join(file)
    }
}

fn default_data_dir() -> String {
    "data".into()
}
fn default_hr_file() -> String {
    "faculty_from_fis.json".into()
}
fn default_inventory_file() -> String {
    "department_inventory.json".into()
}
fn default_batch_dir() -> String {
    "scraped".into()
}
fn default_roster_file() -> String {
    "faculty_roster.json".into()
}
fn default_enriched_file() -> String {
    "faculty_enriched.json".into()
}
fn default_roster_report_file() -> String {
    "faculty_scraping_report.txt".into()
}
fn default_website_report_file() -> String {
    "website_scraping_report.txt".into()
}

/// `[pacing]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Minimum ms between faculty website fetches. `0` disables pacing.
    #[serde(default = "default_website_interval")]
    pub website_interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            website_interval_ms: default_website_interval(),
        }
    }
}

impl PacingConfig {
    pub fn website_interval(&self) -> Duration {
        Duration::from_millis(self.website_interval_ms)
    }
}

fn default_website_interval() -> u64 {
    3000
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Allow private/loopback hosts (local mirrors, tests).
    #[serde(default)]
    pub allow_private_hosts: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            allow_private_hosts: false,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// `[merge]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Clear present-but-blank scraped fields before merging so they cannot
    /// overwrite authoritative values.
    #[serde(default)]
    pub drop_blank_scraped_fields: bool,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.facultydir/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| FacultyDirError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.facultydir/facultydir.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| FacultyDirError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| FacultyDirError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| FacultyDirError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| FacultyDirError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| FacultyDirError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject settings the pipeline cannot run with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let s = &config.sources;
    if s.hr_source_id.trim().is_empty()
        || s.web_source_id.trim().is_empty()
        || s.website_source_id.trim().is_empty()
    {
        return Err(FacultyDirError::config("source identifiers must not be empty"));
    }
    if s.hr_source_id == s.web_source_id {
        return Err(FacultyDirError::config(format!(
            "hr_source_id and web_source_id must differ (both are '{}')",
            s.hr_source_id
        )));
    }
    if config.fetch.timeout_secs == 0 {
        return Err(FacultyDirError::config("fetch.timeout_secs must be at least 1"));
    }
    Ok(())
}
