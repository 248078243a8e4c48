//! Pass 1 (`merge`): authoritative set + scraped department batches → roster.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use facultydir_shared::{
    AppConfig, FacultyRecord, MergeConfig, Result, ScrapedBatch, load_authoritative_set,
    load_batches, load_inventory,
};

use crate::assembler;
use crate::matcher::{MatchEntry, match_records};
use crate::merger::{self, SourceIds};
use crate::report;

/// Pass name recorded in roster metadata.
pub const LISTINGS_PASS: &str = "listings";

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Outcome of one completed pass, for progress display.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub pass: &'static str,
    pub total_faculty: usize,
    pub roster_path: PathBuf,
    pub report_path: PathBuf,
    pub elapsed: Duration,
}

/// Progress callback for reporting pass status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each faculty record is processed.
    fn record_done(&self, name: &str, current: usize, total: usize);
    /// Called when the pass completes.
    fn done(&self, summary: &PassSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn record_done(&self, _name: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &PassSummary) {}
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Counts gathered while merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub batches: usize,
    pub scraped_records: usize,
    pub matched: usize,
    pub web_only: usize,
    pub authoritative_only: usize,
    pub duplicate_scraped: usize,
    pub duplicate_authoritative: usize,
    /// Present-but-blank scraped fields seen.
    pub blank_fields: usize,
    /// Of those, how many were cleared before merging.
    pub blank_fields_cleared: usize,
}

/// Merge every scraped batch against the authoritative records.
///
/// Batches are concatenated in the order given, matched as one whole, and
/// merged. Pure: no I/O.
pub fn merge_batches(
    batches: &[ScrapedBatch],
    authoritative: &[FacultyRecord],
    ids: &SourceIds,
    merge_config: &MergeConfig,
) -> (Vec<FacultyRecord>, MergeStats) {
    let mut stats = MergeStats {
        batches: batches.len(),
        ..Default::default()
    };

    let mut scraped: Vec<FacultyRecord> = batches
        .iter()
        .flat_map(|b| b.records.iter().cloned())
        .collect();
    stats.scraped_records = scraped.len();

    for record in &mut scraped {
        let blank = merger::blank_fields(record);
        if blank.is_empty() {
            continue;
        }
        stats.blank_fields += blank.len();
        if merge_config.drop_blank_scraped_fields {
            stats.blank_fields_cleared += merger::clear_blank_fields(record);
            debug!(name = %record.name, fields = ?blank, "cleared blank scraped fields");
        } else {
            warn!(name = %record.name, fields = ?blank, "scraped record has blank fields that will overwrite HR values");
        }
    }

    let outcome = match_records(&scraped, authoritative);
    stats.matched = outcome.matched();
    stats.web_only = outcome.web_only();
    stats.authoritative_only = outcome.authoritative_only();
    stats.duplicate_scraped = outcome.duplicate_scraped.len();
    stats.duplicate_authoritative = outcome.duplicate_authoritative.len();

    let merged = outcome
        .entries
        .iter()
        .map(|entry| match entry {
            MatchEntry::Matched {
                authoritative,
                scraped,
            } => merger::merge_pair(authoritative, scraped, ids),
            MatchEntry::WebOnly(record) => merger::stamp_web_only(record, ids),
            MatchEntry::AuthoritativeOnly(record) => merger::stamp_authoritative_only(record, ids),
        })
        .collect();

    (merged, stats)
}

/// Result of [`run_merge_pass`].
#[derive(Debug, Clone)]
pub struct MergePassResult {
    pub stats: MergeStats,
    pub summary: PassSummary,
}

/// Run the full merge pass from the configured input files.
///
/// 1. Load the authoritative set (fatal if missing)
/// 2. Load the department inventory, if present
/// 3. Load scraped batches
/// 4. Match and merge
/// 5. Write roster and report
#[instrument(skip_all, fields(data_dir = %config.paths.data_dir))]
pub fn run_merge_pass(config: &AppConfig, progress: &dyn ProgressReporter) -> Result<MergePassResult> {
    let start = Instant::now();
    let paths = &config.paths;
    let ids = SourceIds::from(&config.sources);

    // --- Phase 1: Inputs ---
    progress.phase("Loading authoritative set");
    let authoritative = load_authoritative_set(&paths.resolve(&paths.hr_file))?;

    progress.phase("Loading scraped batches");
    let inventory_path = paths.resolve(&paths.inventory_file);
    let inventory = if inventory_path.exists() {
        Some(load_inventory(&inventory_path)?)
    } else {
        info!(path = %inventory_path.display(), "no department inventory, loading every batch file");
        None
    };
    let batches = load_batches(&paths.resolve(&paths.batch_dir), inventory.as_ref())?;

    // --- Phase 2: Match & merge ---
    progress.phase("Matching and merging");
    let (merged, stats) = merge_batches(&batches, &authoritative.faculty, &ids, &config.merge);
    let total = merged.len();
    for (i, record) in merged.iter().enumerate() {
        progress.record_done(&record.name, i + 1, total);
    }

    info!(
        matched = stats.matched,
        web_only = stats.web_only,
        authoritative_only = stats.authoritative_only,
        duplicates = stats.duplicate_scraped + stats.duplicate_authoritative,
        "records merged"
    );

    // --- Phase 3: Write ---
    progress.phase("Writing roster");
    let report_text = report::listing_report(&merged, &ids.hr, &stats);
    let roster = assembler::build_roster(merged, &[ids.hr.as_str(), ids.web.as_str()], LISTINGS_PASS);
    let roster_path = paths.resolve(&paths.roster_file);
    let report_path = paths.resolve(&paths.roster_report_file);
    let written = assembler::assemble(&roster, &roster_path, &report_text, &report_path)?;

    let summary = PassSummary {
        pass: LISTINGS_PASS,
        total_faculty: written.total_faculty,
        roster_path,
        report_path,
        elapsed: start.elapsed(),
    };
    progress.done(&summary);

    info!(
        total_faculty = summary.total_faculty,
        elapsed_ms = summary.elapsed.as_millis(),
        "merge pass complete"
    );

    Ok(MergePassResult { stats, summary })
}
