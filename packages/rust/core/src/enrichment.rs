//! Pass 2 (`enrich`): visit each faculty website and fold extracted signals
//! into the roster.
//!
//! Runs one record at a time: pace, fetch, extract, merge. A failure for one
//! record is recorded in its `website_data` and the pass moves on; only input
//! loading and output writing can fail the pass as a whole.

use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use facultydir_fetch::{Pacer, PageFetcher};
use facultydir_shared::{
    AppConfig, ExtractionFailure, FacultyRecord, Result, RosterOrigin, WebsiteData,
    load_roster_or_authoritative,
};
use facultydir_signals::extract_signals;

use crate::assembler;
use crate::merger::{self, SourceIds};
use crate::pipeline::{PassSummary, ProgressReporter};
use crate::report;

/// Pass name recorded in roster metadata.
pub const WEBSITES_PASS: &str = "websites";

/// `extraction_method` recorded for pages fetched over HTTP.
pub const HTTP_METHOD: &str = "http";

/// Counts gathered while enriching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub total: usize,
    pub with_website: usize,
    pub succeeded: usize,
    /// Includes records with no website URL.
    pub failed: usize,
}

/// Parse a roster `website` value. Scheme-less values (`www.example.edu/~a`)
/// are read as https.
fn parse_website(raw: &str) -> std::result::Result<Url, ExtractionFailure> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{raw}"))
            .map_err(|e| ExtractionFailure::InvalidUrl(format!("{raw}: {e}"))),
        Err(e) => Err(ExtractionFailure::InvalidUrl(format!("{raw}: {e}"))),
    }
}

/// Fetch and extract one record's website.
async fn extract_one<F: PageFetcher + ?Sized>(
    record: &FacultyRecord,
    fetcher: &F,
    pacer: &mut Pacer,
) -> std::result::Result<WebsiteData, ExtractionFailure> {
    let raw = record.website_url().ok_or(ExtractionFailure::NoWebsiteUrl)?;
    let url = parse_website(raw)?;

    pacer.wait().await;
    let page = fetcher.fetch(&url).await?;

    let signals = extract_signals(&page.body, page.final_url.as_str());
    if signals.is_empty() {
        debug!(url = %page.final_url, "no signals found on page");
    }
    Ok(signals.into_website_data(raw.to_string(), HTTP_METHOD, Utc::now()))
}

/// Enrich every record in order. Never fails: per-record problems end up in
/// that record's `website_data`.
pub async fn enrich_records<F: PageFetcher + ?Sized>(
    records: Vec<FacultyRecord>,
    fetcher: &F,
    pacer: &mut Pacer,
    website_source_id: &str,
    progress: &dyn ProgressReporter,
) -> (Vec<FacultyRecord>, EnrichStats) {
    let total = records.len();
    let mut stats = EnrichStats {
        total,
        ..Default::default()
    };
    let mut enriched = Vec::with_capacity(total);

    for (i, mut record) in records.into_iter().enumerate() {
        if record.website_url().is_some() {
            stats.with_website += 1;
        }

        let data = match extract_one(&record, fetcher, pacer).await {
            Ok(data) => {
                stats.succeeded += 1;
                debug!(
                    name = %record.name,
                    keywords = data.research_keywords.len(),
                    cv = data.cv_url.is_some(),
                    "website extracted"
                );
                data
            }
            Err(failure) => {
                stats.failed += 1;
                if failure == ExtractionFailure::NoWebsiteUrl {
                    debug!(name = %record.name, "no website URL");
                } else {
                    warn!(name = %record.name, reason = %failure, "website extraction failed");
                }
                WebsiteData::failed(&failure, record.website_url().map(String::from))
            }
        };

        merger::apply_website_data(&mut record, data, website_source_id);
        progress.record_done(&record.name, i + 1, total);
        enriched.push(record);
    }

    (enriched, stats)
}

/// Result of [`run_enrichment_pass`].
#[derive(Debug, Clone)]
pub struct EnrichPassResult {
    pub origin: RosterOrigin,
    pub stats: EnrichStats,
    pub summary: PassSummary,
}

/// Run the full enrichment pass.
///
/// 1. Load the merged roster (or the authoritative set if none exists yet)
/// 2. Enrich each record from its website
/// 3. Write the enriched roster and website report
#[instrument(skip_all, fields(data_dir = %config.paths.data_dir))]
pub async fn run_enrichment_pass<F: PageFetcher + ?Sized>(
    config: &AppConfig,
    fetcher: &F,
    progress: &dyn ProgressReporter,
) -> Result<EnrichPassResult> {
    let start = Instant::now();
    let paths = &config.paths;
    let ids = SourceIds::from(&config.sources);

    // --- Phase 1: Inputs ---
    progress.phase("Loading roster");
    let (input, origin) = load_roster_or_authoritative(
        &paths.resolve(&paths.roster_file),
        &paths.resolve(&paths.hr_file),
    )?;
    let earlier_passes = input.metadata.passes;
    let mut data_sources = input.metadata.data_sources;
    if data_sources.is_empty() {
        data_sources.push(ids.hr.clone());
    }
    if !data_sources.contains(&ids.website) {
        data_sources.push(ids.website.clone());
    }
    let mut records = input.faculty;
    if origin == RosterOrigin::AuthoritativeFallback {
        // every field of a raw HR record came from the HR extract
        for record in &mut records {
            record.data_sources.insert(ids.hr.clone());
        }
    }

    info!(
        faculty = records.len(),
        with_website = records.iter().filter(|r| r.website_url().is_some()).count(),
        ?origin,
        "starting website enrichment"
    );

    // --- Phase 2: Enrich ---
    progress.phase("Extracting faculty websites");
    let mut pacer = Pacer::new(config.pacing.website_interval());
    let (enriched, stats) =
        enrich_records(records, fetcher, &mut pacer, &ids.website, progress).await;

    // --- Phase 3: Write ---
    progress.phase("Writing enriched roster");
    let report_text = report::website_report(&enriched, &stats);
    let data_sources: Vec<&str> = data_sources.iter().map(String::as_str).collect();
    let roster = assembler::build_followup_roster(
        enriched,
        &data_sources,
        &earlier_passes,
        WEBSITES_PASS,
    );
    let enriched_path = paths.resolve(&paths.enriched_file);
    let report_path = paths.resolve(&paths.website_report_file);
    let written = assembler::assemble(&roster, &enriched_path, &report_text, &report_path)?;

    let summary = PassSummary {
        pass: WEBSITES_PASS,
        total_faculty: written.total_faculty,
        roster_path: enriched_path,
        report_path,
        elapsed: start.elapsed(),
    };
    progress.done(&summary);

    info!(
        succeeded = stats.succeeded,
        failed = stats.failed,
        elapsed_ms = summary.elapsed.as_millis(),
        "enrichment pass complete"
    );

    Ok(EnrichPassResult {
        origin,
        stats,
        summary,
    })
}
