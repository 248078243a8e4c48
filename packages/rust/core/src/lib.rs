//! Core pipeline orchestration and domain logic for the faculty directory.
//!
//! This crate ties together source loading, roster matching, field merging,
//! and website signal extraction into the two end-to-end passes:
//! [`run_merge_pass`] (listings) and [`run_enrichment_pass`] (websites).

pub mod assembler;
pub mod enrichment;
pub mod matcher;
pub mod merger;
pub mod pipeline;
pub mod report;

pub use enrichment::{EnrichPassResult, EnrichStats, WEBSITES_PASS, enrich_records, run_enrichment_pass};
pub use matcher::{MatchEntry, match_records};
pub use merger::SourceIds;
pub use pipeline::{
    LISTINGS_PASS, MergePassResult, MergeStats, PassSummary, ProgressReporter, SilentProgress,
    merge_batches, run_merge_pass,
};
