//! Shared types, error model, configuration, and input loading for the
//! faculty directory.
//!
//! This crate is the foundation depended on by all other facultydir crates.
//! It provides:
//! - [`FacultyDirError`]: the unified error type
//! - Domain types ([`FacultyRecord`], [`WebsiteData`], [`Roster`], [`ResearchArea`])
//! - Configuration ([`AppConfig`], config loading)
//! - Source loaders for the HR extract, department inventory, and scraped batches

pub mod config;
pub mod error;
pub mod sources;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, FetchConfig, MergeConfig, PacingConfig, PathsConfig, SourcesConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_config,
};
pub use error::{ExtractionFailure, FacultyDirError, Result};
pub use sources::{
    RosterOrigin, ScrapedBatch, load_authoritative_set, load_batches, load_inventory,
    load_roster, load_roster_or_authoritative, load_scraped_batch,
};
pub use types::{
    AuthoritativeMetadata, AuthoritativeSet, Department, DepartmentInventory, FacultyRecord,
    ResearchArea, Roster, RosterMetadata, RunId, ScrapedBatchFile, WebsiteData,
};
