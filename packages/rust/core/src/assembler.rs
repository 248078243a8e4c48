//! Roster assembler.
//!
//! Wraps a completed pass's records in roster metadata and writes the roster
//! and its summary report to disk. Each file is written to a temp file and
//! renamed into place, so a reader never sees a half-written roster.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};

use facultydir_shared::{FacultyDirError, FacultyRecord, Result, Roster};

/// Metadata for a single written file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ArtifactMeta {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Files produced by one pass.
#[derive(Debug, Clone)]
pub struct AssembleResult {
    pub roster: ArtifactMeta,
    pub report: ArtifactMeta,
    pub total_faculty: usize,
}

/// Build a roster for a finished pass.
pub fn build_roster(faculty: Vec<FacultyRecord>, data_sources: &[&str], pass: &str) -> Roster {
    Roster::new(
        faculty,
        data_sources.iter().map(|s| s.to_string()).collect(),
        vec![pass.to_string()],
    )
}

/// Build a roster that extends an earlier pass's roster: the earlier passes
/// are carried forward and `pass` is appended.
pub fn build_followup_roster(
    faculty: Vec<FacultyRecord>,
    data_sources: &[&str],
    earlier_passes: &[String],
    pass: &str,
) -> Roster {
    let mut passes: Vec<String> = earlier_passes.to_vec();
    if !passes.iter().any(|p| p == pass) {
        passes.push(pass.to_string());
    }
    Roster::new(
        faculty,
        data_sources.iter().map(|s| s.to_string()).collect(),
        passes,
    )
}

/// Write the roster JSON and its plain-text report.
///
/// The roster is written first; if it fails, no report is written.
#[instrument(skip_all, fields(roster = %roster_path.display(), faculty = roster.faculty.len()))]
pub fn assemble(
    roster: &Roster,
    roster_path: &Path,
    report: &str,
    report_path: &Path,
) -> Result<AssembleResult> {
    let json = serde_json::to_string_pretty(roster)
        .map_err(|e| FacultyDirError::validation(format!("JSON serialization failed: {e}")))?;

    let roster_meta = write_atomic(roster_path, json.as_bytes())?;
    let report_meta = write_atomic(report_path, report.as_bytes())?;

    info!(
        run_id = %roster.metadata.run_id,
        total_faculty = roster.metadata.total_faculty,
        sha256 = %roster_meta.sha256,
        "roster written"
    );

    Ok(AssembleResult {
        roster: roster_meta,
        report: report_meta,
        total_faculty: roster.metadata.total_faculty,
    })
}

/// Write `content` to `target` via a sibling temp file and rename.
pub fn write_atomic(target: &Path, content: &[u8]) -> Result<ArtifactMeta> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| FacultyDirError::io(dir, e))?;

    let file_name = target
        .file_name()
        .ok_or_else(|| FacultyDirError::validation(format!("not a file path: {}", target.display())))?
        .to_string_lossy();
    let temp = dir.join(format!(".{file_name}.tmp"));

    // Write to temp file first
    std::fs::write(&temp, content).map_err(|e| FacultyDirError::io(&temp, e))?;

    // Atomic rename
    std::fs::rename(&temp, target).map_err(|e| FacultyDirError::io(target, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content);
    let hash = format!("{:x}", hasher.finalize());

    debug!(path = %target.display(), size = content.len(), "wrote file");

    Ok(ArtifactMeta {
        path: target.to_path_buf(),
        sha256: hash,
        size_bytes: content.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
