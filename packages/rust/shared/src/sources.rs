//! Loading the pipeline's JSON inputs.
//!
//! The shapes are trusted: anything that cannot be read or parsed is a
//! [`FacultyDirError::FatalLoad`] and the run stops before writing output.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{FacultyDirError, Result};
use crate::types::{
    AuthoritativeSet, DepartmentInventory, FacultyRecord, Roster, ScrapedBatchFile,
};

/// Scraped records for one department.
#[derive(Debug, Clone)]
pub struct ScrapedBatch {
    /// Department code (inventory id or file stem).
    pub department: String,
    pub records: Vec<FacultyRecord>,
}

/// Where a loaded faculty list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterOrigin {
    /// A roster written by an earlier merge pass.
    MergedRoster,
    /// The raw authoritative extract (no roster yet).
    AuthoritativeFallback,
}

/// Read and parse a JSON file, mapping every failure to `FatalLoad`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| FacultyDirError::fatal_load(path, e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| FacultyDirError::fatal_load(path, format!("invalid JSON: {e}")))
}

/// Load the authoritative HR extract.
pub fn load_authoritative_set(path: &Path) -> Result<AuthoritativeSet> {
    let set: AuthoritativeSet = read_json(path)?;
    if set.metadata.total_faculty != 0 && set.metadata.total_faculty != set.faculty.len() {
        warn!(
            declared = set.metadata.total_faculty,
            actual = set.faculty.len(),
            "authoritative metadata count disagrees with faculty list"
        );
    }
    info!(path = %path.display(), faculty = set.faculty.len(), "loaded authoritative set");
    Ok(set)
}

/// Load the department inventory.
pub fn load_inventory(path: &Path) -> Result<DepartmentInventory> {
    let inventory: DepartmentInventory = read_json(path)?;
    info!(departments = inventory.departments.len(), "loaded department inventory");
    Ok(inventory)
}

/// Key scraped listings use for the department code.
const DEPARTMENT_KEY: &str = "department";

/// Load one scraped batch file. `default_department` fills in records that
/// carry no department code of their own.
pub fn load_scraped_batch(path: &Path, default_department: &str) -> Result<ScrapedBatch> {
    let file: ScrapedBatchFile = read_json(path)?;

    let (department, mut records) = match file {
        ScrapedBatchFile::Records(records) => (default_department.to_string(), records),
        ScrapedBatchFile::Wrapped {
            department,
            faculty,
        } => (
            department.unwrap_or_else(|| default_department.to_string()),
            faculty,
        ),
    };

    for record in &mut records {
        if record.department_code.is_none() {
            let own = record
                .extra
                .get(DEPARTMENT_KEY)
                .and_then(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|d| !d.is_empty());
            record.department_code = Some(own.unwrap_or(department.as_str()).to_string());
        }
    }

    debug!(path = %path.display(), %department, records = records.len(), "loaded scraped batch");
    Ok(ScrapedBatch {
        department,
        records,
    })
}

/// Load every scraped batch from `batch_dir`.
///
/// With an inventory, batches are read as `<batch_dir>/<id>.json` in
/// inventory order and departments without a listing URL are skipped; a
/// missing batch for a listed department is fatal. Without an inventory,
/// every `*.json` file is read in file-name order.
pub fn load_batches(
    batch_dir: &Path,
    inventory: Option<&DepartmentInventory>,
) -> Result<Vec<ScrapedBatch>> {
    let mut batches = Vec::new();

    match inventory {
        Some(inventory) => {
            for dept in &inventory.departments {
                if dept.faculty_list_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
                    info!(department = %dept.name, "skipping department without faculty list URL");
                    continue;
                }
                let path = batch_dir.join(format!("{}.json", dept.id));
                batches.push(load_scraped_batch(&path, &dept.id)?);
            }
        }
        None => {
            for path in json_files_sorted(batch_dir)? {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                batches.push(load_scraped_batch(&path, &stem)?);
            }
        }
    }

    info!(
        batches = batches.len(),
        records = batches.iter().map(|b| b.records.len()).sum::<usize>(),
        "loaded scraped batches"
    );
    Ok(batches)
}

/// `*.json` files directly under `dir`, sorted by file name.
fn json_files_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| FacultyDirError::fatal_load(dir, e.to_string()))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Load a roster written by a previous pass.
pub fn load_roster(path: &Path) -> Result<Roster> {
    read_json(path)
}

/// Load the merged roster, falling back to the raw authoritative set when no
/// roster has been written yet. Missing both is fatal.
///
/// A fallback roster carries no data sources and no passes.
pub fn load_roster_or_authoritative(
    roster_path: &Path,
    authoritative_path: &Path,
) -> Result<(Roster, RosterOrigin)> {
    if roster_path.exists() {
        let roster = load_roster(roster_path)?;
        info!(path = %roster_path.display(), faculty = roster.faculty.len(), "loaded merged roster");
        return Ok((roster, RosterOrigin::MergedRoster));
    }

    warn!(
        roster = %roster_path.display(),
        fallback = %authoritative_path.display(),
        "merged roster not found, falling back to authoritative set"
    );
    let set = load_authoritative_set(authoritative_path)?;
    Ok((
        Roster::new(set.faculty, Vec::new(), Vec::new()),
        RosterOrigin::AuthoritativeFallback,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Department;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fd-sources-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_authoritative_file_is_fatal() {
        let err = load_authoritative_set(Path::new("/nonexistent/faculty_from_fis.json"))
            .unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, FacultyDirError::FatalLoad { .. }));
    }

    #[test]
    fn malformed_authoritative_file_is_fatal() {
        let dir = temp_dir();
        let path = dir.join("hr.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_authoritative_set(&path).unwrap_err();
        assert!(matches!(err, FacultyDirError::FatalLoad { .. }));
        assert!(err.to_string().contains("invalid JSON"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn authoritative_fixture_loads() {
        let set = load_authoritative_set(Path::new("../../../fixtures/json/hr_faculty.fixture.json"))
            .expect("load fixture");
        assert_eq!(set.metadata.total_faculty, 3);
        assert_eq!(set.faculty.len(), 3);
        assert_eq!(set.faculty[0].department_code.as_deref(), Some("cs"));
    }

    #[test]
    fn batch_fills_department_code() {
        let dir = temp_dir();
        let path = dir.join("bme.json");
        std::fs::write(
            &path,
            r#"[{"name":"A"},{"name":"B","department":"ece"}]"#,
        )
        .unwrap();

        let batch = load_scraped_batch(&path, "bme").unwrap();
        assert_eq!(batch.department, "bme");
        assert_eq!(batch.records[0].department_code.as_deref(), Some("bme"));
        assert_eq!(batch.records[1].department_code.as_deref(), Some("ece"));
        assert_eq!(batch.records[1].extra["department"], "ece");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn batch_keeps_existing_department_code() {
        let dir = temp_dir();
        let path = dir.join("bme.json");
        std::fs::write(
            &path,
            r#"{"department":"bme","faculty":[
                {"name":"Jane Doe","department_code":"bme","department":"Biomedical Engineering"}
            ]}"#,
        )
        .unwrap();

        let batch = load_scraped_batch(&path, "bme").unwrap();
        let jane = &batch.records[0];
        assert_eq!(jane.department_code.as_deref(), Some("bme"));
        assert_eq!(jane.extra["department"], "Biomedical Engineering");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn roster_with_department_name_and_code_loads() {
        let dir = temp_dir();
        let path = dir.join("roster.json");
        std::fs::write(
            &path,
            r#"{"metadata":{"created_date":"2025-09-03T14:21:07Z",
                "run_id":"01991026-7c5e-7b1a-9c2e-3f0d8a6b4e21",
                "data_sources":["FIS_All_Tenured_TT.xlsx","web_scraping"],
                "total_faculty":1,"passes":["listings"]},
              "faculty":[{"name":"Jane Doe","department_code":"bme","department":"bme",
                "research_areas":["optics"]}]}"#,
        )
        .unwrap();

        let roster = load_roster(&path).expect("load roster");
        assert_eq!(roster.faculty[0].department_code.as_deref(), Some("bme"));
        assert_eq!(roster.faculty[0].research_areas, Some(vec!["optics".to_string()]));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn batches_follow_inventory_and_skip_unlisted() {
        let dir = temp_dir();
        std::fs::write(dir.join("cs.json"), r#"[{"name":"A"}]"#).unwrap();
        std::fs::write(dir.join("me.json"), r#"[{"name":"B"}]"#).unwrap();

        let inventory = DepartmentInventory {
            departments: vec![
                Department {
                    id: "me".into(),
                    name: "Mechanical".into(),
                    faculty_list_url: Some("https://example.edu/me/people".into()),
                },
                Department {
                    id: "ce".into(),
                    name: "Civil".into(),
                    faculty_list_url: None,
                },
                Department {
                    id: "cs".into(),
                    name: "Computer Science".into(),
                    faculty_list_url: Some("https://example.edu/cs/people".into()),
                },
            ],
        };

        let batches = load_batches(&dir, Some(&inventory)).unwrap();
        let order: Vec<&str> = batches.iter().map(|b| b.department.as_str()).collect();
        assert_eq!(order, vec!["me", "cs"]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_listed_batch_is_fatal() {
        let dir = temp_dir();
        let inventory = DepartmentInventory {
            departments: vec![Department {
                id: "bme".into(),
                name: "Biomedical".into(),
                faculty_list_url: Some("https://example.edu/bme".into()),
            }],
        };
        let err = load_batches(&dir, Some(&inventory)).unwrap_err();
        assert!(err.is_fatal());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn batches_without_inventory_are_sorted() {
        let dir = temp_dir();
        std::fs::write(dir.join("zz.json"), r#"[{"name":"Z"}]"#).unwrap();
        std::fs::write(dir.join("aa.json"), r#"{"faculty":[{"name":"A"}]}"#).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let batches = load_batches(&dir, None).unwrap();
        let order: Vec<&str> = batches.iter().map(|b| b.department.as_str()).collect();
        assert_eq!(order, vec!["aa", "zz"]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn roster_falls_back_to_authoritative_set() {
        let dir = temp_dir();
        let hr = dir.join("hr.json");
        std::fs::write(&hr, r#"{"metadata":{"total_faculty":1},"faculty":[{"name":"A"}]}"#)
            .unwrap();

        let (roster, origin) =
            load_roster_or_authoritative(&dir.join("missing_roster.json"), &hr).unwrap();
        assert_eq!(origin, RosterOrigin::AuthoritativeFallback);
        assert_eq!(roster.faculty.len(), 1);
        assert!(roster.metadata.passes.is_empty());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn roster_and_authoritative_both_missing_is_fatal() {
        let dir = temp_dir();
        let err = load_roster_or_authoritative(&dir.join("r.json"), &dir.join("hr.json"))
            .unwrap_err();
        assert!(matches!(err, FacultyDirError::FatalLoad { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
