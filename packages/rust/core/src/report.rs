//! Plain-text summary reports written next to each roster.

use std::collections::BTreeMap;
use std::fmt;

use facultydir_shared::{FacultyRecord, ResearchArea};

use crate::enrichment::EnrichStats;
use crate::pipeline::MergeStats;

const UNKNOWN_DEPARTMENT: &str = "unknown";
const UNKNOWN_CATEGORY: &str = "unspecified";

/// `part` as a percentage of `whole`; zero when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn department_of(record: &FacultyRecord) -> &str {
    record
        .department_code
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(UNKNOWN_DEPARTMENT)
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Summary of the listings merge.
pub fn listing_report(records: &[FacultyRecord], hr_source_id: &str, stats: &MergeStats) -> String {
    ListingReport {
        records,
        hr_source_id,
        stats,
    }
    .to_string()
}

/// Summary of the website enrichment pass.
pub fn website_report(records: &[FacultyRecord], stats: &EnrichStats) -> String {
    WebsiteReport { records, stats }.to_string()
}

// ---------------------------------------------------------------------------
// Listing report
// ---------------------------------------------------------------------------

struct ListingReport<'a> {
    records: &'a [FacultyRecord],
    hr_source_id: &'a str,
    stats: &'a MergeStats,
}

impl fmt::Display for ListingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = self.records;
        let stats = self.stats;
        let total = records.len();
        let with_websites = records.iter().filter(|r| r.website_url().is_some()).count();
        let with_emails = records.iter().filter(|r| has_text(&r.email)).count();
        let in_hr = records
            .iter()
            .filter(|r| r.data_sources.contains(self.hr_source_id))
            .count();

        writeln!(f, "=== Faculty Listing Summary ===")?;
        writeln!(f)?;
        writeln!(f, "Total Faculty: {total}")?;
        writeln!(f, "In HR Set: {in_hr}")?;
        writeln!(f, "  Matched on Web: {}", stats.matched)?;
        writeln!(f, "  HR Only: {}", stats.authoritative_only)?;
        writeln!(f, "Web Only: {}", stats.web_only)?;
        writeln!(
            f,
            "With Websites: {with_websites} ({:.1}%)",
            percent(with_websites, total)
        )?;
        writeln!(
            f,
            "With Emails: {with_emails} ({:.1}%)",
            percent(with_emails, total)
        )?;
        if stats.duplicate_scraped + stats.duplicate_authoritative > 0 {
            writeln!(
                f,
                "Duplicate Names Superseded: {} scraped, {} HR",
                stats.duplicate_scraped, stats.duplicate_authoritative
            )?;
        }
        if stats.blank_fields > 0 {
            writeln!(
                f,
                "Blank Scraped Fields: {} ({} cleared)",
                stats.blank_fields, stats.blank_fields_cleared
            )?;
        }

        let mut by_department: BTreeMap<&str, usize> = BTreeMap::new();
        let mut by_category: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records {
            *by_department.entry(department_of(record)).or_default() += 1;
            let category = record
                .category
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(UNKNOWN_CATEGORY);
            *by_category.entry(category).or_default() += 1;
        }

        writeln!(f)?;
        writeln!(f, "By Department:")?;
        for (dept, count) in &by_department {
            writeln!(f, "  {dept}: {count}")?;
        }

        writeln!(f)?;
        writeln!(f, "By Category:")?;
        for (category, count) in &by_category {
            writeln!(f, "  {category}: {count} ({:.1}%)", percent(*count, total))?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Website report
// ---------------------------------------------------------------------------

struct WebsiteReport<'a> {
    records: &'a [FacultyRecord],
    stats: &'a EnrichStats,
}

#[derive(Default)]
struct DepartmentTally {
    with_website: usize,
    extracted: usize,
}

impl fmt::Display for WebsiteReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = self.records;
        let stats = self.stats;
        let total = records.len();
        let data = || records.iter().filter_map(|r| r.website_data.as_ref());

        let with_descriptions = data().filter(|d| has_text(&d.research_description)).count();
        let with_keywords = data().filter(|d| !d.research_keywords.is_empty()).count();
        let with_cv = data().filter(|d| has_text(&d.cv_url)).count();
        let with_lab = data().filter(|d| has_text(&d.lab_name)).count();
        let with_funding = data().filter(|d| !d.funding_sources.is_empty()).count();
        let with_courses = data().filter(|d| !d.courses_taught.is_empty()).count();

        writeln!(f, "=== Faculty Website Summary ===")?;
        writeln!(f)?;
        writeln!(f, "Total Faculty: {total}")?;
        writeln!(
            f,
            "With Website URLs: {} ({:.1}%)",
            stats.with_website,
            percent(stats.with_website, total)
        )?;
        writeln!(
            f,
            "Successful Extractions: {} ({:.1}% of those with websites)",
            stats.succeeded,
            percent(stats.succeeded, stats.with_website)
        )?;
        writeln!(f, "Failed Extractions: {}", stats.failed)?;

        writeln!(f)?;
        writeln!(f, "Content Extracted:")?;
        writeln!(f, "  Research Descriptions: {with_descriptions}")?;
        writeln!(f, "  Research Keywords: {with_keywords}")?;
        writeln!(f, "  CV/Resume Links: {with_cv}")?;
        writeln!(f, "  Lab Names: {with_lab}")?;
        writeln!(f, "  Funding Sources: {with_funding}")?;
        writeln!(f, "  Courses: {with_courses}")?;

        writeln!(f)?;
        writeln!(f, "Research Areas:")?;
        for area in ResearchArea::ALL {
            let count = data().filter(|d| d.research_areas.contains(&area)).count();
            if count > 0 {
                writeln!(f, "  {area}: {count}")?;
            }
        }

        let mut by_department: BTreeMap<&str, DepartmentTally> = BTreeMap::new();
        for record in records {
            let tally = by_department.entry(department_of(record)).or_default();
            if record.website_url().is_some() {
                tally.with_website += 1;
            }
            if record
                .website_data
                .as_ref()
                .is_some_and(|d| d.extraction_success)
            {
                tally.extracted += 1;
            }
        }

        writeln!(f)?;
        writeln!(f, "Extraction Rate by Department:")?;
        for (dept, tally) in &by_department {
            writeln!(
                f,
                "  {dept}: {}/{} ({:.1}%)",
                tally.extracted,
                tally.with_website,
                percent(tally.extracted, tally.with_website)
            )?;
        }

        Ok(())
    }
}
