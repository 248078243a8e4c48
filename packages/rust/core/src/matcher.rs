//! Identity matching between scraped records and the authoritative set.
//!
//! Names are compared exactly (case-sensitive, no normalisation). Each input
//! is first collapsed to one record per name: the last occurrence wins and
//! takes the position of the first.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use facultydir_shared::FacultyRecord;

/// One entry of the partition, in output order.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchEntry {
    /// The name appears in both sources.
    Matched {
        authoritative: FacultyRecord,
        scraped: FacultyRecord,
    },
    /// Scraped, with no authoritative counterpart.
    WebOnly(FacultyRecord),
    /// Authoritative, never seen on any department page.
    AuthoritativeOnly(FacultyRecord),
}

impl MatchEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Matched { scraped, .. } => &scraped.name,
            Self::WebOnly(r) | Self::AuthoritativeOnly(r) => &r.name,
        }
    }
}

/// Result of [`match_records`].
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Scraped order (matched and web-only interleaved), then
    /// authoritative-only in authoritative order.
    pub entries: Vec<MatchEntry>,
    /// Names that occurred more than once among scraped records, once per
    /// superseded occurrence.
    pub duplicate_scraped: Vec<String>,
    /// Same, for the authoritative set.
    pub duplicate_authoritative: Vec<String>,
}

impl MatchOutcome {
    pub fn matched(&self) -> usize {
        self.count(|e| matches!(e, MatchEntry::Matched { .. }))
    }

    pub fn web_only(&self) -> usize {
        self.count(|e| matches!(e, MatchEntry::WebOnly(_)))
    }

    pub fn authoritative_only(&self) -> usize {
        self.count(|e| matches!(e, MatchEntry::AuthoritativeOnly(_)))
    }

    fn count(&self, pred: impl Fn(&MatchEntry) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }
}

/// Partition `scraped` against `authoritative` by name.
///
/// Neither input is modified; every output record is a clone.
pub fn match_records(scraped: &[FacultyRecord], authoritative: &[FacultyRecord]) -> MatchOutcome {
    let (scraped_unique, duplicate_scraped) = collapse_last_wins(scraped);
    let (authoritative_unique, duplicate_authoritative) = collapse_last_wins(authoritative);

    for name in &duplicate_scraped {
        warn!(%name, "duplicate name among scraped records, keeping last occurrence");
    }
    for name in &duplicate_authoritative {
        warn!(%name, "duplicate name in authoritative set, keeping last occurrence");
    }

    let authoritative_by_name: HashMap<&str, &FacultyRecord> = authoritative_unique
        .iter()
        .map(|r| (r.name.as_str(), *r))
        .collect();
    let scraped_names: HashSet<&str> = scraped_unique.iter().map(|r| r.name.as_str()).collect();

    let mut entries = Vec::with_capacity(scraped_unique.len() + authoritative_unique.len());

    for record in &scraped_unique {
        match authoritative_by_name.get(record.name.as_str()) {
            Some(auth) => entries.push(MatchEntry::Matched {
                authoritative: (*auth).clone(),
                scraped: (*record).clone(),
            }),
            None => {
                debug!(name = %record.name, "scraped record has no authoritative match");
                entries.push(MatchEntry::WebOnly((*record).clone()));
            }
        }
    }

    for record in &authoritative_unique {
        if !scraped_names.contains(record.name.as_str()) {
            entries.push(MatchEntry::AuthoritativeOnly((*record).clone()));
        }
    }

    MatchOutcome {
        entries,
        duplicate_scraped,
        duplicate_authoritative,
    }
}

/// One record per name, in first-occurrence order, holding the last
/// occurrence's data. Also returns the name of each superseded duplicate.
fn collapse_last_wins(records: &[FacultyRecord]) -> (Vec<&FacultyRecord>, Vec<String>) {
    let mut slot_by_name: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    let mut unique: Vec<&FacultyRecord> = Vec::with_capacity(records.len());
    let mut duplicates = Vec::new();

    for record in records {
        match slot_by_name.get(record.name.as_str()) {
            Some(&slot) => {
                unique[slot] = record;
                duplicates.push(record.name.clone());
            }
            None => {
                slot_by_name.insert(record.name.as_str(), unique.len());
                unique.push(record);
            }
        }
    }

    (unique, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn rec(name: &str) -> FacultyRecord {
        FacultyRecord::named(name)
    }

    fn rec_with_title(name: &str, title: &str) -> FacultyRecord {
        FacultyRecord {
            title: Some(title.into()),
            ..FacultyRecord::named(name)
        }
    }

    fn names(outcome: &MatchOutcome) -> Vec<&str> {
        outcome.entries.iter().map(MatchEntry::name).collect()
    }

    #[test]
    fn partitions_three_ways() {
        let scraped = vec![rec("Ada"), rec("Grace"), rec("Alan")];
        let authoritative = vec![rec("Alan"), rec("Barbara"), rec("Ada")];

        let outcome = match_records(&scraped, &authoritative);
        assert_eq!(outcome.matched(), 2);
        assert_eq!(outcome.web_only(), 1);
        assert_eq!(outcome.authoritative_only(), 1);
        assert_eq!(names(&outcome), vec!["Ada", "Grace", "Alan", "Barbara"]);
        assert!(matches!(&outcome.entries[1], MatchEntry::WebOnly(r) if r.name == "Grace"));
        assert!(
            matches!(&outcome.entries[3], MatchEntry::AuthoritativeOnly(r) if r.name == "Barbara")
        );
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let scraped = vec![rec("A"), rec("B"), rec("C"), rec("D")];
        let authoritative = vec![rec("C"), rec("D"), rec("E"), rec("F"), rec("G")];

        let outcome = match_records(&scraped, &authoritative);

        let all: Vec<&str> = names(&outcome);
        let unique: BTreeSet<&str> = all.iter().copied().collect();
        assert_eq!(all.len(), unique.len(), "a name landed in two partitions");

        let expected: BTreeSet<&str> = scraped
            .iter()
            .chain(authoritative.iter())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(unique, expected);
    }

    #[test]
    fn matching_is_exact() {
        let scraped = vec![rec("jane doe"), rec("Jane Doe ")];
        let authoritative = vec![rec("Jane Doe")];

        let outcome = match_records(&scraped, &authoritative);
        assert_eq!(outcome.matched(), 0);
        assert_eq!(outcome.web_only(), 2);
        assert_eq!(outcome.authoritative_only(), 1);
    }

    #[test]
    fn duplicate_scraped_names_last_wins_at_first_position() {
        let scraped = vec![
            rec_with_title("Ada", "first"),
            rec("Grace"),
            rec_with_title("Ada", "second"),
        ];
        let outcome = match_records(&scraped, &[]);

        assert_eq!(names(&outcome), vec!["Ada", "Grace"]);
        match &outcome.entries[0] {
            MatchEntry::WebOnly(r) => assert_eq!(r.title.as_deref(), Some("second")),
            other => panic!("unexpected entry {other:?}"),
        }
        assert_eq!(outcome.duplicate_scraped, vec!["Ada"]);
        assert!(outcome.duplicate_authoritative.is_empty());
    }

    #[test]
    fn duplicate_authoritative_names_last_wins() {
        let authoritative = vec![rec_with_title("Ada", "old"), rec_with_title("Ada", "new")];
        let outcome = match_records(&[rec("Ada")], &authoritative);

        assert_eq!(outcome.entries.len(), 1);
        match &outcome.entries[0] {
            MatchEntry::Matched { authoritative, .. } => {
                assert_eq!(authoritative.title.as_deref(), Some("new"));
            }
            other => panic!("unexpected entry {other:?}"),
        }
        assert_eq!(outcome.duplicate_authoritative, vec!["Ada"]);
    }

    #[test]
    fn empty_inputs() {
        let outcome = match_records(&[], &[]);
        assert!(outcome.entries.is_empty());

        let outcome = match_records(&[], &[rec("Ada")]);
        assert_eq!(outcome.authoritative_only(), 1);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let scraped = vec![rec("Ada")];
        let authoritative = vec![rec("Ada"), rec("Alan")];
        let before = (scraped.clone(), authoritative.clone());
        let _ = match_records(&scraped, &authoritative);
        assert_eq!((scraped, authoritative), before);
    }
}
