//! Search index builder
//!
//! One flat keyword index over occupation, area, and major-group titles.
//! Each entry carries enough summary data to render a search result
//! without a follow-up fetch, and entries are pre-sorted by employment as
//! a popularity proxy so consumers can truncate instead of rank.

use crate::joiner::{CanonicalDataset, OccupationDataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Tokens dropped from titles before indexing
const STOPWORDS: &[&str] = &[
    "and", "of", "the", "all", "other", "misc", "miscellaneous", "except",
];

/// What a search entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Occupation,
    Area,
    Group,
}

/// One searchable item with its render-ready summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub kind: EntryKind,
    /// SOC code, area id, or major-group code
    pub id: String,
    pub title: String,
    /// Lowercased keywords and stems, deduplicated and sorted
    pub keywords: Vec<String>,
    #[serde(rename = "e", skip_serializing_if = "Option::is_none")]
    pub employment: Option<f64>,
    #[serde(rename = "ad", skip_serializing_if = "Option::is_none")]
    pub annual_median: Option<f64>,
}

/// `search-index.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub entries: Vec<SearchEntry>,
}

/// Keywords for one title: lowercase, punctuation stripped, split on
/// whitespace and hyphen, stopwords dropped, suffix stems added.
pub fn keywords(title: &str) -> Vec<String> {
    let mut out = BTreeSet::new();
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    for token in cleaned.split(|c: char| c.is_whitespace() || c == '-') {
        if token.is_empty() || STOPWORDS.contains(&token) {
            continue;
        }
        out.insert(token.to_string());
        for stem in stems(token) {
            out.insert(stem);
        }
    }
    out.into_iter().collect()
}

/// Suffix-stripped stems for one token, longest suffix first.
///
/// "ers"/"ists" reach the verb or field root ("developers" → "develop",
/// "machinists" → "machin"); plain "s" covers ordinary plurals.
fn stems(token: &str) -> Vec<String> {
    let mut out = Vec::new();
    for suffix in ["ists", "ers", "s"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            if stem.len() >= 3 {
                out.push(stem.to_string());
            }
        }
    }
    out
}

/// Build the full index over occupations, areas, and major groups
pub fn build_index(
    geography: &CanonicalDataset,
    occupations: &OccupationDataset,
) -> SearchIndex {
    let mut entries = Vec::new();

    for record in &occupations.national {
        entries.push(SearchEntry {
            kind: EntryKind::Occupation,
            id: record.soc_code.clone(),
            title: record.title.clone(),
            keywords: keywords(&record.title),
            employment: record.employment,
            annual_median: record.annual_median,
        });
    }
    for state in geography.states.values() {
        entries.push(SearchEntry {
            kind: EntryKind::Area,
            id: state.fips.clone(),
            title: state.name.clone(),
            keywords: keywords(&state.name),
            employment: state.labor_force,
            annual_median: None,
        });
    }
    for metro in geography.metros.values() {
        entries.push(SearchEntry {
            kind: EntryKind::Area,
            id: metro.cbsa.clone(),
            title: metro.name.clone(),
            keywords: keywords(&metro.name),
            employment: metro.labor_force,
            annual_median: None,
        });
    }
    for group in &occupations.major_groups {
        entries.push(SearchEntry {
            kind: EntryKind::Group,
            id: group.code.clone(),
            title: group.title.clone(),
            keywords: keywords(&group.title),
            employment: None,
            annual_median: None,
        });
    }

    // Employment descending, absent last; id tiebreak keeps the order
    // deterministic across runs
    entries.sort_by(|a, b| {
        let a_emp = a.employment.unwrap_or(f64::MIN);
        let b_emp = b.employment.unwrap_or(f64::MIN);
        b_emp
            .partial_cmp(&a_emp)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });

    SearchIndex { entries }
}
