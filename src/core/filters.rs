use crate::models::{CorpusEntry, TutorProfile};

/// Lowercase an optional filter term; blank or missing terms impose no constraint
///
/// Non-blank terms are matched as given, surrounding whitespace included.
#[inline]
fn active_term(term: Option<&str>) -> Option<String> {
    term.filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase)
}

/// Case-insensitive substring check against an already lowercased needle
#[inline]
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Check if a profile passes the subject and location filters
///
/// Each provided term must appear in the corresponding field as a
/// case-insensitive substring.
#[inline]
pub fn matches_structured_filters(
    profile: &TutorProfile,
    subject: Option<&str>,
    location: Option<&str>,
) -> bool {
    if let Some(term) = active_term(subject) {
        if !contains_folded(&profile.subject, &term) {
            return false;
        }
    }

    if let Some(term) = active_term(location) {
        if !contains_folded(&profile.location, &term) {
            return false;
        }
    }

    true
}

/// Narrow the corpus to the candidates passing the structured filters
///
/// Surviving candidates keep their input order.
pub fn filter_candidates(
    candidates: Vec<CorpusEntry>,
    subject: Option<&str>,
    location: Option<&str>,
) -> Vec<CorpusEntry> {
    candidates
        .into_iter()
        .filter(|entry| matches_structured_filters(&entry.profile, subject, location))
        .collect()
}
