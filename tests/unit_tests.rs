// Unit tests for EduBridge Search

use edubridge_search::core::{
    apply_cutoffs, compose_candidates, compose_profile_text, cosine_similarity,
    filter_candidates, matches_structured_filters, rank_by_similarity,
};
use edubridge_search::models::{CorpusEntry, SearchOptions, TutorProfile, UserRef};

fn create_entry(id: i64, subject: &str, location: &str) -> CorpusEntry {
    CorpusEntry::new(
        TutorProfile {
            id,
            user_id: id + 100,
            subject: subject.to_string(),
            price_per_hour: 35.0,
            availability: "Weekends".to_string(),
            whatsapp_number: "+1234567890".to_string(),
            location: location.to_string(),
            bio: None,
            rating: 0.0,
            total_sessions: 0,
        },
        UserRef { id: id + 100, name: format!("Tutor {}", id) },
    )
}

fn sample_pool() -> Vec<CorpusEntry> {
    vec![
        create_entry(1, "Mathematics", "New York, NY"),
        create_entry(2, "Physics", "Boston, MA"),
        create_entry(3, "English Literature", "Los Angeles, CA"),
        create_entry(4, "Computer Science", "San Francisco, CA"),
        create_entry(5, "Applied Mathematics", "Austin, TX"),
    ]
}

fn ids(entries: &[CorpusEntry]) -> Vec<i64> {
    entries.iter().map(|e| e.profile.id).collect()
}

#[test]
fn test_filter_matches_exactly_the_substring_hits() {
    let pool = sample_pool();
    let terms = [
        (Some("MATH"), None),
        (None, Some(", ca")),
        (Some("sci"), Some("francisco")),
        (Some("e"), Some("a")),
        (Some("chemistry"), None),
    ];

    for (subject, location) in terms {
        let filtered = filter_candidates(pool.clone(), subject, location);
        let expected: Vec<i64> = pool
            .iter()
            .filter(|e| {
                subject.map_or(true, |s| e.profile.subject.to_lowercase().contains(&s.to_lowercase()))
                    && location.map_or(true, |l| e.profile.location.to_lowercase().contains(&l.to_lowercase()))
            })
            .map(|e| e.profile.id)
            .collect();

        assert_eq!(ids(&filtered), expected, "subject={:?} location={:?}", subject, location);
    }
}

#[test]
fn test_filter_preserves_input_order() {
    let mut pool = sample_pool();
    pool.reverse();

    let filtered = filter_candidates(pool, Some("math"), None);
    assert_eq!(ids(&filtered), vec![5, 1]);
}

#[test]
fn test_blank_filter_terms_impose_nothing() {
    let filtered = filter_candidates(sample_pool(), Some(""), Some("   "));
    assert_eq!(filtered.len(), 5);
}

#[test]
fn test_single_profile_filter_check() {
    let entry = create_entry(1, "Mathematics", "New York, NY");
    assert!(matches_structured_filters(&entry.profile, Some("thema"), Some("york")));
    assert!(!matches_structured_filters(&entry.profile, Some("math"), Some("boston")));
}

#[test]
fn test_composed_text_field_order() {
    let entry = create_entry(2, "Physics", "Boston, MA");
    let mut profile = entry.profile.clone();
    profile.bio = Some("Mechanics and optics".to_string());

    assert_eq!(
        compose_profile_text(&profile, &entry.owner),
        "Tutor 2 Physics Mechanics and optics Boston, MA"
    );
}

#[test]
fn test_cosine_bounds() {
    let pairs: [(&[f32], &[f32]); 5] = [
        (&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]),
        (&[1.0, 0.0], &[-1.0, 0.0]),
        (&[0.0, 0.0], &[1.0, 1.0]),
        (&[1e-30, 1e-30], &[1e30, 1e30]),
        (&[0.3, -0.7, 0.1], &[0.2, 0.9, -0.4]),
    ];

    for (a, b) in pairs {
        let score = cosine_similarity(a, b);
        assert!(!score.is_nan());
        assert!((-1.0..=1.0).contains(&score));
    }
}

#[test]
fn test_rank_then_cutoffs() {
    let candidates = compose_candidates(sample_pool());
    let vectors = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.7, 0.7],
        vec![-1.0, 0.0],
        vec![0.9, 0.1],
    ];

    let ranked = rank_by_similarity(&[1.0, 0.0], candidates, &vectors);
    let order: Vec<i64> = ranked.iter().map(|c| c.entry.profile.id).collect();
    assert_eq!(order, vec![1, 5, 3, 2, 4]);

    let options = SearchOptions {
        top_k: Some(2),
        min_score: Some(0.5),
        ..SearchOptions::default()
    };
    let cut = apply_cutoffs(ranked, &options);
    let order: Vec<i64> = cut.iter().map(|c| c.entry.profile.id).collect();
    assert_eq!(order, vec![1, 5]);
}
