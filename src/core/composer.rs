use crate::models::{TutorProfile, UserRef};

/// Build the searchable text for a tutor
///
/// Field order is fixed: owner name, subject, bio (empty if absent),
/// location. Embeddings are only stable across calls because this order
/// never changes, so every caller that embeds a tutor goes through here.
pub fn compose_profile_text(profile: &TutorProfile, owner: &UserRef) -> String {
    format!(
        "{} {} {} {}",
        owner.name,
        profile.subject,
        profile.bio.as_deref().unwrap_or(""),
        profile.location
    )
}
