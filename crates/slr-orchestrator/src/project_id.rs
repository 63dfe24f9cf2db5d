//! Project id generation: a short, filesystem-safe slug derived from the
//! raw idea plus a content hash, so two projects started from near-
//! identical ideas don't collide on disk.

/// Builds `<slug>-<8 hex chars>` from `idea`, where the hash input also
/// includes `nonce` (the caller passes a monotonic or random value) so
/// repeated calls with the same idea still produce distinct ids.
#[must_use]
pub fn new_project_id(idea: &str, nonce: &[u8]) -> String {
    let slug = slugify(idea, 6);
    let mut hasher = blake3::Hasher::new();
    hasher.update(idea.as_bytes());
    hasher.update(nonce);
    let digest = hasher.finalize();
    let short = &digest.to_hex()[..8];
    if slug.is_empty() {
        format!("project-{short}")
    } else {
        format!("{slug}-{short}")
    }
}

fn slugify(text: &str, max_words: usize) -> String {
    let words: Vec<String> = text
        .split_whitespace()
        .take(max_words)
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    words.join("-")
}
