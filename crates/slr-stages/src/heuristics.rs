//! Deterministic text heuristics shared by stages that need a fallback
//! path when no LLM drafter is configured (`llm.provider = deterministic`)
//! or when the drafter errors.

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "for", "in", "on", "with", "is", "are", "be",
    "this", "that", "it", "as", "by", "at", "from", "into", "we", "our", "how", "what",
];

/// Lowercase, alphanumeric-only tokens with stopwords and short words
/// filtered out, deduplicated in first-seen order, capped at `max`.
#[must_use]
pub fn extract_keywords(text: &str, max: usize) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for raw in text.split_whitespace() {
        if out.len() >= max {
            break;
        }
        let cleaned: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if cleaned.len() < 4 || STOPWORDS.contains(&cleaned.as_str()) {
            continue;
        }
        if seen.insert(cleaned.clone()) {
            out.push(cleaned);
        }
    }
    out
}

/// A short, readable title from the first handful of words of free text.
#[must_use]
pub fn derive_title(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().take(max_words).collect();
    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => "Untitled Review".to_string(),
    }
}

/// A lowercase, hyphenated identifier fragment, for concept/question ids.
#[must_use]
pub fn slug(text: &str, index: usize) -> String {
    let base: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    let trimmed = base.trim_matches('-');
    if trimmed.is_empty() {
        format!("item-{index}")
    } else {
        format!("{trimmed}-{index}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_keywords_drops_stopwords_and_short_words() {
        let keywords = extract_keywords("The impact of remote work on team communication", 10);
        assert!(!keywords.contains(&"the".to_string()));
        assert!(keywords.contains(&"impact".to_string()));
        assert!(keywords.contains(&"remote".to_string()));
    }

    #[test]
    fn extract_keywords_respects_cap() {
        let keywords = extract_keywords("alpha beta gamma delta epsilon zeta eta theta", 3);
        assert_eq!(keywords.len(), 3);
    }

    #[test]
    fn derive_title_capitalizes_first_letter() {
        assert_eq!(derive_title("remote work productivity study", 3), "Remote work productivity");
    }

    #[test]
    fn slug_falls_back_when_text_has_no_alphanumerics() {
        assert_eq!(slug("???", 2), "item-2");
    }
}
