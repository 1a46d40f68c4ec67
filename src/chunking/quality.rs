//! Quality scoring (spec.md §4.4.7).

use crate::identity::TokenCount;

/// Score a candidate chunk's content against its token budget and the
/// structural importance of the nodes that contributed to it.
pub fn score(content: &str, token_count: TokenCount, contributing_importances: &[f64], max_tokens: usize) -> f64 {
    let mut score = 1.0;

    let token_ratio = token_count.get() as f64 / max_tokens as f64;
    if token_ratio < 0.1 {
        score *= 0.7;
    } else if token_ratio > 0.9 {
        score *= 0.9;
    }

    let avg_importance = if contributing_importances.is_empty() {
        0.0
    } else {
        contributing_importances.iter().sum::<f64>() / contributing_importances.len() as f64
    };
    score = (score + avg_importance) / 2.0;

    score = (score + content_quality(content)) / 2.0;

    score.clamp(0.0, 1.0)
}

fn content_quality(content: &str) -> f64 {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let mut quality: f64 = if trimmed.chars().count() < 10 { 0.3 } else { 0.7 };
    if has_complete_sentence(trimmed) {
        quality += 0.2;
    }
    if trimmed.contains(':') || trimmed.contains('-') || trimmed.contains('•') {
        quality += 0.1;
    }
    quality.min(1.0)
}

/// A "complete sentence" is a `.`/`!`/`?`-delimited segment longer than 5
/// characters whose first character is a letter. No locale-specific
/// punctuation handling is attempted (spec.md §9 open question).
fn has_complete_sentence(content: &str) -> bool {
    content.split(['.', '!', '?']).any(|segment| {
        let segment = segment.trim();
        segment.chars().count() > 5 && segment.chars().next().is_some_and(|c| c.is_alphabetic())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_scores_zero_content_quality() {
        assert_eq!(content_quality(""), 0.0);
        assert_eq!(content_quality("   "), 0.0);
    }

    #[test]
    fn short_content_scores_low() {
        assert_eq!(content_quality("hi"), 0.3);
    }

    #[test]
    fn complete_sentence_and_punctuation_add_bonuses() {
        let quality = content_quality("This is a complete sentence with a colon: yes.");
        assert!(quality > 0.7);
    }

    #[test]
    fn score_is_clamped_to_unit_interval() {
        let s = score("short text", TokenCount::new(600), &[1.0, 1.0], 100);
        assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn oversized_ratio_is_penalized() {
        let high = score("A complete sentence here.", TokenCount::new(95), &[0.9], 100);
        let mid = score("A complete sentence here.", TokenCount::new(50), &[0.9], 100);
        assert!(high < mid || (high - mid).abs() < 1e-9);
    }
}
