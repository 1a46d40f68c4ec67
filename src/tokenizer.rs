//! The tokenizer capability consumed by the chunker.
//!
//! The chunker never specializes to a vocabulary: every token-count or split
//! decision goes through this trait. Implementations must guarantee
//! `count_tokens` is deterministic for a given input.

use crate::identity::TokenCount;
use unicode_segmentation::UnicodeSegmentation;

/// Semantic boundary preferred when splitting oversized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitUnit {
    Sentence,
    Word,
    Paragraph,
}

/// Read-only, informational description of the backing model.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub name: String,
    pub max_context_length: usize,
    pub avg_tokens_per_word: f64,
}

/// Abstract token-count and text-split operations.
///
/// # Contract
///
/// - `count_tokens` is deterministic; empty text yields `0`.
/// - `split` partitions `text` into pieces each with at most `max_tokens`
///   tokens, preferring `unit` as the boundary and falling back to
///   word-level splitting when a single unit itself exceeds the budget.
///   Concatenating the pieces losslessly covers all non-whitespace content
///   of the input (whitespace trimming is permitted). `max_tokens == 0`
///   yields an empty result. If the whole text already fits, `split` returns
///   the single-element `[text]`.
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> TokenCount;
    fn split(&self, text: &str, max_tokens: usize, unit: SplitUnit) -> Vec<String>;
    fn model_info(&self) -> ModelInfo;
}

/// Dependency-free reference tokenizer: counts Unicode-segmented words and
/// splits on paragraph/sentence/word boundaries accordingly. Carries no
/// vocabulary; usable standalone or as a default for the CLI and tests.
pub struct WordTokenizer {
    max_context_length: usize,
}

impl WordTokenizer {
    pub fn new(max_context_length: usize) -> Self {
        Self { max_context_length }
    }

    fn words(text: &str) -> Vec<&str> {
        text.unicode_words().collect()
    }

    fn paragraphs(text: &str) -> Vec<String> {
        text.split("\n\n")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect()
    }

    fn sentences(text: &str) -> Vec<String> {
        let mut sentences = Vec::new();
        let mut current = String::new();
        let chars: Vec<char> = text.chars().collect();
        for (i, c) in chars.iter().enumerate() {
            current.push(*c);
            if matches!(c, '.' | '!' | '?') {
                let next_is_boundary = chars.get(i + 1).map(|n| n.is_whitespace()).unwrap_or(true);
                if next_is_boundary {
                    let trimmed = current.trim().to_string();
                    if !trimmed.is_empty() {
                        sentences.push(trimmed);
                    }
                    current = String::new();
                }
            }
        }
        let trimmed = current.trim().to_string();
        if !trimmed.is_empty() {
            sentences.push(trimmed);
        }
        sentences
    }

    fn units_for(text: &str, unit: SplitUnit) -> Vec<String> {
        match unit {
            SplitUnit::Paragraph => Self::paragraphs(text),
            SplitUnit::Sentence => Self::sentences(text),
            SplitUnit::Word => Self::words(text).into_iter().map(String::from).collect(),
        }
    }

    /// Greedily pack `units` into pieces of at most `max_tokens` tokens each,
    /// falling back to word-level packing for any unit that alone exceeds
    /// the budget.
    fn pack_units(&self, units: Vec<String>, max_tokens: usize) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_tokens = 0usize;

        let mut flush = |current: &mut String, pieces: &mut Vec<String>| {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed.to_string());
            }
            current.clear();
        };

        for unit in units {
            let unit_tokens = self.count_tokens(&unit).get();
            if unit_tokens > max_tokens {
                flush(&mut current, &mut pieces);
                current_tokens = 0;
                pieces.extend(self.pack_words(&unit, max_tokens));
                continue;
            }
            if current_tokens + unit_tokens > max_tokens && !current.is_empty() {
                flush(&mut current, &mut pieces);
                current_tokens = 0;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&unit);
            current_tokens += unit_tokens;
        }
        flush(&mut current, &mut pieces);
        pieces
    }

    fn pack_words(&self, text: &str, max_tokens: usize) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        let mut current_tokens = 0usize;

        for word in Self::words(text) {
            let word_tokens = self.count_tokens(word).get();
            if current_tokens + word_tokens > max_tokens && !current.is_empty() {
                pieces.push(current.trim().to_string());
                current = String::new();
                current_tokens = 0;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_tokens += word_tokens;
        }
        let trimmed = current.trim().to_string();
        if !trimmed.is_empty() {
            pieces.push(trimmed);
        }
        pieces
    }
}

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str) -> TokenCount {
        TokenCount::new(Self::words(text).len())
    }

    fn split(&self, text: &str, max_tokens: usize, unit: SplitUnit) -> Vec<String> {
        if max_tokens == 0 {
            return Vec::new();
        }
        if self.count_tokens(text).get() <= max_tokens {
            return vec![text.to_string()];
        }
        let units = Self::units_for(text, unit);
        self.pack_units(units, max_tokens)
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            name: "word-tokenizer".to_string(),
            max_context_length: self.max_context_length,
            avg_tokens_per_word: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_zero_tokens() {
        let t = WordTokenizer::new(512);
        assert_eq!(t.count_tokens("").get(), 0);
    }

    #[test]
    fn zero_max_tokens_yields_empty_split() {
        let t = WordTokenizer::new(512);
        assert!(t.split("hello world", 0, SplitUnit::Word).is_empty());
    }

    #[test]
    fn text_that_fits_is_returned_whole() {
        let t = WordTokenizer::new(512);
        let pieces = t.split("hello world", 10, SplitUnit::Word);
        assert_eq!(pieces, vec!["hello world".to_string()]);
    }

    #[test]
    fn split_respects_budget_and_is_lossless() {
        let t = WordTokenizer::new(512);
        let text = "one two three four five six seven eight nine ten";
        let pieces = t.split(text, 3, SplitUnit::Word);
        for piece in &pieces {
            assert!(t.count_tokens(piece).get() <= 3);
        }
        let rejoined: String = pieces.join(" ");
        for word in text.split_whitespace() {
            assert!(rejoined.contains(word));
        }
    }

    #[test]
    fn oversized_single_sentence_falls_back_to_words() {
        let t = WordTokenizer::new(512);
        let long_sentence = (0..20)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
            + ".";
        let pieces = t.split(&long_sentence, 5, SplitUnit::Sentence);
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(t.count_tokens(piece).get() <= 5);
        }
    }
}
