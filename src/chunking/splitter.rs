//! Large-node splitting with sentence-aligned overlap (spec.md §4.4.6).

use super::factory::ChunkFactory;
use crate::chunk::Chunk;
use crate::error::ProcessingError;
use crate::identity::NodeId;
use crate::node::Breadcrumb;
use crate::tokenizer::SplitUnit;

/// Split `text` (a single oversized node's `plain_text`) into chunks under
/// `base ▸ "Part k"`, each carrying `node_id` as its sole source node.
#[allow(clippy::too_many_arguments)]
pub fn split_node(
    factory: &mut ChunkFactory<'_>,
    base: &Breadcrumb,
    node_id: &NodeId,
    node_importance: f64,
    text: &str,
    max_tokens: usize,
    overlap_tokens: usize,
    split_unit: SplitUnit,
    preserve_context: bool,
) -> Result<Vec<Chunk>, ProcessingError> {
    let budget = max_tokens.saturating_sub(overlap_tokens).max(1);
    let pieces = factory.tokenizer().split(text, budget, split_unit);

    let mut chunks = Vec::with_capacity(pieces.len());
    let mut previous_tail: Option<String> = None;

    for (i, piece) in pieces.iter().enumerate() {
        let content = if preserve_context && i > 0 {
            match &previous_tail {
                Some(tail) => format!("{tail}\n\n{piece}"),
                None => piece.clone(),
            }
        } else {
            piece.clone()
        };

        let breadcrumb = base.appending(format!("Part {}", i + 1));
        chunks.push(factory.build(content, breadcrumb, vec![node_id.clone()], &[node_importance])?);

        previous_tail = Some(overlap_tail(factory.tokenizer(), piece, overlap_tokens));
    }

    Ok(chunks)
}

/// Sentence-aligned trailing slice of `piece`, bounded to roughly
/// `overlap_tokens`. Falls back to the trailing 200 characters when `piece`
/// has fewer than two sentences to align to.
fn overlap_tail(tokenizer: &dyn crate::tokenizer::Tokenizer, piece: &str, overlap_tokens: usize) -> String {
    let sentences: Vec<&str> = piece.split(". ").collect();
    if sentences.len() < 2 {
        let chars: Vec<char> = piece.chars().collect();
        let start = chars.len().saturating_sub(200);
        return chars[start..].iter().collect();
    }

    let mut accumulated: Vec<&str> = Vec::new();
    for sentence in sentences.iter().rev() {
        accumulated.push(sentence);
        let joined = accumulated.iter().rev().cloned().collect::<Vec<_>>().join(". ");
        if tokenizer.count_tokens(&joined).get() >= overlap_tokens {
            break;
        }
    }
    accumulated.reverse();
    accumulated.join(". ")
}
