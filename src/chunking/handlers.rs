//! Specialized handlers for tables and code blocks (spec.md §4.4.5).
//!
//! Both handlers explode a single structurally-special node into several
//! chunks, each still carrying enough surrounding context (headers, caption,
//! language) to stand alone outside the buffer/flush main loop.

use super::factory::ChunkFactory;
use crate::chunk::Chunk;
use crate::error::ProcessingError;
use crate::identity::NodeId;
use crate::node::Breadcrumb;

/// Explode a table into one structure/schema chunk and one chunk per row.
pub fn table_chunks(
    factory: &mut ChunkFactory<'_>,
    base: &Breadcrumb,
    table_id: &NodeId,
    table_importance: f64,
    caption: &Option<String>,
    headers: &[String],
    rows: &[Vec<String>],
) -> Result<Vec<Chunk>, ProcessingError> {
    let table_breadcrumb = base.appending("Table");
    let structure_breadcrumb = table_breadcrumb.appending("Structure");

    let mut content = String::from("Table Information:\n");
    if let Some(caption) = caption.as_ref().filter(|c| !c.is_empty()) {
        content.push_str(&format!("Caption: {caption}\n"));
    }
    content.push_str(&format!("Headers: {}\n", headers.join(", ")));
    content.push_str(&format!("Rows: {}\n", rows.len()));
    content.push_str(&format!("Structure: {} columns × {} rows", headers.len(), rows.len()));

    let mut chunks = vec![factory.build(
        content,
        structure_breadcrumb,
        vec![table_id.clone()],
        &[table_importance],
    )?];

    for (i, row) in rows.iter().enumerate() {
        let row_breadcrumb = table_breadcrumb.appending(format!("Row {}", i + 1));
        let fields: Vec<String> = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| format!("{header}: {value}"))
            .collect();

        let mut content = String::from("Table: ");
        if let Some(caption) = caption.as_ref().filter(|c| !c.is_empty()) {
            content.push_str(caption);
        }
        content.push('\n');
        content.push_str(&format!("Row: {{ {} }}", fields.join(", ")));

        chunks.push(factory.build(content, row_breadcrumb, vec![table_id.clone()], &[table_importance])?);
    }

    Ok(chunks)
}

fn format_code(language: &Option<String>, code: &str) -> String {
    match language {
        Some(lang) if !lang.is_empty() => format!("Code ({lang}):\n{code}"),
        _ => format!("Code:\n{code}"),
    }
}

/// Emit a single chunk if the code fits the budget, otherwise split
/// line-by-line (never inside a single line) into `"Part k"` chunks.
pub fn code_chunks(
    factory: &mut ChunkFactory<'_>,
    base: &Breadcrumb,
    code_id: &NodeId,
    code_importance: f64,
    language: &Option<String>,
    code: &str,
    max_tokens: usize,
) -> Result<Vec<Chunk>, ProcessingError> {
    let code_breadcrumb = base.appending("Code");

    if factory.tokenizer().count_tokens(code).get() <= max_tokens {
        let content = format_code(language, code);
        return Ok(vec![factory.build(content, code_breadcrumb, vec![code_id.clone()], &[code_importance])?]);
    }

    let mut chunks = Vec::new();
    let mut part = 0usize;
    let mut current_lines: Vec<&str> = Vec::new();
    let mut current_tokens = 0usize;

    let mut flush = |factory: &mut ChunkFactory<'_>,
                      chunks: &mut Vec<Chunk>,
                      part: &mut usize,
                      lines: &mut Vec<&str>|
     -> Result<(), ProcessingError> {
        if lines.is_empty() {
            return Ok(());
        }
        let body = lines.join("\n");
        let content = format_code(language, &body);
        let breadcrumb = code_breadcrumb.appending(format!("Part {}", *part + 1));
        chunks.push(factory.build(content, breadcrumb, vec![code_id.clone()], &[code_importance])?);
        *part += 1;
        lines.clear();
        Ok(())
    };

    for line in code.lines() {
        let line_tokens = factory.tokenizer().count_tokens(line).get();
        if current_tokens + line_tokens > max_tokens && !current_lines.is_empty() {
            flush(factory, &mut chunks, &mut part, &mut current_lines)?;
            current_tokens = 0;
        }
        current_lines.push(line);
        current_tokens += line_tokens;
    }
    flush(factory, &mut chunks, &mut part, &mut current_lines)?;

    Ok(chunks)
}
