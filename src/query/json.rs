//! JSON parsing helper for query service responses.

use anyhow::Result;

/// Parse JSON, attaching the serde path and a short snippet of the
/// offending line when it fails. The query service fronts a spreadsheet,
/// so half-filled cells producing nulls where strings are expected is a
/// routine failure worth pinpointing exactly.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    match serde_path_to_error::deserialize(jd) {
        Ok(value) => Ok(value),
        Err(err) => {
            let inner = err.inner();
            let (line, column) = (inner.line(), inner.column());
            let path = err.path().to_string();

            let mut message = String::new();
            if !path.is_empty() && path != "." {
                message.push_str(&format!("at path '{path}': "));
            }
            message.push_str(&format!("{inner} (line {line} col {column})"));
            if let Some(snippet) = line_snippet(body, line, column) {
                message.push('\n');
                message.push_str(&snippet);
            }

            Err(anyhow::anyhow!(message))
        }
    }
}

/// A windowed excerpt of the failing line with a caret under the column.
///
/// serde's column is a byte offset, so the window edges are snapped to
/// char boundaries before slicing and the caret indent is counted in
/// characters, keeping multibyte text (names, notes) panic-free.
fn line_snippet(body: &str, line: usize, column: usize) -> Option<String> {
    let target = body.lines().nth(line.checked_sub(1)?)?;
    if target.is_empty() {
        return None;
    }

    let error_idx = floor_char_boundary(target, column.saturating_sub(1).min(target.len()));
    let start = floor_char_boundary(target, error_idx.saturating_sub(20));
    let end = ceil_char_boundary(target, (error_idx + 20).min(target.len()));
    let caret = " ".repeat(target[start..error_idx].chars().count()) + "^";

    Some(format!("...{}...\n   {caret}", &target[start..end]))
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
