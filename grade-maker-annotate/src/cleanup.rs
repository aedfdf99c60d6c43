//! Removal of previously inserted grader notes.

use std::fs;
use std::path::Path;

use crate::{AnnotateError, GRADER_TOKEN};

/// Strip every grader note from the file, restoring its pre-annotation form.
///
/// Lines that are entirely a grader note are removed; lines carrying a
/// trailing note keep only the text before the marker. Running the cleanup on
/// an already clean file is a no-op, so it can be repeated safely.
///
/// Returns the cleaned content. The file is rewritten only when something was
/// actually stripped.
pub fn cleanup_notes(path: &Path) -> Result<String, AnnotateError> {
    let content = fs::read_to_string(path).map_err(|source| AnnotateError::Read {
        path: path.into(),
        source,
    })?;
    let cleaned = strip_notes(&content);
    if cleaned != content {
        fs::write(path, &cleaned).map_err(|source| AnnotateError::Write {
            path: path.into(),
            source,
        })?;
    }
    Ok(cleaned)
}

fn strip_notes(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        match line.find(GRADER_TOKEN) {
            None => out.push_str(line),
            Some(position) => {
                // a line that is only a grader note disappears entirely
                if line[..position].trim().is_empty() {
                    continue;
                }
                out.push_str(&line[..position]);
                if line.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }
    out
}
