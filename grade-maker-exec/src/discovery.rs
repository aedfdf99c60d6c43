//! Discovery of the submissions to grade.

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::ExecError;

/// Submission id used when the file name does not follow the LMS convention.
pub const UNKNOWN_SUBMISSION_ID: &str = "UNKNOWN_SUBMISSION_ID";

lazy_static! {
    // the LMS exports the files as <name>_WorkCode_<id>.py
    static ref WORK_CODE: Regex = Regex::new(r"WorkCode_([^.]+)").unwrap();
}

/// The Python files directly inside `folder`, sorted by name.
///
/// The extension match is case-insensitive since the LMS is happy to export
/// `.PY` files. Subdirectories are not searched: each submission folder is
/// flat.
pub fn list_submissions(folder: &Path) -> Result<Vec<PathBuf>, ExecError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|error| ExecError::Io {
            path: folder.into(),
            source: error.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_python = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("py"));
        if is_python {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// The submission id encoded in the file name.
///
/// The LMS names the exported files `…WorkCode_<id>.py`; everything between
/// `WorkCode_` and the extension is the id. Files named differently get
/// [`UNKNOWN_SUBMISSION_ID`].
pub fn submission_id(file: &Path) -> String {
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match WORK_CODE.captures(&name) {
        Some(capture) => capture[1].to_owned(),
        None => UNKNOWN_SUBMISSION_ID.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn only_python_files_are_listed_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("b.py"), "").unwrap();
        fs::write(dir.path().join("a.PY"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.py"), "").unwrap();

        let files = list_submissions(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.PY", "b.py"]);
    }

    #[test]
    fn work_code_ids_are_parsed() {
        assert_eq!(
            submission_id(Path::new("ID_212410104_WorkCode_533293.PY")),
            "533293"
        );
        assert_eq!(
            submission_id(Path::new("dir/some_WorkCode_42.py")),
            "42"
        );
        assert_eq!(
            submission_id(Path::new("solution.py")),
            UNKNOWN_SUBMISSION_ID
        );
    }
}
