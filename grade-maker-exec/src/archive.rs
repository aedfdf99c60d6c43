//! Extraction of the submission archives exported by the LMS.

use std::fs::{self, File};
use std::path::Path;

use log::info;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::ExecError;

/// Extract every zip archive in `directory` into a sibling directory named
/// after the archive stem.
///
/// Extraction overwrites, so re-running on the same directory is harmless.
/// With `remove_archives` the archive is deleted once extracted. Returns the
/// number of extracted archives.
pub fn unpack_all(directory: &Path, remove_archives: bool) -> Result<usize, ExecError> {
    let mut unpacked = 0;
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|error| ExecError::Io {
            path: directory.into(),
            source: error.into(),
        })?;
        let path = entry.path();
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if !entry.file_type().is_file() || !is_zip {
            continue;
        }

        let target = path.with_extension("");
        let file = File::open(path).map_err(|source| ExecError::Io {
            path: path.into(),
            source,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|source| ExecError::Archive {
            path: path.into(),
            source,
        })?;
        archive
            .extract(&target)
            .map_err(|source| ExecError::Archive {
                path: path.into(),
                source,
            })?;
        info!("extracted {} into {}", path.display(), target.display());
        if remove_archives {
            fs::remove_file(path).map_err(|source| ExecError::Io {
                path: path.into(),
                source,
            })?;
        }
        unpacked += 1;
    }
    Ok(unpacked)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn make_archive(path: &Path) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        writer.start_file("solution.py", options).unwrap();
        writer.write_all(b"x = 1\n").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn archives_are_extracted_into_their_stem() {
        let dir = tempfile::TempDir::new().unwrap();
        make_archive(&dir.path().join("WorkCode_42.zip"));

        let unpacked = unpack_all(dir.path(), false).unwrap();
        assert_eq!(unpacked, 1);
        let extracted = dir.path().join("WorkCode_42").join("solution.py");
        assert_eq!(fs::read_to_string(extracted).unwrap(), "x = 1\n");
        assert!(dir.path().join("WorkCode_42.zip").exists());
    }

    #[test]
    fn archives_can_be_removed_after_extraction() {
        let dir = tempfile::TempDir::new().unwrap();
        make_archive(&dir.path().join("WorkCode_43.zip"));

        unpack_all(dir.path(), true).unwrap();
        assert!(dir.path().join("WorkCode_43").join("solution.py").exists());
        assert!(!dir.path().join("WorkCode_43.zip").exists());
    }

    #[test]
    fn directories_without_archives_are_a_no_op() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("solution.py"), "x = 1\n").unwrap();
        assert_eq!(unpack_all(dir.path(), false).unwrap(), 0);
    }
}
