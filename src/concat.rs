//! Concatenation stage: join each file group's sources into its destination.

use crate::error::BusterError;
use crate::types::{DestinationPayload, FileGroup};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Host canonical line ending.
#[cfg(windows)]
const LINEFEED: &str = "\r\n";
#[cfg(not(windows))]
const LINEFEED: &str = "\n";

/// Rewrite every line ending in `separator` to the host convention.
///
/// Applied once per run, not per file: the normalized separator is what
/// joins every group's sources.
pub fn normalize_line_endings(separator: &str) -> String {
    let mut out = String::with_capacity(separator.len());
    let mut chars = separator.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(LINEFEED);
            }
            '\n' => out.push_str(LINEFEED),
            other => out.push(other),
        }
    }
    out
}

/// Concatenate one file group and write its destination.
///
/// Missing sources are dropped with a warning, never an error. The
/// destination is written unconditionally, so a group with no surviving
/// sources produces an empty file.
pub fn concatenate(group: &FileGroup, separator: &str) -> Result<DestinationPayload, BusterError> {
    let mut pieces = Vec::with_capacity(group.src.len());
    for source in &group.src {
        if !source.exists() {
            warn!(path = %source.display(), "source file not found, skipping");
            continue;
        }
        let text =
            fs::read_to_string(source).map_err(|e| BusterError::io("read source", source, e))?;
        pieces.push(text);
    }
    let content = pieces.join(separator);

    write_with_parents(&group.dest, &content)?;
    info!(path = %group.dest.display(), "destination file created");

    Ok(DestinationPayload {
        base_path: PathBuf::from("."),
        destination_path: group.dest.clone(),
        content,
    })
}

/// Write `content` to `path`, creating intermediate directories.
pub(crate) fn write_with_parents(path: &Path, content: &str) -> Result<(), BusterError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| BusterError::io("create directory", parent, e))?;
        }
    }
    fs::write(path, content).map_err(|e| BusterError::io("write file", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_plain_text_is_untouched() {
        assert_eq!(normalize_line_endings(";"), ";");
        assert_eq!(normalize_line_endings(""), "");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_normalize_collapses_crlf_and_cr() {
        assert_eq!(normalize_line_endings("\r\n"), "\n");
        assert_eq!(normalize_line_endings("\r"), "\n");
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_concatenate_joins_sources_in_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.js");
        let b = dir.path().join("b.js");
        std::fs::write(&a, "alpha").unwrap();
        std::fs::write(&b, "beta").unwrap();
        let dest = dir.path().join("out/app.js");

        let group = FileGroup {
            src: vec![a, b],
            dest: dest.clone(),
        };
        let payload = concatenate(&group, "\n").unwrap();

        assert_eq!(payload.content, "alpha\nbeta");
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "alpha\nbeta");
        assert_eq!(payload.destination_path, dest);
        assert_eq!(payload.base_path, PathBuf::from("."));
    }

    #[test]
    fn test_missing_source_is_dropped_not_fatal() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.js");
        std::fs::write(&a, "alpha").unwrap();
        let dest = dir.path().join("app.js");

        let group = FileGroup {
            src: vec![a, dir.path().join("missing.js")],
            dest: dest.clone(),
        };
        let payload = concatenate(&group, "\n").unwrap();

        assert_eq!(payload.content, "alpha");
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "alpha");
    }

    #[test]
    fn test_empty_group_writes_empty_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("empty.js");

        let group = FileGroup {
            src: vec![],
            dest: dest.clone(),
        };
        let payload = concatenate(&group, "\n").unwrap();

        assert_eq!(payload.content, "");
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "");
    }
}
