//! Recursive discovery of volume files
//!
//! Walks one root directory, applies a filter regex to every filename
//! encountered (substring search, so user overrides can be loose), and
//! constructs one descriptor per match. The walk is lazy and restartable:
//! calling [`find_volume_files`] again re-enumerates from scratch.
//!
//! Traversal order is not guaranteed and must not be relied upon.
//! A missing or unreadable root yields an empty sequence, not an error;
//! "nothing found anywhere" is detected by the aggregator instead.

use crate::error::ParseResult;
use crate::source::{SourceType, VolumeFile};
use regex::Regex;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Enumerate volume files of `source_type` under `root_dir`.
///
/// `filename_filter` only decides which files are visited; metadata
/// extraction always uses the source type's canonical pattern, so a
/// filter that matches a file the canonical pattern rejects surfaces as
/// a [`crate::error::ParseError::MalformedFilename`] item.
pub fn find_volume_files<'a>(
    source_type: SourceType,
    root_dir: &Path,
    filename_filter: &'a Regex,
) -> impl Iterator<Item = ParseResult<VolumeFile>> + 'a {
    WalkDir::new(root_dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(move |entry| {
            let filename = match entry.file_name().to_str() {
                Some(filename) => filename,
                None => {
                    debug!("skipping non-UTF-8 filename: {:?}", entry.file_name());
                    return None;
                }
            };
            if !filename_filter.is_match(filename) {
                return None;
            }
            debug!(path = %entry.path().display(), %source_type, "matched volume file");
            Some(VolumeFile::new(source_type, entry.path()))
        })
}
