//! Volume files written by ASHS
//!
//! ASHS writes per-hemisphere subfield volume files named like
//! `bert_left_heur_volumes.txt` or `bert_right_corr_nogray_volumes.txt`:
//! the filename carries the subject, the spelled-out hemisphere and the
//! segmentation variant (heuristic, or one of two correction modes).
//! Each content line is `<subject> <hemisphere> <subfield> <slices>
//! <volume>`, echoing the filename metadata; any echo mismatch marks the
//! file as malformed.
//!
//! ASHS also writes one intracranial volume file per subject
//! (`<subject>_icv.txt`), handled by [`IntracranialVolumeFile`].

use crate::error::{ParseError, ParseResult};
use crate::pattern::SourcePattern;
use crate::row::{Correction, Hemisphere, VolumeRow};
use crate::source::{absolute, filename_str, malformed_filename, read_text, SourceType};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;
use walkdir::WalkDir;

/// Canonical filename grammar for subfield volume files
pub const FILENAME_PATTERN: &str =
    r"^(?P<s>\w+)_(?P<h>left|right)_(heur|corr_(?P<c>nogray|usegray))_volumes\.txt$";

pub static FILENAME_MATCHER: LazyLock<SourcePattern> =
    LazyLock::new(|| SourcePattern::new(FILENAME_PATTERN));

/// One ASHS hippocampal-subfield volume file
#[derive(Debug, Clone)]
pub struct AshsVolumeFile {
    absolute_path: PathBuf,
    subject: String,
    hemisphere: Hemisphere,
    correction: Option<Correction>,
}

impl AshsVolumeFile {
    /// Parse filename metadata; performs no I/O.
    pub fn new(path: &Path) -> ParseResult<Self> {
        let absolute_path = absolute(path)?;
        let filename = filename_str(&absolute_path)?;
        let captures = FILENAME_MATCHER.extract(filename).ok_or_else(|| {
            malformed_filename(&absolute_path, "does not match the ASHS volume file pattern")
        })?;

        let subject = captures["s"].to_owned();
        let hemisphere = Hemisphere::from_name(&captures["h"]).ok_or_else(|| {
            malformed_filename(&absolute_path, "hemisphere must be 'left' or 'right'")
        })?;
        let correction = match captures.name("c") {
            Some(token) => Some(Correction::from_token(token.as_str()).ok_or_else(|| {
                malformed_filename(&absolute_path, "correction must be 'nogray' or 'usegray'")
            })?),
            None => None,
        };

        Ok(Self {
            absolute_path,
            subject,
            hemisphere,
            correction,
        })
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// `None` means the heuristic segmentation
    pub fn correction(&self) -> Option<Correction> {
        self.correction
    }

    /// Read the per-subfield volumes, in file order.
    ///
    /// Each line must split into exactly
    /// `<subject> <hemisphere> <subfield> <slices> <volume>`; the subject
    /// and hemisphere tokens must echo the filename metadata and the slice
    /// count must be a non-negative integer.
    pub fn read_volumes_mm3(&self) -> ParseResult<Vec<(String, f64)>> {
        let content = read_text(&self.absolute_path)?;
        let mut volumes = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, line) in content.trim_end().split('\n').enumerate() {
            let line_number = index + 1;
            let fields: Vec<&str> = line.split(' ').collect();
            let &[subject, hemisphere, subfield_name, slices_str, volume_str] = fields.as_slice()
            else {
                return Err(self.malformed_content(
                    line_number,
                    format!("expected 5 space-separated fields, found {}", fields.len()),
                ));
            };

            if subject != self.subject {
                return Err(self.malformed_content(
                    line_number,
                    format!(
                        "subject '{subject}' does not match filename subject '{}'",
                        self.subject
                    ),
                ));
            }
            if hemisphere != self.hemisphere.as_str() {
                return Err(self.malformed_content(
                    line_number,
                    format!(
                        "hemisphere '{hemisphere}' does not match filename hemisphere '{}'",
                        self.hemisphere.as_str()
                    ),
                ));
            }

            let slices: i64 = slices_str.parse().map_err(|_| {
                self.malformed_content(line_number, format!("invalid slice count '{slices_str}'"))
            })?;
            if slices < 0 {
                return Err(self
                    .malformed_content(line_number, format!("negative slice count {slices}")));
            }

            let volume_mm3: f64 = volume_str.parse().map_err(|_| {
                self.malformed_content(line_number, format!("invalid volume value '{volume_str}'"))
            })?;
            if !seen.insert(subfield_name) {
                return Err(self.malformed_content(
                    line_number,
                    format!("duplicate subfield name '{subfield_name}'"),
                ));
            }
            volumes.push((subfield_name.to_owned(), volume_mm3));
        }

        Ok(volumes)
    }

    /// One unified-table row per subfield, constant metadata columns.
    pub fn read_rows(&self) -> ParseResult<Vec<VolumeRow>> {
        let rows = self
            .read_volumes_mm3()?
            .into_iter()
            .map(|(subfield, volume_mm3)| VolumeRow {
                subfield,
                volume_mm3,
                subject: self.subject.clone(),
                hemisphere: self.hemisphere,
                t1_input: None,
                analysis_id: None,
                correction: self.correction,
                source_type: SourceType::Ashs,
                source_path: self.absolute_path.display().to_string(),
            })
            .collect();
        Ok(rows)
    }

    fn malformed_content(&self, line: usize, reason: String) -> ParseError {
        ParseError::MalformedContent {
            path: self.absolute_path.clone(),
            line,
            reason,
        }
    }
}

/// Filename grammar for per-subject intracranial volume files
pub const ICV_FILENAME_PATTERN: &str = r"^(?P<s>\w+)_icv\.txt$";

static ICV_FILENAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ICV_FILENAME_PATTERN).expect("invalid ICV filename pattern"));

/// One ASHS intracranial volume file (`<subject>_icv.txt`, content
/// `<subject> <volume>`)
#[derive(Debug, Clone)]
pub struct IntracranialVolumeFile {
    absolute_path: PathBuf,
    subject: String,
}

impl IntracranialVolumeFile {
    pub fn new(path: &Path) -> ParseResult<Self> {
        let absolute_path = absolute(path)?;
        let filename = filename_str(&absolute_path)?;
        let captures = ICV_FILENAME_REGEX.captures(filename).ok_or_else(|| {
            malformed_filename(&absolute_path, "does not match the '<subject>_icv.txt' pattern")
        })?;
        let subject = captures["s"].to_owned();
        Ok(Self {
            absolute_path,
            subject,
        })
    }

    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Read the single intracranial volume, validating the subject echo.
    pub fn read_volume_mm3(&self) -> ParseResult<f64> {
        let content = read_text(&self.absolute_path)?;
        let fields: Vec<&str> = content.trim_end().split(' ').collect();
        let &[subject, volume_str] = fields.as_slice() else {
            return Err(self.malformed_content(format!(
                "expected 2 space-separated fields, found {}",
                fields.len()
            )));
        };
        if subject != self.subject {
            return Err(self.malformed_content(format!(
                "subject '{subject}' does not match filename subject '{}'",
                self.subject
            )));
        }
        volume_str.parse().map_err(|_| {
            self.malformed_content(format!("invalid volume value '{volume_str}'"))
        })
    }

    /// Recursively discover intracranial volume files under `root_dir`.
    ///
    /// Same traversal semantics as the subfield walker: lazy, restartable,
    /// unreadable entries skipped.
    pub fn find(root_dir: &Path) -> impl Iterator<Item = ParseResult<IntracranialVolumeFile>> {
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
            .filter_map(|entry| {
                let filename = entry.file_name().to_str()?;
                if ICV_FILENAME_REGEX.is_match(filename) {
                    Some(IntracranialVolumeFile::new(entry.path()))
                } else {
                    None
                }
            })
    }

    fn malformed_content(&self, reason: String) -> ParseError {
        ParseError::MalformedContent {
            path: self.absolute_path.clone(),
            line: 1,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(path: &str) -> ParseResult<AshsVolumeFile> {
        AshsVolumeFile::new(Path::new(path))
    }

    #[test]
    fn test_parse_filename_heuristic() {
        let file = parse("bert_left_heur_volumes.txt").unwrap();
        assert_eq!(file.subject(), "bert");
        assert_eq!(file.hemisphere(), Hemisphere::Left);
        assert_eq!(file.correction(), None);
    }

    #[test]
    fn test_parse_filename_corrections() {
        let file = parse("bert_right_corr_nogray_volumes.txt").unwrap();
        assert_eq!(file.hemisphere(), Hemisphere::Right);
        assert_eq!(file.correction(), Some(Correction::Nogray));

        let file = parse("alice_left_corr_usegray_volumes.txt").unwrap();
        assert_eq!(file.correction(), Some(Correction::Usegray));
    }

    #[test]
    fn test_parse_filename_long_subject() {
        let file = parse("final/long_subject_name_42_left_heur_volumes.txt").unwrap();
        assert_eq!(file.subject(), "long_subject_name_42");
    }

    #[test]
    fn test_parse_filename_invalid() {
        for path in [
            "bert_center_heur_volumes.txt",
            "bert_left_corr_gray_volumes.txt",
            "bert_left_heur_volumes.csv",
            "bert_left_volumes.txt",
        ] {
            assert!(
                matches!(parse(path), Err(ParseError::MalformedFilename { .. })),
                "{path} should be rejected"
            );
        }
    }

    fn write_file(root: &Path, filename: &str, content: &str) -> PathBuf {
        let final_dir = root.join("bert").join("final");
        fs::create_dir_all(&final_dir).unwrap();
        let path = final_dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_volumes_mm3() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert right CA1 5 12.3\nbert right CA2 4 5.6\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        let volumes = file.read_volumes_mm3().unwrap();
        assert_eq!(
            volumes,
            vec![("CA1".to_owned(), 12.3), ("CA2".to_owned(), 5.6)]
        );
    }

    #[test]
    fn test_read_volumes_subject_mismatch() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert right CA1 5 12.3\nalice right CA2 4 5.6\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        assert!(matches!(
            file.read_volumes_mm3(),
            Err(ParseError::MalformedContent { line: 2, .. })
        ));
    }

    #[test]
    fn test_read_volumes_hemisphere_mismatch() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert left CA1 5 12.3\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        assert!(matches!(
            file.read_volumes_mm3(),
            Err(ParseError::MalformedContent { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_volumes_negative_slice_count() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert right CA1 -1 12.3\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        assert!(matches!(
            file.read_volumes_mm3(),
            Err(ParseError::MalformedContent { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_volumes_non_integer_slice_count() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert right CA1 5.5 12.3\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        assert!(matches!(
            file.read_volumes_mm3(),
            Err(ParseError::MalformedContent { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_volumes_field_count() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert right CA1 12.3\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        assert!(matches!(
            file.read_volumes_mm3(),
            Err(ParseError::MalformedContent { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_rows_metadata_columns() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bert_right_corr_nogray_volumes.txt",
            "bert right CA1 5 12.3\n",
        );
        let file = AshsVolumeFile::new(&path).unwrap();
        let rows = file.read_rows().unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.subfield, "CA1");
        assert_eq!(row.volume_mm3, 12.3);
        assert_eq!(row.subject, "bert");
        assert_eq!(row.hemisphere, Hemisphere::Right);
        assert_eq!(row.t1_input, None);
        assert_eq!(row.analysis_id, None);
        assert_eq!(row.correction, Some(Correction::Nogray));
        assert_eq!(row.source_type, SourceType::Ashs);
        assert_eq!(row.source_path, path.display().to_string());
    }

    #[test]
    fn test_icv_parse_filename() {
        let file = IntracranialVolumeFile::new(Path::new("final/bert_icv.txt")).unwrap();
        assert_eq!(file.subject(), "bert");

        let file =
            IntracranialVolumeFile::new(Path::new("long_subject_name_42_icv.txt")).unwrap();
        assert_eq!(file.subject(), "long_subject_name_42");
    }

    #[test]
    fn test_icv_parse_filename_invalid() {
        for path in ["_icv.txt", "bert_ICV.txt", "bert_icv.csv"] {
            assert!(
                matches!(
                    IntracranialVolumeFile::new(Path::new(path)),
                    Err(ParseError::MalformedFilename { .. })
                ),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_icv_read_volume() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "bert_icv.txt", "bert 1234560\n");
        let file = IntracranialVolumeFile::new(&path).unwrap();
        assert_eq!(file.read_volume_mm3().unwrap(), 1234560.0);
    }

    #[test]
    fn test_icv_read_volume_subject_mismatch() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "bert_icv.txt", "alice 1234560\n");
        let file = IntracranialVolumeFile::new(&path).unwrap();
        assert!(matches!(
            file.read_volume_mm3(),
            Err(ParseError::MalformedContent { .. })
        ));
    }

    #[test]
    fn test_icv_find() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "bert_icv.txt", "bert 1234560\n");
        write_file(dir.path(), "bert_left_heur_volumes.txt", "bert left CA1 5 1.0\n");
        let found: Vec<_> = IntracranialVolumeFile::find(dir.path())
            .collect::<ParseResult<_>>()
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].subject(), "bert");
    }
}
