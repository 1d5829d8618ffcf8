//! Volume files written by FreeSurfer's hippocampal-subfield stream
//!
//! FreeSurfer writes one file per hemisphere and analysis run into the
//! subject's `mri/` directory, e.g. `lh.hippoSfVolumes-T1.v10.txt` or
//! `rh.hippoSfVolumes-T1-T2.v10.txt`. The filename encodes hemisphere,
//! whether the T1 scan was an input, and an optional free-form analysis
//! id; the subject is the name of the grandparent directory. File
//! content is one `<subfield> <volume>` pair per line.

use crate::error::{ParseError, ParseResult};
use crate::pattern::SourcePattern;
use crate::row::{Hemisphere, VolumeRow};
use crate::source::{absolute, filename_str, malformed_filename, read_text, SourceType};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Canonical filename grammar. The hemisphere prefix is mandatory; at
/// least one of the T1 marker and the analysis id must be present.
pub const FILENAME_PATTERN: &str =
    r"^(?P<h>[lr])h\.hippoSfVolumes(?P<T1>-T1)?(-(?P<analysis_id>.+?))?\.v10\.txt$";

pub static FILENAME_MATCHER: LazyLock<SourcePattern> =
    LazyLock::new(|| SourcePattern::new(FILENAME_PATTERN));

/// One FreeSurfer hippocampal-subfield volume file
#[derive(Debug, Clone)]
pub struct FreesurferVolumeFile {
    absolute_path: PathBuf,
    subject: String,
    hemisphere: Hemisphere,
    t1_input: bool,
    analysis_id: Option<String>,
}

impl FreesurferVolumeFile {
    /// Parse filename and path metadata; performs no I/O.
    pub fn new(path: &Path) -> ParseResult<Self> {
        let absolute_path = absolute(path)?;
        let filename = filename_str(&absolute_path)?;
        let captures = FILENAME_MATCHER.extract(filename).ok_or_else(|| {
            malformed_filename(&absolute_path, "does not match the FreeSurfer volume file pattern")
        })?;

        let t1_input = captures.name("T1").is_some();
        let analysis_id = captures.name("analysis_id").map(|m| m.as_str().to_owned());
        if !t1_input && analysis_id.is_none() {
            return Err(malformed_filename(
                &absolute_path,
                "carries neither a T1 marker nor an analysis id",
            ));
        }

        let hemisphere = Hemisphere::from_prefix(&captures["h"]).ok_or_else(|| {
            malformed_filename(&absolute_path, "hemisphere prefix must be 'l' or 'r'")
        })?;
        let subject = subject_dir_name(&absolute_path)?;

        Ok(Self {
            absolute_path,
            subject,
            hemisphere,
            t1_input,
            analysis_id,
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

    pub fn t1_input(&self) -> bool {
        self.t1_input
    }

    pub fn analysis_id(&self) -> Option<&str> {
        self.analysis_id.as_deref()
    }

    /// Read the per-subfield volumes, in file order.
    ///
    /// Each line must split into exactly `<subfield> <volume>` on a single
    /// space; a repeated subfield name is malformed.
    pub fn read_volumes_mm3(&self) -> ParseResult<Vec<(String, f64)>> {
        let content = read_text(&self.absolute_path)?;
        let mut volumes = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, line) in content.trim_end().split('\n').enumerate() {
            let line_number = index + 1;
            let fields: Vec<&str> = line.split(' ').collect();
            let &[subfield_name, volume_str] = fields.as_slice() else {
                return Err(self.malformed_content(
                    line_number,
                    format!("expected 2 space-separated fields, found {}", fields.len()),
                ));
            };
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
                t1_input: Some(self.t1_input),
                analysis_id: self.analysis_id.clone(),
                correction: None,
                source_type: SourceType::FreesurferHipposf,
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

/// Subject id = name of the grandparent directory
/// (`<subject>/mri/<volume file>`).
fn subject_dir_name(absolute_path: &Path) -> ParseResult<String> {
    absolute_path
        .parent()
        .and_then(Path::parent)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| {
            malformed_filename(
                absolute_path,
                "cannot determine subject directory (expected <subject>/mri/<volume file>)",
            )
        })
}
