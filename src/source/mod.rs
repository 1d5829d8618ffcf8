//! Per-source-type volume file descriptors
//!
//! The two supported segmentation tools share a capability set (locate
//! files, extract filename metadata, read volumes, produce table rows)
//! but differ in filename grammar and line format. `VolumeFile` is the
//! flat enum dispatching between them; the registry of known source
//! types is `SourceType`.

pub mod ashs;
pub mod freesurfer;

pub use ashs::{AshsVolumeFile, IntracranialVolumeFile};
pub use freesurfer::FreesurferVolumeFile;

use crate::error::{ParseError, ParseResult};
use crate::row::VolumeRow;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Which external segmentation tool produced a volume file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize)]
pub enum SourceType {
    /// FreeSurfer's hippocampal-subfield stream
    #[serde(rename = "freesurfer-hipposf")]
    FreesurferHipposf,

    /// The ASHS hippocampal-subfield segmentation tool
    #[serde(rename = "ashs")]
    Ashs,
}

impl SourceType {
    pub const ALL: [SourceType; 2] = [SourceType::FreesurferHipposf, SourceType::Ashs];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::FreesurferHipposf => "freesurfer-hipposf",
            SourceType::Ashs => "ashs",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered volume file: a path coupled with its parsed filename
/// metadata. Construction parses the filename only; volumes are read
/// lazily via [`VolumeFile::read_rows`].
#[derive(Debug, Clone)]
pub enum VolumeFile {
    FreesurferHipposf(FreesurferVolumeFile),
    Ashs(AshsVolumeFile),
}

impl VolumeFile {
    /// Build the descriptor for `source_type` from a matched path.
    ///
    /// Fails with [`ParseError::MalformedFilename`] before any I/O when
    /// the filename does not satisfy the source type's grammar.
    pub fn new(source_type: SourceType, path: &Path) -> ParseResult<Self> {
        match source_type {
            SourceType::FreesurferHipposf => {
                FreesurferVolumeFile::new(path).map(VolumeFile::FreesurferHipposf)
            }
            SourceType::Ashs => AshsVolumeFile::new(path).map(VolumeFile::Ashs),
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            VolumeFile::FreesurferHipposf(_) => SourceType::FreesurferHipposf,
            VolumeFile::Ashs(_) => SourceType::Ashs,
        }
    }

    pub fn absolute_path(&self) -> &Path {
        match self {
            VolumeFile::FreesurferHipposf(file) => file.absolute_path(),
            VolumeFile::Ashs(file) => file.absolute_path(),
        }
    }

    /// Read the file and produce one row per subfield, tagged with the
    /// filename metadata, the source type and the absolute source path.
    pub fn read_rows(&self) -> ParseResult<Vec<VolumeRow>> {
        match self {
            VolumeFile::FreesurferHipposf(file) => file.read_rows(),
            VolumeFile::Ashs(file) => file.read_rows(),
        }
    }
}

/// Read a volume file as text, mapping any I/O failure to
/// [`ParseError::NotFound`].
pub(crate) fn read_text(path: &Path) -> ParseResult<String> {
    std::fs::read_to_string(path).map_err(|source| ParseError::NotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve `path` against the current directory without touching the
/// filesystem. `..` components are kept verbatim, like the discovery
/// walk does.
pub(crate) fn absolute(path: &Path) -> ParseResult<std::path::PathBuf> {
    std::path::absolute(path).map_err(|err| ParseError::MalformedFilename {
        path: path.to_path_buf(),
        reason: format!("cannot resolve absolute path: {err}"),
    })
}

pub(crate) fn filename_str(absolute_path: &Path) -> ParseResult<&str> {
    absolute_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| malformed_filename(absolute_path, "filename is missing or not UTF-8"))
}

pub(crate) fn malformed_filename(path: &Path, reason: &str) -> ParseError {
    ParseError::MalformedFilename {
        path: path.to_path_buf(),
        reason: reason.to_owned(),
    }
}
