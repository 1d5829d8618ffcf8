//! hippovol - Hippocampal Subfield Volume Collector
//!
//! Locates the per-hemisphere volume files written by FreeSurfer's
//! hippocampal-subfield stream and by ASHS, parses the measurements plus
//! the metadata encoded in each filename, and merges everything into one
//! table with a unified column set, exported as CSV.
//!
//! # Architecture
//!
//! ```text
//! root dirs ──> Walker (walkdir + filter regex)
//!                  │ one descriptor per matched filename
//!                  ▼
//!            VolumeFile (FreeSurfer | ASHS)
//!                  │ lazy read + line validation
//!                  ▼
//!            Vec<VolumeRow> fragments ──> Aggregator ──> CSV on stdout
//! ```
//!
//! Everything is sequential and fail-fast: a single malformed filename or
//! file content aborts the whole run, while "nothing matched at all" is a
//! distinguished condition with its own exit code.
//!
//! # Example
//!
//! ```bash
//! # everything under $SUBJECTS_DIR, FreeSurfer files only (default)
//! hippovol > volumes.csv
//!
//! # both tools, explicit roots
//! hippovol --source-types freesurfer-hipposf ashs -- /data/study1 /data/study2
//! ```
//!
//! Library use mirrors the CLI:
//!
//! ```no_run
//! use hippovol::source::{freesurfer, SourceType};
//! use hippovol::walker::find_volume_files;
//!
//! # fn main() -> Result<(), hippovol::ParseError> {
//! for volume_file in find_volume_files(
//!     SourceType::FreesurferHipposf,
//!     "/my/freesurfer/subjects".as_ref(),
//!     freesurfer::FILENAME_MATCHER.filter(),
//! ) {
//!     for row in volume_file?.read_rows()? {
//!         println!("{} {} {}", row.subject, row.subfield, row.volume_mm3);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod export;
pub mod pattern;
pub mod row;
pub mod source;
pub mod walker;

pub use config::{CliArgs, OutputFormat, ReaderConfig};
pub use error::{ParseError, ReaderError, Result};
pub use row::{Correction, Hemisphere, VolumeRow};
pub use source::{SourceType, VolumeFile};
