//! Unified tabular record for subfield volume measurements
//!
//! Both source types produce rows of the same struct; columns that only
//! one source type knows about (`T1_input`/`analysis_id` vs `correction`)
//! are `Option`s and serialize as empty CSV fields for the other type.

use crate::source::SourceType;
use serde::Serialize;

/// Brain hemisphere; always present in a volume filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    /// Map FreeSurfer's one-letter filename prefix (`l`/`r`)
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "l" => Some(Hemisphere::Left),
            "r" => Some(Hemisphere::Right),
            _ => None,
        }
    }

    /// Map ASHS's spelled-out filename token (`left`/`right`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Hemisphere::Left),
            "right" => Some(Hemisphere::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::Left => "left",
            Hemisphere::Right => "right",
        }
    }
}

/// ASHS post-processing mode; absent means the heuristic segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Correction {
    Nogray,
    Usegray,
}

impl Correction {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "nogray" => Some(Correction::Nogray),
            "usegray" => Some(Correction::Usegray),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Correction::Nogray => "nogray",
            Correction::Usegray => "usegray",
        }
    }
}

/// One row of the unified table: a single subfield measurement plus the
/// metadata of the file it came from.
///
/// Field order defines the CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeRow {
    /// Anatomical sub-region name, e.g. `CA1`
    pub subfield: String,

    /// Measured volume in cubic millimeters
    pub volume_mm3: f64,

    /// Subject identifier
    pub subject: String,

    pub hemisphere: Hemisphere,

    /// FreeSurfer only: whether the T1 scan was an input to the analysis
    #[serde(rename = "T1_input")]
    pub t1_input: Option<bool>,

    /// FreeSurfer only: free-form tag of the analysis run, if any
    pub analysis_id: Option<String>,

    /// ASHS only: correction variant, absent for heuristic segmentations
    pub correction: Option<Correction>,

    /// Which segmentation tool produced the file
    pub source_type: SourceType,

    /// Absolute path of the file this row was read from
    pub source_path: String,
}
