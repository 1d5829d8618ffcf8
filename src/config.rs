//! Configuration types for hippovol
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//!
//! The `SUBJECTS_DIR` environment fallback (FreeSurfer's convention for
//! the subjects root) is resolved here at the CLI layer and handed to the
//! core as an explicit value; nothing below this module reads the
//! environment.

use crate::error::ConfigError;
use crate::source::{ashs, freesurfer, SourceType};
use clap::Parser;
use regex::Regex;
use std::env;
use std::path::PathBuf;

/// Environment variable supplying the default root directory
pub const SUBJECTS_DIR_ENV: &str = "SUBJECTS_DIR";

/// Collect hippocampal subfield volumes into one CSV table
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hippovol",
    version,
    about = "Collect hippocampal subfield volumes computed by FreeSurfer and ASHS into one CSV table",
    long_about = "Searches the given root directories recursively for the per-hemisphere\n\
                  subfield volume files written by FreeSurfer's hippocampal-subfield stream\n\
                  and by ASHS, parses the measurements together with the metadata encoded\n\
                  in each filename, and prints one unified CSV table on standard output.",
    after_help = "EXAMPLES:\n    \
        hippovol /my/freesurfer/subjects > volumes.csv\n    \
        hippovol --source-types ashs -- /my/ashs/subjects\n    \
        hippovol --source-types freesurfer-hipposf ashs -- /data/study1 /data/study2\n    \
        hippovol --freesurfer-hipposf-filename-regex 'hippoSfVolumes-T1\\.v10' /subjects"
)]
pub struct CliArgs {
    /// Directories to search recursively (default: $SUBJECTS_DIR)
    #[arg(value_name = "ROOT_DIR")]
    pub root_dir_paths: Vec<PathBuf>,

    /// Which segmentation tools to collect volume files of
    #[arg(
        long = "source-types",
        value_enum,
        value_name = "TYPE",
        num_args = 1..,
        default_values_t = vec![SourceType::FreesurferHipposf]
    )]
    pub source_types: Vec<SourceType>,

    /// Override the traversal filter for FreeSurfer volume files; matched
    /// as a substring of each filename, while metadata extraction always
    /// uses the canonical pattern
    #[arg(long, value_name = "REGEX", value_parser = Regex::new)]
    pub freesurfer_hipposf_filename_regex: Option<Regex>,

    /// Override the traversal filter for ASHS volume files
    #[arg(long, value_name = "REGEX", value_parser = Regex::new)]
    pub ashs_filename_regex: Option<Regex>,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT", default_value_t = OutputFormat::Csv)]
    pub output_format: OutputFormat,

    /// Verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format for the unified table
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV on standard output
    Csv,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub root_dir_paths: Vec<PathBuf>,
    pub source_types: Vec<SourceType>,
    pub freesurfer_hipposf_filter: Regex,
    pub ashs_filter: Regex,
    pub output_format: OutputFormat,
}

impl ReaderConfig {
    /// Validate CLI arguments, falling back to `$SUBJECTS_DIR` when no
    /// root directories were given.
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let default_root = env::var_os(SUBJECTS_DIR_ENV).map(PathBuf::from);
        Self::with_default_root(args, default_root)
    }

    /// Like [`ReaderConfig::from_args`] with the environment fallback
    /// passed in explicitly.
    pub fn with_default_root(
        args: CliArgs,
        default_root: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let root_dir_paths = if !args.root_dir_paths.is_empty() {
            args.root_dir_paths
        } else if let Some(root) = default_root {
            vec![root]
        } else {
            return Err(ConfigError::NoRootDirs);
        };

        Ok(Self {
            root_dir_paths,
            source_types: args.source_types,
            freesurfer_hipposf_filter: args
                .freesurfer_hipposf_filename_regex
                .unwrap_or_else(|| freesurfer::FILENAME_MATCHER.filter().clone()),
            ashs_filter: args
                .ashs_filename_regex
                .unwrap_or_else(|| ashs::FILENAME_MATCHER.filter().clone()),
            output_format: args.output_format,
        })
    }

    /// Traversal filter in effect for `source_type`
    pub fn filename_filter(&self, source_type: SourceType) -> &Regex {
        match source_type {
            SourceType::FreesurferHipposf => &self.freesurfer_hipposf_filter,
            SourceType::Ashs => &self.ashs_filter,
        }
    }
}
