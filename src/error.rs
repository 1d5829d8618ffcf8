//! Error types for hippovol
//!
//! This module defines the error hierarchy covering:
//! - Malformed volume filenames and file contents
//! - Missing or unreadable input files
//! - Configuration and CLI errors
//! - The distinguished "no input found" condition
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Fail fast: a malformed volume file aborts the whole run instead of
//!   being skipped, since silently dropping measurements is worse than
//!   aborting
//! - Errors name the offending path so the user can fix the input

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the hippovol application
#[derive(Error, Debug)]
pub enum ReaderError {
    /// A volume filename or its content did not match the expected grammar
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// CSV export errors
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O errors (writing to stdout, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Zero volume files matched across all requested source types and
    /// root directories. Not a failure of any single file; mapped to its
    /// own exit code so batch callers can tell "empty input" from "crashed".
    #[error("did not find any volume files matching the specified criteria")]
    NoInputFound,
}

/// Errors while parsing a single volume file or its filename.
///
/// Always fatal for the whole run; no component downgrades these to a
/// skip-and-continue.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Referenced path does not exist or is unreadable at read time
    #[error("volume file not found or unreadable '{}': {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filename does not match the canonical extraction pattern, or matches
    /// but lacks a semantically required field
    #[error("malformed volume filename '{}': {reason}", path.display())]
    MalformedFilename { path: PathBuf, reason: String },

    /// A line's field count, numeric parse or cross-field consistency
    /// check failed during read
    #[error("malformed volume file '{}', line {line}: {reason}", path.display())]
    MalformedContent {
        path: PathBuf,
        line: usize,
        reason: String,
    },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No root directories on the command line and no environment default
    #[error("no root directories given and SUBJECTS_DIR is not set")]
    NoRootDirs,
}

/// Result type alias for ReaderError
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Result type alias for ParseError
pub type ParseResult<T> = std::result::Result<T, ParseError>;
