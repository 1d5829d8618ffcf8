//! CSV export of the unified table
//!
//! One header row, no index column, absent source-specific values
//! rendered as empty fields. Stdout is the only data channel of a run;
//! diagnostics go to stderr.

use crate::error::Result;
use crate::row::VolumeRow;
use std::io::Write;

/// Serialize `rows` as CSV with a header row.
pub fn write_csv<W: Write>(rows: &[VolumeRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
