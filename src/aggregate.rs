//! Aggregation of per-file fragments into the unified table
//!
//! Runs the walker for every requested source type over every root
//! directory, reads each discovered file and appends its rows. Rows keep
//! the union of all columns; nothing is deduplicated, so overlapping
//! roots yield duplicate rows. Row order follows discovery order and is
//! not guaranteed; callers needing determinism sort on
//! `(subject, hemisphere, subfield)`.

use crate::config::ReaderConfig;
use crate::error::{ReaderError, Result};
use crate::row::VolumeRow;
use crate::walker;
use tracing::{debug, info};

/// Collect all subfield volume rows for `config`.
///
/// Returns [`ReaderError::NoInputFound`] when zero files matched across
/// all requested source types and root directories; any malformed file
/// aborts the collection immediately.
pub fn collect_volume_rows(config: &ReaderConfig) -> Result<Vec<VolumeRow>> {
    let mut rows = Vec::new();
    let mut file_count = 0usize;

    for &source_type in &config.source_types {
        let filter = config.filename_filter(source_type);
        for root_dir in &config.root_dir_paths {
            debug!(root = %root_dir.display(), %source_type, "searching for volume files");
            for volume_file in walker::find_volume_files(source_type, root_dir, filter) {
                let volume_file = volume_file?;
                file_count += 1;
                rows.extend(volume_file.read_rows()?);
            }
        }
    }

    if file_count == 0 {
        return Err(ReaderError::NoInputFound);
    }
    info!(files = file_count, rows = rows.len(), "collected subfield volumes");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::ParseError;
    use crate::row::{Correction, Hemisphere};
    use crate::source::{ashs, freesurfer, SourceType};
    use regex::Regex;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_for(root: &Path, source_types: Vec<SourceType>) -> ReaderConfig {
        ReaderConfig {
            root_dir_paths: vec![root.to_path_buf()],
            source_types,
            freesurfer_hipposf_filter: freesurfer::FILENAME_MATCHER.filter().clone(),
            ashs_filter: ashs::FILENAME_MATCHER.filter().clone(),
            output_format: OutputFormat::Csv,
        }
    }

    fn write_file(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
    }

    #[test]
    fn test_no_input_found() {
        let dir = tempdir().unwrap();
        let config = config_for(dir.path(), vec![SourceType::FreesurferHipposf]);
        assert!(matches!(
            collect_volume_rows(&config),
            Err(ReaderError::NoInputFound)
        ));
    }

    #[test]
    fn test_no_input_found_with_all_source_types() {
        let dir = tempdir().unwrap();
        let config = config_for(dir.path(), SourceType::ALL.to_vec());
        assert!(matches!(
            collect_volume_rows(&config),
            Err(ReaderError::NoInputFound)
        ));
    }

    #[test]
    fn test_column_union_across_source_types() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "bert/mri/lh.hippoSfVolumes-T1.v10.txt",
            "CA1 34.5\nSUB 100.0\n",
        );
        write_file(
            dir.path(),
            "bert/final/bert_right_corr_nogray_volumes.txt",
            "bert right CA1 5 12.3\n",
        );

        let config = config_for(dir.path(), SourceType::ALL.to_vec());
        let rows = collect_volume_rows(&config).unwrap();
        assert_eq!(rows.len(), 3);

        for row in &rows {
            match row.source_type {
                SourceType::FreesurferHipposf => {
                    assert_eq!(row.t1_input, Some(true));
                    assert_eq!(row.correction, None);
                    assert_eq!(row.hemisphere, Hemisphere::Left);
                }
                SourceType::Ashs => {
                    assert_eq!(row.t1_input, None);
                    assert_eq!(row.analysis_id, None);
                    assert_eq!(row.correction, Some(Correction::Nogray));
                    assert_eq!(row.hemisphere, Hemisphere::Right);
                }
            }
        }
    }

    #[test]
    fn test_only_requested_source_types() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "bert/mri/lh.hippoSfVolumes-T1.v10.txt",
            "CA1 34.5\n",
        );
        write_file(
            dir.path(),
            "bert/final/bert_left_heur_volumes.txt",
            "bert left CA1 5 12.3\n",
        );

        let config = config_for(dir.path(), vec![SourceType::Ashs]);
        let rows = collect_volume_rows(&config).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source_type, SourceType::Ashs);
        assert_eq!(rows[0].correction, None);
    }

    #[test]
    fn test_filter_override_narrows_traversal() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "bert/mri/lh.hippoSfVolumes-T1.v10.txt",
            "CA1 34.5\n",
        );
        write_file(
            dir.path(),
            "bert/mri/lh.hippoSfVolumes-T1-T2.v10.txt",
            "CA1 36.5\n",
        );

        let mut config = config_for(dir.path(), vec![SourceType::FreesurferHipposf]);
        config.freesurfer_hipposf_filter = Regex::new(r"-T1-T2\.v10\.txt$").unwrap();
        let rows = collect_volume_rows(&config).unwrap();
        assert_eq!(rows.len(), 1);
        // extraction still uses the canonical pattern
        assert_eq!(rows[0].analysis_id.as_deref(), Some("T2"));
        assert_eq!(rows[0].t1_input, Some(true));
    }

    #[test]
    fn test_overlapping_roots_duplicate_rows() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "bert/mri/lh.hippoSfVolumes-T1.v10.txt",
            "CA1 34.5\n",
        );
        let mut config = config_for(dir.path(), vec![SourceType::FreesurferHipposf]);
        config.root_dir_paths.push(dir.path().join("bert"));
        let rows = collect_volume_rows(&config).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], rows[1]);
    }

    #[test]
    fn test_malformed_file_aborts() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "bert/mri/lh.hippoSfVolumes-T1.v10.txt",
            "CA1 notanumber\n",
        );
        let config = config_for(dir.path(), vec![SourceType::FreesurferHipposf]);
        assert!(matches!(
            collect_volume_rows(&config),
            Err(ReaderError::Parse(ParseError::MalformedContent { .. }))
        ));
    }
}
