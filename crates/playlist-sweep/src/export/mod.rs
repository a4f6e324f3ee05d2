//! Export of a collected set to JSON, CSV and XLSX.
//!
//! All formats share one timestamped base name so the files of a run sort
//! together. The writers are independent and run concurrently on blocking
//! threads; one failing format never stops the others.

pub mod csv_writer;
pub mod json_writer;
pub mod xlsx_writer;

use crate::collect::{CollectedSet, Item};
use crate::error::ExportError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Column order shared by the tabular formats.
pub const COLUMNS: [&str; 7] = ["title", "age", "views", "thumbnail", "link", "id", "toggle"];

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A format that could not be written.
#[derive(Debug)]
pub struct FormatFailure {
    pub format: ExportFormat,
    pub error: ExportError,
}

/// Files written by one export.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub base_name: String,
    pub written: Vec<PathBuf>,
    pub failures: Vec<FormatFailure>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of an export call.
#[derive(Debug)]
pub enum ExportOutcome {
    /// Nothing was collected, so nothing was written.
    Skipped,
    Written(ExportReport),
}

/// `playlist_data_<YYYYmmdd_HHMMSS>` for the current local time.
pub fn timestamped_base_name() -> String {
    format!(
        "playlist_data_{}",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

/// Export `collected` into `output_dir` using a fresh timestamped base name.
pub async fn export(collected: &CollectedSet, output_dir: &Path) -> ExportOutcome {
    export_with_base(collected, output_dir, &timestamped_base_name()).await
}

/// Export `collected` into `output_dir` as `<base_name>.{json,csv,xlsx}`.
pub async fn export_with_base(
    collected: &CollectedSet,
    output_dir: &Path,
    base_name: &str,
) -> ExportOutcome {
    if collected.is_empty() {
        warn!("no videos to save");
        return ExportOutcome::Skipped;
    }

    let mut report = ExportReport {
        base_name: base_name.to_string(),
        ..ExportReport::default()
    };

    if let Err(source) = tokio::fs::create_dir_all(output_dir).await {
        error!("cannot create output directory {}: {source}", output_dir.display());
        let path = output_dir.to_path_buf();
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Xlsx] {
            report.failures.push(FormatFailure {
                format,
                error: ExportError::Io {
                    path: path.clone(),
                    source: std::io::Error::new(source.kind(), source.to_string()),
                },
            });
        }
        return ExportOutcome::Written(report);
    }

    let items: Arc<[Item]> = collected.items().into();
    let writer = |format: ExportFormat, write: WriteFn| {
        let path = output_dir.join(format!("{base_name}.{}", format.extension()));
        run_writer(format, path, Arc::clone(&items), write)
    };

    let (json, csv, xlsx) = tokio::join!(
        writer(ExportFormat::Json, json_writer::write),
        writer(ExportFormat::Csv, csv_writer::write),
        writer(ExportFormat::Xlsx, xlsx_writer::write),
    );

    for (format, result) in [json, csv, xlsx] {
        match result {
            Ok(path) => report.written.push(path),
            Err(error) => {
                error!(%format, "export failed: {error}");
                report.failures.push(FormatFailure { format, error });
            }
        }
    }

    info!(
        base = %report.base_name,
        records = items.len(),
        written = report.written.len(),
        failed = report.failures.len(),
        "export finished"
    );
    ExportOutcome::Written(report)
}

type WriteFn = fn(&Path, &[Item]) -> Result<(), ExportError>;

async fn run_writer(
    format: ExportFormat,
    path: PathBuf,
    items: Arc<[Item]>,
    write: WriteFn,
) -> (ExportFormat, Result<PathBuf, ExportError>) {
    let result = tokio::task::spawn_blocking(move || write(&path, &items).map(|()| path))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))
        .and_then(|r| r);
    (format, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::RawItem;

    pub(crate) fn sample_set(n: usize) -> CollectedSet {
        let mut set = CollectedSet::new();
        set.ingest((0..n).map(|i| RawItem {
            title: format!("Video {i}"),
            metric_text: format!("{i}K views"),
            age_text: format!("{i} days ago"),
            link: format!("https://www.youtube.com/watch?v=ID{i}&list=PL"),
            thumbnail_url: format!("https://i.ytimg.com/vi/ID{i}/hq.jpg"),
        }));
        set
    }

    #[test]
    fn test_base_name_shape() {
        let name = timestamped_base_name();
        let stamp = name.strip_prefix("playlist_data_").unwrap();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_empty_set_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = export(&CollectedSet::new(), dir.path()).await;
        assert!(matches!(outcome, ExportOutcome::Skipped));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_writes_all_three_formats() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/output");
        let outcome = export_with_base(&sample_set(3), &out, "playlist_data_20240101_000000").await;

        let ExportOutcome::Written(report) = outcome else {
            panic!("expected files to be written");
        };
        assert!(report.is_complete());
        assert_eq!(report.written.len(), 3);
        for ext in ["json", "csv", "xlsx"] {
            assert!(out.join(format!("playlist_data_20240101_000000.{ext}")).is_file());
        }
    }

    #[tokio::test]
    async fn test_one_failing_format_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the CSV path makes only that writer fail.
        std::fs::create_dir(dir.path().join("run.csv")).unwrap();

        let outcome = export_with_base(&sample_set(2), dir.path(), "run").await;
        let ExportOutcome::Written(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].format, ExportFormat::Csv);
        assert_eq!(report.written.len(), 2);
        assert!(dir.path().join("run.json").is_file());
        assert!(dir.path().join("run.xlsx").is_file());
    }
}
