//! Directory-level aggregation.
//!
//! Every `*.xml` file directly inside the input directory is parsed in
//! file-name order and its rows are appended to one [`Table`]. Each file
//! yields a [`FileReport`]; the [`ErrorPolicy`] decides whether a failed
//! file aborts the batch or is recorded and skipped.
//!
//! ## Example
//!
//! ```ignore
//! use stepstats_core::{BatchOptions, ErrorPolicy, parse_folder};
//!
//! let options = BatchOptions::builder()
//!     .error_policy(ErrorPolicy::Continue)
//!     .build();
//! let report = parse_folder("stats", &options, |path| {
//!     eprintln!("Parsing {}", path.display());
//! })?;
//! println!("{} rows", report.table.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use strum::{Display, EnumString, IntoStaticStr};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::extract::parse_file;
use crate::row::Row;
use crate::table::Table;

/// File extension matched in the input directory
pub const XML_EXTENSION: &str = "xml";

/// What to do when one input file cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Abort the whole batch on the first failed file
    #[default]
    FailFast,
    /// Record the failure and keep going with the next file
    Continue,
}

/// Options for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub error_policy: ErrorPolicy,
}

impl BatchOptions {
    /// Create a new options builder
    pub fn builder() -> BatchOptionsBuilder {
        BatchOptionsBuilder::default()
    }
}

/// Builder for BatchOptions
#[derive(Debug, Clone, Default)]
pub struct BatchOptionsBuilder {
    error_policy: Option<ErrorPolicy>,
}

impl BatchOptionsBuilder {
    /// Set the per-file error policy
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    /// Shorthand for [`ErrorPolicy::Continue`] when `enabled`
    pub fn keep_going(self, enabled: bool) -> Self {
        self.error_policy(if enabled {
            ErrorPolicy::Continue
        } else {
            ErrorPolicy::FailFast
        })
    }

    /// Build the options
    pub fn build(self) -> BatchOptions {
        let default = BatchOptions::default();
        BatchOptions {
            error_policy: self.error_policy.unwrap_or(default.error_policy),
        }
    }
}

/// Result of processing one input file
#[derive(Debug)]
pub enum FileOutcome {
    Parsed(Vec<Row>),
    Failed(Error),
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.outcome {
            FileOutcome::Failed(e) => Some(e),
            FileOutcome::Parsed(_) => None,
        }
    }
}

/// Outcome of a whole batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub table: Table,
    /// Per-file summary in processing order; parsed rows live in `table`
    pub files: Vec<FileSummary>,
}

/// One processed file as recorded in a [`BatchReport`]
#[derive(Debug)]
pub struct FileSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub error: Option<Error>,
}

impl BatchReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileSummary> {
        self.files.iter().filter(|f| f.error.is_some())
    }

    pub fn parsed_count(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_none()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// List `*.xml` files directly inside `dir`, sorted by file name
pub fn collect_xml_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Err(Error::InputDirNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext == XML_EXTENSION);
        if is_xml && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Found {} XML files in {}", files.len(), dir.display());
    Ok(files)
}

/// Parse one file into a report, never failing
pub fn process_file<P: AsRef<Path>>(path: P) -> FileReport {
    let path = path.as_ref().to_path_buf();
    let outcome = match parse_file(&path) {
        Ok(rows) => FileOutcome::Parsed(rows),
        Err(e) => FileOutcome::Failed(e),
    };
    FileReport { path, outcome }
}

/// Parse every XML file in `dir` into one table.
///
/// `on_file` is called with each path right before it is parsed.
pub fn parse_folder<P, F>(dir: P, options: &BatchOptions, mut on_file: F) -> Result<BatchReport>
where
    P: AsRef<Path>,
    F: FnMut(&Path),
{
    let files = collect_xml_files(&dir)?;
    let mut report = BatchReport::default();

    for path in files {
        on_file(&path);

        let FileReport { path, outcome } = process_file(path);
        match outcome {
            FileOutcome::Parsed(rows) => {
                report.files.push(FileSummary {
                    path,
                    rows: rows.len(),
                    error: None,
                });
                report.table.extend(rows);
            }
            FileOutcome::Failed(e) => match options.error_policy {
                ErrorPolicy::FailFast => return Err(e),
                ErrorPolicy::Continue => {
                    warn!("Skipping {}: {}", display_name(&path), e);
                    report.files.push(FileSummary {
                        path,
                        rows: 0,
                        error: Some(e),
                    });
                }
            },
        }
    }

    info!(
        "Parsed {} files ({} failed): {} rows, {} columns",
        report.parsed_count(),
        report.failed_count(),
        report.table.len(),
        report.table.columns().len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn stats(high_score: &str) -> String {
        format!(
            "<Stats><HighScoreForASongAndSteps><HighScore>{}</HighScore>\
             </HighScoreForASongAndSteps></Stats>",
            high_score
        )
    }

    #[test]
    fn test_collect_xml_files_sorted_non_recursive() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.xml", "<Stats/>");
        write(&dir, "a.xml", "<Stats/>");
        write(&dir, "notes.txt", "ignored");
        write(&dir, "c.XML", "<Stats/>");
        fs::create_dir(dir.path().join("nested.xml")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("d.xml"), "<Stats/>").unwrap();

        let files = collect_xml_files(dir.path()).unwrap();
        let names: Vec<String> = files.iter().map(|p| display_name(p)).collect();
        assert_eq!(names, vec!["a.xml", "b.xml"]);
    }

    #[test]
    fn test_collect_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = collect_xml_files(dir.path().join("missing")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_collect_file_instead_of_dir() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "Stats.xml", &stats("<Score>1</Score>"));
        let err = collect_xml_files(&file).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(ref p) if *p == file));
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_parse_folder_disjoint_columns() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1.xml", &stats("<A>1</A><B>2</B>"));
        write(&dir, "2.xml", &stats("<C>3</C><D>4</D>"));

        let mut seen = Vec::new();
        let report = parse_folder(dir.path(), &BatchOptions::default(), |p| {
            seen.push(display_name(p))
        })
        .unwrap();

        assert_eq!(seen, vec!["1.xml", "2.xml"]);
        let table = &report.table;
        assert_eq!(
            table.columns(),
            &["song_dir", "difficulty", "steps_type", "a", "b", "c", "d"]
        );
        assert_eq!(table.cell(0, "c"), &Value::Null);
        assert_eq!(table.cell(1, "a"), &Value::Null);
        assert_eq!(table.cell(1, "d"), &Value::Int(4));
        assert_eq!(report.parsed_count(), 2);
    }

    #[test]
    fn test_fail_fast_aborts() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1.xml", &stats("<Score>1</Score>"));
        write(&dir, "2.xml", "<Stats><Broken>");
        write(&dir, "3.xml", &stats("<Score>3</Score>"));

        let mut seen = 0;
        let err = parse_folder(dir.path(), &BatchOptions::default(), |_| seen += 1).unwrap_err();
        assert!(err.is_malformed_document());
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_continue_records_failure() {
        let dir = TempDir::new().unwrap();
        write(&dir, "1.xml", &stats("<Score>1</Score>"));
        write(&dir, "2.xml", "<Stats><Broken>");
        write(&dir, "3.xml", &stats("<Score>3</Score>"));

        let options = BatchOptions::builder().keep_going(true).build();
        let report = parse_folder(dir.path(), &options, |_| {}).unwrap();

        assert_eq!(report.table.len(), 2);
        assert_eq!(report.parsed_count(), 2);
        let failed: Vec<&FileSummary> = report.failures().collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].path.ends_with("2.xml"));
    }

    #[test]
    fn test_process_file() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.xml", &stats("<Score>1</Score>"));
        let bad = write(&dir, "bad.xml", "not xml");

        let report = process_file(&good);
        assert!(!report.is_failed());
        assert_eq!(report.file_name(), "good.xml");

        let report = process_file(&bad);
        assert!(report.is_failed());
        assert!(report.error().is_some_and(Error::is_malformed_document));
    }

    #[test]
    fn test_error_policy_from_str() {
        assert_eq!("fail-fast".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::FailFast);
        assert_eq!("continue".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Continue);
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::FailFast);
    }
}
