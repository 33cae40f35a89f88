//! Where source reports come from
//!
//! Generators never walk the filesystem themselves; they ask a
//! [`ReportSource`] for documents. [`FsSource`] reads a folder recursively,
//! [`MemorySource`] serves fixtures.

use crate::error::{CoreError, LoadError, LoadReport};
use crate::models::Report;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Documents returned by a scan plus the files that had to be skipped
#[derive(Debug, Default)]
pub struct SourceScan {
    pub reports: Vec<Report>,
    pub load_report: LoadReport,
}

/// Provider of source documents
pub trait ReportSource {
    /// Load every candidate document
    ///
    /// Unreadable files are skipped and recorded in the load report; only a
    /// missing root is fatal.
    fn scan(&self) -> Result<SourceScan, CoreError>;
}

/// Markdown files below a directory
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// All `.md` files below the root, sorted by file name per directory
    pub fn discover(&self, report: &mut LoadReport) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let err = CoreError::DirectoryScan {
                        path: e.path().unwrap_or(self.root.as_path()).to_path_buf(),
                        source: e,
                    };
                    warn!(error = %err, "Skipping unreadable entry");
                    let entry = LoadError::from_core_error(&err);
                    report.add_warning(entry.source, entry.message);
                    report.files_skipped += 1;
                    continue;
                }
            };

            if entry.file_type().is_file() && is_markdown(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

impl ReportSource for FsSource {
    fn scan(&self) -> Result<SourceScan, CoreError> {
        if !self.root.is_dir() {
            return Err(CoreError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }

        let mut scan = SourceScan::default();
        let files = self.discover(&mut scan.load_report);

        for path in files {
            scan.load_report.files_scanned += 1;
            match fs::read_to_string(&path) {
                Ok(content) => scan.reports.push(Report::new(path, content)),
                Err(source) => {
                    let err = CoreError::FileRead {
                        path: path.clone(),
                        source,
                    };
                    warn!(path = %path.display(), error = %err, "Skipping unreadable report");
                    scan.load_report.add_error(LoadError::from_core_error(&err));
                    scan.load_report.files_skipped += 1;
                }
            }
        }

        debug!(
            root = %self.root.display(),
            loaded = scan.reports.len(),
            skipped = scan.load_report.files_skipped,
            "Source scan complete"
        );

        Ok(scan)
    }
}

/// Fixed set of in-memory documents
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    reports: Vec<Report>,
}

impl MemorySource {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    pub fn with_report(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.reports.push(Report::new(path, content));
        self
    }
}

impl ReportSource for MemorySource {
    fn scan(&self) -> Result<SourceScan, CoreError> {
        let mut load_report = LoadReport::new();
        load_report.files_scanned = self.reports.len();

        Ok(SourceScan {
            reports: self.reports.clone(),
            load_report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorSeverity;
    use tempfile::TempDir;

    #[test]
    fn test_fs_source_reads_markdown_recursively() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("2024-01");
        fs::create_dir_all(&nested).unwrap();

        fs::write(temp.path().join("20240102.md"), "b").unwrap();
        fs::write(nested.join("20240101.MD"), "a").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let scan = FsSource::new(temp.path()).scan().unwrap();
        let names: Vec<_> = scan.reports.iter().map(|r| r.file_name()).collect();

        assert_eq!(names.len(), 2);
        assert!(names.contains(&"20240101.MD".to_string()));
        assert!(names.contains(&"20240102.md".to_string()));
        assert_eq!(scan.load_report.files_scanned, 2);
        assert!(scan.load_report.errors.is_empty());
    }

    #[test]
    fn test_fs_source_skips_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("20240101.md"), "ok").unwrap();
        fs::write(temp.path().join("20240102.md"), [0xffu8, 0xfe, 0x00]).unwrap();

        let scan = FsSource::new(temp.path()).scan().unwrap();
        assert_eq!(scan.reports.len(), 1);
        assert_eq!(scan.load_report.files_skipped, 1);
        assert_eq!(scan.load_report.errors[0].severity, ErrorSeverity::Error);
    }

    #[test]
    fn test_fs_source_missing_root() {
        let temp = TempDir::new().unwrap();
        let err = FsSource::new(temp.path().join("missing")).scan().unwrap_err();
        assert!(matches!(err, CoreError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::default()
            .with_report("20240101.md", "a")
            .with_report("20240102.md", "b");
        let scan = source.scan().unwrap();
        assert_eq!(scan.reports.len(), 2);
        assert_eq!(scan.load_report.files_scanned, 2);
    }
}
