//! Error types for reportgen-core
//!
//! Fatal problems are `CoreError`s. Per-file problems found while scanning a
//! source folder are collected in a `LoadReport` so one bad file never aborts
//! the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for report generation
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // IO Errors
    // ===================
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to scan directory {path}")]
    DirectoryScan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    // ===================
    // Config Errors
    // ===================
    #[error("当前目录不完整，无法归纳总结：{missing} 目录不存在 ({path})")]
    IncompleteWorkingDir { path: PathBuf, missing: String },

    #[error("不支持的报告类型：{0}")]
    UnsupportedReportType(String),

    // ===================
    // Generation Errors
    // ===================
    #[error("未找到 {period} 对应的{kind}源文件")]
    NoReportsForPeriod { kind: String, period: String },

    #[error("未找到可用的时间段: {path}")]
    NoPeriodsAvailable { path: PathBuf },
}

/// Severity level for problems found during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// File skipped, generation continues
    Warning,
    /// Significant but not fatal
    Error,
}

/// Individual entry in a load report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub source: String,
    pub message: String,
    pub severity: ErrorSeverity,
}

impl LoadError {
    pub fn warning(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Warning,
        }
    }

    pub fn error(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
            severity: ErrorSeverity::Error,
        }
    }

    /// Build an entry from a `CoreError`, keeping the path as source
    pub fn from_core_error(error: &CoreError) -> Self {
        let source = match error {
            CoreError::FileRead { path, .. }
            | CoreError::FileWrite { path, .. }
            | CoreError::DirectoryNotFound { path }
            | CoreError::DirectoryScan { path, .. } => path.display().to_string(),
            _ => "reportgen".to_string(),
        };

        Self::error(source, error.to_string())
    }
}

/// Report of problems encountered while loading source documents
///
/// Tracks partial failures instead of failing on the first unreadable file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub errors: Vec<LoadError>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: LoadError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, source: impl Into<String>, message: impl Into<String>) {
        self.errors.push(LoadError::warning(source, message));
    }
}
