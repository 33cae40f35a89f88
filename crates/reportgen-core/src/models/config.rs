//! Report kinds and the per-invocation configuration

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Folder holding daily reports
pub const DAILY_DIR: &str = "日报";
/// Folder holding weekly reports
pub const WEEKLY_DIR: &str = "周报";
/// Folder holding monthly reports
pub const MONTHLY_DIR: &str = "月报";
/// Folder holding semester reports
pub const SEMESTER_DIR: &str = "学期报";
/// Folder holding yearly reports
pub const YEARLY_DIR: &str = "年报";

/// Every folder a working directory must contain
pub const WORKING_DIRS: [&str; 5] = [DAILY_DIR, WEEKLY_DIR, MONTHLY_DIR, SEMESTER_DIR, YEARLY_DIR];

/// Kind of report to generate
///
/// Each kind reads the folder one level below it and writes into its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Weekly,
    Monthly,
    Semester,
    Yearly,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::Weekly,
        ReportKind::Monthly,
        ReportKind::Semester,
        ReportKind::Yearly,
    ];

    /// Single-letter CLI code (`w`, `m`, `s`, `y`)
    pub fn code(self) -> char {
        match self {
            ReportKind::Weekly => 'w',
            ReportKind::Monthly => 'm',
            ReportKind::Semester => 's',
            ReportKind::Yearly => 'y',
        }
    }

    /// Folder the source documents are read from
    pub fn source_dir(self) -> &'static str {
        match self {
            ReportKind::Weekly => DAILY_DIR,
            ReportKind::Monthly => WEEKLY_DIR,
            ReportKind::Semester => MONTHLY_DIR,
            ReportKind::Yearly => SEMESTER_DIR,
        }
    }

    /// Folder the generated report is written to
    pub fn target_dir(self) -> &'static str {
        match self {
            ReportKind::Weekly => WEEKLY_DIR,
            ReportKind::Monthly => MONTHLY_DIR,
            ReportKind::Semester => SEMESTER_DIR,
            ReportKind::Yearly => YEARLY_DIR,
        }
    }

    /// Human label used in prompts
    pub fn label(self) -> &'static str {
        match self {
            ReportKind::Weekly => "归纳周报",
            ReportKind::Monthly => "归纳月报",
            ReportKind::Semester => "归纳学期报",
            ReportKind::Yearly => "归纳年报",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target_dir())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "w" | "weekly" => Ok(ReportKind::Weekly),
            "m" | "monthly" => Ok(ReportKind::Monthly),
            "s" | "semester" => Ok(ReportKind::Semester),
            "y" | "yearly" => Ok(ReportKind::Yearly),
            other => Err(CoreError::UnsupportedReportType(other.to_string())),
        }
    }
}

/// Check that `root` contains every report folder
pub fn validate_working_dir(root: &Path) -> Result<(), CoreError> {
    if !root.is_dir() {
        return Err(CoreError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }

    for dir in WORKING_DIRS {
        if !root.join(dir).is_dir() {
            return Err(CoreError::IncompleteWorkingDir {
                path: root.to_path_buf(),
                missing: dir.to_string(),
            });
        }
    }

    Ok(())
}

/// Configuration for one CLI invocation
#[derive(Debug, Clone)]
pub struct Config {
    pub kind: ReportKind,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    /// Period requested on the command line, if any
    pub selected_period: Option<String>,
    /// Use the block-merging formatter for the teaching section
    pub formatting: bool,
}

impl Config {
    /// Build a config rooted at a validated working directory
    pub fn for_working_dir(root: &Path, kind: ReportKind, formatting: bool) -> Result<Self, CoreError> {
        validate_working_dir(root)?;

        Ok(Self {
            kind,
            source_dir: root.join(kind.source_dir()),
            target_dir: root.join(kind.target_dir()),
            selected_period: None,
            formatting,
        })
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.selected_period = Some(period.into());
        self
    }
}
