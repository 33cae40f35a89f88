//! Rendering and writing merged reports
//!
//! A merged report is a front matter block with the counters, one backlink
//! per contributing source, then the formatted sections.

use crate::error::CoreError;
use crate::generator::GeneratedReport;
use crate::models::stats::{DORM_CHECK_KEY, EXAM_PROCTOR_KEY, LISTENING_KEY, WEEK_KEY};
use crate::models::{FrontMatterStats, ReportKind};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Front matter block, delimiters included
///
/// Values are always quoted. `周` is only written for weekly reports.
pub fn render_front_matter(kind: ReportKind, period: &str, stats: &FrontMatterStats) -> String {
    let mut out = String::from("---\n");
    if kind == ReportKind::Weekly {
        out.push_str(&format!("{}: \"{}\"\n", WEEK_KEY, escape_quoted(period)));
    }
    out.push_str(&format!("{}: \"{}\"\n", LISTENING_KEY, stats.listening));
    out.push_str(&format!("{}: \"{}\"\n", DORM_CHECK_KEY, stats.dorm_checks));
    out.push_str(&format!("{}: \"{}\"\n", EXAM_PROCTOR_KEY, stats.exam_proctoring));
    out.push_str("---\n");
    out
}

/// Escape a value for a YAML double-quoted scalar
fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `[[stem]]` backlinks separated by blank lines
pub fn render_links(stems: &[String]) -> String {
    stems.iter().map(|s| format!("[[{}]]\n\n", s)).collect()
}

/// `## name` sections in the given order
pub fn render_body(sections: &[(String, String)]) -> String {
    sections
        .iter()
        .map(|(name, content)| format!("## {}\n\n{}\n", name, content.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Complete document text
pub fn render_report(
    kind: ReportKind,
    period: &str,
    stats: &FrontMatterStats,
    stems: &[String],
    body: &str,
) -> String {
    format!(
        "{}\n{}{}",
        render_front_matter(kind, period, stats),
        render_links(stems),
        body
    )
}

/// Output file name for a period
///
/// - weekly: `<first source> - <last source>.md`
/// - monthly: `<YYYYMM>.md`
/// - semester: `<period>流水账.md`
/// - yearly: `<Y> - <Y+1> 学年.md`
pub fn output_file_name(kind: ReportKind, period: &str, stems: &[String]) -> String {
    match kind {
        ReportKind::Weekly => match (stems.first(), stems.last()) {
            (Some(first), Some(last)) => format!("{} - {}.md", first, last),
            _ => format!("{}.md", period),
        },
        ReportKind::Monthly => format!("{}.md", period),
        ReportKind::Semester => format!("{}流水账.md", period),
        ReportKind::Yearly => match period.trim().parse::<i32>() {
            Ok(year) => format!("{} - {} 学年.md", year, year + 1),
            Err(_) => format!("{} 学年.md", period.trim()),
        },
    }
}

/// Write a generated report into `target_dir`
///
/// The directory is created when missing and an existing file is
/// overwritten.
///
/// # Errors
/// Returns `CoreError::FileWrite` if the directory or file cannot be written
pub fn write_report(target_dir: &Path, report: &GeneratedReport) -> Result<PathBuf, CoreError> {
    fs::create_dir_all(target_dir).map_err(|source| CoreError::FileWrite {
        path: target_dir.to_path_buf(),
        source,
    })?;

    let path = target_dir.join(&report.file_name);
    let write_err = |source| CoreError::FileWrite {
        path: path.clone(),
        source,
    };

    let file = File::create(&path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(report.content.as_bytes())
        .map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    info!(
        path = %path.display(),
        period = %report.period,
        sources = report.sources.len(),
        "Report written"
    );

    Ok(path)
}
