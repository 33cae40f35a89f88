//! Period keys: which week, month, semester or year a source report belongs to

use crate::models::{file_stem, Report, ReportKind};
use crate::parsers::frontmatter::week_key;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::path::Path;
use thiserror::Error;

static DATE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})").unwrap());
static MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})$").unwrap());
static YEAR_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})").unwrap());

/// No period could be derived from a report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("无法从 {input} 中提取{what}")]
    NotFound { what: &'static str, input: String },
}

impl PeriodError {
    fn not_found(what: &'static str, input: impl Into<String>) -> Self {
        PeriodError::NotFound {
            what,
            input: input.into(),
        }
    }
}

/// Date from a file stem starting with `YYYYMMDD`
pub fn date_from_filename(path: &Path) -> Result<NaiveDate, PeriodError> {
    let stem = file_stem(path);
    DATE_PREFIX_RE
        .captures(&stem)
        .and_then(|caps| {
            let year = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            let day = caps[3].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        })
        .ok_or_else(|| PeriodError::not_found("日期", stem))
}

/// First day of the month from a file stem that is exactly `YYYYMM`
pub fn month_from_filename(path: &Path) -> Result<NaiveDate, PeriodError> {
    let stem = file_stem(path);
    MONTH_RE
        .captures(&stem)
        .and_then(|caps| {
            let year = caps[1].parse().ok()?;
            let month = caps[2].parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, 1)
        })
        .ok_or_else(|| PeriodError::not_found("月份", stem))
}

/// Year from the first 4 characters of a file stem
pub fn year_from_filename(path: &Path) -> Result<String, PeriodError> {
    let stem = file_stem(path);
    YEAR_PREFIX_RE
        .captures(&stem)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| PeriodError::not_found("年份", stem))
}

/// Week key from the `周` front matter entry
pub fn week_from_content(content: &str) -> Result<String, PeriodError> {
    week_key(content).ok_or_else(|| PeriodError::not_found("周数", "front matter"))
}

/// Monthly key `YYYYMM`
pub fn month_key(date: impl Datelike) -> String {
    format!("{:04}{:02}", date.year(), date.month())
}

/// Semester a month belongs to
///
/// February to July is the spring term of the academic year that started the
/// previous autumn. January still belongs to the previous autumn term.
pub fn semester_for(date: impl Datelike) -> String {
    let year = date.year();
    match date.month() {
        2..=7 => format!("{} - {} 春", year - 1, year),
        1 => format!("{} - {} 秋", year - 1, year),
        _ => format!("{} - {} 秋", year, year + 1),
    }
}

/// Period key of `report` when used as a source for `kind`
///
/// - weekly: `周` of a daily report
/// - monthly: `YYYYMM` of the leading date of a weekly report's file name
/// - semester: semester of a `YYYYMM` monthly report
/// - yearly: leading year of a semester report's file name
pub fn period_key(kind: ReportKind, report: &Report) -> Result<String, PeriodError> {
    match kind {
        ReportKind::Weekly => week_from_content(&report.content)
            .map_err(|_| PeriodError::not_found("周数", report.file_name())),
        ReportKind::Monthly => date_from_filename(&report.path).map(month_key),
        ReportKind::Semester => month_from_filename(&report.path).map(semester_for),
        ReportKind::Yearly => year_from_filename(&report.path),
    }
}

/// Leading number of a period, ignoring a `第` prefix
fn numeric_part(period: &str) -> Option<u64> {
    let trimmed = period.trim().trim_start_matches('第');
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Order periods numerically where possible
///
/// Numeric keys come first, ascending; ties and non-numeric keys fall back to
/// string order.
pub fn compare_periods(a: &str, b: &str) -> Ordering {
    match (numeric_part(a), numeric_part(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

pub fn sort_periods(periods: &mut [String]) {
    periods.sort_by(|a, b| compare_periods(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_from_filename() {
        let date = date_from_filename(Path::new("/work/日报/20240115.md")).unwrap();
        assert_eq!(date, ymd(2024, 1, 15));

        let weekly = date_from_filename(Path::new("20240108 - 20240112.md")).unwrap();
        assert_eq!(weekly, ymd(2024, 1, 8));
    }

    #[test]
    fn test_date_from_filename_rejects_bad_names() {
        assert!(date_from_filename(Path::new("notes-20240115.md")).is_err());
        assert!(date_from_filename(Path::new("20241345.md")).is_err());
        assert!(date_from_filename(Path::new("2024011.md")).is_err());
    }

    #[test]
    fn test_month_from_filename() {
        let date = month_from_filename(Path::new("202401.md")).unwrap();
        assert_eq!(date, ymd(2024, 1, 1));
        assert!(month_from_filename(Path::new("20240115.md")).is_err());
        assert!(month_from_filename(Path::new("202413.md")).is_err());
        assert!(month_from_filename(Path::new("2024-01.md")).is_err());
    }

    #[test]
    fn test_year_from_filename() {
        assert_eq!(
            year_from_filename(Path::new("2023 - 2024 秋流水账.md")).unwrap(),
            "2023"
        );
        assert!(year_from_filename(Path::new("秋季.md")).is_err());
    }

    #[test]
    fn test_semester_for() {
        for y in [2020, 2024, 2031] {
            assert_eq!(semester_for(ymd(y, 3, 10)), format!("{} - {} 春", y - 1, y));
            assert_eq!(semester_for(ymd(y, 1, 10)), format!("{} - {} 秋", y - 1, y));
            assert_eq!(semester_for(ymd(y, 9, 1)), format!("{} - {} 秋", y, y + 1));
        }
        assert_eq!(semester_for(ymd(2024, 2, 1)), "2023 - 2024 春");
        assert_eq!(semester_for(ymd(2024, 7, 31)), "2023 - 2024 春");
        assert_eq!(semester_for(ymd(2024, 8, 1)), "2024 - 2025 秋");
        assert_eq!(semester_for(ymd(2024, 12, 31)), "2024 - 2025 秋");
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key(ymd(2024, 3, 9)), "202403");
    }

    #[test]
    fn test_period_key_per_kind() {
        let daily = Report::new(PathBuf::from("20240115.md"), "---\n周: \"3\"\n---\n");
        assert_eq!(period_key(ReportKind::Weekly, &daily).unwrap(), "3");

        let weekly = Report::new("20240129 - 20240202.md", "");
        assert_eq!(period_key(ReportKind::Monthly, &weekly).unwrap(), "202401");

        let monthly = Report::new("202403.md", "");
        assert_eq!(
            period_key(ReportKind::Semester, &monthly).unwrap(),
            "2023 - 2024 春"
        );

        let semester = Report::new("2023 - 2024 春流水账.md", "");
        assert_eq!(period_key(ReportKind::Yearly, &semester).unwrap(), "2023");
    }

    #[test]
    fn test_period_key_failures_are_errors() {
        let no_week = Report::new("20240115.md", "## 教学\n");
        let err = period_key(ReportKind::Weekly, &no_week).unwrap_err();
        assert!(err.to_string().contains("20240115.md"));

        let bad_name = Report::new("readme.md", "");
        assert!(period_key(ReportKind::Monthly, &bad_name).is_err());
    }

    #[test]
    fn test_sort_periods_numeric() {
        let mut periods: Vec<String> = ["10", "第2", "1", "期末", "3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        sort_periods(&mut periods);
        assert_eq!(periods, vec!["1", "第2", "3", "10", "期末"]);
    }
}
