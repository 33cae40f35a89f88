//! Report generation for one report kind
//!
//! A [`Generator`] ties a [`Config`] to a [`ReportSource`]:
//!
//! 1. scan the source folder and key every document by period
//! 2. merge the `##` sections of the documents of one period
//! 3. run each section through the formatter of the report kind
//! 4. count listening entries in the rendered body and sum the counters
//! 5. render front matter, backlinks and body, then write the file

use crate::error::{CoreError, LoadReport};
use crate::format::FormatterSet;
use crate::models::{Config, FrontMatterStats, Report, ReportKind, SECTION_ORDER};
use crate::parsers::{aggregate_counters, count_listening, merge_sections, period_key, sort_periods};
use crate::source::{FsSource, ReportSource};
use crate::writer::{output_file_name, render_body, render_report, write_report};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A period found in the source folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: String,
    /// Number of source documents belonging to the period
    pub sources: usize,
}

/// A rendered report, ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub kind: ReportKind,
    pub period: String,
    pub file_name: String,
    pub content: String,
    pub stats: FrontMatterStats,
    /// Stems of the contributing documents, in merge order
    pub sources: Vec<String>,
    /// Files of the source folder that were skipped during the scan
    pub load_report: LoadReport,
}

pub struct Generator<S> {
    config: Config,
    source: S,
}

impl Generator<FsSource> {
    /// Generator reading the config's source folder from disk
    pub fn from_config(config: Config) -> Self {
        let source = FsSource::new(config.source_dir.clone());
        Self { config, source }
    }
}

impl<S: ReportSource> Generator<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan the source and key each document by its period
    ///
    /// Documents without a recognisable period are skipped and recorded as
    /// warnings.
    fn keyed_reports(&self) -> Result<(Vec<(String, Report)>, LoadReport), CoreError> {
        let scan = self.source.scan()?;
        let mut load_report = scan.load_report;
        let mut keyed = Vec::with_capacity(scan.reports.len());

        for report in scan.reports {
            match period_key(self.config.kind, &report) {
                Ok(key) => keyed.push((key, report)),
                Err(e) => {
                    warn!(
                        path = %report.path.display(),
                        error = %e,
                        "Skipping report without period"
                    );
                    load_report.add_warning(report.path.display().to_string(), e.to_string());
                    load_report.files_skipped += 1;
                }
            }
        }

        Ok((keyed, load_report))
    }

    /// Periods available in the source folder, in display order
    ///
    /// # Errors
    /// `CoreError::NoPeriodsAvailable` when no document yields a period
    pub fn available_periods(&self) -> Result<Vec<PeriodSummary>, CoreError> {
        let (keyed, load_report) = self.keyed_reports()?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for (key, _) in &keyed {
            *counts.entry(key.clone()).or_default() += 1;
        }

        if counts.is_empty() {
            return Err(CoreError::NoPeriodsAvailable {
                path: self.config.source_dir.clone(),
            });
        }

        let mut periods: Vec<String> = counts.keys().cloned().collect();
        sort_periods(&mut periods);

        debug!(
            kind = ?self.config.kind,
            periods = periods.len(),
            skipped = load_report.files_skipped,
            "Periods collected"
        );

        Ok(periods
            .into_iter()
            .map(|period| {
                let sources = counts.get(&period).copied().unwrap_or(0);
                PeriodSummary { period, sources }
            })
            .collect())
    }

    /// Merge every document of `period` into one report
    ///
    /// Documents are merged in file name order.
    ///
    /// # Errors
    /// `CoreError::NoReportsForPeriod` when nothing belongs to the period
    pub fn generate(&self, period: &str) -> Result<GeneratedReport, CoreError> {
        let kind = self.config.kind;
        let (keyed, load_report) = self.keyed_reports()?;

        let mut reports: Vec<Report> = keyed
            .into_iter()
            .filter(|(key, _)| key == period)
            .map(|(_, report)| report)
            .collect();

        if reports.is_empty() {
            return Err(CoreError::NoReportsForPeriod {
                kind: kind.source_dir().to_string(),
                period: period.to_string(),
            });
        }

        reports.sort_by(|a, b| {
            a.file_name()
                .cmp(&b.file_name())
                .then_with(|| a.path.cmp(&b.path))
        });

        debug!(kind = ?kind, period, sources = reports.len(), "Merging period");

        let sections = merge_sections(&reports);
        let formatters = FormatterSet::for_kind(kind, self.config.formatting);

        let formatted: Vec<(String, String)> = SECTION_ORDER
            .iter()
            .filter_map(|&name| {
                let formatter = formatters.formatter(name)?;
                let text = sections.joined(name)?;
                Some((name.to_string(), formatter.format(&text)))
            })
            .collect();

        let body = render_body(&formatted);

        let mut stats = aggregate_counters(&reports);
        stats.listening = count_listening(&body);

        let sources: Vec<String> = reports.iter().map(Report::stem).collect();
        let file_name = output_file_name(kind, period, &sources);
        let content = render_report(kind, period, &stats, &sources, &body);

        Ok(GeneratedReport {
            kind,
            period: period.to_string(),
            file_name,
            content,
            stats,
            sources,
            load_report,
        })
    }

    /// Generate `period` and write it to the target folder
    pub fn run(&self, period: &str) -> Result<PathBuf, CoreError> {
        let report = self.generate(period)?;
        write_report(&self.config.target_dir, &report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn config(kind: ReportKind, formatting: bool) -> Config {
        Config {
            kind,
            source_dir: PathBuf::from("/work").join(kind.source_dir()),
            target_dir: PathBuf::from("/work").join(kind.target_dir()),
            selected_period: None,
            formatting,
        }
    }

    fn daily(week: &str, body: &str) -> String {
        format!("---\n周: \"{}\"\n---\n\n{}", week, body)
    }

    #[test]
    fn test_available_periods_sorted_numerically() {
        let source = MemorySource::default()
            .with_report("20240301.md", daily("10", "## 教学\n"))
            .with_report("20240105.md", daily("2", "## 教学\n"))
            .with_report("20240106.md", daily("2", "## 教学\n"))
            .with_report("模板.md", "## 教学\n");

        let generator = Generator::new(config(ReportKind::Weekly, false), source);
        let periods = generator.available_periods().unwrap();

        assert_eq!(
            periods,
            vec![
                PeriodSummary {
                    period: "2".to_string(),
                    sources: 2
                },
                PeriodSummary {
                    period: "10".to_string(),
                    sources: 1
                },
            ]
        );
    }

    #[test]
    fn test_available_periods_empty_is_error() {
        let source = MemorySource::default().with_report("模板.md", "## 教学\n");
        let generator = Generator::new(config(ReportKind::Weekly, false), source);
        assert!(matches!(
            generator.available_periods(),
            Err(CoreError::NoPeriodsAvailable { .. })
        ));
    }

    #[test]
    fn test_generate_weekly_merges_in_file_order() {
        let source = MemorySource::default()
            .with_report(
                "20240116.md",
                daily("3", "## 教学\n\n### [[L1]] #tagA\n练习\n\n## 杂事\n\n查宿 2 号楼\n"),
            )
            .with_report(
                "20240115.md",
                daily(
                    "3",
                    "## 教学\n\n### [[L1]] #tagA\n导入\n练习\n\n## 听课\n\n### [[张三]] 数学\n\n## 杂事\n\n1. 开会\n",
                ),
            )
            .with_report("20240122.md", daily("4", "## 教学\n\n无\n"));

        let generator = Generator::new(config(ReportKind::Weekly, true), source);
        let report = generator.generate("3").unwrap();

        assert_eq!(report.file_name, "20240115 - 20240116.md");
        assert_eq!(report.sources, vec!["20240115", "20240116"]);
        assert_eq!(report.stats.listening, 1);
        assert_eq!(report.stats.dorm_checks, 1);
        assert_eq!(
            report.content,
            "---\n周: \"3\"\n听课次数: \"1\"\n查宿次数: \"1\"\n特种工监考: \"0\"\n---\n\n\
             [[20240115]]\n\n[[20240116]]\n\n\
             ## 教学\n\n### [[L1]] #tagA\n导入\n练习\n\n\
             ## 听课\n\n### [[张三]]\n#### 数学\n\n\
             ## 杂事\n\n1. 查宿 2 号楼\n"
        );
    }

    #[test]
    fn test_generate_omits_absent_sections() {
        let source = MemorySource::default().with_report("20240115.md", daily("3", "## 杂事\n\n无\n"));
        let generator = Generator::new(config(ReportKind::Weekly, false), source);
        let report = generator.generate("3").unwrap();

        assert!(!report.content.contains("## 教学"));
        assert!(report.content.ends_with("## 杂事\n\n无\n"));
    }

    #[test]
    fn test_generate_records_undated_reports() {
        let source = MemorySource::default()
            .with_report("20240115.md", daily("3", "## 杂事\n\n开会\n"))
            .with_report("模板.md", "## 杂事\n\n无\n");
        let generator = Generator::new(config(ReportKind::Weekly, false), source);
        let report = generator.generate("3").unwrap();

        assert_eq!(report.sources, vec!["20240115"]);
        assert_eq!(report.load_report.files_scanned, 2);
        assert_eq!(report.load_report.files_skipped, 1);
        assert_eq!(report.load_report.errors.len(), 1);
        assert_eq!(report.load_report.errors[0].source, "模板.md");
        assert_eq!(
            report.load_report.errors[0].severity,
            crate::error::ErrorSeverity::Warning
        );
    }

    #[test]
    fn test_generate_unknown_period_echoes_it() {
        let source = MemorySource::default().with_report("20240115.md", daily("3", "## 杂事\n"));
        let generator = Generator::new(config(ReportKind::Weekly, false), source);

        let err = generator.generate("99").unwrap_err();
        assert!(matches!(err, CoreError::NoReportsForPeriod { ref period, .. } if period == "99"));
        assert!(err.to_string().contains("99"));
    }

    #[test]
    fn test_generate_monthly_sums_weekly_counters() {
        let week = |dorm: u32, listening: u32, body: &str| {
            format!(
                "---\n周: \"1\"\n听课次数: \"{}\"\n查宿次数: \"{}\"\n特种工监考: \"1\"\n---\n\n{}",
                listening, dorm, body
            )
        };
        let source = MemorySource::default()
            .with_report(
                "20240101 - 20240105.md",
                week(2, 1, "## 听课\n\n### [[张三]]\n#### 数学\n\n## 杂事\n\n1. 查宿\n2. 查宿\n"),
            )
            .with_report(
                "20240108 - 20240112.md",
                week(1, 0, "## 听课\n\n### [[李四]]\n#### 无\n\n## 杂事\n\n1. 开会\n"),
            )
            .with_report("20240205 - 20240209.md", week(5, 0, "## 杂事\n\n无\n"));

        let generator = Generator::new(config(ReportKind::Monthly, false), source);
        let report = generator.generate("202401").unwrap();

        assert_eq!(report.file_name, "202401.md");
        assert_eq!(report.stats.dorm_checks, 3);
        assert_eq!(report.stats.exam_proctoring, 2);
        assert_eq!(report.stats.listening, 1);
        assert!(!report.content.contains("周:"));
        assert!(report.content.contains("## 杂事\n\n1. 查宿\n2. 查宿\n3. 开会\n"));
    }
}
