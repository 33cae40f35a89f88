//! Interactive prompts and terminal output
//!
//! Prompts read plain lines so they work with piped input as well as a
//! terminal. Everything here is generic over `BufRead`/`Write` for testing.

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table};
use reportgen_core::{PeriodSummary, ReportKind};
use std::io::{BufRead, Write};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    /// Nothing was selected
    EmptySelection,
    /// A selection token is not a valid choice
    InvalidSelection { token: String, max: usize },
    /// A prompt would be needed but prompts are disabled
    NonInteractive { missing: &'static str },
    /// Input ended before an answer was read
    UnexpectedEof,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::EmptySelection => write!(f, "未选择任何选项"),
            CliError::InvalidSelection { token, max } => {
                write!(f, "无效的选择 '{}'（可选 1-{} 或 all）", token, max)
            }
            CliError::NonInteractive { missing } => {
                write!(f, "非交互模式下必须指定{}", missing)
            }
            CliError::UnexpectedEof => write!(f, "输入已结束"),
        }
    }
}

impl std::error::Error for CliError {}

// ============================================================================
// Selection Parsing
// ============================================================================

/// Parse a multi-selection such as `1 3`, `2,4` or `all`
///
/// Numbers are 1-based; the result holds 0-based indices in the order given,
/// without duplicates.
pub fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, CliError> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("all") {
        return if count == 0 {
            Err(CliError::EmptySelection)
        } else {
            Ok((0..count).collect())
        };
    }

    let mut selected = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c == '，' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let index = token
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=count).contains(n))
            .ok_or_else(|| CliError::InvalidSelection {
                token: token.to_string(),
                max: count,
            })?;

        if !selected.contains(&(index - 1)) {
            selected.push(index - 1);
        }
    }

    if selected.is_empty() {
        return Err(CliError::EmptySelection);
    }

    Ok(selected)
}

fn read_answer<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Err(CliError::UnexpectedEof.into());
    }
    Ok(line.trim().to_string())
}

// ============================================================================
// Prompts
// ============================================================================

/// Ask which kind of report to generate
///
/// Accepts the list number or the kind code (`w`, `m`, `s`, `y`).
pub fn prompt_report_kind<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<ReportKind> {
    writeln!(output, "请选择要归纳的报告类型：")?;
    for (i, kind) in ReportKind::ALL.iter().enumerate() {
        writeln!(output, "  {}. {} ({})", i + 1, kind.label(), kind.code())?;
    }

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let answer = read_answer(input)?;
        let by_number = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| ReportKind::ALL.get(i).copied());

        match by_number.map(Ok).unwrap_or_else(|| answer.parse::<ReportKind>()) {
            Ok(kind) => return Ok(kind),
            Err(e) => writeln!(output, "{}", e)?,
        }
    }
}

/// Ask which periods to generate, re-asking on invalid input
pub fn prompt_periods<R: BufRead, W: Write>(
    kind: ReportKind,
    periods: &[PeriodSummary],
    input: &mut R,
    output: &mut W,
) -> Result<Vec<String>> {
    writeln!(output, "{}", format_period_table(kind, periods, false))?;
    writeln!(output, "输入要生成的序号（空格或逗号分隔，all 表示全部）：")?;

    loop {
        write!(output, "> ")?;
        output.flush()?;

        let answer = read_answer(input)?;
        match parse_selection(&answer, periods.len()) {
            Ok(indices) => {
                return Ok(indices
                    .into_iter()
                    .map(|i| periods[i].period.clone())
                    .collect())
            }
            Err(e) => writeln!(output, "{}", e)?,
        }
    }
}

// ============================================================================
// Output Formatting
// ============================================================================

/// Available periods as a table, or JSON
pub fn format_period_table(kind: ReportKind, periods: &[PeriodSummary], json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(periods).unwrap_or_else(|_| "[]".to_string());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#"),
        Cell::new(format!("{} 时间段", kind.target_dir())),
        Cell::new(format!("{}数量", kind.source_dir())),
    ]);

    for (i, summary) in periods.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&summary.period),
            Cell::new(summary.sources),
        ]);
    }

    table.to_string()
}
