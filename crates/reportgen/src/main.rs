//! reportgen - Merge dated Markdown reports into weekly, monthly, semester and yearly reports

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use reportgen_core::models::validate_working_dir;
use reportgen_core::{Config, Generator, ReportKind};
use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reportgen",
    version,
    about = "Merge dated Markdown reports into weekly, monthly, semester and yearly reports",
    long_about = "Merge dated Markdown reports into weekly, monthly, semester and yearly reports.\n\
                  \n\
                  The working directory must contain the folders 日报, 周报, 月报, 学期报 and 年报.\n\
                  Each report type reads the folder one level below it:\n\
                    w  日报 -> 周报      grouped by the 周 front matter entry\n\
                    m  周报 -> 月报      grouped by the month of the first date\n\
                    s  月报 -> 学期报    grouped by semester (Feb-Jul 春, Aug-Jan 秋)\n\
                    y  学期报 -> 年报    grouped by starting year\n\
                  \n\
                  Examples:\n\
                    reportgen -d ~/notes -t w -w 3          # Week 3\n\
                    reportgen -d ~/notes -t m -m 202401 -f  # January 2024, merged teaching blocks\n\
                    reportgen -d ~/notes -t s               # Pick semesters interactively\n\
                    reportgen -d ~/notes -t w --list --json # Available weeks as JSON\n\
                  \n\
                  Environment Variables:\n\
                    REPORTGEN_DIR                    # Default working directory\n\
                    REPORTGEN_NON_INTERACTIVE        # Disable interactive prompts\n\
                    RUST_LOG                         # Log filter (default: reportgen=info)"
)]
struct Cli {
    /// Working directory containing the report folders
    #[arg(short = 'd', long = "dir", env = "REPORTGEN_DIR")]
    dir: Option<PathBuf>,

    /// Report type: w (weekly), m (monthly), s (semester), y (yearly)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    report_type: Option<String>,

    /// Week to merge (value of the 周 front matter entry)
    #[arg(short = 'w', long = "week")]
    week: Option<String>,

    /// Month to merge (YYYYMM)
    #[arg(short = 'm', long = "month")]
    month: Option<String>,

    /// Semester to merge ("YYYY - YYYY 春" or "YYYY - YYYY 秋")
    #[arg(short = 's', long = "semester")]
    semester: Option<String>,

    /// Year to merge (YYYY)
    #[arg(short = 'y', long = "year")]
    year: Option<String>,

    /// Merge teaching blocks by lesson instead of plain cleanup
    #[arg(short = 'f', long = "format")]
    format: bool,

    /// List available periods and exit
    #[arg(long)]
    list: bool,

    /// Output --list as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Disable interactive prompts (CI/CD mode)
    #[arg(long, env = "REPORTGEN_NON_INTERACTIVE")]
    non_interactive: bool,
}

impl Cli {
    /// Period flag matching `kind`; flags for other kinds are ignored
    fn period_for(&self, kind: ReportKind) -> Option<String> {
        let flags = [
            (ReportKind::Weekly, &self.week),
            (ReportKind::Monthly, &self.month),
            (ReportKind::Semester, &self.semester),
            (ReportKind::Yearly, &self.year),
        ];

        let mut selected = None;
        for (flag_kind, value) in flags {
            match value {
                Some(v) if flag_kind == kind => selected = Some(v.trim().to_string()),
                Some(v) => warn!(period = %v, flag = %flag_kind.code(), "Ignoring period for another report type"),
                None => {}
            }
        }
        selected
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("reportgen=info,reportgen_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let root = cli
        .dir
        .clone()
        .context("缺少工作目录参数 -d/--dir")?;
    validate_working_dir(&root)?;

    let kind = match &cli.report_type {
        Some(t) => t.parse::<ReportKind>()?,
        None if cli.non_interactive => {
            return Err(cli::CliError::NonInteractive { missing: "报告类型 -t" }.into())
        }
        None => cli::prompt_report_kind(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    let mut config = Config::for_working_dir(&root, kind, cli.format)?;
    if let Some(period) = cli.period_for(kind) {
        config = config.with_period(period);
    }

    debug!(kind = ?kind, root = %root.display(), formatting = cli.format, "Configuration loaded");

    let generator = Generator::from_config(config);

    if cli.list {
        let periods = generator.available_periods()?;
        println!("{}", cli::format_period_table(kind, &periods, cli.json));
        return Ok(());
    }

    let periods = match generator.config().selected_period.clone() {
        Some(period) => vec![period],
        None if cli.non_interactive => {
            return Err(cli::CliError::NonInteractive { missing: "时间段" }.into())
        }
        None => {
            let available = generator.available_periods()?;
            cli::prompt_periods(kind, &available, &mut io::stdin().lock(), &mut io::stdout())?
        }
    };

    for period in &periods {
        let path = generator
            .run(period)
            .with_context(|| format!("{} {} 生成失败", kind.label(), period))?;
        println!("报告生成完成：{}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_period_for_matches_kind() {
        let cli = Cli::parse_from(["reportgen", "-d", "/tmp", "-t", "m", "-m", " 202401 ", "-w", "3"]);
        assert_eq!(cli.period_for(ReportKind::Monthly).as_deref(), Some("202401"));
        assert_eq!(cli.period_for(ReportKind::Weekly).as_deref(), Some("3"));
        assert_eq!(cli.period_for(ReportKind::Yearly), None);
    }

    #[test]
    fn test_json_requires_list() {
        assert!(Cli::try_parse_from(["reportgen", "--json"]).is_err());
        assert!(Cli::try_parse_from(["reportgen", "--list", "--json"]).is_ok());
    }
}
