//! Front matter parsing and counter aggregation
//!
//! Reports carry a `---` delimited block at the top. Weekly sources (daily
//! reports) store their week number there; weekly and higher reports store
//! the dorm-check and exam-proctoring counters that get summed upwards.

use crate::models::stats::{DORM_CHECK_KEYWORD, EXAM_PROCTOR_KEYWORD};
use crate::models::{
    FrontMatterStats, Report, LISTENING_SECTION, MISCELLANEOUS_SECTION, NONE_MARKER,
};
use crate::parsers::sections::split_sections;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

const DELIMITER: &str = "---";

/// Line-based fallback for front matter that is not valid YAML
static FRONT_MATTER_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(周|查宿次数|特种工监考)\s*:\s*"?([^"]*?)"?\s*$"#).unwrap()
});

/// `周` line, read as written when the value is a plain scalar
static WEEK_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*周\s*:\s*(.*?)\s*$").unwrap());

/// Typed view of the keys reportgen cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    /// `周` - week key of a daily report
    pub week: Option<String>,

    /// `查宿次数`
    pub dorm_checks: Option<u32>,

    /// `特种工监考`
    pub exam_proctoring: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    #[serde(rename = "周", default)]
    week: Option<Value>,

    #[serde(rename = "查宿次数", default)]
    dorm_checks: Option<Value>,

    #[serde(rename = "特种工监考", default)]
    exam_proctoring: Option<Value>,
}

impl FrontMatter {
    /// Parse the text between the delimiters
    ///
    /// Valid YAML goes through serde_yaml; anything else is scanned line by
    /// line so a stray template placeholder does not hide the counters.
    pub fn parse(block: &str) -> Self {
        if block.trim().is_empty() {
            return Self::default();
        }

        match serde_yaml::from_str::<RawFrontMatter>(block) {
            Ok(raw) => Self {
                week: plain_week(block).or_else(|| raw.week.and_then(scalar_to_string)),
                dorm_checks: raw.dorm_checks.and_then(scalar_to_count),
                exam_proctoring: raw.exam_proctoring.and_then(scalar_to_count),
            },
            Err(e) => {
                debug!(error = %e, "Front matter is not valid YAML, scanning lines");
                Self::scan_lines(block)
            }
        }
    }

    fn scan_lines(block: &str) -> Self {
        let mut fm = Self::default();

        for line in block.lines() {
            let Some(caps) = FRONT_MATTER_LINE_RE.captures(line) else {
                continue;
            };
            let value = caps[2].trim();
            match &caps[1] {
                "周" if !value.is_empty() => fm.week = Some(value.to_string()),
                "查宿次数" => fm.dorm_checks = value.parse().ok(),
                "特种工监考" => fm.exam_proctoring = value.parse().ok(),
                _ => {}
            }
        }

        fm
    }

    pub fn has_counters(&self) -> bool {
        self.dorm_checks.is_some() || self.exam_proctoring.is_some()
    }
}

/// Unquoted `周` value exactly as written
///
/// YAML would turn `03` into `3` and cut `3 # 第三周` at the comment.
/// Quoted, flow and block values return `None` and are left to serde_yaml.
fn plain_week(block: &str) -> Option<String> {
    let caps = block.lines().find_map(|line| WEEK_LINE_RE.captures(line))?;
    let value = caps.get(1)?.as_str();
    match value.chars().next() {
        None | Some('"' | '\'' | '[' | '{' | '|' | '>') => None,
        Some(_) => Some(value.to_string()),
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn scalar_to_count(value: Value) -> Option<u32> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

/// Split content into front matter and body
///
/// The first line must be `---`; the block ends at the next `---` line.
/// Content without a closed block is returned whole as body.
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = text.split_inclusive('\n');

    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {
            let start = first.len();
            let mut offset = start;
            for line in lines {
                if line.trim_end() == DELIMITER {
                    return (Some(&text[start..offset]), &text[offset + line.len()..]);
                }
                offset += line.len();
            }
            (None, content)
        }
        _ => (None, content),
    }
}

/// Parse the front matter of a document, empty when there is none
pub fn parse_front_matter(content: &str) -> FrontMatter {
    match split_front_matter(content) {
        (Some(block), _) => FrontMatter::parse(block),
        (None, _) => FrontMatter::default(),
    }
}

/// Week key (`周`) of a daily report
pub fn week_key(content: &str) -> Option<String> {
    parse_front_matter(content).week
}

/// Dorm-check and exam-proctoring counts of one source report
///
/// Reports produced by reportgen carry the counters in their front matter.
/// Daily reports do not, so the counts are inferred from the keyword lines of
/// their miscellaneous section. The listening count is never read here; it is
/// recounted on the merged output.
pub fn report_counters(report: &Report) -> FrontMatterStats {
    let fm = parse_front_matter(&report.content);
    if fm.has_counters() {
        return FrontMatterStats {
            listening: 0,
            dorm_checks: fm.dorm_checks.unwrap_or(0),
            exam_proctoring: fm.exam_proctoring.unwrap_or(0),
        };
    }

    infer_counters(&report.content)
}

/// Count keyword lines in the miscellaneous section
pub fn infer_counters(content: &str) -> FrontMatterStats {
    let sections = split_sections(content);
    let Some(misc) = sections.joined(MISCELLANEOUS_SECTION) else {
        return FrontMatterStats::default();
    };

    let count = |keyword: &str| misc.lines().filter(|l| l.contains(keyword)).count() as u32;

    FrontMatterStats {
        listening: 0,
        dorm_checks: count(DORM_CHECK_KEYWORD),
        exam_proctoring: count(EXAM_PROCTOR_KEYWORD),
    }
}

/// Sum the counters of all contributing reports
pub fn aggregate_counters(reports: &[Report]) -> FrontMatterStats {
    reports.iter().map(report_counters).sum()
}

/// Count `#### ` entries inside the listening section of a rendered body
///
/// Only lines between `## 听课` and the next `## ` heading count, and the
/// `#### 无` placeholder does not.
pub fn count_listening(body: &str) -> u32 {
    let mut in_listening = false;
    let mut count = 0;

    for line in body.lines() {
        if let Some(name) = line.strip_prefix("## ") {
            in_listening = name.trim() == LISTENING_SECTION;
            continue;
        }

        if in_listening {
            if let Some(entry) = line.strip_prefix("#### ") {
                if entry.trim() != NONE_MARKER {
                    count += 1;
                }
            }
        }
    }

    count
}
