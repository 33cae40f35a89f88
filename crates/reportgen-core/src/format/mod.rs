//! Section formatters
//!
//! Every `##` section of a merged report goes through one formatter that
//! de-duplicates, renumbers and collapses "nothing to report" markers. Which
//! formatter handles which section depends on the report kind (see
//! [`FormatterSet`]).

pub mod cleanup;
pub mod listening;
pub mod miscellaneous;
pub mod monthly;
pub mod teaching;

pub use cleanup::MarkdownCleanup;
pub use listening::ListeningFormatter;
pub use miscellaneous::MiscellaneousFormatter;
pub use monthly::{
    MonthlyListeningFormatter, MonthlyMattersFormatter, MonthlyTeachingFormatter,
    MonthlyTrainingFormatter,
};
pub use teaching::TeachingFormatter;

use crate::models::{
    ReportKind, LISTENING_SECTION, MISCELLANEOUS_SECTION, NONE_MARKER, TEACHING_SECTION,
    TRAINING_SECTION,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// `### [[Title]]rest` heading of a block
static BLOCK_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^### \[\[(.*?)\]\](.*?)$").unwrap());

/// Leading list number such as `3. `, `12、` or `3 `
static LIST_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\s*[.、．)]\s*|^\d+\s+").unwrap());

/// Normalises the text of one section
pub trait SectionFormatter {
    fn format(&self, content: &str) -> String;
}

/// A `### [[Title]]` sub-unit
///
/// `content[0]` is the text after the closing brackets of the heading (may be
/// empty), the remaining entries are the lines below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub title: String,
    pub content: Vec<String>,
}

impl Block {
    /// Text following the title on the heading line
    pub fn subtitle(&self) -> &str {
        self.content.first().map(String::as_str).unwrap_or("")
    }

    /// Lines below the heading
    pub fn lines(&self) -> &[String] {
        self.content.get(1..).unwrap_or(&[])
    }
}

/// Parse `### [[Title]]` blocks, sorted by title
///
/// Lines are trimmed, blank lines dropped. Text before the first heading
/// belongs to no block and is ignored. The sort is stable, so blocks sharing a
/// title stay in document order.
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(caps) = BLOCK_TITLE_RE.captures(line) {
            blocks.push(Block {
                title: caps[1].to_string(),
                content: vec![caps[2].trim().to_string()],
            });
        } else if let Some(block) = blocks.last_mut() {
            block.content.push(line.to_string());
        }
    }

    blocks.sort_by(|a, b| a.title.cmp(&b.title));
    blocks
}

/// Group consecutive blocks with the same title
pub(crate) fn group_by_title(blocks: &[Block]) -> Vec<(&str, &[Block])> {
    let mut groups = Vec::new();
    let mut start = 0;

    for i in 1..=blocks.len() {
        if i == blocks.len() || blocks[i].title != blocks[start].title {
            groups.push((blocks[start].title.as_str(), &blocks[start..i]));
            start = i;
        }
    }

    groups
}

/// True if `line` only says "nothing", with or without a `#### ` prefix
pub(crate) fn is_placeholder(line: &str) -> bool {
    let line = line.trim();
    line == NONE_MARKER || line.strip_prefix("#### ").map(str::trim) == Some(NONE_MARKER)
}

/// True if every non-blank line is the `无` placeholder
pub fn is_effectively_empty(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|l| l.is_empty() || l == NONE_MARKER)
}

/// Remove a leading list number (`3. `, `12、`, `3 `)
pub fn strip_list_number(line: &str) -> &str {
    match LIST_NUMBER_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Number lines `1. ..`, `2. ..`; `无` when there are none
pub(crate) fn numbered<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let out: Vec<String> = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect();

    or_none(out.join("\n"))
}

/// `无` for empty output
pub(crate) fn or_none(output: String) -> String {
    if output.trim().is_empty() {
        NONE_MARKER.to_string()
    } else {
        output
    }
}

/// The formatters used for one report kind
pub struct FormatterSet {
    teaching: Box<dyn SectionFormatter>,
    listening: Box<dyn SectionFormatter>,
    training: Box<dyn SectionFormatter>,
    miscellaneous: Box<dyn SectionFormatter>,
}

impl FormatterSet {
    /// Weekly reports merge daily entries; everything above merges summaries
    ///
    /// `formatting` switches the teaching section from plain cleanup to
    /// block merging.
    pub fn for_kind(kind: ReportKind, formatting: bool) -> Self {
        let teaching: Box<dyn SectionFormatter> = match (kind, formatting) {
            (_, false) => Box::new(MarkdownCleanup),
            (ReportKind::Weekly, true) => Box::new(TeachingFormatter),
            (_, true) => Box::new(MonthlyTeachingFormatter),
        };

        match kind {
            ReportKind::Weekly => Self {
                teaching,
                listening: Box::new(ListeningFormatter),
                training: Box::new(MonthlyTrainingFormatter),
                miscellaneous: Box::new(MiscellaneousFormatter),
            },
            ReportKind::Monthly | ReportKind::Semester | ReportKind::Yearly => Self {
                teaching,
                listening: Box::new(MonthlyListeningFormatter),
                training: Box::new(MonthlyTrainingFormatter),
                miscellaneous: Box::new(MonthlyMattersFormatter),
            },
        }
    }

    /// Formatter for a section name, `None` for sections that are not written
    pub fn formatter(&self, section: &str) -> Option<&dyn SectionFormatter> {
        match section {
            TEACHING_SECTION => Some(self.teaching.as_ref()),
            LISTENING_SECTION => Some(self.listening.as_ref()),
            TRAINING_SECTION => Some(self.training.as_ref()),
            MISCELLANEOUS_SECTION => Some(self.miscellaneous.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks_sorted_and_stable() {
        let content = "前言\n### [[B]] 二\nb1\n\n### [[A]]\na1\n### [[B]]\nb2\n";
        let blocks = parse_blocks(content);

        let titles: Vec<_> = blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "B"]);
        assert_eq!(blocks[1].subtitle(), "二");
        assert_eq!(blocks[1].lines(), &["b1".to_string()]);
        assert_eq!(blocks[2].subtitle(), "");
        assert_eq!(blocks[2].lines(), &["b2".to_string()]);
    }

    #[test]
    fn test_group_by_title() {
        let blocks = parse_blocks("### [[A]]\n### [[B]]\n### [[B]]\n");
        let groups = group_by_title(&blocks);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "A");
        assert_eq!(groups[1].1.len(), 2);
        assert!(group_by_title(&[]).is_empty());
    }

    #[test]
    fn test_strip_list_number() {
        assert_eq!(strip_list_number("3. 查宿"), "查宿");
        assert_eq!(strip_list_number("12、监考"), "监考");
        assert_eq!(strip_list_number("3 查宿"), "查宿");
        assert_eq!(strip_list_number("3查宿"), "3查宿");
        assert_eq!(strip_list_number("2024-01-01 查宿"), "2024-01-01 查宿");
        assert_eq!(strip_list_number("新任务"), "新任务");
    }

    #[test]
    fn test_is_effectively_empty() {
        assert!(is_effectively_empty(""));
        assert!(is_effectively_empty("\n 无 \n\n无"));
        assert!(!is_effectively_empty("无\n内容"));
    }

    #[test]
    fn test_formatter_set_routes_sections() {
        let set = FormatterSet::for_kind(ReportKind::Weekly, false);
        assert!(set.formatter(TEACHING_SECTION).is_some());
        assert!(set.formatter("其他").is_none());

        let misc = set.formatter(MISCELLANEOUS_SECTION).unwrap();
        assert_eq!(misc.format("1. old\n新任务"), "1. 新任务");

        let monthly = FormatterSet::for_kind(ReportKind::Monthly, false);
        let matters = monthly.formatter(MISCELLANEOUS_SECTION).unwrap();
        assert_eq!(matters.format("1. old\n新任务"), "1. old\n2. 新任务");
    }

    #[test]
    fn test_all_formatters_collapse_none() {
        for kind in ReportKind::ALL {
            for formatting in [false, true] {
                let set = FormatterSet::for_kind(kind, formatting);
                for section in crate::models::SECTION_ORDER {
                    let f = set.formatter(section).unwrap();
                    assert_eq!(f.format("无\n\n  无  \n"), "无", "{kind:?} {section}");
                    assert_eq!(f.format("\n \n"), "无", "{kind:?} {section}");
                }
            }
        }
    }
}
