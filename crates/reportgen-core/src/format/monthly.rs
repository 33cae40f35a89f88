//! Formatters for monthly, semester and yearly reports
//!
//! The sources here are already-merged summaries, so the block formatters only
//! regroup by title and keep every line in order.

use super::{
    group_by_title, is_effectively_empty, is_placeholder, numbered, parse_blocks,
    strip_list_number, SectionFormatter, BLOCK_TITLE_RE,
};
use crate::models::NONE_MARKER;

/// Regroups teaching blocks by title
///
/// Tags from every heading of a title are merged onto one heading line.
/// Loose lines and non-course `###` blocks are kept as written, after the
/// course blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonthlyTeachingFormatter;

impl MonthlyTeachingFormatter {
    /// Course block lines, and everything that belongs to no course block
    fn split_courses(content: &str) -> (String, Vec<&str>) {
        let mut courses: Vec<&str> = Vec::new();
        let mut other: Vec<&str> = Vec::new();
        let mut in_course = false;

        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if BLOCK_TITLE_RE.is_match(line) {
                in_course = true;
            } else if line.starts_with("### ") {
                in_course = false;
            }

            if in_course {
                courses.push(line);
            } else if !is_placeholder(line) {
                other.push(line);
            }
        }

        (courses.join("\n"), other)
    }
}

impl SectionFormatter for MonthlyTeachingFormatter {
    fn format(&self, content: &str) -> String {
        let (courses, other) = Self::split_courses(content);
        let blocks = parse_blocks(&courses);
        let mut result: Vec<String> = Vec::new();

        for (title, group) in group_by_title(&blocks) {
            let mut tags: Vec<&str> = Vec::new();
            for token in group.iter().flat_map(|b| b.subtitle().split_whitespace()) {
                if !tags.contains(&token) {
                    tags.push(token);
                }
            }

            let mut heading = format!("### [[{}]]", title);
            if !tags.is_empty() {
                heading.push(' ');
                heading.push_str(&tags.join(" "));
            }
            result.push(heading);

            for block in group {
                result.extend(block.lines().iter().filter(|l| !is_placeholder(l)).cloned());
            }
        }

        let mut parts = vec![result.join("\n"), other.join("\n")];
        parts.retain(|p| !p.is_empty());
        super::or_none(parts.join("\n\n"))
    }
}

/// Regroups listening entries by teacher
#[derive(Debug, Default, Clone, Copy)]
pub struct MonthlyListeningFormatter;

impl SectionFormatter for MonthlyListeningFormatter {
    fn format(&self, content: &str) -> String {
        let blocks = parse_blocks(content);
        let mut result: Vec<String> = Vec::new();

        for (title, group) in group_by_title(&blocks) {
            result.push(format!("### [[{}]]", title));
            let before = result.len();

            for block in group {
                let subtitle = block.subtitle();
                if !subtitle.is_empty() && !is_placeholder(subtitle) {
                    result.push(subtitle.to_string());
                }
                result.extend(block.lines().iter().filter(|l| !is_placeholder(l)).cloned());
            }

            if result.len() == before {
                result.push(format!("#### {}", NONE_MARKER));
            }
        }

        super::or_none(result.join("\n"))
    }
}

/// Trims lines and drops blanks
#[derive(Debug, Default, Clone, Copy)]
pub struct MonthlyTrainingFormatter;

impl SectionFormatter for MonthlyTrainingFormatter {
    fn format(&self, content: &str) -> String {
        if is_effectively_empty(content) {
            return NONE_MARKER.to_string();
        }

        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && *l != NONE_MARKER)
            .collect();

        super::or_none(lines.join("\n"))
    }
}

/// Strips old list numbers and renumbers from 1
#[derive(Debug, Default, Clone, Copy)]
pub struct MonthlyMattersFormatter;

impl SectionFormatter for MonthlyMattersFormatter {
    fn format(&self, content: &str) -> String {
        numbered(
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && *l != NONE_MARKER)
                .map(strip_list_number)
                .filter(|l| !l.is_empty() && *l != NONE_MARKER),
        )
    }
}
