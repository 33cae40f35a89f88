//! Teaching section of weekly reports
//!
//! Daily reports list lessons as `### [[Lesson]] #tag ...` followed by notes.
//! The week merges all entries of one lesson into a single block with the
//! union of its tags and notes. Other `###` headings (`### #...` and friends)
//! are kept verbatim after the lessons.

use super::{is_effectively_empty, SectionFormatter};
use crate::models::NONE_MARKER;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashSet};

static COURSE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^### \[\[([^\]]+)\]\](.*)$").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\S+").unwrap());

/// Tags and unique content lines collected for one lesson title
#[derive(Debug, Default, Clone)]
pub struct TitleContent {
    pub tags: BTreeSet<String>,
    pub content: Vec<String>,
    seen: HashSet<String>,
}

impl TitleContent {
    fn add_line(&mut self, line: &str) {
        if self.seen.insert(line.to_string()) {
            self.content.push(line.to_string());
        }
    }

    fn render(&self, title: &str) -> String {
        let mut out = format!("### [[{}]]", title);
        if !self.tags.is_empty() {
            out.push(' ');
            out.push_str(&self.tags.iter().cloned().collect::<Vec<_>>().join(" "));
        }
        if !self.content.is_empty() {
            out.push('\n');
            out.push_str(&self.content.join("\n"));
        }
        out
    }
}

enum Current {
    Nothing,
    Course(String),
    Other,
}

/// Merges lesson blocks by title
#[derive(Debug, Default, Clone, Copy)]
pub struct TeachingFormatter;

impl SectionFormatter for TeachingFormatter {
    fn format(&self, content: &str) -> String {
        if is_effectively_empty(content) {
            return NONE_MARKER.to_string();
        }

        let mut courses: BTreeMap<String, TitleContent> = BTreeMap::new();
        let mut other: Vec<&str> = Vec::new();
        let mut current = Current::Nothing;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line == NONE_MARKER {
                continue;
            }

            if line.starts_with("### ") {
                match COURSE_HEADING_RE.captures(line) {
                    Some(caps) => {
                        let title = caps[1].trim().to_string();
                        let entry = courses.entry(title.clone()).or_default();
                        for tag in TAG_RE.find_iter(&caps[2]) {
                            entry.tags.insert(tag.as_str().to_string());
                        }
                        current = Current::Course(title);
                    }
                    None => {
                        other.push(line);
                        current = Current::Other;
                    }
                }
                continue;
            }

            match &current {
                Current::Course(title) => {
                    if let Some(entry) = courses.get_mut(title) {
                        entry.add_line(line);
                    }
                }
                // Loose lines before any heading are kept with the other blocks
                Current::Other | Current::Nothing => other.push(line),
            }
        }

        let mut result: Vec<String> = courses
            .iter()
            .map(|(title, content)| content.render(title))
            .collect();

        if !other.is_empty() {
            result.push(other.join("\n"));
        }

        super::or_none(result.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merges_same_lesson_across_documents() {
        let day1 = "### [[L1]] #tagA\n导入新课\n练习";
        let day2 = "### [[L1]] #tagA\n练习\n课堂小结";
        let merged = TeachingFormatter.format(&format!("{}\n{}", day1, day2));

        assert_eq!(merged, "### [[L1]] #tagA\n导入新课\n练习\n课堂小结");
        assert_eq!(merged.matches("### [[L1]]").count(), 1);
        assert_eq!(merged.matches("#tagA").count(), 1);
    }

    #[test]
    fn test_sorts_titles_and_unions_tags() {
        let input = "### [[语文]] #早读\n背诵\n### [[数学]] #习题 #作业\n讲评\n### [[语文]] #作文\n写作";
        assert_eq!(
            TeachingFormatter.format(input),
            "### [[数学]] #习题 #作业\n讲评\n\n### [[语文]] #作文 #早读\n背诵\n写作"
        );
    }

    #[test]
    fn test_non_course_blocks_follow_courses() {
        let input = "### #教研\n集体备课\n### [[L2]]\n讲授\n### 其他\n整理教案";
        assert_eq!(
            TeachingFormatter.format(input),
            "### [[L2]]\n讲授\n\n### #教研\n集体备课\n### 其他\n整理教案"
        );
    }

    #[test]
    fn test_all_none_collapses() {
        assert_eq!(TeachingFormatter.format("无\n\n无\n"), "无");
        assert_eq!(TeachingFormatter.format(""), "无");
    }

    #[test]
    fn test_none_lines_dropped_when_content_present() {
        assert_eq!(
            TeachingFormatter.format("无\n### [[L1]]\n讲授\n无"),
            "### [[L1]]\n讲授"
        );
    }
}
