//! Splitting reports into `##` sections and merging them across reports

use crate::models::{Report, SectionMap};

const SECTION_PREFIX: &str = "## ";

/// Split a document into its `## <name>` sections
///
/// Each section holds the literal lines between its heading and the next
/// `## ` heading (or end of document). Text before the first heading is not
/// part of any section, and a heading followed directly by another heading
/// contributes nothing.
pub fn split_sections(content: &str) -> SectionMap {
    let mut sections = SectionMap::new();
    let mut current: Option<String> = None;
    let mut lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        if let Some(name) = line.strip_prefix(SECTION_PREFIX) {
            if let Some(section) = current.take() {
                if !lines.is_empty() {
                    sections.push(section, lines.join("\n"));
                }
            }
            current = Some(name.trim().to_string());
            lines.clear();
        } else if current.is_some() {
            lines.push(line);
        }
    }

    if let Some(section) = current {
        if !lines.is_empty() {
            sections.push(section, lines.join("\n"));
        }
    }

    sections
}

/// Merge the sections of `reports` in document order
///
/// No de-duplication happens here; that is up to the formatters.
pub fn merge_sections(reports: &[Report]) -> SectionMap {
    let mut merged = SectionMap::new();
    for report in reports {
        merged.extend(split_sections(&report.content));
    }
    merged
}
