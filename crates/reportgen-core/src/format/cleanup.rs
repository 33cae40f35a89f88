//! Plain cleanup used when block merging is off

use super::{is_effectively_empty, SectionFormatter};
use crate::models::NONE_MARKER;

/// Drops blank lines, quotes (`>`) and bare links (`[[`)
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownCleanup;

impl SectionFormatter for MarkdownCleanup {
    fn format(&self, content: &str) -> String {
        if is_effectively_empty(content) {
            return NONE_MARKER.to_string();
        }

        let kept: Vec<&str> = content
            .lines()
            .filter(|line| {
                let t = line.trim();
                !t.is_empty() && t != NONE_MARKER && !t.starts_with('>') && !t.starts_with("[[")
            })
            .collect();

        super::or_none(kept.join("\n"))
    }
}
