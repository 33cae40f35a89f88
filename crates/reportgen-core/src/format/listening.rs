//! Listening section of weekly reports
//!
//! Each observed lesson is `### [[Teacher]] subject`. The week lists every
//! teacher once, with one `#### subject` entry per observed lesson.

use super::{group_by_title, is_placeholder, parse_blocks, SectionFormatter};
use crate::models::NONE_MARKER;

/// Groups observed lessons by teacher
#[derive(Debug, Default, Clone, Copy)]
pub struct ListeningFormatter;

impl SectionFormatter for ListeningFormatter {
    fn format(&self, content: &str) -> String {
        let blocks = parse_blocks(content);
        if blocks.is_empty() {
            return NONE_MARKER.to_string();
        }

        let mut result: Vec<String> = Vec::new();

        for (title, group) in group_by_title(&blocks) {
            result.push(format!("### [[{}]]", title));
            let before = result.len();

            for block in group {
                let subtitle = block.subtitle();
                if !subtitle.is_empty() && !is_placeholder(subtitle) {
                    if subtitle.starts_with("#### ") {
                        result.push(subtitle.to_string());
                    } else {
                        result.push(format!("#### {}", subtitle));
                    }
                }

                result.extend(
                    block
                        .lines()
                        .iter()
                        .filter(|l| !is_placeholder(l))
                        .cloned(),
                );
            }

            if result.len() == before {
                result.push(format!("#### {}", NONE_MARKER));
            }
        }

        super::or_none(result.join("\n"))
    }
}
