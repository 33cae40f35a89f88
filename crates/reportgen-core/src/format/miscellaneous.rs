//! Miscellaneous section of weekly reports

use super::{numbered, strip_list_number, SectionFormatter};
use crate::models::stats::{DORM_CHECK_KEYWORD, EXAM_PROCTOR_KEYWORD};
use crate::models::NONE_MARKER;

/// Renumbers the week's chores
///
/// Lines starting with a digit carry a stale daily number and are dropped,
/// unless they mention a dorm check or exam proctoring. Those keyword lines
/// are always listed last so the counters stay easy to find.
#[derive(Debug, Default, Clone, Copy)]
pub struct MiscellaneousFormatter;

impl SectionFormatter for MiscellaneousFormatter {
    fn format(&self, content: &str) -> String {
        let mut plain: Vec<&str> = Vec::new();
        let mut important: Vec<&str> = Vec::new();

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line == NONE_MARKER {
                continue;
            }

            if line.contains(DORM_CHECK_KEYWORD) || line.contains(EXAM_PROCTOR_KEYWORD) {
                important.push(strip_list_number(line));
            } else if !line.starts_with(|c: char| c.is_ascii_digit()) {
                plain.push(line);
            }
        }

        numbered(plain.into_iter().chain(important))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_stale_numbers_and_appends_keywords() {
        let input = "1. old item\n查宿 2024-01-01\n新任务";
        assert_eq!(
            MiscellaneousFormatter.format(input),
            "1. 新任务\n2. 查宿 2024-01-01"
        );
    }

    #[test]
    fn test_numbered_keyword_lines_lose_old_number() {
        let input = "整理材料\n3. 监考 期中考试\n2. 查宿\n4. 开会";
        assert_eq!(
            MiscellaneousFormatter.format(input),
            "1. 整理材料\n2. 监考 期中考试\n3. 查宿"
        );
    }

    #[test]
    fn test_only_none_is_none() {
        assert_eq!(MiscellaneousFormatter.format("无"), "无");
        assert_eq!(MiscellaneousFormatter.format("1. 旧\n无\n"), "无");
        assert_eq!(MiscellaneousFormatter.format(""), "无");
    }

    #[test]
    fn test_none_lines_skipped_between_entries() {
        assert_eq!(MiscellaneousFormatter.format("无\n开会\n无"), "1. 开会");
    }
}
