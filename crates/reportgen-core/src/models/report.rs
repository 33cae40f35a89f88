//! Source documents and their `##` sections

use std::path::{Path, PathBuf};

/// Teaching section heading
pub const TEACHING_SECTION: &str = "教学";
/// Listening section heading
pub const LISTENING_SECTION: &str = "听课";
/// Training section heading
pub const TRAINING_SECTION: &str = "培训学习";
/// Miscellaneous section heading
pub const MISCELLANEOUS_SECTION: &str = "杂事";

/// Placeholder meaning "nothing to report"
pub const NONE_MARKER: &str = "无";

/// Order in which sections are written to a merged report
pub const SECTION_ORDER: [&str; 4] = [
    TEACHING_SECTION,
    LISTENING_SECTION,
    TRAINING_SECTION,
    MISCELLANEOUS_SECTION,
];

/// One Markdown source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Path of the file the content was read from
    pub path: PathBuf,

    /// Raw file content
    pub content: String,
}

impl Report {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// File name without the `.md` extension, used for backlinks
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    /// File name including extension
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// File name of `path` without its extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Section name -> chunks, one chunk per contributing report
///
/// Names keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap {
    entries: Vec<(String, Vec<String>)>,
}

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk under `name`
    pub fn push(&mut self, name: impl Into<String>, chunk: impl Into<String>) {
        let name = name.into();
        let chunk = chunk.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, chunks)) => chunks.push(chunk),
            None => self.entries.push((name, vec![chunk])),
        }
    }

    /// Append every chunk of `other`, keeping its order
    pub fn extend(&mut self, other: SectionMap) {
        for (name, chunks) in other.entries {
            for chunk in chunks {
                self.push(name.clone(), chunk);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, chunks)| chunks.as_slice())
    }

    /// All chunks of a section joined by newlines
    pub fn joined(&self, name: &str) -> Option<String> {
        self.get(name).map(|chunks| chunks.join("\n"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_stem() {
        let report = Report::new("/work/周报/20240101 - 20240107.md", "");
        assert_eq!(report.stem(), "20240101 - 20240107");
        assert_eq!(report.file_name(), "20240101 - 20240107.md");
    }

    #[test]
    fn test_section_map_keeps_first_seen_order() {
        let mut map = SectionMap::new();
        map.push("杂事", "a");
        map.push("教学", "b");
        map.push("杂事", "c");

        let names: Vec<_> = map.names().collect();
        assert_eq!(names, vec!["杂事", "教学"]);
        assert_eq!(map.get("杂事").unwrap(), &["a".to_string(), "c".to_string()]);
        assert_eq!(map.joined("杂事").unwrap(), "a\nc");
        assert!(map.get("听课").is_none());
    }
}
