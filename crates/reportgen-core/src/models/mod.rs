//! Data models for reportgen

pub mod config;
pub mod report;
pub mod stats;

pub use config::{validate_working_dir, Config, ReportKind, WORKING_DIRS};
pub use report::{
    file_stem, Report, SectionMap, LISTENING_SECTION, MISCELLANEOUS_SECTION, NONE_MARKER,
    SECTION_ORDER, TEACHING_SECTION, TRAINING_SECTION,
};
pub use stats::FrontMatterStats;
