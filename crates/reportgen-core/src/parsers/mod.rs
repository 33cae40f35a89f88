//! Parsers for report documents

pub mod frontmatter;
pub mod period;
pub mod sections;

pub use frontmatter::{
    aggregate_counters, count_listening, parse_front_matter, split_front_matter, week_key,
    FrontMatter,
};
pub use period::{period_key, semester_for, sort_periods, PeriodError};
pub use sections::{merge_sections, split_sections};
