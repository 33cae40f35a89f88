//! reportgen-core - Core library for reportgen
//!
//! Merges dated Markdown reports into weekly, monthly, semester and yearly
//! summaries: period extraction, section merging, per-section formatting,
//! counter aggregation and report writing.

pub mod error;
pub mod format;
pub mod generator;
pub mod models;
pub mod parsers;
pub mod source;
pub mod writer;

pub use error::{CoreError, ErrorSeverity, LoadError, LoadReport};
pub use generator::{GeneratedReport, Generator, PeriodSummary};
pub use models::{Config, ReportKind};
pub use source::{FsSource, MemorySource, ReportSource};
