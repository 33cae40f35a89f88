//! Counters carried in the front matter of merged reports

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Front matter key for the listening count
pub const LISTENING_KEY: &str = "听课次数";
/// Front matter key for the dorm-check count
pub const DORM_CHECK_KEY: &str = "查宿次数";
/// Front matter key for the exam-proctoring count
pub const EXAM_PROCTOR_KEY: &str = "特种工监考";
/// Front matter key for the week number of weekly reports
pub const WEEK_KEY: &str = "周";

/// Keyword marking a dorm check in the miscellaneous section
pub const DORM_CHECK_KEYWORD: &str = "查宿";
/// Keyword marking exam proctoring in the miscellaneous section
pub const EXAM_PROCTOR_KEYWORD: &str = "监考";

/// Counters of one merged report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatterStats {
    /// `#### ` entries inside the listening section
    pub listening: u32,

    /// Dorm checks (`查宿`)
    pub dorm_checks: u32,

    /// Exam proctoring duties (`监考`)
    pub exam_proctoring: u32,
}

impl AddAssign for FrontMatterStats {
    fn add_assign(&mut self, other: Self) {
        self.listening += other.listening;
        self.dorm_checks += other.dorm_checks;
        self.exam_proctoring += other.exam_proctoring;
    }
}

impl std::iter::Sum for FrontMatterStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}
