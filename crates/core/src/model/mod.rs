mod bank;
mod exam;
mod ids;
mod progress;
mod question;

pub use bank::{BankError, QuestionBank, SectionFilter};
pub use exam::{EXAM_DURATION_SECS, EXAM_SIZE, ExamSummary, ExamSummaryError, PASS_MARK};
pub use ids::{ParseIdError, QuestionIndex};
pub use progress::{Bookmark, ParseThemeError, SolvedSet, StarredSet, Theme};
pub use question::{Question, QuestionError};
