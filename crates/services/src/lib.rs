#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_service;
pub mod error;
pub mod exam;
pub mod practice;
pub mod progress_service;
pub mod stars;
pub mod timer;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use bank_service::BankLoader;
pub use error::{AppServicesError, BankLoadError, ExamError, PracticeError};
pub use exam::{ExamCard, ExamState, MockExam, Tick};
pub use practice::{AnswerFeedback, PracticeCard, PracticeSession};
pub use progress_service::ProgressService;
pub use stars::{ResolvedBookmark, StarService};
pub use timer::ExamTimer;
