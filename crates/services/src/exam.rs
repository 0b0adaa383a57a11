use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::Clock;
use quiz_core::model::{
    EXAM_DURATION_SECS, EXAM_SIZE, ExamSummary, Question, QuestionBank,
};

use crate::error::ExamError;

/// Externally visible phase of the exam state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamState {
    NotStarted,
    InProgress,
    Submitted,
}

/// View of the current exam question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamCard<'a> {
    pub question: &'a Question,
    /// Zero-based position within the sampled attempt.
    pub position: usize,
    pub total: usize,
    /// The answer currently recorded for this position, if any.
    pub selected: Option<usize>,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// Outcome of a single timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    /// Attempt still running; remaining whole seconds.
    Running { remaining_secs: i64 },
    /// Time passed below zero; the attempt was auto-submitted.
    Expired(ExamSummary),
    /// No attempt in progress. Ticking outside `InProgress` is a no-op.
    Idle,
}

struct Attempt {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    cursor: usize,
    remaining_secs: i64,
    started_at: DateTime<Utc>,
}

enum Phase {
    NotStarted,
    InProgress(Attempt),
    Submitted(ExamSummary),
}

/// Timed mock exam: `NotStarted → InProgress → Submitted`.
///
/// Samples [`EXAM_SIZE`] questions without replacement (the whole bank,
/// shuffled, when it is smaller), counts down from
/// [`EXAM_DURATION_SECS`], and scores on submit. `tick` is a pure state
/// transition; the wall-clock driver lives in [`crate::timer`].
pub struct MockExam {
    clock: Clock,
    phase: Phase,
}

impl MockExam {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            phase: Phase::NotStarted,
        }
    }

    #[must_use]
    pub fn state(&self) -> ExamState {
        match &self.phase {
            Phase::NotStarted => ExamState::NotStarted,
            Phase::InProgress(_) => ExamState::InProgress,
            Phase::Submitted(_) => ExamState::Submitted,
        }
    }

    /// Start a fresh attempt from the bank.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::AlreadyRunning` unless the machine sits in
    /// `NotStarted`, and `ExamError::EmptyBank` when there is nothing to
    /// sample.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<(), ExamError> {
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(ExamError::AlreadyRunning);
        }
        if bank.is_empty() {
            return Err(ExamError::EmptyBank);
        }

        let mut questions: Vec<Question> = bank.iter().cloned().collect();
        questions.shuffle(rng);
        questions.truncate(EXAM_SIZE);

        let answers = vec![None; questions.len()];
        self.phase = Phase::InProgress(Attempt {
            questions,
            answers,
            cursor: 0,
            remaining_secs: EXAM_DURATION_SECS,
            started_at: self.clock.now(),
        });
        Ok(())
    }

    /// Start a fresh attempt using the thread-local generator.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MockExam::start`].
    pub fn start_default(&mut self, bank: &QuestionBank) -> Result<(), ExamError> {
        self.start(bank, &mut rand::rng())
    }

    /// Record (or overwrite) the answer at a position. Answers stay
    /// changeable until submit.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotRunning` outside `InProgress`,
    /// `ExamError::OutOfBounds` for a bad position, and
    /// `ExamError::InvalidOption` for an option the question lacks.
    pub fn select_answer(&mut self, position: usize, option: usize) -> Result<(), ExamError> {
        let Phase::InProgress(attempt) = &mut self.phase else {
            return Err(ExamError::NotRunning);
        };
        let total = attempt.questions.len();
        let Some(question) = attempt.questions.get(position) else {
            return Err(ExamError::OutOfBounds { position, total });
        };
        if option >= question.options().len() {
            return Err(ExamError::InvalidOption {
                option,
                options: question.options().len(),
            });
        }
        attempt.answers[position] = Some(option);
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// When the remaining time passes below zero the attempt is submitted
    /// automatically, exactly once. Outside `InProgress` this is a no-op.
    pub fn tick(&mut self) -> Tick {
        let Phase::InProgress(attempt) = &mut self.phase else {
            return Tick::Idle;
        };

        attempt.remaining_secs -= 1;
        let remaining_secs = attempt.remaining_secs;
        if remaining_secs < 0 {
            // submit() cannot fail here: we are provably InProgress and the
            // summary invariants hold by construction.
            match self.submit() {
                Ok(summary) => Tick::Expired(summary),
                Err(_) => Tick::Idle,
            }
        } else {
            Tick::Running { remaining_secs }
        }
    }

    /// Stop the attempt and score it. Final; the summary survives until
    /// `restart`.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotRunning` outside `InProgress`; a second
    /// submit on the same attempt is rejected.
    pub fn submit(&mut self) -> Result<ExamSummary, ExamError> {
        let Phase::InProgress(attempt) = &self.phase else {
            return Err(ExamError::NotRunning);
        };

        let score = attempt
            .questions
            .iter()
            .zip(&attempt.answers)
            .filter(|(question, answer)| **answer == Some(question.correct_answer()))
            .count();

        let summary = ExamSummary::new(
            score,
            attempt.questions.len(),
            attempt.started_at,
            self.clock.now(),
        )?;
        self.phase = Phase::Submitted(summary.clone());
        Ok(summary)
    }

    /// Discard the attempt and return to `NotStarted`.
    pub fn restart(&mut self) {
        self.phase = Phase::NotStarted;
    }

    /// Move the cursor forward. Clamped; never changes machine state.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotRunning` outside `InProgress`.
    pub fn next(&mut self) -> Result<bool, ExamError> {
        let Phase::InProgress(attempt) = &mut self.phase else {
            return Err(ExamError::NotRunning);
        };
        if attempt.cursor + 1 < attempt.questions.len() {
            attempt.cursor += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Move the cursor back. Clamped; never changes machine state.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::NotRunning` outside `InProgress`.
    pub fn previous(&mut self) -> Result<bool, ExamError> {
        let Phase::InProgress(attempt) = &mut self.phase else {
            return Err(ExamError::NotRunning);
        };
        if attempt.cursor > 0 {
            attempt.cursor -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// View of the question under the cursor while `InProgress`.
    #[must_use]
    pub fn current(&self) -> Option<ExamCard<'_>> {
        let Phase::InProgress(attempt) = &self.phase else {
            return None;
        };
        let question = attempt.questions.get(attempt.cursor)?;
        Some(ExamCard {
            question,
            position: attempt.cursor,
            total: attempt.questions.len(),
            selected: attempt.answers[attempt.cursor],
            can_go_previous: attempt.cursor > 0,
            can_go_next: attempt.cursor + 1 < attempt.questions.len(),
        })
    }

    #[must_use]
    pub fn remaining_secs(&self) -> Option<i64> {
        match &self.phase {
            Phase::InProgress(attempt) => Some(attempt.remaining_secs),
            _ => None,
        }
    }

    /// Countdown as `MM:SS`, clamped at `00:00`.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        let secs = self.remaining_secs().unwrap_or(0).max(0);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// The final summary once `Submitted`.
    #[must_use]
    pub fn summary(&self) -> Option<&ExamSummary> {
        match &self.phase {
            Phase::Submitted(summary) => Some(summary),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{PASS_MARK, QuestionIndex};
    use quiz_core::time::fixed_clock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(index: u32) -> Question {
        Question::new(
            QuestionIndex::new(index),
            "A",
            format!("Q{index}?"),
            vec!["a".into(), "b".into(), "c".into()],
            (index as usize) % 3,
            "",
        )
        .unwrap()
    }

    fn bank(size: u32) -> QuestionBank {
        QuestionBank::new((1..=size).map(question).collect()).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn started(size: u32) -> MockExam {
        let mut exam = MockExam::new(fixed_clock());
        exam.start(&bank(size), &mut rng()).unwrap();
        exam
    }

    #[test]
    fn start_samples_forty_without_replacement() {
        let exam = started(100);
        let card = exam.current().unwrap();
        assert_eq!(card.total, EXAM_SIZE);
        assert_eq!(exam.remaining_secs(), Some(EXAM_DURATION_SECS));

        // No duplicates in the sample.
        let mut exam = exam;
        let mut seen = std::collections::HashSet::new();
        loop {
            seen.insert(exam.current().unwrap().question.index());
            if !exam.next().unwrap() {
                break;
            }
        }
        assert_eq!(seen.len(), EXAM_SIZE);
    }

    #[test]
    fn start_default_samples_with_the_thread_rng() {
        let mut exam = MockExam::new(fixed_clock());
        exam.start_default(&bank(100)).unwrap();
        assert_eq!(exam.current().unwrap().total, EXAM_SIZE);
    }

    #[test]
    fn small_bank_yields_a_smaller_attempt() {
        let exam = started(10);
        assert_eq!(exam.current().unwrap().total, 10);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut exam = started(10);
        let err = exam.start(&bank(10), &mut rng()).unwrap_err();
        assert_eq!(err, ExamError::AlreadyRunning);
    }

    #[test]
    fn answers_stay_changeable_until_submit() {
        let mut exam = started(10);
        exam.select_answer(0, 1).unwrap();
        exam.select_answer(0, 2).unwrap();
        assert_eq!(exam.current().unwrap().selected, Some(2));
    }

    #[test]
    fn select_answer_is_bounds_checked() {
        let mut exam = started(10);
        assert!(matches!(
            exam.select_answer(10, 0).unwrap_err(),
            ExamError::OutOfBounds { .. }
        ));
        assert!(matches!(
            exam.select_answer(0, 3).unwrap_err(),
            ExamError::InvalidOption { .. }
        ));
    }

    #[test]
    fn submit_scores_recorded_answers() {
        let mut exam = started(10);
        // Answer every question correctly.
        loop {
            let correct = exam.current().unwrap().question.correct_answer();
            let position = exam.current().unwrap().position;
            exam.select_answer(position, correct).unwrap();
            if !exam.next().unwrap() {
                break;
            }
        }

        let summary = exam.submit().unwrap();
        assert_eq!(summary.score(), 10);
        assert_eq!(summary.total(), 10);
        assert_eq!(exam.state(), ExamState::Submitted);
        // 10 < PASS_MARK, so a full score on a small bank still fails.
        assert!(summary.score() < PASS_MARK);
        assert!(!summary.passed());
    }

    #[test]
    fn unanswered_positions_score_zero() {
        let mut exam = started(10);
        let summary = exam.submit().unwrap();
        assert_eq!(summary.score(), 0);
    }

    #[test]
    fn second_submit_is_rejected() {
        let mut exam = started(10);
        exam.submit().unwrap();
        assert_eq!(exam.submit().unwrap_err(), ExamError::NotRunning);
    }

    #[test]
    fn tick_expires_into_auto_submit_exactly_once() {
        let mut exam = started(10);
        for expected in (0..EXAM_DURATION_SECS).rev() {
            match exam.tick() {
                Tick::Running { remaining_secs } => assert_eq!(remaining_secs, expected),
                other => panic!("unexpected tick outcome: {other:?}"),
            }
        }
        // Remaining is now 0; the next tick passes below zero and submits.
        let Tick::Expired(summary) = exam.tick() else {
            panic!("expected expiry");
        };
        assert_eq!(summary.score(), 0);
        assert_eq!(exam.state(), ExamState::Submitted);

        // Further ticks are no-ops.
        assert_eq!(exam.tick(), Tick::Idle);
    }

    #[test]
    fn tick_before_start_is_idle() {
        let mut exam = MockExam::new(fixed_clock());
        assert_eq!(exam.tick(), Tick::Idle);
    }

    #[test]
    fn navigation_is_clamped_and_state_preserving() {
        let mut exam = started(3);
        assert!(!exam.previous().unwrap());
        assert!(exam.next().unwrap());
        assert!(exam.next().unwrap());
        assert!(!exam.next().unwrap());
        assert_eq!(exam.state(), ExamState::InProgress);
    }

    #[test]
    fn navigation_outside_in_progress_is_rejected() {
        let mut exam = MockExam::new(fixed_clock());
        assert_eq!(exam.next().unwrap_err(), ExamError::NotRunning);
        let mut exam = started(3);
        exam.submit().unwrap();
        assert_eq!(exam.previous().unwrap_err(), ExamError::NotRunning);
    }

    #[test]
    fn restart_discards_the_attempt() {
        let mut exam = started(10);
        exam.select_answer(0, 0).unwrap();
        exam.restart();
        assert_eq!(exam.state(), ExamState::NotStarted);
        assert!(exam.current().is_none());
        assert!(exam.summary().is_none());

        // A new attempt can start after restart.
        exam.start(&bank(10), &mut rng()).unwrap();
        assert_eq!(exam.state(), ExamState::InProgress);
    }

    #[test]
    fn format_remaining_renders_mm_ss() {
        let mut exam = started(10);
        assert_eq!(exam.format_remaining(), "30:00");
        exam.tick();
        assert_eq!(exam.format_remaining(), "29:59");
        exam.restart();
        assert_eq!(exam.format_remaining(), "00:00");
    }
}
