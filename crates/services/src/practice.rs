use std::sync::Arc;

use quiz_core::model::{Question, QuestionBank, QuestionIndex, SectionFilter, SolvedSet};

use crate::error::PracticeError;

/// View of the current practice question, as navigation sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeCard<'a> {
    pub question: &'a Question,
    /// Zero-based position within the filtered list.
    pub position: usize,
    /// Length of the filtered list.
    pub total: usize,
    /// The question was answered correctly in some earlier pass. The correct
    /// option is disclosed on render; per-option feedback still needs a
    /// fresh answer.
    pub already_solved: bool,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

/// Outcome of answering the current practice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct_option: usize,
    pub is_correct: bool,
    pub explanation: String,
    /// True when this answer added the question to the solved set,
    /// i.e. the set changed and wants persisting.
    pub newly_solved: bool,
}

/// Sequential practice over the bank, restricted by a section filter.
///
/// Position is always a cursor into the filtered list; the stable
/// [`QuestionIndex`] is only used for jumps, solving, and starring.
pub struct PracticeSession {
    bank: Arc<QuestionBank>,
    filter: SectionFilter,
    filtered: Vec<QuestionIndex>,
    position: usize,
    solved: SolvedSet,
    answered: bool,
}

impl PracticeSession {
    /// Create a session over the whole bank with previously solved state.
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, solved: SolvedSet) -> Self {
        let filtered = bank.iter().map(Question::index).collect();
        Self {
            bank,
            filter: SectionFilter::All,
            filtered,
            position: 0,
            solved,
            answered: false,
        }
    }

    #[must_use]
    pub fn filter(&self) -> &SectionFilter {
        &self.filter
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn solved(&self) -> &SolvedSet {
        &self.solved
    }

    /// Restrict the working list and reset the cursor to its start.
    pub fn set_filter(&mut self, filter: SectionFilter) {
        self.filtered = self
            .bank
            .filtered(&filter)
            .into_iter()
            .map(Question::index)
            .collect();
        self.filter = filter;
        self.position = 0;
        self.answered = false;
    }

    /// Restore a filter and cursor together, e.g. from a resolved bookmark.
    ///
    /// The position is clamped into the new working list.
    pub fn restore(&mut self, filter: SectionFilter, position: usize) {
        self.set_filter(filter);
        if !self.filtered.is_empty() {
            self.position = position.min(self.filtered.len() - 1);
        }
    }

    /// Jump to a question by its stable index.
    ///
    /// The search covers the full bank, not the filtered list; a hit
    /// switches the filter to [`SectionFilter::All`].
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NotFound` when the bank has no such question;
    /// filter and cursor are left untouched.
    pub fn jump_to(&mut self, index: QuestionIndex) -> Result<(), PracticeError> {
        let Some(position) = self.bank.position_of(index) else {
            return Err(PracticeError::NotFound(index));
        };
        self.set_filter(SectionFilter::All);
        self.position = position;
        Ok(())
    }

    /// The current question view, if the filtered list is non-empty.
    #[must_use]
    pub fn current(&self) -> Option<PracticeCard<'_>> {
        let index = *self.filtered.get(self.position)?;
        let question = self.bank.get(index)?;
        Some(PracticeCard {
            question,
            position: self.position,
            total: self.filtered.len(),
            already_solved: self.solved.contains(index),
            can_go_previous: self.position > 0,
            can_go_next: self.position + 1 < self.filtered.len(),
        })
    }

    /// Answer the current question. One answer per question instance; the
    /// latch releases on any navigation.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::NoQuestion` with an empty working list,
    /// `PracticeError::AlreadyAnswered` on a second answer, and
    /// `PracticeError::InvalidOption` for an out-of-range option.
    pub fn answer(&mut self, option: usize) -> Result<AnswerFeedback, PracticeError> {
        if self.answered {
            return Err(PracticeError::AlreadyAnswered);
        }
        let index = *self
            .filtered
            .get(self.position)
            .ok_or(PracticeError::NoQuestion)?;
        let question = self.bank.get(index).ok_or(PracticeError::NoQuestion)?;
        if option >= question.options().len() {
            return Err(PracticeError::InvalidOption {
                option,
                options: question.options().len(),
            });
        }

        self.answered = true;
        let is_correct = question.is_correct(option);
        let newly_solved = is_correct && self.solved.insert(index);

        Ok(AnswerFeedback {
            selected: option,
            correct_option: question.correct_answer(),
            is_correct,
            explanation: question.explanation().to_string(),
            newly_solved,
        })
    }

    /// Move to the next question. Clamped at the end of the filtered list.
    ///
    /// Returns true when the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.position + 1 < self.filtered.len() {
            self.position += 1;
            self.answered = false;
            true
        } else {
            false
        }
    }

    /// Move to the previous question. Clamped at the start.
    ///
    /// Returns true when the cursor moved.
    pub fn previous(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            self.answered = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Question;

    fn question(index: u32, section: &str, correct: usize) -> Question {
        Question::new(
            QuestionIndex::new(index),
            section,
            format!("Q{index}?"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            format!("E{index}"),
        )
        .unwrap()
    }

    fn bank() -> Arc<QuestionBank> {
        // Indices 1..=25 in section "A", 26..=50 in section "B".
        let questions = (1..=50)
            .map(|i| question(i, if i <= 25 { "A" } else { "B" }, 1))
            .collect();
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    fn session() -> PracticeSession {
        PracticeSession::new(bank(), SolvedSet::new())
    }

    #[test]
    fn filter_resets_position_to_start() {
        let mut session = session();
        session.next();
        session.next();
        session.set_filter(SectionFilter::Section("B".into()));

        let card = session.current().unwrap();
        assert_eq!(card.position, 0);
        assert_eq!(card.total, 25);
        assert_eq!(card.question.index(), QuestionIndex::new(26));
    }

    #[test]
    fn next_clamps_at_end_of_filtered_list() {
        let mut session = session();
        session.set_filter(SectionFilter::Section("B".into()));
        for _ in 0..24 {
            assert!(session.next());
        }
        let card = session.current().unwrap();
        assert_eq!(card.question.index(), QuestionIndex::new(50));
        assert!(!card.can_go_next);
        assert!(!session.next());
        assert_eq!(session.current().unwrap().position, 24);
    }

    #[test]
    fn previous_clamps_at_start() {
        let mut session = session();
        assert!(!session.previous());
        assert!(!session.current().unwrap().can_go_previous);
    }

    #[test]
    fn jump_switches_filter_to_all() {
        let mut session = session();
        session.set_filter(SectionFilter::Section("A".into()));
        session.jump_to(QuestionIndex::new(40)).unwrap();

        assert_eq!(session.filter(), &SectionFilter::All);
        let card = session.current().unwrap();
        assert_eq!(card.question.index(), QuestionIndex::new(40));
        assert_eq!(card.position, 39);
    }

    #[test]
    fn failed_jump_leaves_state_unchanged() {
        let mut session = session();
        session.set_filter(SectionFilter::Section("B".into()));
        session.next();

        let err = session.jump_to(QuestionIndex::new(99)).unwrap_err();
        assert_eq!(err, PracticeError::NotFound(QuestionIndex::new(99)));
        assert_eq!(session.filter(), &SectionFilter::Section("B".into()));
        assert_eq!(session.current().unwrap().position, 1);
    }

    #[test]
    fn correct_answer_marks_solved_once() {
        let mut session = session();
        let feedback = session.answer(1).unwrap();
        assert!(feedback.is_correct);
        assert!(feedback.newly_solved);
        assert_eq!(feedback.correct_option, 1);
        assert_eq!(feedback.explanation, "E1");
        assert!(session.solved().contains(QuestionIndex::new(1)));

        // Same question again after navigating away and back: solved set
        // does not change a second time.
        session.next();
        session.previous();
        let feedback = session.answer(1).unwrap();
        assert!(feedback.is_correct);
        assert!(!feedback.newly_solved);
    }

    #[test]
    fn wrong_answer_reveals_correct_option_without_solving() {
        let mut session = session();
        let feedback = session.answer(3).unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.selected, 3);
        assert_eq!(feedback.correct_option, 1);
        assert!(!session.solved().contains(QuestionIndex::new(1)));
    }

    #[test]
    fn second_answer_is_latched_until_navigation() {
        let mut session = session();
        session.answer(0).unwrap();
        assert_eq!(session.answer(1).unwrap_err(), PracticeError::AlreadyAnswered);

        assert!(session.next());
        session.answer(1).unwrap();
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut session = session();
        let err = session.answer(9).unwrap_err();
        assert_eq!(
            err,
            PracticeError::InvalidOption {
                option: 9,
                options: 4
            }
        );
        // A rejected answer does not consume the latch.
        session.answer(1).unwrap();
    }

    #[test]
    fn already_solved_flag_drives_prehighlight() {
        let mut solved = SolvedSet::new();
        solved.insert(QuestionIndex::new(1));
        let session = PracticeSession::new(bank(), solved);

        assert!(session.current().unwrap().already_solved);
    }

    #[test]
    fn restore_clamps_position_into_list() {
        let mut session = session();
        session.restore(SectionFilter::Section("A".into()), 99);
        assert_eq!(session.current().unwrap().position, 24);
    }
}
