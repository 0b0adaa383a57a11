use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::QuestionBank;
use storage::progress_repo::ProgressRepo;
use storage::sqlite::SqliteStore;
use storage::store::{InMemoryStore, StateStore};

use crate::bank_service::BankLoader;
use crate::error::AppServicesError;
use crate::exam::MockExam;
use crate::practice::PracticeSession;
use crate::progress_service::ProgressService;
use crate::stars::StarService;

/// Assembles the bank and session services over one persistence backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    bank: Arc<QuestionBank>,
    progress: ProgressService,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, loading the bank from
    /// `bank_source` (URL or path).
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the bank
    /// load fails. The bank load is the fatal boundary: there is no
    /// degraded mode without questions.
    pub async fn new_sqlite(
        db_url: &str,
        bank_source: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let store = SqliteStore::open(db_url).await?;
        Self::with_store(Arc::new(store), bank_source, clock).await
    }

    /// Build services over an in-memory store, for tests and ephemeral runs.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the bank load fails.
    pub async fn new_in_memory(
        bank_source: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        Self::with_store(Arc::new(InMemoryStore::new()), bank_source, clock).await
    }

    async fn with_store(
        store: Arc<dyn StateStore>,
        bank_source: &str,
        clock: Clock,
    ) -> Result<Self, AppServicesError> {
        let bank = BankLoader::new().load(bank_source).await?;
        Ok(Self::from_parts(Arc::new(bank), store, clock))
    }

    /// Assemble directly from an already-loaded bank and store.
    #[must_use]
    pub fn from_parts(bank: Arc<QuestionBank>, store: Arc<dyn StateStore>, clock: Clock) -> Self {
        let progress = ProgressService::new(ProgressRepo::new(store));
        Self {
            clock,
            bank,
            progress,
        }
    }

    #[must_use]
    pub fn bank(&self) -> Arc<QuestionBank> {
        Arc::clone(&self.bank)
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// A practice session rehydrated with persisted solved state.
    pub async fn practice_session(&self) -> PracticeSession {
        let solved = self.progress.load_solved(&self.bank).await;
        PracticeSession::new(Arc::clone(&self.bank), solved)
    }

    /// A star/bookmark service rehydrated with persisted state.
    pub async fn star_service(&self) -> StarService {
        let starred = self.progress.load_starred(&self.bank).await;
        let bookmark = self.progress.load_bookmark().await;
        StarService::new(Arc::clone(&self.bank), starred, bookmark)
    }

    /// A fresh mock exam, not yet started.
    #[must_use]
    pub fn mock_exam(&self) -> MockExam {
        MockExam::new(self.clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionIndex};
    use quiz_core::time::fixed_clock;

    fn bank() -> Arc<QuestionBank> {
        let questions = (1..=4)
            .map(|i| {
                Question::new(
                    QuestionIndex::new(i),
                    "A",
                    format!("Q{i}"),
                    vec!["a".into(), "b".into()],
                    0,
                    "",
                )
                .unwrap()
            })
            .collect();
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    #[tokio::test]
    async fn sessions_share_persisted_state_through_the_store() {
        let services = AppServices::from_parts(
            bank(),
            Arc::new(InMemoryStore::new()),
            fixed_clock(),
        );

        // Solve a question and persist it the way a frontend would.
        let mut practice = services.practice_session().await;
        let feedback = practice.answer(0).unwrap();
        assert!(feedback.newly_solved);
        services.progress().save_solved(practice.solved()).await;

        // A later session sees the solved state.
        let practice = services.practice_session().await;
        assert!(practice.current().unwrap().already_solved);
    }

    #[tokio::test]
    async fn star_service_round_trips_through_the_store() {
        let services = AppServices::from_parts(
            bank(),
            Arc::new(InMemoryStore::new()),
            fixed_clock(),
        );

        let mut stars = services.star_service().await;
        stars.toggle_star(QuestionIndex::new(3));
        services.progress().save_starred(stars.starred()).await;

        let stars = services.star_service().await;
        assert!(stars.is_starred(QuestionIndex::new(3)));
    }
}
