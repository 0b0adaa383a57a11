use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::exam::{MockExam, Tick};

/// Wall-clock driver for the exam countdown.
///
/// Ticks the shared exam once per second and stops on its own when the
/// attempt expires or is no longer running. Dropping or cancelling the
/// timer aborts the task, so no tick outlives the attempt it belonged to:
/// submit, restart, and navigating away all just drop their timer.
pub struct ExamTimer {
    handle: JoinHandle<()>,
}

impl ExamTimer {
    /// Spawn a ticking task against the shared exam.
    #[must_use]
    pub fn spawn(exam: Arc<Mutex<MockExam>>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first interval tick completes immediately; skip it so the
            // countdown moves one second after spawn, not at spawn.
            interval.tick().await;
            loop {
                interval.tick().await;
                let outcome = exam.lock().await.tick();
                match outcome {
                    Tick::Running { .. } => {}
                    Tick::Expired(summary) => {
                        debug!(score = summary.score(), "exam expired, auto-submitted");
                        break;
                    }
                    Tick::Idle => break,
                }
            }
        });
        Self { handle }
    }

    /// Stop the ticking task.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// True once the task has stopped, whether by expiry or cancellation.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ExamTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
