//! One fetch, validate, compare and notify iteration.

use crate::api::HomeworkApi;
use crate::errors::CycleError;
use crate::format::{parse_status, render};
use crate::models::{LoopState, StatusCode};
use crate::response::extract_latest;
use crate::telegram::Notifier;

/// Result of a cycle that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing new to report; state is unchanged.
    NoChange,
    /// The transition was delivered; `next` replaces the loop state.
    Notified { status: StatusCode, next: LoopState },
    /// A transition was detected but the send failed. State is unchanged so
    /// the next poll retries the notification.
    DeliveryFailed { status: StatusCode },
}

/// Collaborators needed to run a cycle.
pub struct PollCycle<A, N> {
    api: A,
    notifier: N,
    chat_id: String,
}

impl<A: HomeworkApi, N: Notifier> PollCycle<A, N> {
    pub fn new(api: A, notifier: N, chat_id: impl Into<String>) -> Self {
        Self {
            api,
            notifier,
            chat_id: chat_id.into(),
        }
    }

    /// Run one cycle against `state`.
    ///
    /// `now` (unix seconds) becomes the next `from_date` after a confirmed
    /// notification. Delivery failures are logged here and reported as
    /// [`CycleOutcome::DeliveryFailed`]; every other failure is returned.
    pub fn run_once(&self, state: &LoopState, now: i64) -> Result<CycleOutcome, CycleError> {
        let response = self.api.fetch(state.last_poll_timestamp)?;

        let Some(item) = extract_latest(&response)? else {
            tracing::debug!("No updates");
            return Ok(CycleOutcome::NoChange);
        };

        if item.matches(state.last_notified_status) {
            tracing::debug!(status = ?item.status, "No updates");
            return Ok(CycleOutcome::NoChange);
        }

        let (name, status) = parse_status(&item)?;
        let message = render(name, status);

        match self.notifier.send(&self.chat_id, &message) {
            Ok(()) => {
                tracing::info!(homework = name, %status, "Update check completed");
                Ok(CycleOutcome::Notified {
                    status,
                    next: state.notified(status, now),
                })
            }
            Err(e) => {
                tracing::error!(
                    severity = "critical",
                    error = %e,
                    homework = name,
                    %status,
                    "Failed to send status notification"
                );
                Ok(CycleOutcome::DeliveryFailed { status })
            }
        }
    }
}
