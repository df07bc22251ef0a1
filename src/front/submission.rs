//! Payment form submissions being processed or already paid, shared by every worker

use derive_more::{Display, Error};
use std::{
    collections::{HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};
use uuid::Uuid;

/// Paid submission ids remembered before the oldest is forgotten
const COMPLETED_CAPACITY: usize = 4096;

#[derive(Debug, Display, Error, PartialEq)]
pub enum SubmissionRefused {
    #[display("submission already in flight")]
    InFlight,
    #[display("submission already paid")]
    Completed,
}

#[derive(Default)]
struct Registry {
    in_flight: HashSet<Uuid>,
    completed: HashSet<Uuid>,
    completed_order: VecDeque<Uuid>,
}

impl Registry {
    fn mark_completed(&mut self, submission_id: Uuid) {
        if !self.completed.insert(submission_id) {
            return;
        }

        self.completed_order.push_back(submission_id);
        while self.completed_order.len() > COMPLETED_CAPACITY {
            if let Some(oldest) = self.completed_order.pop_front() {
                self.completed.remove(&oldest);
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct InFlightSubmissions {
    registry: Arc<Mutex<Registry>>,
}

impl InFlightSubmissions {
    fn lock(&self) -> MutexGuard<'_, Registry> {
        // the sets stay consistent even if a holder panicked
        self.registry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks `submission_id` as in flight. Refused while the same id is still being
    /// processed or once it has been paid
    pub fn try_begin(&self, submission_id: Uuid) -> Result<SubmissionPermit, SubmissionRefused> {
        let mut registry = self.lock();
        if registry.completed.contains(&submission_id) {
            return Err(SubmissionRefused::Completed);
        }
        if !registry.in_flight.insert(submission_id) {
            return Err(SubmissionRefused::InFlight);
        }

        Ok(SubmissionPermit {
            submissions: self.clone(),
            submission_id,
        })
    }

    pub fn is_in_flight(&self, submission_id: &Uuid) -> bool {
        self.lock().in_flight.contains(submission_id)
    }

    pub fn is_completed(&self, submission_id: &Uuid) -> bool {
        self.lock().completed.contains(submission_id)
    }
}

/// Releases the submission id when dropped
pub struct SubmissionPermit {
    submissions: InFlightSubmissions,
    submission_id: Uuid,
}

impl SubmissionPermit {
    /// The payment went through, the same form is never processed again
    pub fn complete(self) {
        self.submissions.lock().mark_completed(self.submission_id);
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.submissions.lock().in_flight.remove(&self.submission_id);
    }
}
