//! Run lifecycle bookkeeping kept by the coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::record::ResultRecord;

/// Lifecycle state for a trial run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Aggregate status of one coordinated set of trials.
///
/// Owned solely by the coordinator; workers never see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub id: Uuid,
    pub num_trials: usize,
    pub state: RunState,
    pub trials_completed: usize,
    /// Best record so far; the network statistic is maximized.
    pub best: Option<ResultRecord>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl RunStatus {
    pub fn new(num_trials: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            num_trials,
            state: RunState::Pending,
            trials_completed: 0,
            best: None,
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.state = RunState::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self) {
        self.state = RunState::Completed;
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: String) {
        self.state = RunState::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error);
    }

    /// Count one finished trial and fold it into the best-so-far.
    pub fn record_completed(&mut self, record: &ResultRecord) {
        self.trials_completed += 1;
        self.update_best(record);
    }

    /// Replace the best record if `record` carries a strictly stronger
    /// statistic. A NaN statistic never displaces a real one, but a run
    /// producing only NaN still reports a best.
    pub fn update_best(&mut self, record: &ResultRecord) {
        let improved = match &self.best {
            None => true,
            Some(best) => {
                if record.network_statistic.is_nan() {
                    false
                } else if best.network_statistic.is_nan() {
                    true
                } else {
                    record.network_statistic > best.network_statistic
                }
            }
        };
        if improved {
            self.best = Some(*record);
        }
    }

    pub fn all_trials_done(&self) -> bool {
        self.trials_completed == self.num_trials
    }
}
