use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One day's study assignment for one subject.
///
/// Auto-generated tasks are replaced on every regeneration. Fixed and
/// completed tasks survive regenerations untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyTask {
    pub id: String,
    pub subject_id: String,
    pub date: NaiveDate,
    pub planned_minutes: u32,
    #[serde(default)]
    pub completed: bool,
    /// Minutes actually studied. Only meaningful once completed.
    #[serde(default)]
    pub actual_minutes: u32,
    /// Pinned by the user; never touched by the planner.
    #[serde(default)]
    pub is_fixed: bool,
}

impl StudyTask {
    /// Create an auto-generated task with a fresh id.
    pub fn generated(subject_id: impl Into<String>, date: NaiveDate, planned_minutes: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: subject_id.into(),
            date,
            planned_minutes,
            completed: false,
            actual_minutes: 0,
            is_fixed: false,
        }
    }

    /// Create a user-pinned task.
    pub fn fixed(
        subject_id: impl Into<String>,
        date: NaiveDate,
        planned_minutes: u32,
    ) -> Result<Self, ValidationError> {
        if planned_minutes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "planned_minutes".into(),
                message: "must be positive".into(),
            });
        }
        let mut task = Self::generated(subject_id, date, planned_minutes);
        task.is_fixed = true;
        Ok(task)
    }

    /// Fixed or completed: the planner keeps these as they are.
    pub fn is_preserved(&self) -> bool {
        self.is_fixed || self.completed
    }

    /// Minutes this task contributes toward its subject's workload.
    pub fn allocated_minutes(&self) -> u32 {
        if self.completed {
            self.actual_minutes
        } else {
            self.planned_minutes
        }
    }

    /// Record completion. A task completes exactly once.
    pub fn complete(&mut self, actual_minutes: u32) -> Result<(), TaskTransitionError> {
        if self.completed {
            return Err(TaskTransitionError::AlreadyCompleted {
                task_id: self.id.clone(),
            });
        }
        if actual_minutes == 0 {
            return Err(TaskTransitionError::InvalidMinutes {
                task_id: self.id.clone(),
            });
        }
        self.completed = true;
        self.actual_minutes = actual_minutes;
        Ok(())
    }

    pub fn pin(&mut self) {
        self.is_fixed = true;
    }

    /// Unpinned, not-completed tasks are dropped by the next regeneration.
    pub fn unpin(&mut self) {
        self.is_fixed = false;
    }
}

/// Error returned by an invalid task state change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskTransitionError {
    #[error("task {task_id} is already completed")]
    AlreadyCompleted { task_id: String },
    #[error("task {task_id}: actual minutes must be positive")]
    InvalidMinutes { task_id: String },
}
