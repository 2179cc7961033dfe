//! Study schedule generation.
//!
//! Given subjects, the tasks that must be kept (fixed or completed) and a
//! daily time budget, the planner produces day-by-day study tasks:
//! - Each subject needs minutes proportional to its difficulty
//! - Days are walked forward from `today`, up to a fixed horizon
//! - Within a day, eligible subjects are served round-robin in 30-minute
//!   slots, nearest test date first and harder subjects first on ties
//! - Daily capacity and the per-day subject cap include preserved tasks
//!
//! This is a greedy heuristic. Work that does not fit before a subject's
//! test date, or within the horizon, is left unscheduled and reported in
//! the [`PlanSummary`] rather than as an error.

mod allocator;
mod capacity;
mod merge;
mod workload;

pub use capacity::{capacity_minutes, preserved_load, DayLoad};
pub use merge::{merge, preserved_tasks};
pub use workload::{
    preserved_minutes, remaining_minutes, required_minutes, total_minutes_needed,
    MINUTES_PER_DIFFICULTY,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{Settings, StudyTask, Subject};

/// Planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Slot size handed out per round-robin turn (minutes)
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    /// How many days forward to search for capacity
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Required study minutes per difficulty point
    #[serde(default = "default_minutes_per_difficulty")]
    pub minutes_per_difficulty: u32,
}

fn default_slot_minutes() -> u32 {
    30
}
fn default_horizon_days() -> u32 {
    365
}
fn default_minutes_per_difficulty() -> u32 {
    MINUTES_PER_DIFFICULTY
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            horizon_days: default_horizon_days(),
            minutes_per_difficulty: default_minutes_per_difficulty(),
        }
    }
}

/// A planned study block without identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedTask {
    pub subject_id: String,
    pub date: NaiveDate,
    pub planned_minutes: u32,
}

impl PlannedTask {
    /// Materialize as an auto-generated task with a fresh id.
    pub fn into_task(self) -> StudyTask {
        StudyTask::generated(self.subject_id, self.date, self.planned_minutes)
    }
}

/// Per-subject outcome of a planning run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectPlan {
    pub subject_id: String,
    pub required_minutes: u32,
    pub preserved_minutes: u32,
    pub planned_minutes: u32,
    /// Minutes that found no room before the test date or horizon.
    pub unscheduled_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanSummary {
    pub today: NaiveDate,
    pub days_walked: u32,
    pub tasks_created: usize,
    pub subjects: Vec<SubjectPlan>,
}

impl PlanSummary {
    pub fn is_complete(&self) -> bool {
        self.subjects.iter().all(|s| s.unscheduled_minutes == 0)
    }
}

/// Greedy study planner.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan study blocks. Deterministic for identical inputs.
    ///
    /// `preserved` should hold only fixed or completed tasks; anything else
    /// is ignored.
    pub fn plan(
        &self,
        subjects: &[Subject],
        preserved: &[StudyTask],
        settings: &Settings,
        today: NaiveDate,
    ) -> Vec<PlannedTask> {
        self.plan_with_summary(subjects, preserved, settings, today).0
    }

    /// Plan and report how much of each subject's need was covered.
    pub fn plan_with_summary(
        &self,
        subjects: &[Subject],
        preserved: &[StudyTask],
        settings: &Settings,
        today: NaiveDate,
    ) -> (Vec<PlannedTask>, PlanSummary) {
        let mpd = self.config.minutes_per_difficulty;
        let mut work = workload::pending_work(subjects, preserved, mpd);
        let load = preserved_load(preserved);

        let allocation = allocator::allocate(&mut work, &load, settings, today, &self.config);

        let mut tasks = allocation.tasks;
        tasks.sort_by_key(|t| t.date);

        let subject_plans: Vec<SubjectPlan> = subjects
            .iter()
            .map(|subject| {
                let planned = tasks
                    .iter()
                    .filter(|t| t.subject_id == subject.id)
                    .map(|t| t.planned_minutes)
                    .sum();
                let unscheduled = work
                    .iter()
                    .find(|w| w.subject_id() == subject.id)
                    .map_or(0, |w| w.minutes_needed);
                SubjectPlan {
                    subject_id: subject.id.clone(),
                    required_minutes: required_minutes(subject.difficulty, mpd),
                    preserved_minutes: preserved_minutes(&subject.id, preserved),
                    planned_minutes: planned,
                    unscheduled_minutes: unscheduled,
                }
            })
            .collect();

        let summary = PlanSummary {
            today,
            days_walked: allocation.days_walked,
            tasks_created: tasks.len(),
            subjects: subject_plans,
        };

        tracing::info!(
            "plan from {}: {} task(s) over {} day(s), {} subject(s) left unscheduled",
            today,
            summary.tasks_created,
            summary.days_walked,
            summary
                .subjects
                .iter()
                .filter(|s| s.unscheduled_minutes > 0)
                .count()
        );

        (tasks, summary)
    }

    /// Plan and materialize new auto-generated tasks with fresh ids.
    pub fn generate(
        &self,
        subjects: &[Subject],
        preserved: &[StudyTask],
        settings: &Settings,
        today: NaiveDate,
    ) -> Vec<StudyTask> {
        self.plan(subjects, preserved, settings, today)
            .into_iter()
            .map(PlannedTask::into_task)
            .collect()
    }

    /// Rebuild a whole schedule: keep fixed and completed tasks, replace the
    /// rest with a fresh plan.
    pub fn regenerate(
        &self,
        subjects: &[Subject],
        schedule: &[StudyTask],
        settings: &Settings,
        today: NaiveDate,
    ) -> (Vec<StudyTask>, PlanSummary) {
        let preserved = preserved_tasks(schedule);
        let (planned, summary) = self.plan_with_summary(subjects, &preserved, settings, today);
        let new_tasks = planned.into_iter().map(PlannedTask::into_task).collect();
        (merge(preserved, new_tasks), summary)
    }
}

/// Generate new tasks with the default planner configuration.
pub fn generate_schedule(
    subjects: &[Subject],
    preserved: &[StudyTask],
    settings: &Settings,
    today: NaiveDate,
) -> Vec<StudyTask> {
    Planner::new().generate(subjects, preserved, settings, today)
}
