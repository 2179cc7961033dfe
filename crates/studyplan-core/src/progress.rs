//! Daily check-in feedback and per-subject progress totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{StudyTask, Subject, TaskTransitionError};
use crate::planner::required_minutes;

/// Shortfall (minutes) at which a day counts as clearly behind.
pub const BEHIND_THRESHOLD_MINUTES: i64 = 60;

/// How a day's actual study time compares to its target.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Met or exceeded the target
    OnTrack,
    /// Short by less than an hour
    SlightlyBehind,
    /// Short by an hour or more
    Behind,
}

impl Verdict {
    pub fn from_diff(diff_minutes: i64) -> Self {
        if diff_minutes >= 0 {
            Verdict::OnTrack
        } else if diff_minutes > -BEHIND_THRESHOLD_MINUTES {
            Verdict::SlightlyBehind
        } else {
            Verdict::Behind
        }
    }

    /// User-facing feedback sentence for a day with this verdict.
    pub fn message(&self, diff_minutes: i64) -> String {
        let amount = format_minutes(diff_minutes.unsigned_abs());
        match self {
            Verdict::OnTrack if diff_minutes == 0 => {
                "Right on target. Keep this pace up to the test.".to_string()
            }
            Verdict::OnTrack => {
                format!("Great work: {amount} more than planned. Keep it up!")
            }
            Verdict::SlightlyBehind => {
                format!("Almost there. Make up the missing {amount} over the next days.")
            }
            Verdict::Behind => {
                format!("{amount} short today. Record it so the gap moves to the next days.")
            }
        }
    }
}

/// Target versus actual study time for one day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub target_minutes: u32,
    pub actual_minutes: u32,
    pub diff_minutes: i64,
    pub verdict: Verdict,
}

impl DailyProgress {
    pub fn message(&self) -> String {
        self.verdict.message(self.diff_minutes)
    }
}

/// Compare `actual_minutes` against everything planned on `date`.
pub fn daily_progress(
    schedule: &[StudyTask],
    date: NaiveDate,
    actual_minutes: u32,
) -> DailyProgress {
    let target_minutes = schedule
        .iter()
        .filter(|t| t.date == date)
        .map(|t| t.planned_minutes)
        .fold(0u32, u32::saturating_add);
    let diff_minutes = i64::from(actual_minutes) - i64::from(target_minutes);
    DailyProgress {
        date,
        target_minutes,
        actual_minutes,
        diff_minutes,
        verdict: Verdict::from_diff(diff_minutes),
    }
}

/// Study-time totals for one subject across a schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubjectTotals {
    pub subject_id: String,
    pub name: String,
    pub task_count: usize,
    pub planned_minutes: u32,
    pub completed_minutes: u32,
    /// Required minus fixed/completed coverage, floored at zero.
    pub remaining_minutes: u32,
}

/// Per-subject totals, in the order of `subjects`.
pub fn subject_totals(
    subjects: &[Subject],
    schedule: &[StudyTask],
    minutes_per_difficulty: u32,
) -> Vec<SubjectTotals> {
    subjects
        .iter()
        .map(|subject| {
            let tasks: Vec<&StudyTask> = schedule
                .iter()
                .filter(|t| t.subject_id == subject.id)
                .collect();
            let covered = tasks
                .iter()
                .filter(|t| t.is_preserved())
                .map(|t| t.allocated_minutes())
                .fold(0u32, u32::saturating_add);
            SubjectTotals {
                subject_id: subject.id.clone(),
                name: subject.name.clone(),
                task_count: tasks.len(),
                planned_minutes: tasks
                    .iter()
                    .map(|t| t.planned_minutes)
                    .fold(0, u32::saturating_add),
                completed_minutes: tasks
                    .iter()
                    .filter(|t| t.completed)
                    .map(|t| t.actual_minutes)
                    .fold(0, u32::saturating_add),
                remaining_minutes: required_minutes(subject.difficulty, minutes_per_difficulty)
                    .saturating_sub(covered),
            }
        })
        .collect()
}

/// Complete the open tasks on `date` with the minutes actually studied.
///
/// Tasks are filled in schedule order up to their planned minutes; the last
/// open task takes any surplus. Tasks left without minutes stay open.
/// Returns the tasks that were completed.
pub fn record_actual_minutes(
    schedule: &mut [StudyTask],
    date: NaiveDate,
    actual_minutes: u32,
) -> Result<Vec<StudyTask>, TaskTransitionError> {
    let open: Vec<usize> = schedule
        .iter()
        .enumerate()
        .filter(|(_, t)| t.date == date && !t.completed)
        .map(|(idx, _)| idx)
        .collect();

    let mut left = actual_minutes;
    let mut completed = Vec::new();
    for (n, &idx) in open.iter().enumerate() {
        if left == 0 {
            break;
        }
        let task = &mut schedule[idx];
        let share = if n + 1 == open.len() {
            left
        } else {
            left.min(task.planned_minutes)
        };
        if share == 0 {
            continue;
        }
        task.complete(share)?;
        left -= share;
        completed.push(task.clone());
    }
    Ok(completed)
}

/// `90` -> `"1h 30m"`, `45` -> `"45m"`.
pub fn format_minutes(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
