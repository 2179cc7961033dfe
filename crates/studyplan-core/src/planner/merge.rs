//! Combining preserved tasks with a fresh plan.

use crate::model::StudyTask;

/// Fixed or completed tasks from an existing schedule, in their stored order.
pub fn preserved_tasks(schedule: &[StudyTask]) -> Vec<StudyTask> {
    schedule.iter().filter(|t| t.is_preserved()).cloned().collect()
}

/// Preserved tasks first, untouched and in order, then the new ones.
///
/// The two sets are disjoint by construction: preserved means fixed or
/// completed, generated tasks are neither.
pub fn merge(preserved: Vec<StudyTask>, new_tasks: Vec<StudyTask>) -> Vec<StudyTask> {
    let mut merged = preserved;
    merged.reserve(new_tasks.len());
    merged.extend(new_tasks);
    merged
}
