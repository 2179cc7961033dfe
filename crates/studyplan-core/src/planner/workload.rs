//! Difficulty-to-workload mapping and remaining-need computation.

use chrono::NaiveDate;

use crate::model::{StudyTask, Subject};

/// Study minutes required per difficulty point (three hours).
pub const MINUTES_PER_DIFFICULTY: u32 = 180;

/// Total study minutes a subject of `difficulty` needs.
pub fn total_minutes_needed(difficulty: u8) -> u32 {
    required_minutes(difficulty, MINUTES_PER_DIFFICULTY)
}

/// Linear workload with a configurable rate. No cap.
pub fn required_minutes(difficulty: u8, minutes_per_difficulty: u32) -> u32 {
    u32::from(difficulty).saturating_mul(minutes_per_difficulty)
}

/// Minutes already covered for `subject_id` by fixed or completed tasks.
///
/// Completed tasks count their actual minutes, fixed ones their plan.
pub fn preserved_minutes(subject_id: &str, preserved: &[StudyTask]) -> u32 {
    preserved
        .iter()
        .filter(|t| t.is_preserved() && t.subject_id == subject_id)
        .map(StudyTask::allocated_minutes)
        .fold(0u32, u32::saturating_add)
}

/// Minutes still to schedule for `subject`, floored at zero.
pub fn remaining_minutes(
    subject: &Subject,
    preserved: &[StudyTask],
    minutes_per_difficulty: u32,
) -> u32 {
    required_minutes(subject.difficulty, minutes_per_difficulty)
        .saturating_sub(preserved_minutes(&subject.id, preserved))
}

/// A subject's live remaining-minutes counter for one allocation run.
#[derive(Debug, Clone)]
pub(crate) struct WorkItem<'a> {
    pub subject: &'a Subject,
    pub minutes_needed: u32,
}

impl WorkItem<'_> {
    pub fn subject_id(&self) -> &str {
        &self.subject.id
    }

    pub fn test_date(&self) -> NaiveDate {
        self.subject.test_date
    }

    pub fn is_pending(&self) -> bool {
        self.minutes_needed > 0
    }
}

/// Build the run's pending work, dropping subjects with nothing left to do.
pub(crate) fn pending_work<'a>(
    subjects: &'a [Subject],
    preserved: &[StudyTask],
    minutes_per_difficulty: u32,
) -> Vec<WorkItem<'a>> {
    subjects
        .iter()
        .map(|subject| WorkItem {
            subject,
            minutes_needed: remaining_minutes(subject, preserved, minutes_per_difficulty),
        })
        .filter(WorkItem::is_pending)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn subject(id: &str, difficulty: u8) -> Subject {
        let mut s = Subject::new(id, difficulty, date("2026-11-01")).unwrap();
        s.id = id.to_string();
        s
    }

    #[test]
    fn workload_is_linear_in_difficulty() {
        for d in 1..=10u8 {
            assert_eq!(total_minutes_needed(d), u32::from(d) * 180);
        }
    }

    #[test]
    fn completed_tasks_count_actual_minutes() {
        let math = subject("math", 2);
        let mut done = StudyTask::generated("math", date("2026-10-10"), 120);
        done.complete(50).unwrap();
        let fixed = StudyTask::fixed("math", date("2026-10-20"), 60).unwrap();
        let other = StudyTask::fixed("physics", date("2026-10-20"), 90).unwrap();

        let preserved = vec![done, fixed, other];
        assert_eq!(preserved_minutes("math", &preserved), 110);
        assert_eq!(remaining_minutes(&math, &preserved, MINUTES_PER_DIFFICULTY), 250);
    }

    #[test]
    fn open_generated_tasks_are_not_counted() {
        let math = subject("math", 1);
        let open = StudyTask::generated("math", date("2026-10-10"), 120);
        assert_eq!(remaining_minutes(&math, &[open], MINUTES_PER_DIFFICULTY), 180);
    }

    #[test]
    fn remaining_is_floored_at_zero() {
        let math = subject("math", 1);
        let fixed = StudyTask::fixed("math", date("2026-10-20"), 400).unwrap();
        assert_eq!(remaining_minutes(&math, &[fixed], MINUTES_PER_DIFFICULTY), 0);
    }

    #[test]
    fn pending_work_skips_satisfied_subjects() {
        let subjects = vec![subject("math", 1), subject("english", 2)];
        let fixed = StudyTask::fixed("math", date("2026-10-20"), 180).unwrap();
        let work = pending_work(&subjects, &[fixed], MINUTES_PER_DIFFICULTY);
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].subject_id(), "english");
        assert_eq!(work[0].minutes_needed, 360);
    }
}
