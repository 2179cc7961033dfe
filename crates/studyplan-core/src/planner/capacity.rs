//! Per-day capacity and subject eligibility.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::NaiveDate;

use super::workload::WorkItem;
use crate::model::{Settings, StudyTask};

/// Study minutes available on `date`: weekend or weekday hours times 60.
pub fn capacity_minutes(date: NaiveDate, settings: &Settings) -> u32 {
    settings.capacity_minutes(date)
}

/// What preserved tasks already occupy on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayLoad {
    pub minutes: u32,
    pub subject_ids: HashSet<String>,
}

/// Index preserved tasks by date.
pub fn preserved_load(preserved: &[StudyTask]) -> HashMap<NaiveDate, DayLoad> {
    let mut by_day: HashMap<NaiveDate, DayLoad> = HashMap::new();
    for task in preserved.iter().filter(|t| t.is_preserved()) {
        let load = by_day.entry(task.date).or_default();
        load.minutes = load.minutes.saturating_add(task.planned_minutes);
        load.subject_ids.insert(task.subject_id.clone());
    }
    by_day
}

/// Indices of work items eligible on `date`, highest priority first.
///
/// Eligible means the test date has not passed and minutes remain. Nearer
/// test dates come first; harder subjects break ties. The sort is stable so
/// equal keys keep input order.
pub(crate) fn eligible_queue(date: NaiveDate, work: &[WorkItem<'_>]) -> VecDeque<usize> {
    let mut eligible: Vec<usize> = work
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_pending() && item.subject.accepts_study_on(date))
        .map(|(idx, _)| idx)
        .collect();

    eligible.sort_by(|&a, &b| {
        let (a, b) = (&work[a], &work[b]);
        a.test_date()
            .cmp(&b.test_date())
            .then_with(|| b.subject.difficulty.cmp(&a.subject.difficulty))
    });

    eligible.into()
}
