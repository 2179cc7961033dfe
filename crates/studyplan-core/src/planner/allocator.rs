//! Greedy day-by-day allocation with per-day round-robin.
//!
//! Walks forward from `today`. Each day rebuilds a priority queue of eligible
//! subjects and hands out slots from its head, rotating partially served
//! subjects to the back, until the day's capacity or the queue runs out.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};

use super::capacity::{eligible_queue, DayLoad};
use super::workload::WorkItem;
use super::{PlannedTask, PlannerConfig};
use crate::model::Settings;

/// Result of one allocation run.
#[derive(Debug)]
pub(crate) struct Allocation {
    pub tasks: Vec<PlannedTask>,
    pub days_walked: u32,
}

/// Accumulates planned minutes keyed by (subject, date).
#[derive(Debug, Default)]
struct TaskAccumulator {
    tasks: Vec<PlannedTask>,
    index: HashMap<(String, NaiveDate), usize>,
}

impl TaskAccumulator {
    fn add(&mut self, subject_id: &str, date: NaiveDate, minutes: u32) {
        let key = (subject_id.to_string(), date);
        match self.index.get(&key) {
            Some(&pos) => self.tasks[pos].planned_minutes += minutes,
            None => {
                self.index.insert(key, self.tasks.len());
                self.tasks.push(PlannedTask {
                    subject_id: subject_id.to_string(),
                    date,
                    planned_minutes: minutes,
                });
            }
        }
    }
}

pub(crate) fn allocate(
    work: &mut [WorkItem<'_>],
    preserved_by_day: &HashMap<NaiveDate, DayLoad>,
    settings: &Settings,
    today: NaiveDate,
    config: &PlannerConfig,
) -> Allocation {
    let slot_minutes = config.slot_minutes.max(1);
    let max_subjects = settings.max_subjects_per_day as usize;
    let latest_deadline = work.iter().map(WorkItem::test_date).max();

    let mut acc = TaskAccumulator::default();
    let mut current = today;
    let mut day = 0u32;

    while day < config.horizon_days && work.iter().any(WorkItem::is_pending) {
        // Nothing can become eligible again once every deadline is behind us.
        if latest_deadline.is_some_and(|last| current > last) {
            break;
        }

        let capacity = settings.capacity_minutes(current);
        let preserved = preserved_by_day.get(&current);
        let mut minutes_today = preserved.map_or(0, |load| load.minutes);
        let mut assigned: HashSet<&str> = preserved
            .map(|load| load.subject_ids.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let mut queue = eligible_queue(current, work);

        while minutes_today < capacity {
            let Some(&idx) = queue.front() else {
                break;
            };
            let subject = work[idx].subject;
            let subject_id = subject.id.as_str();

            if !assigned.contains(subject_id) && assigned.len() >= max_subjects {
                queue.pop_front();
                continue;
            }

            let item = &mut work[idx];
            let slot = slot_minutes
                .min(capacity - minutes_today)
                .min(item.minutes_needed);
            acc.add(subject_id, current, slot);
            assigned.insert(subject_id);
            item.minutes_needed -= slot;
            minutes_today += slot;

            queue.pop_front();
            if item.minutes_needed > 0 {
                queue.push_back(idx);
            }
        }

        tracing::debug!(
            "planned {}: capacity={} used={} subjects={}",
            current,
            capacity,
            minutes_today,
            assigned.len()
        );

        current += Duration::days(1);
        day += 1;
    }

    if day >= config.horizon_days && work.iter().any(WorkItem::is_pending) {
        tracing::warn!(
            "horizon of {} days exhausted with {} subject(s) still needing time",
            config.horizon_days,
            work.iter().filter(|w| w.is_pending()).count()
        );
    }

    Allocation {
        tasks: acc.tasks,
        days_walked: day,
    }
}
