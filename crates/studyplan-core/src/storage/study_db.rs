//! SQLite storage for subjects and the study schedule.
//!
//! Provides persistent storage for:
//! - Subjects (tests to prepare for)
//! - Study tasks, replaced wholesale on every regeneration
//! - Key-value store for application state

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::data_dir;
use crate::date::format_date;
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::model::{Settings, StudyTask, Subject};
use crate::planner::{PlanSummary, Planner};
use crate::progress::{daily_progress, record_actual_minutes, DailyProgress};

/// Key under which the anchor date of the last regeneration is stored.
pub const LAST_GENERATED_KEY: &str = "last_generated_on";

pub struct StudyDb {
    conn: Connection,
}

/// Outcome of [`StudyDb::record_day`].
#[derive(Debug, Clone, Serialize)]
pub struct DayRecord {
    pub progress: DailyProgress,
    /// Tasks completed by this check-in.
    pub completed: Vec<StudyTask>,
    /// Plan built from the following day.
    pub summary: PlanSummary,
}

impl StudyDb {
    /// Open the database at `~/.config/studyplan/studyplan.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("studyplan.db");
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS subjects (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                difficulty  INTEGER NOT NULL,
                test_date   TEXT NOT NULL,
                color       TEXT NOT NULL DEFAULT '#3b82f6'
            );

            CREATE TABLE IF NOT EXISTS study_tasks (
                id              TEXT PRIMARY KEY,
                subject_id      TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
                date            TEXT NOT NULL,
                planned_minutes INTEGER NOT NULL,
                completed       INTEGER NOT NULL DEFAULT 0,
                actual_minutes  INTEGER NOT NULL DEFAULT 0,
                is_fixed        INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_study_tasks_date ON study_tasks(date);
            CREATE INDEX IF NOT EXISTS idx_study_tasks_subject ON study_tasks(subject_id);",
        )
    }

    // === Subject CRUD ===

    pub fn create_subject(&self, subject: &Subject) -> Result<()> {
        subject.validate()?;
        self.conn.execute(
            "INSERT INTO subjects (id, name, difficulty, test_date, color)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                subject.id,
                subject.name,
                subject.difficulty,
                subject.test_date,
                subject.color
            ],
        )?;
        Ok(())
    }

    pub fn get_subject(&self, id: &str) -> Result<Option<Subject>> {
        let subject = self
            .conn
            .query_row(
                "SELECT id, name, difficulty, test_date, color FROM subjects WHERE id = ?1",
                params![id],
                row_to_subject,
            )
            .optional()?;
        Ok(subject)
    }

    /// All subjects, nearest test date first.
    pub fn list_subjects(&self) -> Result<Vec<Subject>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, difficulty, test_date, color FROM subjects
             ORDER BY test_date, name",
        )?;
        let subjects = stmt
            .query_map([], row_to_subject)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(subjects)
    }

    pub fn update_subject(&self, subject: &Subject) -> Result<()> {
        subject.validate()?;
        let changed = self.conn.execute(
            "UPDATE subjects SET name = ?2, difficulty = ?3, test_date = ?4, color = ?5
             WHERE id = ?1",
            params![
                subject.id,
                subject.name,
                subject.difficulty,
                subject.test_date,
                subject.color
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::subject_not_found(&subject.id));
        }
        Ok(())
    }

    /// Delete a subject together with all of its tasks.
    pub fn delete_subject(&self, id: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(CoreError::subject_not_found(id));
        }
        tracing::debug!("deleted subject {} and its tasks", id);
        Ok(())
    }

    // === Task access ===

    pub fn create_task(&self, task: &StudyTask) -> Result<()> {
        insert_task(&self.conn, task)?;
        Ok(())
    }

    pub fn get_task(&self, id: &str) -> Result<Option<StudyTask>> {
        let task = self
            .conn
            .query_row(
                "SELECT id, subject_id, date, planned_minutes, completed, actual_minutes, is_fixed
                 FROM study_tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// The whole schedule, ordered by date.
    pub fn list_tasks(&self) -> Result<Vec<StudyTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, date, planned_minutes, completed, actual_minutes, is_fixed
             FROM study_tasks ORDER BY date, subject_id",
        )?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn list_tasks_on(&self, date: NaiveDate) -> Result<Vec<StudyTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, subject_id, date, planned_minutes, completed, actual_minutes, is_fixed
             FROM study_tasks WHERE date = ?1 ORDER BY subject_id",
        )?;
        let tasks = stmt
            .query_map(params![date], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn update_task(&self, task: &StudyTask) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE study_tasks
             SET subject_id = ?2, date = ?3, planned_minutes = ?4, completed = ?5,
                 actual_minutes = ?6, is_fixed = ?7
             WHERE id = ?1",
            params![
                task.id,
                task.subject_id,
                task.date,
                task.planned_minutes,
                task.completed,
                task.actual_minutes,
                task.is_fixed
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::task_not_found(&task.id));
        }
        Ok(())
    }

    /// Mark a task completed with the minutes actually studied.
    pub fn complete_task(&self, id: &str, actual_minutes: u32) -> Result<StudyTask> {
        let mut task = self
            .get_task(id)?
            .ok_or_else(|| CoreError::task_not_found(id))?;
        task.complete(actual_minutes)?;
        self.update_task(&task)?;
        Ok(task)
    }

    pub fn set_task_fixed(&self, id: &str, fixed: bool) -> Result<StudyTask> {
        let mut task = self
            .get_task(id)?
            .ok_or_else(|| CoreError::task_not_found(id))?;
        if fixed {
            task.pin();
        } else {
            task.unpin();
        }
        self.update_task(&task)?;
        Ok(task)
    }

    /// Replace the stored schedule with `tasks` in one transaction.
    pub fn replace_schedule(&self, tasks: &[StudyTask]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        write_schedule(&tx, tasks)?;
        tx.commit()?;
        Ok(())
    }

    /// Regenerate the stored schedule anchored at `today`.
    ///
    /// Fixed and completed tasks are kept; everything else is replaced.
    pub fn regenerate(
        &self,
        planner: &Planner,
        settings: &Settings,
        today: NaiveDate,
    ) -> Result<PlanSummary> {
        let subjects = self.list_subjects()?;
        let schedule = self.list_tasks()?;
        self.store_regenerated(planner, &subjects, &schedule, settings, today)
    }

    /// Check in a day's study time and move any shortfall onto later days.
    ///
    /// `actual_minutes` is split across the day's open tasks (see
    /// [`record_actual_minutes`]), then the schedule is regenerated from the
    /// following day. Open tasks that received nothing are replaced by the
    /// regeneration unless they are fixed.
    pub fn record_day(
        &self,
        planner: &Planner,
        settings: &Settings,
        date: NaiveDate,
        actual_minutes: u32,
    ) -> Result<DayRecord> {
        let subjects = self.list_subjects()?;
        let mut schedule = self.list_tasks()?;

        let progress = daily_progress(&schedule, date, actual_minutes);
        let completed = record_actual_minutes(&mut schedule, date, actual_minutes)?;
        let next_day = date.succ_opt().ok_or_else(|| ValidationError::InvalidValue {
            field: "date".into(),
            message: format!("{date} has no following day"),
        })?;

        let summary = self.store_regenerated(planner, &subjects, &schedule, settings, next_day)?;
        tracing::info!(
            "recorded {} minute(s) on {} across {} task(s), replanned from {}",
            actual_minutes,
            date,
            completed.len(),
            next_day
        );

        Ok(DayRecord {
            progress,
            completed,
            summary,
        })
    }

    /// Plan from `today`, then write the schedule and the anchor date together.
    fn store_regenerated(
        &self,
        planner: &Planner,
        subjects: &[Subject],
        schedule: &[StudyTask],
        settings: &Settings,
        today: NaiveDate,
    ) -> Result<PlanSummary> {
        let (merged, summary) = planner.regenerate(subjects, schedule, settings, today);

        let tx = self.conn.unchecked_transaction()?;
        write_schedule(&tx, &merged)?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![LAST_GENERATED_KEY, format_date(today)],
        )?;
        tx.commit()?;
        Ok(summary)
    }

    // === Key-value store ===

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

fn write_schedule(conn: &Connection, tasks: &[StudyTask]) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM study_tasks", [])?;
    for task in tasks {
        insert_task(conn, task)?;
    }
    Ok(())
}

fn insert_task(conn: &Connection, task: &StudyTask) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO study_tasks
            (id, subject_id, date, planned_minutes, completed, actual_minutes, is_fixed)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            task.id,
            task.subject_id,
            task.date,
            task.planned_minutes,
            task.completed,
            task.actual_minutes,
            task.is_fixed
        ],
    )?;
    Ok(())
}

fn row_to_subject(row: &Row<'_>) -> rusqlite::Result<Subject> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        difficulty: row.get(2)?,
        test_date: row.get(3)?,
        color: row.get(4)?,
    })
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<StudyTask> {
    Ok(StudyTask {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        date: row.get(2)?,
        planned_minutes: row.get(3)?,
        completed: row.get(4)?,
        actual_minutes: row.get(5)?,
        is_fixed: row.get(6)?,
    })
}
