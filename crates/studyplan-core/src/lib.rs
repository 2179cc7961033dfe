//! # Studyplan Core Library
//!
//! This library provides the core logic for Studyplan, a planner that spreads
//! study time for upcoming tests across the days before them. All operations
//! are available via the standalone `studyplan` CLI, which is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Planner**: Greedy day-by-day allocator. Difficulty sets each subject's
//!   workload; daily hour budgets and a per-day subject cap bound each day
//! - **Model**: Subjects, study tasks and settings
//! - **Storage**: SQLite-based subject/schedule storage and TOML-based configuration
//! - **Progress**: Daily check-in feedback and per-subject totals
//!
//! ## Key Components
//!
//! - [`Planner`]: Schedule generation
//! - [`StudyDb`]: Subject and schedule persistence
//! - [`Config`]: Application configuration management

pub mod date;
pub mod error;
pub mod model;
pub mod planner;
pub mod progress;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use model::{Settings, StudyTask, Subject, TaskTransitionError};
pub use planner::{generate_schedule, PlanSummary, PlannedTask, Planner, PlannerConfig};
pub use progress::{DailyProgress, SubjectTotals, Verdict};
pub use storage::{Config, DayRecord, StudyDb};
