//! Data model: subjects, study tasks and study-time settings.

mod settings;
mod subject;
mod task;

pub use settings::Settings;
pub use subject::{Subject, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use task::{StudyTask, TaskTransitionError};
