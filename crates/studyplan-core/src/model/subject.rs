use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;

const DEFAULT_COLOR: &str = "#3b82f6";

/// A subject the student is preparing a test for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub id: String,
    pub name: String,
    /// 1 (easy) to 10 (hard). Drives total required study time.
    pub difficulty: u8,
    /// Last day study may be scheduled for this subject.
    pub test_date: NaiveDate,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.into()
}

impl Subject {
    /// Create a validated subject with a fresh id.
    pub fn new(
        name: impl Into<String>,
        difficulty: u8,
        test_date: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let subject = Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into().trim().to_string(),
            difficulty,
            test_date,
            color: default_color(),
        };
        subject.validate()?;
        Ok(subject)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Check the name and difficulty invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("name".into()));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(ValidationError::DifficultyOutOfRange(self.difficulty));
        }
        Ok(())
    }

    /// Whether study may still be scheduled for this subject on `date`.
    pub fn accepts_study_on(&self, date: NaiveDate) -> bool {
        self.test_date >= date
    }
}
