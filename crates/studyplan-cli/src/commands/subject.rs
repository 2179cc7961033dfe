//! Subject management commands for CLI.

use clap::Subcommand;
use studyplan_core::date::parse_date;
use studyplan_core::{CoreError, StudyDb, Subject};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject with an upcoming test
    Add {
        /// Subject name
        name: String,
        /// Difficulty from 1 (easy) to 10 (hard)
        #[arg(long)]
        difficulty: u8,
        /// Test date (YYYY-MM-DD)
        #[arg(long)]
        test_date: String,
        /// Display color, e.g. "#ef4444"
        #[arg(long)]
        color: Option<String>,
    },
    /// List subjects, nearest test first
    List,
    /// Edit a subject
    Edit {
        /// Subject ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New difficulty
        #[arg(long)]
        difficulty: Option<u8>,
        /// New test date (YYYY-MM-DD)
        #[arg(long)]
        test_date: Option<String>,
        /// New color
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove a subject and all of its tasks
    Remove {
        /// Subject ID
        id: String,
    },
}

pub fn run(action: SubjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        SubjectAction::Add {
            name,
            difficulty,
            test_date,
            color,
        } => {
            let mut subject = Subject::new(name, difficulty, parse_date(&test_date)?)?;
            if let Some(color) = color {
                subject = subject.with_color(color);
            }
            db.create_subject(&subject)?;
            println!("Subject created: {}", subject.id);
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        SubjectAction::List => {
            let subjects = db.list_subjects()?;
            println!("{}", serde_json::to_string_pretty(&subjects)?);
        }
        SubjectAction::Edit {
            id,
            name,
            difficulty,
            test_date,
            color,
        } => {
            let mut subject = db
                .get_subject(&id)?
                .ok_or_else(|| CoreError::subject_not_found(&id))?;
            if let Some(name) = name {
                subject.name = name.trim().to_string();
            }
            if let Some(difficulty) = difficulty {
                subject.difficulty = difficulty;
            }
            if let Some(test_date) = test_date {
                subject.test_date = parse_date(&test_date)?;
            }
            if let Some(color) = color {
                subject.color = color;
            }
            db.update_subject(&subject)?;
            println!("Subject updated: {id}");
            println!("{}", serde_json::to_string_pretty(&subject)?);
        }
        SubjectAction::Remove { id } => {
            db.delete_subject(&id)?;
            println!("Subject removed: {id}");
        }
    }
    Ok(())
}
