//! Study task commands for CLI.

use clap::Subcommand;
use studyplan_core::date::parse_date;
use studyplan_core::{CoreError, StudyDb, StudyTask};

#[derive(Subcommand)]
pub enum TaskAction {
    /// List scheduled tasks
    List {
        /// Only tasks on this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Only tasks for this subject ID
        #[arg(long)]
        subject: Option<String>,
    },
    /// Create a fixed task the planner will never move
    Pin {
        /// Subject ID
        subject_id: String,
        /// Date (YYYY-MM-DD)
        date: String,
        /// Planned minutes
        minutes: u32,
    },
    /// Fix an existing task in place
    Fix {
        /// Task ID
        id: String,
    },
    /// Release a fixed task back to the planner
    Unpin {
        /// Task ID
        id: String,
    },
    /// Record the minutes actually studied for a task
    Complete {
        /// Task ID
        id: String,
        /// Minutes studied
        #[arg(long)]
        minutes: u32,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        TaskAction::List { date, subject } => {
            let tasks = match date {
                Some(date) => db.list_tasks_on(parse_date(&date)?)?,
                None => db.list_tasks()?,
            };
            let filtered: Vec<_> = tasks
                .into_iter()
                .filter(|task| subject.as_ref().map_or(true, |id| &task.subject_id == id))
                .collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        TaskAction::Pin {
            subject_id,
            date,
            minutes,
        } => {
            if db.get_subject(&subject_id)?.is_none() {
                return Err(CoreError::subject_not_found(&subject_id).into());
            }
            let task = StudyTask::fixed(subject_id, parse_date(&date)?, minutes)?;
            db.create_task(&task)?;
            println!("Task pinned: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Fix { id } => {
            let task = db.set_task_fixed(&id, true)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Unpin { id } => {
            let task = db.set_task_fixed(&id, false)?;
            if !task.completed {
                eprintln!("task released; the next `plan generate` replaces it");
            }
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Complete { id, minutes } => {
            let task = db.complete_task(&id, minutes)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }
    Ok(())
}
