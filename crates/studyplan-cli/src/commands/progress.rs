use clap::Subcommand;
use studyplan_core::progress::{daily_progress, subject_totals};
use studyplan_core::{Config, Planner, StudyDb};

use super::date_or_today;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Compare today's study time against the plan
    Today {
        /// Minutes actually studied
        #[arg(long)]
        actual_minutes: u32,
        /// Day to check (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,
        /// Complete the day's tasks and move any shortfall to later days
        #[arg(long)]
        record: bool,
    },
    /// Planned, completed and remaining minutes per subject
    Subjects,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        ProgressAction::Today {
            actual_minutes,
            date,
            record,
        } => {
            let date = date_or_today(date.as_deref())?;
            let mut json = if record {
                let config = Config::load()?;
                let planner = Planner::with_config(config.planner);
                let day = db.record_day(&planner, &config.study, date, actual_minutes)?;
                let mut json = serde_json::to_value(&day.progress)?;
                json["message"] = day.progress.message().into();
                json["completed"] = serde_json::to_value(&day.completed)?;
                json["summary"] = serde_json::to_value(&day.summary)?;
                json
            } else {
                let progress = daily_progress(&db.list_tasks_on(date)?, date, actual_minutes);
                let mut json = serde_json::to_value(&progress)?;
                json["message"] = progress.message().into();
                json
            };
            json["recorded"] = record.into();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        ProgressAction::Subjects => {
            let config = Config::load()?;
            let totals = subject_totals(
                &db.list_subjects()?,
                &db.list_tasks()?,
                config.planner.minutes_per_difficulty,
            );
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
    }
    Ok(())
}
