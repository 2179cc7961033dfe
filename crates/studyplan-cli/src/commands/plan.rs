//! Schedule generation commands for CLI.

use clap::Subcommand;
use studyplan_core::date::{format_date, parse_date, weekday_label};
use studyplan_core::storage::study_db::LAST_GENERATED_KEY;
use studyplan_core::{Config, Planner, StudyDb};

use super::date_or_today;

#[derive(Subcommand)]
pub enum PlanAction {
    /// Rebuild the schedule, keeping fixed and completed tasks
    Generate {
        /// Plan as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
    /// Show the stored schedule grouped by day
    Show {
        /// First day to show (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = StudyDb::open()?;

    match action {
        PlanAction::Generate { today } => {
            let today = date_or_today(today.as_deref())?;
            let config = Config::load()?;
            let planner = Planner::with_config(config.planner.clone());
            let summary = db.regenerate(&planner, &config.study, today)?;
            if !summary.is_complete() {
                eprintln!("warning: some study time did not fit before its test date");
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        PlanAction::Show { from } => {
            let from = from.as_deref().map(parse_date).transpose()?;
            let subjects = db.list_subjects()?;
            let tasks = db.list_tasks()?;

            if let Some(last) = db.kv_get(LAST_GENERATED_KEY)? {
                println!("Generated on {last}");
            }

            let mut current = None;
            for task in tasks.iter().filter(|t| from.map_or(true, |d| t.date >= d)) {
                if current != Some(task.date) {
                    current = Some(task.date);
                    println!("{} ({})", format_date(task.date), weekday_label(task.date));
                }
                let name = subjects
                    .iter()
                    .find(|s| s.id == task.subject_id)
                    .map_or(task.subject_id.as_str(), |s| s.name.as_str());
                let marker = match (task.completed, task.is_fixed) {
                    (true, _) => "x",
                    (false, true) => "*",
                    (false, false) => " ",
                };
                println!(
                    "  [{marker}] {name}: {} min  ({})",
                    task.planned_minutes, task.id
                );
            }
        }
    }
    Ok(())
}
