use clap::Subcommand;
use salonkit_core::schedule::{self, WeeklySchedule};
use salonkit_core::storage::SalonDb;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Show a collaborator's weekly schedule
    Show {
        collaborator_id: String,
    },
    /// Replace a collaborator's weekly schedule from JSON
    Set {
        collaborator_id: String,
        /// JSON schedule (array of weekday entries)
        json: String,
    },
    /// Validate a schedule JSON without saving it
    Validate {
        /// JSON schedule (array of weekday entries)
        json: String,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Show { collaborator_id } => {
            let db = SalonDb::open()?;
            let schedule = db.load_schedule(&collaborator_id)?;
            println!("{}", serde_json::to_string_pretty(&schedule)?);
        }
        ScheduleAction::Set {
            collaborator_id,
            json,
        } => {
            let schedule: WeeklySchedule = serde_json::from_str(&json)?;
            let mut db = SalonDb::open()?;
            db.replace_schedule(&collaborator_id, &schedule)?;
            println!("schedule updated");
        }
        ScheduleAction::Validate { json } => {
            let schedule: WeeklySchedule = serde_json::from_str(&json)?;
            let report = schedule::validate(&schedule);
            if report.is_valid() {
                println!("schedule is valid");
            } else {
                for (key, message) in report.errors() {
                    println!("{key}: {message}");
                }
                return Err("schedule is invalid".into());
            }
        }
    }
    Ok(())
}
