use chrono::NaiveDate;
use clap::Subcommand;
use salonkit_core::blocks::{FullDayBlock, TimeBlock};
use salonkit_core::interval::TimeOfDay;
use salonkit_core::storage::SalonDb;

#[derive(Subcommand)]
pub enum BlockAction {
    /// Block whole days for a collaborator
    AddDay {
        collaborator_id: String,
        /// First blocked date (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last blocked date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Block a time range on one date
    AddTime {
        collaborator_id: String,
        /// Blocked date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Range start (HH:MM)
        #[arg(long)]
        start: TimeOfDay,
        /// Range end (HH:MM), exclusive
        #[arg(long)]
        end: TimeOfDay,
        #[arg(long)]
        reason: Option<String>,
    },
    /// List a collaborator's blocks
    List {
        collaborator_id: String,
    },
    /// Remove a full-day block by id
    RemoveDay {
        id: String,
    },
    /// Remove a time block by id
    RemoveTime {
        id: String,
    },
}

pub fn run(action: BlockAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BlockAction::AddDay {
            collaborator_id,
            from,
            to,
            reason,
        } => {
            let db = SalonDb::open()?;
            let block = FullDayBlock::new(collaborator_id, from, to, reason);
            db.insert_full_day_block(&block)?;
            println!("{}", block.id);
        }
        BlockAction::AddTime {
            collaborator_id,
            date,
            start,
            end,
            reason,
        } => {
            let mut db = SalonDb::open()?;
            let block = TimeBlock::new(collaborator_id, date, start, end, reason);
            db.insert_time_block(&block)?;
            println!("{}", block.id);
        }
        BlockAction::List { collaborator_id } => {
            let db = SalonDb::open()?;
            let listing = serde_json::json!({
                "full_day": db.list_full_day_blocks(&collaborator_id)?,
                "time": db.list_time_blocks(&collaborator_id)?,
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        BlockAction::RemoveDay { id } => {
            let db = SalonDb::open()?;
            db.delete_full_day_block(&id)?;
            println!("block removed");
        }
        BlockAction::RemoveTime { id } => {
            let db = SalonDb::open()?;
            db.delete_time_block(&id)?;
            println!("block removed");
        }
    }
    Ok(())
}
