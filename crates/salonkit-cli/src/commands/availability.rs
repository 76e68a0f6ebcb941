use chrono::NaiveDate;
use clap::Args;
use salonkit_core::availability::{free_windows, resolve, AvailabilityQuery};
use salonkit_core::interval::TimeOfDay;
use salonkit_core::schedule::WeekDay;
use salonkit_core::storage::{Config, SalonDb};

#[derive(Args)]
pub struct CheckArgs {
    pub collaborator_id: String,
    /// Booking date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Booking start (HH:MM)
    #[arg(long)]
    pub start: TimeOfDay,
    /// Booking end (HH:MM)
    #[arg(long)]
    pub end: TimeOfDay,
}

pub fn check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = SalonDb::open()?;
    let schedule = db.load_schedule(&args.collaborator_id)?;
    let full_day_blocks = db.list_full_day_blocks(&args.collaborator_id)?;
    let time_blocks = db.list_time_blocks_on(&args.collaborator_id, args.date)?;

    let query = AvailabilityQuery {
        collaborator_id: args.collaborator_id,
        date: args.date,
        start: args.start,
        end: args.end,
    };
    let verdict = resolve(&query, &schedule, &full_day_blocks, &time_blocks);
    println!("{verdict}");
    Ok(())
}

#[derive(Args)]
pub struct SlotsArgs {
    pub collaborator_id: String,
    /// Booking date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,
    /// Booking length in minutes; defaults to the configured slot grid
    #[arg(long)]
    pub duration: Option<u16>,
}

pub fn slots(args: SlotsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = SalonDb::open()?;
    let schedule = db.load_schedule(&args.collaborator_id)?;
    let full_day_blocks = db.list_full_day_blocks(&args.collaborator_id)?;
    let time_blocks = db.list_time_blocks_on(&args.collaborator_id, args.date)?;

    let day = schedule.day(WeekDay::from_date(args.date));
    let windows = free_windows(day, &full_day_blocks, &time_blocks, args.date);
    if windows.is_empty() {
        println!("no open windows");
        return Ok(());
    }

    let config = Config::load_or_default();
    let grid = config.booking.slot_minutes;
    let duration = args.duration.unwrap_or(grid);

    for window in windows {
        let starts: Vec<String> = window
            .slot_starts(grid, duration)
            .iter()
            .map(TimeOfDay::to_string)
            .collect();
        println!("{}-{}  [{}]", window.start, window.end, starts.join(", "));
    }
    Ok(())
}
