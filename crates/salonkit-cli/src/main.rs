use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "salonkit-cli", version, about = "Salonkit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly schedule management
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Absence block management
    Block {
        #[command(subcommand)]
        action: commands::block::BlockAction,
    },
    /// Check whether a collaborator can be booked
    Check(commands::availability::CheckArgs),
    /// List a day's open booking windows
    Slots(commands::availability::SlotsArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Block { action } => commands::block::run(action),
        Commands::Check(args) => commands::availability::check(args),
        Commands::Slots(args) => commands::availability::slots(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
