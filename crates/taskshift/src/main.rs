mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taskshift",
    version,
    about = "Moves the taskbar to a secondary monitor while a fullscreen app runs on the primary"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Check configuration, monitors and the taskbar
    Doctor,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List monitors, marking the primary and the configured secondary
    Monitors,
    /// Classify the foreground window after a delay
    Probe(commands::debug::probe::ProbeArgs),
    /// Run the fullscreen tracker without moving the taskbar
    Watch,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Doctor => commands::doctor::execute(),
        Commands::Debug { command } => match command {
            DebugCommands::Monitors => commands::debug::monitors::execute(),
            DebugCommands::Probe(args) => commands::debug::probe::execute(&args),
            DebugCommands::Watch => commands::debug::watch::execute(),
        },
    }
}
