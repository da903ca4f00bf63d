use crate::demo::{run_demo, run_slots, DemoArgs, SlotsArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use roadworthy::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Roadworthy Inspection Service",
    about = "Run and demonstrate the vehicle inspection scheduling service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the bookable inspection slots for a date window
    Slots(SlotsArgs),
    /// Walk one booking through scoring to its verdict, printing each step
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the demo users, vehicle, checklist, and booking at startup
    #[arg(long)]
    pub(crate) demo_fixtures: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Slots(args) => run_slots(args),
        Command::Demo(args) => run_demo(args),
    }
}
