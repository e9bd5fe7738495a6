use crate::demo::{run_demo, run_phase_report, DemoArgs, PhaseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use shift_signup::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Shift Signup",
    about = "Run and demonstrate the volunteer shift signup service",
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
    /// Show which signup phase applies to a month and the rules it enforces
    Phase(PhaseArgs),
    /// Seed a month, register sample volunteers and walk through the phase rules
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
    /// Volunteer roster CSV (phone,name,is_coordinator) to import on startup
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Phase(args) => run_phase_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
