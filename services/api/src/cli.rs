use crate::demo::{run_demo, run_requests_report, DemoArgs, RequestsReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use rentmatch::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Rental Matchmaking Service",
    about = "Run the rental matchmaking API or inspect request histories from the command line",
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
    /// Inspect request histories and eligibility offline
    Requests {
        #[command(subcommand)]
        command: RequestsCommand,
    },
    /// Run an end-to-end CLI demo of the request/accept workflow
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    /// Evaluate a landlord's window and a tenant's countdown from a CSV export
    Report(RequestsReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Requests {
            command: RequestsCommand::Report(args),
        } => run_requests_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
