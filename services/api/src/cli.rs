use crate::account::{self, LoginArgs, RegisterArgs, WhoamiArgs};
use crate::browse::{self, InternshipsArgs, RolesArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use intern_portal::config::AppConfig;
use intern_portal::error::AppError;
use intern_portal::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Internship Portal",
    about = "Serve the mock internship portal backend or drive it from the command line",
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
    /// Walk through sign-in and a complete application end to end
    Demo(DemoArgs),
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Create an account and persist the session
    Register(RegisterArgs),
    /// Clear the persisted session
    Logout,
    /// Show the signed-in user
    Whoami(WhoamiArgs),
    /// List internship role categories
    Roles(RolesArgs),
    /// List internships for a role or search across all postings
    Internships(InternshipsArgs),
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

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Demo(args) => run_demo(&config, args).await,
        Command::Login(args) => account::login(&config, args).await,
        Command::Register(args) => account::register(&config, args).await,
        Command::Logout => account::logout(&config),
        Command::Whoami(args) => account::whoami(&config, args),
        Command::Roles(args) => browse::roles(args),
        Command::Internships(args) => browse::internships(&config, args).await,
    }
}
