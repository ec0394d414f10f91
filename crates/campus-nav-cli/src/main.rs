use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use campus_nav_cli::commands::route::{handle_route_command, RouteArgs};
use campus_nav_cli::commands::validate::handle_validate;
use campus_nav_cli::commands::CampusContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "Campus navigation routing tools")]
struct Cli {
    /// Campus data file (JSON).
    #[arg(long)]
    campus: PathBuf,

    /// Engine configuration file (JSON); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan an accessible route between two locations.
    Route(RouteArgs),
    /// Build the routing graph and report its size.
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let context = CampusContext::load(&cli.campus, cli.config.as_deref())?;
    match &cli.command {
        Command::Route(args) => handle_route_command(&context, args),
        Command::Validate => {
            handle_validate(&context);
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
