// Main binary for the mantis CLI
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use std::io::stderr;

mod cmd;

use cmd::discover::DiscoverArgs;
use cmd::firmware::FirmwareCommand;
use cmd::init::InitArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mantis bare-metal bring-up", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generates the initial BMC inventory file and exits.
    Init(InitArgs),
    /// Discovers bootable node NICs via the BMCs and assigns addresses.
    Discover(DiscoverArgs),
    /// Fleet-wide firmware operations against the BMCs.
    Firmware {
        #[command(subcommand)]
        command: FirmwareCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Respect RUST_LOG, fall back to verbose/info for this crate and quiet
    // the noisy HTTP stack. Logs go to stderr so stdout stays scriptable.
    let default_level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "mantis={level},hyper=warn,reqwest=warn,rustls=warn,h2=warn,mio=warn",
        level = default_level
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(stderr))
        .init();

    match cli.command {
        Commands::Init(args) => cmd::init::run(args),
        Commands::Discover(args) => cmd::discover::run(args).await,
        Commands::Firmware { command } => cmd::firmware::run(command).await,
    }
}
