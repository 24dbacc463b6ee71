//! Unitforge - declarative service module generator.
//!
//! Renders each module's options into:
//! - the daemon's own config file
//! - a systemd service unit and its enable link
//! - sysusers.d / tmpfiles.d fragments for identities and state directories

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use unitforge::commands::{self, generate::GenerateArgs, show::ShowTarget};
use unitforge::config::Config;

#[derive(Parser)]
#[command(name = "unitforge")]
#[command(about = "Render service modules into config files and systemd units")]
#[command(
    after_help = "QUICK START:\n  unitforge show modules           List modules\n  unitforge show options stargazer Describe a module's options\n  unitforge generate               Render every module\n  unitforge clean                  Remove generated output"
)]
struct Cli {
    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render modules into the output root
    Generate {
        /// Module to generate (default: all)
        module: Option<String>,

        /// Option file for the module (default: <options dir>/<module>.toml)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Output root (default: UNITFORGE_OUTPUT or output/rootfs)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowWhat,
    },

    /// Remove the output root
    Clean,
}

#[derive(Subcommand)]
enum ShowWhat {
    /// Show current configuration
    Config,
    /// List available modules
    Modules,
    /// Describe a module's options
    Options {
        module: String,
        /// Only this option
        option: Option<String>,
    },
    /// Show the service unit a module produces
    Unit {
        module: String,
        /// Print the unit descriptor as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the config file a module renders
    Render { module: String },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let base_dir = std::env::current_dir()?;
    let config = Config::load(&base_dir);

    match cli.command {
        Commands::Generate {
            module,
            options,
            output,
        } => {
            commands::cmd_generate(
                &config,
                GenerateArgs {
                    module,
                    options,
                    output,
                },
            )?;
        }

        Commands::Show { what } => {
            let target = match what {
                ShowWhat::Config => ShowTarget::Config,
                ShowWhat::Modules => ShowTarget::Modules,
                ShowWhat::Options { module, option } => ShowTarget::Options { module, option },
                ShowWhat::Unit { module, json } => ShowTarget::Unit { module, json },
                ShowWhat::Render { module } => ShowTarget::Render(module),
            };
            commands::cmd_show(target, &config)?;
        }

        Commands::Clean => {
            commands::cmd_clean(&config)?;
        }
    }

    Ok(())
}
