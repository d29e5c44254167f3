use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use signal_hook::consts::{SIGHUP, SIGTERM};
use tracing::{error, info};

use docap::app;
use docap::config::AppConfig;
use docap::logging;

const NAME: &str = "docap";

/// A terminal dashboard for docker-compose projects.
#[derive(Parser, Debug)]
#[command(name = NAME, version, about)]
struct Args {
    /// Compose file to use; repeat for overrides (passed as `-f` to docker-compose)
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    files: Vec<String>,

    /// Verbose logging to development.log in the config directory
    #[arg(short, long)]
    debug: bool,

    /// Print the merged configuration and exit
    #[arg(short, long)]
    config: bool,

    /// Use this directory instead of the per-user config directory
    #[arg(long, value_name = "DIR")]
    config_dir: Option<std::path::PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let project_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{}: cannot read current directory: {}", NAME, e);
            return ExitCode::FAILURE;
        }
    };
    let config = match AppConfig::load(
        NAME,
        env!("CARGO_PKG_VERSION"),
        project_dir,
        args.debug,
        &args.files,
        args.config_dir,
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", NAME, e);
            return ExitCode::FAILURE;
        }
    };

    if args.config {
        return match serde_yaml::to_string(&config.user_config) {
            Ok(yaml) => {
                print!("{}", yaml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", NAME, e);
                ExitCode::FAILURE
            }
        };
    }

    let _log_guard = logging::init(&config.config_dir, config.debug);
    info!(version = %config.version, prefix = %config.compose_prefix, "starting");

    let should_quit = Arc::new(AtomicBool::new(false));
    for signal in [SIGTERM, SIGHUP] {
        if let Err(e) = signal_hook::flag::register(signal, Arc::clone(&should_quit)) {
            error!(error = %e, signal, "failed to register signal handler");
        }
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        app::restore_terminal();
        default_hook(info);
    }));

    match app::run(should_quit, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "terminal error");
            eprintln!("{}: {}", NAME, e);
            ExitCode::FAILURE
        }
    }
}
