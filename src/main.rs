use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use venom::Backend;
use venom::core::config::{ResolvedConfig, load_config, resolve};
use venom::core::error::AppError;
use venom::export::{Exporter, FsExporter};
use venom::store::{HttpProjectStore, InMemoryStore, ProjectStore};
use venom::{cli, tui};

#[derive(Parser)]
#[command(name = "venom", about = "Manage project environment variables from the terminal")]
struct Args {
    /// Config file (defaults to ~/.venom/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend
    #[arg(short, long, value_enum, global = true)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive interface (default)
    Tui,
    /// Write project variables to their target files
    Pull {
        /// Only pull this project
        #[arg(long)]
        name: Option<String>,
    },
    /// Print all projects, masking secrets
    List,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("venom: {e}");
            return ExitCode::FAILURE;
        }
    };
    let config = resolve(&config, args.backend.map(Backend::as_str));

    // File logger - the terminal belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    match File::create(&config.log_file) {
        Ok(log_file) => {
            let _ = WriteLogger::init(config.log_level, log_config, log_file);
        }
        Err(e) => eprintln!("venom: cannot open log file {}: {e}", config.log_file.display()),
    }
    for (level, message) in &config.notices {
        log::log!(*level, "{}", message);
    }

    log::info!("Venom starting up with backend: {}", config.backend);

    let store = match build_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("venom: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = store.wait_until_ready(config.store.connect_timeout).await {
        let err = AppError::StoreUnavailable(e);
        log::error!("{}", err);
        eprintln!("venom: {err}");
        return ExitCode::FAILURE;
    }

    let exporter: Arc<dyn Exporter> = Arc::new(FsExporter::new(config.export_dir.clone()));

    let outcome = match args.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            return match tui::run(store, exporter, config.store.operation_timeout) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    log::error!("Terminal error: {}", e);
                    eprintln!("venom: {e}");
                    ExitCode::FAILURE
                }
            };
        }
        Command::Pull { name } => cli::pull(store.as_ref(), exporter.as_ref(), name.as_deref()).await,
        Command::List => cli::list(store.as_ref()).await,
    };

    match outcome {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("venom: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_store(config: &ResolvedConfig) -> Result<Arc<dyn ProjectStore>, AppError> {
    match Backend::from_name(&config.backend) {
        Some(Backend::Memory) => Ok(Arc::new(InMemoryStore::new())),
        Some(Backend::Http) => HttpProjectStore::new(&config.store)
            .map(|s| Arc::new(s) as Arc<dyn ProjectStore>)
            .map_err(AppError::StoreUnavailable),
        None => Err(AppError::StoreUnavailable(
            venom::core::error::StoreError::Unavailable(format!(
                "unknown backend '{}'",
                config.backend
            )),
        )),
    }
}
