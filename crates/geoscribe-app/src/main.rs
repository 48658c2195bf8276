//! Geoscribe command line entry point.

use clap::Parser;
use geoscribe_app::{App, AppConfig, AppError, DATA_DIR_ENV};
use geoscribe_core::{DEFAULT_STORAGE_KEY, MemoryStorage, Storage};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "geoscribe")]
#[command(about = "Replay a scripted map drawing session", long_about = None)]
struct Args {
    /// Script file with one JSON command per line (stdin if omitted)
    script: Option<PathBuf>,

    /// Directory for persisted map state
    #[arg(long, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Key the drawn features and layer settings are stored under
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// Keep state in memory only
    #[arg(long)]
    ephemeral: bool,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            data_dir: args.data_dir,
            storage_key: args.storage_key,
            ephemeral: args.ephemeral,
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Starting geoscribe");

    let args = Args::parse();
    let script = args.script.clone();
    let config = AppConfig::from(args);

    if let Err(e) = run(&config, script) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(config: &AppConfig, script: Option<PathBuf>) -> Result<(), AppError> {
    let input: Box<dyn BufRead> = match script {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    if config.ephemeral {
        log::info!("Using in-memory storage");
        return replay(Arc::new(MemoryStorage::new()), config, input);
    }

    let storage = config.file_storage()?;
    log::info!("Using data directory {}", storage.base_path().display());
    replay(Arc::new(storage), config, input)
}

fn replay<S: Storage>(storage: Arc<S>, config: &AppConfig, input: Box<dyn BufRead>) -> Result<(), AppError> {
    let mut app = App::new(storage, config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    app.run_script(input, &mut out)
}
