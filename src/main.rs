use std::path::PathBuf;
use std::process::ExitCode;

use glance::App;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional single positional argument: a model file to load at startup.
    let initial_model = std::env::args().nth(1).map(PathBuf::from);
    if let Some(path) = &initial_model {
        log::info!("Attempting to load model from command line: {}", path.display());
    }

    match App::new(initial_model).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
