use std::process::ExitCode;

use hringr::config::{self, ArgsOutcome};

fn main() -> ExitCode {
    env_logger::init();

    let config = match config::parse_args(std::env::args().skip(1)) {
        Ok(ArgsOutcome::Run(config)) => config,
        Ok(ArgsOutcome::Help) => {
            print!("{}", config::USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}");
            eprint!("{}", config::USAGE);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = hringr::app::run(config) {
        log::error!("initialization failed: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
