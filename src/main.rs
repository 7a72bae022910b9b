use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use plum_board::config::Config;
use plum_board::controller::game_controller::GameController;
use plum_board::errors::StartupError;
use plum_board::frontend::console::{self, ConsoleOptions};
use plum_board::logging;
use plum_board::oracle::dispatcher::Dispatcher;
use plum_board::oracle::oracle_trait::establish_oracle;

fn main() -> ExitCode {
    let config = Config::parse();
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "session aborted");
            eprintln!("plum_board: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), StartupError> {
    config.validate()?;
    logging::init(&config.log_config())?;

    let oracle = establish_oracle(config.engine.as_deref(), &config.engine_args, config.skill)?;
    let dispatcher = Dispatcher::new(oracle, config.think_time());
    let mut controller = GameController::new(config.controller_settings()?, dispatcher);

    info!(
        bot = config.bot,
        assistant = config.assistant,
        think_ms = config.think_ms,
        "session started"
    );

    let options = ConsoleOptions {
        tick: config.tick(),
        colored: !config.no_color,
    };
    console::run(&mut controller, &options)?;
    Ok(())
}
