use ckwatson::cli::cli_main::run_interactive_menu;
use ckwatson::settings::Settings;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;

fn init_logging(settings: &Settings) {
    let level = settings.log_level();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = settings.log_file() {
        match File::create(path) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot open log file {}: {}", path.display(), e),
        }
    }
    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("logger already initialised: {}", e);
    }
}

pub fn main() {
    let settings = Settings::new();
    init_logging(&settings);
    if let Err(e) = run_interactive_menu(&settings) {
        log::error!("terminal i/o failed: {}", e);
        std::process::exit(1);
    }
}
