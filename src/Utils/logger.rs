//! Console logger setup. Call once from a driver or a test; repeated calls
//! are ignored so library users stay free to install their own logger.

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub fn init_console_logger(level: LevelFilter) {
    let _ = TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
