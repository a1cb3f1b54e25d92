//! `palace` command-line front end: crawl, scrape, notes and mind-palace search.
pub mod cli;
mod commands;
pub mod config;
pub mod progress;

pub use cli::Cli;
pub use commands::run;
pub use config::{ConfigError, PalaceConfig};

/// 2 for configuration problems, 1 for everything else.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        2
    } else {
        1
    }
}
