/*
 *  ctfbot - Discord bot for browsing CTFtime events and teams.
 *  Copyright (C) 2025  ctfbot contributors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use serde::Deserialize;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::path::{Path, PathBuf};
use std::{env, fs};

/* Data structures: */

/// Browser-like agent sent upstream, since CTFtime rejects obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Path of the optional configuration file, relative to the working directory.
pub const CONFIG_PATH: &str = "config.json";

/**
 * Data structure encapsulating the configuration of the bot.
 *
 * Every key is optional in `config.json`; missing keys take the values of `BotConfig::default()`.
 */
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Name of the guild role allowed to use the administrative commands (`/ctf_info`).
    pub required_role: String,
    /// Root URL of CTFtime, used for both the API and the team pages.
    pub api_url: String,
    /// The `User-Agent` header sent with every upstream request.
    pub user_agent: String,
    /// Team shown by `/team_info` when no team is given.
    pub default_team_id: u64,
    /// Number of events listed by `/upcoming_ctfs` when no limit is given.
    pub default_limit: u8,
    /// Maximum level written by the loggers.
    #[serde(with = "SerdeLevelFilter")]
    pub log_level: LevelFilter,
    /// Additionally write the log to this file, if set.
    pub log_file: Option<PathBuf>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            required_role: String::from("CTF Admin"),
            api_url: String::from("https://ctftime.org"),
            user_agent: String::from(DEFAULT_USER_AGENT),
            default_team_id: 370924,
            default_limit: 5,
            log_level: LevelFilter::Info,
            log_file: None,
        }
    }
}

/// Lets [`LevelFilter`] be read from the config file with lowercase names.
#[derive(Deserialize)]
#[serde(remote = "LevelFilter", rename_all = "lowercase")]
enum SerdeLevelFilter {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Errors raised while loading the configuration or setting up logging.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read the configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse the configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not create the log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("a logger was already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/**
 * Macro for logging the usage of a command, with the invoking user.
 * Inserted at the top of every command by `#[ctfbot::log_cmd]`.
 */
macro_rules! log_cmd {
    ($ctx:ident, $level:expr) => {
        ::log::log!(
            $level,
            "Executing command `{}`, triggered by <@{}> ({}).",
            $ctx.invocation_string(),
            $ctx.author().id,
            $ctx.author().tag()
        );
    };
}
pub(crate) use log_cmd;

/**
 * Loads the bot configuration.
 *
 * The file is read from `CTFBOT_CONFIG` if that variable is set, or from `config.json` otherwise.
 * A missing default file is not an error, and yields the default configuration.
 */
pub fn load_config() -> Result<BotConfig, ConfigError> {
    match env::var_os("CTFBOT_CONFIG") {
        Some(path) => read_config(Path::new(&path)),
        None if Path::new(CONFIG_PATH).exists() => read_config(Path::new(CONFIG_PATH)),
        None => Ok(BotConfig::default()),
    }
}

/**
 * Reads and parses a configuration file.
 */
pub fn read_config(path: &Path) -> Result<BotConfig, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&json).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_config(json: &str) -> Result<BotConfig, serde_json::Error> {
    serde_json::from_str(json)
}

/**
 * Installs the terminal logger and, if configured, the file logger.
 */
pub fn init_logging(config: &BotConfig) -> Result<(), ConfigError> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        config.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = &config.log_file {
        let file = fs::File::create(path).map_err(|source| ConfigError::LogFile {
            path: path.clone(),
            source,
        })?;
        loggers.push(WriteLogger::new(config.log_level, Config::default(), file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
