use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Environment variables with this prefix override configuration keys
pub const ENV_PREFIX: &str = "FILETIME_FIXER_";

/// Main filetime-fixer settings structure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default log level, can be overridden by command line options or
    /// environment variables
    #[serde(default = "default_log_filter")]
    pub log_level: log::LevelFilter,

    /// Only report entries that would be repaired.
    ///
    /// Also enabled by `--simulate` on the command line.
    #[serde(default)]
    pub simulate: bool,

    /// Do not output statistic data.
    #[serde(default)]
    pub no_statistic: bool,

    /// Print the time the walk took.
    #[serde(default)]
    pub output_runtime: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_filter(),
            simulate: false,
            no_statistic: false,
            output_runtime: false,
        }
    }
}

fn default_log_filter() -> log::LevelFilter {
    log::LevelFilter::Info
}

/// Layer defaults, the settings file (if any) and the environment.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> anyhow::Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = path {
        let path = path.as_ref();
        anyhow::ensure!(path.is_file(), "settings file {path:?} does not exist");
        figment = figment.merge(Toml::file(path));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .context("failed to load configuration")
}

pub fn display_config(config: &Config) -> anyhow::Result<String> {
    toml::to_string(config).context("failed to serialize configuration")
}
