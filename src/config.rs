use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::LoadPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "counter_api", about = "Named counters over HTTP, persisted to a JSON file")]
pub struct Config {
    /// Host to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON document holding every counter, relative to the working directory
    #[arg(long, env = "COUNTERS_FILE", default_value = "counters.json")]
    pub counters_file: PathBuf,

    /// What to do when the counters file exists but can't be read
    #[arg(long, env = "LOAD_POLICY", value_enum, default_value_t = LoadPolicy::Reset)]
    pub load_policy: LoadPolicy,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, env = "LOG_LEVEL", default_value_t = LevelFilter::INFO)]
    pub log_level: LevelFilter,

    /// Also write a daily-rolling log file into this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
