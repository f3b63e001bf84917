//! Application settings, read from `tresorier.toml` and the environment.
//!
//! Environment variables override file values and use the `TRESORIER`
//! prefix with `__` as section separator, e.g. `TRESORIER__SERVER__PORT`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level filter applied to all crates of the workspace.
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("app.level", "info")?
            .add_source(File::with_name("tresorier").required(false))
            .add_source(Environment::with_prefix("TRESORIER").separator("__"))
            .build()?
            .try_deserialize()
    }
}
