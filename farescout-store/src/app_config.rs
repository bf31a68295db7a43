use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub app_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_ms: u64,
    pub server_selection_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Fixed departure city for every round trip
    pub origin_city: String,
    pub query_timeout_ms: u64,
}

impl SearchConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `FARESCOUT__SERVER__PORT=9000`
            .add_source(config::Environment::with_prefix("FARESCOUT").separator("__"))
            .set_override_option("database.uri", env::var("MONGODB_URI").ok())?;

        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.name", "minichallenge")?
            .set_default("database.app_name", "farescout")?
            .set_default("database.max_pool_size", 10)?
            .set_default("database.min_pool_size", 1)?
            .set_default("database.connect_timeout_ms", 3000)?
            .set_default("database.server_selection_timeout_ms", 3000)?
            .set_default("search.origin_city", "Singapore")?
            .set_default("search.query_timeout_ms", 5000)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let s = builder.build()?;

        match s.get_string("database.uri") {
            Ok(uri) if !uri.trim().is_empty() => {}
            _ => return Err(ConfigError::Message("MONGODB_URI environment variable is not set".into())),
        }

        s.try_deserialize()
    }
}
