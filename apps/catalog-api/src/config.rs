//! Configuration for the Catalog API

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Backing store selected with `CATALOG_STORE`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreKind {
    Postgres,
    Memory,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub store: StoreKind,
    /// Present only when `store` is `Postgres`
    pub postgres: Option<PostgresConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let store = env_parse("CATALOG_STORE", StoreKind::Postgres)?;

        let postgres = match store {
            StoreKind::Postgres => Some(PostgresConfig::from_env()?),
            StoreKind::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            store,
            postgres,
        })
    }
}
