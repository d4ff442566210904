use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

const DEFAULT_DATABASE_URL: &str = "sqlite://volunteers.db";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: &str = "3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first if a
    /// `.env` file should be honoured.
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL),
            host: try_load("HOST", DEFAULT_HOST),
            port: try_load("PORT", DEFAULT_PORT),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match raw.trim().parse() {
        Ok(v) => v,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            parse_default(key, default)
        }
    }
}

fn parse_default<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    default
        .parse()
        .unwrap_or_else(|e| panic!("built-in default for {key} does not parse: {e}"))
}
