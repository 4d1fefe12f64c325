use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_DB_PATH: &str = "data/exam.sqlite";
const DEFAULT_DATA_DIR: &str = "data/";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Defaults, then `.env` (if any), then `EXAM_*` environment variables.
    pub fn load() -> Result<Self> {
        check_dotenv(dotenvy::dotenv())?;
        Self::from_env(Environment::with_prefix("EXAM"))
    }

    fn from_env(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("data_dir", DEFAULT_DATA_DIR)?
            .add_source(env)
            .build()
            .and_then(Config::try_deserialize::<Settings>)
            .context("Invalid EXAM_* configuration")
    }
}

/// A missing `.env` is fine; a malformed one is not.
fn check_dotenv<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Err(e) if !e.not_found() => Err(e).context("Invalid .env file"),
        _ => Ok(()),
    }
}
