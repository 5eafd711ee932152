//! Connection parameters.
//!
//! Values come from the `PG*` environment variables, falling back to entries of
//! a `.env` file and then to a local default server. The process environment is
//! read once, at load time, and never written to.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::error::Error;

pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub host: String,
  pub port: u16,
  pub dbname: String,
  pub user: String,
  pub password: String,
}

impl Default for Config {
  fn default() -> Self {
    return Self {
      host: "localhost".to_string(),
      port: 5432,
      dbname: "postgres".to_string(),
      user: "postgres".to_string(),
      password: "postgres".to_string(),
    };
  }
}

impl Config {
  /// Loads `env_file` (or `.env` when present) and resolves the parameters.
  ///
  /// An explicitly named file must exist; the default one is optional.
  pub fn load(env_file: Option<&Path>) -> Result<Self, Error> {
    return Self::load_with(env_file, |key| std::env::var(key).ok());
  }

  pub(crate) fn load_with(
    env_file: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
  ) -> Result<Self, Error> {
    let path = env_file.unwrap_or(Path::new(DEFAULT_ENV_FILE));
    let entries = match read_env_file(path) {
      Ok(entries) => {
        debug!("Loaded {} entries from {path:?}", entries.len());
        entries
      }
      Err(err) if err.not_found() && env_file.is_none() => HashMap::new(),
      Err(source) => {
        return Err(Error::EnvFile {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    return Self::from_lookup(|key| env(key).or_else(|| entries.get(key).cloned()));
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
    let defaults = Self::default();

    let port = match lookup("PGPORT") {
      Some(value) => value
        .trim()
        .parse()
        .map_err(|_| Error::Config { key: "PGPORT", value })?,
      None => defaults.port,
    };

    return Ok(Self {
      host: lookup("PGHOST").unwrap_or(defaults.host),
      port,
      dbname: lookup("PGDATABASE").unwrap_or(defaults.dbname),
      user: lookup("PGUSER").unwrap_or(defaults.user),
      password: lookup("PGPASSWORD").unwrap_or(defaults.password),
    });
  }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, dotenvy::Error> {
  return dotenvy::from_path_iter(path)?.collect();
}
