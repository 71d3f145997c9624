// Connection parameters live in the environment, not in source
// literals. The embedded store needs a single parameter: the
// database path.

use std::env;
use std::path::PathBuf;

/// Environment variable naming the database file.
pub const DB_PATH_VAR: &str = "BANK_DB";

const DEFAULT_DB_PATH: &str = "bank.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
}

impl Config {
    /// Read connection parameters from the environment, falling back
    /// to `bank.db` in the working directory.
    pub fn from_env() -> Self {
        let db_path = env::var(DB_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

        Config { db_path }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_overrides_default_path() {
        env::set_var(DB_PATH_VAR, "/tmp/teller-test.db");
        let config = Config::from_env();
        assert_eq!(config.db_path, PathBuf::from("/tmp/teller-test.db"));

        env::remove_var(DB_PATH_VAR);
        let config = Config::from_env();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
    }
}
