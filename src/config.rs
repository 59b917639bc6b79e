//! Run configuration.
//!
//! Every knob the fuzzer exposes lives in [`FuzzConfig`]; the defaults
//! reproduce the classic run against a PennMUSH server on localhost. The
//! command-line front end builds one of these and hands it to the driver.

use std::time::Duration;

use crate::catalog::{
    DbrefTable, FLAG_NAME_ALPHABET, MAX_FLAG_NAME_LEN, MIN_FLAG_NAME_LEN, PERMISSIONS,
    TOP_AUTHORITY,
};
use crate::error::ConfigError;

/// Everything a fuzzing run needs to know.
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    /// Server host to connect to.
    pub host: String,
    /// Server port to connect to.
    pub port: u16,
    /// Player name sent in the `connect` line.
    pub player: String,
    /// Optional password appended to the `connect` line.
    pub password: Option<String>,
    /// Bound on how long the TCP connect may take before the run aborts.
    pub connect_timeout: Duration,
    /// Read quiescence window: once the server has been silent this long,
    /// the response to the last command is considered complete.
    pub idle_timeout: Duration,
    /// RNG seed. Two runs with the same seed against the same server state
    /// issue the same command sequence.
    pub seed: u64,
    /// Inclusive lower bound on generated flag name length.
    pub min_name_len: usize,
    /// Exclusive upper bound on generated flag name length.
    pub max_name_len: usize,
    /// Characters flag names are drawn from.
    pub alphabet: Vec<char>,
    /// Permission catalog sampled for setter/unsetter lists.
    pub permissions: Vec<String>,
    /// Permission appended to every generated setter/unsetter list.
    pub top_authority: String,
    /// Object dbrefs used as `@set` targets, one per object type.
    pub dbrefs: DbrefTable,
    /// Stop after this many iterations; `None` runs until a fatal error.
    pub max_iterations: Option<u64>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4201,
            player: "one".to_string(),
            password: None,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_millis(500),
            seed: 0,
            min_name_len: MIN_FLAG_NAME_LEN,
            max_name_len: MAX_FLAG_NAME_LEN,
            alphabet: FLAG_NAME_ALPHABET.chars().collect(),
            permissions: PERMISSIONS.iter().map(|p| p.to_string()).collect(),
            top_authority: TOP_AUTHORITY.to_string(),
            dbrefs: DbrefTable::default(),
            max_iterations: None,
        }
    }
}

impl FuzzConfig {
    /// The `host:port` string passed to the connector.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject configurations the generators cannot work with.
    ///
    /// Called once before connecting; the generators themselves assume
    /// these bounds hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alphabet.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        if self.permissions.is_empty() {
            return Err(ConfigError::EmptyPermissions);
        }
        if self.min_name_len >= self.max_name_len {
            return Err(ConfigError::EmptyNameLengths {
                min: self.min_name_len,
                max: self.max_name_len,
            });
        }
        Ok(())
    }
}
