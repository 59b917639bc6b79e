//! Error types for the fuzzer.
//!
//! This module defines the transport-level error type and the typed
//! collision result used by the flag registry. An idle-read timeout during
//! a drain is *not* represented here: it is the designed "response finished"
//! signal and surfaces as the `Ok` arm of
//! [`drain_until_idle`](crate::session::GameSession::drain_until_idle).

use std::time::Duration;

use thiserror::Error;

/// Convenience type alias for Results using [`SessionError`].
pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Fatal transport errors.
///
/// Every variant aborts the run; the fuzzer performs no retries and no
/// partial-failure recovery.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// TCP connect was refused or the host was unreachable.
    #[error("connect to {addr} failed: {source}")]
    Connect {
        /// The target address.
        addr: String,
        /// The underlying socket error.
        #[source]
        source: std::io::Error,
    },

    /// TCP connect did not complete within the configured bound.
    #[error("connect to {addr} timed out after {after:?}")]
    ConnectTimedOut {
        /// The target address.
        addr: String,
        /// The connect timeout that expired.
        after: Duration,
    },

    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A server line exceeded the maximum allowed length.
    #[error("line too long: {0} bytes")]
    LineTooLong(usize),

    /// The server closed the connection.
    #[error("connection closed by server")]
    ConnectionClosed,
}

/// Typed result of inserting an already-registered flag name.
///
/// Returned by [`FlagRegistry::insert`](crate::registry::FlagRegistry::insert);
/// the driver's add action loops regeneration until insertion succeeds, so
/// this error never escapes the generation loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("flag {0:?} is already registered")]
pub struct FlagCollision(pub String);

/// Rejected fuzzer configuration.
///
/// Returned by [`FuzzConfig::validate`](crate::config::FuzzConfig::validate)
/// before any connection is attempted. The generators assume these bounds
/// hold, so a config that fails validation must never reach the driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The flag name alphabet has no characters to draw from.
    #[error("flag name alphabet is empty")]
    EmptyAlphabet,

    /// The permission catalog has no entries to sample.
    #[error("permission catalog is empty")]
    EmptyPermissions,

    /// The flag name length range selects no lengths.
    #[error("flag name length bounds {min}..{max} select no length")]
    EmptyNameLengths {
        /// Inclusive lower bound.
        min: usize,
        /// Exclusive upper bound.
        max: usize,
    },
}
