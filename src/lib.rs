//! # mushfuzz
//!
//! A stateful network fuzzer for the flag subsystem of PennMUSH-family
//! game servers. It connects as a wizard player over the normal telnet
//! port and hammers `@flag/add`, `@flag/delete`, and `@set` with randomly
//! generated flag names, type restrictions, and permission lists, keeping
//! an in-memory registry of what it has created so later commands can
//! reference real flags.
//!
//! ## Features
//!
//! - Seeded RNG end to end: the same seed replays the same command stream
//! - Drain-until-idle response handling with a fixed quiescence window
//! - In-memory flag registry so deletes and sets target flags that exist
//! - Structured tracing of every action and every server response line

#![deny(clippy::all)]

//! ## Quick Start
//!
//! ```no_run
//! use mushfuzz::{FuzzConfig, FuzzDriver};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FuzzConfig {
//!     seed: 1234,
//!     max_iterations: Some(100),
//!     ..FuzzConfig::default()
//! };
//! let mut driver = FuzzDriver::new(config)?;
//! driver.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The generators are plain functions over any [`rand::Rng`], so pieces
//! are usable without a live server:
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let name = mushfuzz::generate::flag_name(&mut rng, &['A', 'B', 'C'], 2, 8);
//! assert!(name.len() >= 2 && name.len() < 8);
//! ```

pub mod catalog;
pub mod codec;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod generate;
pub mod registry;
pub mod session;

pub use self::catalog::{DbrefTable, ObjectType};
pub use self::codec::{LineCodec, MAX_LINE_LEN};
pub use self::command::Command;
pub use self::config::FuzzConfig;
pub use self::driver::{ActionKind, DriverState, FuzzDriver};
pub use self::error::{ConfigError, FlagCollision, Result, SessionError};
pub use self::registry::FlagRegistry;
pub use self::session::GameSession;
