//! Command-line front end for the fuzzer.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mushfuzz::catalog::FLAG_NAME_ALPHABET;
use mushfuzz::{FuzzConfig, FuzzDriver};

/// Stateful fuzzer for the PennMUSH flag subsystem.
///
/// Connects to a running server as a wizard player and streams randomized
/// @flag/add, @flag/delete, and @set commands at it, tracking the flags it
/// creates so later commands reference real ones. Crashes show up on the
/// server side; this tool just keeps the pressure on and logs everything
/// it sent and received.
#[derive(Parser, Debug)]
#[command(name = "mushfuzz", version, about)]
struct Args {
    /// Server host.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(long, default_value_t = 4201)]
    port: u16,

    /// Player name for the connect line.
    #[arg(long, default_value = "one")]
    player: String,

    /// Password for the connect line, if the account has one.
    #[arg(long)]
    password: Option<String>,

    /// RNG seed; rerun with the same seed to replay a command stream.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Silence window in milliseconds before a response counts as complete.
    #[arg(long, default_value_t = 500)]
    idle_ms: u64,

    /// TCP connect timeout in milliseconds.
    #[arg(long, default_value_t = 5000)]
    connect_timeout_ms: u64,

    /// Stop after this many actions instead of running until killed.
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Minimum generated flag name length (inclusive).
    #[arg(long, default_value_t = 2)]
    min_name_len: usize,

    /// Maximum generated flag name length (exclusive).
    #[arg(long, default_value_t = 32)]
    max_name_len: usize,

    /// Characters flag names are drawn from.
    #[arg(long, default_value = FLAG_NAME_ALPHABET)]
    alphabet: String,

    /// Comma-separated permission catalog for setter/unsetter lists.
    #[arg(long, value_delimiter = ',')]
    permissions: Option<Vec<String>>,

    /// Permission token forced into every setter/unsetter list.
    #[arg(long, default_value = "wizard")]
    top_authority: String,

    /// Target dbref for player-typed flags.
    #[arg(long, default_value = "#1")]
    dbref_player: String,

    /// Target dbref for room-typed flags.
    #[arg(long, default_value = "#0")]
    dbref_room: String,

    /// Target dbref for thing-typed flags.
    #[arg(long, default_value = "#3")]
    dbref_thing: String,

    /// Target dbref for exit-typed flags.
    #[arg(long, default_value = "#7")]
    dbref_exit: String,
}

impl Args {
    fn into_config(self) -> FuzzConfig {
        let mut config = FuzzConfig {
            host: self.host,
            port: self.port,
            player: self.player,
            password: self.password,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            idle_timeout: Duration::from_millis(self.idle_ms),
            seed: self.seed,
            min_name_len: self.min_name_len,
            max_name_len: self.max_name_len,
            alphabet: self.alphabet.chars().collect(),
            top_authority: self.top_authority,
            max_iterations: self.max_iterations,
            ..FuzzConfig::default()
        };
        if let Some(permissions) = self.permissions {
            config.permissions = permissions;
        }
        config.dbrefs.player = self.dbref_player;
        config.dbrefs.room = self.dbref_room;
        config.dbrefs.thing = self.dbref_thing;
        config.dbrefs.exit = self.dbref_exit;
        config
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    let mut driver = FuzzDriver::new(config)?;
    driver.run().await?;
    Ok(())
}
