//! The fuzzing loop.
//!
//! [`FuzzDriver`] owns everything mutable in a run: the seeded RNG, the
//! flag registry, and (for the duration of [`run`](FuzzDriver::run)) the
//! server session. Each iteration draws one action kind, fires the
//! corresponding command at the server, and drains the response before the
//! next draw, so exactly one command is ever outstanding.
//!
//! The per-action handlers are free functions that take every piece of
//! state they touch as an explicit argument. Nothing here is global, which
//! keeps the handlers testable against a scripted local server without a
//! driver around them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::catalog::ObjectType;
use crate::command::Command;
use crate::config::FuzzConfig;
use crate::error::{ConfigError, FlagCollision, Result};
use crate::generate;
use crate::registry::FlagRegistry;
use crate::session::GameSession;

/// Where the driver is in its lifecycle.
///
/// `Idle` and `Dispatching` alternate for the life of the run; there is no
/// terminal state. A run ends only on a fatal transport error, on reaching
/// the optional iteration bound, or by external termination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// TCP connect in progress.
    Connecting,
    /// Connected, sending the login line and draining the banner.
    Authenticating,
    /// Between actions, nothing outstanding.
    Idle,
    /// An action's command is in flight (send plus drain).
    Dispatching,
}

/// The three things the fuzzer knows how to do to the flag table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Create a new flag with random types and permissions.
    AddFlag,
    /// Delete a flag created earlier in this run.
    RemoveFlag,
    /// Set or clear a flag created earlier in this run on some object.
    SetFlag,
}

impl ActionKind {
    /// Every kind, in draw order.
    pub const ALL: [ActionKind; 3] = [
        ActionKind::AddFlag,
        ActionKind::RemoveFlag,
        ActionKind::SetFlag,
    ];

    /// Uniform draw over all kinds.
    fn draw<R: Rng>(rng: &mut R) -> Self {
        match rng.gen_range(0..Self::ALL.len()) {
            0 => Self::AddFlag,
            1 => Self::RemoveFlag,
            _ => Self::SetFlag,
        }
    }
}

/// Forward one drained server line into the log stream.
///
/// Server chatter gets its own target so it can be filtered independently
/// of the driver's progress lines (`RUST_LOG=info,mushfuzz::server=debug`).
fn server_line(line: &str) {
    debug!(target: "mushfuzz::server", "{}", line);
}

/// Create a new flag: unique name, random type subset, random setter and
/// unsetter permission lists.
///
/// The name is registered at generation time; a collision with an earlier
/// name simply regenerates. Registration before the send is safe because
/// any send or drain failure aborts the whole run.
pub async fn fuzz_add_flag<R: Rng>(
    session: &mut GameSession,
    registry: &mut FlagRegistry,
    rng: &mut R,
    config: &FuzzConfig,
) -> Result<()> {
    let types = generate::type_subset(rng);
    let name = loop {
        let candidate = generate::flag_name(
            rng,
            &config.alphabet,
            config.min_name_len,
            config.max_name_len,
        );
        match registry.insert(candidate.clone(), types.clone()) {
            Ok(()) => break candidate,
            Err(FlagCollision(taken)) => debug!(name = %taken, "name collision, regenerating"),
        }
    };
    let setters = generate::permission_set(rng, &config.permissions, &config.top_authority);
    let unsetters = generate::permission_set(rng, &config.permissions, &config.top_authority);

    info!(flag = %name, ?types, ?setters, ?unsetters, "adding flag");
    let command = Command::FlagAdd {
        name,
        types,
        setters,
        unsetters,
    };
    session.send_line(&command.to_string()).await?;
    session.drain_until_idle(server_line).await?;
    Ok(())
}

/// Delete a flag created earlier in this run.
///
/// No-op when the registry is empty: nothing is sent and nothing changes.
/// The registry entry is dropped only after the server's response has been
/// drained.
pub async fn fuzz_remove_flag<R: Rng>(
    session: &mut GameSession,
    registry: &mut FlagRegistry,
    rng: &mut R,
    _config: &FuzzConfig,
) -> Result<()> {
    let name = match registry.pick_random(rng) {
        Some((name, _types)) => name.to_string(),
        None => {
            debug!("no flags to remove");
            return Ok(());
        }
    };

    info!(flag = %name, "removing flag");
    let command = Command::FlagDelete { name: name.clone() };
    session.send_line(&command.to_string()).await?;
    session.drain_until_idle(server_line).await?;
    registry.remove(&name);
    Ok(())
}

/// Set or clear an existing flag on a target object.
///
/// No-op when the registry is empty. If the flag was created with a
/// restricted type list the target is drawn from the dbrefs of those
/// types; a flag that applies to everything draws from the full table.
/// A fair coin decides between the set and the `!`-prefixed clear form.
pub async fn fuzz_set_flag<R: Rng>(
    session: &mut GameSession,
    registry: &mut FlagRegistry,
    rng: &mut R,
    config: &FuzzConfig,
) -> Result<()> {
    let (name, types) = match registry.pick_random(rng) {
        Some((name, types)) => (name.to_string(), types.to_vec()),
        None => {
            debug!("no flags to set");
            return Ok(());
        }
    };

    let ty = if types.is_empty() {
        ObjectType::ALL[rng.gen_range(0..ObjectType::ALL.len())]
    } else {
        types[rng.gen_range(0..types.len())]
    };
    let target = config.dbrefs.get(ty).to_string();
    let clear = rng.gen_bool(0.5);

    info!(flag = %name, %target, clear, "setting flag");
    let command = Command::FlagSet {
        target,
        name,
        clear,
    };
    session.send_line(&command.to_string()).await?;
    session.drain_until_idle(server_line).await?;
    Ok(())
}

/// The control loop: connect, log in, then draw and dispatch actions
/// until a fatal error or the configured iteration bound.
#[derive(Debug)]
pub struct FuzzDriver {
    config: FuzzConfig,
    rng: StdRng,
    registry: FlagRegistry,
    state: DriverState,
    iterations: u64,
}

impl FuzzDriver {
    /// Build a driver from a validated configuration.
    ///
    /// The RNG is seeded here; two drivers built from configs with equal
    /// seeds draw identical action and parameter sequences.
    pub fn new(config: FuzzConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            rng,
            registry: FlagRegistry::new(),
            state: DriverState::Connecting,
            iterations: 0,
        })
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The flags this run believes exist right now.
    #[must_use]
    pub fn registry(&self) -> &FlagRegistry {
        &self.registry
    }

    /// Number of completed action iterations (no-ops included).
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Connect, authenticate, and fuzz.
    ///
    /// Returns `Ok(())` only when `max_iterations` is set and reached;
    /// an unbounded run leaves this function solely through a fatal
    /// [`SessionError`](crate::error::SessionError).
    pub async fn run(&mut self) -> Result<()> {
        let addr = self.config.addr();
        info!(%addr, seed = self.config.seed, "starting fuzz run");
        let mut session = GameSession::connect(
            &addr,
            self.config.connect_timeout,
            self.config.idle_timeout,
        )
        .await?;

        self.transition(DriverState::Authenticating);
        let login = Command::Connect {
            player: self.config.player.clone(),
            password: self.config.password.clone(),
        };
        info!(player = %self.config.player, "logging in");
        let banner = session.login(&login.to_string(), server_line).await?;
        debug!(lines = banner, "login response drained");

        loop {
            self.transition(DriverState::Idle);
            if let Some(max) = self.config.max_iterations {
                if self.iterations >= max {
                    info!(iterations = self.iterations, "iteration bound reached");
                    return Ok(());
                }
            }

            let kind = ActionKind::draw(&mut self.rng);
            self.transition(DriverState::Dispatching);
            match kind {
                ActionKind::AddFlag => {
                    fuzz_add_flag(&mut session, &mut self.registry, &mut self.rng, &self.config)
                        .await?
                }
                ActionKind::RemoveFlag => {
                    fuzz_remove_flag(&mut session, &mut self.registry, &mut self.rng, &self.config)
                        .await?
                }
                ActionKind::SetFlag => {
                    fuzz_set_flag(&mut session, &mut self.registry, &mut self.rng, &self.config)
                        .await?
                }
            }
            self.iterations += 1;
        }
    }

    fn transition(&mut self, next: DriverState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "driver state");
            self.state = next;
        }
    }
}
