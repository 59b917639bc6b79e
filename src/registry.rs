//! The fuzzer's ledger of flags it believes exist.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::catalog::ObjectType;
use crate::error::FlagCollision;

/// In-memory record of the flags this run has created and not yet deleted,
/// keyed by name, each mapped to the object types it applies to (empty
/// meaning "all types").
///
/// The ledger is the fuzzer's own belief: nothing verifies it against the
/// server, and the two may silently diverge when the server rejects a
/// command. That is a stated limitation of the tool.
///
/// Backed by a `BTreeMap` so iteration order, and with it every
/// [`pick_random`](Self::pick_random), is deterministic under a fixed
/// seed. A hash map's per-process key order would break seeded replay.
#[derive(Clone, Debug, Default)]
pub struct FlagRegistry {
    flags: BTreeMap<String, Vec<ObjectType>>,
}

impl FlagRegistry {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly created flag.
    ///
    /// Fails with a typed [`FlagCollision`] when `name` is already
    /// present, leaving the registry unchanged; the caller regenerates the
    /// name and retries. Entries are never mutated in place; the only
    /// state changes are whole-entry insertion and removal.
    pub fn insert(&mut self, name: String, types: Vec<ObjectType>) -> Result<(), FlagCollision> {
        match self.flags.entry(name) {
            Entry::Occupied(occupied) => Err(FlagCollision(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(types);
                Ok(())
            }
        }
    }

    /// Forget a flag, returning its recorded types (`None` if absent).
    pub fn remove(&mut self, name: &str) -> Option<Vec<ObjectType>> {
        self.flags.remove(name)
    }

    /// Uniform choice over current entries.
    ///
    /// Returns `None` when the registry is empty; callers check before
    /// acting so an empty registry turns the action into a no-op.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<(&str, &[ObjectType])> {
        self.flags
            .iter()
            .choose(rng)
            .map(|(name, types)| (name.as_str(), types.as_slice()))
    }

    /// Whether `name` is currently registered.
    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Number of registered flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no flags are registered.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// All entries in deterministic (name) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ObjectType])> {
        self.flags
            .iter()
            .map(|(name, types)| (name.as_str(), types.as_slice()))
    }
}
