//! Seed-driven generators for fuzzing parameters.
//!
//! Every function here is pure given its `Rng`: the driver owns a single
//! seeded [`StdRng`](rand::rngs::StdRng) and threads it through each call,
//! so a whole run replays exactly from its seed. Nothing in this module
//! touches the registry or the wire.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::ObjectType;

/// Generate a random flag name: uniform-random length in
/// `[min_len, max_len)`, then one uniform-random character per position
/// from `alphabet`.
///
/// `alphabet` must be non-empty and `min_len < max_len`; the config layer
/// validates both before a run starts.
pub fn flag_name<R: Rng>(rng: &mut R, alphabet: &[char], min_len: usize, max_len: usize) -> String {
    let len = rng.gen_range(min_len..max_len);
    (0..len)
        .map(|_| *alphabet.choose(rng).expect("alphabet must not be empty"))
        .collect()
}

/// Generate the types a new flag is restricted to: a shuffled copy of the
/// catalog truncated to a uniform-random-length prefix in
/// `[0, |catalog|)`. Empty is valid and means "applies to all types".
///
/// Note the half-open bound: a generated subset never names every type at
/// once, since that is indistinguishable from the unrestricted case.
pub fn type_subset<R: Rng>(rng: &mut R) -> Vec<ObjectType> {
    let mut types = ObjectType::ALL.to_vec();
    types.shuffle(rng);
    types.truncate(rng.gen_range(0..ObjectType::ALL.len()));
    types
}

/// Generate a permission set: a shuffled copy of `catalog` truncated to a
/// uniform-random-length prefix in `[0, |catalog|)`, with `forced`
/// appended unconditionally.
///
/// `catalog` must be non-empty; the config layer validates that before a
/// run starts.
///
/// When the shuffle leaves `forced` inside the kept prefix it ends up in
/// the set twice. The server tolerates duplicate tokens, and emitting them
/// exercises that tolerance, so nothing here (or downstream) deduplicates.
pub fn permission_set<R: Rng>(rng: &mut R, catalog: &[String], forced: &str) -> Vec<String> {
    let mut perms = catalog.to_vec();
    perms.shuffle(rng);
    perms.truncate(rng.gen_range(0..catalog.len()));
    perms.push(forced.to_string());
    perms
}
