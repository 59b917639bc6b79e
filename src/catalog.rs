//! Game-domain catalogs: object types, fuzzing targets, the flag-name
//! alphabet, and the flag permission lattice.
//!
//! The values here mirror a stock PennMUSH-family install and are only
//! defaults; every one of them can be overridden through
//! [`FuzzConfig`](crate::config::FuzzConfig).

use std::fmt;

/// Characters a generated flag name may contain.
///
/// This is a subset of the server's flag-name namespace: backtick and `=`
/// are excluded because the server assigns them delimiter parsing rules of
/// their own, and lowercase letters are redundant (flag names are
/// case-folded upward on the server side).
pub const FLAG_NAME_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_#@$!~|;'\"&*-+?/.><,";

/// Generated flag names are at least this many characters.
pub const MIN_FLAG_NAME_LEN: usize = 2;

/// Exclusive upper bound on generated flag-name length.
///
/// Kept modest so the server's own log lines stay readable during triage.
pub const MAX_FLAG_NAME_LEN: usize = 32;

/// Flag permission tokens the server understands, as fed to `@flag/add`.
///
/// These are the settable entries of the server's flag privilege table;
/// `internal` and `disabled` are left out because the server rejects them
/// outright rather than exercising interesting code paths.
pub const PERMISSIONS: &[&str] = &[
    "trusted", "owned", "royalty", "wizard", "god", "dark", "mdark", "odark", "log", "event",
];

/// The top-authority token forced into every generated setter and unsetter
/// set, so the fuzzer never creates a flag it cannot later manage.
pub const TOP_AUTHORITY: &str = "wizard";

/// The object types a flag's applicability can be restricted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectType {
    /// A connected player character.
    Player,
    /// A location.
    Room,
    /// A carryable object.
    Thing,
    /// A link between rooms.
    Exit,
}

impl ObjectType {
    /// The full type catalog, in the server's canonical order.
    pub const ALL: [ObjectType; 4] = [
        ObjectType::Player,
        ObjectType::Room,
        ObjectType::Thing,
        ObjectType::Exit,
    ];

    /// The type keyword as it appears in `@flag/add` type lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Player => "player",
            ObjectType::Room => "room",
            ObjectType::Thing => "thing",
            ObjectType::Exit => "exit",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed, pre-existing object reference per type, used as concrete
/// `@set` targets.
///
/// The defaults point at objects every fresh database has: God (`#1`), the
/// Master Room (`#0`), and two objects the operator is expected to have
/// created before fuzzing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbrefTable {
    /// Target for `player`-typed flags.
    pub player: String,
    /// Target for `room`-typed flags.
    pub room: String,
    /// Target for `thing`-typed flags.
    pub thing: String,
    /// Target for `exit`-typed flags.
    pub exit: String,
}

impl DbrefTable {
    /// The dbref standing in for the given object type.
    pub fn get(&self, ty: ObjectType) -> &str {
        match ty {
            ObjectType::Player => &self.player,
            ObjectType::Room => &self.room,
            ObjectType::Thing => &self.thing,
            ObjectType::Exit => &self.exit,
        }
    }
}

impl Default for DbrefTable {
    fn default() -> Self {
        Self {
            player: "#1".to_string(),
            room: "#0".to_string(),
            thing: "#3".to_string(),
            exit: "#7".to_string(),
        }
    }
}
