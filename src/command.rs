//! Wire-level commands understood by the target server.
//!
//! The fuzzer only ever *speaks*; it never parses responses. Each variant
//! renders through [`Display`](fmt::Display) to the exact line the server
//! expects, without the trailing newline (that belongs to the codec).
//!
//! The `@flag/add` argument layout is `<name>=<letter>,<types>,<setters>,
//! <unsetters>`; the single-letter field is deliberately left empty (the
//! flag simply gets no letter), which is why a rendered add command always
//! carries a comma straight after the `=`.

use std::fmt;

use crate::catalog::ObjectType;

/// One outbound command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// The login line: `connect <player>[ <password>]`.
    Connect {
        /// Player name to log in as.
        player: String,
        /// Optional password; omitted entirely when `None`.
        password: Option<String>,
    },

    /// Create a flag: `@flag/add <name>=,<types>,<setters>,<unsetters>`.
    FlagAdd {
        /// The new flag's name.
        name: String,
        /// Types the flag is restricted to; empty means "any type".
        types: Vec<ObjectType>,
        /// Permission tokens required to set the flag.
        setters: Vec<String>,
        /// Permission tokens required to unset the flag.
        unsetters: Vec<String>,
    },

    /// Destroy a flag: `@flag/delete <name>`.
    FlagDelete {
        /// The doomed flag's name.
        name: String,
    },

    /// Flip a flag on an object: `@set <dbref>=<name>`, or with `clear`
    /// the `@set <dbref>=!<name>` form.
    FlagSet {
        /// dbref of the object being flagged.
        target: String,
        /// The flag's name.
        name: String,
        /// When true, renders the `!`-prefixed (unset) form.
        clear: bool,
    },
}

fn join_types(types: &[ObjectType]) -> String {
    types
        .iter()
        .map(ObjectType::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Connect { player, password } => match password {
                Some(password) => write!(f, "connect {} {}", player, password),
                None => write!(f, "connect {}", player),
            },
            Command::FlagAdd {
                name,
                types,
                setters,
                unsetters,
            } => write!(
                f,
                "@flag/add {}=,{},{},{}",
                name,
                join_types(types),
                setters.join(" "),
                unsetters.join(" ")
            ),
            Command::FlagDelete { name } => write!(f, "@flag/delete {}", name),
            Command::FlagSet {
                target,
                name,
                clear,
            } => {
                if *clear {
                    write!(f, "@set {}=!{}", target, name)
                } else {
                    write!(f, "@set {}={}", target, name)
                }
            }
        }
    }
}
