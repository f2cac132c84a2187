//! Built-in components: a small compile-time table rather than a mutable
//! singleton (`spec.md` §9's "Global state" note). Built-ins short-circuit
//! both validator lookup and renderer dispatch before any user-defined
//! component def is searched.

/// `{ "LINK": { text, url } }` — currently the only built-in.
pub const NAMES: &[&str] = &["LINK"];

pub fn is_builtin(name: &str) -> bool {
    NAMES.contains(&name)
}
