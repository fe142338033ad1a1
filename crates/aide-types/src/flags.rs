//! Runtime flags toggled by the user during a session.
//!
//! Flags are a name -> bool map. Known flags are seeded with their defaults
//! at startup and restored by [`RuntimeFlags::reset`]. Unknown names may be
//! set too; they are kept until the next reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// When set, queries are answered from a throwaway conversation and the
/// persistent history is left untouched.
pub const AMNESIA: &str = "amnesia";

/// Flags known to the orchestrator, with their startup defaults.
pub const KNOWN_FLAGS: &[(&str, bool)] = &[(AMNESIA, false)];

/// Name -> bool map of session flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeFlags {
    flags: BTreeMap<String, bool>,
}

impl RuntimeFlags {
    /// Flags seeded with [`KNOWN_FLAGS`] defaults.
    pub fn new() -> Self {
        let flags = KNOWN_FLAGS
            .iter()
            .map(|(name, default)| (name.to_string(), *default))
            .collect();
        Self { flags }
    }

    /// Current value of a flag. Unknown flags read as `false`.
    pub fn is_set(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.flags.insert(name.into(), value);
    }

    /// Flip a flag and return its new value.
    pub fn toggle(&mut self, name: &str) -> bool {
        let value = !self.is_set(name);
        self.flags.insert(name.to_string(), value);
        value
    }

    /// Restore startup defaults, dropping any ad hoc flags.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_known(name: &str) -> bool {
        KNOWN_FLAGS.iter().any(|(known, _)| *known == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Default for RuntimeFlags {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_seeded() {
        let flags = RuntimeFlags::new();
        assert!(!flags.is_set(AMNESIA));
        assert_eq!(flags.iter().count(), KNOWN_FLAGS.len());
    }

    #[test]
    fn test_toggle_flips_value() {
        let mut flags = RuntimeFlags::new();
        assert!(flags.toggle(AMNESIA));
        assert!(flags.is_set(AMNESIA));
        assert!(!flags.toggle(AMNESIA));
        assert!(!flags.is_set(AMNESIA));
    }

    #[test]
    fn test_unknown_flag_reads_false_until_set() {
        let mut flags = RuntimeFlags::new();
        assert!(!flags.is_set("verbose"));
        flags.set("verbose", true);
        assert!(flags.is_set("verbose"));
        assert!(!RuntimeFlags::is_known("verbose"));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut flags = RuntimeFlags::new();
        flags.set(AMNESIA, true);
        flags.set("verbose", true);
        flags.reset();
        assert_eq!(flags, RuntimeFlags::new());
    }
}
