#![forbid(unsafe_code)]

//! Identifiers for actions and macros, and the allocator that hands them out.
//!
//! Ids are unique per [`IdAllocator`]. The allocator lives in the session
//! context, so two sessions never share a counter and tests start from a
//! known state.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of an entry in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionId(pub u64);

impl ActionId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Identifier of a stored macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacroId(pub u64);

impl MacroId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MacroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "macro#{}", self.0)
    }
}

/// Identifier of one step inside a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacroActionId(pub u64);

impl MacroActionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Monotonic id source for one editing session.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_action: u64,
    next_macro: u64,
    next_macro_action: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Ids start at 1; 0 is never handed out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_action: 1,
            next_macro: 1,
            next_macro_action: 1,
        }
    }

    pub fn next_action_id(&mut self) -> ActionId {
        let id = ActionId(self.next_action);
        self.next_action += 1;
        id
    }

    pub fn next_macro_id(&mut self) -> MacroId {
        let id = MacroId(self.next_macro);
        self.next_macro += 1;
        id
    }

    pub fn next_macro_action_id(&mut self) -> MacroActionId {
        let id = MacroActionId(self.next_macro_action);
        self.next_macro_action += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic_per_kind() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_action_id(), ActionId(1));
        assert_eq!(ids.next_action_id(), ActionId(2));
        assert_eq!(ids.next_macro_id(), MacroId(1));
        assert_eq!(ids.next_macro_action_id(), MacroActionId(1));
        assert_eq!(ids.next_action_id(), ActionId(3));
    }

    #[test]
    fn test_allocators_are_independent() {
        let mut a = IdAllocator::new();
        let mut b = IdAllocator::new();
        a.next_action_id();
        assert_eq!(b.next_action_id(), ActionId(1));
    }

    #[test]
    fn test_display() {
        assert_eq!(ActionId(7).to_string(), "action#7");
        assert_eq!(MacroId(2).to_string(), "macro#2");
    }
}
