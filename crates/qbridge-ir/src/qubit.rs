//! Slot identifiers and named registers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Global slot index of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Global slot index of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A named, contiguous run of slots.
///
/// Registers are laid out in declaration order, so the first register
/// starts at slot 0 and each following one starts where the previous ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    name: String,
    offset: u32,
    size: u32,
}

impl Register {
    pub(crate) fn new(name: impl Into<String>, offset: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            offset,
            size,
        }
    }

    /// Register name as written in source text.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First global slot covered by this register.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of slots in this register.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Global slots covered by this register.
    pub fn slots(&self) -> Range<u32> {
        self.offset..self.offset + self.size
    }

    /// Global slot for a register-local index.
    pub fn slot(&self, index: u32) -> Option<u32> {
        (index < self.size).then(|| self.offset + index)
    }

    /// Register-local index of a global slot, if the slot belongs here.
    pub fn index_of(&self, slot: u32) -> Option<u32> {
        self.slots().contains(&slot).then(|| slot - self.offset)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}
