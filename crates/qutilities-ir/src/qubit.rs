//! Wire identifiers and register bookkeeping.
//!
//! Qubit `i` of a sequence is bit `i` of a basis-state index; classical bit
//! `k` is character `k` from the right of a measured bitstring.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a qubit within a gate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

/// Index of a classical bit within a gate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl QubitId {
    /// The qubit `offset` positions further up.
    #[inline]
    #[must_use]
    pub fn offset(self, offset: u32) -> Self {
        QubitId(self.0 + offset)
    }
}

macro_rules! wire_id {
    ($ty:ident, $prefix:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $ty {
            fn from(id: u32) -> Self {
                $ty(id)
            }
        }
    };
}

wire_id!(QubitId, "q");
wire_id!(ClbitId, "c");

/// Position of a wire inside a named register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    /// Register name, e.g. `"control"`.
    pub name: String,
    /// Offset within the register.
    pub index: u32,
}

/// A wire of a gate sequence, optionally belonging to a register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wire<I> {
    /// Position in the sequence.
    pub id: I,
    /// Register membership.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub register: Option<RegisterSlot>,
}

/// A qubit wire.
pub type Qubit = Wire<QubitId>;

/// A classical bit wire.
pub type Clbit = Wire<ClbitId>;

impl<I> Wire<I> {
    /// An anonymous wire.
    pub fn new(id: I) -> Self {
        Self { id, register: None }
    }

    /// Wire `index` of register `name`.
    pub fn with_register(id: I, name: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some(RegisterSlot {
                name: name.into(),
                index,
            }),
        }
    }

    /// Name of the register holding this wire.
    pub fn register_name(&self) -> Option<&str> {
        self.register.as_ref().map(|slot| slot.name.as_str())
    }
}

impl<I: fmt::Display> fmt::Display for Wire<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.register {
            Some(slot) => write!(f, "{}[{}]", slot.name, slot.index),
            None => self.id.fmt(f),
        }
    }
}
