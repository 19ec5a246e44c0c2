// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Operating buffer slots and the small buffer set.
//!
//! A kernel launch reads from one buffer slot and writes to one buffer
//! slot. The universe is fixed at five slots: the caller's input and
//! output buffers plus up to three temporaries. This crate only reasons
//! about *which* slot a node touches — sizing and allocation belong to
//! the device runtime.

/// One of the five operating buffer slots a kernel may read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferSlot {
    /// The caller-supplied input buffer.
    UserIn,
    /// The caller-supplied output buffer.
    UserOut,
    /// General-purpose temporary buffer.
    Temp,
    /// Temporary complex buffer used by real-transform stages.
    TempCmplx,
    /// Temporary buffer reserved for Bluestein chirp/convolution stages.
    TempBlue,
}

/// All slots in a fixed, deterministic enumeration order.
///
/// Candidate generation iterates this array so that repeated planning
/// runs over identical plans explore branches in the same order.
pub const ALL_SLOTS: [BufferSlot; 5] = [
    BufferSlot::UserIn,
    BufferSlot::UserOut,
    BufferSlot::Temp,
    BufferSlot::TempCmplx,
    BufferSlot::TempBlue,
];

impl BufferSlot {
    /// Parses a buffer slot from a manifest string.
    ///
    /// Accepts both snake_case (`"user_in"`) and short aliases
    /// (`"a"`, `"b"`, `"t"`, `"c"`, `"blue"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user_in" | "in" | "a" => Some(Self::UserIn),
            "user_out" | "out" | "b" => Some(Self::UserOut),
            "temp" | "t" => Some(Self::Temp),
            "temp_cmplx" | "cmplx" | "c" => Some(Self::TempCmplx),
            "temp_blue" | "bluestein" | "blue" => Some(Self::TempBlue),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserIn => "user_in",
            Self::UserOut => "user_out",
            Self::Temp => "temp",
            Self::TempCmplx => "temp_cmplx",
            Self::TempBlue => "temp_blue",
        }
    }

    /// Returns `true` for the three temporary slots.
    pub fn is_temp(&self) -> bool {
        matches!(self, Self::Temp | Self::TempCmplx | Self::TempBlue)
    }

    /// Position of this slot in [`ALL_SLOTS`], used as a bit index.
    fn bit(&self) -> u8 {
        match self {
            Self::UserIn => 0,
            Self::UserOut => 1,
            Self::Temp => 2,
            Self::TempCmplx => 3,
            Self::TempBlue => 4,
        }
    }
}

impl std::fmt::Display for BufferSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of buffer slots, packed into one byte.
///
/// With at most five slots a bitset is cheaper to copy along every
/// search path than a heap-allocated set, and set union is a single OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct BufferSet(u8);

impl BufferSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(0)
    }

    /// Builds a set from a slice of slots.
    pub fn from_slots(slots: &[BufferSlot]) -> Self {
        let mut set = Self::new();
        for s in slots {
            set.insert(*s);
        }
        set
    }

    /// Inserts a slot. Inserting twice is a no-op.
    pub fn insert(&mut self, slot: BufferSlot) {
        self.0 |= 1 << slot.bit();
    }

    /// Returns `true` if the slot is present.
    pub fn contains(&self, slot: BufferSlot) -> bool {
        self.0 & (1 << slot.bit()) != 0
    }

    /// Returns the union of two sets.
    pub fn union(&self, other: BufferSet) -> BufferSet {
        BufferSet(self.0 | other.0)
    }

    /// Number of distinct slots in the set.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if no slot is present.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the slots in the fixed enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = BufferSlot> + '_ {
        ALL_SLOTS.iter().copied().filter(|s| self.contains(*s))
    }
}

impl std::fmt::Display for BufferSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.iter().map(|s| s.as_str()).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}
