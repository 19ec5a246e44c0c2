// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fusion candidates ("shims").
//!
//! A shim names a contiguous run of leaf nodes that the kernel library
//! can collapse into a single launch, provided the buffer/layout
//! assignment over the run satisfies the shim's compatibility rule.
//! Shims are immutable during the assignment search; whether a shim
//! actually fuses depends on the placements chosen along each candidate
//! path, so fusability is evaluated per path.

use crate::NodePlacement;

/// Compatibility rule a fused range must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuseScheme {
    /// Every node in the range writes the same output buffer.
    SharedOutput,
    /// No node in the range switches layout between input and output.
    NoLayoutSwitch,
    /// Every node in the range runs in place.
    InplaceChain,
}

impl FuseScheme {
    /// Parses a scheme from a manifest string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shared_output" => Some(Self::SharedOutput),
            "no_layout_switch" => Some(Self::NoLayoutSwitch),
            "inplace_chain" => Some(Self::InplaceChain),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SharedOutput => "shared_output",
            Self::NoLayoutSwitch => "no_layout_switch",
            Self::InplaceChain => "inplace_chain",
        }
    }
}

impl std::fmt::Display for FuseScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fusion candidate over a contiguous, inclusive node range.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FuseShim {
    /// Stable identifier (position in the plan's shim list).
    pub id: usize,
    /// First node of the range (execution-order index, inclusive).
    pub first: usize,
    /// Last node of the range (inclusive).
    pub last: usize,
    /// The compatibility rule over assigned placements.
    pub scheme: FuseScheme,
}

impl FuseShim {
    /// Number of nodes the shim would absorb if fused.
    pub fn span(&self) -> usize {
        self.last - self.first + 1
    }

    /// Evaluates the compatibility rule over one path's placements for
    /// this shim's range (`placements[0]` is the placement of node
    /// `self.first`).
    ///
    /// All-or-nothing: if the rule fails, no node in the range fuses.
    pub fn fusable(&self, placements: &[NodePlacement]) -> bool {
        if placements.len() != self.span() {
            return false;
        }
        match self.scheme {
            FuseScheme::SharedOutput => {
                let first_out = placements[0].out_buf;
                placements.iter().all(|p| p.out_buf == first_out)
            }
            FuseScheme::NoLayoutSwitch => {
                placements.iter().all(|p| p.in_layout == p.out_layout)
            }
            FuseScheme::InplaceChain => placements.iter().all(|p| p.is_inplace()),
        }
    }
}

impl std::fmt::Display for FuseShim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "shim {} [{}..={}] ({})",
            self.id, self.first, self.last, self.scheme,
        )
    }
}

/// A fused range recorded in the assigned plan's execution record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FusedSpan {
    /// The shim that fused.
    pub shim_id: usize,
    /// First node of the fused range (inclusive).
    pub first: usize,
    /// Last node of the fused range (inclusive).
    pub last: usize,
    /// Identifier of the winning search path, for traceability.
    pub path_id: usize,
}
