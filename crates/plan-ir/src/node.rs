// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Leaf node definitions for the execution sequence.
//!
//! Each [`LeafNode`] describes one kernel launch: its kind, length,
//! placement capability, and the constraints the buffer assigner must
//! honour. The assigner writes the final buffer/layout decision back
//! into the node once a winning path has been selected. Kernel *code*
//! is not represented here — only the metadata planning needs.

use crate::{ArrayLayout, BufferSlot};

/// The kind of kernel a leaf node launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelKind {
    /// Stockham autosort FFT stage.
    Stockham,
    /// Stockham stage with column-major block access (SBCC).
    StockhamBlockCC,
    /// Stockham stage with row/column block access (SBRC).
    StockhamBlockRC,
    /// Transpose between stages.
    Transpose,
    /// Post-processing real-to-complex step of a real transform.
    RealToComplex,
    /// Pre-processing complex-to-real step of a real transform.
    ComplexToReal,
    /// Bluestein chirp table setup.
    ChirpSetup,
    /// Bluestein pad-and-multiply step.
    PadMul,
    /// Bluestein residue-multiply step.
    ResMul,
    /// Plain copy / format conversion.
    Copy,
}

impl KernelKind {
    /// Parses a kernel kind from a manifest string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "stockham" | "sbrr" => Some(Self::Stockham),
            "stockham_block_cc" | "sbcc" => Some(Self::StockhamBlockCC),
            "stockham_block_rc" | "sbrc" => Some(Self::StockhamBlockRC),
            "transpose" => Some(Self::Transpose),
            "real_to_complex" | "r2c" => Some(Self::RealToComplex),
            "complex_to_real" | "c2r" => Some(Self::ComplexToReal),
            "chirp_setup" | "chirp" => Some(Self::ChirpSetup),
            "pad_mul" => Some(Self::PadMul),
            "res_mul" => Some(Self::ResMul),
            "copy" => Some(Self::Copy),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stockham => "stockham",
            Self::StockhamBlockCC => "stockham_block_cc",
            Self::StockhamBlockRC => "stockham_block_rc",
            Self::Transpose => "transpose",
            Self::RealToComplex => "real_to_complex",
            Self::ComplexToReal => "complex_to_real",
            Self::ChirpSetup => "chirp_setup",
            Self::PadMul => "pad_mul",
            Self::ResMul => "res_mul",
            Self::Copy => "copy",
        }
    }

    /// Buffer slot this kernel mandates be used *somewhere* in the plan.
    ///
    /// Bluestein steps stage their chirp/convolution data in the
    /// dedicated Bluestein buffer; the real-transform pre/post steps
    /// stage the half-spectrum in the complex temporary. This is a
    /// global constraint on the whole assignment, not a requirement on
    /// this node's own input or output slot.
    pub fn required_buffer(&self) -> Option<BufferSlot> {
        match self {
            Self::ChirpSetup | Self::PadMul | Self::ResMul => Some(BufferSlot::TempBlue),
            Self::RealToComplex | Self::ComplexToReal => Some(BufferSlot::TempCmplx),
            _ => None,
        }
    }

    /// Output layouts this kernel can produce given its input layout.
    ///
    /// The representation class is fixed by the kernel semantics: a
    /// real-to-complex step always emits a Hermitian half-spectrum, a
    /// complex-to-real step always emits real samples, the Bluestein
    /// steps always emit full complex data, and every other kernel
    /// preserves the representation class of its input (either variant
    /// of that class is a legal output).
    pub fn out_layout_candidates(&self, in_layout: ArrayLayout) -> &'static [ArrayLayout] {
        const COMPLEX: &[ArrayLayout] =
            &[ArrayLayout::ComplexInterleaved, ArrayLayout::ComplexPlanar];
        const HERMITIAN: &[ArrayLayout] =
            &[ArrayLayout::HermitianInterleaved, ArrayLayout::HermitianPlanar];
        const REAL: &[ArrayLayout] = &[ArrayLayout::Real];
        const NONE: &[ArrayLayout] = &[];

        match self {
            Self::RealToComplex => HERMITIAN,
            Self::ComplexToReal => REAL,
            Self::ChirpSetup | Self::PadMul | Self::ResMul => COMPLEX,
            _ => {
                if in_layout.is_complex() {
                    COMPLEX
                } else if in_layout.is_hermitian() {
                    HERMITIAN
                } else if in_layout == ArrayLayout::Real {
                    REAL
                } else {
                    NONE
                }
            }
        }
    }
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a node may run relative to its input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Output buffer must equal the input buffer.
    InPlace,
    /// Output buffer must differ from the input buffer.
    OutOfPlace,
    /// Either placement is legal.
    #[default]
    Either,
}

impl Placement {
    /// Parses a placement from a manifest string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "in_place" | "ip" => Some(Self::InPlace),
            "out_of_place" | "op" => Some(Self::OutOfPlace),
            "either" => Some(Self::Either),
            _ => None,
        }
    }

    /// Returns `true` if writing to `out` from `in` satisfies this
    /// placement constraint.
    pub fn allows(&self, in_buf: BufferSlot, out_buf: BufferSlot) -> bool {
        match self {
            Self::InPlace => in_buf == out_buf,
            Self::OutOfPlace => in_buf != out_buf,
            Self::Either => true,
        }
    }
}

/// The buffer/layout decision for one node along one search path.
///
/// Fusion rules are evaluated over slices of these, and the winning
/// path's placements are what gets written back into the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct NodePlacement {
    pub in_buf: BufferSlot,
    pub out_buf: BufferSlot,
    pub in_layout: ArrayLayout,
    pub out_layout: ArrayLayout,
}

impl NodePlacement {
    /// Returns `true` if the node reads and writes the same slot.
    pub fn is_inplace(&self) -> bool {
        self.in_buf == self.out_buf
    }
}

impl std::fmt::Display for NodePlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) -> {}({})",
            self.in_buf, self.in_layout, self.out_buf, self.out_layout,
        )
    }
}

/// Metadata for one kernel launch in the execution sequence.
///
/// Constraint fields are consumed by the buffer assigner; the four
/// assignment fields start unset and are written exactly once when a
/// winning path is backtracked onto the plan.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LeafNode {
    /// Unique identifier (e.g., `"stage.0.sbcc"`).
    pub name: String,
    /// The kind of kernel this node launches.
    pub kind: KernelKind,
    /// Position in the execution order (0-based).
    pub index: usize,
    /// Transform length per dimension, fastest dimension first.
    pub length: Vec<usize>,
    /// In-place / out-of-place capability.
    pub placement: Placement,
    /// The kernel requires its output to be unit-stride.
    pub unit_stride_out: bool,
    /// Buffer slot that must appear somewhere in the final assignment.
    ///
    /// Defaults from [`KernelKind::required_buffer`] at construction;
    /// a manifest entry may override it.
    pub required_buffer: Option<BufferSlot>,
    /// The kernel can only emit this exact layout (e.g., a transpose
    /// variant hard-wired to interleaved output).
    pub fixed_out_layout: Option<ArrayLayout>,

    /// Assigned input buffer (written by the assigner).
    pub in_buf: Option<BufferSlot>,
    /// Assigned output buffer (written by the assigner).
    pub out_buf: Option<BufferSlot>,
    /// Assigned input layout (written by the assigner).
    pub in_layout: ArrayLayout,
    /// Assigned output layout (written by the assigner).
    pub out_layout: ArrayLayout,
}

impl LeafNode {
    /// Creates an unassigned node with constraints defaulted from the
    /// kernel kind.
    pub fn new(name: String, kind: KernelKind, index: usize, length: Vec<usize>) -> Self {
        Self {
            name,
            kind,
            index,
            length,
            placement: Placement::Either,
            unit_stride_out: false,
            required_buffer: kind.required_buffer(),
            fixed_out_layout: None,
            in_buf: None,
            out_buf: None,
            in_layout: ArrayLayout::Unset,
            out_layout: ArrayLayout::Unset,
        }
    }

    /// Total number of elements this node operates on.
    pub fn num_elements(&self) -> usize {
        self.length.iter().product()
    }

    /// Returns `true` once the assigner has written both buffers.
    pub fn is_assigned(&self) -> bool {
        self.in_buf.is_some() && self.out_buf.is_some()
    }

    /// The node's assignment as a [`NodePlacement`], if assigned.
    pub fn assignment(&self) -> Option<NodePlacement> {
        Some(NodePlacement {
            in_buf: self.in_buf?,
            out_buf: self.out_buf?,
            in_layout: self.in_layout,
            out_layout: self.out_layout,
        })
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        let assignment = match self.assignment() {
            Some(p) => format!("{p}"),
            None => "unassigned".to_string(),
        };
        format!(
            "[{}] {} ({}) len={:?} — {}",
            self.index, self.name, self.kind, self.length, assignment,
        )
    }
}
