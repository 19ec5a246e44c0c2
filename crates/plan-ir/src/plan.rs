// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution plan: the flattened leaf sequence plus plan-level metadata.
//!
//! # Type-State Pattern
//!
//! The plan transitions through states enforced at compile time:
//!
//! ```text
//! ExecPlan<Draft>      — nodes collected, not yet checked.
//!       │  .validate()
//!       ▼
//! ExecPlan<Validated>  — shape checked, ready for buffer assignment.
//!       │  buffer assigner writes placements, .finish_assignment()
//!       ▼
//! ExecPlan<Assigned>   — every node carries its final buffers/layouts.
//! ```
//!
//! This prevents the buffer assigner from ever receiving a malformed
//! plan, and prevents callers from executing a plan that was never
//! assigned. The markers are `PhantomData` (ZST), so the transitions
//! are free at runtime.

use crate::{
    ArrayLayout, BufferSet, BufferSlot, FuseShim, FusedSpan, LeafNode, PlanError, Precision,
};
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: plan has been built but not validated.
#[derive(Debug, Clone)]
pub struct Draft;

/// Marker: plan has been validated and may be assigned.
#[derive(Debug, Clone)]
pub struct Validated;

/// Marker: every node carries a final buffer/layout assignment.
#[derive(Debug, Clone)]
pub struct Assigned;

/// Sealed trait for plan states.
pub trait PlanState: fmt::Debug + Clone {}
impl PlanState for Draft {}
impl PlanState for Validated {}
impl PlanState for Assigned {}

// ── Plan ports ─────────────────────────────────────────────────────

/// The caller-declared buffer and layout at one end of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlanPort {
    pub buf: BufferSlot,
    pub layout: ArrayLayout,
}

impl fmt::Display for PlanPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.buf, self.layout)
    }
}

// ── ExecPlan ───────────────────────────────────────────────────────

/// A decomposed transform as an ordered sequence of kernel launches.
///
/// The generic parameter `S` encodes the lifecycle state at compile
/// time. The plan stores only metadata — no twiddle tables, no device
/// memory, no kernel code.
#[derive(Debug, Clone)]
pub struct ExecPlan<S: PlanState = Draft> {
    /// Human-readable plan name (e.g., `"fft_1d_8192_r2c"`).
    pub name: String,
    /// Floating-point precision of the transform.
    pub precision: Precision,
    /// Leaf nodes in execution order.
    pub nodes: Vec<LeafNode>,
    /// Fusion candidates over contiguous node ranges.
    pub shims: Vec<FuseShim>,
    /// Overall input buffer and layout declared by the caller.
    pub input: PlanPort,
    /// Overall output buffer and layout declared by the caller.
    pub output: PlanPort,
    /// Temporary buffer slots this plan is allowed to use.
    pub temp_buffers: BufferSet,
    /// Element strides of the user input buffer, fastest dimension first.
    pub in_stride: Vec<usize>,
    /// Element strides of the user output buffer, fastest dimension first.
    pub out_stride: Vec<usize>,
    /// Fused ranges of the winning assignment (populated in `Assigned`).
    fused: Vec<FusedSpan>,
    /// State marker (zero-sized, compile-time only).
    _state: std::marker::PhantomData<S>,
}

// ── Draft state ────────────────────────────────────────────────────

impl ExecPlan<Draft> {
    /// Creates a new plan in the `Draft` state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        precision: Precision,
        nodes: Vec<LeafNode>,
        shims: Vec<FuseShim>,
        input: PlanPort,
        output: PlanPort,
        temp_buffers: BufferSet,
        in_stride: Vec<usize>,
        out_stride: Vec<usize>,
    ) -> Self {
        Self {
            name,
            precision,
            nodes,
            shims,
            input,
            output,
            temp_buffers,
            in_stride,
            out_stride,
            fused: Vec::new(),
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the plan and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The node sequence is non-empty.
    /// - Node indices are consecutive starting from 0.
    /// - No node has a zero-element length.
    /// - Declared ports do not use `Unset` layouts, and no port names a
    ///   temp slot it did not budget.
    /// - Shim ids match their list position, ranges are in bounds and
    ///   ordered, and ranges do not overlap.
    ///
    /// A failure here is a contract violation by the decomposition
    /// subsystem, not a planning failure: the plan cannot be assigned
    /// at all, as opposed to having no valid assignment.
    pub fn validate(self) -> Result<ExecPlan<Validated>, PlanError> {
        if self.nodes.is_empty() {
            return Err(PlanError::EmptyPlan);
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if node.index != i {
                return Err(PlanError::InvalidNode {
                    node: node.name.clone(),
                    detail: format!("expected index {i}, got {}", node.index),
                });
            }
            if node.length.is_empty() || node.num_elements() == 0 {
                return Err(PlanError::InvalidNode {
                    node: node.name.clone(),
                    detail: "zero-element length".into(),
                });
            }
        }

        for port in [&self.input, &self.output] {
            if port.layout == ArrayLayout::Unset {
                return Err(PlanError::InvalidPlan(format!(
                    "plan port {} has no declared layout",
                    port.buf,
                )));
            }
            if port.buf.is_temp() && !self.temp_buffers.contains(port.buf) {
                return Err(PlanError::InvalidPlan(format!(
                    "plan port uses unbudgeted temp buffer {}",
                    port.buf,
                )));
            }
        }

        let mut prev_last: Option<usize> = None;
        for (i, shim) in self.shims.iter().enumerate() {
            if shim.id != i {
                return Err(PlanError::InvalidShim {
                    shim: shim.id,
                    detail: format!("expected id {i}"),
                });
            }
            if shim.first > shim.last || shim.last >= self.nodes.len() {
                return Err(PlanError::InvalidShim {
                    shim: shim.id,
                    detail: format!(
                        "range {}..={} out of bounds for {} nodes",
                        shim.first,
                        shim.last,
                        self.nodes.len(),
                    ),
                });
            }
            if let Some(last) = prev_last {
                if shim.first <= last {
                    return Err(PlanError::InvalidShim {
                        shim: shim.id,
                        detail: format!("range overlaps previous shim ending at {last}"),
                    });
                }
            }
            prev_last = Some(shim.last);
        }

        Ok(ExecPlan {
            name: self.name,
            precision: self.precision,
            nodes: self.nodes,
            shims: self.shims,
            input: self.input,
            output: self.output,
            temp_buffers: self.temp_buffers,
            in_stride: self.in_stride,
            out_stride: self.out_stride,
            fused: Vec::new(),
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl ExecPlan<Validated> {
    /// The layout universe available to this plan.
    ///
    /// Complex-interleaved is always available as the working layout of
    /// the temporaries; the declared port layouts are available by
    /// definition; Hermitian-interleaved is added whenever a port is
    /// Hermitian so that real-transform middles can chain through it.
    /// Returned in a fixed order so enumeration is deterministic.
    pub fn available_layouts(&self) -> Vec<ArrayLayout> {
        let mut layouts = vec![ArrayLayout::ComplexInterleaved];
        let mut push = |l: ArrayLayout| {
            if !layouts.contains(&l) {
                layouts.push(l);
            }
        };
        push(self.input.layout);
        push(self.output.layout);
        if self.input.layout.is_hermitian() || self.output.layout.is_hermitian() {
            push(ArrayLayout::HermitianInterleaved);
        }
        layouts
    }

    /// The buffer slots available to this plan: the declared port
    /// buffers plus the temp budget.
    ///
    /// A fully in-place transform declares the same buffer on both
    /// ports, so the other user slot is not available to it.
    pub fn available_buffers(&self) -> BufferSet {
        let mut set = self.temp_buffers;
        set.insert(self.input.buf);
        set.insert(self.output.buf);
        set
    }

    /// Consumes the plan once every node has had its assignment written,
    /// recording the winning path's fused ranges.
    ///
    /// Called by the buffer assigner after backtracking; callers should
    /// not invoke this directly.
    pub fn finish_assignment(self, fused: Vec<FusedSpan>) -> ExecPlan<Assigned> {
        debug_assert!(self.nodes.iter().all(|n| n.is_assigned()));
        ExecPlan {
            name: self.name,
            precision: self.precision,
            nodes: self.nodes,
            shims: self.shims,
            input: self.input,
            output: self.output,
            temp_buffers: self.temp_buffers,
            in_stride: self.in_stride,
            out_stride: self.out_stride,
            fused,
            _state: std::marker::PhantomData,
        }
    }
}

// ── Assigned state ─────────────────────────────────────────────────

impl ExecPlan<Assigned> {
    /// The fused ranges of the winning assignment.
    pub fn fused_spans(&self) -> &[FusedSpan] {
        &self.fused
    }

    /// Total number of nodes absorbed into some fusion.
    pub fn num_fused_nodes(&self) -> usize {
        self.fused.iter().map(|s| s.last - s.first + 1).sum()
    }

    /// Distinct buffers touched by the final assignment.
    pub fn used_buffers(&self) -> BufferSet {
        let mut set = BufferSet::new();
        for node in &self.nodes {
            if let (Some(i), Some(o)) = (node.in_buf, node.out_buf) {
                set.insert(i);
                set.insert(o);
            }
        }
        set
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: PlanState> ExecPlan<S> {
    /// Returns the number of leaf nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns a reference to a node by execution-order index.
    pub fn node(&self, index: usize) -> Option<&LeafNode> {
        self.nodes.get(index)
    }

    /// Returns an iterator over the nodes in execution order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &LeafNode> {
        self.nodes.iter()
    }

    /// Returns a summary string describing the plan.
    pub fn summary(&self) -> String {
        format!(
            "Plan '{}': {} nodes, {} fusion candidates, {} -> {}, {} temp buffers, {}",
            self.name,
            self.nodes.len(),
            self.shims.len(),
            self.input,
            self.output,
            self.temp_buffers.len(),
            self.precision,
        )
    }
}

impl<S: PlanState> fmt::Display for ExecPlan<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ExecPlan '{}' ({} nodes):", self.name, self.nodes.len())?;
        for node in &self.nodes {
            writeln!(f, "  {}", node.summary())?;
        }
        for shim in &self.shims {
            writeln!(f, "  {shim}")?;
        }
        Ok(())
    }
}
