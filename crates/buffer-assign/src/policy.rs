// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The assignment policy: search driver over placement traces.
//!
//! Walks the leaf sequence left to right, expanding the trace tree one
//! level per node with branch-and-bound pruning: cheap node-local
//! legality checks run *before* a child trace is materialised, so the
//! tree stays proportional to the valid and near-valid paths rather
//! than the full product of buffers × layouts × sequence length.
//! Completed paths are checked against the global constraints, scored
//! by fusion count, and the winner's decisions are backtracked onto
//! the plan's nodes.
//!
//! All search state lives in one [`AssignmentPolicy`] value constructed
//! fresh per run — never a process-wide singleton — so independent
//! planning runs may proceed concurrently on separate threads without
//! any locking.

use crate::equivalence::equivalent_layout;
use crate::trace::{backward_fusion_count_on, TraceArena, TraceId};
use crate::AssignError;
use plan_ir::{
    plan::{Assigned, Validated},
    ArrayLayout, BufferSet, BufferSlot, ExecPlan, FusedSpan, LeafNode, NodePlacement, ALL_SLOTS,
};

/// Secondary preference among completed paths with equal fusion counts.
///
/// The primary score is always the fusion count; a tie-break ranks the
/// survivors. Lower is better. The default, [`FewerBuffers`], prefers
/// paths touching fewer distinct buffers; alternative heuristics (e.g.
/// a per-kernel placement preference score) can be plugged in without
/// touching the search itself.
pub trait TieBreak {
    /// Human-readable name of this heuristic.
    fn name(&self) -> &str;

    /// Ranks a completed path; lower is better.
    fn score(&self, arena: &TraceArena, leaf: TraceId) -> usize;
}

/// Default tie-break: fewer distinct buffers touched is cheaper.
#[derive(Debug, Clone, Default)]
pub struct FewerBuffers;

impl TieBreak for FewerBuffers {
    fn name(&self) -> &str {
        "fewer-buffers"
    }

    fn score(&self, arena: &TraceArena, leaf: TraceId) -> usize {
        arena.num_used_buffers(leaf)
    }
}

/// A completed path recorded as a potential winner.
struct CandidatePath {
    leaf: TraceId,
    fusions: usize,
    fused_shims: Vec<usize>,
    path_id: usize,
}

/// Search state for one buffer-assignment run.
pub struct AssignmentPolicy {
    arena: TraceArena,
    winner_candidates: Vec<CandidatePath>,
    /// `None` until the first valid path completes.
    num_winner_fusions: Option<usize>,
    available_buffers: BufferSet,
    available_layouts: Vec<ArrayLayout>,
    /// Buffers some node mandates appear somewhere in the final path.
    must_use: BufferSet,
    /// Ordinal of the next valid completed path, for traceability.
    next_path_id: usize,
    tie_break: Box<dyn TieBreak>,
}

impl AssignmentPolicy {
    /// Creates a policy with the default tie-break.
    pub fn new() -> Self {
        Self {
            arena: TraceArena::new(),
            winner_candidates: Vec::new(),
            num_winner_fusions: None,
            available_buffers: BufferSet::new(),
            available_layouts: Vec::new(),
            must_use: BufferSet::new(),
            next_path_id: 0,
            tie_break: Box::new(FewerBuffers),
        }
    }

    /// Replaces the tie-break heuristic.
    pub fn with_tie_break(mut self, tie_break: Box<dyn TieBreak>) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Finds a legal, fusion-maximising buffer/layout assignment for
    /// every node of the plan.
    ///
    /// On success every leaf node carries its final input/output buffer
    /// and layout, and the plan's fusion record holds exactly the fused
    /// ranges of the winning path. On [`AssignError::NoValidAssignment`]
    /// the plan is dropped; the caller is expected to try a different
    /// decomposition.
    pub fn assign_buffers(
        mut self,
        mut plan: ExecPlan<Validated>,
    ) -> Result<ExecPlan<Assigned>, AssignError> {
        if plan.num_nodes() == 0 {
            // Validation forbids this; reaching here means the caller
            // bypassed the type-state contract.
            return Err(AssignError::MalformedPlan {
                detail: "empty execution sequence".into(),
            });
        }

        self.available_buffers = plan.available_buffers();
        self.available_layouts = plan.available_layouts();

        // Collect the global mandatory-buffer requirements up front.
        for node in plan.iter_nodes() {
            if let Some(required) = node.required_buffer {
                self.must_use.insert(required);
            }
        }
        let no_valid = || AssignError::NoValidAssignment {
            nodes: plan.num_nodes(),
            buffers: plan.available_buffers().len(),
        };
        for required in self.must_use.iter() {
            if !self.available_buffers.contains(required) {
                tracing::debug!(
                    "mandatory buffer {required} is outside the plan's budget",
                );
                return Err(no_valid());
            }
        }

        tracing::debug!(
            "assigning '{}': {} nodes, buffers {}, layouts {:?}, must use {}",
            plan.name,
            plan.num_nodes(),
            self.available_buffers,
            self.available_layouts,
            self.must_use,
        );

        let root = self.arena.root();
        self.enumerate(root, &plan, 0, plan.input.buf, plan.input.layout);

        let winner = self.update_winner_from_valid_paths().ok_or_else(no_valid)?;

        tracing::info!(
            "plan '{}': winner path {} fuses {} of {} nodes over {} buffers ({} traces explored)",
            plan.name,
            winner.path_id,
            winner.fusions,
            plan.num_nodes(),
            self.arena.num_used_buffers(winner.leaf),
            self.arena.len(),
        );

        // Backtrack the winning decisions onto the real nodes and build
        // the fusion-execution record from the same path.
        self.arena.backtracking(winner.leaf, &mut plan.nodes);
        let fused = winner
            .fused_shims
            .iter()
            .map(|&id| {
                let shim = &plan.shims[id];
                FusedSpan {
                    shim_id: id,
                    first: shim.first,
                    last: shim.last,
                    path_id: winner.path_id,
                }
            })
            .collect();

        Ok(plan.finish_assignment(fused))
    }

    /// Depth-first, branch-and-bound expansion over leaf positions.
    ///
    /// `cand_in_buf`/`cand_in_layout` are the output of the previous
    /// node along this path — the chaining invariant is enforced by
    /// construction.
    fn enumerate(
        &mut self,
        parent: TraceId,
        plan: &ExecPlan<Validated>,
        seq: usize,
        cand_in_buf: BufferSlot,
        cand_in_layout: ArrayLayout,
    ) {
        if seq == plan.num_nodes() {
            self.complete_path(parent, plan);
            return;
        }

        let node = &plan.nodes[seq];
        let out_layouts: Vec<ArrayLayout> = match node.fixed_out_layout {
            Some(l) => vec![l],
            None => node
                .kind
                .out_layout_candidates(cand_in_layout)
                .iter()
                .copied()
                .filter(|l| self.available_layouts.contains(l))
                .collect(),
        };

        for out_buf in ALL_SLOTS {
            if !self.available_buffers.contains(out_buf) {
                continue;
            }
            if !node.placement.allows(cand_in_buf, out_buf) {
                continue;
            }
            for &out_layout in &out_layouts {
                // Early rejection: never materialise an illegal child.
                if !self.valid_out_buffer(plan, node, out_buf, out_layout) {
                    continue;
                }
                let placement = NodePlacement {
                    in_buf: cand_in_buf,
                    out_buf,
                    in_layout: cand_in_layout,
                    out_layout,
                };
                let child = self.arena.add_child(parent, seq, placement);
                self.enumerate(child, plan, seq + 1, out_buf, out_layout);
            }
        }
    }

    /// Handles a completed root-to-leaf path: global validity, fusion
    /// scoring, and winner-candidate bookkeeping.
    fn complete_path(&mut self, leaf: TraceId, plan: &ExecPlan<Validated>) {
        let path = self.arena.path_placements(leaf);
        if !self.check_assignment_valid(&path, leaf, plan) {
            return;
        }

        let (fusions, fused_shims) = backward_fusion_count_on(&path, &plan.shims);
        let path_id = self.next_path_id;
        self.next_path_id += 1;

        match self.num_winner_fusions {
            // Losing path: drop it immediately to bound memory.
            Some(best) if fusions < best => return,
            // Strictly better: previous candidates become losers.
            Some(best) if fusions > best => self.winner_candidates.clear(),
            _ => {}
        }
        self.num_winner_fusions = Some(fusions);
        tracing::debug!(
            "valid path {path_id}: {fusions} fused nodes, {} buffers",
            self.arena.num_used_buffers(leaf),
        );
        self.winner_candidates.push(CandidatePath {
            leaf,
            fusions,
            fused_shims,
            path_id,
        });
    }

    /// Global, whole-path constraints that cannot be checked node by
    /// node.
    fn check_assignment_valid(
        &self,
        path: &[NodePlacement],
        leaf: TraceId,
        plan: &ExecPlan<Validated>,
    ) -> bool {
        let (first, last) = match (path.first(), path.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return false,
        };

        // The path must start at the declared overall input...
        if first.in_buf != plan.input.buf
            || !equivalent_layout(plan.input.layout, first.in_layout)
        {
            return false;
        }
        // ...and end at the declared overall output.
        if last.out_buf != plan.output.buf
            || !equivalent_layout(plan.output.layout, last.out_layout)
        {
            return false;
        }

        // Every mandated buffer must appear somewhere along the path.
        let used = self.arena.get(leaf).used_buffers();
        self.must_use.iter().all(|b| used.contains(b))
    }

    /// Selects the winner among recorded candidates: maximal fusion
    /// count, then the tie-break (fewest used buffers by default), then
    /// order of discovery.
    fn update_winner_from_valid_paths(&mut self) -> Option<CandidatePath> {
        let best = self.num_winner_fusions?;
        // Candidates recorded before a strictly-better path arrived may
        // linger with a lower count; they lost.
        self.winner_candidates.retain(|c| c.fusions == best);

        let mut winner_idx = 0;
        let mut winner_score = usize::MAX;
        for (i, cand) in self.winner_candidates.iter().enumerate() {
            let score = self.tie_break.score(&self.arena, cand.leaf);
            // Strict comparison keeps the first-found candidate on ties.
            if score < winner_score {
                winner_idx = i;
                winner_score = score;
            }
        }
        Some(self.winner_candidates.swap_remove(winner_idx))
    }

    /// Node-local legality filter for one candidate (out buffer, out
    /// layout) pair. Pure: no side effects beyond the verdict.
    fn valid_out_buffer(
        &self,
        plan: &ExecPlan<Validated>,
        node: &LeafNode,
        buf: BufferSlot,
        layout: ArrayLayout,
    ) -> bool {
        if !self.available_buffers.contains(buf) {
            return false;
        }

        // Writing into a user buffer must respect its declared layout;
        // temporaries hold working spectra, never raw real data.
        let port_ok = if buf == plan.input.buf {
            equivalent_layout(plan.input.layout, layout)
        } else if buf == plan.output.buf {
            equivalent_layout(plan.output.layout, layout)
        } else {
            layout.is_complex() || layout.is_hermitian()
        };
        if !port_ok {
            return false;
        }

        if node.unit_stride_out {
            let len = effective_node_out_len(node, layout);
            if !buffer_is_unit_stride(plan, buf, &len) {
                return false;
            }
        }

        true
    }
}

impl Default for AssignmentPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// The node's output length per dimension under the given layout.
///
/// A Hermitian half-spectrum stores only `n/2 + 1` elements along the
/// fastest dimension.
pub(crate) fn effective_node_out_len(node: &LeafNode, out_layout: ArrayLayout) -> Vec<usize> {
    let mut len = node.length.clone();
    if out_layout.is_hermitian() {
        if let Some(fastest) = len.first_mut() {
            *fastest = *fastest / 2 + 1;
        }
    }
    len
}

/// Whether writing `len` elements to `buf` lands on unit stride.
///
/// Temporaries are always dense. User buffers are checked against the
/// strides the caller declared for them. A node may view the data at a
/// higher rank than the caller declared (a 1D transform decomposed
/// into 2D stages); dimensions past the declared stride vector are
/// taken as dense.
pub(crate) fn buffer_is_unit_stride(
    plan: &ExecPlan<Validated>,
    buf: BufferSlot,
    len: &[usize],
) -> bool {
    if buf.is_temp() {
        return true;
    }
    let stride = if buf == plan.input.buf {
        &plan.in_stride
    } else {
        &plan.out_stride
    };
    stride_is_dense(stride, len)
}

/// A stride vector is dense when the fastest dimension has stride 1 and
/// each slower stride equals the product of the faster lengths.
/// Undeclared trailing dimensions count as dense.
fn stride_is_dense(stride: &[usize], len: &[usize]) -> bool {
    let mut expect = 1;
    for (s, l) in stride.iter().zip(len) {
        if *s != expect {
            return false;
        }
        expect *= l;
    }
    !stride.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_ir::{FuseScheme, FuseShim, KernelKind, Placement, PlanPort, Precision};

    const CI: ArrayLayout = ArrayLayout::ComplexInterleaved;

    fn node(index: usize, kind: KernelKind) -> LeafNode {
        LeafNode::new(format!("node.{index}"), kind, index, vec![64])
    }

    fn stockham_chain(n: usize) -> Vec<LeafNode> {
        (0..n).map(|i| node(i, KernelKind::Stockham)).collect()
    }

    fn port(buf: BufferSlot, layout: ArrayLayout) -> PlanPort {
        PlanPort { buf, layout }
    }

    fn plan_with(
        nodes: Vec<LeafNode>,
        shims: Vec<FuseShim>,
        input: PlanPort,
        output: PlanPort,
        temps: &[BufferSlot],
    ) -> ExecPlan<Validated> {
        ExecPlan::new(
            "test".into(),
            Precision::Single,
            nodes,
            shims,
            input,
            output,
            BufferSet::from_slots(temps),
            vec![1],
            vec![1],
        )
        .validate()
        .unwrap()
    }

    /// Simple out-of-place complex plan: user_in -> user_out, one temp.
    fn simple_plan(n: usize, shims: Vec<FuseShim>) -> ExecPlan<Validated> {
        plan_with(
            stockham_chain(n),
            shims,
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            &[BufferSlot::Temp],
        )
    }

    fn assert_chained(plan: &ExecPlan<Assigned>) {
        for w in plan.nodes.windows(2) {
            let a = w[0].assignment().unwrap();
            let b = w[1].assignment().unwrap();
            assert_eq!(a.out_buf, b.in_buf, "buffer chain broken");
            assert!(
                equivalent_layout(a.out_layout, b.in_layout),
                "layout chain broken: {} then {}",
                a.out_layout,
                b.in_layout,
            );
        }
    }

    fn assert_boundaries(plan: &ExecPlan<Assigned>) {
        let first = plan.nodes.first().unwrap().assignment().unwrap();
        let last = plan.nodes.last().unwrap().assignment().unwrap();
        assert_eq!(first.in_buf, plan.input.buf);
        assert!(equivalent_layout(plan.input.layout, first.in_layout));
        assert_eq!(last.out_buf, plan.output.buf);
        assert!(equivalent_layout(plan.output.layout, last.out_layout));
    }

    #[test]
    fn test_single_node_out_of_place() {
        let assigned = AssignmentPolicy::new()
            .assign_buffers(simple_plan(1, vec![]))
            .unwrap();
        let p = assigned.nodes[0].assignment().unwrap();
        assert_eq!(p.in_buf, BufferSlot::UserIn);
        assert_eq!(p.out_buf, BufferSlot::UserOut);
        assert_boundaries(&assigned);
    }

    #[test]
    fn test_chain_invariants() {
        let assigned = AssignmentPolicy::new()
            .assign_buffers(simple_plan(5, vec![]))
            .unwrap();
        assert!(assigned.nodes.iter().all(|n| n.is_assigned()));
        assert_chained(&assigned);
        assert_boundaries(&assigned);
    }

    #[test]
    fn test_tie_break_prefers_fewer_buffers() {
        // With no shims every valid path has zero fusions; the winner
        // must be one that never touches the temp.
        let assigned = AssignmentPolicy::new()
            .assign_buffers(simple_plan(4, vec![]))
            .unwrap();
        assert_eq!(assigned.used_buffers().len(), 2);
        assert!(!assigned.used_buffers().contains(BufferSlot::Temp));
    }

    // The 3-node scenario: A must run in place, B must run out of
    // place, C may do either; a fully in-place transform over the user
    // buffer with one temp. The only legal shape is A(U->U), B(U->T),
    // C(T->U): C's output is forced back to U by the boundary.
    #[test]
    fn test_forced_bounce_through_temp() {
        let mut nodes = stockham_chain(3);
        nodes[0].placement = Placement::InPlace;
        nodes[1].placement = Placement::OutOfPlace;
        let plan = plan_with(
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserIn, CI),
            &[BufferSlot::Temp],
        );
        let assigned = AssignmentPolicy::new().assign_buffers(plan).unwrap();

        let a = assigned.nodes[0].assignment().unwrap();
        let b = assigned.nodes[1].assignment().unwrap();
        let c = assigned.nodes[2].assignment().unwrap();
        assert_eq!((a.in_buf, a.out_buf), (BufferSlot::UserIn, BufferSlot::UserIn));
        assert_eq!((b.in_buf, b.out_buf), (BufferSlot::UserIn, BufferSlot::Temp));
        assert_eq!((c.in_buf, c.out_buf), (BufferSlot::Temp, BufferSlot::UserIn));
        assert_eq!(assigned.num_fused_nodes(), 0);
    }

    #[test]
    fn test_inplace_only_chain_cannot_leave_input() {
        // Every node is in-place-only but the output port is a
        // different buffer: no valid path can exist.
        let mut nodes = stockham_chain(2);
        for n in &mut nodes {
            n.placement = Placement::InPlace;
        }
        let plan = plan_with(
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            &[BufferSlot::Temp],
        );
        let err = AssignmentPolicy::new().assign_buffers(plan).unwrap_err();
        assert!(matches!(err, AssignError::NoValidAssignment { .. }));
    }

    #[test]
    fn test_winner_maximises_fusions() {
        // A shared_output shim over nodes 1..=2: the winner must pick a
        // path on which both nodes write the same buffer.
        let shims = vec![FuseShim {
            id: 0,
            first: 1,
            last: 2,
            scheme: FuseScheme::SharedOutput,
        }];
        let assigned = AssignmentPolicy::new()
            .assign_buffers(simple_plan(4, shims))
            .unwrap();
        assert_eq!(assigned.num_fused_nodes(), 2);
        let span = &assigned.fused_spans()[0];
        assert_eq!((span.shim_id, span.first, span.last), (0, 1, 2));

        let p1 = assigned.nodes[1].assignment().unwrap();
        let p2 = assigned.nodes[2].assignment().unwrap();
        assert_eq!(p1.out_buf, p2.out_buf);
        assert_chained(&assigned);
        assert_boundaries(&assigned);
    }

    #[test]
    fn test_unfusable_shim_scores_zero() {
        // An inplace_chain shim over two out-of-place-only nodes can
        // never fuse, but the plan still assigns.
        let mut nodes = stockham_chain(2);
        nodes[0].placement = Placement::OutOfPlace;
        nodes[1].placement = Placement::OutOfPlace;
        let shims = vec![FuseShim {
            id: 0,
            first: 0,
            last: 1,
            scheme: FuseScheme::InplaceChain,
        }];
        let plan = plan_with(
            nodes,
            shims,
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            &[BufferSlot::Temp],
        );
        let assigned = AssignmentPolicy::new().assign_buffers(plan).unwrap();
        assert_eq!(assigned.num_fused_nodes(), 0);
        assert!(assigned.fused_spans().is_empty());
    }

    #[test]
    fn test_mandatory_temp_without_budget_fails() {
        let mut nodes = stockham_chain(2);
        nodes[0].required_buffer = Some(BufferSlot::Temp);
        let plan = plan_with(
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            &[], // zero temp buffers
        );
        let err = AssignmentPolicy::new().assign_buffers(plan).unwrap_err();
        assert!(matches!(err, AssignError::NoValidAssignment { .. }));
    }

    #[test]
    fn test_mandatory_temp_appears_in_winning_path() {
        let mut nodes = stockham_chain(3);
        nodes[1].required_buffer = Some(BufferSlot::Temp);
        let plan = plan_with(
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            &[BufferSlot::Temp],
        );
        let assigned = AssignmentPolicy::new().assign_buffers(plan).unwrap();
        assert!(assigned.used_buffers().contains(BufferSlot::Temp));
        assert_chained(&assigned);
        assert_boundaries(&assigned);
    }

    #[test]
    fn test_bluestein_steps_pull_in_blue_buffer() {
        let mut nodes = vec![
            node(0, KernelKind::ChirpSetup),
            node(1, KernelKind::PadMul),
            node(2, KernelKind::Stockham),
        ];
        // Chirp setup generates its table out of place into the blue
        // buffer.
        nodes[0].placement = Placement::OutOfPlace;
        let plan = plan_with(
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            &[BufferSlot::Temp, BufferSlot::TempBlue],
        );
        let assigned = AssignmentPolicy::new().assign_buffers(plan).unwrap();
        assert!(assigned.used_buffers().contains(BufferSlot::TempBlue));
    }

    #[test]
    fn test_unit_stride_output_rejects_strided_user_buffer() {
        // The user output buffer is padded (stride 2); the last node
        // demands unit-stride output, so no valid path can end there.
        let mut nodes = stockham_chain(2);
        nodes[1].unit_stride_out = true;
        let plan = ExecPlan::new(
            "strided".into(),
            Precision::Single,
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, CI),
            BufferSet::from_slots(&[BufferSlot::Temp]),
            vec![1],
            vec![2], // padded output
        )
        .validate()
        .unwrap();
        let err = AssignmentPolicy::new().assign_buffers(plan).unwrap_err();
        assert!(matches!(err, AssignError::NoValidAssignment { .. }));
    }

    #[test]
    fn test_real_transform_chains_through_hermitian() {
        // Even-length forward real transform: the input is viewed as
        // dense complex, the r2c post-step emits the half-spectrum and
        // mandates the complex temporary somewhere along the path.
        let nodes = vec![
            node(0, KernelKind::Stockham),
            node(1, KernelKind::RealToComplex),
        ];
        let plan = plan_with(
            nodes,
            vec![],
            port(BufferSlot::UserIn, CI),
            port(BufferSlot::UserOut, ArrayLayout::HermitianInterleaved),
            &[BufferSlot::Temp, BufferSlot::TempCmplx],
        );
        let assigned = AssignmentPolicy::new().assign_buffers(plan).unwrap();
        let last = assigned.nodes[1].assignment().unwrap();
        assert!(last.out_layout.is_hermitian());
        assert!(assigned.used_buffers().contains(BufferSlot::TempCmplx));
        assert_boundaries(&assigned);
    }

    #[test]
    fn test_idempotent_across_runs() {
        let collect = |p: &ExecPlan<Assigned>| -> Vec<NodePlacement> {
            p.nodes.iter().map(|n| n.assignment().unwrap()).collect()
        };
        let shims = vec![FuseShim {
            id: 0,
            first: 0,
            last: 1,
            scheme: FuseScheme::SharedOutput,
        }];
        let a = AssignmentPolicy::new()
            .assign_buffers(simple_plan(4, shims.clone()))
            .unwrap();
        let b = AssignmentPolicy::new()
            .assign_buffers(simple_plan(4, shims))
            .unwrap();
        assert_eq!(collect(&a), collect(&b));
        assert_eq!(a.fused_spans(), b.fused_spans());
    }

    #[test]
    fn test_effective_out_len_hermitian_halves() {
        let mut n = node(0, KernelKind::RealToComplex);
        n.length = vec![128, 4];
        assert_eq!(
            effective_node_out_len(&n, ArrayLayout::HermitianInterleaved),
            vec![65, 4]
        );
        assert_eq!(effective_node_out_len(&n, CI), vec![128, 4]);
    }

    #[test]
    fn test_stride_is_dense() {
        assert!(stride_is_dense(&[1], &[64]));
        assert!(stride_is_dense(&[1, 64], &[64, 32]));
        assert!(!stride_is_dense(&[2], &[64]));
        assert!(!stride_is_dense(&[1, 80], &[64, 32]));
        assert!(!stride_is_dense(&[], &[]));
    }

    #[test]
    fn test_stride_rank_below_node_rank_counts_as_dense() {
        // A 1D caller stride against a node viewing the data as 2D:
        // the declared fastest dimension decides, the rest is dense.
        assert!(stride_is_dense(&[1], &[64, 32]));
        assert!(!stride_is_dense(&[2], &[64, 32]));
    }
}
