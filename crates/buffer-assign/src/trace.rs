// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The placement trace tree.
//!
//! Each trace is one node of the assignment search tree: a candidate
//! buffer/layout decision at one position in the leaf sequence, plus
//! path statistics accumulated from the root. The tree is *not*
//! complete — early rejection in the enumerator stops branches before
//! a trace is ever materialised.
//!
//! Traces live in an arena indexed by [`TraceId`]: children are owned
//! through index vectors on their parent, and the parent link exists
//! only for backtracking. The whole arena is dropped when the
//! assignment run completes; nothing outlives one run.

use plan_ir::{BufferSet, FuseShim, LeafNode, NodePlacement};

/// Index of a trace in the arena. The synthetic root is always id 0.
pub type TraceId = usize;

/// One node of the assignment search tree.
#[derive(Debug, Clone)]
pub struct PlacementTrace {
    /// Leaf-sequence position this trace assigns; `None` for the root.
    seq: Option<usize>,
    /// The candidate decision; `None` for the root.
    placement: Option<NodePlacement>,
    /// In-place choices from the root to here.
    num_inplace: u32,
    /// Layout switches from the root to here.
    num_layout_switches: u32,
    /// Buffers touched from the root to here. Grows monotonically
    /// along any root-to-leaf path.
    used_buffers: BufferSet,
    /// Parent link, for backtracking only. `None` for the root.
    parent: Option<TraceId>,
    /// Owned children, one per surviving candidate at the next position.
    children: Vec<TraceId>,
}

impl PlacementTrace {
    /// The decision recorded at this trace, if any.
    pub fn placement(&self) -> Option<NodePlacement> {
        self.placement
    }

    /// Leaf-sequence position, if not the root.
    pub fn seq(&self) -> Option<usize> {
        self.seq
    }

    /// In-place count accumulated along the path.
    pub fn num_inplace(&self) -> u32 {
        self.num_inplace
    }

    /// Layout-switch count accumulated along the path.
    pub fn num_layout_switches(&self) -> u32 {
        self.num_layout_switches
    }

    /// Buffers touched along the path so far.
    pub fn used_buffers(&self) -> BufferSet {
        self.used_buffers
    }

    /// Number of child branches explored from this trace.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }
}

/// Arena holding one run's placement trace tree.
#[derive(Debug)]
pub struct TraceArena {
    traces: Vec<PlacementTrace>,
}

impl TraceArena {
    /// Creates an arena seeded with the synthetic root trace.
    pub fn new() -> Self {
        Self {
            traces: vec![PlacementTrace {
                seq: None,
                placement: None,
                num_inplace: 0,
                num_layout_switches: 0,
                used_buffers: BufferSet::new(),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The synthetic root trace.
    pub fn root(&self) -> TraceId {
        0
    }

    /// Total number of traces materialised so far (root included).
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Returns `true` only for a freshly-built arena with no decisions.
    pub fn is_empty(&self) -> bool {
        self.traces.len() <= 1
    }

    /// Returns the trace with the given id.
    ///
    /// # Panics
    /// Panics if the id was not produced by this arena.
    pub fn get(&self, id: TraceId) -> &PlacementTrace {
        &self.traces[id]
    }

    /// Accepts a candidate decision into the tree as a child of
    /// `parent`, computing the accumulated path statistics.
    pub fn add_child(
        &mut self,
        parent: TraceId,
        seq: usize,
        placement: NodePlacement,
    ) -> TraceId {
        let p = &self.traces[parent];
        let is_inplace = placement.is_inplace();
        let switches_layout = placement.in_layout != placement.out_layout;
        let mut used_buffers = p.used_buffers;
        used_buffers.insert(placement.in_buf);
        used_buffers.insert(placement.out_buf);

        let child = PlacementTrace {
            seq: Some(seq),
            placement: Some(placement),
            num_inplace: p.num_inplace + u32::from(is_inplace),
            num_layout_switches: p.num_layout_switches + u32::from(switches_layout),
            used_buffers,
            parent: Some(parent),
            children: Vec::new(),
        };

        let id = self.traces.len();
        self.traces.push(child);
        self.traces[parent].children.push(id);
        id
    }

    /// Number of distinct buffers touched along the path ending here.
    pub fn num_used_buffers(&self, id: TraceId) -> usize {
        self.traces[id].used_buffers.len()
    }

    /// Collects the placements along the root-to-`leaf` path in
    /// execution order by walking parent links backwards.
    pub fn path_placements(&self, leaf: TraceId) -> Vec<NodePlacement> {
        let mut path = Vec::new();
        let mut cur = Some(leaf);
        while let Some(id) = cur {
            let trace = &self.traces[id];
            if let Some(p) = trace.placement {
                path.push(p);
            }
            cur = trace.parent;
        }
        path.reverse();
        path
    }

    /// Counts how many nodes of the path ending at `leaf` can be
    /// absorbed into fusions, and which shims fuse.
    ///
    /// Walks the path from the tail toward the head, satisfying shims
    /// in last-to-first order: when a shim's range ends at the current
    /// position its rule is evaluated over this path's placements for
    /// the whole range. On success the entire span counts as fused and
    /// the walk resumes before the range start; on failure no node of
    /// the range counts and the walk steps node-by-node. Fusability
    /// depends on the choices made at every node of the range, so this
    /// is necessarily a per-path computation.
    ///
    /// Requires `shims` ordered by range and non-overlapping (plan
    /// validation guarantees both). Returns the fused node count and
    /// the fused shim ids in range order.
    pub fn backward_fusion_count(
        &self,
        leaf: TraceId,
        shims: &[FuseShim],
    ) -> (usize, Vec<usize>) {
        let path = self.path_placements(leaf);
        backward_fusion_count_on(&path, shims)
    }

    /// Writes the path's decisions onto the corresponding leaf nodes.
    ///
    /// Walks parent links from the chosen winning trace to the root;
    /// every non-root trace writes its four assignment fields onto the
    /// node at its sequence position.
    pub fn backtracking(&self, leaf: TraceId, nodes: &mut [LeafNode]) {
        let mut cur = Some(leaf);
        while let Some(id) = cur {
            let trace = &self.traces[id];
            if let (Some(seq), Some(p)) = (trace.seq, trace.placement) {
                let node = &mut nodes[seq];
                node.in_buf = Some(p.in_buf);
                node.out_buf = Some(p.out_buf);
                node.in_layout = p.in_layout;
                node.out_layout = p.out_layout;
            }
            cur = trace.parent;
        }
    }
}

impl Default for TraceArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared fusion walk over an already-collected path.
pub(crate) fn backward_fusion_count_on(
    path: &[NodePlacement],
    shims: &[FuseShim],
) -> (usize, Vec<usize>) {
    let mut count = 0;
    let mut fused_ids = Vec::new();
    let mut shim_idx = shims.len();
    let mut pos = path.len();

    while pos > 0 {
        let cur = pos - 1;
        while shim_idx > 0 && shims[shim_idx - 1].last > cur {
            shim_idx -= 1;
        }
        if shim_idx > 0 && shims[shim_idx - 1].last == cur {
            let shim = &shims[shim_idx - 1];
            if shim.fusable(&path[shim.first..=shim.last]) {
                count += shim.span();
                fused_ids.push(shim.id);
                shim_idx -= 1;
                pos = shim.first;
                continue;
            }
        }
        pos = cur;
    }

    fused_ids.reverse();
    (count, fused_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_ir::{ArrayLayout, BufferSlot, FuseScheme, KernelKind};

    const CI: ArrayLayout = ArrayLayout::ComplexInterleaved;
    const CP: ArrayLayout = ArrayLayout::ComplexPlanar;

    fn placement(in_buf: BufferSlot, out_buf: BufferSlot) -> NodePlacement {
        NodePlacement {
            in_buf,
            out_buf,
            in_layout: CI,
            out_layout: CI,
        }
    }

    fn shim(id: usize, first: usize, last: usize, scheme: FuseScheme) -> FuseShim {
        FuseShim {
            id,
            first,
            last,
            scheme,
        }
    }

    /// Builds a linear chain of traces from a placement list and
    /// returns the leaf id.
    fn chain(arena: &mut TraceArena, placements: &[NodePlacement]) -> TraceId {
        let mut cur = arena.root();
        for (seq, p) in placements.iter().enumerate() {
            cur = arena.add_child(cur, seq, *p);
        }
        cur
    }

    #[test]
    fn test_root_is_synthetic() {
        let arena = TraceArena::new();
        let root = arena.get(arena.root());
        assert_eq!(root.seq(), None);
        assert_eq!(root.placement(), None);
        assert_eq!(root.num_inplace(), 0);
        assert_eq!(root.num_layout_switches(), 0);
        assert!(root.used_buffers().is_empty());
        assert!(arena.is_empty());
    }

    #[test]
    fn test_counters_accumulate() {
        let mut arena = TraceArena::new();
        let a = arena.add_child(
            arena.root(),
            0,
            placement(BufferSlot::UserIn, BufferSlot::UserIn), // in place
        );
        let b = arena.add_child(
            a,
            1,
            NodePlacement {
                in_buf: BufferSlot::UserIn,
                out_buf: BufferSlot::Temp, // out of place
                in_layout: CI,
                out_layout: CP, // layout switch
            },
        );
        let tb = arena.get(b);
        assert_eq!(tb.num_inplace(), 1);
        assert_eq!(tb.num_layout_switches(), 1);
        assert_eq!(arena.num_used_buffers(b), 2);
    }

    #[test]
    fn test_counters_monotonic_along_path() {
        let mut arena = TraceArena::new();
        let leaf = chain(
            &mut arena,
            &[
                placement(BufferSlot::UserIn, BufferSlot::UserIn),
                placement(BufferSlot::UserIn, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::UserOut),
            ],
        );
        // Walk root -> leaf checking every counter never decreases.
        let ids = {
            let mut ids = vec![leaf];
            let mut cur = leaf;
            while let Some(p) = arena.get(cur).parent {
                ids.push(p);
                cur = p;
            }
            ids.reverse();
            ids
        };
        for w in ids.windows(2) {
            let (a, b) = (arena.get(w[0]), arena.get(w[1]));
            assert!(b.num_inplace() >= a.num_inplace());
            assert!(b.num_layout_switches() >= a.num_layout_switches());
            assert!(b.used_buffers().len() >= a.used_buffers().len());
            // usedBuffers is a growing superset.
            assert_eq!(
                a.used_buffers().union(b.used_buffers()),
                b.used_buffers()
            );
        }
    }

    #[test]
    fn test_used_buffers_is_parent_union_own() {
        let mut arena = TraceArena::new();
        let a = arena.add_child(
            arena.root(),
            0,
            placement(BufferSlot::UserIn, BufferSlot::Temp),
        );
        let b = arena.add_child(a, 1, placement(BufferSlot::Temp, BufferSlot::UserOut));
        let expected = {
            let mut s = arena.get(a).used_buffers();
            s.insert(BufferSlot::Temp);
            s.insert(BufferSlot::UserOut);
            s
        };
        assert_eq!(arena.get(b).used_buffers(), expected);
        assert_eq!(arena.num_used_buffers(b), 3);
    }

    #[test]
    fn test_path_placements_in_execution_order() {
        let mut arena = TraceArena::new();
        let p0 = placement(BufferSlot::UserIn, BufferSlot::Temp);
        let p1 = placement(BufferSlot::Temp, BufferSlot::UserOut);
        let leaf = chain(&mut arena, &[p0, p1]);
        assert_eq!(arena.path_placements(leaf), vec![p0, p1]);
    }

    #[test]
    fn test_branches_are_independent() {
        let mut arena = TraceArena::new();
        let a = arena.add_child(
            arena.root(),
            0,
            placement(BufferSlot::UserIn, BufferSlot::Temp),
        );
        let b1 = arena.add_child(a, 1, placement(BufferSlot::Temp, BufferSlot::Temp));
        let b2 = arena.add_child(a, 1, placement(BufferSlot::Temp, BufferSlot::UserOut));
        assert_eq!(arena.get(a).num_children(), 2);
        assert_eq!(arena.num_used_buffers(b1), 2);
        assert_eq!(arena.num_used_buffers(b2), 3);
    }

    #[test]
    fn test_fusion_count_shared_output() {
        let mut arena = TraceArena::new();
        // Nodes 1 and 2 both write Temp: the shared_output shim fuses.
        let leaf = chain(
            &mut arena,
            &[
                placement(BufferSlot::UserIn, BufferSlot::UserIn),
                placement(BufferSlot::UserIn, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::UserOut),
            ],
        );
        let shims = vec![shim(0, 1, 2, FuseScheme::SharedOutput)];
        let (count, fused) = arena.backward_fusion_count(leaf, &shims);
        assert_eq!(count, 2);
        assert_eq!(fused, vec![0]);
    }

    #[test]
    fn test_fusion_all_or_nothing() {
        let mut arena = TraceArena::new();
        // Node 2 writes TempCmplx instead of Temp: the range fails and
        // contributes zero fused nodes.
        let leaf = chain(
            &mut arena,
            &[
                placement(BufferSlot::UserIn, BufferSlot::UserIn),
                placement(BufferSlot::UserIn, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::TempCmplx),
                placement(BufferSlot::TempCmplx, BufferSlot::UserOut),
            ],
        );
        let shims = vec![shim(0, 1, 2, FuseScheme::SharedOutput)];
        let (count, fused) = arena.backward_fusion_count(leaf, &shims);
        assert_eq!(count, 0);
        assert!(fused.is_empty());
    }

    #[test]
    fn test_fusion_multiple_shims() {
        let mut arena = TraceArena::new();
        let leaf = chain(
            &mut arena,
            &[
                placement(BufferSlot::UserIn, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::Temp),
                placement(BufferSlot::Temp, BufferSlot::TempCmplx),
                placement(BufferSlot::TempCmplx, BufferSlot::UserOut),
            ],
        );
        let shims = vec![
            shim(0, 0, 1, FuseScheme::SharedOutput),
            shim(1, 2, 3, FuseScheme::SharedOutput), // fails: Temp vs TempCmplx
        ];
        let (count, fused) = arena.backward_fusion_count(leaf, &shims);
        assert_eq!(count, 2);
        assert_eq!(fused, vec![0]);
    }

    #[test]
    fn test_fusion_no_shims() {
        let mut arena = TraceArena::new();
        let leaf = chain(
            &mut arena,
            &[placement(BufferSlot::UserIn, BufferSlot::UserOut)],
        );
        let (count, fused) = arena.backward_fusion_count(leaf, &[]);
        assert_eq!(count, 0);
        assert!(fused.is_empty());
    }

    #[test]
    fn test_backtracking_writes_nodes() {
        let mut arena = TraceArena::new();
        let p0 = placement(BufferSlot::UserIn, BufferSlot::Temp);
        let p1 = placement(BufferSlot::Temp, BufferSlot::UserOut);
        let leaf = chain(&mut arena, &[p0, p1]);

        let mut nodes = vec![
            LeafNode::new("n0".into(), KernelKind::Stockham, 0, vec![8]),
            LeafNode::new("n1".into(), KernelKind::Stockham, 1, vec![8]),
        ];
        arena.backtracking(leaf, &mut nodes);

        assert_eq!(nodes[0].assignment(), Some(p0));
        assert_eq!(nodes[1].assignment(), Some(p1));
        assert!(nodes.iter().all(|n| n.is_assigned()));
    }
}
