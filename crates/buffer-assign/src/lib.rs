// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Buffer and layout assignment for FFT execution plans.
//!
//! Takes a validated [`ExecPlan`] — an ordered sequence of kernel leaf
//! nodes with declared endpoints, a temp-buffer budget, and fusion
//! candidates — and searches for the buffer/layout decision per node
//! that satisfies every legality constraint while fusing as many nodes
//! as possible. The search is exhaustive over the pruned candidate
//! tree; see [`policy::AssignmentPolicy`] for the driver and
//! [`trace::TraceArena`] for the underlying trace tree.
//!
//! # Example
//!
//! ```no_run
//! use plan_ir::PlanLoader;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = PlanLoader::load(Path::new("plan.json"))?;
//! let assigned = buffer_assign::assign_buffers(plan)?;
//! for node in assigned.iter_nodes() {
//!     println!("{}", node.summary());
//! }
//! # Ok(())
//! # }
//! ```

mod equivalence;
mod error;
pub mod policy;
pub mod trace;

pub use equivalence::equivalent_layout;
pub use error::AssignError;
pub use policy::{AssignmentPolicy, FewerBuffers, TieBreak};
pub use trace::{PlacementTrace, TraceArena, TraceId};

use plan_ir::{
    plan::{Assigned, Validated},
    ExecPlan,
};

/// Assigns buffers and layouts to every node of the plan with the
/// default policy.
pub fn assign_buffers(plan: ExecPlan<Validated>) -> Result<ExecPlan<Assigned>, AssignError> {
    AssignmentPolicy::new().assign_buffers(plan)
}
