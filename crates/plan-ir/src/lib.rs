// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # plan-ir
//!
//! A lightweight intermediate representation (IR) for decomposed FFT
//! execution plans.
//!
//! The transform decomposition subsystem turns a requested transform
//! into a tree of kernel-sized stages; this crate captures the part of
//! that result the buffer assigner needs:
//!
//! - [`BufferSlot`] / [`BufferSet`] — the five operating buffer slots.
//! - [`ArrayLayout`] — real/complex/Hermitian data representations.
//! - [`KernelKind`], [`Placement`], [`LeafNode`] — one kernel launch and
//!   its assignment constraints.
//! - [`FuseShim`] — fusion candidates over contiguous node ranges.
//! - [`ExecPlan`] — the flattened leaf sequence with a **type-state
//!   lifecycle** (`Draft` → `Validated` → `Assigned`).
//! - [`PlanLoader`] / [`PlanManifest`] — JSON manifest loading.
//!
//! Kernel implementations, twiddle tables, and buffer allocation are
//! out of scope; the IR holds planning metadata only.
//!
//! # Example
//! ```no_run
//! use plan_ir::PlanLoader;
//! use std::path::Path;
//!
//! let plan = PlanLoader::load(Path::new("./plans/fft_1d_8192.json")).unwrap();
//! println!("{}", plan.summary());
//! for node in plan.iter_nodes() {
//!     println!("  {}", node.summary());
//! }
//! ```

mod buffer;
mod error;
mod layout;
mod loader;
pub mod manifest;
mod node;
pub mod plan;
mod shim;

pub use buffer::{BufferSet, BufferSlot, ALL_SLOTS};
pub use error::PlanError;
pub use layout::{ArrayLayout, Precision};
pub use loader::PlanLoader;
pub use manifest::{ManifestNode, ManifestPort, ManifestShim, PlanManifest};
pub use node::{KernelKind, LeafNode, NodePlacement, Placement};
pub use plan::{ExecPlan, PlanPort};
pub use shim::{FuseScheme, FuseShim, FusedSpan};
