// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Plan loading from JSON manifests.
//!
//! The loader translates a validated [`PlanManifest`] into a validated
//! [`ExecPlan`], applying per-kind constraint defaults and manifest
//! overrides. No device resources are touched.

use crate::{
    ArrayLayout, BufferSet, BufferSlot, ExecPlan, FuseScheme, FuseShim, KernelKind, LeafNode,
    Placement, PlanError, PlanManifest, PlanPort, Precision,
    plan::Validated,
};
use std::path::Path;

/// Loads a plan manifest into a validated [`ExecPlan`].
///
/// # Example
/// ```no_run
/// use plan_ir::PlanLoader;
/// use std::path::Path;
///
/// let plan = PlanLoader::load(Path::new("./plans/fft_1d_8192.json")).unwrap();
/// println!("{}", plan.summary());
/// ```
pub struct PlanLoader;

impl PlanLoader {
    /// Loads and validates a plan from a JSON manifest file.
    pub fn load(path: &Path) -> Result<ExecPlan<Validated>, PlanError> {
        let manifest = PlanManifest::from_file(path)?;
        Self::from_manifest(&manifest)
    }

    /// Builds a validated plan from an in-memory manifest.
    ///
    /// Useful for testing without manifest files on disk.
    pub fn from_manifest(manifest: &PlanManifest) -> Result<ExecPlan<Validated>, PlanError> {
        manifest.validate()?;

        // validate() guarantees every string parses; from_str_loose
        // cannot fail below, but the errors are kept rather than
        // unwrapped so a future manifest field can't silently skip
        // validation.
        let precision = Precision::from_str_loose(&manifest.precision).ok_or_else(|| {
            PlanError::InvalidPlan(format!("unsupported precision '{}'", manifest.precision))
        })?;

        let input = Self::build_port(manifest, &manifest.input, "input")?;
        let output = Self::build_port(manifest, &manifest.output, "output")?;

        let mut temp_buffers = BufferSet::new();
        for t in &manifest.temp_buffers {
            if let Some(slot) = BufferSlot::from_str_loose(t) {
                temp_buffers.insert(slot);
            }
        }

        let nodes = Self::build_nodes(manifest)?;
        let shims = manifest
            .shims
            .iter()
            .enumerate()
            .map(|(id, s)| FuseShim {
                id,
                first: s.first,
                last: s.last,
                scheme: FuseScheme::from_str_loose(&s.scheme)
                    .unwrap_or(FuseScheme::SharedOutput),
            })
            .collect();

        tracing::debug!(
            "loaded plan '{}': {} nodes, {} shims",
            manifest.name,
            nodes.len(),
            manifest.shims.len(),
        );

        ExecPlan::new(
            manifest.name.clone(),
            precision,
            nodes,
            shims,
            input,
            output,
            temp_buffers,
            manifest.in_stride.clone(),
            manifest.out_stride.clone(),
        )
        .validate()
    }

    fn build_port(
        manifest: &PlanManifest,
        port: &crate::ManifestPort,
        label: &str,
    ) -> Result<PlanPort, PlanError> {
        let (buf, layout) = manifest
            .parse_port(port)
            .map_err(|e| PlanError::InvalidPlan(format!("{label} port: {e}")))?;
        Ok(PlanPort { buf, layout })
    }

    /// Converts manifest entries into leaf nodes, defaulting constraints
    /// from the kernel kind and applying explicit overrides.
    fn build_nodes(manifest: &PlanManifest) -> Result<Vec<LeafNode>, PlanError> {
        let mut nodes = Vec::with_capacity(manifest.nodes.len());

        for (i, mn) in manifest.nodes.iter().enumerate() {
            let kind = KernelKind::from_str_loose(&mn.kind).ok_or_else(|| {
                PlanError::InvalidNode {
                    node: mn.name.clone(),
                    detail: format!("unrecognised kernel kind '{}'", mn.kind),
                }
            })?;

            let mut node = LeafNode::new(mn.name.clone(), kind, i, mn.length.clone());

            if let Some(p) = &mn.placement {
                node.placement = Placement::from_str_loose(p).ok_or_else(|| {
                    PlanError::InvalidNode {
                        node: mn.name.clone(),
                        detail: format!("unrecognised placement '{p}'"),
                    }
                })?;
            }
            node.unit_stride_out = mn.unit_stride_out;
            if let Some(b) = &mn.required_buffer {
                node.required_buffer = BufferSlot::from_str_loose(b);
            }
            if let Some(l) = &mn.fixed_out_layout {
                node.fixed_out_layout = ArrayLayout::from_str_loose(l);
            }

            nodes.push(node);
        }

        Ok(nodes)
    }
}
