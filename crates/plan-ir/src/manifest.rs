// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! JSON plan manifest parsing.
//!
//! A plan manifest describes one already-decomposed transform: the leaf
//! kernel sequence, fusion candidates, declared ports, and the temp
//! buffer budget. It is the hand-off format between the decomposition
//! subsystem and this planner.
//!
//! # Format
//! ```json
//! {
//!   "name": "fft_1d_8192",
//!   "precision": "single",
//!   "input": { "buffer": "user_in", "layout": "complex_interleaved" },
//!   "output": { "buffer": "user_out", "layout": "complex_interleaved" },
//!   "temp_buffers": ["temp"],
//!   "in_stride": [1],
//!   "out_stride": [1],
//!   "nodes": [
//!     { "name": "stage.0", "kind": "sbcc", "length": [64, 128] },
//!     { "name": "stage.1", "kind": "sbrr", "length": [128, 64],
//!       "placement": "out_of_place", "unit_stride_out": true }
//!   ],
//!   "shims": [
//!     { "first": 0, "last": 1, "scheme": "shared_output" }
//!   ]
//! }
//! ```

use crate::{ArrayLayout, BufferSlot, FuseScheme, KernelKind, Placement, PlanError, Precision};
use std::path::Path;

/// Top-level plan manifest, deserialized from JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlanManifest {
    /// Human-readable plan name.
    pub name: String,
    /// Precision string (e.g., `"single"`, `"double"`).
    #[serde(default = "default_precision")]
    pub precision: String,
    /// Declared overall input port.
    pub input: ManifestPort,
    /// Declared overall output port.
    pub output: ManifestPort,
    /// Temp buffer slot names available to the plan.
    #[serde(default)]
    pub temp_buffers: Vec<String>,
    /// Element strides of the user input buffer.
    #[serde(default = "default_stride")]
    pub in_stride: Vec<usize>,
    /// Element strides of the user output buffer.
    #[serde(default = "default_stride")]
    pub out_stride: Vec<usize>,
    /// Leaf node entries in execution order.
    pub nodes: Vec<ManifestNode>,
    /// Fusion candidate entries.
    #[serde(default)]
    pub shims: Vec<ManifestShim>,
}

fn default_precision() -> String {
    "single".to_string()
}

fn default_stride() -> Vec<usize> {
    vec![1]
}

/// One declared plan port in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestPort {
    /// Buffer slot name (e.g., `"user_in"`).
    pub buffer: String,
    /// Layout name (e.g., `"complex_interleaved"`).
    pub layout: String,
}

/// One leaf node entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestNode {
    /// Node name (e.g., `"stage.0.sbcc"`).
    pub name: String,
    /// Kernel kind string (e.g., `"sbcc"`, `"transpose"`).
    pub kind: String,
    /// Transform length per dimension, fastest dimension first.
    pub length: Vec<usize>,
    /// Placement capability string; defaults to `"either"`.
    #[serde(default)]
    pub placement: Option<String>,
    /// The kernel requires unit-stride output.
    #[serde(default)]
    pub unit_stride_out: bool,
    /// Overrides the kind's default mandatory buffer.
    #[serde(default)]
    pub required_buffer: Option<String>,
    /// Forces the node's output layout.
    #[serde(default)]
    pub fixed_out_layout: Option<String>,
}

/// One fusion candidate entry in the manifest.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ManifestShim {
    /// First node of the range (inclusive).
    pub first: usize,
    /// Last node of the range (inclusive).
    pub last: usize,
    /// Compatibility rule string (e.g., `"shared_output"`).
    pub scheme: String,
}

impl PlanManifest {
    /// Loads a manifest from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path)?;
        let manifest: Self = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    /// Parses a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let manifest: Self = serde_json::from_str(json)?;
        Ok(manifest)
    }

    /// Validates that every string field names a recognised value.
    ///
    /// Range/overlap checks on shims belong to plan validation; this
    /// only rejects vocabulary the loader cannot translate.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.nodes.is_empty() {
            return Err(PlanError::EmptyPlan);
        }

        Precision::from_str_loose(&self.precision).ok_or_else(|| {
            PlanError::InvalidPlan(format!("unsupported precision '{}'", self.precision))
        })?;

        for (label, port) in [("input", &self.input), ("output", &self.output)] {
            self.parse_port(port).map_err(|e| {
                PlanError::InvalidPlan(format!("{label} port: {e}"))
            })?;
        }

        for t in &self.temp_buffers {
            let slot = BufferSlot::from_str_loose(t).ok_or_else(|| {
                PlanError::InvalidPlan(format!("unrecognised buffer slot '{t}'"))
            })?;
            if !slot.is_temp() {
                return Err(PlanError::InvalidPlan(format!(
                    "'{t}' is not a temp buffer slot"
                )));
            }
        }

        let mut seen_names = std::collections::HashSet::new();
        for node in &self.nodes {
            if !seen_names.insert(&node.name) {
                return Err(PlanError::InvalidNode {
                    node: node.name.clone(),
                    detail: "duplicate node name".into(),
                });
            }
            if KernelKind::from_str_loose(&node.kind).is_none() {
                return Err(PlanError::InvalidNode {
                    node: node.name.clone(),
                    detail: format!("unrecognised kernel kind '{}'", node.kind),
                });
            }
            if let Some(p) = &node.placement {
                if Placement::from_str_loose(p).is_none() {
                    return Err(PlanError::InvalidNode {
                        node: node.name.clone(),
                        detail: format!("unrecognised placement '{p}'"),
                    });
                }
            }
            if let Some(b) = &node.required_buffer {
                if BufferSlot::from_str_loose(b).is_none() {
                    return Err(PlanError::InvalidNode {
                        node: node.name.clone(),
                        detail: format!("unrecognised buffer slot '{b}'"),
                    });
                }
            }
            if let Some(l) = &node.fixed_out_layout {
                if ArrayLayout::from_str_loose(l).is_none() {
                    return Err(PlanError::InvalidNode {
                        node: node.name.clone(),
                        detail: format!("unrecognised layout '{l}'"),
                    });
                }
            }
        }

        for (i, shim) in self.shims.iter().enumerate() {
            if FuseScheme::from_str_loose(&shim.scheme).is_none() {
                return Err(PlanError::InvalidShim {
                    shim: i,
                    detail: format!("unrecognised fuse scheme '{}'", shim.scheme),
                });
            }
        }

        Ok(())
    }

    /// Parses one manifest port, returning an error string on failure.
    pub(crate) fn parse_port(
        &self,
        port: &ManifestPort,
    ) -> Result<(BufferSlot, ArrayLayout), String> {
        let buf = BufferSlot::from_str_loose(&port.buffer)
            .ok_or_else(|| format!("unrecognised buffer slot '{}'", port.buffer))?;
        let layout = ArrayLayout::from_str_loose(&port.layout)
            .ok_or_else(|| format!("unrecognised layout '{}'", port.layout))?;
        Ok((buf, layout))
    }
}
