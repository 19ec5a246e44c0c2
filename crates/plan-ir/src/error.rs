// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for plan construction and loading.

/// Errors that can occur when building or loading an execution plan.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The plan manifest file could not be read.
    #[error("failed to read plan manifest: {0}")]
    ManifestReadError(#[from] std::io::Error),

    /// The manifest JSON is malformed.
    #[error("failed to parse plan manifest: {0}")]
    ManifestParseError(#[from] serde_json::Error),

    /// The plan has no leaf nodes.
    #[error("plan contains no leaf nodes")]
    EmptyPlan,

    /// A leaf node definition is invalid.
    #[error("invalid node '{node}': {detail}")]
    InvalidNode { node: String, detail: String },

    /// A fusion candidate definition is invalid.
    #[error("invalid fusion shim {shim}: {detail}")]
    InvalidShim { shim: usize, detail: String },

    /// The plan as a whole is inconsistent.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
}
