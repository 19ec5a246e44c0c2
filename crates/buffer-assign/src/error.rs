// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the buffer assignment search.

/// Errors that can occur during buffer/layout assignment.
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    /// Enumeration completed without any path passing the global
    /// validity checks. Not fatal — the caller may retry with a
    /// different tree decomposition.
    #[error(
        "no valid buffer assignment exists: {nodes} nodes over {buffers} available buffers"
    )]
    NoValidAssignment { nodes: usize, buffers: usize },

    /// The plan violates the contract between the decomposition
    /// subsystem and this policy. Continuing would corrupt node state,
    /// so the assignment run aborts immediately.
    #[error("malformed plan: {detail}")]
    MalformedPlan { detail: String },
}
