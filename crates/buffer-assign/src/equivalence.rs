// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The layout aliasing table.
//!
//! Decides when a candidate layout may stand in for a required one when
//! chaining node assignments against the plan's declared ports. The
//! relation is an explicit table over documented pairs: it is neither
//! symmetric nor transitive, and deriving it generically from the
//! layout enum would invent equivalences the kernels do not support.

use plan_ir::ArrayLayout;

/// Returns `true` if `candidate` may substitute for `required`.
///
/// Identity holds for every concrete layout. Beyond identity:
///
/// | required               | candidate              | why                                      |
/// |------------------------|------------------------|------------------------------------------|
/// | `Real`                 | `ComplexInterleaved`   | kernel reads/writes the real component   |
/// | `Real`                 | `HermitianInterleaved` | half-spectrum carries the real data      |
/// | `HermitianInterleaved` | `ComplexInterleaved`   | half-spectrum viewed as dense complex    |
/// | `HermitianInterleaved` | `HermitianPlanar`      | same half-spectrum, split planes         |
///
/// `Unset` never matches anything, including itself.
pub fn equivalent_layout(required: ArrayLayout, candidate: ArrayLayout) -> bool {
    use ArrayLayout::*;
    if required == candidate {
        return required != Unset;
    }
    matches!(
        (required, candidate),
        (Real, ComplexInterleaved)
            | (Real, HermitianInterleaved)
            | (HermitianInterleaved, ComplexInterleaved)
            | (HermitianInterleaved, HermitianPlanar)
    )
}
