// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Array layouts and transform precision.
//!
//! A layout describes how a buffer's contents are represented: real
//! samples, complex values (interleaved or split into planes), or the
//! Hermitian-symmetric half-spectrum a real transform produces. Which
//! layout substitutions are interchangeable is a policy decision and
//! lives in the assigner, not here.

/// The data representation of a buffer's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayLayout {
    /// Real samples.
    Real,
    /// Complex values stored as (re, im) pairs.
    ComplexInterleaved,
    /// Complex values stored as separate re/im planes.
    ComplexPlanar,
    /// Hermitian half-spectrum, interleaved (re, im) pairs.
    HermitianInterleaved,
    /// Hermitian half-spectrum, separate re/im planes.
    HermitianPlanar,
    /// No layout assigned yet.
    #[default]
    Unset,
}

impl ArrayLayout {
    /// Parses a layout from a manifest string.
    ///
    /// Accepts snake_case (`"complex_interleaved"`) and the usual
    /// short forms (`"ci"`, `"cp"`, `"hi"`, `"hp"`, `"r"`).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "real" | "r" => Some(Self::Real),
            "complex_interleaved" | "ci" => Some(Self::ComplexInterleaved),
            "complex_planar" | "cp" => Some(Self::ComplexPlanar),
            "hermitian_interleaved" | "hi" => Some(Self::HermitianInterleaved),
            "hermitian_planar" | "hp" => Some(Self::HermitianPlanar),
            "unset" => Some(Self::Unset),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::ComplexInterleaved => "complex_interleaved",
            Self::ComplexPlanar => "complex_planar",
            Self::HermitianInterleaved => "hermitian_interleaved",
            Self::HermitianPlanar => "hermitian_planar",
            Self::Unset => "unset",
        }
    }

    /// Returns `true` for the full-spectrum complex layouts.
    pub fn is_complex(&self) -> bool {
        matches!(self, Self::ComplexInterleaved | Self::ComplexPlanar)
    }

    /// Returns `true` for the half-spectrum Hermitian layouts.
    pub fn is_hermitian(&self) -> bool {
        matches!(self, Self::HermitianInterleaved | Self::HermitianPlanar)
    }
}

impl std::fmt::Display for ArrayLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Floating-point precision of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 32-bit floats.
    Single,
    /// 64-bit floats.
    Double,
}

impl Precision {
    /// Parses a precision from a manifest string.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "single" | "f32" | "float" => Some(Self::Single),
            "double" | "f64" => Some(Self::Double),
            _ => None,
        }
    }

    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }

    /// Size of one real element in bytes.
    pub fn element_bytes(&self) -> usize {
        match self {
            Self::Single => 4,
            Self::Double => 8,
        }
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
