//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Line-oriented text comparison.
//!
//! Two sequences of lines are aligned once by [`matcher::Matcher`], turned
//! into an edit script by [`opcodes::build`], and then rendered by any of the
//! [`render::Renderer`] implementations: ndiff-style inline output, unified
//! hunks or context hunks. [`compare`] does all three steps in one call.
//!
//! The engine never touches files and keeps no state between calls.

pub mod compare;
pub mod error;
pub mod matcher;
pub mod opcodes;
pub mod render;
pub mod sequence;

pub use compare::{compare, diff, CompareOptions, Comparison, OutputMode};
pub use error::{Error, Result};
pub use render::{DiffLine, LineKind};
pub use sequence::{Line, LineSequence};
