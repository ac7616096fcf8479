//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Output formats built on one shared edit script.

mod context;
mod inline;
mod unified;

pub use context::ContextRenderer;
pub use inline::InlineRenderer;
pub use unified::UnifiedRenderer;

use std::fmt;

use crate::{opcodes::Opcode, sequence::LineSequence};

pub const DEFAULT_LABEL_A: &str = "file1";
pub const DEFAULT_LABEL_B: &str = "file2";

/// How a rendered line relates to the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Equal,
    Added,
    Removed,
    /// Headers, separators and intraline hints.
    Marker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn marker(text: impl Into<String>) -> Self {
        Self::new(LineKind::Marker, text)
    }

    fn prefixed(kind: LineKind, prefix: &str, line: &str) -> Self {
        let mut text = String::with_capacity(prefix.len() + line.len());
        text.push_str(prefix);
        text.push_str(line);
        Self { kind, text }
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A textual rendering of an edit script.
///
/// Rendering is a pure function of its arguments: calling `render` again
/// with the same opcodes starts the output over from the beginning.
pub trait Renderer {
    fn render<'r, 'l: 'r>(
        &'r self,
        opcodes: &'r [Opcode],
        a: &'r LineSequence<'l>,
        b: &'r LineSequence<'l>,
    ) -> Box<dyn Iterator<Item = DiffLine> + 'r>;
}

fn prefixed_lines<'r, S: AsRef<str>>(
    kind: LineKind,
    prefix: &'static str,
    lines: &'r [S],
) -> impl Iterator<Item = DiffLine> + 'r {
    lines
        .iter()
        .map(move |line| DiffLine::prefixed(kind, prefix, line.as_ref()))
}
