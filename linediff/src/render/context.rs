//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::ops::Range;

use super::{prefixed_lines, DiffLine, LineKind, Renderer, DEFAULT_LABEL_A, DEFAULT_LABEL_B};
use crate::{
    opcodes::{self, Opcode, Tag},
    sequence::LineSequence,
};

const HUNK_SEPARATOR: &str = "***************";

#[derive(Debug, Clone)]
pub struct ContextRenderer {
    context: usize,
    label_a: String,
    label_b: String,
}

impl ContextRenderer {
    pub fn new(context: usize) -> Self {
        Self {
            context,
            label_a: DEFAULT_LABEL_A.to_string(),
            label_b: DEFAULT_LABEL_B.to_string(),
        }
    }

    pub fn with_labels(mut self, label_a: impl Into<String>, label_b: impl Into<String>) -> Self {
        self.label_a = label_a.into();
        self.label_b = label_b.into();
        self
    }
}

impl Default for ContextRenderer {
    fn default() -> Self {
        Self::new(3)
    }
}

fn format_range(range: &Range<usize>) -> String {
    format!("{},{}", range.start + 1, range.end)
}

fn prefix(tag: Tag) -> &'static str {
    match tag {
        Tag::Equal => "  ",
        Tag::Replace => "! ",
        Tag::Delete => "- ",
        Tag::Insert => "+ ",
    }
}

fn render_hunk(hunk: &[Opcode], a: &LineSequence<'_>, b: &LineSequence<'_>) -> Vec<DiffLine> {
    let (first, last) = (&hunk[0], &hunk[hunk.len() - 1]);
    let mut lines = vec![
        DiffLine::marker(HUNK_SEPARATOR),
        DiffLine::marker(format!(
            "*** {} ***",
            format_range(&(first.a.start..last.a.end))
        )),
    ];

    // each side lists its lines only when it has changes of its own
    if hunk
        .iter()
        .any(|op| matches!(op.tag, Tag::Delete | Tag::Replace))
    {
        for op in hunk.iter().filter(|op| op.tag != Tag::Insert) {
            let kind = if op.is_equal() {
                LineKind::Equal
            } else {
                LineKind::Removed
            };
            lines.extend(prefixed_lines(kind, prefix(op.tag), a.slice(op.a.clone())));
        }
    }

    lines.push(DiffLine::marker(format!(
        "--- {} ---",
        format_range(&(first.b.start..last.b.end))
    )));
    if hunk
        .iter()
        .any(|op| matches!(op.tag, Tag::Insert | Tag::Replace))
    {
        for op in hunk.iter().filter(|op| op.tag != Tag::Delete) {
            let kind = if op.is_equal() {
                LineKind::Equal
            } else {
                LineKind::Added
            };
            lines.extend(prefixed_lines(kind, prefix(op.tag), b.slice(op.b.clone())));
        }
    }
    lines
}

impl Renderer for ContextRenderer {
    fn render<'r, 'l: 'r>(
        &'r self,
        opcodes: &'r [Opcode],
        a: &'r LineSequence<'l>,
        b: &'r LineSequence<'l>,
    ) -> Box<dyn Iterator<Item = DiffLine> + 'r> {
        let header = [
            DiffLine::marker(format!("*** {} ***", self.label_a)),
            DiffLine::marker(format!("--- {} ---", self.label_b)),
        ];
        let hunks = opcodes::group(opcodes, self.context);
        Box::new(
            header
                .into_iter()
                .chain(hunks.into_iter().flat_map(move |hunk| render_hunk(&hunk, a, b))),
        )
    }
}
