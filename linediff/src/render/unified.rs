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

#[derive(Debug, Clone)]
pub struct UnifiedRenderer {
    context: usize,
    label_a: String,
    label_b: String,
}

impl UnifiedRenderer {
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

impl Default for UnifiedRenderer {
    fn default() -> Self {
        Self::new(3)
    }
}

/// `start,count` where start is 1-based, or the line before the gap when
/// the range is empty.
fn format_range(range: &Range<usize>) -> String {
    let start = if range.is_empty() {
        range.start
    } else {
        range.start + 1
    };
    format!("{},{}", start, range.len())
}

fn render_hunk(hunk: &[Opcode], a: &LineSequence<'_>, b: &LineSequence<'_>) -> Vec<DiffLine> {
    let (first, last) = (&hunk[0], &hunk[hunk.len() - 1]);
    let header = format!(
        "@@ -{} +{} @@",
        format_range(&(first.a.start..last.a.end)),
        format_range(&(first.b.start..last.b.end))
    );

    let mut lines = vec![DiffLine::marker(header)];
    for op in hunk {
        let old = a.slice(op.a.clone());
        let new = b.slice(op.b.clone());
        match op.tag {
            Tag::Equal => lines.extend(prefixed_lines(LineKind::Equal, " ", old)),
            Tag::Delete => lines.extend(prefixed_lines(LineKind::Removed, "-", old)),
            Tag::Insert => lines.extend(prefixed_lines(LineKind::Added, "+", new)),
            Tag::Replace => {
                lines.extend(prefixed_lines(LineKind::Removed, "-", old));
                lines.extend(prefixed_lines(LineKind::Added, "+", new));
            }
        }
    }
    lines
}

impl Renderer for UnifiedRenderer {
    fn render<'r, 'l: 'r>(
        &'r self,
        opcodes: &'r [Opcode],
        a: &'r LineSequence<'l>,
        b: &'r LineSequence<'l>,
    ) -> Box<dyn Iterator<Item = DiffLine> + 'r> {
        let hunks = opcodes::group(opcodes, self.context);
        if hunks.is_empty() {
            return Box::new(std::iter::empty::<DiffLine>());
        }

        let header = [
            DiffLine::marker(format!("--- {}", self.label_a)),
            DiffLine::marker(format!("+++ {}", self.label_b)),
        ];
        Box::new(
            header
                .into_iter()
                .chain(hunks.into_iter().flat_map(move |hunk| render_hunk(&hunk, a, b))),
        )
    }
}
