//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use super::{prefixed_lines, DiffLine, LineKind, Renderer};
use crate::{
    matcher::Matcher,
    opcodes::{self, Opcode, Tag},
    sequence::LineSequence,
};

const SAME: &str = "  ";
const REMOVED: &str = "- ";
const ADDED: &str = "+ ";
const HINT: &str = "? ";

/// Minimum character similarity for a changed line pair to get hint lines.
const HINT_CUTOFF: f64 = 0.75;

/// Every line of both inputs, each marked as kept, removed or added.
///
/// A one-line replacement whose two sides are close enough is followed by
/// `?` lines pointing at the changed characters.
#[derive(Debug, Clone)]
pub struct InlineRenderer {
    hints: bool,
}

impl Default for InlineRenderer {
    fn default() -> Self {
        Self { hints: true }
    }
}

impl InlineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_hints() -> Self {
        Self { hints: false }
    }

    fn render_opcode(&self, op: &Opcode, a: &LineSequence<'_>, b: &LineSequence<'_>) -> Vec<DiffLine> {
        let old = a.slice(op.a.clone());
        let new = b.slice(op.b.clone());

        match op.tag {
            Tag::Equal => prefixed_lines(LineKind::Equal, SAME, old).collect(),
            Tag::Delete => prefixed_lines(LineKind::Removed, REMOVED, old).collect(),
            Tag::Insert => prefixed_lines(LineKind::Added, ADDED, new).collect(),
            Tag::Replace => {
                if self.hints && old.len() == 1 && new.len() == 1 {
                    if let Some(lines) = hinted_replace(old[0], new[0]) {
                        return lines;
                    }
                }
                prefixed_lines(LineKind::Removed, REMOVED, old)
                    .chain(prefixed_lines(LineKind::Added, ADDED, new))
                    .collect()
            }
        }
    }
}

impl Renderer for InlineRenderer {
    fn render<'r, 'l: 'r>(
        &'r self,
        opcodes: &'r [Opcode],
        a: &'r LineSequence<'l>,
        b: &'r LineSequence<'l>,
    ) -> Box<dyn Iterator<Item = DiffLine> + 'r> {
        Box::new(
            opcodes
                .iter()
                .flat_map(move |op| self.render_opcode(op, a, b)),
        )
    }
}

fn hinted_replace(old: &str, new: &str) -> Option<Vec<DiffLine>> {
    let (old_tags, new_tags) = intraline_tags(old, new)?;

    let mut lines = vec![DiffLine::new(LineKind::Removed, format!("{REMOVED}{old}"))];
    if !old_tags.is_empty() {
        lines.push(DiffLine::marker(format!("{HINT}{old_tags}")));
    }
    lines.push(DiffLine::new(LineKind::Added, format!("{ADDED}{new}")));
    if !new_tags.is_empty() {
        lines.push(DiffLine::marker(format!("{HINT}{new_tags}")));
    }
    Some(lines)
}

/// Character markers for both sides of a changed line pair, or `None` when
/// the lines are too different for markers to help.
fn intraline_tags(old: &str, new: &str) -> Option<(String, String)> {
    let old: Vec<char> = strip_terminator(old).chars().collect();
    let new: Vec<char> = strip_terminator(new).chars().collect();

    let matcher = Matcher::new(&old, &new);
    if matcher.real_quick_ratio() < HINT_CUTOFF
        || matcher.quick_ratio() < HINT_CUTOFF
        || matcher.ratio() < HINT_CUTOFF
    {
        return None;
    }

    let mut old_tags = String::with_capacity(old.len());
    let mut new_tags = String::with_capacity(new.len());
    for op in opcodes::build(&old, &new, &matcher.matching_blocks()) {
        let (old_mark, new_mark) = match op.tag {
            Tag::Equal => (' ', ' '),
            Tag::Replace => ('^', '^'),
            Tag::Delete => ('-', ' '),
            Tag::Insert => (' ', '+'),
        };
        old_tags.extend(std::iter::repeat(old_mark).take(op.a_len()));
        new_tags.extend(std::iter::repeat(new_mark).take(op.b_len()));
    }

    Some((
        keep_whitespace(&old, &old_tags),
        keep_whitespace(&new, &new_tags),
    ))
}

/// Blank markers under whitespace become that whitespace, so tabs line up.
fn keep_whitespace(line: &[char], tags: &str) -> String {
    let kept: String = line
        .iter()
        .zip(tags.chars())
        .map(|(&c, tag)| if tag == ' ' && c.is_whitespace() { c } else { tag })
        .collect();
    kept.trim_end().to_string()
}

fn strip_terminator(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .unwrap_or(line)
}
