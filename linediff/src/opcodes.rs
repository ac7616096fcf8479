//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::ops::Range;

use crate::matcher::MatchBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One edit step, covering `a[a]` on the left and `b[b]` on the right.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Opcode {
    pub tag: Tag,
    pub a: Range<usize>,
    pub b: Range<usize>,
}

impl Opcode {
    pub fn new(tag: Tag, a: Range<usize>, b: Range<usize>) -> Self {
        Self { tag, a, b }
    }

    pub fn is_equal(&self) -> bool {
        self.tag == Tag::Equal
    }

    pub fn a_len(&self) -> usize {
        self.a.len()
    }

    pub fn b_len(&self) -> usize {
        self.b.len()
    }
}

/// Turn matching blocks into a contiguous edit script over both sequences.
///
/// `blocks` must be the output of [`crate::matcher::Matcher::matching_blocks`]
/// for the same `a` and `b`.
pub fn build<T: PartialEq>(a: &[T], b: &[T], blocks: &[MatchBlock]) -> Vec<Opcode> {
    let mut opcodes = Vec::with_capacity(blocks.len() * 2);
    let (mut i, mut j) = (0, 0);

    for block in blocks {
        let tag = match (i < block.a_start, j < block.b_start) {
            (true, true) => Some(Tag::Replace),
            (true, false) => Some(Tag::Delete),
            (false, true) => Some(Tag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            opcodes.push(Opcode::new(tag, i..block.a_start, j..block.b_start));
        }

        i = block.a_end();
        j = block.b_end();
        if block.len > 0 {
            opcodes.push(Opcode::new(
                Tag::Equal,
                block.a_start..i,
                block.b_start..j,
            ));
        }
    }

    debug_assert_coverage(a, b, &opcodes);
    opcodes
}

fn debug_assert_coverage<T: PartialEq>(a: &[T], b: &[T], opcodes: &[Opcode]) {
    if !cfg!(debug_assertions) {
        return;
    }

    let (mut i, mut j) = (0, 0);
    for op in opcodes {
        debug_assert_eq!(op.a.start, i, "opcode gap in a at {op:?}");
        debug_assert_eq!(op.b.start, j, "opcode gap in b at {op:?}");
        match op.tag {
            Tag::Equal => debug_assert!(a[op.a.clone()] == b[op.b.clone()]),
            Tag::Insert => debug_assert!(op.a.is_empty() && !op.b.is_empty()),
            Tag::Delete => debug_assert!(!op.a.is_empty() && op.b.is_empty()),
            Tag::Replace => debug_assert!(!op.a.is_empty() && !op.b.is_empty()),
        }
        i = op.a.end;
        j = op.b.end;
    }
    debug_assert_eq!((i, j), (a.len(), b.len()), "opcodes do not cover both sequences");
}

/// Split an edit script into hunks with `context` lines of surrounding
/// `Equal` material on each side.
///
/// Changes separated by at most `2 * context` equal lines share a hunk.
/// Hunks made only of `Equal` opcodes are never returned, so identical
/// inputs produce no hunks at all.
pub fn group(opcodes: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    let mut hunks = Vec::new();
    if opcodes.iter().all(Opcode::is_equal) {
        return hunks;
    }

    let last_index = opcodes.len() - 1;
    let mut current: Vec<Opcode> = Vec::new();

    for (index, op) in opcodes.iter().enumerate() {
        if !op.is_equal() {
            current.push(op.clone());
            continue;
        }

        let (mut a, mut b) = (op.a.clone(), op.b.clone());
        // leading and trailing context is clipped to the window
        if index == 0 {
            a.start = a.start.max(a.end.saturating_sub(context));
            b.start = b.start.max(b.end.saturating_sub(context));
        }
        if index == last_index {
            a.end = a.end.min(a.start + context);
            b.end = b.end.min(b.start + context);
        }

        if a.len() > 2 * context {
            push_equal(&mut current, a.start..a.start + context, b.start..b.start + context);
            log::trace!("group: closing hunk of {} opcodes", current.len());
            hunks.push(std::mem::take(&mut current));
            a.start = a.end - context;
            b.start = b.end - context;
        }
        push_equal(&mut current, a, b);
    }

    if current.iter().any(|op| !op.is_equal()) {
        hunks.push(current);
    }
    hunks
}

fn push_equal(hunk: &mut Vec<Opcode>, a: Range<usize>, b: Range<usize>) {
    if !a.is_empty() {
        hunk.push(Opcode::new(Tag::Equal, a, b));
    }
}
