//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

//! Longest-common-run sequence alignment.
//!
//! The matcher repeatedly picks the longest contiguous run shared by the
//! ranges under consideration and then aligns what lies on either side of it.
//! Among runs of equal length the one starting first in A wins, then the one
//! starting first in B, which keeps the output reproducible.

use std::{
    collections::{HashMap, HashSet},
    hash::Hash,
};

/// Sequences shorter than this never have popular elements suppressed, and an
/// element must occur more often than this to count as popular.
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// A maximal run where `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

impl MatchBlock {
    pub fn new(a_start: usize, b_start: usize, len: usize) -> Self {
        Self {
            a_start,
            b_start,
            len,
        }
    }

    pub fn a_end(&self) -> usize {
        self.a_start + self.len
    }

    pub fn b_end(&self) -> usize {
        self.b_start + self.len
    }
}

pub struct Matcher<'s, T> {
    a: &'s [T],
    b: &'s [T],
    // every position of each element of b, ascending
    b_index: HashMap<&'s T, Vec<usize>>,
    popular: HashSet<&'s T>,
}

impl<'s, T: Eq + Hash> Matcher<'s, T> {
    pub fn new(a: &'s [T], b: &'s [T]) -> Self {
        Self::build(a, b, true)
    }

    /// A matcher that indexes every element of `b`, however frequent.
    pub fn without_autojunk(a: &'s [T], b: &'s [T]) -> Self {
        Self::build(a, b, false)
    }

    fn build(a: &'s [T], b: &'s [T], autojunk: bool) -> Self {
        let mut b_index: HashMap<&'s T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b_index.entry(elt).or_default().push(j);
        }

        let mut popular = HashSet::new();
        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = (b.len() / 100).max(AUTOJUNK_MIN_LEN);
            popular.extend(
                b_index
                    .iter()
                    .filter(|(_, indices)| indices.len() > threshold)
                    .map(|(elt, _)| *elt),
            );
            if !popular.is_empty() {
                log::debug!(
                    "Matcher: suppressed {} popular elements (threshold {threshold})",
                    popular.len()
                );
            }
        }

        Self {
            a,
            b,
            b_index,
            popular,
        }
    }

    pub fn is_popular(&self, elt: &T) -> bool {
        self.popular.contains(elt)
    }

    /// Longest run shared by `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Returns a zero-length block at `(alo, blo)` when the ranges have
    /// nothing in common. Popular elements never start a run on their own
    /// but are absorbed when they sit directly next to one, or next to the
    /// empty anchor at `(alo, blo)`.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        self.longest_match(alo, ahi, blo, bhi, false)
    }

    fn longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
        with_popular: bool,
    ) -> MatchBlock {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);

        // j2len[j] is the length of the run ending at a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next_j2len = HashMap::new();
            let skipped = !with_popular && self.popular.contains(&a[i]);
            if let Some(indices) = self.b_index.get(&a[i]).filter(|_| !skipped) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_j2len.insert(j, k);
                    if k > best_len {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_len = k;
                    }
                }
            }
            j2len = next_j2len;
        }

        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && a[best_i + best_len] == b[best_j + best_len]
        {
            best_len += 1;
        }

        MatchBlock::new(best_i, best_j, best_len)
    }

    /// All maximal matching blocks in ascending order, terminated by a
    /// zero-length block at `(a.len(), b.len())`.
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut found = Vec::new();
        let mut pending = vec![(0, la, 0, lb)];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let mut block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.len == 0 && !self.popular.is_empty() {
                // nothing rarer anchors this range, so let popular elements in
                block = self.longest_match(alo, ahi, blo, bhi, true);
            }
            if block.len == 0 {
                continue;
            }
            log::trace!(
                "Matcher: a[{alo}..{ahi}] b[{blo}..{bhi}] -> {}+{} len {}",
                block.a_start,
                block.b_start,
                block.len
            );
            found.push(block);
            if alo < block.a_start && blo < block.b_start {
                pending.push((alo, block.a_start, blo, block.b_start));
            }
            if block.a_end() < ahi && block.b_end() < bhi {
                pending.push((block.a_end(), ahi, block.b_end(), bhi));
            }
        }
        found.sort_unstable();

        // neighbouring runs found in separate passes become one block
        let mut blocks: Vec<MatchBlock> = Vec::with_capacity(found.len() + 1);
        for block in found {
            match blocks.last_mut() {
                Some(last) if last.a_end() == block.a_start && last.b_end() == block.b_start => {
                    last.len += block.len;
                }
                _ => blocks.push(block),
            }
        }
        blocks.push(MatchBlock::new(la, lb, 0));

        log::debug!(
            "Matcher: {} matching blocks for {la} x {lb} elements",
            blocks.len() - 1
        );
        blocks
    }

    /// Similarity in `[0, 1]`: twice the matched elements over the total.
    pub fn ratio(&self) -> f64 {
        let matched = self.matching_blocks().iter().map(|block| block.len).sum();
        calculate_ratio(matched, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio()` from element counts alone.
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<&T, usize> = HashMap::new();
        for elt in self.b {
            *available.entry(elt).or_default() += 1;
        }

        let mut matched = 0;
        for elt in self.a {
            if let Some(count) = available.get_mut(elt) {
                if *count > 0 {
                    *count -= 1;
                    matched += 1;
                }
            }
        }
        calculate_ratio(matched, self.a.len() + self.b.len())
    }

    /// Upper bound on `ratio()` from the lengths alone.
    pub fn real_quick_ratio(&self) -> f64 {
        let (la, lb) = (self.a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }
}

fn calculate_ratio(matched: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * matched as f64 / total as f64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_log::test;

    fn blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<MatchBlock> {
        Matcher::new(a, b).matching_blocks()
    }

    #[test]
    fn test_tie_break_prefers_leftmost_in_a_then_b() {
        let a = ["x", "y", "x"];
        let b = ["x", "x", "y"];
        assert_eq!(
            blocks(&a, &b),
            vec![MatchBlock::new(0, 1, 2), MatchBlock::new(3, 3, 0)]
        );
    }

    #[test]
    fn test_single_element_tie_break() {
        let a = ["q", "p"];
        let b = ["p", "q"];
        // both runs have length 1, "q" starts first in a
        assert_eq!(
            Matcher::new(&a, &b).find_longest_match(0, 2, 0, 2),
            MatchBlock::new(0, 1, 1)
        );
    }

    #[test]
    fn test_empty_sequences() {
        let empty: [&str; 0] = [];
        assert_eq!(blocks(&empty, &empty), vec![MatchBlock::new(0, 0, 0)]);
        assert_eq!(blocks(&["a"], &empty), vec![MatchBlock::new(1, 0, 0)]);
        assert_eq!(blocks(&empty, &["a"]), vec![MatchBlock::new(0, 1, 0)]);
    }

    #[test]
    fn test_blocks_around_a_removed_element() {
        let a: Vec<char> = "abxcd".chars().collect();
        let b: Vec<char> = "abcd".chars().collect();
        assert_eq!(
            blocks(&a, &b),
            vec![
                MatchBlock::new(0, 0, 2),
                MatchBlock::new(3, 2, 2),
                MatchBlock::new(5, 4, 0)
            ]
        );
    }

    #[test]
    fn test_find_longest_match() {
        let a: Vec<char> = " abcd".chars().collect();
        let b: Vec<char> = "abcd abcd".chars().collect();
        assert_eq!(
            Matcher::new(&a, &b).find_longest_match(0, 5, 0, 9),
            MatchBlock::new(0, 4, 5)
        );
    }

    #[test]
    fn test_no_common_elements() {
        let a = ["a", "b"];
        let b = ["c", "d"];
        let matcher = Matcher::new(&a, &b);
        assert_eq!(matcher.find_longest_match(0, 2, 0, 2), MatchBlock::new(0, 0, 0));
        assert_eq!(matcher.matching_blocks(), vec![MatchBlock::new(2, 2, 0)]);
    }

    #[test]
    fn test_ratios() {
        let a: Vec<char> = "abcd".chars().collect();
        let b: Vec<char> = "bcde".chars().collect();
        let matcher = Matcher::new(&a, &b);
        assert_eq!(matcher.ratio(), 0.75);
        assert_eq!(matcher.quick_ratio(), 0.75);
        assert_eq!(matcher.real_quick_ratio(), 1.0);

        let empty: [char; 0] = [];
        assert_eq!(Matcher::new(&empty, &empty).ratio(), 1.0);
    }

    #[test]
    fn test_popular_elements_are_suppressed() {
        let mut b = vec![""; 250];
        b.push("unique");
        let a = ["", "unique"];

        let matcher = Matcher::new(&a, &b);
        assert!(matcher.is_popular(&""));
        assert!(!matcher.is_popular(&"unique"));
        // the popular blank line is absorbed next to the unique anchor
        assert_eq!(
            matcher.matching_blocks(),
            vec![MatchBlock::new(0, 249, 2), MatchBlock::new(2, 251, 0)]
        );

        assert!(!Matcher::without_autojunk(&a, &b).is_popular(&""));
    }

    #[test]
    fn test_popular_elements_anchor_when_nothing_else_matches() {
        let a = vec!["blank"; 220];
        let b = vec!["blank"; 230];
        let matcher = Matcher::new(&a, &b);
        assert!(matcher.is_popular(&"blank"));
        assert_eq!(
            matcher.matching_blocks(),
            vec![MatchBlock::new(0, 0, 220), MatchBlock::new(220, 230, 0)]
        );
    }

    #[test]
    fn test_short_sequences_never_suppress() {
        let b = vec!["x"; AUTOJUNK_MIN_LEN - 1];
        let a = ["x"];
        assert!(!Matcher::new(&a, &b).is_popular(&"x"));
    }

    #[test]
    fn test_popular_elements_match_when_no_rare_anchor_exists() {
        let mut a = vec!["x\n"];
        a.extend(vec!["\n"; 210]);
        let mut b = vec!["\n"; 210];
        b.push("y\n");

        let matcher = Matcher::new(&a, &b);
        assert!(matcher.is_popular(&"\n"));
        // the suppressed search alone finds nothing
        assert_eq!(matcher.find_longest_match(0, 211, 0, 211).len, 0);
        assert_eq!(
            matcher.matching_blocks(),
            vec![MatchBlock::new(1, 0, 210), MatchBlock::new(211, 211, 0)]
        );
    }

    #[test]
    fn test_common_lines_are_not_popular() {
        let mut b: Vec<String> = (0..245).map(|i| format!("line {i}\n")).collect();
        b.extend(vec!["}\n".to_string(); 5]);
        let a = vec!["}\n".to_string()];
        assert_eq!(b.len(), 250);

        let matcher = Matcher::new(&a, &b);
        assert!(!matcher.is_popular(&"}\n".to_string()));
        assert_eq!(
            matcher.matching_blocks(),
            vec![MatchBlock::new(0, 245, 1), MatchBlock::new(1, 250, 0)]
        );
    }

    #[test]
    fn test_popularity_needs_more_than_min_len_occurrences() {
        let mut b = vec!["x"; AUTOJUNK_MIN_LEN];
        b.extend(vec!["y"; 100]);
        let a = ["x"];
        assert!(!Matcher::new(&a, &b).is_popular(&"x"));

        b.push("x");
        assert!(Matcher::new(&a, &b).is_popular(&"x"));
    }

    /// `a` leans towards 0 and `b` holds well over `AUTOJUNK_MIN_LEN` zeros,
    /// so 0 is always popular in `b`.
    pub(crate) fn blank_heavy_pair() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
        (
            prop::collection::vec(prop_oneof![3 => Just(0u8), 1 => 1u8..4], 0..250),
            prop::collection::vec(0u8..4, 0..20),
            prop::collection::vec((0usize..215, 1u8..4), 0..10),
            prop::collection::vec(0u8..4, 0..20),
        )
            .prop_map(|(a, head, noise, tail)| {
                let mut zeros = vec![0u8; 215];
                for (i, value) in noise {
                    zeros[i] = value;
                }
                let b: Vec<u8> = head.into_iter().chain(zeros).chain(tail).collect();
                (a, b)
            })
    }

    proptest! {
        #[test]
        fn test_blocks_leave_no_common_element_unmatched((a, b) in blank_heavy_pair()) {
            let matcher = Matcher::new(&a, &b);
            prop_assert!(matcher.is_popular(&0));

            let result = matcher.matching_blocks();
            prop_assert_eq!(result[result.len() - 1], MatchBlock::new(a.len(), b.len(), 0));

            let mut prev = MatchBlock::new(0, 0, 0);
            for &block in &result {
                prop_assert!(prev.a_end() <= block.a_start);
                prop_assert!(prev.b_end() <= block.b_start);
                prop_assert_eq!(&a[block.a_start..block.a_end()], &b[block.b_start..block.b_end()]);

                let gap_b = &b[prev.b_end()..block.b_start];
                for elt in &a[prev.a_end()..block.a_start] {
                    prop_assert!(!gap_b.contains(elt));
                }
                prev = block;
            }
        }
    }

    proptest! {
        #[test]
        fn test_blocks_are_monotone_and_maximal(
            a in prop::collection::vec(0u8..4, 0..40),
            b in prop::collection::vec(0u8..4, 0..40),
        ) {
            let result = blocks(&a, &b);
            let last = result[result.len() - 1];
            prop_assert_eq!(last, MatchBlock::new(a.len(), b.len(), 0));

            for block in &result {
                prop_assert_eq!(&a[block.a_start..block.a_end()], &b[block.b_start..block.b_end()]);
            }
            for pair in result.windows(2) {
                let (prev, next) = (pair[0], pair[1]);
                prop_assert!(prev.a_end() <= next.a_start);
                prop_assert!(prev.b_end() <= next.b_start);
                if next.len > 0 {
                    prop_assert!(prev.a_end() != next.a_start || prev.b_end() != next.b_start);
                }
            }
        }
    }
}
