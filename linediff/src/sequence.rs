//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::{fmt, ops::Range};

/// A single line of input together with its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    pub number: usize,
}

impl fmt::Display for Line<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Immutable ordered view over caller-owned lines.
///
/// Lines are opaque: no terminator handling or normalization happens here,
/// two lines are equal only if their text is byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence<'a> {
    lines: Vec<&'a str>,
}

impl<'a> LineSequence<'a> {
    pub fn new<S: AsRef<str>>(lines: &'a [S]) -> Self {
        Self {
            lines: lines.iter().map(AsRef::as_ref).collect(),
        }
    }

    /// Split `text` into lines, each keeping its terminator.
    ///
    /// A final line without a terminator is kept as is; empty text yields an
    /// empty sequence.
    pub fn from_text(text: &'a str) -> Self {
        text.split_inclusive('\n').collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at 0-based `index`, reported with its 1-based number.
    pub fn line(&self, index: usize) -> Line<'a> {
        Line {
            text: self.lines[index],
            number: index + 1,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Line<'a>> + '_ {
        (0..self.len()).map(|index| self.line(index))
    }

    pub fn slice(&self, range: Range<usize>) -> &[&'a str] {
        &self.lines[range]
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.lines
    }
}

impl<'a> FromIterator<&'a str> for LineSequence<'a> {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_line_numbers_are_one_based() {
        let owned = vec![String::from("first\n"), String::from("second\n")];
        let seq = LineSequence::new(&owned);
        assert_eq!(seq.len(), 2);
        assert_eq!(
            seq.line(1),
            Line {
                text: "second\n",
                number: 2
            }
        );
        let numbers: Vec<usize> = seq.iter().map(|line| line.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_empty_sequence() {
        let seq: LineSequence = std::iter::empty().collect();
        assert!(seq.is_empty());
        assert_eq!(seq.iter().count(), 0);
        assert_eq!(seq.slice(0..0).len(), 0);
    }

    #[test]
    fn test_from_text_keeps_terminators() {
        let seq = LineSequence::from_text("one\ntwo\r\nthree");
        assert_eq!(seq.as_slice(), &["one\n", "two\r\n", "three"]);
        assert!(LineSequence::from_text("").is_empty());
        assert_eq!(LineSequence::from_text("\n").as_slice(), &["\n"]);
    }

    #[test]
    fn test_slice_and_display() {
        let seq: LineSequence = ["a", "b", "c"].into_iter().collect();
        assert_eq!(seq.slice(1..3), &["b", "c"]);
        assert_eq!(seq.line(0).to_string(), "a");
    }
}
