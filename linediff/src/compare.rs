//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::io::Write;

use crate::{
    error::{Error, Result},
    matcher::Matcher,
    opcodes::{self, Opcode},
    render::{ContextRenderer, DiffLine, InlineRenderer, Renderer, UnifiedRenderer},
    sequence::LineSequence,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Every line, marked `"  "`, `"- "`, `"+ "` with optional `"? "` hints.
    #[default]
    Inline,
    Unified,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Lines of unchanged context around each hunk. Signed so that a
    /// negative request coming from a caller is reported rather than wrapped.
    pub context_lines: i64,
    pub label_a: Option<String>,
    pub label_b: Option<String>,
    pub intraline_hints: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            label_a: None,
            label_b: None,
            intraline_hints: true,
        }
    }
}

impl CompareOptions {
    /// The context window as a line count.
    pub fn context(&self) -> Result<usize> {
        usize::try_from(self.context_lines).map_err(|_| {
            Error::InvalidConfiguration(format!(
                "context lines must not be negative, got {}",
                self.context_lines
            ))
        })
    }

    fn labels(&self) -> (&str, &str) {
        (
            self.label_a
                .as_deref()
                .unwrap_or(crate::render::DEFAULT_LABEL_A),
            self.label_b
                .as_deref()
                .unwrap_or(crate::render::DEFAULT_LABEL_B),
        )
    }
}

/// Rendered output of one comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    lines: Vec<DiffLine>,
    differences: bool,
}

impl Comparison {
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<DiffLine> {
        self.lines
    }

    /// Whether the inputs differ at all, independent of how much output the
    /// chosen mode produced.
    pub fn has_differences(&self) -> bool {
        self.differences
    }

    /// Write every rendered line, adding a newline to lines without one.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<()> {
        for line in &self.lines {
            out.write_all(line.text.as_bytes())?;
            if !line.text.ends_with('\n') {
                out.write_all(b"\n")?;
            }
        }
        out.flush()?;
        Ok(())
    }
}

/// Align two sequences and return the edit script covering both.
pub fn diff(a: &LineSequence<'_>, b: &LineSequence<'_>) -> Vec<Opcode> {
    let blocks = Matcher::new(a.as_slice(), b.as_slice()).matching_blocks();
    opcodes::build(a.as_slice(), b.as_slice(), &blocks)
}

pub fn compare<A: AsRef<str>, B: AsRef<str>>(
    lines_a: &[A],
    lines_b: &[B],
    mode: OutputMode,
    options: &CompareOptions,
) -> Result<Comparison> {
    let context = options.context()?;
    let (label_a, label_b) = options.labels();

    let a = LineSequence::new(lines_a);
    let b = LineSequence::new(lines_b);
    let opcodes = diff(&a, &b);
    let differences = opcodes.iter().any(|op| !op.is_equal());

    let renderer: Box<dyn Renderer> = match mode {
        OutputMode::Inline if options.intraline_hints => Box::new(InlineRenderer::new()),
        OutputMode::Inline => Box::new(InlineRenderer::without_hints()),
        OutputMode::Unified => {
            Box::new(UnifiedRenderer::new(context).with_labels(label_a, label_b))
        }
        OutputMode::Context => {
            Box::new(ContextRenderer::new(context).with_labels(label_a, label_b))
        }
    };
    let lines: Vec<DiffLine> = renderer.render(&opcodes, &a, &b).collect();

    log::debug!(
        "compare: {:?} {} x {} lines, {} opcodes, {} output lines",
        mode,
        a.len(),
        b.len(),
        opcodes.len(),
        lines.len()
    );
    Ok(Comparison { lines, differences })
}
