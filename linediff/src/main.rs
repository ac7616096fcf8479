//
// Copyright (c) 2024 Hemi Labs, Inc.
//
// This file is part of the posixutils-rs project covered under
// the MIT License.  For the full license text, please see the LICENSE
// file in the root directory of this project.
// SPDX-License-Identifier: MIT
//

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::{ExitCode, Termination},
    time::SystemTime,
};

use chrono::{DateTime, Local};
use clap::Parser;
use gettextrs::{bind_textdomain_codeset, gettext, setlocale, textdomain, LocaleCategory};
use linediff::{compare, CompareOptions, Comparison, LineSequence, OutputMode};

const TEXT_DOMAIN: &str = "posixutils-rs";

/// linediff - compare two files line by line
#[derive(Parser, Clone)]
#[command(version, about = gettext("linediff - compare two files line by line"))]
struct Args {
    /// Mark every line of both files (the default output)
    #[arg(short = 'n', long = "ndiff")]
    ndiff: bool,

    /// Output 3 lines of copied context
    #[arg(short = 'c')]
    context3: bool,

    /// Output <N> lines of copied context
    #[arg(short = 'C', allow_negative_numbers = true)]
    context: Option<i64>,

    /// Output 3 lines of unified context
    #[arg(short = 'u')]
    unified3: bool,

    /// Output <N> lines of unified context
    #[arg(short = 'U', allow_negative_numbers = true)]
    unified: Option<i64>,

    /// Do not print `?` lines pointing at changed characters
    #[arg(long)]
    no_hints: bool,

    /// Label to use in place of the first file name
    #[arg(long)]
    label: Option<String>,

    /// Label to use in place of the second file name
    #[arg(long)]
    label2: Option<String>,

    /// First comparison file, `-` for standard input
    file1: PathBuf,

    /// Second comparison file, `-` for standard input
    file2: PathBuf,
}

impl Args {
    fn output_mode(&self) -> (OutputMode, i64) {
        const DEFAULT_CONTEXT: i64 = 3;

        if self.ndiff {
            (OutputMode::Inline, DEFAULT_CONTEXT)
        } else if let Some(n) = self.context {
            (OutputMode::Context, n)
        } else if self.context3 {
            (OutputMode::Context, DEFAULT_CONTEXT)
        } else if let Some(n) = self.unified {
            (OutputMode::Unified, n)
        } else if self.unified3 {
            (OutputMode::Unified, DEFAULT_CONTEXT)
        } else {
            (OutputMode::Inline, DEFAULT_CONTEXT)
        }
    }
}

/// Process exit status: whether the inputs differ, or why nothing was compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum Verdict {
    Same = 0,
    Differ = 1,
    Trouble = 2,
}

impl From<&Comparison> for Verdict {
    fn from(comparison: &Comparison) -> Self {
        if comparison.has_differences() {
            Verdict::Differ
        } else {
            Verdict::Same
        }
    }
}

impl Termination for Verdict {
    fn report(self) -> ExitCode {
        ExitCode::from(self as u8)
    }
}

struct FileInput {
    name: String,
    content: String,
    modified: SystemTime,
}

impl FileInput {
    fn read(path: &Path) -> io::Result<Self> {
        let with_path = |e: io::Error| io::Error::new(e.kind(), format!("{}: {e}", path.display()));

        if path == Path::new("-") {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content).map_err(with_path)?;
            return Ok(Self {
                name: String::from("-"),
                content,
                modified: SystemTime::now(),
            });
        }

        let content = fs::read_to_string(path).map_err(with_path)?;
        let modified = fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .map_err(with_path)?;
        Ok(Self {
            name: path.display().to_string(),
            content,
            modified,
        })
    }

    fn header(&self) -> String {
        let modified: DateTime<Local> = self.modified.into();
        format!("{}\t{}", self.name, modified.to_rfc2822())
    }
}

fn check_difference(args: &Args) -> linediff::Result<Verdict> {
    let (mode, context_lines) = args.output_mode();
    let mut options = CompareOptions {
        context_lines,
        intraline_hints: !args.no_hints,
        ..Default::default()
    };
    options.context()?;

    if args.file1 == Path::new("-") && args.file2 == Path::new("-") {
        eprintln!("linediff: {}", gettext("cannot compare stdin to itself"));
        return Ok(Verdict::Trouble);
    }

    let file1 = FileInput::read(&args.file1)?;
    let file2 = FileInput::read(&args.file2)?;
    options.label_a = Some(args.label.clone().unwrap_or_else(|| file1.header()));
    options.label_b = Some(args.label2.clone().unwrap_or_else(|| file2.header()));

    let lines1 = LineSequence::from_text(&file1.content);
    let lines2 = LineSequence::from_text(&file2.content);
    let comparison = compare(lines1.as_slice(), lines2.as_slice(), mode, &options)?;

    comparison.write_to(io::stdout().lock())?;
    Ok(Verdict::from(&comparison))
}

fn init_locale() {
    setlocale(LocaleCategory::LcAll, "");
    if let Err(error) = textdomain(TEXT_DOMAIN) {
        log::warn!("textdomain {TEXT_DOMAIN}: {error}");
    }
    if let Err(error) = bind_textdomain_codeset(TEXT_DOMAIN, "UTF-8") {
        log::warn!("bind_textdomain_codeset {TEXT_DOMAIN}: {error}");
    }
}

fn main() -> Verdict {
    env_logger::init();
    init_locale();

    let args = Args::parse();

    match check_difference(&args) {
        Ok(verdict) => verdict,
        Err(error) => {
            eprintln!("linediff: {error}");
            Verdict::Trouble
        }
    }
}
