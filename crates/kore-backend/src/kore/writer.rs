// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Line-based writer for KORE text with indentation.

use super::syntax::Sentence;
use std::fmt::Display;

/// Writer for one KORE output stream.
/// Tracks indentation and renders sentences in the layout used for definitions.
#[derive(Debug, Default, Clone)]
pub struct KoreWriter {
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl KoreWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Write a string, handling indentation at line starts.
    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.out.push('\n');
                self.at_line_start = true;
            } else {
                if self.at_line_start {
                    for _ in 0..self.indent {
                        self.out.push_str("  ");
                    }
                }
                self.at_line_start = false;
                self.out.push(c);
            }
        }
    }

    /// Write a complete line.
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.write("\n");
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.write(&args.to_string());
    }

    pub fn line_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.line(&args.to_string());
    }

    /// Write items separated by a separator string.
    pub fn sep<I, T>(&mut self, separator: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            first = false;
            self.write(&item.to_string());
        }
    }

    /// A `// text` line. Line breaks in `text` are flattened so the comment stays one line.
    pub fn comment(&mut self, text: &str) {
        let flat: String = text
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        self.line_fmt(format_args!("// {}", flat));
    }

    /// A declaration on a single line, optionally followed by a trailing comment.
    pub fn sentence(&mut self, sentence: &Sentence, comment: Option<&str>) {
        self.write(&sentence.to_string());
        if let Some(comment) = comment {
            self.write_fmt(format_args!(" // {}", comment));
        }
        self.newline();
    }

    /// A translated rule: the sentence, its attributes on the next line, then a blank line.
    pub fn rule(&mut self, sentence: &Sentence) {
        self.line(&sentence.head());
        self.indent();
        self.line(&sentence.att().to_string());
        self.dedent();
        self.newline();
    }

    /// Append pre-rendered text verbatim, without indentation.
    pub fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.at_line_start = text.is_empty() && self.at_line_start || text.ends_with('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_inner(self) -> String {
        self.out
    }
}

/// Render to a string.
pub fn render_to_string<F>(f: F) -> String
where
    F: FnOnce(&mut KoreWriter),
{
    let mut writer = KoreWriter::new();
    f(&mut writer);
    writer.into_inner()
}
