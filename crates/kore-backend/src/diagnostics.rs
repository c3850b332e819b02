// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Non-fatal diagnostics raised during translation.

use anyhow::Result;
use codespan_reporting::diagnostic::{Diagnostic, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::{self, termcolor::WriteColor};
use std::cell::RefCell;

/// Receiver of warnings and notes. Translation only ever calls it from one thread.
pub trait DiagnosticSink {
    fn diag(&self, severity: Severity, message: &str, context: &str);
}

/// A sink that keeps everything it is given, for rendering once translation is done.
#[derive(Default)]
pub struct DiagnosticCollector {
    diagnostics: RefCell<Vec<Diagnostic<usize>>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic<usize>> {
        self.diagnostics.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.severity >= Severity::Error)
    }

    /// Render all diagnostics with at least `min_severity`.
    pub fn emit(&self, writer: &mut dyn WriteColor, min_severity: Severity) -> Result<()> {
        let files: SimpleFiles<String, String> = SimpleFiles::new();
        let config = term::Config::default();
        for diagnostic in self.diagnostics.borrow().iter() {
            if diagnostic.severity >= min_severity {
                term::emit(writer, &config, &files, diagnostic)?;
            }
        }
        Ok(())
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn diag(&self, severity: Severity, message: &str, context: &str) {
        let diagnostic = Diagnostic::new(severity)
            .with_message(message)
            .with_notes(vec![context.to_string()]);
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::Buffer;

    #[test]
    fn collects_and_renders() {
        let collector = DiagnosticCollector::new();
        collector.diag(Severity::Warning, "functional claims not yet supported", "claim f(X) => X");
        collector.diag(Severity::Note, "just a note", "here");
        assert_eq!(collector.len(), 2);
        assert!(!collector.has_errors());

        let mut buffer = Buffer::no_color();
        collector.emit(&mut buffer, Severity::Warning).unwrap();
        let text = String::from_utf8_lossy(&buffer.into_inner()).to_string();
        assert!(text.contains("warning: functional claims not yet supported"));
        assert!(text.contains("claim f(X) => X"));
        assert!(!text.contains("just a note"));
    }
}
