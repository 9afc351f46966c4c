//! Diagnostic aggregation and report rendering.
//!
//! The report is the single mutable collector threaded through every
//! resolver call. Rendering groups diagnostics by check category into a
//! sectioned report, each section ending in a pass/fail line; the exit
//! code is non-zero iff any error-severity diagnostic was recorded.

use std::fmt::Write as _;
use std::process::ExitCode;

use crate::types::{Category, Diagnostic, Severity};

/// Sections in render order. Function and type references share a section.
const SECTIONS: &[(&str, &str, &[Category])] = &[
    (
        "Checking documentation file references...",
        "File reference check",
        &[Category::FileRef],
    ),
    (
        "Checking module name consistency...",
        "Module name check",
        &[Category::ModuleRef],
    ),
    (
        "Checking function and type references...",
        "Function/type check",
        &[Category::FunctionRef, Category::TypeRef],
    ),
    (
        "Checking relative links...",
        "Relative link check",
        &[Category::Link],
    ),
];

/// Accumulated diagnostics for one validation run.
pub struct Report {
    diagnostics: Vec<Diagnostic>,
    /// True when symbol-dependent checks were skipped because the source
    /// tree contributed no declarations. Those sections must not claim
    /// "all references valid".
    symbol_checks_skipped: bool,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            symbol_checks_skipped: false,
        }
    }

    /// All recorded diagnostics in insertion order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The process exit code: non-zero iff any error was recorded.
    pub fn exit_code(&self) -> ExitCode {
        if self.has_errors() {
            ExitCode::from(1)
        } else {
            ExitCode::SUCCESS
        }
    }

    /// Whether any error-severity diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Mark the symbol-dependent sections as skipped.
    pub fn mark_symbol_checks_skipped(&mut self) {
        self.symbol_checks_skipped = true;
    }

    /// Record one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Render the full sectioned report. Deterministic for an unchanged
    /// corpus: diagnostics arrive in document order, lines ascending.
    pub fn render(&self, checked_docs: usize) -> String {
        let mut out = String::new();

        for (heading, label, categories) in SECTIONS {
            let _ = writeln!(out, "{heading}");

            // File existence and link checks run against the filesystem
            // and do not depend on the symbol table.
            let symbol_section = categories
                .iter()
                .any(|c| matches!(c, Category::FunctionRef | Category::ModuleRef | Category::TypeRef));
            if self.symbol_checks_skipped && symbol_section {
                let _ = writeln!(out, "{label}: skipped (no source declarations found)");
                let _ = writeln!(out);
                continue;
            }

            let section_diags: Vec<&Diagnostic> = self
                .diagnostics
                .iter()
                .filter(|d| categories.contains(&d.category))
                .collect();
            let errors = section_diags
                .iter()
                .filter(|d| d.severity == Severity::Error)
                .count();

            for diag in &section_diags {
                let marker = match diag.severity {
                    Severity::Error => "",
                    Severity::Warning => "warning: ",
                };
                let _ = writeln!(
                    out,
                    "  - {}:{} {marker}{}",
                    diag.document.display(),
                    diag.line,
                    diag.message
                );
            }

            if errors == 0 {
                let _ = writeln!(out, "{label}: {checked_docs} docs checked, all references valid");
            } else {
                let _ = writeln!(out, "{label}: FAILED ({errors} broken)");
            }
            let _ = writeln!(out);
        }

        let verdict = if self.has_errors() { "FAILED" } else { "PASSED" };
        let _ = writeln!(out, "Documentation check {verdict}");
        out
    }
}
