/// Core domain types for doccheck candidates, documents, and diagnostics.
use std::path::PathBuf;

/// A token extracted from a document that might name a symbol or file.
/// Ephemeral: produced by the scanner, consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The kind of reference this token might be.
    pub category: Category,
    /// One-based line number where the token was found.
    pub line: u32,
    /// The raw token text, without backticks.
    pub raw: String,
}

/// What kind of thing a scanned token might name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A full file name such as `ar_data.h`.
    FileRef,
    /// A namespaced function call such as `ar_data__create_map`.
    FunctionRef,
    /// A markdown link, image, or reference-style target.
    Link,
    /// A bare module name such as `ar_data`.
    ModuleRef,
    /// A type name such as `ar_data_t` or a PascalCase module type.
    TypeRef,
}

/// A single validation failure, attributed to an exact document line
/// so a human can jump to the offending text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The kind of check that produced this diagnostic.
    pub category: Category,
    /// The documentation file containing the problem.
    pub document: PathBuf,
    /// One-based line number of the offending text.
    pub line: u32,
    /// Human-readable description of the problem.
    pub message: String,
    /// Whether this diagnostic blocks the exit code.
    pub severity: Severity,
}

/// A documentation file read into memory once per run. Never mutated.
#[derive(Debug)]
pub struct Document {
    /// The file's lines in order. Line numbers in diagnostics are
    /// one-based indices into this sequence.
    pub lines: Vec<String>,
    /// Path relative to the repository root.
    pub path: PathBuf,
}

impl Document {
    /// Build a document from raw file content.
    pub fn new(path: PathBuf, content: &str) -> Self {
        Self {
            lines: content.lines().map(String::from).collect(),
            path,
        }
    }

    /// Whether any line contains the given substring. Used by the type
    /// resolver's longer-identifier heuristic.
    pub fn mentions(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

/// A `[label]: target` reference-style link definition.
#[derive(Debug, Clone)]
pub struct LinkDefinition {
    /// The bracketed label, matched case-insensitively against usages.
    pub label: String,
    /// One-based line number of the definition.
    pub line: u32,
    /// The raw link target.
    pub target: String,
}

/// An inline `[text](target)` or image `![alt](target)` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    /// One-based line number of the occurrence.
    pub line: u32,
    /// The raw link target, fragment included.
    pub target: String,
}

/// A `[text][label]` reference-style link usage.
#[derive(Debug, Clone)]
pub struct LinkUsage {
    /// The bracketed label to look up among definitions.
    pub label: String,
    /// One-based line number of the usage.
    pub line: u32,
}

/// Whether a diagnostic blocks the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Reported and counted toward a non-zero exit.
    Error,
    /// Reported but never exit-blocking.
    Warning,
}
