//! Annotation-aware document scanning.
//!
//! Walks each document's lines tracking fenced-code-block state and the
//! line-scoped exclusion protocol, and extracts raw candidate references.
//! Classification and existence checks happen later in the resolver; the
//! scanner's job is only to find tokens and honor exclusions.

use std::collections::HashSet;

use regex::Regex;

use crate::types::{
    Candidate, Category, Document, LinkDefinition, LinkOccurrence, LinkUsage,
};

/// Inline markers that exclude a single line from validation. Authors use
/// these to write intentional non-existent ("teaching") examples.
const EXCLUSION_MARKERS: &[&str] = &[
    "// ERROR:",
    "/* ERROR:",
    "// EXAMPLE:",
    "/* EXAMPLE:",
    "// BAD:",
    "/* BAD:",
    "# EXAMPLE:",
];

/// The fenced code block delimiter.
const FENCE: &str = "```";

/// Per-document fence state. Only fences whose opening delimiter line
/// carries an `EXAMPLE:` marker suppress their contents; plain fences are
/// tracked but validated like prose.
#[derive(Clone, Copy, PartialEq, Eq)]
enum FenceState {
    InFence,
    InMarkedExampleFence,
    Normal,
}

/// Everything extracted from one document in a single pass.
pub struct Scan {
    /// Symbol and file candidates, deduplicated per (category, text) with
    /// the first occurrence's line number kept.
    pub candidates: Vec<Candidate>,
    /// Number of lines suppressed by the exclusion protocol.
    pub excluded_lines: u32,
    /// Reference-style `[label]: target` definitions.
    pub link_definitions: Vec<LinkDefinition>,
    /// Reference-style `[text][label]` usages.
    pub link_usages: Vec<LinkUsage>,
    /// Inline link and image targets.
    pub links: Vec<LinkOccurrence>,
}

/// A compiled extraction pattern tagged with the candidate category its
/// first capture group produces. Holding these in a read-only table keeps
/// the dispatch declarative and testable apart from file I/O.
struct TokenPattern {
    category: Category,
    pattern: Regex,
}

/// Document scanner with all extraction patterns compiled once.
pub struct Scanner {
    inline_link: Regex,
    reference_definition: Regex,
    reference_usage: Regex,
    tokens: Vec<TokenPattern>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Compile the extraction pattern table.
    ///
    /// # Panics
    ///
    /// Panics if any hardcoded pattern is invalid (compile-time invariant).
    pub fn new() -> Self {
        let tokens = vec![
            // Full file references with an extension: ar_data.h, agerun_io.c.
            TokenPattern {
                category: Category::FileRef,
                pattern: Regex::new(r"\b((?:ar_|agerun_)[a-zA-Z0-9_/-]+\.[a-zA-Z0-9]+)\b")
                    .expect("valid regex"),
            },
            // Any backticked identifier is a module-name candidate; the
            // resolver filters to plausible module shapes.
            TokenPattern {
                category: Category::ModuleRef,
                pattern: Regex::new(r"`([a-zA-Z_][a-zA-Z0-9_]*)`").expect("valid regex"),
            },
            // Backticked function names, with or without trailing ().
            TokenPattern {
                category: Category::FunctionRef,
                pattern: Regex::new(r"`(ar_[a-zA-Z0-9]+__[a-zA-Z0-9_]+)(?:\(\))?`")
                    .expect("valid regex"),
            },
            // Bare function calls in code samples.
            TokenPattern {
                category: Category::FunctionRef,
                pattern: Regex::new(r"\b(ar_[a-zA-Z0-9]+__[a-zA-Z0-9_]+)\s*\(")
                    .expect("valid regex"),
            },
            // Malformed double-separator spellings (ar__module__function).
            // Extracted so the resolver can flag them regardless of existence.
            TokenPattern {
                category: Category::FunctionRef,
                pattern: Regex::new(r"\b(ar__[a-zA-Z0-9_]+__[a-zA-Z0-9_]+)")
                    .expect("valid regex"),
            },
            // Backticked _t-suffixed type names.
            TokenPattern {
                category: Category::TypeRef,
                pattern: Regex::new(r"`([a-zA-Z][a-zA-Z0-9_]*_t)(?:[^a-zA-Z]|$)")
                    .expect("valid regex"),
            },
            // Backticked PascalCase tokens (Zig module types).
            TokenPattern {
                category: Category::TypeRef,
                pattern: Regex::new(r"`([A-Z][a-zA-Z0-9_]*)`").expect("valid regex"),
            },
            // Bare _t-suffixed type names in code samples.
            TokenPattern {
                category: Category::TypeRef,
                pattern: Regex::new(r"\b([a-zA-Z][a-zA-Z0-9_]*_t)\b").expect("valid regex"),
            },
        ];

        Self {
            inline_link: Regex::new(r"!?\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"),
            reference_definition: Regex::new(r"^\s*\[([^\]]+)\]:\s*(\S+)").expect("valid regex"),
            reference_usage: Regex::new(r"\[([^\]]+)\]\[([^\]]+)\]").expect("valid regex"),
            tokens,
        }
    }

    /// Scan one document, honoring the exclusion protocol. Resets all
    /// fence state at the start of each document.
    pub fn scan(&self, doc: &Document) -> Scan {
        let mut scan = Scan {
            candidates: Vec::new(),
            excluded_lines: 0,
            link_definitions: Vec::new(),
            link_usages: Vec::new(),
            links: Vec::new(),
        };
        let mut seen: HashSet<(Category, String)> = HashSet::new();
        let mut state = FenceState::Normal;

        for (index, line) in doc.lines.iter().enumerate() {
            let line_number = line_number_from_index(index);
            let is_fence = line.contains(FENCE);

            // Transitions happen on every fence delimiter line; only
            // example-marked fences also suppress their own delimiters.
            let (next_state, delimiter_excluded) = if is_fence {
                match state {
                    FenceState::Normal if line.contains("EXAMPLE:") => {
                        (FenceState::InMarkedExampleFence, true)
                    },
                    FenceState::Normal => (FenceState::InFence, false),
                    FenceState::InFence => (FenceState::Normal, false),
                    FenceState::InMarkedExampleFence => (FenceState::Normal, true),
                }
            } else {
                (state, false)
            };

            let inside_example = state == FenceState::InMarkedExampleFence && !is_fence;
            let excluded = delimiter_excluded || inside_example || has_exclusion_marker(line);
            state = next_state;

            if excluded {
                scan.excluded_lines = scan.excluded_lines.saturating_add(1);
                continue;
            }

            self.extract_tokens(line, line_number, &mut seen, &mut scan.candidates);
            self.extract_links(line, line_number, &mut scan);
        }

        scan
    }

    /// Run every token pattern over a line, deduplicating per document.
    fn extract_tokens(
        &self,
        line: &str,
        line_number: u32,
        seen: &mut HashSet<(Category, String)>,
        candidates: &mut Vec<Candidate>,
    ) {
        for token in &self.tokens {
            for cap in token.pattern.captures_iter(line) {
                let Some(raw) = cap.get(1) else {
                    continue;
                };
                let key = (token.category, raw.as_str().to_string());
                if seen.insert(key) {
                    candidates.push(Candidate {
                        category: token.category,
                        line: line_number,
                        raw: raw.as_str().to_string(),
                    });
                }
            }
        }
    }

    /// Extract inline links, images, and reference-style link syntax.
    fn extract_links(&self, line: &str, line_number: u32, scan: &mut Scan) {
        // A definition line is consumed whole; its bracketed label must not
        // also be parsed as a usage.
        if let Some(cap) = self.reference_definition.captures(line) {
            if let (Some(label), Some(target)) = (cap.get(1), cap.get(2)) {
                scan.link_definitions.push(LinkDefinition {
                    label: label.as_str().to_ascii_lowercase(),
                    line: line_number,
                    target: target.as_str().to_string(),
                });
            }
            return;
        }

        for cap in self.inline_link.captures_iter(line) {
            if let Some(target) = cap.get(2) {
                scan.links.push(LinkOccurrence {
                    line: line_number,
                    target: target.as_str().to_string(),
                });
            }
        }

        for cap in self.reference_usage.captures_iter(line) {
            if let Some(label) = cap.get(2) {
                scan.link_usages.push(LinkUsage {
                    label: label.as_str().to_ascii_lowercase(),
                    line: line_number,
                });
            }
        }
    }
}

/// Whether a line carries any same-line exclusion marker.
fn has_exclusion_marker(line: &str) -> bool {
    EXCLUSION_MARKERS.iter().any(|marker| line.contains(marker))
}

/// Convert a zero-based line index to a one-based diagnostic line number.
fn line_number_from_index(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1)
}
