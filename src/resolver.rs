//! Reference resolution against the symbol table and filesystem.
//!
//! Each candidate is classified and checked; every broken result becomes
//! exactly one diagnostic. The resolver never aborts on a bad reference,
//! it accumulates into the injected report and continues.

use std::path::Path;

use crate::report::Report;
use crate::scanner::Scan;
use crate::symbols::SymbolTable;
use crate::types::{Candidate, Category, Diagnostic, Document, Severity};

/// Identifier suffixes that mark a short `_t` token as a fragment of a
/// longer name rather than a type reference of its own.
const COMMON_IDENTIFIER_SUFFIXES: &[&str] = &[
    "template", "tests", "config", "data", "value", "name", "id", "type",
];

/// Second candidate directory for file-reference existence checks.
const METHOD_DIR: &str = "methods";

/// Ownership-annotation tokens that read like types but never are.
const OWNERSHIP_TOKENS: &[&str] = &["own_t", "mut_t", "ref_t"];

/// C and ABI primitive names. A closed vocabulary of the host type
/// system, so a compile-time constant set rather than runtime state.
const STANDARD_TYPES: &[&str] = &[
    "int64_t", "uint64_t", "int32_t", "uint32_t", "int16_t", "uint16_t",
    "int8_t", "uint8_t", "size_t", "ssize_t", "ptrdiff_t", "uintptr_t",
    "intptr_t", "FILE", "bool", "char", "int", "long", "float", "double",
    "void", "const", "unsigned", "signed", "NULL", "PRId64", "PRIu64",
];

/// Resolves candidates for one run. Holds only read-only state; the
/// diagnostic collector is passed into each call.
pub struct Resolver<'a> {
    root: &'a Path,
    source_dir: &'a str,
    table: &'a SymbolTable,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over the given repository root and symbol table.
    pub fn new(root: &'a Path, source_dir: &'a str, table: &'a SymbolTable) -> Self {
        Self {
            root,
            source_dir,
            table,
        }
    }

    /// Resolve every candidate from one document's scan. Symbol-dependent
    /// categories are skipped when the table is empty; the caller marks
    /// those sections as skipped in the report.
    pub fn resolve_document(&self, doc: &Document, scan: &Scan, report: &mut Report) {
        let have_symbols = !self.table.is_empty();

        for candidate in &scan.candidates {
            match candidate.category {
                Category::FileRef => self.resolve_file_ref(doc, candidate, report),
                Category::FunctionRef if have_symbols => {
                    self.resolve_function_ref(doc, candidate, report);
                },
                Category::ModuleRef if have_symbols => {
                    self.resolve_module_ref(doc, candidate, report);
                },
                Category::TypeRef if have_symbols => {
                    self.resolve_type_ref(doc, candidate, report);
                },
                Category::FunctionRef | Category::Link | Category::ModuleRef
                | Category::TypeRef => {},
            }
        }
    }

    /// Check a file reference at up to four candidate locations.
    fn resolve_file_ref(&self, doc: &Document, candidate: &Candidate, report: &mut Report) {
        let raw = candidate.raw.as_str();

        // URLs and anchor fragments are not file references.
        if raw.contains("://") || raw.contains('#') {
            return;
        }
        // A Zig dotted call (ar_allocator.create) contains a dot but is
        // not a file reference. Checked before any filesystem lookup.
        if is_dotted_call(raw) {
            return;
        }
        if raw.starts_with("agerun_") {
            push(report, doc, candidate, format!(
                "contains outdated reference: {raw} (should be ar_*)"
            ));
            return;
        }

        let doc_dir = doc.path.parent().unwrap_or_else(|| Path::new(""));
        let locations = [
            self.root.join(doc_dir).join(raw),
            self.root.join(raw),
            self.root.join(self.source_dir).join(raw),
            self.root.join(METHOD_DIR).join(raw),
        ];
        if !locations.iter().any(|p| p.is_file()) {
            push(report, doc, candidate, format!("references missing file: {raw}"));
        }
    }

    /// Check a function reference against the function set. Malformed
    /// double-separator spellings are flagged regardless of existence.
    fn resolve_function_ref(&self, doc: &Document, candidate: &Candidate, report: &mut Report) {
        let raw = candidate.raw.as_str();

        if raw.starts_with("ar__") {
            push(report, doc, candidate, format!(
                "contains invalid double underscore pattern '{raw}' (should be ar_module__function)"
            ));
            return;
        }
        if !self.table.functions.contains(raw) {
            push(report, doc, candidate, format!(
                "references non-existent function '{raw}'"
            ));
        }
    }

    /// Check a backticked identifier that is shaped like a module name.
    /// Resolution requires a declaration file of that exact stem.
    fn resolve_module_ref(&self, doc: &Document, candidate: &Candidate, report: &mut Report) {
        let raw = candidate.raw.as_str();
        if !is_module_shape(raw) {
            return;
        }

        let source = self.root.join(self.source_dir);
        if source.join(format!("{raw}.c")).is_file()
            || source.join(format!("{raw}.h")).is_file()
            || source.join(format!("{raw}.zig")).is_file()
        {
            return;
        }

        if let Some(suffix) = raw.strip_prefix("agerun_") {
            let modern = format!("ar_{suffix}");
            if self.table.modules.contains(&modern) {
                push(report, doc, candidate, format!(
                    "references non-existent module '{raw}' (should be '{modern}')"
                ));
                return;
            }
        }

        push(report, doc, candidate, format!(
            "references non-existent module '{raw}'"
        ));
    }

    /// Check a type reference after subtracting the known false-positive
    /// vocabularies.
    fn resolve_type_ref(&self, doc: &Document, candidate: &Candidate, report: &mut Report) {
        let raw = candidate.raw.as_str();

        if STANDARD_TYPES.contains(&raw) || OWNERSHIP_TOKENS.contains(&raw) {
            return;
        }
        // Function names are handled by the function check.
        if raw.contains("__") {
            return;
        }
        // Bare module names without the type suffix are module references.
        if raw.starts_with("ar_") && !raw.ends_with("_t") {
            return;
        }
        // Constants and macros.
        if is_constant_shape(raw) {
            return;
        }
        // Short generic tokens like `agent_t` that only appear as part of
        // a longer identifier elsewhere in the same document.
        if let Some(stem) = short_generic_stem(raw) {
            let is_fragment = COMMON_IDENTIFIER_SUFFIXES
                .iter()
                .any(|suffix| doc.mentions(&format!("{stem}_{suffix}")));
            if is_fragment {
                return;
            }
        }
        // PascalCase tokens naming a real Zig module file are module
        // types, valid by construction.
        if starts_uppercase(raw) && self.zig_module_exists(raw) {
            return;
        }

        if !self.table.types.contains(raw) {
            push(report, doc, candidate, format!(
                "references non-existent type '{raw}'"
            ));
        }
    }

    /// Whether `<source_dir>/<name>.zig` exists.
    fn zig_module_exists(&self, name: &str) -> bool {
        self.root
            .join(self.source_dir)
            .join(format!("{name}.zig"))
            .is_file()
    }
}

/// Whether a character can appear in a declaration identifier.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether a token has the `ar_module.member` dotted-call shape:
/// exactly one dot, identifier characters on both sides.
fn is_dotted_call(token: &str) -> bool {
    let Some(rest) = token.strip_prefix("ar_") else {
        return false;
    };
    let Some((module, member)) = rest.split_once('.') else {
        return false;
    };
    !module.is_empty()
        && !member.is_empty()
        && module.chars().all(is_ident_char)
        && member.chars().all(is_ident_char)
}

/// Whether a backticked token is plausibly a module name: namespace
/// prefixed, no double separator, not a type name.
fn is_module_shape(token: &str) -> bool {
    if token.contains("__") || token.ends_with("_t") {
        return false;
    }
    let rest = token
        .strip_prefix("ar_")
        .or_else(|| token.strip_prefix("agerun_"));
    matches!(rest, Some(r) if !r.is_empty() && r.chars().all(is_ident_char))
}

/// Whether a token is shaped like an all-uppercase constant or macro.
fn is_constant_shape(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// For a token matching `[a-z]+_t`, return the stem without the suffix.
fn short_generic_stem(token: &str) -> Option<&str> {
    let stem = token.strip_suffix("_t")?;
    (!stem.is_empty() && stem.chars().all(|c| c.is_ascii_lowercase())).then_some(stem)
}

/// Whether a token starts with an ASCII uppercase letter.
fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Record one broken reference as an error diagnostic.
fn push(report: &mut Report, doc: &Document, candidate: &Candidate, message: String) {
    report.push(Diagnostic {
        category: candidate.category,
        document: doc.path.clone(),
        line: candidate.line,
        message,
        severity: Severity::Error,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;
    use std::path::PathBuf;

    /// A fixture repository with a modules tree and a symbol table built
    /// from it, plus helpers to scan and resolve a single document.
    struct Fixture {
        dir: tempfile::TempDir,
        table: SymbolTable,
    }

    impl Fixture {
        fn new(files: &[(&str, &str)]) -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir(dir.path().join("modules")).unwrap();
            std::fs::create_dir(dir.path().join("methods")).unwrap();
            for (name, content) in files {
                std::fs::write(dir.path().join("modules").join(name), content).unwrap();
            }
            let table = crate::symbols::build(dir.path(), "modules");
            Self { dir, table }
        }

        fn resolve(&self, content: &str) -> Report {
            let doc = Document::new(PathBuf::from("kb/doc.md"), content);
            let scan = Scanner::new().scan(&doc);
            let resolver = Resolver::new(self.dir.path(), "modules", &self.table);
            let mut report = Report::new();
            resolver.resolve_document(&doc, &scan, &mut report);
            report
        }
    }

    fn data_fixture() -> Fixture {
        Fixture::new(&[(
            "ar_data.h",
            "typedef struct ar_data_s ar_data_t;\nar_data_t* ar_data__create_map(void);\n",
        )])
    }

    #[test]
    fn valid_references_produce_no_diagnostics() {
        let fixture = data_fixture();
        let report =
            fixture.resolve("Call `ar_data__create_map` to build an `ar_data_t` map.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn missing_function_produces_one_diagnostic_with_line() {
        let fixture = data_fixture();
        let report = fixture.resolve("intro\nCall `ar_data__missing_fn` here.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::FunctionRef);
        assert_eq!(diags[0].line, 2);
        assert!(diags[0].message.contains("ar_data__missing_fn"));
    }

    #[test]
    fn missing_type_is_reported() {
        let fixture = data_fixture();
        let report = fixture.resolve("Uses `ar_phantom_t` internally.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::TypeRef);
    }

    #[test]
    fn standard_and_ownership_types_are_skipped() {
        let fixture = data_fixture();
        let report = fixture.resolve("Takes a `size_t` count and an `int64_t` id; `own_t` marks ownership.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn dotted_call_is_not_a_file_reference() {
        let fixture = Fixture::new(&[(
            "ar_allocator.zig",
            "pub fn create(comptime T: type) ?*T {\n}\n",
        )]);
        let report = fixture.resolve("Use `ar_allocator.create` instead of malloc.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn missing_file_reference_is_reported() {
        let fixture = data_fixture();
        let report = fixture.resolve("See ar_core/ar_ghost.h for details.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::FileRef);
        assert!(diags[0].message.contains("ar_core/ar_ghost.h"));
    }

    #[test]
    fn existing_file_in_source_dir_resolves() {
        let fixture = Fixture::new(&[("ar_data-api.md", "# API notes\n")]);
        let report = fixture.resolve("See ar_data-api.md for the map API.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn single_dot_file_name_is_never_existence_checked() {
        // `ar_ghost.h` has the same namespace.identifier shape as a Zig
        // dotted call, so the file check does not apply to it.
        let fixture = data_fixture();
        let report = fixture.resolve("See ar_ghost.h for details.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn outdated_prefix_file_reference_is_flagged() {
        let fixture = data_fixture();
        let report = fixture.resolve("Historic name: agerun_data.h\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("outdated reference"));
    }

    #[test]
    fn legacy_module_name_suggests_modern_prefix() {
        let fixture = data_fixture();
        let report = fixture.resolve("The `agerun_data` module owns values.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::ModuleRef);
        assert!(diags[0].message.contains("should be 'ar_data'"));
    }

    #[test]
    fn missing_module_is_reported() {
        let fixture = data_fixture();
        let report = fixture.resolve("The `ar_missing` module does not exist.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::ModuleRef);
    }

    #[test]
    fn existing_module_resolves() {
        let fixture = data_fixture();
        let report = fixture.resolve("The `ar_data` module owns values.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn malformed_double_underscore_is_flagged() {
        let fixture = data_fixture();
        let report = fixture.resolve("Never write `ar__data__create` in docs.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("double underscore"));
    }

    #[test]
    fn constant_shapes_are_skipped() {
        let fixture = data_fixture();
        let report = fixture.resolve("Set `AR_DATA_MAX` before calling.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn short_type_fragment_of_longer_identifier_is_skipped() {
        let fixture = data_fixture();
        // `agent_t` only appears as part of agent_tests in this document.
        let report = fixture.resolve("The agent_tests suite covers agent_t handling.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn pascal_case_zig_module_is_skipped() {
        let fixture = Fixture::new(&[("DataStore.zig", "pub fn init() void {\n}\n")]);
        let report = fixture.resolve("The `DataStore` module persists agents.\n");
        assert!(report.diagnostics().is_empty());
    }

    #[test]
    fn unknown_pascal_case_type_is_reported() {
        let fixture = data_fixture();
        let report = fixture.resolve("The `PhantomStore` type does not exist.\n");

        let diags = report.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].category, Category::TypeRef);
    }

    #[test]
    fn marked_lines_never_produce_diagnostics() {
        let fixture = data_fixture();
        let report = fixture.resolve(
            "ar_fake__call(); // EXAMPLE: hypothetical\nfake_widget_t *w; // ERROR: wrong type\nar_debug__print(); // BAD: not public\n",
        );
        assert!(report.diagnostics().is_empty());
    }
}
