//! Symbol table extraction from source declaration files.
//!
//! Recognizes surface declaration shapes only, not full grammar. Two
//! dialects contribute symbols: the C header/implementation dialect
//! (`ar_module__function(`, `typedef struct`, `} name;`, simple typedefs)
//! and the Zig dialect (`pub fn`, `pub const Name = struct|enum|union`).
//! Zig symbols are registered under both their bare name and a
//! `module.name` qualified form to support dotted-call references.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;

/// The set of names considered "real" because they are declared somewhere
/// in the source tree. Built once per run, immutable afterwards.
pub struct SymbolTable {
    /// Known function names, including Zig `module.function` forms.
    pub functions: HashSet<String>,
    /// Stems of non-test module files (`ar_data`, not `ar_data_tests`).
    pub modules: HashSet<String>,
    /// Known type names.
    pub types: HashSet<String>,
}

impl SymbolTable {
    /// Whether no declarations were found at all. Callers must treat this
    /// as "checks skipped", never as "all references valid".
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.types.is_empty() && self.modules.is_empty()
    }
}

/// Compiled declaration patterns, one per recognized shape.
struct DeclarationPatterns {
    aggregate_close: Regex,
    function: Regex,
    simple_typedef: Regex,
    typedef_struct: Regex,
    zig_aggregate: Regex,
    zig_fn: Regex,
}

impl DeclarationPatterns {
    /// Compile all declaration patterns.
    ///
    /// # Panics
    ///
    /// Panics if any hardcoded pattern is invalid (compile-time invariant).
    fn compile() -> Self {
        Self {
            aggregate_close: Regex::new(r"(?m)^\s*\}\s*([a-zA-Z0-9_]+)\s*;").expect("valid regex"),
            function: Regex::new(r"\b(ar_[a-zA-Z0-9]+__[a-zA-Z0-9_]+)\s*\(").expect("valid regex"),
            simple_typedef: Regex::new(r"(?m)^typedef\s+\w+\s+(\w+);").expect("valid regex"),
            typedef_struct: Regex::new(r"typedef\s+struct\s+\w+\s+(\w+);").expect("valid regex"),
            zig_aggregate: Regex::new(
                r"(?:pub\s+)?const\s+([a-zA-Z0-9_]+)\s*=\s*(?:struct\s*\{|enum\s*\{|union)",
            )
            .expect("valid regex"),
            zig_fn: Regex::new(r"pub\s+(?:inline\s+)?fn\s+([a-zA-Z0-9_]+)\s*\(")
                .expect("valid regex"),
        }
    }
}

/// Scan every source declaration file under `root/<source_dir>` once and
/// build the symbol table. Files that cannot be read are skipped; a file
/// contributing zero declarations is not an error. Duplicate names across
/// files collapse silently.
pub fn build(root: &Path, source_dir: &str) -> SymbolTable {
    let patterns = DeclarationPatterns::compile();
    let mut table = SymbolTable {
        functions: HashSet::new(),
        modules: HashSet::new(),
        types: HashSet::new(),
    };

    let Ok(entries) = std::fs::read_dir(root.join(source_dir)) else {
        return table;
    };

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !matches!(ext, "h" | "c" | "zig") {
            continue;
        }

        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };

        collect_module_stem(&path, &mut table);
        collect_c_declarations(&content, &patterns, &mut table);
        if ext == "zig" {
            collect_zig_declarations(&path, &content, &patterns, &mut table);
        }
    }

    table
}

/// Register a non-test `ar_*` file stem as a valid module name.
fn collect_module_stem(path: &Path, table: &mut SymbolTable) {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return;
    };
    if stem.starts_with("ar_") && !stem.contains("_tests") {
        table.modules.insert(stem.to_string());
    }
}

/// Extract C-dialect functions and types. Also applies to Zig files, which
/// may embed exported C-compatible declarations.
fn collect_c_declarations(content: &str, patterns: &DeclarationPatterns, table: &mut SymbolTable) {
    for cap in patterns.function.captures_iter(content) {
        if let Some(name) = cap.get(1) {
            table.functions.insert(name.as_str().to_string());
        }
    }
    for pattern in [
        &patterns.typedef_struct,
        &patterns.aggregate_close,
        &patterns.simple_typedef,
    ] {
        for cap in pattern.captures_iter(content) {
            if let Some(name) = cap.get(1) {
                table.types.insert(name.as_str().to_string());
            }
        }
    }
}

/// Extract Zig-dialect public functions and aggregate types. Each function
/// is registered under both its bare name and `<file-stem>.<name>` so that
/// dotted call syntax in documentation resolves.
fn collect_zig_declarations(
    path: &Path,
    content: &str,
    patterns: &DeclarationPatterns,
    table: &mut SymbolTable,
) {
    let module = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

    for cap in patterns.zig_fn.captures_iter(content) {
        if let Some(name) = cap.get(1) {
            table.functions.insert(name.as_str().to_string());
            table.functions.insert(format!("{module}.{}", name.as_str()));
        }
    }
    for cap in patterns.zig_aggregate.captures_iter(content) {
        if let Some(name) = cap.get(1) {
            table.types.insert(name.as_str().to_string());
        }
    }
}
