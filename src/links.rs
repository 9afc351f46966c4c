//! Relative link-path resolution and containment checking.
//!
//! Every markdown link, image, and reference-style target is resolved
//! against the containing document's directory without touching symlinks:
//! normalization is purely lexical, and a resolved path that climbs out
//! of the repository root is rejected outright.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::report::Report;
use crate::scanner::Scan;
use crate::types::{Category, Diagnostic, Document, Severity};

/// Resolve every link extracted from one document.
pub fn resolve_links(root: &Path, doc: &Document, scan: &Scan, report: &mut Report) {
    for link in &scan.links {
        check_target(root, doc, link.line, &link.target, report);
    }

    // Reference-style links: validate each definition's target once, then
    // each usage only for definedness.
    let mut definitions: HashSet<&str> = HashSet::new();
    for definition in &scan.link_definitions {
        definitions.insert(definition.label.as_str());
        check_target(root, doc, definition.line, &definition.target, report);
    }

    for usage in &scan.link_usages {
        if !definitions.contains(usage.label.as_str()) {
            push_error(report, doc, usage.line, format!(
                "undefined link reference '[{}]'",
                usage.label
            ));
        }
    }
}

/// Validate one link target string.
fn check_target(root: &Path, doc: &Document, line: u32, target: &str, report: &mut Report) {
    // External and intra-document targets are out of scope.
    if target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with("mailto:")
        || target.starts_with('#')
    {
        return;
    }

    let path_part = target.split_once('#').map_or(target, |(path, _)| path);
    if path_part.is_empty() {
        return;
    }

    if path_part.contains('\\') {
        push_error(report, doc, line, format!(
            "link target uses backslash separators: {path_part}"
        ));
        return;
    }

    if path_part.contains(' ') {
        report.push(Diagnostic {
            category: Category::Link,
            document: doc.path.clone(),
            line,
            message: format!("link target contains unescaped spaces: {path_part}"),
            severity: Severity::Warning,
        });
    }

    // Absolute targets are host-filesystem paths, never portable.
    if path_part.starts_with('/') {
        push_error(report, doc, line, format!(
            "absolute link target: {path_part} (links must be repository-relative)"
        ));
        return;
    }

    let doc_dir = doc.path.parent().unwrap_or_else(|| Path::new(""));
    let resolved = normalize_path(&doc_dir.join(path_part));

    // Containment is checked before the extension skip: an escaping target
    // is wrong even when it names a directory or extensionless file.
    if resolved.components().next() == Some(Component::ParentDir) {
        push_error(report, doc, line, format!(
            "link target escapes the repository root: {path_part}"
        ));
        return;
    }

    // Targets without an extension in the final segment are treated as
    // non-file anchors (directories, bare slugs).
    if Path::new(path_part).extension().is_none() {
        return;
    }

    if !root.join(&resolved).is_file() {
        push_error(report, doc, line, format!(
            "broken link: {path_part} (resolved to {})",
            resolved.display()
        ));
    }
}

/// Collapse `.` and `..` components in a path without touching the
/// filesystem. Preserves leading `..` when there is nothing left to pop,
/// which is what the containment check looks for.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let can_pop = matches!(
                    components.last(),
                    Some(c) if !matches!(c, Component::ParentDir)
                );
                if can_pop {
                    components.pop();
                } else {
                    components.push(component);
                }
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Record one broken link as an error diagnostic.
fn push_error(report: &mut Report, doc: &Document, line: u32, message: String) {
    report.push(Diagnostic {
        category: Category::Link,
        document: doc.path.clone(),
        line,
        message,
        severity: Severity::Error,
    });
}
