//! Documentation corpus enumeration.

use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::types::Document;

/// Enumerate and read all markdown files under `root`, excluding configured
/// filenames and skipped directories. Results are sorted by path so report
/// output is deterministic. Unreadable files are skipped, never fatal.
pub fn load(root: &Path, config: &Config) -> Vec<Document> {
    let mut documents = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        !(entry.file_type().is_dir() && config.is_skipped_dir(&name))
    });

    for entry in walker.filter_map(Result::ok) {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if config.is_excluded_file(&name) {
            continue;
        }

        let Ok(content) = std::fs::read_to_string(path) else {
            continue;
        };

        let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        documents.push(Document::new(relative, &content));
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    documents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_from(files: &[(&str, &str)]) -> Vec<Document> {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
        let config = Config::load(dir.path()).unwrap();
        load(dir.path(), &config)
    }

    #[test]
    fn finds_markdown_and_skips_exclusions() {
        let docs = load_from(&[
            ("README.md", "# readme\n"),
            ("kb/guide.md", "# guide\n"),
            ("TODO.md", "# todo\n"),
            ("CHANGELOG.md", "# changelog\n"),
            ("notes.txt", "not markdown\n"),
        ]);

        let paths: Vec<String> = docs
            .iter()
            .map(|d| d.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, vec!["README.md", "kb/guide.md"]);
    }

    #[test]
    fn skips_bin_directories() {
        let docs = load_from(&[("bin/generated.md", "# generated\n"), ("doc.md", "x\n")]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path.to_string_lossy(), "doc.md");
    }

    #[test]
    fn output_is_sorted() {
        let docs = load_from(&[("z.md", "z\n"), ("a.md", "a\n"), ("m/b.md", "b\n")]);
        let paths: Vec<String> = docs
            .iter()
            .map(|d| d.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, vec!["a.md", "m/b.md", "z.md"]);
    }
}
