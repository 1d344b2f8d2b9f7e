//! Test harness for arborium grammar crates.
//!
//! This crate provides utilities for checking that a grammar loads and parses
//! its samples.
//!
//! # Usage
//!
//! In your grammar crate's lib.rs tests:
//!
//! ```ignore
//! #[cfg(test)]
//! mod tests {
//!     use super::*;
//!
//!     #[test]
//!     fn test_grammar() {
//!         arborium_test_harness::test_grammar(
//!             language(),
//!             "Modelica",
//!             env!("CARGO_MANIFEST_DIR"),
//!         );
//!     }
//! }
//! ```

pub use tree_sitter_patched_arborium as tree_sitter;

use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser};

/// Tests a grammar by loading it and parsing all samples.
///
/// This function:
/// 1. Fails with `Error loading <name> grammar` if `language` is absent
/// 2. Installs the language into a parser (rejects incompatible ABI versions)
/// 3. Parses each sample listed in `arborium.kdl` and verifies the tree has no errors
///
/// # Arguments
///
/// * `language` - The tree-sitter Language, or `None` if the grammar provider had none
/// * `name` - The grammar display name (e.g., "Modelica")
/// * `crate_dir` - Path to the crate directory (use `env!("CARGO_MANIFEST_DIR")`)
///
/// # Panics
///
/// Panics if the language is missing or rejected, a sample can't be read, or a
/// sample parses with syntax errors.
pub fn test_grammar(language: Option<Language>, name: &str, crate_dir: &str) {
    let Some(language) = language else {
        panic!("Error loading {} grammar", name);
    };

    let mut parser = Parser::new();
    parser.set_language(&language).unwrap_or_else(|e| {
        panic!(
            "Error loading {} grammar: {}\n\
             The generated parser's ABI version is outside what this tree-sitter runtime supports.\n\
             Regenerate the grammar sources with a matching tree-sitter CLI.",
            name, e
        );
    });

    let samples = sample_paths(Path::new(crate_dir));
    if samples.is_empty() {
        // No samples - loading the language is all we can check
        return;
    }

    for sample_path in &samples {
        let sample_code = fs::read_to_string(sample_path).unwrap_or_else(|e| {
            panic!(
                "Failed to read sample file {} for {}: {}",
                sample_path.display(),
                name,
                e
            );
        });

        let tree = parser
            .parse(sample_code.as_bytes(), None)
            .unwrap_or_else(|| {
                panic!(
                    "Parsing {} for {} returned no tree",
                    sample_path.display(),
                    name
                );
            });

        let root = tree.root_node();
        if root.has_error() {
            let position = first_error(root)
                .map(|node| node.start_position())
                .unwrap_or_else(|| root.start_position());
            panic!(
                "Syntax errors in {} for {} (first at line {}, column {}).\n\
                 Sample has {} bytes.\n\
                 {}",
                sample_path.display(),
                name,
                position.row + 1,
                position.column + 1,
                sample_code.len(),
                root.to_sexp()
            );
        }
    }
}

/// Sample files declared in `<crate_dir>/arborium.kdl`, resolved against `crate_dir`.
///
/// Returns an empty list if the file is missing or declares no samples.
pub fn sample_paths(crate_dir: &Path) -> Vec<PathBuf> {
    let kdl_path = crate_dir.join("arborium.kdl");
    match fs::read_to_string(&kdl_path) {
        Ok(content) => parse_samples_from_kdl(&content)
            .into_iter()
            .map(|p| crate_dir.join(p))
            .collect(),
        Err(_) => vec![],
    }
}

/// Finds the first ERROR or MISSING node in document order.
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error);
    found
}

/// Extracts `path "..."` values from `sample { ... }` blocks.
///
/// Handles both multi-line blocks and the single-line `sample { path "x" }` form.
fn parse_samples_from_kdl(content: &str) -> Vec<String> {
    let mut samples = Vec::new();
    let mut depth = 0usize;
    let mut sample_depth = None;

    for line in content.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();

        if sample_depth.is_none() && line.starts_with("sample") && line.contains('{') {
            sample_depth = Some(depth);
        }

        if sample_depth.is_some()
            && let Some(value) = path_value(line)
        {
            samples.push(value.to_string());
        }

        depth += line.matches('{').count();
        depth = depth.saturating_sub(line.matches('}').count());

        if sample_depth.is_some_and(|start| depth <= start) {
            sample_depth = None;
        }
    }

    samples
}

/// The quoted argument of a `path` node on this line, if any.
fn path_value(line: &str) -> Option<&str> {
    let at = if line.starts_with("path ") {
        0
    } else {
        line.find(" path ")? + 1
    };
    let rest = &line[at + "path ".len()..];
    let start = rest.find('"')? + 1;
    let end = start + rest[start..].find('"')?;
    let value = &rest[start..end];
    (!value.is_empty()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_in_multiline_blocks() {
        let kdl = r#"
repo "https://example.com/tree-sitter-modelica"

grammar {
    id "modelica"

    sample {
        path "samples/example.mo"
        description "first"
    }

    sample {
        // path "samples/commented.mo"
        path "samples/second.mo"
    }
}
"#;
        assert_eq!(
            parse_samples_from_kdl(kdl),
            vec!["samples/example.mo", "samples/second.mo"]
        );
    }

    #[test]
    fn samples_in_single_line_blocks() {
        let kdl = "grammar {\n    sample { path \"a.mo\" }\n    sample { path \"b.mo\"; description \"b\" }\n}\n";
        assert_eq!(parse_samples_from_kdl(kdl), vec!["a.mo", "b.mo"]);
    }

    #[test]
    fn paths_outside_samples_are_ignored() {
        let kdl = "grammar {\n    grammar-path \"modelica\"\n    path \"nope.mo\"\n}\nsample {\n    path \"\"\n}\n";
        assert!(parse_samples_from_kdl(kdl).is_empty());
    }

    #[test]
    fn sample_paths_resolve_against_crate_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("arborium.kdl"),
            "grammar {\n    sample {\n        path \"samples/x.mo\"\n    }\n}\n",
        )
        .unwrap();

        assert_eq!(
            sample_paths(dir.path()),
            vec![dir.path().join("samples/x.mo")]
        );
    }

    #[test]
    fn missing_kdl_means_no_samples() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sample_paths(dir.path()).is_empty());
    }

    #[test]
    #[should_panic(expected = "Error loading Example grammar")]
    fn missing_language_panics_with_grammar_name() {
        test_grammar(None, "Example", env!("CARGO_MANIFEST_DIR"));
    }
}
