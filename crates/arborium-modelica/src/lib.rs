//! MODELICA grammar for tree-sitter
//!
//! This crate provides the modelica language grammar for use with tree-sitter.
//!
//! The grammar lives in `grammar/grammar.js`; the parser generated from it
//! (`grammar/src/parser.c`, regenerated with `cargo xtask gen`) is compiled by
//! the build script. A checkout without generated sources still builds; the
//! grammar is then only reachable through a shared library (see
//! [`SharedLibraryGrammar`] and [`LoaderConfig`]), and
//! [`check_modelica_grammar`] reports `Error loading Modelica grammar` if
//! neither is available.
//!
//! ```
//! let descriptor = arborium_modelica::check_modelica_grammar()?;
//! let mut parser = descriptor.parser()?;
//! let tree = parser.parse("model M Real x; end M;", None).unwrap();
//! assert_eq!(tree.root_node().kind(), "StoredDefinition");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod check;
mod config;
mod descriptor;
mod library;
mod provider;

pub use check::{GrammarLoadFailure, LoadFailureCause, check_grammar_loads, check_modelica_grammar};
pub use config::{LIBRARY_ENV, LoaderConfig, SEARCH_PATH_ENV, library_file_name};
pub use descriptor::LanguageDescriptor;
pub use library::{InstalledGrammar, LibraryError, SharedLibraryGrammar};
pub use provider::{Fallback, FnGrammar, GrammarProvider, LinkedGrammar, modelica};

use tree_sitter_patched_arborium::Language;

/// Display name of the grammar.
pub const NAME: &str = "Modelica";

/// Grammar identifier, as used in file and crate names.
pub const GRAMMAR_ID: &str = "modelica";

/// C symbol of the generated language function.
pub const LANGUAGE_SYMBOL: &str = "tree_sitter_modelica";

#[cfg(modelica_parser)]
unsafe extern "C" {
    fn tree_sitter_modelica() -> *const tree_sitter_patched_arborium::ffi::TSLanguage;
}

/// Returns the modelica tree-sitter language, if the grammar was linked.
pub fn language() -> Option<Language> {
    LinkedGrammar.language().map(Language::from)
}

/// Whether the vendored parser was compiled into this build.
pub fn is_linked() -> bool {
    cfg!(modelica_parser)
}

/// The node-types.json of the linked grammar.
#[cfg(modelica_node_types)]
pub const NODE_TYPES: Option<&str> = Some(include_str!("../grammar/src/node-types.json"));

/// The node-types.json of the linked grammar (none vendored).
#[cfg(not(modelica_node_types))]
pub const NODE_TYPES: Option<&str> = None;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar() {
        arborium_test_harness::test_grammar(language(), NAME, env!("CARGO_MANIFEST_DIR"));
    }

    #[test]
    #[should_panic(expected = "Error loading Modelica grammar")]
    fn test_missing_grammar_fails() {
        arborium_test_harness::test_grammar(None, NAME, env!("CARGO_MANIFEST_DIR"));
    }

    #[test]
    fn grammar_is_linked_by_default() {
        assert!(is_linked());
        assert!(language().is_some());
        assert_eq!(language(), language());
    }

    #[test]
    fn node_types_describe_stored_definition() {
        let node_types = NODE_TYPES.expect("node-types.json is generated with the parser");
        assert!(node_types.contains("\"StoredDefinition\""));
    }
}
