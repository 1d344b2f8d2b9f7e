//! Shared utilities for xtask commands

use std::env;
use std::fs;

use camino::Utf8PathBuf;

/// Find the repository root by looking for Cargo.toml with [workspace]
pub fn find_repo_root() -> Option<Utf8PathBuf> {
    let cwd = Utf8PathBuf::from_path_buf(env::current_dir().ok()?).ok()?;

    cwd.ancestors()
        .find(|dir| {
            fs::read_to_string(dir.join("Cargo.toml"))
                .is_ok_and(|contents| contents.contains("[workspace]"))
        })
        .map(|dir| dir.to_path_buf())
}

/// Grammar id, as declared in `arborium.kdl` and used in `tree_sitter_<id>`.
pub const GRAMMAR_ID: &str = "modelica";

/// Directory of the Modelica grammar crate.
pub fn grammar_crate_dir(repo_root: &camino::Utf8Path) -> Utf8PathBuf {
    repo_root.join("crates").join(format!("arborium-{GRAMMAR_ID}"))
}
