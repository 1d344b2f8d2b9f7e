//! Copy generated grammar sources from an upstream checkout into the crate.
//!
//! Upstream layout (`tree-sitter generate` output):
//!
//! ```text
//! src/parser.c
//! src/scanner.c            (optional)
//! src/node-types.json
//! src/grammar.json
//! src/tree_sitter/*.h
//! ```
//!
//! The scanner moves to `grammar/scanner.c`, everything else lands under
//! `grammar/src/`, which is where `build.rs` looks.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use owo_colors::OwoColorize;

/// One file to copy.
struct VendorFile {
    from: Utf8PathBuf,
    to: Utf8PathBuf,
    required: bool,
}

fn plan(source: &Utf8Path, crate_dir: &Utf8Path) -> Vec<VendorFile> {
    let src = source.join("src");
    let dest = crate_dir.join("grammar").join("src");

    let mut files = vec![VendorFile {
        from: src.join("parser.c"),
        to: dest.join("parser.c"),
        required: true,
    }];
    for name in ["node-types.json", "grammar.json"] {
        files.push(VendorFile {
            from: src.join(name),
            to: dest.join(name),
            required: false,
        });
    }
    for header in ["parser.h", "alloc.h", "array.h"] {
        files.push(VendorFile {
            from: src.join("tree_sitter").join(header),
            to: dest.join("tree_sitter").join(header),
            required: header == "parser.h",
        });
    }
    files.push(VendorFile {
        from: src.join("scanner.c"),
        to: crate_dir.join("grammar").join("scanner.c"),
        required: false,
    });
    files
}

/// Vendor the grammar found at `source` into `crate_dir`.
pub fn vendor(source: &Utf8Path, crate_dir: &Utf8Path, dry_run: bool) -> Result<()> {
    println!(
        "{} Vendoring Modelica grammar from {}",
        "●".cyan(),
        source.bold()
    );

    let files = plan(source, crate_dir);

    if let Some(missing) = files.iter().find(|f| f.required && !f.from.exists()) {
        return Err(miette::miette!(
            help = "run `tree-sitter generate` in the upstream checkout first",
            "required file {} is missing",
            missing.from
        ));
    }

    let mut copied = 0;
    for file in &files {
        if !file.from.exists() {
            println!("  {} {} {}", "-".dimmed(), file.from, "(not present)".dimmed());
            continue;
        }

        let relative = file.to.strip_prefix(crate_dir).unwrap_or(file.to.as_path());
        if dry_run {
            println!("  {} {} → {}", "would copy".yellow(), file.from, relative);
            continue;
        }

        if let Some(parent) = file.to.parent() {
            fs::create_dir_all(parent)
                .into_diagnostic()
                .wrap_err_with(|| format!("creating {parent}"))?;
        }
        fs::copy(&file.from, &file.to)
            .into_diagnostic()
            .wrap_err_with(|| format!("copying {} to {}", file.from, file.to))?;
        tracing::debug!(from = %file.from, to = %file.to, "vendored file");
        println!("  {} {}", "✓".green(), relative);
        copied += 1;
    }

    if dry_run {
        println!("{} Dry run, nothing written", "●".yellow());
    } else {
        println!("{} Copied {} file(s)", "●".green(), copied);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scanner_goes_next_to_grammar_src() {
        let files = plan(Utf8Path::new("/up"), Utf8Path::new("/crate"));
        let scanner = files
            .iter()
            .find(|f| f.from.as_str() == "/up/src/scanner.c")
            .unwrap();
        assert_eq!(scanner.to, Utf8PathBuf::from("/crate/grammar/scanner.c"));
        assert!(!scanner.required);
    }

    #[test]
    fn parser_and_header_are_required() {
        let files = plan(Utf8Path::new("/up"), Utf8Path::new("/crate"));
        let required: Vec<_> = files
            .iter()
            .filter(|f| f.required)
            .map(|f| f.to.as_str())
            .collect();
        assert_eq!(
            required,
            vec![
                "/crate/grammar/src/parser.c",
                "/crate/grammar/src/tree_sitter/parser.h"
            ]
        );
    }
}
