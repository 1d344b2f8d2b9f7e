//! Regenerate the Modelica parser from `grammar/grammar.js`.
//!
//! Runs `tree-sitter generate` inside the crate's `grammar/` directory, which
//! writes straight into `grammar/src/`, the layout `build.rs` compiles:
//!
//! ```text
//! grammar/grammar.js            (input)
//! grammar/src/parser.c
//! grammar/src/grammar.json
//! grammar/src/node-types.json
//! grammar/src/tree_sitter/*.h
//! ```

use std::process::Stdio;

use camino::{Utf8Path, Utf8PathBuf};
use miette::{IntoDiagnostic, Result};
use owo_colors::OwoColorize;

use crate::tool::Tool;

/// Files `tree-sitter generate` must leave behind, relative to `grammar/`.
const OUTPUTS: &[&str] = &[
    "src/parser.c",
    "src/grammar.json",
    "src/node-types.json",
    "src/tree_sitter/parser.h",
];

/// Where generation reads from and writes to.
struct GeneratePlan {
    grammar_dir: Utf8PathBuf,
    outputs: Vec<Utf8PathBuf>,
}

fn plan(crate_dir: &Utf8Path) -> Result<GeneratePlan> {
    let grammar_dir = crate_dir.join("grammar");
    let grammar_js = grammar_dir.join("grammar.js");
    if !grammar_js.is_file() {
        return Err(miette::miette!(
            help = "the grammar definition lives in grammar/grammar.js",
            "{grammar_js} is missing"
        ));
    }

    let outputs = OUTPUTS.iter().map(|file| grammar_dir.join(file)).collect();
    Ok(GeneratePlan {
        grammar_dir,
        outputs,
    })
}

fn missing_outputs(plan: &GeneratePlan) -> Vec<&Utf8Path> {
    plan.outputs
        .iter()
        .filter(|path| !path.is_file())
        .map(|path| path.as_path())
        .collect()
}

/// Generate the parser for the grammar crate at `crate_dir`.
pub fn generate(crate_dir: &Utf8Path, dry_run: bool) -> Result<()> {
    let plan = plan(crate_dir)?;
    println!(
        "{} Generating Modelica parser in {}",
        "●".cyan(),
        plan.grammar_dir.bold()
    );

    if dry_run {
        println!("  {} tree-sitter generate", "would run".yellow());
        for output in &plan.outputs {
            let relative = output.strip_prefix(crate_dir).unwrap_or(output.as_path());
            println!("  {} {}", "would write".yellow(), relative);
        }
        println!("{} Dry run, nothing written", "●".yellow());
        return Ok(());
    }

    let tree_sitter = Tool::TreeSitter.find().into_diagnostic()?;
    let output = tree_sitter
        .command()
        .arg("generate")
        .current_dir(&plan.grammar_dir)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .into_diagnostic()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_lines: Vec<&str> = stderr.lines().take(20).collect();
        return Err(miette::miette!(
            "tree-sitter generate failed for modelica:\n{}",
            error_lines.join("\n")
        ));
    }

    let missing = missing_outputs(&plan);
    if let Some(first) = missing.first() {
        return Err(miette::miette!(
            "tree-sitter generate finished but {first} was not written"
        ));
    }

    for output in &plan.outputs {
        let relative = output.strip_prefix(crate_dir).unwrap_or(output.as_path());
        tracing::debug!(file = %output, "generated");
        println!("  {} {}", "✓".green(), relative);
    }
    println!("{} Generated {} file(s)", "●".green(), plan.outputs.len());
    Ok(())
}
