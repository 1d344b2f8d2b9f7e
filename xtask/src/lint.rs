//! Lint the Modelica grammar crate layout.
//!
//! Checks `arborium.kdl` (grammar metadata and samples) and the generated
//! grammar sources that `build.rs` compiles.

use std::fs;

use camino::Utf8Path;
use miette::Result;
use owo_colors::OwoColorize;

use crate::util::GRAMMAR_ID;

/// Samples shorter than this are flagged as not very useful.
pub const MIN_SAMPLE_LINES: usize = 25;

pub struct LintOptions {
    /// Missing generated sources are errors instead of warnings.
    pub strict: bool,
}

/// A lint diagnostic.
#[derive(Debug, PartialEq, Eq)]
enum LintDiagnostic {
    Error(String),
    Warning(String),
}

/// Run all lints on the grammar crate.
pub fn run_lints(crate_dir: &Utf8Path, options: LintOptions) -> Result<()> {
    println!("{} {}", "Linting".cyan().bold(), crate_dir.bold());
    println!();

    let diagnostics = lint_crate(crate_dir, &options);

    let mut errors = 0;
    let mut warnings = 0;
    for diagnostic in &diagnostics {
        match diagnostic {
            LintDiagnostic::Error(msg) => {
                println!("  {} {}", "error:".red().bold(), msg);
                errors += 1;
            }
            LintDiagnostic::Warning(msg) => {
                println!("  {} {}", "warning:".yellow(), msg);
                warnings += 1;
            }
        }
    }

    println!();
    if errors > 0 {
        println!("{} {} error(s)", "✗".red(), errors);
    }
    if warnings > 0 {
        println!("{} {} warning(s)", "⚠".yellow(), warnings);
    }
    if errors == 0 && warnings == 0 {
        println!("{} Grammar crate is valid!", "✓".green());
    }

    if errors > 0 {
        return Err(miette::miette!("{errors} lint error(s)"));
    }
    Ok(())
}

fn lint_crate(crate_dir: &Utf8Path, options: &LintOptions) -> Vec<LintDiagnostic> {
    let mut diagnostics = Vec::new();

    match fs::read_to_string(crate_dir.join("arborium.kdl")) {
        Ok(kdl) => lint_metadata(crate_dir, &grammar_fields(&kdl), &mut diagnostics),
        Err(_) => diagnostics.push(LintDiagnostic::Error("missing arborium.kdl".to_string())),
    }

    let samples = arborium_test_harness::sample_paths(crate_dir.as_std_path());
    if samples.is_empty() {
        diagnostics.push(LintDiagnostic::Warning("no samples defined".to_string()));
    }
    for sample in &samples {
        let shown = sample
            .strip_prefix(crate_dir.as_std_path())
            .unwrap_or(sample.as_path())
            .display();
        match fs::read_to_string(sample) {
            Err(_) => diagnostics.push(LintDiagnostic::Error(format!(
                "sample '{shown}' does not exist"
            ))),
            Ok(text) if text.trim().is_empty() => diagnostics.push(LintDiagnostic::Error(
                format!("sample '{shown}' is empty"),
            )),
            Ok(text) if text.lines().count() < MIN_SAMPLE_LINES => {
                diagnostics.push(LintDiagnostic::Warning(format!(
                    "sample '{shown}' has only {} lines (minimum {MIN_SAMPLE_LINES} recommended)",
                    text.lines().count()
                )))
            }
            Ok(_) => {}
        }
    }

    let src_dir = crate_dir.join("grammar").join("src");
    if src_dir.join("parser.c").is_file() {
        if !src_dir.join("tree_sitter").join("parser.h").is_file() {
            diagnostics.push(LintDiagnostic::Error(
                "grammar/src/parser.c is present but grammar/src/tree_sitter/parser.h is missing"
                    .to_string(),
            ));
        }
        if !src_dir.join("node-types.json").is_file() {
            diagnostics.push(LintDiagnostic::Warning(
                "missing grammar/src/node-types.json".to_string(),
            ));
        }
    } else {
        let message = "missing grammar/src/parser.c (run `cargo xtask gen`)".to_string();
        diagnostics.push(if options.strict {
            LintDiagnostic::Error(message)
        } else {
            LintDiagnostic::Warning(message)
        });
    }

    diagnostics
}

/// Checks the `grammar { ... }` metadata against the crate contents.
fn lint_metadata(
    crate_dir: &Utf8Path,
    fields: &[(String, String)],
    diagnostics: &mut Vec<LintDiagnostic>,
) {
    let field = |key: &str| {
        fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    match field("id") {
        Some(GRAMMAR_ID) => {}
        Some(other) => diagnostics.push(LintDiagnostic::Error(format!(
            "grammar id is '{other}', expected '{GRAMMAR_ID}'"
        ))),
        None => diagnostics.push(LintDiagnostic::Error(
            "grammar: missing required field 'id'".to_string(),
        )),
    }
    if field("name").is_none() {
        diagnostics.push(LintDiagnostic::Error(
            "grammar: missing required field 'name'".to_string(),
        ));
    }

    let c_symbol = field("c-symbol").unwrap_or(GRAMMAR_ID);
    let parser = crate_dir.join("grammar").join("src").join("parser.c");
    if let Ok(source) = fs::read_to_string(&parser)
        && !source.contains(&format!("tree_sitter_{c_symbol}("))
    {
        diagnostics.push(LintDiagnostic::Error(format!(
            "grammar/src/parser.c does not define tree_sitter_{c_symbol}"
        )));
    }

    let has_scanner = field("has-scanner") == Some("true");
    let scanner_present = ["grammar/scanner.c", "grammar/src/scanner.c"]
        .iter()
        .any(|path| crate_dir.join(path).is_file());
    if has_scanner && !scanner_present {
        diagnostics.push(LintDiagnostic::Error(
            "has-scanner is true but grammar/scanner.c is missing".to_string(),
        ));
    }
    if !has_scanner && scanner_present {
        diagnostics.push(LintDiagnostic::Warning(
            "grammar/scanner.c exists but has-scanner is not set".to_string(),
        ));
    }

    if let Some(tier) = field("tier") {
        match tier.parse::<u8>() {
            Ok(1..=5) => {}
            _ => diagnostics.push(LintDiagnostic::Error(format!(
                "tier must be between 1 and 5, got {tier}"
            ))),
        }
    }
    if let Some(year) = field("year")
        && year.parse::<u16>().is_err()
    {
        diagnostics.push(LintDiagnostic::Error(format!(
            "year must be a number, got {year}"
        )));
    }

    for recommended in ["year", "description", "link"] {
        if field(recommended).is_none() {
            diagnostics.push(LintDiagnostic::Warning(format!(
                "grammar: missing recommended field '{recommended}'"
            )));
        }
    }
}

/// Top-level `key value` entries of the `grammar { ... }` block, with quotes
/// stripped. Nested blocks (samples) are skipped.
fn grammar_fields(content: &str) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    let mut depth = 0usize;
    let mut in_grammar = false;

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with("//") {
            continue;
        }

        if depth == 0 && line.starts_with("grammar") && line.contains('{') {
            in_grammar = true;
        } else if in_grammar
            && depth == 1
            && !line.contains('{')
            && let Some((key, value)) = line.split_once(char::is_whitespace)
        {
            fields.push((key.to_string(), value.trim().trim_matches('"').to_string()));
        }

        depth += line.matches('{').count();
        depth = depth.saturating_sub(line.matches('}').count());
        if depth == 0 {
            in_grammar = false;
        }
    }

    fields
}
