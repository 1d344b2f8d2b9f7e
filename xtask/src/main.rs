//! xtask for arborium-modelica - development tasks
//!
//! Usage: `cargo xtask <command>`
//!
//! Commands:
//! - `gen` - Regenerate grammar/src/ from grammar/grammar.js (tree-sitter generate)
//! - `lint` - Validate the grammar crate (config, samples, generated sources)
//! - `vendor <dir>` - Copy generated grammar sources from a tree-sitter-modelica checkout

mod generate;
mod lint;
mod tool;
mod util;
mod vendor;

use facet::Facet;
use facet_args as args;

/// arborium-modelica development tasks
#[derive(Debug, Facet)]
struct Args {
    #[facet(args::subcommand)]
    command: Command,
}

/// Available commands
#[derive(Debug, Facet)]
#[repr(u8)]
#[allow(dead_code)] // variants used by facet_args derive
enum Command {
    /// Print version information
    Version,

    /// Regenerate the parser from grammar/grammar.js with the tree-sitter CLI
    Gen {
        /// Show what would be generated without running tree-sitter
        #[facet(args::named, default)]
        dry_run: bool,
    },

    /// Validate the grammar crate layout
    Lint {
        /// Strict mode: missing generated files (parser.c) are errors.
        /// Without this flag, they're warnings (useful before running gen).
        #[facet(args::named, default)]
        strict: bool,
    },

    /// Copy generated grammar sources (parser.c, headers, node-types.json,
    /// scanner.c) from an upstream tree-sitter-modelica checkout
    Vendor {
        /// Path to the upstream checkout (after `tree-sitter generate`)
        #[facet(args::positional)]
        source: String,

        /// Show what would be copied without writing anything
        #[facet(args::named, default)]
        dry_run: bool,
    },
}

fn main() {
    // Install Miette's graphical error handler for nice CLI diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().build())
    }))
    .ok();

    // Initialize tracing subscriber for structured logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Args = facet_args::from_std_args().unwrap_or_else(|e| {
        eprintln!("{:?}", miette::Report::new(e));
        std::process::exit(1);
    });

    // Handle version early - doesn't need repo root
    if matches!(args.command, Command::Version) {
        println!("arborium-modelica-xtask {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let repo_root = util::find_repo_root().expect("Could not find repo root");
    let crate_dir = util::grammar_crate_dir(&repo_root);

    let result = match args.command {
        Command::Version => unreachable!(),
        Command::Gen { dry_run } => {
            if !dry_run && !tool::check_tools_or_report(tool::GEN_TOOLS) {
                std::process::exit(1);
            }
            generate::generate(&crate_dir, dry_run).and_then(|()| {
                if dry_run {
                    return Ok(());
                }
                println!();
                lint::run_lints(&crate_dir, lint::LintOptions { strict: true })
            })
        }
        Command::Lint { strict } => lint::run_lints(&crate_dir, lint::LintOptions { strict }),
        Command::Vendor { source, dry_run } => {
            let source = camino::Utf8PathBuf::from(source);
            vendor::vendor(&source, &crate_dir, dry_run).and_then(|()| {
                if dry_run {
                    return Ok(());
                }
                println!();
                lint::run_lints(&crate_dir, lint::LintOptions { strict: true })
            })
        }
    };

    if let Err(e) = result {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }
}
