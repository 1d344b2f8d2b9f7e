fn main() {
    // Generated grammar sources live inside the crate (see `cargo xtask gen`):
    //   grammar/
    //     grammar.js
    //     scanner.c      (optional, hand-written)
    //     src/
    //       parser.c
    //       grammar.json
    //       node-types.json
    //       tree_sitter/* (generated headers)
    //
    // Without parser.c the crate still builds, but without a linked grammar:
    // `language()` returns `None` and the load check reports it.
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let grammar_dir = manifest_dir.join("grammar");
    let src_dir = grammar_dir.join("src");
    let parser = src_dir.join("parser.c");

    println!("cargo:rustc-check-cfg=cfg(modelica_parser)");
    println!("cargo:rustc-check-cfg=cfg(modelica_node_types)");
    println!("cargo:rerun-if-changed={}", parser.display());
    println!("cargo:rerun-if-changed={}", src_dir.join("node-types.json").display());

    if !parser.exists() {
        println!(
            "cargo:warning=arborium-modelica: {} not found, building without a linked Modelica grammar (run `cargo xtask gen`)",
            parser.display()
        );
        return;
    }

    // Upstream keeps the scanner next to parser.c; arborium keeps it one level up.
    let scanner = [grammar_dir.join("scanner.c"), src_dir.join("scanner.c")]
        .into_iter()
        .find(|path| path.exists());

    let mut build = cc::Build::new();

    build
        .include(&src_dir)
        .include(&grammar_dir)
        .include(src_dir.join("tree_sitter"))
        .std("c11")
        .warnings(false)
        .flag_if_supported("-Wno-unused-parameter")
        .flag_if_supported("-Wno-unused-but-set-variable")
        .flag_if_supported("-Wno-trigraphs");

    // For WASM builds, use the arborium sysroot (exported via `links = "arborium"`)
    let target = std::env::var("TARGET").unwrap_or_default();
    if target.contains("wasm")
        && let Ok(sysroot) = std::env::var("DEP_ARBORIUM_SYSROOT_PATH")
    {
        build.include(&sysroot);
    }

    build.file(&parser);
    if let Some(scanner) = &scanner {
        println!("cargo:rerun-if-changed={}", scanner.display());
        build.file(scanner);
    }

    build.compile("tree_sitter_modelica");

    println!("cargo:rustc-cfg=modelica_parser");
    if src_dir.join("node-types.json").exists() {
        println!("cargo:rustc-cfg=modelica_node_types");
    }
}
