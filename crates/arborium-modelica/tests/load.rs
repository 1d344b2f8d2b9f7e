//! Grammar load checks.
//!
//! Exercises the load check end to end through the public API, with the linked
//! grammar and with providers that have nothing to offer.

use arborium_modelica::{
    FnGrammar, GrammarProvider, InstalledGrammar, LinkedGrammar, LoadFailureCause, LoaderConfig,
    SharedLibraryGrammar, check_grammar_loads, check_modelica_grammar, library_file_name,
};

/// Outcome of a check, reduced to something comparable.
fn outcome<P: GrammarProvider>(provider: &P) -> Result<usize, String> {
    check_grammar_loads(provider)
        .map(|descriptor| descriptor.abi_version())
        .map_err(|failure| failure.to_string())
}

#[test]
fn test_can_load_grammar() {
    let descriptor = check_grammar_loads(&LinkedGrammar).expect("Error loading Modelica grammar");
    assert!(descriptor.is_abi_compatible());
    assert_eq!(check_modelica_grammar().ok(), Some(descriptor));
}

#[test]
fn present_provider_passes_the_check() {
    let provider = FnGrammar::new("Modelica", || LinkedGrammar.language());
    assert!(check_grammar_loads(&provider).is_ok());
}

#[test]
fn linked_grammar_parses_a_model() {
    let descriptor = check_modelica_grammar().expect("Error loading Modelica grammar");
    let mut parser = descriptor.parser().expect("parser accepts the grammar");
    let tree = parser
        .parse("model M\n  Real x;\nequation\n  der(x) = -x;\nend M;\n", None)
        .expect("parse tree");

    let root = tree.root_node();
    assert_eq!(root.kind(), "StoredDefinition");
    assert!(!root.has_error(), "{}", root.to_sexp());
}

#[test]
fn linked_grammar_handles_control_flow() {
    let source = r#"
within Library;
// equations and algorithms
model Controller "PI controller"
  parameter Real k(min = 0) = 2;
  Real e, u;
  Boolean on;
initial equation
  u = 0;
equation
  if on then
    e = 1 - u;
  elseif u > 1 then
    e = 0;
  else
    e = -u;
  end if;
  when sample(0, 0.1) then
    on = not pre(on);
  elsewhen terminal() then
    on = false;
  end when;
algorithm
  for i in 1:3 loop
    u := u + k * e / i;
  end for;
end Controller;
"#;
    let descriptor = check_modelica_grammar().expect("Error loading Modelica grammar");
    let mut parser = descriptor.parser().expect("parser accepts the grammar");
    let tree = parser.parse(source, None).expect("parse tree");

    let root = tree.root_node();
    assert!(!root.has_error(), "{}", root.to_sexp());
    assert!(root.child_by_field_name("withinClause").is_some());
    let sexp = root.to_sexp();
    for kind in [
        "IfEquation",
        "WhenEquation",
        "ForStatement",
        "LINE_COMMENT",
    ] {
        assert!(sexp.contains(kind), "missing {kind} in {sexp}");
    }
}

#[test]
fn broken_model_still_yields_a_tree() {
    let descriptor = check_modelica_grammar().expect("Error loading Modelica grammar");
    let mut parser = descriptor.parser().expect("parser accepts the grammar");
    let tree = parser
        .parse("model Broken\n  Real x = ;\nend Broken;\n", None)
        .expect("parse tree");

    let root = tree.root_node();
    assert_eq!(root.kind(), "StoredDefinition");
    assert!(root.has_error());
}

#[test]
fn missing_provider_reports_modelica_failure() {
    let provider = FnGrammar::new("Modelica", || None);

    let failure = check_grammar_loads(&provider).unwrap_err();
    assert_eq!(failure.to_string(), "Error loading Modelica grammar");
    assert!(matches!(failure.cause(), LoadFailureCause::Missing));
}

#[test]
fn missing_library_reports_modelica_failure() {
    let dir = tempfile::tempdir().unwrap();
    let provider = SharedLibraryGrammar::new(dir.path().join(library_file_name("modelica")));

    let failure = check_grammar_loads(&provider).unwrap_err();
    assert!(
        failure.to_string().contains("Error loading Modelica grammar"),
        "{failure}"
    );
}

#[test]
fn absent_grammar_without_library_fails() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FnGrammar::new("Modelica", || None).or(InstalledGrammar::new(
        LoaderConfig::default().with_search_path(dir.path()),
    ));

    let failure = check_grammar_loads(&provider).unwrap_err();
    assert_eq!(failure.to_string(), "Error loading Modelica grammar");
}

#[test]
fn linked_grammar_does_not_need_a_library() {
    let dir = tempfile::tempdir().unwrap();
    let provider = LinkedGrammar.or(InstalledGrammar::new(
        LoaderConfig::default().with_search_path(dir.path()),
    ));

    assert!(check_grammar_loads(&provider).is_ok());
}

#[test]
fn check_is_idempotent() {
    let absent = FnGrammar::new("Modelica", || None);
    assert_eq!(outcome(&absent), outcome(&absent));

    let first = check_grammar_loads(&LinkedGrammar).expect("first check");
    let second = check_grammar_loads(&LinkedGrammar).expect("second check");
    assert_eq!(first, second);
    assert_eq!(outcome(&LinkedGrammar), Ok(first.abi_version()));
}
