// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use codespan_reporting::term::termcolor::Buffer;
use glob;
use kore_gen::definition::Definition;
use kore_gen::generator::{
    run_kore_gen_with_writer, write_outputs, Generated, GeneratorOptions, DEFINITION_FILE,
    MACROS_FILE, SPEC_FILE, SYNTAX_FILE,
};
use std::path::{Path, PathBuf};

/// Translates the definition at `path`, returning the generated theories and the rendered
/// diagnostics.
fn generate(path: &Path) -> (Generated, String) {
    let definition = Definition::from_file(path).unwrap();
    let mut error_buffer = Buffer::no_color();
    let generated =
        run_kore_gen_with_writer(&definition, &mut error_buffer, &GeneratorOptions::default())
            .unwrap_or_else(|err| panic!("{}: {:?}", path.display(), err));
    let report = String::from_utf8_lossy(&error_buffer.into_inner()).to_string();
    (generated, report)
}

fn render(generated: &Generated, report: &str) -> String {
    let mut files = vec![
        (DEFINITION_FILE, &generated.output.semantics),
        (SYNTAX_FILE, &generated.output.syntax),
        (MACROS_FILE, &generated.output.macros),
    ];
    if let Some(spec) = &generated.spec {
        files.push((SPEC_FILE, spec));
    }
    let mut out = String::new();
    for (name, text) in files {
        out.push_str(&format!("==> {} <==\n{}", name, text));
    }
    if !report.is_empty() {
        out.push_str(&format!("==> diagnostics <==\n{}", report));
    }
    out
}

fn inputs(pattern: &str) -> Vec<PathBuf> {
    let mut paths = glob::glob(pattern)
        .expect("Invalid glob pattern")
        .map(|entry| entry.expect("Failed to read file path"))
        .collect::<Vec<_>>();
    paths.sort();
    assert!(!paths.is_empty(), "no inputs match {}", pattern);
    paths
}

fn last_line(text: &str) -> &str {
    text.lines().last().unwrap_or_default()
}

#[test]
fn run_signature_tests() {
    for path in inputs("tests/inputs/signature/*.json") {
        let (generated, report) = generate(&path);
        let output = render(&generated, &report);
        let filename = path.file_name().unwrap().to_string_lossy().to_string();

        insta::with_settings!({
            prepend_module_to_snapshot => false,
            snapshot_path => "snapshots",
        }, {
            insta::assert_snapshot!(filename, output);
        });
    }
}

#[test]
fn every_input_translates_to_well_formed_theories() {
    for path in inputs("tests/inputs/**/*.json") {
        let definition = Definition::from_file(&path).unwrap();
        let (generated, _) = generate(&path);

        let semantics = &generated.output.semantics;
        assert!(semantics.starts_with("[topCellInitializer{}("), "{}", path.display());
        assert!(semantics.contains(&format!("\nmodule {}\n", definition.module.name)));
        assert!(semantics.contains("\n// generated axioms\n"));
        assert!(semantics.contains("\n// rules\n"));
        assert!(last_line(semantics).starts_with("endmodule ["));

        let syntax = &generated.output.syntax;
        assert!(syntax.contains("\n// symbols\n"));
        assert!(!syntax.contains("// rules"));
        assert!(last_line(syntax).starts_with("endmodule ["));

        assert!(generated.output.macros.starts_with("// macros\n"));

        match (&definition.spec_module, &generated.spec) {
            (Some(spec_module), Some(spec)) => {
                assert!(spec.contains(&format!("\nmodule {}\n", spec_module.name)));
                assert!(spec.contains("\n// claims\n"));
                assert!(last_line(spec).starts_with("endmodule ["));
            }
            (None, None) => {}
            _ => panic!("{}: specification module not translated", path.display()),
        }

        let (again, _) = generate(&path);
        assert_eq!(generated, again, "{} translates nondeterministically", path.display());
    }
}

#[test]
fn rules_and_claims_are_translated() {
    let (generated, report) = generate(Path::new("tests/inputs/imp-lite.json"));
    assert!(report.is_empty(), "{}", report);

    let semantics = &generated.output.semantics;
    assert!(semantics.starts_with(
        "[topCellInitializer{}(Lblinit{}()), source{}(\"imp-lite.k\")]\n"
    ));
    assert!(semantics.contains("  symbol Lblf{}(SortInt{}) : SortInt{} [function{}()"));
    assert_eq!(semantics.matches("\n// rule ").count(), 3);
    assert!(semantics.contains("\n// rule a() => b() [priority(\"10\")]\n  axiom{} \\rewrites{SortGeneratedTopCell{}}("));
    assert!(semantics.contains("  axiom{R} \\implies{R}("));
    assert!(!semantics.contains("digest{}"));

    let spec = generated.spec.unwrap();
    assert!(spec.starts_with("[source{}(\"imp-lite-spec.k\")]\nmodule IMP-LITE-SPEC\n"));
    assert!(spec.contains("\nimport IMP-LITE []\n"));
    assert!(spec.contains("// claim a() => b() [label(\"imp.claim\")]\n  claim{} "));
    assert_eq!(last_line(&spec), "endmodule [source{}(\"imp-lite-spec.k\")]");
}

#[test]
fn outputs_are_written_next_to_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let (generated, _) = generate(Path::new("tests/inputs/imp-lite.json"));
    let written = write_outputs(dir.path(), &generated).unwrap();
    assert_eq!(written.len(), 4);
    for path in &written {
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());
    }
    let spec = std::fs::read_to_string(dir.path().join(SPEC_FILE)).unwrap();
    assert_eq!(Some(spec), generated.spec);
}
