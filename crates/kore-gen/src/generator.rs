// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::definition::Definition;
use anyhow::{anyhow, Context};
use codespan_reporting::{
    diagnostic::Severity,
    term::termcolor::{ColorChoice, StandardStream, WriteColor},
};
use k_model::{ModuleIndex, SentenceType};
use kore_backend::{DiagnosticCollector, KoreOutput, ModuleToKore, TranslationOptions};
use log::{debug, info};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

pub const DEFINITION_FILE: &str = "definition.kore";
pub const SYNTAX_FILE: &str = "syntaxDefinition.kore";
pub const MACROS_FILE: &str = "macros.kore";
pub const SPEC_FILE: &str = "spec.kore";

/// Everything generated for one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub output: KoreOutput,
    /// The specification module, when the definition carries one.
    pub spec: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub translation: TranslationOptions,
    /// Modality of claims in a specification module that does not choose one.
    pub spec_sentence_type: SentenceType,
    /// Least severity of the diagnostics reported.
    pub report_severity: Severity,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            translation: TranslationOptions::default(),
            spec_sentence_type: SentenceType::OnePath,
            report_severity: Severity::Warning,
        }
    }
}

pub fn run_kore_gen(definition: &Definition, options: &GeneratorOptions) -> anyhow::Result<Generated> {
    let mut error_writer = StandardStream::stderr(ColorChoice::Auto);

    run_kore_gen_with_writer(definition, &mut error_writer, options)
}

/// Translate `definition`, reporting diagnostics to `error_writer`.
pub fn run_kore_gen_with_writer<W: WriteColor>(
    definition: &Definition,
    error_writer: &mut W,
    options: &GeneratorOptions,
) -> anyhow::Result<Generated> {
    let now = Instant::now();
    let index = ModuleIndex::new(&definition.module);
    let diagnostics = DiagnosticCollector::new();
    let translator = ModuleToKore::new(
        &index,
        definition.top_cell_initializer.clone(),
        &options.translation,
    )
    .with_diagnostics(&diagnostics);

    let output = translator
        .convert(&definition.prelude)
        .with_context(|| format!("while translating module {}", definition.module.name))?;
    let spec = definition
        .spec_module
        .as_ref()
        .map(|spec| {
            translator
                .convert_specification_module(&definition.module, spec, options.spec_sentence_type)
                .with_context(|| format!("while translating specification module {}", spec.name))
        })
        .transpose()?;
    info!("{:.3}s translation", now.elapsed().as_secs_f64());

    diagnostics.emit(error_writer, options.report_severity)?;
    if diagnostics.has_errors() {
        return Err(anyhow!("exiting with translation errors"));
    }
    Ok(Generated { output, spec })
}

/// Write the generated theories to `output_dir`, returning the paths written.
pub fn write_outputs(output_dir: &Path, generated: &Generated) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory `{}`", output_dir.display()))?;
    let mut files = vec![
        (DEFINITION_FILE, &generated.output.semantics),
        (SYNTAX_FILE, &generated.output.syntax),
        (MACROS_FILE, &generated.output.macros),
    ];
    if let Some(spec) = &generated.spec {
        files.push((SPEC_FILE, spec));
    }
    let mut written = vec![];
    for (name, text) in files {
        let path = output_dir.join(name);
        fs::write(&path, text).with_context(|| format!("cannot write `{}`", path.display()))?;
        debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::Buffer;
    use k_model::{Att, AttKey, KLabel, Module, Production, ProductionItem, Rule, Sort, K};

    fn definition() -> Definition {
        let int = Sort::new("Int");
        let mut module = Module::new("ID");
        module.productions = vec![Production::new(
            Some(KLabel::new("id")),
            int.clone(),
            vec![ProductionItem::NonTerminal { sort: int.clone() }],
            Att::new().add_flag(AttKey::Function),
        )];
        let x = K::var_sorted("X", int);
        let mut spec = Module::new("ID-SPEC");
        spec.rules = vec![Rule::claim(
            K::rewrite(K::apply(KLabel::new("id"), vec![x.clone()]), x),
            K::bool_true(),
            K::bool_true(),
            Att::new(),
        )];
        Definition {
            module,
            top_cell_initializer: KLabel::new("init"),
            prelude: String::new(),
            spec_module: Some(spec),
        }
    }

    #[test]
    fn reports_functional_claims() {
        let mut buffer = Buffer::no_color();
        let generated =
            run_kore_gen_with_writer(&definition(), &mut buffer, &GeneratorOptions::default()).unwrap();
        let report = String::from_utf8_lossy(&buffer.into_inner()).to_string();
        assert!(report.contains("warning: Functional claims not yet supported."));
        let spec = generated.spec.unwrap();
        assert!(spec.contains("  claim{R} \\implies{R}(\\top{R}(), \\equals{SortInt{}, R}("));
    }

    #[test]
    fn writes_one_file_per_stream() {
        let dir = tempfile::tempdir().unwrap();
        let generated = run_kore_gen_with_writer(
            &definition(),
            &mut Buffer::no_color(),
            &GeneratorOptions::default(),
        )
        .unwrap();
        let written = write_outputs(dir.path(), &generated).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![DEFINITION_FILE, SYNTAX_FILE, MACROS_FILE, SPEC_FILE]);
        let semantics = fs::read_to_string(dir.path().join(DEFINITION_FILE)).unwrap();
        assert_eq!(semantics, generated.output.semantics);
    }
}
