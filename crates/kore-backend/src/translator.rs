// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation of a whole module into the syntax, semantics and macro theories.

use crate::attributes::AttributeEncoder;
use crate::axioms::{AxiomGenerator, Generated};
use crate::diagnostics::DiagnosticSink;
use crate::encoder::TermEncoder;
use crate::error::Result;
use crate::escape::escape_name;
use crate::kore::{Attributes, KoreWriter, Pattern, Sentence};
use crate::names::{sort_of, symbol_name};
use crate::options::TranslationOptions;
use crate::priority::PriorityGroups;
use crate::rules::{is_rewrite_rule, RuleTranslator, Strategy, TranslatedRule};
use crate::symbols::SymbolTable;
use k_model::{
    sorts, Att, AttKey, InjectionPass, KLabel, Module, ModuleIndex, SentenceType, SortAnnotator,
};
use log::{debug, info};

/// The three theories produced for a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KoreOutput {
    /// Signature, generated axioms and every rule that is not a macro.
    pub semantics: String,
    /// Signature with bracket symbols, subsort and overload axioms only.
    pub syntax: String,
    pub macros: String,
}

pub struct ModuleToKore<'a, 'm> {
    index: &'a ModuleIndex<'m>,
    top_cell_initializer: KLabel,
    options: &'a TranslationOptions,
    diagnostics: Option<&'a dyn DiagnosticSink>,
    injections: Option<&'a dyn InjectionPass>,
}

impl<'a, 'm> ModuleToKore<'a, 'm> {
    pub fn new(
        index: &'a ModuleIndex<'m>,
        top_cell_initializer: KLabel,
        options: &'a TranslationOptions,
    ) -> Self {
        Self {
            index,
            top_cell_initializer,
            options,
            diagnostics: None,
            injections: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: &'a dyn DiagnosticSink) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Replace the default [`SortAnnotator`] run on every rule before translation.
    pub fn with_injections(mut self, injections: &'a dyn InjectionPass) -> Self {
        self.injections = Some(injections);
        self
    }

    pub fn convert(&self, prelude: &str) -> Result<KoreOutput> {
        info!("translating module {} to kore", self.index.name());
        let terms = TermEncoder::new(self.index);
        let atts = AttributeEncoder::new(self.index, &terms);
        let annotator = SortAnnotator::new(self.index);
        let injections: &dyn InjectionPass = match self.injections {
            Some(injections) => injections,
            None => &annotator,
        };
        let table = SymbolTable::new(self.index, self.options, &atts);

        let mut semantics = KoreWriter::new();
        semantics.line(&self.header(&atts)?.to_string());
        semantics.newline();
        semantics.raw(prelude);
        semantics.newline();
        semantics.line_fmt(format_args!("module {}", escape_name(self.index.name())));
        semantics.newline();
        semantics.comment("imports");
        semantics.indent();
        semantics.sentence(&import("K"), None);
        semantics.dedent();
        semantics.newline();

        semantics.comment("sorts");
        semantics.indent();
        for sort in table.sorts()? {
            semantics.sentence(&sort, None);
        }
        semantics.dedent();
        semantics.newline();

        semantics.comment("symbols");
        semantics.indent();
        for symbol in table.symbols()? {
            semantics.sentence(&symbol, None);
        }
        semantics.dedent();

        let mut generator = AxiomGenerator::new(self.index);
        let syntax = self.syntax(semantics.clone(), &table, &generator)?;

        semantics.newline();
        semantics.comment("generated axioms");
        semantics.indent();
        for &prod in self.index.sorted_productions() {
            write_generated(&mut semantics, generator.production_axioms(prod)?);
        }
        for sort in self.index.sorted_all_sorts() {
            write_generated(&mut semantics, generator.no_junk(&sort));
        }
        write_generated(&mut semantics, generator.overloads());
        semantics.dedent();
        semantics.newline();

        semantics.comment("rules");
        let mut macros = KoreWriter::new();
        macros.comment("macros");
        let sentence_type = SentenceType::from_att(self.index.att()).unwrap_or_default();
        let mut translator =
            RuleTranslator::new(self.index, self.options, &terms, &atts, injections)
                .with_sentence_type(sentence_type)
                .with_diagnostics(self.diagnostics);
        if self.options.enable_priority_groups {
            translator = translator.with_priority_groups(self.priority_groups()?);
        }
        for (rule_index, rule) in self.index.module().rules().enumerate() {
            let translated = translator.translate(rule, rule_index)?;
            if translated.strategy == Strategy::Macro {
                write_rule(&mut macros, &translated);
            } else {
                write_rule(&mut semantics, &translated);
            }
        }

        if let Some(groups) = translator.priority_groups() {
            semantics.newline();
            semantics.comment("priority groups");
            semantics.indent();
            for alias in groups.group_aliases() {
                semantics.sentence(&alias, None);
            }
            semantics.dedent();
        }

        let module_att = self.index.att().clone().remove(&AttKey::Digest);
        semantics.line_fmt(format_args!("endmodule {}", atts.encode_plain(&module_att)?));

        Ok(KoreOutput {
            semantics: semantics.into_inner(),
            syntax,
            macros: macros.into_inner(),
        })
    }

    /// `[topCellInitializer{}(<init>()), source{}("<file>")]`.
    fn header(&self, atts: &AttributeEncoder) -> Result<Attributes> {
        let init = Pattern::app(
            symbol_name(&self.top_cell_initializer.name),
            self.top_cell_initializer.params.iter().map(sort_of).collect(),
            vec![],
        );
        let mut header = Attributes(vec![Pattern::app("topCellInitializer", vec![], vec![init])]);
        header.0.extend(source_att(self.index.att(), atts)?.0);
        Ok(header)
    }

    /// Completes the signature prefix of the semantics theory into the syntax theory.
    fn syntax(
        &self,
        mut syntax: KoreWriter,
        table: &SymbolTable,
        generator: &AxiomGenerator,
    ) -> Result<String> {
        syntax.indent();
        for bracket in table.bracket_symbols()? {
            syntax.sentence(&bracket, None);
        }
        for &prod in self.index.sorted_productions() {
            write_generated(&mut syntax, generator.subsort(prod));
        }
        write_generated(&mut syntax, generator.overloads());
        syntax.dedent();
        syntax.line("endmodule []");
        Ok(syntax.into_inner())
    }

    /// Groups over the priorities of the rules that become `\rewrites` axioms.
    fn priority_groups(&self) -> Result<PriorityGroups> {
        let mut priorities = vec![];
        for rule in self.index.module().rules() {
            if is_rewrite_rule(rule, self.index, self.options)? {
                priorities.push(rule.priority()?);
            }
        }
        let groups = PriorityGroups::new(priorities, sort_of(&sorts::generated_top_cell()));
        debug!("priority groups over {:?}", groups.priorities());
        Ok(groups)
    }

    /// The claims and simplification rules `spec` adds to `definition`, as a module importing
    /// the definition.
    pub fn convert_specification_module(
        &self,
        definition: &Module,
        spec: &Module,
        default_sentence_type: SentenceType,
    ) -> Result<String> {
        info!("translating specification module {}", spec.name);
        let terms = TermEncoder::new(self.index);
        let atts = AttributeEncoder::for_specification(self.index, &terms);
        let annotator = SortAnnotator::new(self.index);
        let injections: &dyn InjectionPass = match self.injections {
            Some(injections) => injections,
            None => &annotator,
        };
        let sentence_type = SentenceType::from_att(&spec.att).unwrap_or(default_sentence_type);
        let mut translator = RuleTranslator::new(self.index, self.options, &terms, &atts, injections)
            .with_sentence_type(sentence_type)
            .with_diagnostics(self.diagnostics)
            .without_siblings();

        let mut out = KoreWriter::new();
        out.line(&source_att(&spec.att, &atts)?.to_string());
        out.line_fmt(format_args!("module {}", escape_name(&spec.name)));
        out.newline();
        out.comment("imports");
        out.sentence(&import(&escape_name(&definition.name)), None);
        out.newline();
        out.newline();
        out.comment("claims");
        for sentence in spec.sentences_except(definition) {
            if sentence.is_claim() || sentence.att.contains(&AttKey::Simplification) {
                let translated = translator.translate(sentence, 0)?;
                write_rule(&mut out, &translated);
            }
        }
        let spec_att = spec.att.clone().remove(&AttKey::Digest);
        out.line_fmt(format_args!("endmodule {}", atts.encode_plain(&spec_att)?));
        Ok(out.into_inner())
    }
}

fn import(module: &str) -> Sentence {
    Sentence::Import {
        module: module.to_string(),
        att: Attributes::new(),
    }
}

/// `source{}("<file>")` when the module knows where it comes from.
fn source_att(att: &Att, atts: &AttributeEncoder) -> Result<Attributes> {
    match att.get_str(&AttKey::Source) {
        Some(source) => atts.encode_plain(&Att::new().add_str(AttKey::Source, source)),
        None => Ok(Attributes::new()),
    }
}

fn write_generated(out: &mut KoreWriter, axioms: impl IntoIterator<Item = Generated>) {
    for (sentence, comment) in axioms {
        out.sentence(&sentence, Some(comment));
    }
}

/// The rule's comment at the margin, then its alias and sentence.
fn write_rule(out: &mut KoreWriter, translated: &TranslatedRule) {
    out.comment(&translated.comment);
    out.indent();
    if let Some(alias) = &translated.alias {
        out.sentence(alias, None);
    }
    if let Some(sentence) = &translated.sentence {
        out.rule(sentence);
    }
    out.dedent();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCollector;
    use k_model::{Production, ProductionItem, Rule, Sort, SortDecl, SortHead, K};

    fn constructor(name: &str, sort: &str) -> Production {
        Production::new(
            Some(KLabel::new(name)),
            Sort::new(sort),
            vec![],
            Att::new().add_flag(AttKey::Constructor),
        )
    }

    fn foo_module() -> Module {
        let mut m = Module::new("FOO");
        m.sorts = vec![SortDecl {
            head: SortHead::new("Foo", 0),
            att: Att::new(),
        }];
        m.productions = vec![constructor("a", "Foo"), constructor("b", "Foo")];
        m
    }

    fn constant(name: &str) -> K {
        K::apply(KLabel::new(name), vec![])
    }

    fn rewrite(from: &str, to: &str, att: Att) -> Rule {
        Rule::new(
            K::rewrite(constant(from), constant(to)),
            K::bool_true(),
            K::bool_true(),
            att,
        )
    }

    fn convert(m: &Module, options: &TranslationOptions) -> KoreOutput {
        let index = ModuleIndex::new(m);
        ModuleToKore::new(&index, KLabel::new("init"), options)
            .convert("// prelude")
            .unwrap()
    }

    const FOO_SIGNATURE: &str = "[topCellInitializer{}(Lblinit{}())]

// prelude
module FOO

// imports
  import K []

// sorts
  sort SortFoo{} []

// symbols
  symbol Lbla{}() : SortFoo{} [constructor{}()]
  symbol Lblb{}() : SortFoo{} [constructor{}()]
";

    #[test]
    fn two_constructors_end_to_end() {
        let output = convert(&foo_module(), &TranslationOptions::default());
        let expected = format!(
            "{}
// generated axioms
  axiom{{}} \\not{{SortFoo{{}}}}(\\and{{SortFoo{{}}}}(Lbla{{}}(), Lblb{{}}())) [constructor{{}}()] \
// no confusion different constructors
  axiom{{}} \\or{{SortFoo{{}}}}(Lbla{{}}(), \\or{{SortFoo{{}}}}(Lblb{{}}(), \\bottom{{SortFoo{{}}}}())) \
[constructor{{}}()] // no junk

// rules
endmodule []
",
            FOO_SIGNATURE
        );
        assert_eq!(output.semantics, expected);
        assert_eq!(output.syntax, format!("{}endmodule []\n", FOO_SIGNATURE));
        assert_eq!(output.macros, "// macros\n");
    }

    #[test]
    fn translation_is_deterministic() {
        let mut m = foo_module();
        m.att = Att::new()
            .add_str(AttKey::Source, "foo.k")
            .add_str(AttKey::Digest, "abc");
        m.rules = vec![
            rewrite("a", "b", Att::new()),
            rewrite("b", "a", Att::new().add_flag(AttKey::Macro)),
        ];
        let first = convert(&m, &TranslationOptions::default());
        let second = convert(&m, &TranslationOptions::default());
        assert_eq!(first, second);
        assert!(first
            .semantics
            .starts_with("[topCellInitializer{}(Lblinit{}()), source{}(\"foo.k\")]\n\n"));
        assert!(first.semantics.ends_with("endmodule [source{}(\"foo.k\")]\n"));
        assert!(first.semantics.contains("// rule a() => b()\n  axiom{} \\rewrites"));
        assert!(!first.semantics.contains("// rule b() => a()"));
        assert!(first.macros.contains("// rule b() => a() [macro]\n  axiom{R} \\equals{SortFoo{}, R}"));
    }

    #[test]
    fn axioms_follow_attributes() {
        let int = || Sort::new("Int");
        let nt = || ProductionItem::NonTerminal { sort: int() };
        let mut m = Module::new("ARITH");
        m.productions = vec![
            Production::new(
                Some(KLabel::new("_+_")),
                int(),
                vec![nt(), nt()],
                Att::new()
                    .add_flag(AttKey::Function)
                    .add_flag(AttKey::Assoc)
                    .add_flag(AttKey::Comm)
                    .add_flag(AttKey::Idem)
                    .add_flag(AttKey::Functional)
                    .add_str(AttKey::Unit, ".Int"),
            ),
            Production::new(
                Some(KLabel::new(".Int")),
                int(),
                vec![],
                Att::new().add_flag(AttKey::Function),
            ),
            Production::new(
                Some(KLabel::new("neg")),
                int(),
                vec![nt()],
                Att::new().add_flag(AttKey::Function),
            ),
        ];
        let output = convert(&m, &TranslationOptions::default());
        let count = |comment: &str| output.semantics.matches(&format!("// {}\n", comment)).count();
        assert_eq!(count("associativity"), 1);
        assert_eq!(count("idempotency"), 1);
        assert_eq!(count("right unit"), 1);
        assert_eq!(count("left unit"), 1);
        assert_eq!(count("functional"), 1);
        assert_eq!(count("commutativity"), 0);
        assert_eq!(count("no junk"), 0);
        assert!(output.semantics.contains(
            "  axiom{R} \\equals{SortInt{}, R}(Lbl'UndsPlusUnds'{}(K:SortInt{}, Lbl'Stop'Int{}()), \
             K:SortInt{}) [unit{}()] // right unit\n"
        ));
    }

    #[test]
    fn priority_groups_guard_less_urgent_rules() {
        let mut m = foo_module();
        m.rules = vec![
            rewrite("a", "b", Att::new().add_str(AttKey::Priority, "10")),
            rewrite("b", "a", Att::new().add_str(AttKey::Priority, "10")),
            rewrite("a", "a", Att::new()),
        ];
        let options = TranslationOptions {
            enable_priority_groups: true,
            ..Default::default()
        };
        let semantics = convert(&m, &options).semantics;
        let top = "SortGeneratedTopCell{}";
        assert!(semantics.contains(&format!(
            "  alias rule0LHS{{}}() : {top} where rule0LHS{{}}() := \\and{{{top}}}(\\top{{{top}}}(), Lbla{{}}()) []\n"
        )));
        assert!(semantics.contains(&format!("  axiom{{}} \\rewrites{{{top}}}(rule1LHS{{}}(), ")));
        assert!(semantics.contains(&format!(
            "  axiom{{}} \\rewrites{{{top}}}(\\and{{{top}}}(\\not{{{top}}}(priorityLE10{{}}()), rule2LHS{{}}()), "
        )));
        assert!(semantics.contains(&format!(
            "\n// priority groups\n  alias priorityLE10{{}}() : {top} where priorityLE10{{}}() := \
             \\or{{{top}}}(rule0LHS{{}}(), \\or{{{top}}}(rule1LHS{{}}(), \\bottom{{{top}}}())) []\nendmodule []\n"
        )));
        assert_eq!(semantics.matches("alias priorityLE").count(), 1);
    }

    #[test]
    fn specification_module_imports_the_definition() {
        let mut definition = foo_module();
        let shared = rewrite("a", "b", Att::new());
        definition.rules = vec![shared.clone()];
        let mut spec = Module::new("FOO-SPEC");
        spec.att = Att::new().add_flag(AttKey::OnePath).add_str(AttKey::Source, "foo-spec.k");
        spec.rules = vec![
            shared,
            rewrite("b", "a", Att::new()),
            Rule::claim(
                K::rewrite(constant("a"), constant("b")),
                K::bool_true(),
                K::bool_true(),
                Att::new().add_str(AttKey::Label, "foo.claim"),
            ),
        ];
        let index = ModuleIndex::new(&definition);
        let options = TranslationOptions::default();
        let collector = DiagnosticCollector::new();
        let text = ModuleToKore::new(&index, KLabel::new("init"), &options)
            .with_diagnostics(&collector)
            .convert_specification_module(&definition, &spec, SentenceType::AllPath)
            .unwrap();
        let top = "SortGeneratedTopCell{}";
        let expected = format!(
            "[source{{}}(\"foo-spec.k\")]
module FOO-SPEC

// imports
import FOO []


// claims
// claim a() => b() [label(\"foo.claim\")]
  claim{{}} \\implies{{{top}}}(\\and{{{top}}}(\\top{{{top}}}(), Lbla{{}}()), \
weakExistsFinally{{{top}}}(\\and{{{top}}}(Lblb{{}}(), \\top{{{top}}}())))
    [label{{}}(\"foo.claim\")]

endmodule [one-path{{}}(), source{{}}(\"foo-spec.k\")]
"
        );
        assert_eq!(text, expected);
        assert!(collector.is_empty());
    }
}
