// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Sort and symbol declarations.

use crate::attributes::AttributeEncoder;
use crate::error::{KoreError, Result};
use crate::kore::Sentence;
use crate::names::{kore_sort, kore_sort_head, symbol_name, symbol_params};
use crate::options::TranslationOptions;
use k_model::{sorts, Att, AttKey, AttValue, KLabel, ModuleIndex, Production, SortHead, K};
use log::debug;

/// Hooks of the built-in collection sorts.
pub const COLLECTION_HOOKS: &[&str] = &[
    "SET.Set",
    "MAP.Map",
    "LIST.List",
    "ARRAY.Array",
    "RANGEMAP.RangeMap",
];
const ARRAY_HOOK: &str = "ARRAY.Array";

pub struct SymbolTable<'a, 'm> {
    index: &'a ModuleIndex<'m>,
    options: &'a TranslationOptions,
    atts: &'a AttributeEncoder<'a, 'm>,
}

impl<'a, 'm> SymbolTable<'a, 'm> {
    pub fn new(
        index: &'a ModuleIndex<'m>,
        options: &'a TranslationOptions,
        atts: &'a AttributeEncoder<'a, 'm>,
    ) -> Self {
        Self {
            index,
            options,
            atts,
        }
    }

    /// One declaration per defined sort, `K` and `KItem` excepted.
    pub fn sorts(&self) -> Result<Vec<Sentence>> {
        let mut sentences = vec![];
        for head in self.index.sorted_defined_sorts() {
            if head.arity == 0 && (head.name == sorts::K || head.name == sorts::KITEM) {
                continue;
            }
            sentences.push(self.sort(&head)?);
        }
        Ok(sentences)
    }

    fn sort(&self, head: &SortHead) -> Result<Sentence> {
        let mut att = self.index.sort_att(head).cloned().unwrap_or_default();
        let mut hooked = false;
        if let Some(hook) = att.get_str(&AttKey::Hook).map(str::to_string) {
            if hook == ARRAY_HOOK {
                att = att
                    .remove(&AttKey::Element)
                    .remove(&AttKey::Unit)
                    .remove(&AttKey::Hook);
            } else if COLLECTION_HOOKS.contains(&hook.as_str()) {
                att = self.collection_att(head, att)?;
                hooked = true;
            } else {
                hooked = true;
            }
        }
        att = att.remove(&AttKey::HasDomainValues);
        if self.index.is_token_sort(head) {
            att = att.add_flag(AttKey::HasDomainValues);
        }
        if head.arity == 0 && head.generic_sort().is_nat() {
            att = att.add_str(AttKey::Nat, head.name.clone());
        }
        let (name, params) = kore_sort_head(head);
        debug!("declaring sort {}", head);
        Ok(Sentence::Sort {
            hooked,
            name,
            params,
            att: self.atts.encode_plain(&att)?,
        })
    }

    /// Collection sorts name their element, concatenation and unit symbols.
    fn collection_att(&self, head: &SortHead, att: Att) -> Result<Att> {
        let concat = self
            .index
            .productions_for_sort(head)
            .iter()
            .find(|p| p.att.contains(&AttKey::Element))
            .ok_or_else(|| KoreError::MissingConcatProduction {
                sort: head.to_string(),
            })?;
        let (Some(element), Some(unit), Some(label)) = (
            concat.att.get_str(&AttKey::Element),
            concat.att.get_str(&AttKey::Unit),
            &concat.klabel,
        ) else {
            return Err(KoreError::ill_formed(
                "collection concatenation needs a label, an element and a unit",
                concat,
            ));
        };
        let symbol = |name: &str| AttValue::Term(K::apply(KLabel::new(name), vec![]));
        Ok(att
            .add(AttKey::Element, symbol(element))
            .add(AttKey::Concat, AttValue::Term(K::apply(label.clone(), vec![])))
            .add(AttKey::Unit, symbol(unit)))
    }

    /// Declarations for every labelled production that is not a connective.
    pub fn symbols(&self) -> Result<Vec<Sentence>> {
        let mut sentences = vec![];
        for prod in self.index.sorted_productions() {
            if prod.is_builtin() {
                continue;
            }
            if let Some(label) = &prod.klabel {
                sentences.push(self.symbol(label, prod)?);
            }
        }
        Ok(sentences)
    }

    /// Symbols for the labels of bracket productions, which only the syntax theory needs.
    pub fn bracket_symbols(&self) -> Result<Vec<Sentence>> {
        let mut sentences = vec![];
        for prod in self.index.sorted_productions() {
            if let Some(label) = prod.bracket_label() {
                sentences.push(self.symbol(&label, prod)?);
            }
        }
        Ok(sentences)
    }

    fn symbol(&self, label: &KLabel, prod: &Production) -> Result<Sentence> {
        let hooked = prod.is_function() && self.options.is_real_hook(&prod.att);
        Ok(Sentence::Symbol {
            hooked,
            name: symbol_name(&label.name),
            params: symbol_params(label, prod),
            args: prod
                .nonterminals()
                .into_iter()
                .map(|s| kore_sort(s, &prod.params))
                .collect(),
            result: kore_sort(&prod.sort, &prod.params),
            att: self.atts.encode_plain(&prod.att)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::TermEncoder;
    use k_model::{Module, ProductionItem, Sort, SortDecl};

    fn nt(name: &str) -> ProductionItem {
        ProductionItem::NonTerminal {
            sort: Sort::new(name),
        }
    }

    fn decl(name: &str, att: Att) -> SortDecl {
        SortDecl {
            head: SortHead::new(name, 0),
            att,
        }
    }

    fn module() -> Module {
        let mut m = Module::new("TEST");
        m.sorts = vec![
            decl("K", Att::new()),
            decl("Set", Att::new().add_str(AttKey::Hook, "SET.Set")),
            decl(
                "Array",
                Att::new()
                    .add_str(AttKey::Hook, "ARRAY.Array")
                    .add_str(AttKey::Unit, ".Array")
                    .add_str(AttKey::Element, "ArrayItem"),
            ),
            decl("Int", Att::new().add_str(AttKey::Hook, "INT.Int")),
            decl("Id", Att::new().add_flag(AttKey::Token)),
            decl("64", Att::new()),
        ];
        m.productions = vec![
            Production::new(
                Some(KLabel::new("_Set_")),
                Sort::new("Set"),
                vec![nt("Set"), nt("Set")],
                Att::new()
                    .add_flag(AttKey::Function)
                    .add_str(AttKey::Hook, "SET.concat")
                    .add_str(AttKey::Element, "SetItem")
                    .add_str(AttKey::Unit, ".Set"),
            ),
            Production::new(
                Some(KLabel::new(".Set")),
                Sort::new("Set"),
                vec![],
                Att::new().add_flag(AttKey::Function).add_str(AttKey::Hook, "SET.unit"),
            ),
            Production::new(
                Some(KLabel::new("frob")),
                Sort::new("Int"),
                vec![nt("Int")],
                Att::new().add_flag(AttKey::Function).add_str(AttKey::Hook, "MYLIB.frob"),
            ),
            Production::new(
                Some(KLabel::new("#And")),
                Sort::new("Int"),
                vec![nt("Int"), nt("Int")],
                Att::new(),
            ),
            Production::new(
                None,
                Sort::new("Int"),
                vec![
                    ProductionItem::Terminal { value: "(".into() },
                    nt("Int"),
                    ProductionItem::Terminal { value: ")".into() },
                ],
                Att::new()
                    .add_flag(AttKey::Bracket)
                    .add_str(AttKey::BracketLabel, "(_)_INT"),
            ),
        ];
        m
    }

    #[test]
    fn sort_declarations() {
        let m = module();
        let index = ModuleIndex::new(&m);
        let terms = TermEncoder::new(&index);
        let atts = AttributeEncoder::new(&index, &terms);
        let options = TranslationOptions::default();
        let table = SymbolTable::new(&index, &options, &atts);
        let rendered: Vec<String> = table.sorts().unwrap().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "sort Sort64{} [nat{}(\"64\")]",
                "sort SortArray{} []",
                "sort SortId{} [hasDomainValues{}(), token{}()]",
                "hooked-sort SortInt{} [hook{}(\"INT.Int\")]",
                "hooked-sort SortSet{} [concat{}(Lbl'Unds'Set'Unds'{}()), element{}(LblSetItem{}()), \
                 hook{}(\"SET.Set\"), unit{}(Lbl'Stop'Set{}())]",
            ]
        );
    }

    #[test]
    fn collection_without_concat_is_an_error() {
        let mut m = module();
        m.productions.remove(0);
        let index = ModuleIndex::new(&m);
        let terms = TermEncoder::new(&index);
        let atts = AttributeEncoder::new(&index, &terms);
        let options = TranslationOptions::default();
        let table = SymbolTable::new(&index, &options, &atts);
        assert!(matches!(
            table.sorts(),
            Err(KoreError::MissingConcatProduction { .. })
        ));
    }

    #[test]
    fn symbol_declarations() {
        let m = module();
        let index = ModuleIndex::new(&m);
        let terms = TermEncoder::new(&index);
        let atts = AttributeEncoder::new(&index, &terms);
        let options = TranslationOptions::default();
        let table = SymbolTable::new(&index, &options, &atts);
        let rendered: Vec<String> = table.symbols().unwrap().iter().map(|s| s.head()).collect();
        assert_eq!(
            rendered,
            vec![
                "hooked-symbol Lbl'Stop'Set{}() : SortSet{}",
                "hooked-symbol Lbl'Unds'Set'Unds'{}(SortSet{}, SortSet{}) : SortSet{}",
                "symbol Lblfrob{}(SortInt{}) : SortInt{}",
            ]
        );
        let brackets: Vec<String> = table
            .bracket_symbols()
            .unwrap()
            .iter()
            .map(|s| s.head())
            .collect();
        assert_eq!(brackets, vec!["symbol Lbl'LParUndsRParUnds'INT{}(SortInt{}) : SortInt{}"]);
    }
}
