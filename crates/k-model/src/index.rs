// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Derived, read-only views of a [`Module`]: sorted productions, the subsort and overload
//! relations, token sorts and function rules.

use crate::att::{Att, AttKey};
use crate::error::{ModelError, Result};
use crate::label::KLabel;
use crate::module::Module;
use crate::production::Production;
use crate::rule::Rule;
use crate::sort::{sorts, Sort, SortHead};
use crate::term::K;
use itertools::Itertools;
use log::debug;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::{BTreeMap, BTreeSet};

pub struct ModuleIndex<'m> {
    module: &'m Module,
    productions: Vec<&'m Production>,
    productions_for_sort: BTreeMap<SortHead, Vec<&'m Production>>,
    production_for_label: BTreeMap<&'m str, &'m Production>,
    sort_atts: BTreeMap<SortHead, Att>,
    /// For every sort, the sorts strictly above it.
    greater: BTreeMap<Sort, BTreeSet<Sort>>,
    overloads: Vec<(&'m Production, &'m Production)>,
    token_sorts: BTreeSet<SortHead>,
    function_rules: BTreeMap<String, Vec<&'m Rule>>,
    ml_binders: BTreeSet<String>,
}

impl<'m> ModuleIndex<'m> {
    pub fn new(module: &'m Module) -> Self {
        let productions: Vec<&Production> = module.productions.iter().sorted().dedup().collect();

        let mut productions_for_sort: BTreeMap<SortHead, Vec<&Production>> = BTreeMap::new();
        let mut production_for_label = BTreeMap::new();
        for prod in &productions {
            productions_for_sort
                .entry(prod.sort.head())
                .or_default()
                .push(*prod);
            if let Some(name) = prod.label_name() {
                production_for_label.entry(name).or_insert(*prod);
            }
        }

        let mut sort_atts: BTreeMap<SortHead, Att> = BTreeMap::new();
        for decl in &module.sorts {
            let merged = sort_atts.entry(decl.head.clone()).or_default();
            for (key, value) in decl.att.iter() {
                merged.insert(key.clone(), value.clone());
            }
        }

        let greater = subsort_closure(&productions);

        let mut token_sorts: BTreeSet<SortHead> = sort_atts
            .iter()
            .filter(|(_, att)| att.contains(&AttKey::Token))
            .map(|(head, _)| head.clone())
            .collect();
        token_sorts.extend(
            productions
                .iter()
                .filter(|p| p.att.contains(&AttKey::Token))
                .map(|p| p.sort.head()),
        );

        let ml_binders = productions
            .iter()
            .filter(|p| p.att.contains(&AttKey::MlBinder))
            .filter_map(|p| p.label_name().map(str::to_string))
            .collect();

        let mut index = Self {
            module,
            productions,
            productions_for_sort,
            production_for_label,
            sort_atts,
            greater,
            overloads: vec![],
            token_sorts,
            function_rules: BTreeMap::new(),
            ml_binders,
        };
        index.overloads = index.compute_overloads();
        index.function_rules = index.compute_function_rules();
        debug!(
            "indexed module {}: {} productions, {} overload pairs, {} function heads",
            module.name,
            index.productions.len(),
            index.overloads.len(),
            index.function_rules.len()
        );
        index
    }

    pub fn module(&self) -> &'m Module {
        self.module
    }

    pub fn name(&self) -> &'m str {
        &self.module.name
    }

    pub fn att(&self) -> &'m Att {
        &self.module.att
    }

    /// All productions, in their total order, without duplicates.
    pub fn sorted_productions(&self) -> &[&'m Production] {
        &self.productions
    }

    pub fn productions_for_sort(&self, head: &SortHead) -> &[&'m Production] {
        self.productions_for_sort
            .get(head)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn production_for_label(&self, name: &str) -> Result<&'m Production> {
        self.production_for_label
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::MissingProduction {
                label: name.to_string(),
            })
    }

    /// The production of an application, instantiated at the label's sort arguments.
    pub fn production_for_apply(&self, label: &KLabel) -> Result<Production> {
        Ok(self.production_for_label(&label.name)?.substitute(&label.params))
    }

    pub fn sort_att(&self, head: &SortHead) -> Option<&Att> {
        self.sort_atts.get(head)
    }

    /// The `hook` attribute of a sort, if any.
    pub fn sort_hook(&self, head: &SortHead) -> Option<&str> {
        self.sort_att(head).and_then(|att| att.get_str(&AttKey::Hook))
    }

    /// Declared sort heads and the heads of non-parametric production results, sorted.
    pub fn sorted_defined_sorts(&self) -> Vec<SortHead> {
        let mut heads: BTreeSet<SortHead> = self.module.sorts.iter().map(|d| d.head.clone()).collect();
        heads.extend(
            self.productions
                .iter()
                .filter(|p| !p.params.contains(&p.sort))
                .map(|p| p.sort.head()),
        );
        heads.into_iter().collect()
    }

    /// Every concrete sort mentioned by the module, sorted.
    pub fn sorted_all_sorts(&self) -> Vec<Sort> {
        let mut all: BTreeSet<Sort> = self
            .module
            .sorts
            .iter()
            .filter(|d| d.head.arity == 0)
            .map(|d| Sort::new(d.head.name.clone()))
            .collect();
        for prod in self.productions.iter().filter(|p| p.params.is_empty()) {
            all.insert(prod.sort.clone());
            all.extend(prod.nonterminals().into_iter().cloned());
        }
        all.into_iter()
            .filter(|s| s.sort_variable().is_none())
            .collect()
    }

    pub fn less_than(&self, lesser: &Sort, greater: &Sort) -> bool {
        self.greater
            .get(lesser)
            .map_or(false, |above| above.contains(greater))
    }

    pub fn less_than_eq(&self, lesser: &Sort, greater: &Sort) -> bool {
        lesser == greater || self.less_than(lesser, greater)
    }

    /// Pairs `(lesser, greater)` of productions related by overloading, in production order.
    pub fn overloads(&self) -> &[(&'m Production, &'m Production)] {
        &self.overloads
    }

    pub fn token_sorts(&self) -> &BTreeSet<SortHead> {
        &self.token_sorts
    }

    pub fn is_token_sort(&self, head: &SortHead) -> bool {
        self.token_sorts.contains(head)
    }

    /// Rules whose left-hand side is headed by the function `label`, in declaration order.
    pub fn function_rules(&self, label: &str) -> &[&'m Rule] {
        self.function_rules
            .get(label)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_ml_binder(&self, label: &str) -> bool {
        self.ml_binders.contains(label)
    }

    fn compute_overloads(&self) -> Vec<(&'m Production, &'m Production)> {
        let mut groups: BTreeMap<&str, Vec<&Production>> = BTreeMap::new();
        for prod in &self.productions {
            if let (Some(key), Some(_)) = (prod.att.get_str(&AttKey::Overload), &prod.klabel) {
                groups.entry(key).or_default().push(*prod);
            }
        }
        let mut pairs = vec![];
        for prods in groups.values() {
            for lesser in prods {
                for greater in prods {
                    if lesser != greater && self.overloads_production(lesser, greater) {
                        pairs.push((*lesser, *greater));
                    }
                }
            }
        }
        pairs.sort();
        pairs
    }

    /// `lesser` is a strictly more specific instance of `greater`.
    fn overloads_production(&self, lesser: &Production, greater: &Production) -> bool {
        let lesser_args = lesser.nonterminals();
        let greater_args = greater.nonterminals();
        if lesser_args.len() != greater_args.len() || !self.less_than_eq(&lesser.sort, &greater.sort) {
            return false;
        }
        let pointwise = lesser_args
            .iter()
            .zip(&greater_args)
            .all(|(l, g)| self.less_than_eq(l, g));
        let strict = lesser.sort != greater.sort || lesser_args != greater_args;
        pointwise && strict
    }

    fn compute_function_rules(&self) -> BTreeMap<String, Vec<&'m Rule>> {
        let mut result: BTreeMap<String, Vec<&Rule>> = BTreeMap::new();
        for rule in self.module.rules() {
            let left = rule.left();
            if let K::Apply { label, .. } = left.strip_as() {
                let is_function = self
                    .production_for_label
                    .get(label.name.as_str())
                    .map_or(false, |p| p.is_function());
                if is_function {
                    result.entry(label.name.clone()).or_default().push(rule);
                }
            }
        }
        result
    }
}

/// The transitive closure of the subsort productions, excluding `K`.
fn subsort_closure(productions: &[&Production]) -> BTreeMap<Sort, BTreeSet<Sort>> {
    let mut graph = DiGraphMap::<&Sort, ()>::new();
    for prod in productions {
        if let Some(sub) = prod.subsort_sort() {
            if prod.sort.name != sorts::K {
                graph.add_edge(sub, &prod.sort, ());
            }
        }
    }
    let mut closure = BTreeMap::new();
    for start in graph.nodes() {
        let mut above = BTreeSet::new();
        let mut dfs = Dfs::new(&graph, start);
        while let Some(node) = dfs.next(&graph) {
            if node != start {
                above.insert(node.clone());
            }
        }
        closure.insert(start.clone(), above);
    }
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::production::ProductionItem;
    use crate::rule::Rule;

    fn nt(name: &str) -> ProductionItem {
        ProductionItem::NonTerminal {
            sort: Sort::new(name),
        }
    }

    fn subsort(sub: &str, sup: &str) -> Production {
        Production::new(None, Sort::new(sup), vec![nt(sub)], Att::new())
    }

    fn symbol(label: &str, sort: &str, args: &[&str], att: Att) -> Production {
        Production::new(
            Some(KLabel::new(label)),
            Sort::new(sort),
            args.iter().map(|a| nt(a)).collect(),
            att,
        )
    }

    fn module() -> Module {
        let mut m = Module::new("TEST");
        m.productions = vec![
            subsort("Int", "Exp"),
            subsort("Exp", "KResult"),
            subsort("Exp", "K"),
            symbol(
                "_+Int_",
                "Int",
                &["Int", "Int"],
                Att::new().add_flag(AttKey::Function).add_str(AttKey::Overload, "plus"),
            ),
            symbol("_+Exp_", "Exp", &["Exp", "Exp"], Att::new().add_str(AttKey::Overload, "plus")),
            symbol("tok", "Id", &[], Att::new().add_flag(AttKey::Token)),
        ];
        m.rules = vec![Rule::new(
            K::rewrite(
                K::apply(KLabel::new("_+Int_"), vec![K::var("X"), K::var("Y")]),
                K::var("X"),
            ),
            K::bool_true(),
            K::bool_true(),
            Att::new(),
        )];
        m
    }

    #[test]
    fn subsort_relation_is_transitive() {
        let m = module();
        let index = ModuleIndex::new(&m);
        let (int, exp, result) = (Sort::new("Int"), Sort::new("Exp"), Sort::new("KResult"));
        assert!(index.less_than(&int, &exp));
        assert!(index.less_than(&int, &result));
        assert!(!index.less_than(&exp, &int));
        assert!(!index.less_than(&int, &int));
        assert!(index.less_than_eq(&int, &int));
        assert!(!index.less_than(&exp, &sorts::k()));
    }

    #[test]
    fn overloads_relate_more_specific_productions() {
        let m = module();
        let index = ModuleIndex::new(&m);
        let pairs: Vec<_> = index
            .overloads()
            .iter()
            .map(|(l, g)| (l.label_name().unwrap(), g.label_name().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("_+Int_", "_+Exp_")]);
    }

    #[test]
    fn derived_tables() {
        let m = module();
        let index = ModuleIndex::new(&m);
        assert!(index.is_token_sort(&SortHead::new("Id", 0)));
        assert_eq!(index.function_rules("_+Int_").len(), 1);
        assert!(index.function_rules("_+Exp_").is_empty());
        assert!(index.production_for_label("missing").is_err());
        let all: Vec<_> = index.sorted_all_sorts().iter().map(|s| s.name.clone()).collect();
        assert_eq!(all, vec!["Exp", "Id", "Int", "K", "KResult"]);
    }
}
