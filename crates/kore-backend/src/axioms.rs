// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural axioms derived from production attributes and the sort lattice.
//!
//! Every generator returns the sentence together with the trailing comment it is printed with.
//! Emission order is driven by the caller, which walks the module's sorted productions and
//! sorts, so the output is deterministic.

use crate::error::{KoreError, Result};
use crate::kore::{Attributes, KoreSort, Pattern, Sentence};
use crate::names::{
    generated_var, kore_sort, sort_of, symbol_application, symbol_name, symbol_params,
};
use k_model::{AttKey, KLabel, ModuleIndex, Production, Sort};
use std::collections::BTreeSet;

/// A generated sentence and its comment.
pub type Generated = (Sentence, &'static str);

pub struct AxiomGenerator<'a, 'm> {
    index: &'a ModuleIndex<'m>,
    /// Constructor pairs whose disjointness has already been stated, in both orders.
    no_confusion: BTreeSet<(&'m Production, &'m Production)>,
}

impl<'a, 'm> AxiomGenerator<'a, 'm> {
    pub fn new(index: &'a ModuleIndex<'m>) -> Self {
        Self {
            index,
            no_confusion: BTreeSet::new(),
        }
    }

    /// The axioms of one production, in the order subsort, assoc, idem, unit, functional,
    /// constructor.
    pub fn production_axioms(&mut self, prod: &'m Production) -> Result<Vec<Generated>> {
        if prod.is_builtin() {
            return Ok(vec![]);
        }
        if let Some(subsort) = self.subsort(prod) {
            return Ok(vec![subsort]);
        }
        let Some(label) = &prod.klabel else {
            return Ok(vec![]);
        };
        let mut axioms = vec![];
        if prod.att.contains(&AttKey::Assoc) {
            axioms.push(self.assoc(label, prod)?);
        }
        if prod.att.contains(&AttKey::Idem) {
            axioms.push(self.idem(label, prod)?);
        }
        if prod.is_function() && prod.att.contains(&AttKey::Unit) {
            axioms.extend(self.unit(label, prod)?);
        }
        if prod.att.contains(&AttKey::Functional) {
            axioms.push(self.functional(label, prod));
        }
        if prod.is_constructor() {
            axioms.extend(self.no_confusion(label, prod));
        }
        Ok(axioms)
    }

    /// `inj{Sub,Sup}` is functional, for subsort productions below anything but `K`.
    pub fn subsort(&self, prod: &Production) -> Option<Generated> {
        if prod.is_builtin() || prod.sort.is_k() {
            return None;
        }
        let sub = prod.subsort_sort()?;
        let sub_sort = kore_sort(sub, &prod.params);
        let sup_sort = kore_sort(&prod.sort, &prod.params);
        let inj = Pattern::inj(
            sub_sort.clone(),
            sup_sort.clone(),
            Pattern::var("From", sub_sort.clone()),
        );
        let att = Attributes(vec![Pattern::app(
            "subsort",
            vec![sub_sort, sup_sort],
            vec![],
        )]);
        Some((
            Sentence::axiom(axiom_params(prod, true), functional_pattern(prod, inj), att),
            "subsort",
        ))
    }

    pub fn assoc(&self, label: &KLabel, prod: &Production) -> Result<Generated> {
        let (first, second) = binary_args(prod, "assoc")?;
        if !(self.index.less_than_eq(&prod.sort, first) && self.index.less_than_eq(&prod.sort, second)) {
            return Err(KoreError::ill_formed(
                "Found an associative production with ill formed sorts",
                prod,
            ));
        }
        let sort = kore_sort(&prod.sort, &prod.params);
        let k = |i: usize| Pattern::var(format!("K{}", i), sort.clone());
        let f = |a: Pattern, b: Pattern| symbol_application(label, prod, vec![a, b]);
        let left = f(f(k(1), k(2)), k(3));
        let right = f(k(1), f(k(2), k(3)));
        Ok((
            equation(prod, sort, left, right, "assoc"),
            "associativity",
        ))
    }

    /// Not part of the emitted definition.
    pub fn comm(&self, label: &KLabel, prod: &Production) -> Result<Generated> {
        let (first, second) = binary_args(prod, "comm")?;
        if first != second {
            return Err(KoreError::ill_formed(
                "Found a commutative production with ill formed sorts",
                prod,
            ));
        }
        let sort = kore_sort(&prod.sort, &prod.params);
        let child = kore_sort(first, &prod.params);
        let k1 = Pattern::var("K1", child.clone());
        let k2 = Pattern::var("K2", child);
        let left = symbol_application(label, prod, vec![k1.clone(), k2.clone()]);
        let right = symbol_application(label, prod, vec![k2, k1]);
        Ok((equation(prod, sort, left, right, "comm"), "commutativity"))
    }

    pub fn idem(&self, label: &KLabel, prod: &Production) -> Result<Generated> {
        let sort = self.homogeneous_binary(prod, "idem")?;
        let k = Pattern::var("K", sort.clone());
        let left = symbol_application(label, prod, vec![k.clone(), k.clone()]);
        Ok((equation(prod, sort, left, k, "idem"), "idempotency"))
    }

    /// Right and left identity of the production's `unit` symbol.
    pub fn unit(&self, label: &KLabel, prod: &Production) -> Result<Vec<Generated>> {
        let sort = self.homogeneous_binary(prod, "unit")?;
        let Some(unit) = prod.att.get_str(&AttKey::Unit) else {
            return Ok(vec![]);
        };
        let unit = Pattern::app(symbol_name(unit), vec![], vec![]);
        let k = Pattern::var("K", sort.clone());
        let right_unit = symbol_application(label, prod, vec![k.clone(), unit.clone()]);
        let left_unit = symbol_application(label, prod, vec![unit, k.clone()]);
        Ok(vec![
            (
                equation(prod, sort.clone(), right_unit, k.clone(), "unit"),
                "right unit",
            ),
            (equation(prod, sort, left_unit, k, "unit"), "left unit"),
        ])
    }

    pub fn functional(&self, label: &KLabel, prod: &Production) -> Generated {
        let application = apply_pattern(label, prod, "K");
        (
            Sentence::axiom(
                axiom_params(prod, true),
                functional_pattern(prod, application),
                flag("functional"),
            ),
            "functional",
        )
    }

    /// Injectivity of a constructor and its disjointness from every other constructor of the
    /// same sort. Each unordered pair is stated once per translation.
    pub fn no_confusion(&mut self, label: &KLabel, prod: &'m Production) -> Vec<Generated> {
        let sort = kore_sort(&prod.sort, &prod.params);
        let params = axiom_params(prod, false);
        let mut axioms = vec![];
        if prod.arity() > 0 {
            let conjoined = prod
                .nonterminals()
                .into_iter()
                .enumerate()
                .map(|(i, s)| {
                    Pattern::and(
                        kore_sort(s, &prod.params),
                        generated_var(format!("X{}", i), s, prod),
                        generated_var(format!("Y{}", i), s, prod),
                    )
                })
                .collect();
            let pattern = Pattern::implies(
                sort.clone(),
                Pattern::and(
                    sort.clone(),
                    apply_pattern(label, prod, "X"),
                    apply_pattern(label, prod, "Y"),
                ),
                symbol_application(label, prod, conjoined),
            );
            axioms.push((
                Sentence::axiom(params.clone(), pattern, flag("constructor")),
                "no confusion same constructor",
            ));
        }
        let index = self.index;
        for &other in index.productions_for_sort(&prod.sort.head()) {
            let Some(other_label) = &other.klabel else {
                continue;
            };
            if self.no_confusion.contains(&(prod, other))
                || prod == other
                || !other.is_constructor()
                || other.is_builtin()
            {
                continue;
            }
            self.no_confusion.insert((prod, other));
            self.no_confusion.insert((other, prod));
            let pattern = Pattern::not(
                sort.clone(),
                Pattern::and(
                    sort.clone(),
                    apply_pattern(label, prod, "X"),
                    apply_pattern(other_label, other, "Y"),
                ),
            );
            axioms.push((
                Sentence::axiom(params.clone(), pattern, flag("constructor")),
                "no confusion different constructors",
            ));
        }
        axioms
    }

    /// Every value of `sort` is built by one of its constructors, is a token, or is injected
    /// from a smaller sort. `None` when the sort has no such disjunct.
    pub fn no_junk(&self, sort: &Sort) -> Option<Generated> {
        let kore = sort_of(sort);
        let mut disjuncts = vec![];
        let mut has_token = false;
        for prod in self.index.productions_for_sort(&sort.head()) {
            if prod.is_function() || prod.is_subsort() || prod.is_builtin() {
                continue;
            }
            let is_new_token = prod.att.contains(&AttKey::Token) && !has_token;
            if is_new_token {
                disjuncts.push(Pattern::top(kore.clone()));
                has_token = true;
            } else if let Some(label) = &prod.klabel {
                let vars = prod
                    .nonterminals()
                    .into_iter()
                    .enumerate()
                    .map(|(i, s)| generated_var(format!("X{}", i), s, prod));
                disjuncts.push(Pattern::exists_all(
                    kore.clone(),
                    vars,
                    apply_pattern(label, prod, "X"),
                ));
            }
        }
        if !sort.is_k() {
            for smaller in self.index.sorted_all_sorts() {
                if self.index.less_than(&smaller, sort) {
                    let val = Pattern::var("Val", sort_of(&smaller));
                    disjuncts.push(Pattern::exists(
                        kore.clone(),
                        val.clone(),
                        Pattern::inj(sort_of(&smaller), kore.clone(), val),
                    ));
                }
            }
        }
        let token_sort = self
            .index
            .sort_att(&sort.head())
            .map_or(false, |att| att.contains(&AttKey::Token));
        if token_sort && !has_token {
            disjuncts.push(Pattern::top(kore.clone()));
        }
        if disjuncts.is_empty() {
            return None;
        }
        Some((
            Sentence::axiom(vec![], Pattern::or_all(kore, disjuncts), flag("constructor")),
            "no junk",
        ))
    }

    /// `greater(args) = inj(lesser(args))`, injecting the arguments whose sorts differ.
    pub fn overload(&self, lesser: &Production, greater: &Production) -> Option<Generated> {
        let (Some(lesser_label), Some(greater_label)) = (&lesser.klabel, &greater.klabel) else {
            return None;
        };
        let lesser_args = lesser.nonterminals();
        let greater_args = greater.nonterminals();
        let greater_applied = greater_args
            .iter()
            .zip(lesser_args.iter())
            .enumerate()
            .map(|(i, (g, l))| {
                let name = format!("K{}", i);
                if g == l {
                    generated_var(name, g, greater)
                } else {
                    Pattern::inj(
                        kore_sort(l, &lesser.params),
                        kore_sort(g, &greater.params),
                        generated_var(name, l, lesser),
                    )
                }
            })
            .collect();
        let lesser_applied = lesser_args
            .iter()
            .enumerate()
            .map(|(i, s)| generated_var(format!("K{}", i), s, lesser))
            .collect();
        let greater_sort = kore_sort(&greater.sort, &greater.params);
        let pattern = Pattern::equals(
            greater_sort.clone(),
            KoreSort::r(),
            symbol_application(greater_label, greater, greater_applied),
            Pattern::inj(
                kore_sort(&lesser.sort, &lesser.params),
                greater_sort,
                symbol_application(lesser_label, lesser, lesser_applied),
            ),
        );
        let att = Attributes(vec![Pattern::app(
            "overload",
            vec![],
            vec![
                symbol_application(greater_label, greater, vec![]),
                symbol_application(lesser_label, lesser, vec![]),
            ],
        )]);
        Some((
            Sentence::axiom(vec![KoreSort::r()], pattern, att),
            "overloaded production",
        ))
    }

    /// All overload axioms of the module, in the order of its overload pairs.
    pub fn overloads(&self) -> Vec<Generated> {
        self.index
            .overloads()
            .iter()
            .filter_map(|(lesser, greater)| self.overload(lesser, greater))
            .collect()
    }

    fn homogeneous_binary(&self, prod: &Production, att: &str) -> Result<KoreSort> {
        let (first, second) = binary_args(prod, att)?;
        if prod.sort != *first || prod.sort != *second {
            return Err(KoreError::ill_formed(
                "Found an associative production with ill formed sorts",
                prod,
            ));
        }
        Ok(kore_sort(&prod.sort, &prod.params))
    }
}

fn binary_args<'p>(prod: &'p Production, att: &str) -> Result<(&'p Sort, &'p Sort)> {
    match prod.nonterminals()[..] {
        [first, second] => Ok((first, second)),
        _ => Err(KoreError::ill_formed(
            &format!("Found a non-binary production with the {} attribute", att),
            prod,
        )),
    }
}

fn flag(name: &str) -> Attributes {
    Attributes(vec![Pattern::app(name, vec![], vec![])])
}

/// `{R, params}` of an axiom about `prod`.
fn axiom_params(prod: &Production, with_r: bool) -> Vec<KoreSort> {
    let mut params = vec![];
    if with_r {
        params.push(KoreSort::r());
    }
    if let Some(label) = &prod.klabel {
        params.extend(symbol_params(label, prod));
    }
    params
}

/// `f(<prefix>0:S0, <prefix>1:S1, ...)`.
fn apply_pattern(label: &KLabel, prod: &Production, prefix: &str) -> Pattern {
    let args = prod
        .nonterminals()
        .into_iter()
        .enumerate()
        .map(|(i, s)| generated_var(format!("{}{}", prefix, i), s, prod))
        .collect();
    symbol_application(label, prod, args)
}

/// `\exists{R}(Val:S, \equals{S,R}(Val:S, p))`.
fn functional_pattern(prod: &Production, p: Pattern) -> Pattern {
    let sort = kore_sort(&prod.sort, &prod.params);
    let val = Pattern::var("Val", sort.clone());
    Pattern::exists(
        KoreSort::r(),
        val.clone(),
        Pattern::equals(sort, KoreSort::r(), val, p),
    )
}

fn equation(prod: &Production, sort: KoreSort, left: Pattern, right: Pattern, att: &str) -> Sentence {
    Sentence::axiom(
        axiom_params(prod, true),
        Pattern::equals(sort, KoreSort::r(), left, right),
        flag(att),
    )
}
