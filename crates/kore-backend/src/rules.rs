// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Translation of rules and claims.
//!
//! A rule is classified first and then encoded by exactly one strategy:
//!
//! - macros become plain equalities in the macro stream;
//! - rules carrying `kore` are already matching-logic formulas and are emitted as they are;
//! - rules about functions (and simplifications) become conditional equations;
//! - everything else is a reachability rule, `\rewrites` for rules and an implication under
//!   the module's modality for claims.

use crate::attributes::{free_vars_by_name, AttributeEncoder};
use crate::diagnostics::DiagnosticSink;
use crate::encoder::TermEncoder;
use crate::error::{KoreError, Result};
use crate::kore::{Attributes, KoreSort, Pattern, Sentence};
use crate::names::{kore_variable, sort_of, term_label_head};
use crate::options::TranslationOptions;
use crate::priority::PriorityGroups;
use codespan_reporting::diagnostic::Severity;
use itertools::Itertools;
use k_model::{
    klabels, refresh_rules, sorts, AttKey, InjectionPass, ModuleIndex, Production, Rule, SentenceType,
    K,
};
use log::{debug, warn};
use std::collections::BTreeSet;

const FUNCTIONAL_CLAIM_WARNING: &str = "Functional claims not yet supported.";

/// The shape of an equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquationForm {
    /// `owise` rules, guarded by the negation of their sibling rules.
    Owise,
    /// Simplifications and claims, which keep their left-hand side as it is.
    LeftBased,
    /// Function definitions, which match their arguments through memberships.
    Plain,
}

/// How a rule is encoded. Classification picks the first strategy that applies, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Macro,
    RawLogic,
    Equation(EquationForm),
    Rewrite,
}

/// What classification learns about a rule.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub strategy: Strategy,
    /// A `#Ceil` simplification.
    pub ceil: bool,
    /// The production of the head of the left-hand side, at the head's sort arguments, and
    /// the head's arguments.
    pub head: Option<(Production, Vec<K>)>,
    /// The sort equations and macros about this rule are stated in.
    pub sort: Option<KoreSort>,
}

impl RuleInfo {
    pub fn classify(rule: &Rule, index: &ModuleIndex, options: &TranslationOptions) -> Result<RuleInfo> {
        let att = &rule.att;
        let simplification = att.contains(&AttKey::Simplification);
        let heat_cool = options.heat_cool_equations
            && (att.contains(&AttKey::Heat) || att.contains(&AttKey::Cool));

        let left = rule.left();
        let mut head = None;
        let mut ceil = false;
        let mut function_head = false;
        if let K::Apply { label, items, .. } = left.strip_as() {
            let production = index.production_for_apply(label)?;
            function_head = production.is_function();
            ceil = label.name == klabels::ML_CEIL && simplification;
            head = Some((production, items.clone()));
        }
        let head_sort = head
            .as_ref()
            .map(|(production, _)| sort_of(&production.sort));

        let (strategy, sort) = if rule.is_macro() {
            let sort = head_sort.or_else(|| left.sort().map(sort_of));
            (Strategy::Macro, sort)
        } else if att.contains(&AttKey::Kore) {
            (Strategy::RawLogic, head_sort)
        } else if head.is_some()
            && (function_head || simplification || att.contains(&AttKey::Anywhere))
        {
            let form = if att.contains(&AttKey::Owise) {
                EquationForm::Owise
            } else if simplification || rule.is_claim() {
                EquationForm::LeftBased
            } else {
                EquationForm::Plain
            };
            (Strategy::Equation(form), head_sort)
        } else if heat_cool {
            (
                Strategy::Equation(EquationForm::LeftBased),
                Some(sort_of(&sorts::generated_top_cell())),
            )
        } else {
            (Strategy::Rewrite, head_sort)
        };

        Ok(RuleInfo {
            strategy,
            ceil,
            head,
            sort,
        })
    }
}

/// The output for one rule: the comment naming it, and what it translates to.
#[derive(Debug, Clone)]
pub struct TranslatedRule {
    pub comment: String,
    pub strategy: Strategy,
    /// The alias naming the left-hand side, with priority groups.
    pub alias: Option<Sentence>,
    /// `None` when the rule is dropped.
    pub sentence: Option<Sentence>,
}

pub struct RuleTranslator<'a, 'm> {
    index: &'a ModuleIndex<'m>,
    options: &'a TranslationOptions,
    terms: &'a TermEncoder<'a, 'm>,
    atts: &'a AttributeEncoder<'a, 'm>,
    injections: &'a dyn InjectionPass,
    diagnostics: Option<&'a dyn DiagnosticSink>,
    sentence_type: SentenceType,
    /// Whether `owise` equations are guarded by their siblings.
    with_siblings: bool,
    groups: Option<PriorityGroups>,
}

impl<'a, 'm> RuleTranslator<'a, 'm> {
    pub fn new(
        index: &'a ModuleIndex<'m>,
        options: &'a TranslationOptions,
        terms: &'a TermEncoder<'a, 'm>,
        atts: &'a AttributeEncoder<'a, 'm>,
        injections: &'a dyn InjectionPass,
    ) -> Self {
        Self {
            index,
            options,
            terms,
            atts,
            injections,
            diagnostics: None,
            sentence_type: SentenceType::RewriteRule,
            with_siblings: true,
            groups: None,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Option<&'a dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The modality of claims and rules that do not choose one.
    pub fn with_sentence_type(mut self, sentence_type: SentenceType) -> Self {
        self.sentence_type = sentence_type;
        self
    }

    /// Translate `owise` equations without looking at the other rules of their function.
    pub fn without_siblings(mut self) -> Self {
        self.with_siblings = false;
        self
    }

    pub fn with_priority_groups(mut self, groups: PriorityGroups) -> Self {
        self.groups = Some(groups);
        self
    }

    pub fn priority_groups(&self) -> Option<&PriorityGroups> {
        self.groups.as_ref()
    }

    fn top(&self) -> KoreSort {
        sort_of(&sorts::generated_top_cell())
    }

    pub fn translate(&mut self, rule: &Rule, rule_index: usize) -> Result<TranslatedRule> {
        let rule = self.injections.add_injections(rule);
        let info = RuleInfo::classify(&rule, self.index, self.options)?;
        let mut translated = TranslatedRule {
            comment: rule.to_string(),
            strategy: info.strategy,
            alias: None,
            sentence: None,
        };
        if info.ceil && self.options.disable_ceil_simplification_rules {
            debug!("dropping #Ceil simplification {}", translated.comment);
            return Ok(translated);
        }

        match info.strategy {
            Strategy::Macro => {
                no_existentials(&rule)?;
                translated.sentence = Some(self.macro_rule(&rule, &info)?);
            }
            Strategy::RawLogic => {
                no_existentials(&rule)?;
                let pattern = self.terms.encode(&rule.left())?;
                let att = self.rule_att(&rule)?;
                translated.sentence = Some(if rule.is_claim() {
                    Sentence::claim(vec![], pattern, att)
                } else {
                    Sentence::axiom(vec![], pattern, att)
                });
            }
            Strategy::Equation(form) => {
                no_existentials(&rule)?;
                translated.sentence = Some(self.equation(&rule, &info, form)?);
            }
            Strategy::Rewrite => {
                let (alias, sentence) = self.reachability(&rule, rule_index)?;
                translated.alias = alias;
                translated.sentence = Some(sentence);
            }
        }
        Ok(translated)
    }

    fn rule_att(&self, rule: &Rule) -> Result<Attributes> {
        let free = free_vars_by_name(&rule.free_variables());
        self.atts.encode(&rule.att, &free, &rule.to_string())
    }

    /// `{R, <sort parameters of the rule>}`.
    fn equation_params(&self, rule: &Rule) -> Vec<KoreSort> {
        let mut params = vec![KoreSort::r()];
        if let Some(sort_params) = rule.att.get_sort(&AttKey::SortParams) {
            params.extend(sort_params.params.iter().map(|p| KoreSort::var(p.name.clone())));
        }
        params
    }

    fn equation_sort(&self, rule: &Rule, info: &RuleInfo) -> Result<KoreSort> {
        info.sort
            .clone()
            .ok_or_else(|| KoreError::untranslatable(rule, "cannot determine the sort of the equation"))
    }

    fn macro_rule(&self, rule: &Rule, info: &RuleInfo) -> Result<Sentence> {
        let sort = self.equation_sort(rule, info)?;
        let pattern = Pattern::equals(
            sort,
            KoreSort::r(),
            self.terms.encode(&rule.left())?,
            self.terms.encode(&rule.right())?,
        );
        let priority = rule.priority()?;
        let att = rule.att.clone().add_str(AttKey::Priority, priority.to_string());
        let free = free_vars_by_name(&rule.free_variables());
        let att = self.atts.encode(&att, &free, &rule.to_string())?;
        Ok(Sentence::axiom(self.equation_params(rule), pattern, att))
    }

    fn equation(&self, rule: &Rule, info: &RuleInfo, form: EquationForm) -> Result<Sentence> {
        let r = KoreSort::r();
        let sort = self.equation_sort(rule, info)?;
        let requires = self.side_condition(&rule.requires, r.clone())?;
        let right = Pattern::and(
            sort.clone(),
            self.terms.encode(&rule.right())?,
            self.side_condition(&rule.ensures, sort.clone())?,
        );

        let pattern = match (form, &info.head) {
            (EquationForm::LeftBased, _) => Pattern::implies(
                r.clone(),
                requires,
                Pattern::equals(sort, r, self.terms.encode(&rule.left())?, right),
            ),
            (EquationForm::Plain, Some((production, children))) => Pattern::implies(
                r.clone(),
                Pattern::and(r.clone(), requires, self.memberships(production, children)?),
                Pattern::equals(sort, r, self.generic_head(production)?, right),
            ),
            (EquationForm::Owise, Some((production, children))) => {
                let siblings = self.siblings(rule, production)?;
                let guard = Pattern::and(
                    r.clone(),
                    Pattern::not(r.clone(), Pattern::or_all(r.clone(), siblings)),
                    Pattern::and(r.clone(), requires, self.memberships(production, children)?),
                );
                Pattern::implies(
                    r.clone(),
                    guard,
                    Pattern::equals(sort, r, self.generic_head(production)?, right),
                )
            }
            (_, None) => {
                return Err(KoreError::untranslatable(rule, "equation without a function head"))
            }
        };

        let att = self.rule_att(rule)?;
        let params = self.equation_params(rule);
        if rule.is_claim() {
            warn!("{} {}", FUNCTIONAL_CLAIM_WARNING, rule);
            if let Some(diagnostics) = self.diagnostics {
                diagnostics.diag(Severity::Warning, FUNCTIONAL_CLAIM_WARNING, &rule.to_string());
            }
            Ok(Sentence::claim(params, pattern, att))
        } else {
            Ok(Sentence::axiom(params, pattern, att))
        }
    }

    /// `f(X0:S0, X1:S1, ...)` for the head production of an equation.
    fn generic_head(&self, production: &Production) -> Result<Pattern> {
        let Some(label) = &production.klabel else {
            return Err(KoreError::ill_formed("equation head without a label", production));
        };
        let args = production
            .nonterminals()
            .into_iter()
            .enumerate()
            .map(|(i, s)| Pattern::var(format!("X{}", i), sort_of(s)))
            .collect();
        Ok(Pattern::app(
            term_label_head(label)?,
            label.params.iter().map(sort_of).collect(),
            args,
        ))
    }

    /// `\and{R}(\in{S0,R}(X0:S0, a0), ... \top{R}())` for the arguments `a` of an equation head.
    fn memberships(&self, production: &Production, children: &[K]) -> Result<Pattern> {
        let r = KoreSort::r();
        let items = production
            .nonterminals()
            .into_iter()
            .zip(children)
            .enumerate()
            .map(|(i, (s, child))| {
                let sort = sort_of(s);
                Ok(Pattern::member(
                    sort.clone(),
                    r.clone(),
                    Pattern::var(format!("X{}", i), sort),
                    self.terms.encode(child)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Pattern::and_all(r, items))
    }

    /// One disjunct per other rule of the function, each describing where that rule applies.
    fn siblings(&self, rule: &Rule, production: &Production) -> Result<Vec<Pattern>> {
        let Some(label) = production.label_name() else {
            return Ok(vec![]);
        };
        if !self.with_siblings {
            return Ok(vec![]);
        }
        let avoid: BTreeSet<String> = rule.free_variables().into_iter().map(|v| v.name).collect();
        let r = KoreSort::r();
        let mut disjuncts = vec![];
        for sibling in refresh_rules(self.index.function_rules(label).iter().copied(), &avoid) {
            if [AttKey::Owise, AttKey::Simplification, AttKey::NonExecutable]
                .iter()
                .any(|key| sibling.att.contains(key))
            {
                continue;
            }
            let left = sibling.left();
            let children = match left.strip_as() {
                K::Apply { items, .. } if items.len() == production.arity() => items,
                _ => {
                    return Err(KoreError::OwiseArityMismatch {
                        label: label.to_string(),
                        sibling: sibling.to_string(),
                    })
                }
            };
            let vars = sibling
                .free_variables()
                .iter()
                .map(kore_variable)
                .collect_vec();
            let body = Pattern::and(
                r.clone(),
                self.side_condition(&sibling.requires, r.clone())?,
                self.memberships(production, children)?,
            );
            disjuncts.push(Pattern::exists_all(r.clone(), vars, body));
        }
        Ok(disjuncts)
    }

    /// `\top` for a trivial side condition, else `cond = true`.
    fn side_condition(&self, condition: &K, sort: KoreSort) -> Result<Pattern> {
        if condition.is_true() {
            return Ok(Pattern::top(sort));
        }
        let bool_sort = sort_of(&sorts::bool());
        Ok(Pattern::equals(
            bool_sort.clone(),
            sort,
            self.terms.encode(condition)?,
            Pattern::dv(bool_sort, "\"true\""),
        ))
    }

    fn reachability(&mut self, rule: &Rule, rule_index: usize) -> Result<(Option<Sentence>, Sentence)> {
        let top = self.top();
        let left = self.terms.encode(&rule.left())?;
        let right = self.terms.encode(&rule.right())?;
        let requires = self.side_condition(&rule.requires, top.clone())?;
        let ensures = self.side_condition(&rule.ensures, top.clone())?;
        let grouped = self.groups.is_some();

        let body = if grouped {
            Pattern::and(top.clone(), ensures, right)
        } else {
            Pattern::and(top.clone(), right, ensures)
        };
        let existentials = rule.existentials().iter().map(kore_variable).collect_vec();
        let rhs = self.modal(rule, Pattern::exists_all(top.clone(), existentials, body));
        let att = self.rule_att(rule)?;

        if rule.is_claim() {
            let lhs = Pattern::and(top.clone(), requires, left);
            return Ok((None, Sentence::claim(vec![], Pattern::implies(top, lhs, rhs), att)));
        }

        let (alias, lhs) = match self.groups.as_mut() {
            Some(groups) => {
                let priority = rule.priority()?;
                let free = rule.free_variables();
                let alias = groups.rule_alias(rule_index, priority, &free, requires, left);
                (Some(alias), groups.guarded_lhs(rule_index, priority, &free))
            }
            None => (None, Pattern::and(top.clone(), left, requires)),
        };
        Ok((
            alias,
            Sentence::axiom(vec![], Pattern::rewrites(top, lhs, rhs), att),
        ))
    }

    fn modal(&self, rule: &Rule, pattern: Pattern) -> Pattern {
        let sentence_type = SentenceType::from_att(&rule.att).unwrap_or(self.sentence_type);
        let operator = match sentence_type {
            SentenceType::RewriteRule => return pattern,
            SentenceType::OnePath => klabels::RL_WEF,
            SentenceType::AllPath => klabels::RL_WAF,
        };
        Pattern::app(operator, vec![self.top()], vec![pattern])
    }
}

fn no_existentials(rule: &Rule) -> Result<()> {
    let existentials = rule.existentials();
    if existentials.is_empty() {
        return Ok(());
    }
    Err(KoreError::ExistentialsInEquation {
        variables: existentials.iter().map(|v| v.name.as_str()).join(", "),
        rule: rule.to_string(),
    })
}

/// Whether the rule would be encoded as a `\rewrites` axiom, which is what priority groups
/// range over.
pub fn is_rewrite_rule(rule: &Rule, index: &ModuleIndex, options: &TranslationOptions) -> Result<bool> {
    Ok(!rule.is_claim() && RuleInfo::classify(rule, index, options)?.strategy == Strategy::Rewrite)
}
