// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Priority groups.
//!
//! Each rewrite rule's left-hand side is named by an alias `rule<i>LHS`. For every priority `p`
//! but the lowest one, `priorityLE<p>` is the disjunction of all left-hand sides with priority
//! at most `p`. A rule of priority `q` is then guarded by the negation of the group of the
//! priority just above `q`, so it only applies where no more urgent rule does.

use crate::kore::{Attributes, KoreSort, Pattern, Sentence};
use crate::names::{kore_variable, sort_of};
use itertools::Itertools;
use k_model::{sorts, KVariable};
use std::collections::BTreeMap;

pub struct PriorityGroups {
    /// Distinct priorities, most urgent first.
    priorities: Vec<i32>,
    /// Existentially closed left-hand-side aliases, by priority, in rule order.
    aliases: BTreeMap<i32, Vec<Pattern>>,
    top: KoreSort,
}

impl PriorityGroups {
    pub fn new(priorities: impl IntoIterator<Item = i32>, top: KoreSort) -> Self {
        Self {
            priorities: priorities.into_iter().sorted().dedup().collect(),
            aliases: BTreeMap::new(),
            top,
        }
    }

    pub fn priorities(&self) -> &[i32] {
        &self.priorities
    }

    /// The name of the group a rule of `priority` must not overlap with, if any.
    pub fn previous_group(&self, priority: i32) -> Option<String> {
        let position = self.priorities.iter().position(|p| *p == priority)?;
        position
            .checked_sub(1)
            .map(|previous| group_name(self.priorities[previous]))
    }

    /// Declare `rule<index>LHS` as `requires /\ left` over `free_vars`, and remember it under
    /// `priority`.
    pub fn rule_alias(
        &mut self,
        rule_index: usize,
        priority: i32,
        free_vars: &[KVariable],
        requires: Pattern,
        left: Pattern,
    ) -> Sentence {
        let name = rule_alias_name(rule_index);
        let vars: Vec<Pattern> = free_vars.iter().map(kore_variable).collect();
        let applied = Pattern::app(name.clone(), vec![], vars.clone());
        self.aliases
            .entry(priority)
            .or_default()
            .push(Pattern::exists_all(self.top.clone(), vars, applied.clone()));
        Sentence::Alias {
            name,
            params: vec![],
            args: free_vars.iter().map(variable_sort).collect(),
            result: self.top.clone(),
            lhs: applied,
            rhs: Pattern::and(self.top.clone(), requires, left),
            att: Attributes::new(),
        }
    }

    /// The left-hand side of rule `rule_index`, guarded by the group above its priority.
    pub fn guarded_lhs(&self, rule_index: usize, priority: i32, free_vars: &[KVariable]) -> Pattern {
        let applied = Pattern::app(
            rule_alias_name(rule_index),
            vec![],
            free_vars.iter().map(kore_variable).collect(),
        );
        match self.previous_group(priority) {
            Some(group) => Pattern::and(
                self.top.clone(),
                Pattern::not(self.top.clone(), Pattern::app(group, vec![], vec![])),
                applied,
            ),
            None => applied,
        }
    }

    /// One alias per priority, the least urgent one excepted since nothing is guarded by it.
    pub fn group_aliases(&self) -> Vec<Sentence> {
        let Some((_, groups)) = self.priorities.split_last() else {
            return vec![];
        };
        groups
            .iter()
            .map(|&priority| {
                let name = group_name(priority);
                let references = self.aliases.get(&priority).cloned().unwrap_or_default();
                let mut body = Pattern::or_all(self.top.clone(), references);
                if let Some(previous) = self.previous_group(priority) {
                    body = Pattern::or(
                        self.top.clone(),
                        Pattern::app(previous, vec![], vec![]),
                        body,
                    );
                }
                Sentence::Alias {
                    name: name.clone(),
                    params: vec![],
                    args: vec![],
                    result: self.top.clone(),
                    lhs: Pattern::app(name, vec![], vec![]),
                    rhs: body,
                    att: Attributes::new(),
                }
            })
            .collect()
    }
}

fn group_name(priority: i32) -> String {
    format!("priorityLE{}", priority)
}

fn rule_alias_name(rule_index: usize) -> String {
    format!("rule{}LHS", rule_index)
}

fn variable_sort(var: &KVariable) -> KoreSort {
    sort_of(&var.sort().cloned().unwrap_or_else(sorts::k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k_model::Sort;

    fn top() -> KoreSort {
        KoreSort::app("SortGeneratedTopCell", vec![])
    }

    fn lhs(name: &str) -> Pattern {
        Pattern::app(name, vec![], vec![])
    }

    #[test]
    fn groups_accumulate_in_priority_order() {
        let mut groups = PriorityGroups::new(vec![50, 10, 10], top());
        assert_eq!(groups.priorities(), &[10, 50]);
        let x = KVariable::sorted("X", Sort::new("Int"));

        let alias = groups.rule_alias(0, 10, &[x.clone()], Pattern::top(top()), lhs("Lbla"));
        assert_eq!(
            alias.to_string(),
            "alias rule0LHS{}(SortInt{}) : SortGeneratedTopCell{} where rule0LHS{}(VarX:SortInt{}) := \
             \\and{SortGeneratedTopCell{}}(\\top{SortGeneratedTopCell{}}(), Lbla{}()) []"
        );
        groups.rule_alias(1, 10, &[], Pattern::top(top()), lhs("Lblb"));
        groups.rule_alias(2, 50, &[], Pattern::top(top()), lhs("Lblc"));

        assert_eq!(groups.guarded_lhs(1, 10, &[]).to_string(), "rule1LHS{}()");
        assert_eq!(
            groups.guarded_lhs(2, 50, &[]).to_string(),
            "\\and{SortGeneratedTopCell{}}(\\not{SortGeneratedTopCell{}}(priorityLE10{}()), rule2LHS{}())"
        );

        let aliases = groups.group_aliases();
        assert_eq!(aliases.len(), 1);
        assert_eq!(
            aliases[0].to_string(),
            "alias priorityLE10{}() : SortGeneratedTopCell{} where priorityLE10{}() := \
             \\or{SortGeneratedTopCell{}}(\\exists{SortGeneratedTopCell{}}(VarX:SortInt{}, \
             rule0LHS{}(VarX:SortInt{})), \\or{SortGeneratedTopCell{}}(rule1LHS{}(), \
             \\bottom{SortGeneratedTopCell{}}())) []"
        );
    }

    #[test]
    fn later_groups_include_earlier_ones() {
        let mut groups = PriorityGroups::new(vec![1, 2, 3], top());
        groups.rule_alias(0, 2, &[], Pattern::top(top()), lhs("Lbla"));
        let aliases = groups.group_aliases();
        assert_eq!(aliases.len(), 2);
        assert_eq!(
            aliases[1].head(),
            "alias priorityLE2{}() : SortGeneratedTopCell{} where priorityLE2{}() := \
             \\or{SortGeneratedTopCell{}}(priorityLE1{}(), \\or{SortGeneratedTopCell{}}(rule0LHS{}(), \
             \\bottom{SortGeneratedTopCell{}}()))"
        );
        assert!(groups.previous_group(1).is_none());
        assert!(groups.previous_group(7).is_none());
    }
}
