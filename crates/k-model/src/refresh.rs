// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::rule::Rule;
use crate::term::KVariable;
use std::collections::{BTreeMap, BTreeSet};

const FRESH_PREFIX: &str = "_Gen";

/// Rename the variables of `rules` apart from `avoid`.
///
/// Every variable gets a name `_Gen<n>` with a counter shared by all the rules, so no two
/// rules end up sharing a variable. A leading `@` or `?` is kept.
pub fn refresh_rules<'r>(rules: impl IntoIterator<Item = &'r Rule>, avoid: &BTreeSet<String>) -> Vec<Rule> {
    let mut counter = 0usize;
    rules
        .into_iter()
        .map(|rule| {
            let mut renaming: BTreeMap<String, String> = BTreeMap::new();
            rule.map_terms(|k| {
                k.map_variables(&mut |var: &KVariable| {
                    let name = renaming
                        .entry(var.name.clone())
                        .or_insert_with(|| fresh_name(&var.name, &mut counter, avoid))
                        .clone();
                    KVariable {
                        name,
                        att: var.att.clone(),
                    }
                })
            })
        })
        .collect()
}

fn fresh_name(original: &str, counter: &mut usize, avoid: &BTreeSet<String>) -> String {
    let sigil = original
        .chars()
        .next()
        .filter(|c| *c == '@' || *c == '?')
        .map(String::from)
        .unwrap_or_default();
    loop {
        let candidate = format!("{}{}{}", sigil, FRESH_PREFIX, *counter);
        *counter += 1;
        if !avoid.contains(&candidate) {
            return candidate;
        }
    }
}
