// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Re-encoding of K attributes as KORE sentence attributes.

use crate::encoder::TermEncoder;
use crate::error::{KoreError, Result};
use crate::escape::{enquote_k_string, escape_name};
use crate::kore::{Attributes, Pattern};
use crate::names::{kore_variable, symbol_reference};
use k_model::{Att, AttKey, AttValue, KVariable, ModuleIndex};
use std::collections::BTreeMap;

/// Keys whose string values survive in the attributes of a specification module.
const SPEC_VALUE_KEYS: &[AttKey] = &[
    AttKey::Priority,
    AttKey::Label,
    AttKey::Group,
    AttKey::Source,
    AttKey::Location,
    AttKey::UniqueId,
];

/// Free variables of a rule, by name, for resolving `concrete` and `symbolic`.
pub type FreeVars = BTreeMap<String, KVariable>;

pub struct AttributeEncoder<'a, 'm> {
    index: &'a ModuleIndex<'m>,
    terms: &'a TermEncoder<'a, 'm>,
    /// When set, only these keys keep their string values; others become flags.
    value_keys: Option<&'static [AttKey]>,
}

impl<'a, 'm> AttributeEncoder<'a, 'm> {
    pub fn new(index: &'a ModuleIndex<'m>, terms: &'a TermEncoder<'a, 'm>) -> Self {
        Self {
            index,
            terms,
            value_keys: None,
        }
    }

    /// The encoder used for specification modules, which only keep a few attribute values.
    pub fn for_specification(index: &'a ModuleIndex<'m>, terms: &'a TermEncoder<'a, 'm>) -> Self {
        Self {
            value_keys: Some(SPEC_VALUE_KEYS),
            ..Self::new(index, terms)
        }
    }

    /// Encode `att`, sorted by key. `free_vars` and `context` are only consulted for the
    /// variable-list attributes of rules.
    pub fn encode(&self, att: &Att, free_vars: &FreeVars, context: &str) -> Result<Attributes> {
        let att = att.with_user_groups_as_group();
        let mut entries: Vec<(&AttKey, &AttValue)> = att.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.key().cmp(b.key()));

        let mut result = Attributes::new();
        for (key, value) in entries {
            let head = escape_name(key.key());
            let args = match value {
                AttValue::Flag => vec![],
                AttValue::Term(k) => vec![self.terms.encode(k)?],
                AttValue::Terms(ks) => ks
                    .iter()
                    .map(|k| self.terms.encode(k))
                    .collect::<Result<Vec<_>>>()?,
                _ if !self.keeps_value(key) => vec![],
                AttValue::Sort(sort) => vec![Pattern::str(enquote_k_string(&sort.to_string()))],
                AttValue::Str(s) => self.encode_str(key, s, free_vars, context)?,
            };
            result.push(Pattern::app(head, vec![], args));
        }
        Ok(result)
    }

    /// Encode attributes that never mention rule variables.
    pub fn encode_plain(&self, att: &Att) -> Result<Attributes> {
        self.encode(att, &FreeVars::new(), "")
    }

    fn keeps_value(&self, key: &AttKey) -> bool {
        self.value_keys.map_or(true, |keys| keys.contains(key))
    }

    fn encode_str(
        &self,
        key: &AttKey,
        value: &str,
        free_vars: &FreeVars,
        context: &str,
    ) -> Result<Vec<Pattern>> {
        match key {
            AttKey::Concrete | AttKey::Symbolic => value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| {
                    free_vars.get(name).map(kore_variable).ok_or_else(|| {
                        KoreError::UnboundAttributeVariable {
                            variable: name.to_string(),
                            rule: context.to_string(),
                        }
                    })
                })
                .collect(),
            AttKey::Unit | AttKey::Element => {
                let prod = self.index.production_for_label(value)?;
                Ok(symbol_reference(prod).into_iter().collect())
            }
            _ => Ok(vec![Pattern::str(enquote_k_string(value))]),
        }
    }
}

/// Index free variables by name.
pub fn free_vars_by_name(vars: &[KVariable]) -> FreeVars {
    vars.iter().map(|v| (v.name.clone(), v.clone())).collect()
}
