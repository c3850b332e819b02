// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Encoding of K terms as KORE patterns.

use crate::error::{KoreError, Result};
use crate::escape::{enquote_k_string, escape_non_ascii};
use crate::kore::{KoreSort, Pattern};
use crate::names::{kore_variable, sort_of, term_label_head};
use k_model::{AttKey, KLabel, KVariable, ModuleIndex, Sort, K};

const STRING_HOOK: &str = "STRING.String";
const BYTES_HOOK: &str = "BYTES.Bytes";

pub struct TermEncoder<'a, 'm> {
    index: &'a ModuleIndex<'m>,
}

impl<'a, 'm> TermEncoder<'a, 'm> {
    pub fn new(index: &'a ModuleIndex<'m>) -> Self {
        Self { index }
    }

    pub fn encode(&self, term: &K) -> Result<Pattern> {
        match term {
            K::Apply { label, items, .. } => self.encode_apply(label, items, term),
            K::Token { token, sort, .. } => Ok(self.encode_token(token, sort)),
            K::Sequence { items, .. } => self.encode_sequence(items),
            K::Variable(var) => Ok(kore_variable(var)),
            K::Rewrite { left, right, att } => {
                let sort = att
                    .sort()
                    .ok_or_else(|| KoreError::untranslatable(term, "rewrite without a sort"))?;
                Ok(Pattern::rewrites(
                    sort_of(sort),
                    self.encode(left)?,
                    self.encode(right)?,
                ))
            }
            K::As {
                pattern,
                alias,
                att,
            } => {
                let sort = att
                    .sort()
                    .ok_or_else(|| KoreError::untranslatable(term, "#as pattern without a sort"))?;
                Ok(Pattern::and(
                    sort_of(sort),
                    self.encode(pattern)?,
                    self.encode(alias)?,
                ))
            }
            K::InjectedLabel { .. } => Err(KoreError::untranslatable(term, "#klabel")),
        }
    }

    fn is_anonymous_binder(&self, label: &KLabel, items: &[K]) -> bool {
        self.index.is_ml_binder(&label.name)
            && items
                .first()
                .map_or(false, |first| first.att().contains(&AttKey::Anonymous))
    }

    fn encode_apply(&self, label: &KLabel, items: &[K], term: &K) -> Result<Pattern> {
        let label = self.poly_label(label);
        let head = term_label_head(&label)?;
        let params: Vec<KoreSort> = label.params.iter().map(sort_of).collect();

        if self.is_anonymous_binder(&label, items) {
            // `#Exists _ . P` quantifies over every anonymous variable of `P`.
            let body = items
                .get(1)
                .ok_or_else(|| KoreError::untranslatable(term, "binder without a body"))?;
            let anonymous = self.collect_anonymous_variables(body)?;
            let mut pattern = self.encode(body)?;
            for var in anonymous.iter().rev() {
                pattern = Pattern::app(head.clone(), params.clone(), vec![kore_variable(var), pattern]);
            }
            return Ok(pattern);
        }

        let args = items
            .iter()
            .map(|item| self.encode(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Pattern::app(head, params, args))
    }

    /// Binders are not parametric in their bound variable's sort.
    fn poly_label(&self, label: &KLabel) -> KLabel {
        if self.index.is_ml_binder(&label.name) && !label.params.is_empty() {
            KLabel::with_params(label.name.clone(), label.params[1..].to_vec())
        } else {
            label.clone()
        }
    }

    /// Anonymous variables of `term` in order of first occurrence.
    pub fn collect_anonymous_variables(&self, term: &K) -> Result<Vec<KVariable>> {
        let mut found: Vec<KVariable> = vec![];
        self.collect_anonymous_into(term, &mut found)?;
        Ok(found)
    }

    fn collect_anonymous_into(&self, term: &K, found: &mut Vec<KVariable>) -> Result<()> {
        match term {
            K::Apply { label, items, .. } if self.is_anonymous_binder(label, items) => {
                Err(KoreError::NestedAnonymousBinder {
                    term: term.to_string(),
                })
            }
            K::Variable(var) => {
                if var.is_anonymous() && !found.iter().any(|v| v.name == var.name) {
                    found.push(var.clone());
                }
                Ok(())
            }
            other => other
                .children()
                .into_iter()
                .try_for_each(|child| self.collect_anonymous_into(child, found)),
        }
    }

    fn encode_token(&self, token: &str, sort: &Sort) -> Pattern {
        let text = match self.index.sort_hook(&sort.head()) {
            Some(STRING_HOOK) => escape_non_ascii(token),
            // Bytes literals carry a leading `b` marker.
            Some(BYTES_HOOK) => escape_non_ascii(token.get(1..).unwrap_or_default()),
            _ => enquote_k_string(token),
        };
        Pattern::dv(sort_of(sort), text)
    }

    fn encode_sequence(&self, items: &[K]) -> Result<Pattern> {
        let Some((last, init)) = items.split_last() else {
            return Ok(dotk());
        };
        let mut pattern = if is_k_sorted(last) {
            self.encode(last)?
        } else {
            kseq(self.encode(last)?, dotk())
        };
        for item in init.iter().rev() {
            let encoded = self.encode(item)?;
            pattern = if is_k_sorted(item) {
                Pattern::app("append", vec![], vec![encoded, pattern])
            } else {
                kseq(encoded, pattern)
            };
        }
        Ok(pattern)
    }
}

fn is_k_sorted(term: &K) -> bool {
    term.att().sort().map_or(false, Sort::is_k)
}

fn kseq(head: Pattern, tail: Pattern) -> Pattern {
    Pattern::app("kseq", vec![], vec![head, tail])
}

fn dotk() -> Pattern {
    Pattern::app("dotk", vec![], vec![])
}
