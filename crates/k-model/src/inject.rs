// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Sort annotation of rule terms.
//!
//! Injection insertion happens upstream; the backend only needs every application, rewrite and
//! as-pattern to carry its sort. [`SortAnnotator`] fills in the annotations that are missing
//! and leaves existing ones alone, so running it on an already elaborated rule is harmless.

use crate::att::{AttKey, AttValue};
use crate::index::ModuleIndex;
use crate::rule::Rule;
use crate::sort::{sorts, Sort};
use crate::term::K;

/// A pass that makes sure injections and sort annotations are present on a rule.
pub trait InjectionPass {
    fn add_injections(&self, rule: &Rule) -> Rule;
}

/// The default pass: computes sorts from productions.
pub struct SortAnnotator<'a, 'm> {
    index: &'a ModuleIndex<'m>,
}

impl<'a, 'm> SortAnnotator<'a, 'm> {
    pub fn new(index: &'a ModuleIndex<'m>) -> Self {
        Self { index }
    }

    pub fn annotate(&self, term: &K) -> K {
        let mut term = match term {
            K::Apply { label, items, att } => K::Apply {
                label: label.clone(),
                items: items.iter().map(|k| self.annotate(k)).collect(),
                att: att.clone(),
            },
            K::Sequence { items, att } => K::Sequence {
                items: items.iter().map(|k| self.annotate(k)).collect(),
                att: att.clone(),
            },
            K::Rewrite { left, right, att } => K::Rewrite {
                left: Box::new(self.annotate(left)),
                right: Box::new(self.annotate(right)),
                att: att.clone(),
            },
            K::As {
                pattern,
                alias,
                att,
            } => K::As {
                pattern: Box::new(self.annotate(pattern)),
                alias: Box::new(self.annotate(alias)),
                att: att.clone(),
            },
            K::Token { .. } | K::Variable(_) | K::InjectedLabel { .. } => term.clone(),
        };
        if term.att().sort().is_none() {
            if let Some(sort) = self.infer_sort(&term) {
                term.att_mut().insert(AttKey::Sort, AttValue::Sort(sort));
            }
        }
        term
    }

    fn infer_sort(&self, term: &K) -> Option<Sort> {
        match term {
            K::Apply { label, .. } if label.is_inj() => label.params.get(1).cloned(),
            K::Apply { label, .. } => self
                .index
                .production_for_apply(label)
                .ok()
                .map(|prod| prod.sort),
            K::Token { sort, .. } => Some(sort.clone()),
            K::Sequence { .. } => Some(sorts::k()),
            K::Rewrite { left, right, .. } => left.sort().or_else(|| right.sort()).cloned(),
            K::As { pattern, .. } => pattern.sort().cloned(),
            K::Variable(_) | K::InjectedLabel { .. } => None,
        }
    }
}

impl InjectionPass for SortAnnotator<'_, '_> {
    fn add_injections(&self, rule: &Rule) -> Rule {
        rule.map_terms(|k| self.annotate(k))
    }
}
