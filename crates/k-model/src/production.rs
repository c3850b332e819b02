// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Syntax productions, the source of every emitted symbol.

use crate::att::{Att, AttKey};
use crate::label::KLabel;
use crate::sort::Sort;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductionItem {
    NonTerminal { sort: Sort },
    Terminal { value: String },
    RegexTerminal { regex: String },
}

/// A production `sort ::= items [att]`.
///
/// The derived ordering (label, then sort, then the rest) is the total order in which
/// productions are emitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Production {
    #[serde(default)]
    pub klabel: Option<KLabel>,
    pub sort: Sort,
    /// Sort variables this production is parametric in.
    #[serde(default)]
    pub params: Vec<Sort>,
    #[serde(default)]
    pub items: Vec<ProductionItem>,
    #[serde(default, skip_serializing_if = "Att::is_empty")]
    pub att: Att,
}

impl Production {
    pub fn new(klabel: Option<KLabel>, sort: Sort, items: Vec<ProductionItem>, att: Att) -> Self {
        Self {
            klabel,
            sort,
            params: vec![],
            items,
            att,
        }
    }

    /// Sorts of the non-terminal items, in order.
    pub fn nonterminals(&self) -> Vec<&Sort> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ProductionItem::NonTerminal { sort } => Some(sort),
                _ => None,
            })
            .collect()
    }

    pub fn arity(&self) -> usize {
        self.nonterminals().len()
    }

    pub fn nonterminal(&self, i: usize) -> Option<&Sort> {
        self.nonterminals().get(i).copied()
    }

    /// A label-less production with exactly one item, a non-terminal.
    pub fn is_subsort(&self) -> bool {
        self.klabel.is_none()
            && self.items.len() == 1
            && matches!(self.items[0], ProductionItem::NonTerminal { .. })
    }

    /// The embedded sort of a subsort production.
    pub fn subsort_sort(&self) -> Option<&Sort> {
        if self.is_subsort() {
            self.nonterminal(0)
        } else {
            None
        }
    }

    pub fn is_function(&self) -> bool {
        self.att.contains(&AttKey::Function)
    }

    pub fn is_constructor(&self) -> bool {
        self.att.contains(&AttKey::Constructor)
    }

    /// Productions of the matching-logic connectives.
    pub fn is_builtin(&self) -> bool {
        self.klabel.as_ref().map_or(false, KLabel::is_builtin)
    }

    pub fn label_name(&self) -> Option<&str> {
        self.klabel.as_ref().map(|l| l.name.as_str())
    }

    /// The label under which a bracket production is declared as a symbol.
    pub fn bracket_label(&self) -> Option<KLabel> {
        if !self.att.contains(&AttKey::Bracket) {
            return None;
        }
        self.att
            .get_str(&AttKey::BracketLabel)
            .map(|name| KLabel::with_params(name, self.params.clone()))
    }

    /// Instantiate the production's sort parameters with `args`. The result is not parametric.
    pub fn substitute(&self, args: &[Sort]) -> Production {
        if self.params.is_empty() || args.is_empty() {
            return self.clone();
        }
        let subst: BTreeMap<&Sort, &Sort> = self.params.iter().zip(args.iter()).collect();
        Production {
            klabel: self
                .klabel
                .as_ref()
                .map(|l| KLabel::with_params(l.name.clone(), args.to_vec())),
            sort: self.sort.substitute(&subst),
            params: vec![],
            items: self
                .items
                .iter()
                .map(|item| match item {
                    ProductionItem::NonTerminal { sort } => ProductionItem::NonTerminal {
                        sort: sort.substitute(&subst),
                    },
                    other => other.clone(),
                })
                .collect(),
            att: self.att.clone(),
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax {} ::= ", self.sort)?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match item {
                ProductionItem::NonTerminal { sort } => write!(f, "{}", sort)?,
                ProductionItem::Terminal { value } => write!(f, "{:?}", value)?,
                ProductionItem::RegexTerminal { regex } => write!(f, "r{:?}", regex)?,
            }
        }
        if let Some(label) = &self.klabel {
            write!(f, " [klabel({})]", label)?;
        }
        Ok(())
    }
}
