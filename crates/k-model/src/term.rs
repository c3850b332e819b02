// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! K terms: the bodies, side conditions and attribute payloads of rules.

use crate::att::{Att, AttKey, AttValue};
use crate::label::KLabel;
use crate::sort::{sorts, Sort};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A variable occurrence. Its sort, if known, is the `sort` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KVariable {
    pub name: String,
    #[serde(default, skip_serializing_if = "Att::is_empty")]
    pub att: Att,
}

impl KVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            att: Att::new(),
        }
    }

    pub fn sorted(name: impl Into<String>, sort: Sort) -> Self {
        Self {
            name: name.into(),
            att: Att::new().add(AttKey::Sort, AttValue::Sort(sort)),
        }
    }

    pub fn sort(&self) -> Option<&Sort> {
        self.att.sort()
    }

    pub fn is_anonymous(&self) -> bool {
        self.att.contains(&AttKey::Anonymous)
    }

    /// Variables bound existentially on the right-hand side of a claim.
    pub fn is_existential(&self) -> bool {
        self.name.starts_with('?') || self.att.contains(&AttKey::Fresh)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum K {
    Apply {
        label: KLabel,
        #[serde(default)]
        items: Vec<K>,
        #[serde(default, skip_serializing_if = "Att::is_empty")]
        att: Att,
    },
    Token {
        token: String,
        sort: Sort,
        #[serde(default, skip_serializing_if = "Att::is_empty")]
        att: Att,
    },
    /// An associative `~>` sequence, already flattened.
    Sequence {
        #[serde(default)]
        items: Vec<K>,
        #[serde(default, skip_serializing_if = "Att::is_empty")]
        att: Att,
    },
    Variable(KVariable),
    Rewrite {
        left: Box<K>,
        right: Box<K>,
        #[serde(default, skip_serializing_if = "Att::is_empty")]
        att: Att,
    },
    As {
        pattern: Box<K>,
        alias: Box<K>,
        #[serde(default, skip_serializing_if = "Att::is_empty")]
        att: Att,
    },
    InjectedLabel {
        label: KLabel,
        #[serde(default, skip_serializing_if = "Att::is_empty")]
        att: Att,
    },
}

impl K {
    pub fn apply(label: KLabel, items: Vec<K>) -> K {
        K::Apply {
            label,
            items,
            att: Att::new(),
        }
    }

    pub fn token(token: impl Into<String>, sort: Sort) -> K {
        K::Token {
            token: token.into(),
            sort,
            att: Att::new(),
        }
    }

    pub fn sequence(items: Vec<K>) -> K {
        K::Sequence {
            items,
            att: Att::new(),
        }
    }

    pub fn var(name: impl Into<String>) -> K {
        K::Variable(KVariable::new(name))
    }

    pub fn var_sorted(name: impl Into<String>, sort: Sort) -> K {
        K::Variable(KVariable::sorted(name, sort))
    }

    pub fn rewrite(left: K, right: K) -> K {
        K::Rewrite {
            left: Box::new(left),
            right: Box::new(right),
            att: Att::new(),
        }
    }

    pub fn as_pattern(pattern: K, alias: K) -> K {
        K::As {
            pattern: Box::new(pattern),
            alias: Box::new(alias),
            att: Att::new(),
        }
    }

    /// The boolean `true` token, the default side condition.
    pub fn bool_true() -> K {
        K::token("true", sorts::bool())
    }

    pub fn is_true(&self) -> bool {
        matches!(self, K::Token { token, sort, .. } if token == "true" && sort.name == sorts::BOOL)
    }

    pub fn att(&self) -> &Att {
        match self {
            K::Apply { att, .. }
            | K::Token { att, .. }
            | K::Sequence { att, .. }
            | K::Rewrite { att, .. }
            | K::As { att, .. }
            | K::InjectedLabel { att, .. } => att,
            K::Variable(var) => &var.att,
        }
    }

    pub fn att_mut(&mut self) -> &mut Att {
        match self {
            K::Apply { att, .. }
            | K::Token { att, .. }
            | K::Sequence { att, .. }
            | K::Rewrite { att, .. }
            | K::As { att, .. }
            | K::InjectedLabel { att, .. } => att,
            K::Variable(var) => &mut var.att,
        }
    }

    /// The sort annotation of this term; tokens fall back to their own sort.
    pub fn sort(&self) -> Option<&Sort> {
        match self {
            K::Token { sort, att, .. } => att.sort().or(Some(sort)),
            other => other.att().sort(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> K {
        self.att_mut().insert(AttKey::Sort, AttValue::Sort(sort));
        self
    }

    /// Direct subterms, in order.
    pub fn children(&self) -> Vec<&K> {
        match self {
            K::Apply { items, .. } | K::Sequence { items, .. } => items.iter().collect(),
            K::Rewrite { left, right, .. } => vec![left, right],
            K::As { pattern, alias, .. } => vec![pattern, alias],
            K::Token { .. } | K::Variable(_) | K::InjectedLabel { .. } => vec![],
        }
    }

    /// Pre-order traversal.
    pub fn visit<'k>(&'k self, f: &mut impl FnMut(&'k K)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Every variable occurrence in pre-order, duplicates included.
    pub fn variables(&self) -> Vec<&KVariable> {
        let mut vars = vec![];
        self.visit(&mut |k| {
            if let K::Variable(var) = k {
                vars.push(var);
            }
        });
        vars
    }

    /// Rebuild the term with every variable replaced by `f(variable)`.
    pub fn map_variables(&self, f: &mut impl FnMut(&KVariable) -> KVariable) -> K {
        match self {
            K::Variable(var) => K::Variable(f(var)),
            K::Apply { label, items, att } => K::Apply {
                label: label.clone(),
                items: items.iter().map(|k| k.map_variables(f)).collect(),
                att: att.clone(),
            },
            K::Sequence { items, att } => K::Sequence {
                items: items.iter().map(|k| k.map_variables(f)).collect(),
                att: att.clone(),
            },
            K::Rewrite { left, right, att } => K::Rewrite {
                left: Box::new(left.map_variables(f)),
                right: Box::new(right.map_variables(f)),
                att: att.clone(),
            },
            K::As {
                pattern,
                alias,
                att,
            } => K::As {
                pattern: Box::new(pattern.map_variables(f)),
                alias: Box::new(alias.map_variables(f)),
                att: att.clone(),
            },
            K::Token { .. } | K::InjectedLabel { .. } => self.clone(),
        }
    }

    /// The term with every rewrite replaced by its left-hand side.
    pub fn to_left(&self) -> K {
        self.project(true)
    }

    /// The term with every rewrite replaced by its right-hand side.
    pub fn to_right(&self) -> K {
        self.project(false)
    }

    fn project(&self, left_side: bool) -> K {
        match self {
            K::Rewrite { left, right, .. } => {
                if left_side {
                    left.project(true)
                } else {
                    right.project(false)
                }
            }
            K::Apply { label, items, att } => K::Apply {
                label: label.clone(),
                items: items.iter().map(|k| k.project(left_side)).collect(),
                att: att.clone(),
            },
            K::Sequence { items, att } => K::Sequence {
                items: items.iter().map(|k| k.project(left_side)).collect(),
                att: att.clone(),
            },
            K::As {
                pattern,
                alias,
                att,
            } => K::As {
                pattern: Box::new(pattern.project(left_side)),
                alias: Box::new(alias.project(left_side)),
                att: att.clone(),
            },
            K::Token { .. } | K::Variable(_) | K::InjectedLabel { .. } => self.clone(),
        }
    }

    /// Strip `#as` wrappers from the top of a pattern.
    pub fn strip_as(&self) -> &K {
        match self {
            K::As { pattern, .. } => pattern.strip_as(),
            other => other,
        }
    }
}

impl fmt::Display for K {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            K::Apply { label, items, .. } => {
                write!(f, "{}({})", label, items.iter().join(","))
            }
            K::Token { token, .. } => write!(f, "{}", token),
            K::Sequence { items, .. } => {
                if items.is_empty() {
                    write!(f, ".K")
                } else {
                    write!(f, "{}", items.iter().join(" ~> "))
                }
            }
            K::Variable(var) => write!(f, "{}", var.name),
            K::Rewrite { left, right, .. } => write!(f, "{} => {}", left, right),
            K::As { pattern, alias, .. } => write!(f, "{} #as {}", pattern, alias),
            K::InjectedLabel { label, .. } => write!(f, "#klabel({})", label),
        }
    }
}
