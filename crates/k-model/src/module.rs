// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::att::Att;
use crate::production::Production;
use crate::rule::{Rule, RuleKind};
use crate::sort::SortHead;
use serde::{Deserialize, Serialize};

/// A sort declaration `syntax Name{S0..Sn} [att]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDecl {
    #[serde(flatten)]
    pub head: SortHead,
    #[serde(default, skip_serializing_if = "Att::is_empty")]
    pub att: Att,
}

/// A fully elaborated module. Rules and claims are kept in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(default, skip_serializing_if = "Att::is_empty")]
    pub att: Att,
    #[serde(default)]
    pub sorts: Vec<SortDecl>,
    #[serde(default)]
    pub productions: Vec<Production>,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.kind == RuleKind::Rule)
    }

    pub fn claims(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.kind == RuleKind::Claim)
    }

    /// Rules and claims of this module that `other` does not contain.
    pub fn sentences_except<'a>(&'a self, other: &'a Module) -> impl Iterator<Item = &'a Rule> {
        self.rules.iter().filter(move |r| !other.rules.contains(r))
    }
}
