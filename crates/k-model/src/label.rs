// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Symbol labels.

use crate::sort::Sort;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels with a fixed meaning for the backend.
pub mod klabels {
    pub const INJ: &str = "inj";

    pub const ML_BOTTOM: &str = "#Bottom";
    pub const ML_TOP: &str = "#Top";
    pub const ML_NOT: &str = "#Not";
    pub const ML_OR: &str = "#Or";
    pub const ML_AND: &str = "#And";
    pub const ML_IMPLIES: &str = "#Implies";
    pub const ML_EQUALS: &str = "#Equals";
    pub const ML_CEIL: &str = "#Ceil";
    pub const ML_FLOOR: &str = "#Floor";
    pub const ML_EXISTS: &str = "#Exists";
    pub const ML_FORALL: &str = "#Forall";
    pub const CTL_AG: &str = "#AG";
    pub const RL_WEF: &str = "weakExistsFinally";
    pub const RL_WAF: &str = "weakAlwaysFinally";

    /// Labels of the matching-logic connectives. Productions carrying one of these never
    /// produce symbols or structural axioms.
    pub const BUILTIN: &[&str] = &[
        ML_BOTTOM, ML_TOP, ML_NOT, ML_OR, ML_AND, ML_IMPLIES, ML_EQUALS, ML_CEIL, ML_FLOOR,
        ML_EXISTS, ML_FORALL, CTL_AG, RL_WEF, RL_WAF,
    ];
}

/// A symbol label, optionally instantiated at some sorts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "KLabelRepr")]
pub struct KLabel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Sort>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KLabelRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        params: Vec<Sort>,
    },
}

impl From<KLabelRepr> for KLabel {
    fn from(repr: KLabelRepr) -> Self {
        match repr {
            KLabelRepr::Name(name) => KLabel::new(name),
            KLabelRepr::Full { name, params } => KLabel { name, params },
        }
    }
}

impl KLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![],
        }
    }

    pub fn with_params(name: impl Into<String>, params: Vec<Sort>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn is_builtin(&self) -> bool {
        is_builtin_label(&self.name)
    }

    pub fn is_inj(&self) -> bool {
        self.name == klabels::INJ
    }
}

pub fn is_builtin_label(name: &str) -> bool {
    klabels::BUILTIN.contains(&name)
}

impl fmt::Display for KLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "{{")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", param)?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}
