// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Rules and claims.

use crate::att::{Att, AttKey};
use crate::error::{ModelError, Result};
use crate::term::{KVariable, K};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a rule without a `priority` attribute.
pub const DEFAULT_PRIORITY: i32 = 50;
/// Priority of an `owise` rule without a `priority` attribute.
pub const OWISE_PRIORITY: i32 = 200;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    #[default]
    Rule,
    Claim,
}

/// How a rewrite or claim relates its two sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SentenceType {
    #[default]
    RewriteRule,
    OnePath,
    AllPath,
}

impl SentenceType {
    pub fn from_att(att: &Att) -> Option<SentenceType> {
        if att.contains(&AttKey::OnePath) {
            Some(SentenceType::OnePath)
        } else if att.contains(&AttKey::AllPath) {
            Some(SentenceType::AllPath)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub kind: RuleKind,
    pub body: K,
    #[serde(default = "K::bool_true")]
    pub requires: K,
    #[serde(default = "K::bool_true")]
    pub ensures: K,
    #[serde(default, skip_serializing_if = "Att::is_empty")]
    pub att: Att,
}

impl Rule {
    pub fn new(body: K, requires: K, ensures: K, att: Att) -> Self {
        Self {
            kind: RuleKind::Rule,
            body,
            requires,
            ensures,
            att,
        }
    }

    pub fn claim(body: K, requires: K, ensures: K, att: Att) -> Self {
        Self {
            kind: RuleKind::Claim,
            ..Rule::new(body, requires, ensures, att)
        }
    }

    pub fn is_claim(&self) -> bool {
        self.kind == RuleKind::Claim
    }

    pub fn left(&self) -> K {
        self.body.to_left()
    }

    pub fn right(&self) -> K {
        self.body.to_right()
    }

    pub fn priority(&self) -> Result<i32> {
        priority_of(&self.att)
    }

    pub fn is_macro(&self) -> bool {
        [AttKey::Macro, AttKey::MacroRec, AttKey::Alias, AttKey::AliasRec]
            .iter()
            .any(|key| self.att.contains(key))
    }

    /// Variables introduced on the right-hand side or in `ensures`, sorted by name.
    pub fn existentials(&self) -> Vec<KVariable> {
        let right = self.right();
        let existentials: Vec<KVariable> = self
            .ensures
            .variables()
            .into_iter()
            .chain(right.variables())
            .filter(|v| v.is_existential())
            .unique_by(|v| v.name.clone())
            .cloned()
            .sorted_by(|a, b| a.name.cmp(&b.name))
            .collect();
        existentials
    }

    /// Variables of the left-hand side and the side condition, sorted by name.
    pub fn free_variables(&self) -> Vec<KVariable> {
        let left = self.left();
        collect_free_variables(&self.requires, &left)
    }

    /// Apply `f` to every term of the rule.
    pub fn map_terms(&self, mut f: impl FnMut(&K) -> K) -> Rule {
        Rule {
            kind: self.kind,
            body: f(&self.body),
            requires: f(&self.requires),
            ensures: f(&self.ensures),
            att: self.att.clone(),
        }
    }
}

/// The integer priority of a sentence: its `priority` attribute, else 200 for `owise`, else 50.
pub fn priority_of(att: &Att) -> Result<i32> {
    if let Some(value) = att.get_str(&AttKey::Priority) {
        value
            .trim()
            .parse()
            .map_err(|_| ModelError::InvalidPriority {
                value: value.to_string(),
            })
    } else if att.contains(&AttKey::Owise) {
        Ok(OWISE_PRIORITY)
    } else {
        Ok(DEFAULT_PRIORITY)
    }
}

/// Variables occurring in `requires` or `left`, one per name, sorted by name.
pub fn collect_free_variables(requires: &K, left: &K) -> Vec<KVariable> {
    requires
        .variables()
        .into_iter()
        .chain(left.variables())
        .unique_by(|v| v.name.clone())
        .cloned()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect()
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self.kind {
            RuleKind::Rule => "rule",
            RuleKind::Claim => "claim",
        };
        write!(f, "{} {}", keyword, self.body)?;
        if !self.requires.is_true() {
            write!(f, " requires {}", self.requires)?;
        }
        if !self.ensures.is_true() {
            write!(f, " ensures {}", self.ensures)?;
        }
        if !self.att.is_empty() {
            write!(f, " {}", self.att)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::att::AttValue;
    use crate::label::KLabel;

    fn rule(body: K, att: Att) -> Rule {
        Rule::new(body, K::bool_true(), K::bool_true(), att)
    }

    #[test]
    fn priority_defaults() {
        let plain = rule(K::var("X"), Att::new());
        assert_eq!(plain.priority().unwrap(), DEFAULT_PRIORITY);

        let owise = rule(K::var("X"), Att::new().add_flag(AttKey::Owise));
        assert_eq!(owise.priority().unwrap(), OWISE_PRIORITY);

        let explicit = rule(
            K::var("X"),
            Att::new().add_flag(AttKey::Owise).add_str(AttKey::Priority, "10"),
        );
        assert_eq!(explicit.priority().unwrap(), 10);
    }

    #[test]
    fn invalid_priority_is_an_error() {
        let bad = rule(K::var("X"), Att::new().add_str(AttKey::Priority, "high"));
        assert!(matches!(
            bad.priority(),
            Err(ModelError::InvalidPriority { value }) if value == "high"
        ));
    }

    #[test]
    fn existentials_come_from_the_right_and_ensures() {
        let fresh = KVariable {
            name: "N".into(),
            att: Att::new().add(AttKey::Fresh, AttValue::Flag),
        };
        let body = K::rewrite(
            K::apply(KLabel::new("f"), vec![K::var("?Y")]),
            K::apply(KLabel::new("g"), vec![K::var("?Y"), K::var("X")]),
        );
        let claim = Rule::claim(body, K::bool_true(), K::Variable(fresh), Att::new());
        let names: Vec<_> = claim.existentials().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["?Y", "N"]);
    }

    #[test]
    fn free_variables_are_deduplicated_and_sorted() {
        let body = K::rewrite(
            K::apply(KLabel::new("f"), vec![K::var("B"), K::var("A"), K::var("B")]),
            K::var("C"),
        );
        let r = Rule::new(body, K::var("Z"), K::bool_true(), Att::new());
        let names: Vec<_> = r.free_variables().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["A", "B", "Z"]);
    }

    #[test]
    fn macro_attributes() {
        assert!(rule(K::var("X"), Att::new().add_flag(AttKey::AliasRec)).is_macro());
        assert!(!rule(K::var("X"), Att::new().add_flag(AttKey::Anywhere)).is_macro());
    }
}
