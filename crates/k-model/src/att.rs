// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Attributes attached to sorts, productions, rules and terms.
//!
//! An attribute set maps a key from a closed vocabulary to a tagged value. Keys outside the
//! vocabulary are user groups; they only ever carry a flag and are emitted collectively as a
//! single `group` attribute.

use crate::sort::Sort;
use crate::term::K;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

macro_rules! att_keys {
    ($($variant:ident => $key:literal),* $(,)?) => {
        /// Attribute keys understood by the backend.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum AttKey {
            $($variant,)*
            /// A free-form key chosen by the definition author.
            UserGroup(String),
        }

        impl AttKey {
            /// The key as it appears in definitions and in emitted attributes.
            pub fn key(&self) -> &str {
                match self {
                    $(AttKey::$variant => $key,)*
                    AttKey::UserGroup(name) => name,
                }
            }

            pub fn from_key(key: &str) -> AttKey {
                match key {
                    $($key => AttKey::$variant,)*
                    other => AttKey::UserGroup(other.to_string()),
                }
            }
        }
    };
}

att_keys! {
    Function => "function",
    Functional => "functional",
    Total => "total",
    Constructor => "constructor",
    Injective => "injective",
    Assoc => "assoc",
    Comm => "comm",
    Idem => "idem",
    Unit => "unit",
    Element => "element",
    Concat => "concat",
    Hook => "hook",
    Token => "token",
    Bracket => "bracket",
    BracketLabel => "bracketLabel",
    Overload => "overload",
    MlBinder => "mlBinder",
    SortParams => "sortParams",
    HasDomainValues => "hasDomainValues",
    Nat => "nat",
    KLabel => "klabel",
    Symbol => "symbol",
    Format => "format",
    Left => "left",
    Right => "right",
    Cell => "cell",
    Topcell => "topcell",
    Initializer => "initializer",
    Impure => "impure",
    Priority => "priority",
    Owise => "owise",
    Simplification => "simplification",
    Macro => "macro",
    MacroRec => "macro-rec",
    Alias => "alias",
    AliasRec => "alias-rec",
    OnePath => "one-path",
    AllPath => "all-path",
    Kore => "kore",
    NonExecutable => "non-executable",
    Anywhere => "anywhere",
    Heat => "heat",
    Cool => "cool",
    Concrete => "concrete",
    Symbolic => "symbolic",
    Label => "label",
    Group => "group",
    Source => "source",
    Location => "location",
    UniqueId => "UNIQUE_ID",
    Digest => "digest",
    Sort => "sort",
    Anonymous => "anonymous",
    Fresh => "fresh",
}

impl fmt::Display for AttKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// The value carried by an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttValue {
    Flag,
    Str(String),
    Sort(Sort),
    Term(K),
    Terms(Vec<K>),
}

impl fmt::Display for AttValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttValue::Flag => Ok(()),
            AttValue::Str(s) => write!(f, "{:?}", s),
            AttValue::Sort(sort) => write!(f, "{}", sort),
            AttValue::Term(k) => write!(f, "{}", k),
            AttValue::Terms(ks) => write!(f, "{}", ks.iter().join(", ")),
        }
    }
}

/// An attribute set. Iteration order is the key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "AttRepr", into = "AttRepr")]
pub struct Att(BTreeMap<AttKey, AttValue>);

impl Att {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, key: &AttKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &AttKey) -> Option<&AttValue> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &AttKey) -> Option<&str> {
        match self.0.get(key) {
            Some(AttValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn get_sort(&self, key: &AttKey) -> Option<&Sort> {
        match self.0.get(key) {
            Some(AttValue::Sort(s)) => Some(s),
            _ => None,
        }
    }

    /// The sort annotation of a term.
    pub fn sort(&self) -> Option<&Sort> {
        self.get_sort(&AttKey::Sort)
    }

    pub fn insert(&mut self, key: AttKey, value: AttValue) {
        self.0.insert(key, value);
    }

    pub fn add(mut self, key: AttKey, value: AttValue) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn add_flag(self, key: AttKey) -> Self {
        self.add(key, AttValue::Flag)
    }

    pub fn add_str(self, key: AttKey, value: impl Into<String>) -> Self {
        self.add(key, AttValue::Str(value.into()))
    }

    pub fn remove(mut self, key: &AttKey) -> Self {
        self.0.remove(key);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttKey, &AttValue)> {
        self.0.iter()
    }

    /// User groups of this attribute set, in key order.
    pub fn user_groups(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(|key| match key {
            AttKey::UserGroup(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// Fold every user group into the `group` attribute so that author-chosen keys can never
    /// clash with keys the backend understands.
    pub fn with_user_groups_as_group(&self) -> Att {
        let groups: Vec<String> = self.user_groups().map(str::to_string).collect();
        if groups.is_empty() {
            return self.clone();
        }
        let mut result = Att(self
            .0
            .iter()
            .filter(|(key, _)| !matches!(key, AttKey::UserGroup(_)))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect());
        let mut all = vec![];
        if let Some(existing) = self.get_str(&AttKey::Group) {
            all.extend(existing.split(',').map(|g| g.trim().to_string()).filter(|g| !g.is_empty()));
        }
        all.extend(groups);
        let joined = all.into_iter().unique().join(",");
        result.insert(AttKey::Group, AttValue::Str(joined));
        result
    }
}

impl fmt::Display for Att {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                AttValue::Flag => write!(f, "{}", key)?,
                other => write!(f, "{}({})", key, other)?,
            }
        }
        write!(f, "]")
    }
}

/// Serialized form: an object from attribute key to value, where `true` is a flag, strings and
/// numbers are string values and `{"sort": ..}`, `{"term": ..}`, `{"terms": [..]}` carry the
/// structured kinds.
#[derive(Serialize, Deserialize)]
struct AttRepr(BTreeMap<String, AttValueRepr>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AttValueRepr {
    Flag(bool),
    Int(i64),
    Str(String),
    Typed(TypedAttValue),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TypedAttValue {
    Sort(Sort),
    Term(K),
    Terms(Vec<K>),
}

impl From<AttRepr> for Att {
    fn from(repr: AttRepr) -> Self {
        let mut att = Att::new();
        for (key, value) in repr.0 {
            let value = match value {
                AttValueRepr::Flag(false) => continue,
                AttValueRepr::Flag(true) => AttValue::Flag,
                AttValueRepr::Int(n) => AttValue::Str(n.to_string()),
                AttValueRepr::Str(s) => AttValue::Str(s),
                AttValueRepr::Typed(TypedAttValue::Sort(s)) => AttValue::Sort(s),
                AttValueRepr::Typed(TypedAttValue::Term(k)) => AttValue::Term(k),
                AttValueRepr::Typed(TypedAttValue::Terms(ks)) => AttValue::Terms(ks),
            };
            att.insert(AttKey::from_key(&key), value);
        }
        att
    }
}

impl From<Att> for AttRepr {
    fn from(att: Att) -> Self {
        AttRepr(
            att.0
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        AttValue::Flag => AttValueRepr::Flag(true),
                        AttValue::Str(s) => AttValueRepr::Str(s),
                        AttValue::Sort(s) => AttValueRepr::Typed(TypedAttValue::Sort(s)),
                        AttValue::Term(k) => AttValueRepr::Typed(TypedAttValue::Term(k)),
                        AttValue::Terms(ks) => AttValueRepr::Typed(TypedAttValue::Terms(ks)),
                    };
                    (key.key().to_string(), value)
                })
                .collect(),
        )
    }
}
