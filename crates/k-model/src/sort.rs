// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Sorts and sort heads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Names of the sorts the backend treats specially.
pub mod sorts {
    use super::Sort;

    pub const K: &str = "K";
    pub const KITEM: &str = "KItem";
    pub const BOOL: &str = "Bool";
    pub const GENERATED_TOP_CELL: &str = "GeneratedTopCell";
    /// Wrapper sort marking a sort variable introduced by sort-injection insertion.
    pub const SORT_PARAM: &str = "#SortParam";

    pub fn k() -> Sort {
        Sort::new(K)
    }

    pub fn k_item() -> Sort {
        Sort::new(KITEM)
    }

    pub fn bool() -> Sort {
        Sort::new(BOOL)
    }

    pub fn generated_top_cell() -> Sort {
        Sort::new(GENERATED_TOP_CELL)
    }
}

/// A (possibly parametric) sort, e.g. `Int` or `Map{Int, Bool}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "SortRepr")]
pub struct Sort {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Sort>,
}

/// Accepts either a bare sort name or the full structure.
#[derive(Deserialize)]
#[serde(untagged)]
enum SortRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        params: Vec<Sort>,
    },
}

impl From<SortRepr> for Sort {
    fn from(repr: SortRepr) -> Self {
        match repr {
            SortRepr::Name(name) => Sort::new(name),
            SortRepr::Full { name, params } => Sort { name, params },
        }
    }
}

impl Sort {
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

    pub fn head(&self) -> SortHead {
        SortHead::new(self.name.clone(), self.params.len())
    }

    /// Sorts whose name is a numeral, such as the width of a machine integer sort.
    pub fn is_nat(&self) -> bool {
        !self.name.is_empty() && self.name.chars().all(|c| c.is_ascii_digit())
    }

    pub fn is_k(&self) -> bool {
        self.name == sorts::K && self.params.is_empty()
    }

    /// If this sort is `#SortParam{Q}`, the name of the sort variable `Q`.
    pub fn sort_variable(&self) -> Option<&str> {
        if self.name == sorts::SORT_PARAM {
            self.params.first().map(|p| p.name.as_str())
        } else {
            None
        }
    }

    /// Replace every occurrence of a key of `subst` by its value.
    pub fn substitute(&self, subst: &BTreeMap<&Sort, &Sort>) -> Sort {
        if let Some(replacement) = subst.get(self) {
            return (*replacement).clone();
        }
        Sort {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.substitute(subst)).collect(),
        }
    }
}

impl fmt::Display for Sort {
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

/// A sort constructor: a name together with its number of parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SortHead {
    pub name: String,
    #[serde(default)]
    pub arity: usize,
}

impl SortHead {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// The head applied to the generic parameters `S0 .. Sn`.
    pub fn generic_sort(&self) -> Sort {
        Sort::with_params(self.name.clone(), self.generic_params())
    }

    pub fn generic_params(&self) -> Vec<Sort> {
        (0..self.arity).map(|i| Sort::new(format!("S{}", i))).collect()
    }
}

impl fmt::Display for SortHead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arity == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.name, self.arity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_accepts_bare_name_or_structure() {
        let bare: Sort = serde_json::from_str("\"Int\"").unwrap();
        assert_eq!(bare, Sort::new("Int"));

        let full: Sort =
            serde_json::from_str(r#"{"name": "Map", "params": ["Int", "Bool"]}"#).unwrap();
        assert_eq!(full.to_string(), "Map{Int, Bool}");
        assert_eq!(full.head(), SortHead::new("Map", 2));
    }

    #[test]
    fn sort_param_wrapper_names_its_variable() {
        let wrapped = Sort::with_params(sorts::SORT_PARAM, vec![Sort::new("Q0")]);
        assert_eq!(wrapped.sort_variable(), Some("Q0"));
        assert_eq!(Sort::new("Int").sort_variable(), None);
    }

    #[test]
    fn numeral_sorts_are_nat() {
        assert!(Sort::new("64").is_nat());
        assert!(!Sort::new("Int").is_nat());
        assert!(!Sort::new("").is_nat());
    }

    #[test]
    fn substitute_replaces_parameters() {
        let s = Sort::new("S");
        let int = Sort::new("Int");
        let subst = BTreeMap::from([(&s, &int)]);
        let list = Sort::with_params("List", vec![s.clone()]);
        assert_eq!(list.substitute(&subst), Sort::with_params("List", vec![int.clone()]));
    }
}
