// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! K Model
//!
//! The elaborated form of a K definition as handed to the KORE backend: sorts, labels,
//! attributes, terms, productions, rules and claims, plus the derived relations (subsorting,
//! overloading, function rules) that the backend queries while translating.

pub mod att;
pub mod error;
pub mod index;
pub mod inject;
pub mod label;
pub mod module;
pub mod production;
pub mod refresh;
pub mod rule;
pub mod sort;
pub mod term;

pub use att::{Att, AttKey, AttValue};
pub use error::{ModelError, Result};
pub use index::ModuleIndex;
pub use inject::{InjectionPass, SortAnnotator};
pub use label::{klabels, KLabel};
pub use module::{Module, SortDecl};
pub use production::{Production, ProductionItem};
pub use refresh::refresh_rules;
pub use rule::{collect_free_variables, priority_of, Rule, RuleKind, SentenceType};
pub use sort::{sorts, Sort, SortHead};
pub use term::{KVariable, K};
