// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! KORE backend
//!
//! Translates an elaborated K module into KORE: a syntax theory with the signature, a
//! semantics theory with the signature, the structural axioms and the rules, and a separate
//! stream for macros. Specification modules translate to a module importing the definition.

pub mod attributes;
pub mod axioms;
pub mod diagnostics;
pub mod encoder;
pub mod error;
pub mod escape;
pub mod kore;
pub mod names;
pub mod options;
pub mod priority;
pub mod rules;
pub mod symbols;
pub mod translator;

pub use diagnostics::{DiagnosticCollector, DiagnosticSink};
pub use error::{KoreError, Result};
pub use options::TranslationOptions;
pub use translator::{KoreOutput, ModuleToKore};
