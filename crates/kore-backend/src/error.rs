// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use k_model::ModelError;
use thiserror::Error;

/// Fatal translation errors. Translation stops at the first one.
#[derive(Debug, Error)]
pub enum KoreError {
    #[error("{message}: {production}")]
    IllFormedProduction { message: String, production: String },

    #[error(
        "cannot encode equations with existential variables to KORE.\n \
         If this is desired, please use #Exists with regular variables.\n \
         Offending variables: {variables}\n context: {rule}"
    )]
    ExistentialsInEquation { variables: String, rule: String },

    #[error("nested quantifier over anonymous variables in {term}")]
    NestedAnonymousBinder { term: String },

    #[error("unsupported kore connective in rule: {label}")]
    UnsupportedConnective { label: String },

    #[error("no free variable found for {variable} in {rule}")]
    UnboundAttributeVariable { variable: String, rule: String },

    #[error("cannot yet translate {term} to kore: {reason}")]
    Untranslatable { term: String, reason: String },

    #[error("collection sort {sort} has no production with an `element` attribute")]
    MissingConcatProduction { sort: String },

    #[error("owise rule for {label} does not match the arity of {sibling}")]
    OwiseArityMismatch { label: String, sibling: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl KoreError {
    pub fn ill_formed(message: &str, production: &impl std::fmt::Display) -> Self {
        KoreError::IllFormedProduction {
            message: message.to_string(),
            production: production.to_string(),
        }
    }

    pub fn untranslatable(term: &impl std::fmt::Display, reason: &str) -> Self {
        KoreError::Untranslatable {
            term: term.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, KoreError>;
