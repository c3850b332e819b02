// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid value for priority attribute: {value}. Must be an integer.")]
    InvalidPriority { value: String },

    #[error("no production found for label `{label}`")]
    MissingProduction { label: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
