// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! The serialized input of the generator.

use anyhow::{Context, Result};
use k_model::{KLabel, Module};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An elaborated definition: the main module, the label initializing its configuration, the
/// text inserted before the module and an optional module of claims to prove against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub module: Module,
    pub top_cell_initializer: KLabel,
    #[serde(default)]
    pub prelude: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_module: Option<Module>,
}

impl Definition {
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid definition")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read definition `{}`", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in definition `{}`", path.display()))
    }
}
