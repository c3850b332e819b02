// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use k_model::{Att, AttKey};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Hook namespaces implemented by every backend.
pub const BUILTIN_HOOK_NAMESPACES: &[&str] = &[
    "BOOL",
    "BUFFER",
    "BYTES",
    "FFI",
    "FLOAT",
    "INT",
    "IO",
    "JSON",
    "KEQUAL",
    "KREFLECTION",
    "LIST",
    "MAP",
    "MINT",
    "RANGEMAP",
    "SET",
    "STRING",
    "SUBSTITUTION",
    "UNIFICATION",
];

/// Options of the translation. Usually loaded from a toml file and refined by command line
/// flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslationOptions {
    /// Guard each rewrite rule with the negation of all higher-priority left-hand sides,
    /// expressed through per-priority aliases.
    pub enable_priority_groups: bool,
    /// Drop simplification rules for `#Ceil`.
    pub disable_ceil_simplification_rules: bool,
    /// Translate `heat` and `cool` rules as equations.
    pub heat_cool_equations: bool,
    /// Additional hook namespaces the target backend implements.
    pub hook_namespaces: Vec<String>,
}

impl TranslationOptions {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid translation options")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read options file `{}`", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("in options file `{}`", path.display()))
    }

    /// Whether the `hook` of a production names a namespace that is actually implemented.
    pub fn is_real_hook(&self, att: &Att) -> bool {
        let Some(hook) = att.get_str(&AttKey::Hook) else {
            return false;
        };
        let namespace = hook.split('.').next().unwrap_or(hook);
        BUILTIN_HOOK_NAMESPACES.contains(&namespace)
            || self.hook_namespaces.iter().any(|ns| ns == namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_toml() {
        let options = TranslationOptions::from_toml_str(
            "enable_priority_groups = true\nhook_namespaces = [\"KRYPTO\"]\n",
        )
        .unwrap();
        assert!(options.enable_priority_groups);
        assert!(!options.heat_cool_equations);
        assert_eq!(options.hook_namespaces, vec!["KRYPTO".to_string()]);
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(TranslationOptions::from_toml_str("antileft = true").is_err());
    }

    #[test]
    fn real_hooks() {
        let options = TranslationOptions {
            hook_namespaces: vec!["KRYPTO".into()],
            ..Default::default()
        };
        let hook = |h: &str| Att::new().add_str(AttKey::Hook, h);
        assert!(options.is_real_hook(&hook("INT.add")));
        assert!(options.is_real_hook(&hook("KRYPTO.sha256")));
        assert!(!options.is_real_hook(&hook("MYLIB.frob")));
        assert!(!options.is_real_hook(&Att::new()));
    }
}
