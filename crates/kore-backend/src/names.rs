// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! KORE names of sorts, labels and variables.

use crate::error::{KoreError, Result};
use crate::escape::escape_name;
use crate::kore::{KoreSort, Pattern};
use k_model::{klabels, sorts, KLabel, KVariable, Production, Sort, SortHead};

/// The KORE form of `sort`. Sorts listed in `params` are the sort variables of the enclosing
/// declaration and render as variables.
pub fn kore_sort(sort: &Sort, params: &[Sort]) -> KoreSort {
    if let Some(var) = sort.sort_variable() {
        return KoreSort::var(var);
    }
    let name = format!("Sort{}", escape_name(&sort.name));
    if params.contains(sort) {
        KoreSort::Var(name)
    } else {
        KoreSort::app(
            name,
            sort.params.iter().map(|p| kore_sort(p, params)).collect(),
        )
    }
}

/// A sort rendered outside any parametric declaration.
pub fn sort_of(sort: &Sort) -> KoreSort {
    kore_sort(sort, &[])
}

/// A sort head applied to its generic parameters, for sort declarations.
pub fn kore_sort_head(head: &SortHead) -> (String, Vec<KoreSort>) {
    let params = head.generic_params();
    let name = format!("Sort{}", escape_name(&head.name));
    let args = params.iter().map(|p| kore_sort(p, &params)).collect();
    (name, args)
}

/// The KORE connective for a built-in label.
pub fn connective(label: &str) -> Result<&'static str> {
    Ok(match label {
        klabels::ML_BOTTOM => "\\bottom",
        klabels::ML_TOP => "\\top",
        klabels::ML_OR => "\\or",
        klabels::ML_AND => "\\and",
        klabels::ML_NOT => "\\not",
        klabels::ML_FLOOR => "\\floor",
        klabels::ML_CEIL => "\\ceil",
        klabels::ML_EQUALS => "\\equals",
        klabels::ML_IMPLIES => "\\implies",
        klabels::ML_EXISTS => "\\exists",
        klabels::ML_FORALL => "\\forall",
        klabels::CTL_AG => "allPathGlobally",
        klabels::RL_WEF => "weakExistsFinally",
        klabels::RL_WAF => "weakAlwaysFinally",
        other => {
            return Err(KoreError::UnsupportedConnective {
                label: other.to_string(),
            })
        }
    })
}

/// The head of an application of `label` in a term: `inj`, a connective or `Lbl<name>`.
pub fn term_label_head(label: &KLabel) -> Result<String> {
    if label.is_inj() {
        Ok(label.name.clone())
    } else if label.is_builtin() {
        connective(&label.name).map(str::to_string)
    } else {
        Ok(symbol_name(&label.name))
    }
}

/// `Lbl<name>`, or `inj` unchanged. Declarations never involve connectives.
pub fn symbol_name(label: &str) -> String {
    if label == klabels::INJ {
        label.to_string()
    } else {
        format!("Lbl{}", escape_name(label))
    }
}

/// The sort arguments of `label` inside the declaration of `prod`.
pub fn label_params(label: &KLabel, prod: &Production) -> Vec<KoreSort> {
    label
        .params
        .iter()
        .map(|p| kore_sort(p, &prod.params))
        .collect()
}

/// The parameters of `label` as the symbol of `prod`. A label without sort arguments takes the
/// production's own parameters.
pub fn symbol_params(label: &KLabel, prod: &Production) -> Vec<KoreSort> {
    if label.params.is_empty() {
        prod.params.iter().map(|p| kore_sort(p, &prod.params)).collect()
    } else {
        label_params(label, prod)
    }
}

/// The parameters a production's symbol is declared with.
pub fn declared_params(prod: &Production) -> Vec<KoreSort> {
    match &prod.klabel {
        Some(label) => symbol_params(label, prod),
        None => prod.params.iter().map(|p| kore_sort(p, &prod.params)).collect(),
    }
}

/// `label` applied to `args` inside the declaration of `prod`.
pub fn symbol_application(label: &KLabel, prod: &Production, args: Vec<Pattern>) -> Pattern {
    Pattern::app(symbol_name(&label.name), symbol_params(label, prod), args)
}

/// `Lbl<name>{params}()`, the nullary application used to refer to a symbol.
pub fn symbol_reference(prod: &Production) -> Option<Pattern> {
    prod.klabel
        .as_ref()
        .map(|label| Pattern::app(symbol_name(&label.name), declared_params(prod), vec![]))
}

/// A variable of a rule: `Var<name>:<sort>`, or `@Var<name>:<sort>` for set variables.
pub fn kore_variable(var: &KVariable) -> Pattern {
    let (prefix, name) = match var.name.strip_prefix('@') {
        Some(rest) => ("@Var", rest),
        None => ("Var", var.name.as_str()),
    };
    let sort = var.sort().cloned().unwrap_or_else(sorts::k);
    Pattern::var(format!("{}{}", prefix, escape_name(name)), sort_of(&sort))
}

/// A generated variable such as `X0` or `Val`, of a sort inside the declaration of `prod`.
pub fn generated_var(name: impl Into<String>, sort: &Sort, prod: &Production) -> Pattern {
    Pattern::var(name, kore_sort(sort, &prod.params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use k_model::{Att, ProductionItem};

    #[test]
    fn sorts() {
        assert_eq!(sort_of(&Sort::new("Int")).to_string(), "SortInt{}");
        let s = Sort::new("S");
        let list = Sort::with_params("List", vec![s.clone()]);
        assert_eq!(kore_sort(&list, &[s]).to_string(), "SortList{SortS}");
        let param = Sort::with_params(sorts::SORT_PARAM, vec![Sort::new("Q0")]);
        assert_eq!(sort_of(&param).to_string(), "Q0");
        let (name, args) = kore_sort_head(&SortHead::new("Map", 2));
        assert_eq!(name, "SortMap");
        assert_eq!(args, vec![KoreSort::var("SortS0"), KoreSort::var("SortS1")]);
    }

    #[test]
    fn labels() {
        assert_eq!(term_label_head(&KLabel::new("inj")).unwrap(), "inj");
        assert_eq!(term_label_head(&KLabel::new("#And")).unwrap(), "\\and");
        assert_eq!(term_label_head(&KLabel::new("#AG")).unwrap(), "allPathGlobally");
        assert_eq!(term_label_head(&KLabel::new("_+Int_")).unwrap(), "Lbl'UndsPlus'Int'Unds'");
        assert!(matches!(
            connective("#Mu"),
            Err(KoreError::UnsupportedConnective { .. })
        ));
    }

    #[test]
    fn variables() {
        let x = KVariable::sorted("X", Sort::new("Int"));
        assert_eq!(kore_variable(&x).to_string(), "VarX:SortInt{}");
        let set = KVariable::new("@S");
        assert_eq!(kore_variable(&set).to_string(), "@VarS:SortK{}");
        let anon = KVariable::new("_Gen0");
        assert_eq!(kore_variable(&anon).to_string(), "Var'Unds'Gen0:SortK{}");
    }

    #[test]
    fn symbol_references_use_declared_params() {
        let s = Sort::new("S");
        let mut prod = Production::new(
            Some(KLabel::new(".List")),
            Sort::with_params("List", vec![s.clone()]),
            vec![ProductionItem::Terminal { value: ".List".into() }],
            Att::new(),
        );
        prod.params = vec![s];
        assert_eq!(
            symbol_reference(&prod).unwrap().to_string(),
            "Lbl'Stop'List{SortS}()"
        );
    }
}
