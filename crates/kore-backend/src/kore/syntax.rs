// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! KORE abstract syntax.
//!
//! Every name stored here is already escaped; rendering is plain concatenation.

use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KoreSort {
    /// A sort variable such as `R` or `S0`.
    Var(String),
    App { name: String, args: Vec<KoreSort> },
}

impl KoreSort {
    pub fn var(name: impl Into<String>) -> Self {
        KoreSort::Var(name.into())
    }

    pub fn app(name: impl Into<String>, args: Vec<KoreSort>) -> Self {
        KoreSort::App {
            name: name.into(),
            args,
        }
    }

    /// The sort variable conventionally used for the result sort of connectives.
    pub fn r() -> Self {
        KoreSort::var("R")
    }
}

impl fmt::Display for KoreSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KoreSort::Var(name) => write!(f, "{}", name),
            KoreSort::App { name, args } => write!(f, "{}{{{}}}", name, args.iter().join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pattern {
    /// `name:sort`. The name carries its prefix (`Var`, `@Var`, `X0`, ...).
    Var { name: String, sort: KoreSort },
    /// `head{params}(args)`, covering symbols, aliases and connectives alike.
    App {
        head: String,
        params: Vec<KoreSort>,
        args: Vec<Pattern>,
    },
    /// A string literal, already quoted.
    Str(String),
}

impl Pattern {
    pub fn var(name: impl Into<String>, sort: KoreSort) -> Self {
        Pattern::Var {
            name: name.into(),
            sort,
        }
    }

    pub fn app(head: impl Into<String>, params: Vec<KoreSort>, args: Vec<Pattern>) -> Self {
        Pattern::App {
            head: head.into(),
            params,
            args,
        }
    }

    pub fn str(quoted: impl Into<String>) -> Self {
        Pattern::Str(quoted.into())
    }

    pub fn top(sort: KoreSort) -> Self {
        Pattern::app("\\top", vec![sort], vec![])
    }

    pub fn bottom(sort: KoreSort) -> Self {
        Pattern::app("\\bottom", vec![sort], vec![])
    }

    pub fn not(sort: KoreSort, p: Pattern) -> Self {
        Pattern::app("\\not", vec![sort], vec![p])
    }

    pub fn and(sort: KoreSort, a: Pattern, b: Pattern) -> Self {
        Pattern::app("\\and", vec![sort], vec![a, b])
    }

    pub fn or(sort: KoreSort, a: Pattern, b: Pattern) -> Self {
        Pattern::app("\\or", vec![sort], vec![a, b])
    }

    pub fn implies(sort: KoreSort, a: Pattern, b: Pattern) -> Self {
        Pattern::app("\\implies", vec![sort], vec![a, b])
    }

    pub fn equals(operand: KoreSort, result: KoreSort, a: Pattern, b: Pattern) -> Self {
        Pattern::app("\\equals", vec![operand, result], vec![a, b])
    }

    pub fn member(operand: KoreSort, result: KoreSort, var: Pattern, p: Pattern) -> Self {
        Pattern::app("\\in", vec![operand, result], vec![var, p])
    }

    pub fn exists(sort: KoreSort, var: Pattern, body: Pattern) -> Self {
        Pattern::app("\\exists", vec![sort], vec![var, body])
    }

    pub fn rewrites(sort: KoreSort, left: Pattern, right: Pattern) -> Self {
        Pattern::app("\\rewrites", vec![sort], vec![left, right])
    }

    pub fn dv(sort: KoreSort, quoted: impl Into<String>) -> Self {
        Pattern::app("\\dv", vec![sort], vec![Pattern::str(quoted)])
    }

    pub fn inj(from: KoreSort, to: KoreSort, p: Pattern) -> Self {
        Pattern::app("inj", vec![from, to], vec![p])
    }

    /// Right-nested conjunction terminated by `\top`.
    pub fn and_all(sort: KoreSort, items: impl IntoIterator<Item = Pattern>) -> Self {
        Self::fold_right(items, Pattern::top(sort.clone()), |a, b| {
            Pattern::and(sort.clone(), a, b)
        })
    }

    /// Right-nested disjunction terminated by `\bottom`.
    pub fn or_all(sort: KoreSort, items: impl IntoIterator<Item = Pattern>) -> Self {
        Self::fold_right(items, Pattern::bottom(sort.clone()), |a, b| {
            Pattern::or(sort.clone(), a, b)
        })
    }

    /// `\exists` over each of `vars` in order, the first one outermost.
    pub fn exists_all(sort: KoreSort, vars: impl IntoIterator<Item = Pattern>, body: Pattern) -> Self {
        Self::fold_right(vars, body, |var, body| {
            Pattern::exists(sort.clone(), var, body)
        })
    }

    fn fold_right(
        items: impl IntoIterator<Item = Pattern>,
        last: Pattern,
        mut combine: impl FnMut(Pattern, Pattern) -> Pattern,
    ) -> Pattern {
        let items: Vec<Pattern> = items.into_iter().collect();
        items
            .into_iter()
            .rev()
            .fold(last, |acc, item| combine(item, acc))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Var { name, sort } => write!(f, "{}:{}", name, sort),
            Pattern::App { head, params, args } => write!(
                f,
                "{}{{{}}}({})",
                head,
                params.iter().join(", "),
                args.iter().join(", ")
            ),
            Pattern::Str(s) => write!(f, "{}", s),
        }
    }
}

/// The attribute list of a sentence: `[a{}(..), b{}()]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(pub Vec<Pattern>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, p: Pattern) {
        self.0.push(p);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentence {
    Import {
        module: String,
        att: Attributes,
    },
    Sort {
        hooked: bool,
        name: String,
        params: Vec<KoreSort>,
        att: Attributes,
    },
    Symbol {
        hooked: bool,
        name: String,
        params: Vec<KoreSort>,
        args: Vec<KoreSort>,
        result: KoreSort,
        att: Attributes,
    },
    Alias {
        name: String,
        params: Vec<KoreSort>,
        args: Vec<KoreSort>,
        result: KoreSort,
        /// The applied alias, its arguments being variables.
        lhs: Pattern,
        rhs: Pattern,
        att: Attributes,
    },
    Axiom {
        params: Vec<KoreSort>,
        pattern: Pattern,
        att: Attributes,
    },
    Claim {
        params: Vec<KoreSort>,
        pattern: Pattern,
        att: Attributes,
    },
}

impl Sentence {
    pub fn axiom(params: Vec<KoreSort>, pattern: Pattern, att: Attributes) -> Self {
        Sentence::Axiom {
            params,
            pattern,
            att,
        }
    }

    pub fn claim(params: Vec<KoreSort>, pattern: Pattern, att: Attributes) -> Self {
        Sentence::Claim {
            params,
            pattern,
            att,
        }
    }

    /// The sentence without its attribute list.
    pub fn head(&self) -> String {
        fn hooked_prefix(hooked: bool) -> &'static str {
            if hooked {
                "hooked-"
            } else {
                ""
            }
        }
        match self {
            Sentence::Import { module, .. } => format!("import {}", module),
            Sentence::Sort {
                hooked,
                name,
                params,
                ..
            } => format!(
                "{}sort {}{{{}}}",
                hooked_prefix(*hooked),
                name,
                params.iter().join(", ")
            ),
            Sentence::Symbol {
                hooked,
                name,
                params,
                args,
                result,
                ..
            } => format!(
                "{}symbol {}{{{}}}({}) : {}",
                hooked_prefix(*hooked),
                name,
                params.iter().join(", "),
                args.iter().join(", "),
                result
            ),
            Sentence::Alias {
                name,
                params,
                args,
                result,
                lhs,
                rhs,
                ..
            } => format!(
                "alias {}{{{}}}({}) : {} where {} := {}",
                name,
                params.iter().join(", "),
                args.iter().join(", "),
                result,
                lhs,
                rhs
            ),
            Sentence::Axiom { params, pattern, .. } => {
                format!("axiom{{{}}} {}", params.iter().join(", "), pattern)
            }
            Sentence::Claim { params, pattern, .. } => {
                format!("claim{{{}}} {}", params.iter().join(", "), pattern)
            }
        }
    }

    pub fn att(&self) -> &Attributes {
        match self {
            Sentence::Import { att, .. }
            | Sentence::Sort { att, .. }
            | Sentence::Symbol { att, .. }
            | Sentence::Alias { att, .. }
            | Sentence::Axiom { att, .. }
            | Sentence::Claim { att, .. } => att,
        }
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.head(), self.att())
    }
}
