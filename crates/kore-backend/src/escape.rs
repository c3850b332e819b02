// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Escaping of names and string literals for KORE.
//!
//! KORE identifiers are restricted to `[A-Za-z0-9'-]`. Names are encoded by keeping runs of
//! identifier characters and replacing every other UTF-16 unit by a four character code,
//! with `'` fencing the encoded runs. Every code has exactly four characters, so the encoding
//! can be read back unambiguously.

use once_cell::sync::Lazy;
use std::fmt::Write;

const FENCE: char = '\'';

/// Names that collide with KORE keywords.
const KEYWORDS: &[&str] = &[
    "module",
    "endmodule",
    "sort",
    "hooked-sort",
    "symbol",
    "hooked-symbol",
    "alias",
    "axiom",
];

/// Readable codes for printable ASCII punctuation. Characters without an entry fall back to
/// their hexadecimal code.
const DEFAULT_ENCODING: &[(u8, &str)] = &[
    (0x20, "Spce"),
    (0x21, "Bang"),
    (0x22, "Quot"),
    (0x23, "Hash"),
    (0x24, "Dolr"),
    (0x25, "Perc"),
    (0x26, "Amps"),
    (0x27, "Apos"),
    (0x28, "LPar"),
    (0x29, "RPar"),
    (0x2a, "Star"),
    (0x2b, "Plus"),
    (0x2c, "Comm"),
    (0x2e, "Stop"),
    (0x2f, "Slsh"),
    (0x3a, "Coln"),
    (0x3b, "SCln"),
    (0x3c, "Less"),
    (0x3d, "Eqls"),
    (0x3e, "Grtr"),
    (0x3f, "Ques"),
    (0x40, "AtSn"),
    (0x5b, "LSqB"),
    (0x5c, "Bash"),
    (0x5d, "RSqB"),
    (0x5e, "Hat-"),
    (0x5f, "Unds"),
    (0x60, "BQuo"),
    (0x7b, "LBra"),
    (0x7c, "Pipe"),
    (0x7d, "RBra"),
    (0x7e, "Tild"),
];

/// The table used for KORE, which spells a few operators differently.
static KORE_ENCODING: Lazy<[Option<&'static str>; 128]> = Lazy::new(|| {
    let mut table = [None; 128];
    for (code, name) in DEFAULT_ENCODING {
        table[*code as usize] = Some(*name);
    }
    table[0x26] = Some("And-");
    table[0x3c] = Some("-LT-");
    table[0x3e] = Some("-GT-");
    table[0x40] = Some("-AT-");
    table[0x5e] = Some("Xor-");
    table
});

fn is_ident_unit(unit: u16) -> bool {
    unit < 128 && {
        let c = unit as u8 as char;
        c.is_ascii_alphanumeric() || c == '-'
    }
}

/// Encode `name` as a KORE identifier fragment.
pub fn escape_name(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        return format!("{}{}Kywd{}", name, FENCE, FENCE);
    }
    let table = &*KORE_ENCODING;
    let mut out = String::with_capacity(name.len());
    let mut in_ident = true;
    for unit in name.encode_utf16() {
        if is_ident_unit(unit) {
            if !in_ident {
                in_ident = true;
                out.push(FENCE);
            }
            out.push(unit as u8 as char);
        } else {
            if in_ident {
                in_ident = false;
                out.push(FENCE);
            }
            match table.get(unit as usize).copied().flatten() {
                Some(code) => out.push_str(code),
                None => {
                    let _ = write!(out, "{:04x}", unit);
                }
            }
        }
    }
    if !in_ident {
        out.push(FENCE);
    }
    out
}

/// Quote `value` as a K string literal.
pub fn enquote_k_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            _ => push_code_point_escape(&mut out, c),
        }
    }
    out.push('"');
    out
}

/// Escape the code points above ASCII, leaving everything else untouched.
pub fn escape_non_ascii(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            push_code_point_escape(&mut out, c);
        }
    }
    out
}

fn push_code_point_escape(out: &mut String, c: char) {
    let code = c as u32;
    let _ = if code <= 0xff {
        write!(out, "\\x{:02x}", code)
    } else if code <= 0xffff {
        write!(out, "\\u{:04x}", code)
    } else {
        write!(out, "\\U{:08x}", code)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn plain_identifiers_are_unchanged() {
        assert_eq!(escape_name("Int"), "Int");
        assert_eq!(escape_name("is-Foo"), "is-Foo");
    }

    #[test]
    fn punctuation_is_fenced() {
        assert_eq!(escape_name("_+Int_"), "'UndsPlus'Int'Unds'");
        assert_eq!(escape_name("_<=Int_"), "'Unds-LT-Eqls'Int'Unds'");
        assert_eq!(escape_name("#Foo"), "'Hash'Foo");
        assert_eq!(escape_name("a&b"), "a'And-'b");
        assert_eq!(escape_name("x@y^z"), "x'-AT-'y'Xor-'z");
    }

    #[test]
    fn keywords_are_marked() {
        assert_eq!(escape_name("module"), "module'Kywd'");
        assert_eq!(escape_name("hooked-symbol"), "hooked-symbol'Kywd'");
        assert_eq!(escape_name("modules"), "modules");
    }

    #[test]
    fn unlisted_characters_use_hex_codes() {
        assert_eq!(escape_name("a\u{7}"), "a'0007'");
        assert_eq!(escape_name("λ"), "'03bb'");
        assert_eq!(escape_name("𝔸"), "'d835dd38'");
    }

    #[test]
    fn escaping_is_injective_on_punctuation_variants() {
        let names = [
            "_+_", "_-_", "_*_", "_/_", "_<_", "_>_", "_<=_", "_>=_", "_==_", "_=/=_", "_&_",
            "_|_", "_^_", "_%_", "_!_", "_?_", "_:_", "_;_", "_,_", "_._", "_~_", "_@_", "_$_",
            "_#_", "_'_", "_\"_", "_`_", "_(_", "_)_", "_[_", "_]_", "_{_", "_}_", "_\\_",
            "_ _", "__", "_", "-", "'", "''",
        ];
        let encoded: BTreeSet<String> = names.iter().map(|n| escape_name(n)).collect();
        assert_eq!(encoded.len(), names.len());
        for e in &encoded {
            assert!(e.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '\''));
        }
    }

    #[test]
    fn k_strings_are_quoted() {
        assert_eq!(enquote_k_string("abc"), "\"abc\"");
        assert_eq!(enquote_k_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
        assert_eq!(enquote_k_string("é"), "\"\\xe9\"");
        assert_eq!(enquote_k_string("λ"), "\"\\u03bb\"");
        assert_eq!(enquote_k_string("😀"), "\"\\U0001f600\"");
        assert_eq!(enquote_k_string("\u{1}"), "\"\\x01\"");
    }

    #[test]
    fn non_ascii_escaping_keeps_ascii() {
        assert_eq!(escape_non_ascii("\"héllo\\n\""), "\"h\\xe9llo\\n\"");
    }
}
