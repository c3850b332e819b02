// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! KORE syntax tree and its textual rendering.

pub mod syntax;
pub mod writer;

pub use syntax::{Attributes, KoreSort, Pattern, Sentence};
pub use writer::{render_to_string, KoreWriter};
