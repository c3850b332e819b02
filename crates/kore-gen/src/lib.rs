// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

pub mod definition;
pub mod generator;
