// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Context;
use clap::*;
use colored::Colorize;
use k_model::SentenceType;
use kore_backend::TranslationOptions;
use kore_gen::definition::Definition;
use kore_gen::generator::{run_kore_gen, write_outputs, GeneratorOptions};
use log::{debug, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[clap(
    name = env!("CARGO_BIN_NAME"),
    about = "Translates an elaborated K definition (JSON) into KORE: definition.kore, syntaxDefinition.kore and macros.kore, plus spec.kore when the definition carries a specification module",
    rename_all = "kebab-case",
    author,
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Args {
    /// Path to the elaborated definition
    pub definition: PathBuf,

    /// Directory the .kore files are written to
    #[clap(long = "output", short = 'o', default_value = ".")]
    pub output_dir: PathBuf,

    /// Translation options (TOML); flags below are applied on top
    #[clap(long = "config", short = 'c')]
    pub config: Option<PathBuf>,

    /// File whose content replaces the prelude of the definition
    #[clap(long)]
    pub prelude: Option<PathBuf>,

    /// Guard rewrite rules with the left-hand sides of more urgent ones
    #[clap(long)]
    pub enable_priority_groups: bool,

    /// Drop simplification rules for #Ceil
    #[clap(long)]
    pub disable_ceil_simplification_rules: bool,

    /// Translate heat and cool rules as equations
    #[clap(long)]
    pub heat_cool_equations: bool,

    /// Additional implemented hook namespace (repeatable)
    #[clap(long = "hook-namespace")]
    pub hook_namespaces: Vec<String>,

    /// Modality of claims when the specification module does not choose one
    #[clap(long, value_enum, default_value_t = ClaimModality::OnePath)]
    pub claim_modality: ClaimModality,

    /// Display debug logging
    #[clap(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ClaimModality {
    OnePath,
    AllPath,
}

impl From<ClaimModality> for SentenceType {
    fn from(modality: ClaimModality) -> Self {
        match modality {
            ClaimModality::OnePath => SentenceType::OnePath,
            ClaimModality::AllPath => SentenceType::AllPath,
        }
    }
}

impl Args {
    fn translation_options(&self) -> anyhow::Result<TranslationOptions> {
        let mut options = match &self.config {
            Some(path) => TranslationOptions::from_file(path)?,
            None => TranslationOptions::default(),
        };
        options.enable_priority_groups |= self.enable_priority_groups;
        options.disable_ceil_simplification_rules |= self.disable_ceil_simplification_rules;
        options.heat_cool_equations |= self.heat_cool_equations;
        options
            .hook_namespaces
            .extend(self.hook_namespaces.iter().cloned());
        Ok(options)
    }
}

fn execute(args: &Args) -> anyhow::Result<()> {
    let mut definition = Definition::from_file(&args.definition)?;
    if let Some(path) = &args.prelude {
        definition.prelude = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read prelude `{}`", path.display()))?;
    }
    let options = GeneratorOptions {
        translation: args.translation_options()?,
        spec_sentence_type: args.claim_modality.into(),
        ..Default::default()
    };
    debug!("translation options: {:?}", options.translation);

    let generated = run_kore_gen(&definition, &options)?;
    for path in write_outputs(&args.output_dir, &generated)? {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap();

    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(err) = TermLogger::init(level, Config::default(), TerminalMode::Stderr) {
        eprintln!("cannot initialize logging: {}", err);
    }

    debug!("kore-gen version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = execute(&args) {
        let err = format!("{:?}", err);
        println!("{}", err.bold().red());
        std::process::exit(1);
    }
}
