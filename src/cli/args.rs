//! Defines the command-line arguments and subcommands for the soundshift CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::engine::StageGranularity;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "soundshift",
    version,
    about = "Apply ordered sound changes to a wordlist and trace every stage."
)]
pub struct ShiftArgs {
    /// Log more (-v for progress, -vv for every rule application).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive every word of a wordlist through a rule file.
    Apply {
        /// The rule file: declarations, rules and `!` checkpoints.
        #[arg(required = true)]
        rules: PathBuf,
        /// The wordlist: one word per line, optionally followed by a "gloss".
        #[arg(required = true)]
        words: PathBuf,
        /// How to print the derivations.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Which points of the pipeline are shown as stages.
        #[arg(long, value_enum, default_value_t = StageGranularity::Checkpoints)]
        stages: StageGranularity,
        /// Print each word's gloss after its derivation.
        #[arg(long)]
        gloss: bool,
        /// When to colour text output.
        #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
        color: ColorMode,
    },
    /// Compile a rule file and print the resulting pipeline.
    Check {
        /// The rule file to compile.
        #[arg(required = true)]
        rules: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per word, stages joined by arrows.
    Text,
    /// A JSON array of words with labelled stages.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colour when stdout is a terminal.
    Auto,
    Always,
    Never,
}
