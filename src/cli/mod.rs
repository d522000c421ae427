//! The soundshift Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands. It reads files,
//! hands their text to the library, and prints results; the engine itself never
//! touches the filesystem.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::{fs, process};

use clap::Parser;
use log::{info, LevelFilter};
use miette::Report;
use simplelog::{Config, TermLogger, TerminalMode};
use termcolor::{ColorChoice, StandardStream};

use crate::cli::args::{ColorMode, Command, OutputFormat, ShiftArgs};
use crate::cli::output::{render_json, write_derivation, write_pipeline, RenderOptions};
use crate::engine::{StageGranularity, StagedApplier};
use crate::loader::{load_rules_named, load_words};
use crate::rules::RuleSet;
use crate::{err_msg, ShiftError};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ShiftArgs::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Command::Apply {
            rules,
            words,
            format,
            stages,
            gloss,
            color,
        } => handle_apply(&rules, &words, format, stages, gloss, color),
        Command::Check { rules } => handle_check(&rules),
    };

    if let Err(e) = result {
        eprintln!("{:?}", Report::new(e));
        process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    // A logger may already be installed when embedded; that one wins.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
}

// ============================================================================
// SUBCOMMANDS
// ============================================================================

/// Handles the `apply` subcommand.
fn handle_apply(
    rules_path: &Path,
    words_path: &Path,
    format: OutputFormat,
    granularity: StageGranularity,
    show_gloss: bool,
    color: ColorMode,
) -> Result<(), ShiftError> {
    let rules = load_rule_file(rules_path)?;
    let mut words = load_words(&read_file(words_path)?);
    info!("{}: {} word(s)", words_path.display(), words.len());

    let applier = StagedApplier::new(&rules).with_granularity(granularity);
    let derivations = applier.derive_all(&mut words);

    match format {
        OutputFormat::Json => {
            let json = render_json(&words, &derivations)
                .map_err(|e| err_msg!(Resource, "cannot serialize output").caused_by(e))?;
            println!("{json}");
        }
        OutputFormat::Text => {
            let opts = RenderOptions {
                show_gloss,
                ..RenderOptions::default()
            };
            let stdout = StandardStream::stdout(color_choice(color));
            let mut out = stdout.lock();
            for (word, derivation) in words.iter().zip(&derivations) {
                write_derivation(&mut out, word, derivation, &opts).map_err(write_error)?;
            }
        }
    }
    Ok(())
}

/// Handles the `check` subcommand.
fn handle_check(rules_path: &Path) -> Result<(), ShiftError> {
    let rules = load_rule_file(rules_path)?;
    let stdout = StandardStream::stdout(color_choice(ColorMode::Auto));
    let mut out = stdout.lock();
    write_pipeline(&mut out, &rules).map_err(write_error)
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn load_rule_file(path: &Path) -> Result<RuleSet, ShiftError> {
    let text = read_file(path)?;
    load_rules_named(&path.display().to_string(), &text)
}

fn read_file(path: &Path) -> Result<String, ShiftError> {
    fs::read_to_string(path).map_err(|e| {
        err_msg!(Resource, "cannot read {}", path.display())
            .with_help("check that the file exists and is readable UTF-8 text")
            .caused_by(e)
    })
}

fn write_error(e: io::Error) -> ShiftError {
    err_msg!(Resource, "cannot write output").caused_by(e)
}

fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if io::stdout().is_terminal() => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}
