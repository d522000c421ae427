//! Unified, `miette`-based diagnostics for the soundshift engine.
//!
//! # Overview
//!
//! Every failure the engine can produce is a [`ShiftError`]. Rule-file problems
//! (ambiguous categories, category cardinality mismatches, malformed lines,
//! patterns that do not compile) are `Config` errors and are always raised while
//! the rule file is loaded, never while words are being derived. `Resource`
//! errors only come from the command-line front end when a file cannot be read.
//!
//! # Error Construction Macros
//!
//! - **Use `err_msg!` for message-only errors.**
//!   - `err_msg!(Config, "too many categories in phrase \"{}\"", phrase)`
//!
//! - **Use `err_ctx!` when the source text and span are known.**
//!   - `err_ctx!(Config, "unrecognized directive", src, span)`
//!   - `err_ctx!(Config, "unrecognized directive", src, span, help)`
//!
//! Errors raised deep inside the compiler do not know which line they came
//! from; the loader attaches that afterwards with [`ShiftError::at`].

use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A byte range into a source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Where an error happened and how to fix it.
#[derive(Debug, Default)]
pub struct ErrorContext {
    /// The source text the span points into (if any).
    pub source: Option<SourceArc>,
    /// The primary span for this error (if any).
    pub span: Option<Span>,
    /// An optional help message.
    pub help: Option<String>,
}

impl ErrorContext {
    /// Returns an empty error context (no source, span, or help).
    pub fn none() -> Self {
        Self::default()
    }

    /// Creates a context with both source and span.
    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

/// Unified error type for all soundshift failure modes.
#[derive(Debug, Error)]
pub enum ShiftError {
    #[error("Config error: {message}")]
    Config {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
    #[error("Resource error: {message}")]
    Resource {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<BoxedCause>,
    },
}

impl ShiftError {
    fn ctx(&self) -> &ErrorContext {
        match self {
            ShiftError::Config { ctx, .. } => ctx,
            ShiftError::Resource { ctx, .. } => ctx,
        }
    }

    fn ctx_mut(&mut self) -> &mut ErrorContext {
        match self {
            ShiftError::Config { ctx, .. } => ctx,
            ShiftError::Resource { ctx, .. } => ctx,
        }
    }

    /// The bare message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ShiftError::Config { message, .. } => message,
            ShiftError::Resource { message, .. } => message,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, ShiftError::Config { .. })
    }

    /// Points the error at `span` inside `source`, unless it already has a location.
    pub fn at(mut self, source: &SourceArc, span: Span) -> Self {
        let ctx = self.ctx_mut();
        if ctx.source.is_none() {
            ctx.source = Some(Arc::clone(source));
            ctx.span = Some(span);
        }
        self
    }

    /// Attaches a help message, replacing any previous one.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.ctx_mut().help = Some(help.into());
        self
    }

    /// Chains an underlying cause.
    pub fn caused_by(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        match &mut self {
            ShiftError::Config { source, .. } | ShiftError::Resource { source, .. } => {
                *source = Some(Box::new(cause));
            }
        }
        self
    }
}

impl Diagnostic for ShiftError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            ShiftError::Config { .. } => "soundshift::config",
            ShiftError::Resource { .. } => "soundshift::resource",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.ctx().span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

/// Converts a named source text into a shareable `NamedSource` for error contexts.
pub fn to_error_source(name: impl AsRef<str>, text: impl Into<String>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), text.into()))
}

/// Constructs a `ShiftError` variant with a formatted message and no context.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($fmt:tt)+) => {
        $crate::ShiftError::$variant {
            message: format!($($fmt)+),
            ctx: $crate::ErrorContext::none(),
            source: None,
        }
    };
}

/// Constructs a `ShiftError` variant with a message, source, span and optional help.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::ShiftError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
            source: None,
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::ShiftError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
            source: None,
        }
    };
}
