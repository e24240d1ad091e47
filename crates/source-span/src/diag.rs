use ariadne::Source;
use derive_more::Display;
use owo_colors::{OwoColorize, Style};
use std::{
    fmt,
    io::{self, Write},
};

use crate::Span;

/// Represents the severity of a diagnostic message.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl From<Severity> for ariadne::ReportKind<'_> {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Info => ariadne::ReportKind::Advice,
            Severity::Warning => ariadne::ReportKind::Warning,
            Severity::Error => ariadne::ReportKind::Error,
        }
    }
}

/// A diagnostic message with an optional source location.
///
/// Diagnostics are pure data; rendering happens on demand, either against
/// the original source text (`print`/`eprint`) or as a bare line when no
/// text is at hand (`write_plain`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// The main diagnostic message.
    pub message: String,
    /// The severity of the diagnostic (Error, Warning, or Advice).
    pub severity: Severity,
    /// The source location this diagnostic refers to, when known.
    pub span: Option<Span>,
    /// Additional notes related to the diagnostic.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic.
    pub fn error(span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            span,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic.
    pub fn warn(span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            span,
            notes: Vec::new(),
        }
    }

    /// Creates a new informational diagnostic.
    pub fn info(span: Option<Span>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            span,
            notes: Vec::new(),
        }
    }

    /// Adds notes to the diagnostic and returns self for method chaining.
    pub fn with_notes(mut self, notes: impl IntoIterator<Item = String>) -> Self {
        self.notes = notes.into_iter().collect();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Renders a bare one-line form without source context.
    pub fn write_plain(&self, mut w: impl Write) -> io::Result<()> {
        let style = match self.severity {
            Severity::Info => Style::new().green(),
            Severity::Warning => Style::new().yellow(),
            Severity::Error => Style::new().red(),
        };

        match self.span {
            Some(span) => writeln!(
                w,
                "{} [{span}]: {}",
                self.severity.style(style),
                self.message
            )?,
            None => writeln!(w, "{}: {}", self.severity.style(style), self.message)?,
        }

        for note in &self.notes {
            writeln!(w, "{} {note}", "Note:".cyan())?;
        }

        Ok(())
    }

    /// Prints the diagnostic against the source text on standard output.
    pub fn print(self, source: &str) -> io::Result<()> {
        match self.span {
            Some(_) => self.into_report().print(Source::from(source)),
            None => self.write_plain(io::stdout()),
        }
    }

    /// Prints the diagnostic against the source text on standard error.
    pub fn eprint(self, source: &str) -> io::Result<()> {
        match self.span {
            Some(_) => self.into_report().eprint(Source::from(source)),
            None => self.write_plain(io::stderr()),
        }
    }

    fn into_report(self) -> ariadne::Report<'static> {
        let Diagnostic {
            message,
            severity,
            span,
            notes,
        } = self;

        let span = span.unwrap_or(Span::new(0, 0));

        let mut builder = ariadne::Report::build(severity.into(), (), span.start)
            .with_message(&message)
            .with_label(ariadne::Label::new(span.into()).with_message(message));

        if !notes.is_empty() {
            builder = builder.with_note(notes.join("\n"));
        }

        builder.finish()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message.fmt(f)
    }
}

impl std::error::Error for Diagnostic {}
