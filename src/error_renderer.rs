//! Diagnostic rendering using ariadne
//!
//! This module renders diagnostics with source snippets and labels, and
//! formats sink results one per line.

use crate::{Diagnostic, Error, Severity, SinkMap};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use core::fmt::Display;
use std::io::Write;

const SOURCE_ID: &str = "<program>";

/// Render diagnostics for `source` to a writer.
///
/// # Example
/// ```
/// use tiny::{AnalyzerOptions, Bindings, render_diagnostics};
///
/// let source = "z: when 1 2 otherwise 3";
/// let evaluation = tiny::analyze(source, &Bindings::new(), AnalyzerOptions::default()).unwrap();
///
/// let mut out = Vec::new();
/// render_diagnostics(source, evaluation.diagnostics.as_slice(), &mut out, false).unwrap();
/// assert!(String::from_utf8_lossy(&out).contains("T001"));
/// ```
pub fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Info => ReportKind::Advice,
        };

        let mut report = Report::build(kind, (SOURCE_ID, diag.span.0.clone()))
            .with_code(diag.code)
            .with_message(&diag.message)
            .with_config(
                ariadne::Config::default()
                    .with_color(use_color)
                    .with_index_type(ariadne::IndexType::Byte),
            );

        report = report.with_label(
            Label::new((SOURCE_ID, diag.span.0.clone()))
                .with_message(&diag.message)
                .with_color(colors.next()),
        );

        for help_msg in &diag.help {
            report = report.with_help(help_msg);
        }

        report
            .finish()
            .write((SOURCE_ID, Source::from(source)), &mut *writer)?;
    }

    Ok(())
}

/// Render diagnostics to a String (useful for web UIs, logs, etc.)
pub fn render_diagnostics_to_string(source: &str, diagnostics: &[Diagnostic]) -> String {
    let mut buf = Vec::new();
    render_diagnostics(source, diagnostics, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render diagnostics to a String without color codes (useful for tests)
pub fn render_diagnostics_to_string_no_color(source: &str, diagnostics: &[Diagnostic]) -> String {
    let mut buf = Vec::new();
    render_diagnostics(source, diagnostics, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render a pass-stopping error without color codes.
pub fn render_error_to_string_no_color(source: &str, error: &Error) -> String {
    render_diagnostics_to_string_no_color(source, &[error.to_diagnostic(source)])
}

/// One `name: value` line per sink, in declaration order.
pub fn format_sinks<V: Display>(sinks: &SinkMap<V>) -> String {
    let mut out = String::new();
    for (name, value) in sinks.iter() {
        out.push_str(&format!("{}: {}\n", name, value));
    }
    out
}
