//! Builder-pattern printer for rendering diagnostics.
//!
//! Two layouts:
//! - single-line: `Error <file> (<line>,<col>): <message>`, one per line
//! - pretty: annotated source snippets via `annotate-snippets`

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use fddtsc_core::Colors;
use rowan::TextRange;

use super::Diagnostics;
use super::message::{DiagnosticMessage, Severity};
use crate::source_map::SourceMap;

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    sources: &'s SourceMap,
    colors: Colors,
    pretty: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics, sources: &'s SourceMap) -> Self {
        Self {
            diagnostics,
            sources,
            colors: Colors::OFF,
            pretty: false,
        }
    }

    pub fn colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }

    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.pretty {
            self.format_pretty(w)
        } else {
            self.format_lines(w)
        }
    }

    fn format_lines(&self, w: &mut impl Write) -> std::fmt::Result {
        for diag in self.diagnostics {
            self.format_line(w, diag)?;
            w.write_char('\n')?;
        }
        Ok(())
    }

    /// One diagnostic in the single-line layout, without the trailing newline.
    pub fn format_line(&self, w: &mut impl Write, diag: &DiagnosticMessage) -> std::fmt::Result {
        let c = self.colors;
        let color = severity_color(diag.severity, c);
        write!(w, "{color}{}{}", diag.severity.prefix(), c.reset)?;
        if let Some(span) = diag.span {
            let file = self.sources.get(span.source);
            let (line, col) = file.line_col(span.range.start()).one_based();
            write!(
                w,
                " {}{}{} {}({line},{col}){}",
                c.cyan,
                file.display_name(),
                c.reset,
                c.yellow,
                c.reset
            )?;
        }
        write!(w, ": {}", diag.flattened_message())
    }

    fn format_pretty(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colors.is_enabled() {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            let Some(span) = diag.span else {
                let c = self.colors;
                writeln!(
                    w,
                    "{}{}{} {}TS{}{}: {}",
                    severity_color(diag.severity, c),
                    diag.severity,
                    c.reset,
                    c.dim,
                    diag.kind.code(),
                    c.reset,
                    diag.flattened_message()
                )?;
                continue;
            };

            let file = self.sources.get(span.source);
            let source = file.text();
            let path = file.display_name();
            let message = diag.flattened_message();
            let code = format!("TS{}", diag.kind.code());

            let mut snippet = Snippet::source(source).line_start(1).path(path.as_str()).annotation(
                AnnotationKind::Primary
                    .span(adjust_range(span.range, source.len()))
                    .label(diag.message.as_str()),
            );

            for related in &diag.related {
                if related.span.source != span.source {
                    continue;
                }
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span.range, source.len()))
                        .label(related.message.as_str()),
                );
            }

            let level = severity_to_level(diag.severity);
            let report: Vec<Group> = vec![
                level
                    .primary_title(message.as_str())
                    .id(code.as_str())
                    .element(snippet),
            ];
            writeln!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_color(severity: Severity, colors: Colors) -> &'static str {
    match severity {
        Severity::Error => colors.red,
        Severity::Warning => colors.yellow,
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: TextRange, limit: usize) -> std::ops::Range<usize> {
    let start: usize = range.start().into();
    let end: usize = range.end().into();

    if start == end {
        return start..(start + 1).min(limit);
    }

    start..end
}
