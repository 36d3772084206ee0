//! Diagnostics collection and rendering.
//!
//! Every phase (configuration, parsing, binding, checking, declaration emit)
//! reports through [`Diagnostics::report`]; nothing in the pipeline returns
//! `Err` for a user mistake.

mod message;
mod printer;

#[cfg(test)]
mod tests;

pub use message::{DiagnosticKind, DiagnosticMessage, RelatedInfo, Severity, Span};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a diagnostic with the given kind and location.
    ///
    /// Uses the kind's default message. Call `.message()` or `.args()` on the builder to override.
    pub fn report(&mut self, kind: DiagnosticKind, span: Span) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, Some(span), kind.fallback_message()),
        }
    }

    /// Create a diagnostic that is not tied to any file position.
    pub fn report_global(&mut self, kind: DiagnosticKind) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::new(kind, None, kind.fallback_message()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    /// Orders by file and position, dropping exact duplicates.
    ///
    /// Project-wide diagnostics come first, then files in registration order.
    pub fn sort_and_dedup(&mut self) {
        self.messages.sort_by(|a, b| {
            let key = |m: &DiagnosticMessage| {
                m.span
                    .map(|s| (1, s.source.index(), u32::from(s.range.start()), u32::from(s.range.end())))
                    .unwrap_or((0, 0, 0, 0))
            };
            key(a)
                .cmp(&key(b))
                .then_with(|| a.kind.code().cmp(&b.kind.code()))
                .then_with(|| a.message.cmp(&b.message))
        });
        self.messages.dedup();
    }

    pub fn printer<'d, 's>(
        &'d self,
        sources: &'s crate::source_map::SourceMap,
    ) -> DiagnosticsPrinter<'d, 's> {
        DiagnosticsPrinter::new(self, sources)
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticMessage;
    type IntoIter = std::vec::IntoIter<DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticMessage;
    type IntoIter = std::slice::Iter<'a, DiagnosticMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl<'a> DiagnosticBuilder<'a> {
    /// Provide the single detail for this diagnostic, rendered using the kind's template.
    pub fn message(self, detail: impl AsRef<str>) -> Self {
        self.args(&[detail.as_ref()])
    }

    /// Provide every template argument, in order.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.message.message = self.message.kind.message(args);
        self
    }

    /// Append a follow-up line to the message chain.
    pub fn chain(mut self, line: impl Into<String>) -> Self {
        self.message.chain.push(line.into());
        self
    }

    pub fn related_to(mut self, msg: impl Into<String>, span: Span) -> Self {
        self.message.related.push(RelatedInfo::new(span, msg));
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.message.severity = severity;
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
