use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::collections::HashMap;
use xbind_span::{Locator, Span};

// Re-export commonly used types from codespan_reporting
pub use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Stable identifier of a diagnostic message.
///
/// Stored as the diagnostic code so tools and tests can match on the kind of
/// problem without depending on the wording.
pub type MessageKey = &'static str;

/// A resolved position inside a registered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file_id: usize,
    pub span: Span,
}

/// Trait for types that can be converted into a diagnostic.
/// Implement this for your error types to integrate with the reporting system.
pub trait IntoDiagnostic {
    /// The message key of this diagnostic.
    fn key(&self) -> MessageKey;

    /// Where the problem was found, if known.
    fn locator(&self) -> Option<&Locator> {
        None
    }

    /// Convert this error into a codespan diagnostic.
    ///
    /// `location` is `Some` when the locator points into a file that was
    /// registered with the context.
    fn into_diagnostic(&self, location: Option<&Location>) -> Diagnostic<usize>;
}

/// Context for managing and reporting diagnostics.
/// This struct collects diagnostics and can emit them to the terminal.
pub struct DiagnosticContext {
    files: SimpleFiles<String, String>,
    diagnostics: Vec<Diagnostic<usize>>,
    file_map: HashMap<String, usize>,
}

impl DiagnosticContext {
    /// Create a new diagnostic context.
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            diagnostics: Vec::new(),
            file_map: HashMap::new(),
        }
    }

    /// Add a source file to the context.
    /// Returns the file ID that can be used when creating diagnostics.
    pub fn add_file(&mut self, name: String, source: String) -> usize {
        if let Some(&id) = self.file_map.get(&name) {
            return id;
        }
        let id = self.files.add(name.clone(), source);
        self.file_map.insert(name, id);
        id
    }

    /// Resolve a locator against the registered files.
    ///
    /// An explicit byte span wins over the line number. Returns `None` when
    /// the document was never registered or the line is out of range.
    pub fn locate(&self, locator: &Locator) -> Option<Location> {
        let file_id = *self.file_map.get(locator.file_name()?)?;
        if let Some(span) = &locator.span {
            return Some(Location {
                file_id,
                span: span.clone(),
            });
        }
        let line = locator.line?.checked_sub(1)?;
        let span = self.files.line_range(file_id, line as usize).ok()?;
        Some(Location { file_id, span })
    }

    /// Throw (add) a diagnostic to the context.
    pub fn throw<D: IntoDiagnostic>(&mut self, diagnostic: D) {
        let location = diagnostic.locator().and_then(|l| self.locate(l));
        let mut rendered = diagnostic
            .into_diagnostic(location.as_ref())
            .with_code(diagnostic.key());

        // Keep the textual position when the document is not available
        if location.is_none() {
            if let Some(locator) = diagnostic.locator() {
                if let Some(name) = locator.file_name() {
                    let position = match locator.line {
                        Some(line) => format!("declared at {}:{}", name, line),
                        None => format!("declared in {}", name),
                    };
                    rendered.notes.push(position);
                }
            }
        }

        self.diagnostics.push(rendered);
    }

    /// Check if there are any errors in the collected diagnostics.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error || d.severity == Severity::Bug)
    }

    /// Count the diagnostics raised with the given message key.
    pub fn count(&self, key: MessageKey) -> usize {
        self.with_key(key).count()
    }

    /// Iterate over the diagnostics raised with the given message key.
    pub fn with_key(&self, key: MessageKey) -> impl Iterator<Item = &Diagnostic<usize>> + '_ {
        self.diagnostics
            .iter()
            .filter(move |d| d.code.as_deref() == Some(key))
    }

    /// Get the number of diagnostics collected.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the context is empty (no diagnostics).
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Emit all diagnostics to stderr with color support.
    pub fn emit(&self) -> Result<(), codespan_reporting::files::Error> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();

        for diagnostic in &self.diagnostics {
            term::emit(&mut writer.lock(), &config, &self.files, diagnostic)?;
        }

        Ok(())
    }

    /// Emit all diagnostics to a custom writer.
    pub fn emit_to<W: term::termcolor::WriteColor>(
        &self,
        writer: &mut W,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = codespan_reporting::term::Config::default();

        for diagnostic in &self.diagnostics {
            term::emit(writer, &config, &self.files, diagnostic)?;
        }

        Ok(())
    }

    /// Get a reference to all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic<usize>] {
        &self.diagnostics
    }
}

impl Default for DiagnosticContext {
    fn default() -> Self {
        Self::new()
    }
}
