//! Diagnostics raised during binding resolution
//!
//! None of these stop the run; the resolver reports them and continues
//! with best-effort output.

use xbind_reporting::{Diagnostic, IntoDiagnostic, Label, Location, MessageKey};
use xbind_span::Locator;

fn labelled(diagnostic: Diagnostic<usize>, location: Option<&Location>, message: &str) -> Diagnostic<usize> {
    match location {
        Some(at) => diagnostic.with_labels(vec![
            Label::primary(at.file_id, at.span.clone()).with_message(message.to_string()),
        ]),
        None => diagnostic,
    }
}

/// A generated class would take a name reserved for generated support code
pub struct ReservedClassNameError {
    pub class_name: String,
    pub component: String,
    pub locator: Option<Locator>,
}

impl ReservedClassNameError {
    pub const KEY: MessageKey = "reserved-class-name";
}

impl IntoDiagnostic for ReservedClassNameError {
    fn key(&self) -> MessageKey {
        Self::KEY
    }

    fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    fn into_diagnostic(&self, location: Option<&Location>) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::error()
            .with_message(format!(
                "the class name '{}' is reserved",
                self.class_name
            ))
            .with_notes(vec![
                format!("generated for {}", self.component),
                "Use a class-name customization to pick another name.".to_string(),
            ]);
        labelled(diagnostic, location, "class generated from this declaration")
    }
}

/// A package name derived for a namespace is not a valid dotted identifier
pub struct IncorrectPackageNameError {
    pub package: String,
    pub namespace: String,
    pub locator: Option<Locator>,
}

impl IncorrectPackageNameError {
    pub const KEY: MessageKey = "incorrect-package-name";
}

impl IntoDiagnostic for IncorrectPackageNameError {
    fn key(&self) -> MessageKey {
        Self::KEY
    }

    fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    fn into_diagnostic(&self, location: Option<&Location>) -> Diagnostic<usize> {
        let namespace = if self.namespace.is_empty() {
            "the empty namespace".to_string()
        } else {
            format!("namespace '{}'", self.namespace)
        };
        let diagnostic = Diagnostic::error()
            .with_message(format!("'{}' is not a valid package name", self.package))
            .with_notes(vec![format!("package of {}", namespace)]);
        labelled(diagnostic, location, "schema declared here")
    }
}

/// A customization that nothing used
pub struct UnusedCustomizationWarning {
    pub component: String,
    pub locator: Option<Locator>,
}

impl UnusedCustomizationWarning {
    pub const KEY: MessageKey = "unused-customization";
}

impl IntoDiagnostic for UnusedCustomizationWarning {
    fn key(&self) -> MessageKey {
        Self::KEY
    }

    fn locator(&self) -> Option<&Locator> {
        self.locator.as_ref()
    }

    fn into_diagnostic(&self, location: Option<&Location>) -> Diagnostic<usize> {
        let diagnostic = Diagnostic::warning().with_message(format!(
            "property customization on {} was not used",
            self.component
        ));
        labelled(diagnostic, location, "customization attached here")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbind_reporting::{DiagnosticContext, Severity};

    #[test]
    fn test_reserved_name_is_an_error_with_code() {
        let mut ctx = DiagnosticContext::new();
        ctx.throw(ReservedClassNameError {
            class_name: "ObjectFactory".to_string(),
            component: "complex type \"ObjectFactory\"".to_string(),
            locator: None,
        });
        assert!(ctx.has_errors());
        assert_eq!(ctx.count(ReservedClassNameError::KEY), 1);
    }

    #[test]
    fn test_unused_customization_is_a_warning() {
        let mut ctx = DiagnosticContext::new();
        ctx.add_file("po.xsd".to_string(), "<schema>\n  <element/>\n".to_string());
        ctx.throw(UnusedCustomizationWarning {
            component: "element \"a\"".to_string(),
            locator: Some(Locator::at("po.xsd", 2)),
        });
        let diagnostic = &ctx.diagnostics()[0];
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.labels.len(), 1);
        assert!(!ctx.has_errors());
    }
}
