pub type Span = std::ops::Range<usize>;

/// Where a schema declaration came from.
///
/// Schema documents are usually identified by a public id (a catalog name)
/// and a system id (the URL or path it was loaded from). Either may be
/// missing. The line number is 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Locator {
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    pub line: Option<u32>,
    pub span: Option<Span>,
}

impl Locator {
    /// A locator pointing at a line of a document known by its system id.
    pub fn at(system_id: impl Into<String>, line: u32) -> Self {
        Self {
            public_id: None,
            system_id: Some(system_id.into()),
            line: Some(line),
            span: None,
        }
    }

    pub fn with_public_id(mut self, public_id: impl Into<String>) -> Self {
        self.public_id = Some(public_id.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// The name used to look the document up: public id first, then system id.
    pub fn file_name(&self) -> Option<&str> {
        self.public_id.as_deref().or(self.system_id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_prefers_public_id() {
        let locator = Locator::at("file:///po.xsd", 12).with_public_id("urn:po");
        assert_eq!(locator.file_name(), Some("urn:po"));

        let locator = Locator::at("file:///po.xsd", 12);
        assert_eq!(locator.file_name(), Some("file:///po.xsd"));
        assert_eq!(Locator::default().file_name(), None);
    }

    #[test]
    fn test_with_span() {
        let locator = Locator::at("po.xsd", 3).with_span(10..20);
        assert_eq!(locator.span, Some(10..20));
        assert_eq!(locator.line, Some(3));
    }
}
