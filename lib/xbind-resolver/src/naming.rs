//! Name derivation for generated types

use xbind_model::naming;

/// Derives generated names from schema names.
pub trait NameConverter {
    /// `purchase-order` → `PurchaseOrder`
    fn to_class_name(&self, name: &str) -> String;

    /// `ShipTo` → `shipTo`
    fn to_property_name(&self, name: &str) -> String;

    /// Derive a package from a namespace URI, or `None` if none can be
    /// derived (e.g. for the empty namespace).
    fn to_package_name(&self, namespace: &str) -> Option<String>;
}

/// The usual conventions: reversed host name followed by the path.
///
/// ```
/// use xbind_resolver::{NameConverter, StandardNameConverter};
///
/// let names = StandardNameConverter;
/// assert_eq!(
///     names.to_package_name("http://www.example.com/a/b").as_deref(),
///     Some("com.example.a.b")
/// );
/// assert_eq!(names.to_package_name("urn:example:foo").as_deref(), Some("example.foo"));
/// assert_eq!(names.to_package_name(""), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNameConverter;

impl NameConverter for StandardNameConverter {
    fn to_class_name(&self, name: &str) -> String {
        naming::to_class_name(name)
    }

    fn to_property_name(&self, name: &str) -> String {
        naming::to_variable_name(name)
    }

    fn to_package_name(&self, namespace: &str) -> Option<String> {
        let mut segments: Vec<&str> = Vec::new();

        if let Some(rest) = namespace.strip_prefix("urn:") {
            segments.extend(rest.split(':'));
        } else {
            let rest = namespace
                .split_once("://")
                .map(|(_, rest)| rest)
                .unwrap_or(namespace);
            let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
            let host = authority.split(':').next().unwrap_or_default();

            let mut host: Vec<&str> = host.split('.').filter(|s| !s.is_empty()).collect();
            if host.first() == Some(&"www") {
                host.remove(0);
            }
            host.reverse();
            segments.extend(host);

            let mut path: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            if let Some(last) = path.last_mut() {
                if let Some((stem, extension)) = last.rsplit_once('.') {
                    if !stem.is_empty() && (2..=4).contains(&extension.len()) {
                        *last = stem;
                    }
                }
            }
            segments.extend(path);
        }

        let parts: Vec<String> = segments
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(package_segment)
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }
}

fn package_segment(segment: &str) -> String {
    let mut part: String = segment
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if part.chars().next().is_some_and(|c| c.is_numeric()) {
        part.insert(0, '_');
    }
    if naming::is_reserved(&part) {
        part.push('_');
    }
    part
}
