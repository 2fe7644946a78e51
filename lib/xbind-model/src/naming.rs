//! Identifier rules for generated code

use unicode_xid::UnicodeXID;

/// Words that cannot be used as identifiers in generated code.
pub const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// A single identifier: XID start (or `_`/`$`), then XID continue characters,
/// and not a reserved word.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_xid_start() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| c.is_xid_continue() || c == '$') && !is_reserved(s)
}

/// A dotted package name where every segment is an identifier.
///
/// ```
/// use xbind_model::naming::is_package_name;
///
/// assert!(is_package_name("com.example.po"));
/// assert!(!is_package_name("com.example.bad name"));
/// assert!(!is_package_name("com..example"));
/// ```
pub fn is_package_name(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

/// Split a schema name into words at separators and lower-to-upper case
/// transitions: `purchase-order`, `purchaseOrder` and `PURCHASE_order` all
/// give two words.
pub fn split_words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        if c.is_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_lowercase() || c.is_numeric();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `purchase-order` → `PurchaseOrder`
pub fn to_class_name(s: &str) -> String {
    let name: String = split_words(s).iter().map(|w| capitalize(w)).collect();
    make_valid(name)
}

/// `Purchase-Order` → `purchaseOrder`
pub fn to_variable_name(s: &str) -> String {
    let words = split_words(s);
    let mut name = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_lowercase());
                name.push_str(chars.as_str());
            }
        } else {
            name.push_str(&capitalize(word));
        }
    }
    make_valid(name)
}

fn make_valid(mut name: String) -> String {
    if name.chars().next().is_some_and(|c| c.is_numeric()) {
        name.insert(0, '_');
    }
    if is_reserved(&name) {
        name.push('_');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("Order"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("données"));
        assert!(!is_identifier("class"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("bad name"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_class_name("purchase-order"), "PurchaseOrder");
        assert_eq!(to_class_name("purchaseOrder"), "PurchaseOrder");
        assert_eq!(to_variable_name("ShipTo"), "shipTo");
        assert_eq!(to_variable_name("class"), "class_");
        assert_eq!(to_class_name("1st"), "_1st");
    }
}
