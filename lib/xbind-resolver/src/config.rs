//! Resolver configuration

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Where classes discovered while building another class's body go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalScoping {
    /// Nest them inside the class whose body is being built
    #[default]
    Nested,
    /// Place them next to that class
    Toplevel,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings of one resolution run
///
/// ```toml
/// local_scoping = "toplevel"
/// package = "com.example.generated"
/// reserved_class_names = ["ObjectFactory", "Util"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub local_scoping: LocalScoping,
    /// Package for every namespace, overriding schema customizations
    pub package: Option<String>,
    /// Package used when no schema customization names one
    pub compat_package: Option<String>,
    /// Package used when no name can be derived from the namespace
    pub fallback_package: String,
    pub reserved_class_names: Vec<String>,
    pub generate_docs: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            local_scoping: LocalScoping::Nested,
            package: None,
            compat_package: None,
            fallback_package: "generated".to_string(),
            reserved_class_names: vec!["ObjectFactory".to_string()],
            generate_docs: true,
        }
    }
}

impl ResolverConfig {
    pub fn with_local_scoping(mut self, scoping: LocalScoping) -> Self {
        self.local_scoping = scoping;
        self
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_compat_package(mut self, package: impl Into<String>) -> Self {
        self.compat_package = Some(package.into());
        self
    }

    pub fn with_fallback_package(mut self, package: impl Into<String>) -> Self {
        self.fallback_package = package.into();
        self
    }

    pub fn with_reserved_class_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_class_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_generate_docs(mut self, generate_docs: bool) -> Self {
        self.generate_docs = generate_docs;
        self
    }

    pub fn is_reserved_class_name(&self, name: &str) -> bool {
        self.reserved_class_names.iter().any(|n| n == name)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.local_scoping, LocalScoping::Nested);
        assert_eq!(config.fallback_package, "generated");
        assert!(config.is_reserved_class_name("ObjectFactory"));
        assert!(config.generate_docs);
    }

    #[test]
    fn test_partial_toml() {
        let config = ResolverConfig::from_toml(
            "local_scoping = \"toplevel\"\npackage = \"com.example\"\n",
        )
        .unwrap();
        assert_eq!(config.local_scoping, LocalScoping::Toplevel);
        assert_eq!(config.package.as_deref(), Some("com.example"));
        assert_eq!(config.fallback_package, "generated");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            ResolverConfig::from_toml("nesting = true"),
            Err(ConfigError::Parse(_))
        ));
    }
}
