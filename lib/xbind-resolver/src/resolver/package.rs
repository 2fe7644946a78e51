//! Namespace to package resolution

use tracing::{debug, warn};
use xbind_model::naming::is_package_name;
use xbind_model::PackageId;

use super::Resolver;
use crate::diagnostics::IncorrectPackageNameError;

impl Resolver<'_> {
    /// The package of a target namespace, memoized per namespace.
    ///
    /// The first of these wins: the configured `package`, the schema's
    /// package customization, the configured `compat_package`, the name
    /// derived by the name converter, and `fallback_package`. Each distinct
    /// package name is validated once; an invalid one is reported but still
    /// used.
    pub fn package_for(&mut self, namespace: &str) -> PackageId {
        if let Some(&package) = self.packages.get(namespace) {
            return package;
        }

        let schema = self.schema.schema(namespace);
        let name = self
            .config
            .package
            .clone()
            .or_else(|| schema.and_then(|s| s.package.clone()))
            .or_else(|| self.config.compat_package.clone())
            .or_else(|| self.names.to_package_name(namespace))
            .unwrap_or_else(|| self.config.fallback_package.clone());

        if self.checked_package_names.insert(name.clone())
            && !name.is_empty()
            && !is_package_name(&name)
        {
            warn!(namespace, package = %name, "invalid package name");
            self.diagnostics.throw(IncorrectPackageNameError {
                package: name.clone(),
                namespace: namespace.to_string(),
                locator: schema.and_then(|s| s.locator.clone()),
            });
        }

        let package = self.model.package(&name);
        self.packages.insert(namespace.to_string(), package);
        debug!(namespace, package = %name, "package resolved");
        package
    }
}
