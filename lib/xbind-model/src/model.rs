use indexmap::IndexSet;

use crate::class::ClassInfo;
use crate::element::ElementInfo;
use crate::ids::{ClassId, ElementId, PackageId};
use crate::types::ClassScope;

/// Arena of everything a compilation generated.
///
/// Ids handed out by a model are only meaningful for that model; accessors
/// panic on foreign ids.
#[derive(Debug, Clone, Default)]
pub struct Model {
    packages: IndexSet<String>,
    classes: Vec<ClassInfo>,
    elements: Vec<ElementInfo>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the package with the given name.
    pub fn package(&mut self, name: &str) -> PackageId {
        match self.packages.get_index_of(name) {
            Some(index) => PackageId::new(index),
            None => PackageId::new(self.packages.insert_full(name.to_string()).0),
        }
    }

    pub fn package_name(&self, id: PackageId) -> &str {
        self.packages
            .get_index(id.index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn find_package(&self, name: &str) -> Option<PackageId> {
        self.packages.get_index_of(name).map(PackageId::new)
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &str)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(index, name)| (PackageId::new(index), name.as_str()))
    }

    pub fn new_class(&mut self, name: impl Into<String>, scope: ClassScope) -> ClassId {
        let id = ClassId::new(self.classes.len());
        self.classes.push(ClassInfo::new(name, scope));
        id
    }

    pub fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.index()]
    }

    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassInfo {
        &mut self.classes[id.index()]
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassInfo)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, class)| (ClassId::new(index), class))
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn new_element(
        &mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        scope: ClassScope,
    ) -> ElementId {
        let id = ElementId::new(self.elements.len());
        self.elements.push(ElementInfo::new(name, namespace, scope));
        id
    }

    pub fn element(&self, id: ElementId) -> &ElementInfo {
        &self.elements[id.index()]
    }

    pub fn element_mut(&mut self, id: ElementId) -> &mut ElementInfo {
        &mut self.elements[id.index()]
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ElementInfo)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, element)| (ElementId::new(index), element))
    }

    /// Dotted name of whatever a scope denotes; empty for the root.
    pub fn scope_name(&self, scope: ClassScope) -> String {
        match scope {
            ClassScope::Root => String::new(),
            ClassScope::Package(package) => self.package_name(package).to_string(),
            ClassScope::Class(class) => self.full_name(class),
        }
    }

    /// Fully qualified name of a class, e.g. `com.example.Order.Item`.
    pub fn full_name(&self, id: ClassId) -> String {
        let class = self.class(id);
        qualify(&self.scope_name(class.scope), &class.name)
    }

    /// Fully qualified name of an element wrapper.
    pub fn element_full_name(&self, id: ElementId) -> String {
        let element = self.element(id);
        qualify(&self.scope_name(element.scope), &element.name)
    }

    pub fn find_class(&self, full_name: &str) -> Option<ClassId> {
        self.classes()
            .map(|(id, _)| id)
            .find(|&id| self.full_name(id) == full_name)
    }

    /// Classes placed directly in a scope, in allocation order.
    pub fn classes_in(&self, scope: ClassScope) -> impl Iterator<Item = ClassId> + '_ {
        self.classes()
            .filter(move |(_, class)| class.scope == scope)
            .map(|(id, _)| id)
    }
}

fn qualify(outer: &str, name: &str) -> String {
    if outer.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", outer, name)
    }
}
