//! Printing utilities for generated models

use std::fmt::Write;

use crate::class::PropertyKind;
use crate::ids::ClassId;
use crate::model::Model;
use crate::types::{ClassScope, TypeRef};

/// Print the model tree to stdout.
pub fn print_model(model: &Model) {
    print!("{}", format_model(model));
}

/// Format a type for display
pub fn format_type(model: &Model, ty: TypeRef) -> String {
    match ty {
        TypeRef::Class(id) => model.full_name(id),
        TypeRef::Element(id) => format!("element {}", model.element_full_name(id)),
        TypeRef::Builtin(leaf) => leaf.name().to_string(),
    }
}

/// Render the model as an indented tree, package by package.
pub fn format_model(model: &Model) -> String {
    let mut out = String::new();

    let root_classes: Vec<ClassId> = model.classes_in(ClassScope::Root).collect();
    if !root_classes.is_empty() {
        out.push_str("(no package)\n");
        for class in root_classes {
            write_class(model, class, 1, &mut out);
        }
    }

    for (package, name) in model.packages() {
        let _ = writeln!(out, "package {}", name);
        let scope = ClassScope::Package(package);
        for class in model.classes_in(scope) {
            write_class(model, class, 1, &mut out);
        }
        for (_, element) in model.elements().filter(|(_, e)| e.scope == scope) {
            let content = element
                .content
                .map(|ty| format_type(model, ty))
                .unwrap_or_else(|| "?".to_string());
            let _ = writeln!(out, "  element {}: {}", element.name, content);
        }
    }

    out
}

fn write_class(model: &Model, id: ClassId, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let class = model.class(id);

    let _ = write!(out, "{}", indent);
    if class.is_abstract {
        out.push_str("abstract ");
    }
    let _ = write!(out, "class {}", class.name);
    if let Some(base) = class.base {
        let _ = write!(out, " extends {}", model.full_name(base));
    }
    out.push('\n');

    for params in &class.constructors {
        let _ = writeln!(out, "{}  new({})", indent, params.join(", "));
    }
    for property in &class.properties {
        let marker = match property.kind {
            PropertyKind::Attribute => "@",
            PropertyKind::Value => "#",
            PropertyKind::Element | PropertyKind::Reference => "",
        };
        let ty = property
            .ty
            .map(|ty| format_type(model, ty))
            .unwrap_or_else(|| "?".to_string());
        let many = if property.repeated { "[]" } else { "" };
        let _ = writeln!(out, "{}  {}{}: {}{}", indent, marker, property.name, ty, many);
    }
    for nested in model.classes_in(ClassScope::Class(id)) {
        write_class(model, nested, depth + 1, out);
    }
}
