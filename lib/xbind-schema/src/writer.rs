//! Serializes schema components back into an XML Schema excerpt

use std::fmt::Write;

use crate::component::{ComponentId, ComponentKind, Particle};
use crate::set::SchemaSet;
use crate::XML_SCHEMA_NS;

const INDENT: &str = "  ";

/// Write the schema fragment declaring `id`.
///
/// Type references in the component's own namespace use the `tns:` prefix,
/// XML Schema types use `xs:`, and anything else is written as `{ns}name`.
/// The output is raw XML; callers embedding it elsewhere must escape it.
pub fn write_fragment(set: &SchemaSet, id: ComponentId) -> String {
    let mut writer = FragmentWriter {
        set,
        home: &set.component(id).target_namespace,
        out: String::new(),
    };
    writer.component(id, 0, true, false);
    writer.out
}

struct FragmentWriter<'a> {
    set: &'a SchemaSet,
    home: &'a str,
    out: String,
}

impl FragmentWriter<'_> {
    fn component(&mut self, id: ComponentId, depth: usize, top: bool, repeated: bool) {
        let set = self.set;
        let component = set.component(id);
        let name_attr = component
            .name
            .as_ref()
            .map(|name| format!(" name=\"{}\"", name))
            .unwrap_or_default();

        let repeated_attr = if repeated { " maxOccurs=\"unbounded\"" } else { "" };

        match &component.kind {
            ComponentKind::Element(decl) => {
                if component.global && !top {
                    let reference = self.qname(id);
                    self.line(
                        depth,
                        &format!("<element ref=\"{}\"{}/>", reference, repeated_attr),
                    );
                    return;
                }
                let abstract_attr = if decl.is_abstract { " abstract=\"true\"" } else { "" };
                match decl.ty {
                    Some(ty) if set.is_anonymous_type_of(ty, id) => {
                        self.line(
                            depth,
                            &format!("<element{}{}{}>", name_attr, abstract_attr, repeated_attr),
                        );
                        self.component(ty, depth + 1, false, false);
                        self.line(depth, "</element>");
                    }
                    Some(ty) => {
                        let ty = self.qname(ty);
                        self.line(
                            depth,
                            &format!(
                                "<element{} type=\"{}\"{}{}/>",
                                name_attr, ty, abstract_attr, repeated_attr
                            ),
                        );
                    }
                    None => self.line(
                        depth,
                        &format!("<element{}{}{}/>", name_attr, abstract_attr, repeated_attr),
                    ),
                }
            }
            ComponentKind::Attribute(attr) => match attr.ty {
                Some(ty) => {
                    let ty = self.qname(ty);
                    self.line(depth, &format!("<attribute{} type=\"{}\"/>", name_attr, ty));
                }
                None => self.line(depth, &format!("<attribute{}/>", name_attr)),
            },
            ComponentKind::SimpleType(simple) => match simple.base {
                Some(base) => {
                    let base = self.qname(base);
                    self.line(depth, &format!("<simpleType{}>", name_attr));
                    self.line(depth + 1, &format!("<restriction base=\"{}\"/>", base));
                    self.line(depth, "</simpleType>");
                }
                None => self.line(depth, &format!("<simpleType{}/>", name_attr)),
            },
            ComponentKind::ModelGroup(group) => {
                let keyword = group.compositor.keyword();
                self.line(depth, &format!("<{}>", keyword));
                for particle in &group.particles {
                    self.particle(particle, depth + 1);
                }
                self.line(depth, &format!("</{}>", keyword));
            }
            ComponentKind::ComplexType(ty) => {
                let abstract_attr = if ty.is_abstract { " abstract=\"true\"" } else { "" };
                if ty.content.is_empty() && ty.attributes.is_empty() && ty.base.is_none() {
                    self.line(depth, &format!("<complexType{}{}/>", name_attr, abstract_attr));
                    return;
                }
                self.line(depth, &format!("<complexType{}{}>", name_attr, abstract_attr));

                let mut inner = depth + 1;
                let derivation = ty.base.map(|base| {
                    let keyword = match ty.derivation {
                        crate::Derivation::Extension => "extension",
                        crate::Derivation::Restriction => "restriction",
                    };
                    (keyword, self.qname(base))
                });
                if let Some((keyword, base)) = &derivation {
                    self.line(inner, "<complexContent>");
                    self.line(inner + 1, &format!("<{} base=\"{}\">", keyword, base));
                    inner += 2;
                }

                for particle in &ty.content {
                    self.particle(particle, inner);
                }
                for &attr in &ty.attributes {
                    self.component(attr, inner, false, false);
                }

                if let Some((keyword, _)) = &derivation {
                    self.line(depth + 2, &format!("</{}>", keyword));
                    self.line(depth + 1, "</complexContent>");
                }
                self.line(depth, "</complexType>");
            }
        }
    }

    fn particle(&mut self, particle: &Particle, depth: usize) {
        self.component(particle.term, depth, false, particle.repeated);
    }

    fn qname(&self, id: ComponentId) -> String {
        let component = self.set.component(id);
        let name = component.name_or_empty();
        if component.target_namespace == XML_SCHEMA_NS {
            format!("xs:{}", name)
        } else if component.target_namespace == self.home {
            format!("tns:{}", name)
        } else {
            format!("{{{}}}{}", component.target_namespace, name)
        }
    }

    fn line(&mut self, depth: usize, text: &str) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        let _ = writeln!(self.out, "{}", text);
    }
}
