//! Documentation synthesis for generated classes

use xbind_model::{ClassId, Model};
use xbind_schema::{component_name, write_fragment, ComponentId, SchemaSet};

/// Writes documentation for a class that has none yet.
pub trait DocSynthesizer {
    fn synthesize(&self, class: ClassId, component: ComponentId, schema: &SchemaSet, model: &mut Model);
}

/// Documents a class with, in order, the documentation customization of
/// its declaration, where the declaration came from, and the schema
/// fragment itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaFragmentDocs;

impl DocSynthesizer for SchemaFragmentDocs {
    fn synthesize(&self, class: ClassId, component: ComponentId, schema: &SchemaSet, model: &mut Model) {
        let info = schema.component(component);
        let class = model.class_mut(class);

        if let Some(documentation) = &info.bind_info.documentation {
            class.append_doc(documentation);
        }

        let name = component_name(schema, component);
        let locator = info.locator.as_ref();
        let file = locator.and_then(|locator| locator.file_name()).unwrap_or("");
        let line = match locator.and_then(|locator| locator.line) {
            Some(line) => line.to_string(),
            None => "unknown".to_string(),
        };
        class.append_doc(&format!("Generated from {} in {}, line {}.", name, file, line));

        let fragment = write_fragment(schema, component);
        class.append_doc(&format!("<pre>\n{}</pre>", escape(&fragment)));
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
