//! Body construction

use std::rc::Rc;

use tracing::{debug, trace};
use xbind_model::{ClassId, ClassScope};
use xbind_schema::{component_name, ComponentId};

use super::{Cursor, Resolver};
use crate::config::LocalScoping;
use crate::diagnostics::ReservedClassNameError;
use crate::error::ResolveError;
use crate::registry::Binding;

impl Resolver<'_> {
    /// Build the body of a binding's class.
    ///
    /// Does nothing for non-class targets and for classes whose build has
    /// already started, so calling it twice visits the declaration once.
    pub fn build(&mut self, binding: Binding) -> Result<(), ResolveError> {
        let Some(class) = binding.class() else {
            return Ok(());
        };
        if self.built.contains(class) {
            trace!(component = %binding.component, "body already built");
            return Ok(());
        }

        if let Err(cycle) = self.building.enter(binding.component) {
            return Err(ResolveError::BuildCycle {
                path: cycle.into_path(),
            });
        }
        // claimed before recursing, so reentrant builds of this class are no-ops
        self.built.claim(class);
        let result = self.build_body(binding.component, class);
        self.building.exit();
        result?;

        if self.schema.component(binding.component).bind_info.property.is_some() {
            self.acknowledge(binding.component);
        }
        Ok(())
    }

    fn build_body(&mut self, component: ComponentId, class: ClassId) -> Result<(), ResolveError> {
        let schema = self.schema;
        let info = schema.component(component);
        debug!(
            component = %component,
            class = %self.model.full_name(class),
            "building body"
        );

        let name = self.model.class(class).name.clone();
        if self.config.is_reserved_class_name(&name) {
            self.diagnostics.throw(ReservedClassNameError {
                class_name: name,
                component: component_name(schema, component),
                locator: info.locator.clone(),
            });
        }

        if info.is_element() {
            let simple = schema
                .element_type(component)
                .is_some_and(|ty| schema.component(ty).is_simple_type());
            if simple {
                self.model.class_mut(class).add_constructor(["value"]);
            }
        }

        if self.config.generate_docs && self.model.class(class).doc.is_none() {
            let docs = Rc::clone(&self.docs);
            docs.synthesize(class, component, schema, &mut self.model);
        }

        let scope = match self.config.local_scoping {
            LocalScoping::Nested => ClassScope::Class(class),
            LocalScoping::Toplevel => self.model.class(class).scope,
        };

        let saved = self.cursor.replace(Cursor { component, class });
        let body_builder = Rc::clone(&self.body_builder);
        let result = if scope.is_root() {
            body_builder.build_body(component, class, self)
        } else {
            self.with_scope(scope, |r| body_builder.build_body(component, class, r))
                .and_then(|result| result)
        };
        self.cursor = saved;
        result
    }
}
