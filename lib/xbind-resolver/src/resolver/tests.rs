use std::cell::{Cell, RefCell};
use std::rc::Rc;

use xbind_model::{BuiltinLeaf, ClassId, ClassScope, PropertyKind, TypeRef};
use xbind_reporting::DiagnosticContext;
use xbind_schema::{ComponentId, SchemaSet, SchemaSetBuilder};

use super::Resolver;
use crate::body::{BodyBuilder, PropertyBuilder};
use crate::config::{LocalScoping, ResolverConfig};
use crate::diagnostics::{
    IncorrectPackageNameError, ReservedClassNameError, UnusedCustomizationWarning,
};
use crate::error::ResolveError;
use crate::naming::{NameConverter, StandardNameConverter};
use crate::policy::{DefaultPolicy, MappingPolicy};

const NS: &str = "urn:example";

/// Counts body builds and delegates to the property builder.
#[derive(Default)]
struct CountingBuilder {
    visits: Cell<usize>,
    depths: RefCell<Vec<usize>>,
    cursors: RefCell<Vec<Option<ClassId>>>,
}

impl BodyBuilder for CountingBuilder {
    fn build_body(
        &self,
        component: ComponentId,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        self.visits.set(self.visits.get() + 1);
        self.depths.borrow_mut().push(resolver.scope_depth());
        self.cursors.borrow_mut().push(resolver.current_class());
        PropertyBuilder.build_body(component, class, resolver)
    }
}

/// Records the scope seen while proposing.
#[derive(Default)]
struct ScopeRecorder {
    seen: RefCell<Vec<(ComponentId, ClassScope)>>,
}

impl MappingPolicy for ScopeRecorder {
    fn propose(
        &self,
        component: ComponentId,
        resolver: &mut Resolver<'_>,
    ) -> Result<Option<TypeRef>, ResolveError> {
        self.seen
            .borrow_mut()
            .push((component, resolver.current_scope()));
        DefaultPolicy.propose(component, resolver)
    }
}

/// Asks for its own component while proposing it.
struct SelfReferencing;

impl MappingPolicy for SelfReferencing {
    fn propose(
        &self,
        component: ComponentId,
        resolver: &mut Resolver<'_>,
    ) -> Result<Option<TypeRef>, ResolveError> {
        resolver.bind_to_type(component)
    }
}

/// Derives the same malformed package for every namespace.
struct BadPackages;

impl NameConverter for BadPackages {
    fn to_class_name(&self, name: &str) -> String {
        StandardNameConverter.to_class_name(name)
    }

    fn to_property_name(&self, name: &str) -> String {
        StandardNameConverter.to_property_name(name)
    }

    fn to_package_name(&self, _namespace: &str) -> Option<String> {
        Some("bad name".to_string())
    }
}

fn class_of(ty: Option<TypeRef>) -> ClassId {
    match ty {
        Some(TypeRef::Class(class)) => class,
        other => panic!("expected a class, got {:?}", other),
    }
}

/// `Order` with a local element `item` of anonymous type, whose local
/// element `detail` again has an anonymous type.
fn nested_schema() -> (SchemaSet, ComponentId) {
    let mut builder = SchemaSetBuilder::new();
    let string = builder.builtin("string");
    let order = builder.global_complex_type(NS, "Order");
    let item = builder.local_element(order, "item", None);
    let item_type = builder.anonymous_complex_type(item);
    let detail = builder.local_element(item_type, "detail", None);
    let detail_type = builder.anonymous_complex_type(detail);
    builder.attribute(detail_type, "code", Some(string));
    (builder.build(), order)
}

#[test]
fn test_single_binding_per_component() {
    let (schema, order) = nested_schema();
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());

    let first = resolver.bind_to_type(order).unwrap();
    let second = resolver.bind_to_type(order).unwrap();

    assert!(first.is_some());
    assert_eq!(first, second);
    assert_eq!(resolver.model().class_count(), 1);
    assert_eq!(resolver.pending(), 1);
}

#[test]
fn test_idempotent_body_construction() {
    let (schema, order) = nested_schema();
    let counter = Rc::new(CountingBuilder::default());
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_body_builder(counter.clone());

    resolver.bind_to_type(order).unwrap();
    let binding = resolver.binding(order).unwrap();
    resolver.build(binding).unwrap();
    resolver.build(binding).unwrap();
    assert_eq!(counter.visits.get(), 1);

    // draining the queued copy of the same binding builds nothing new
    let before = counter.visits.get();
    resolver.drain_queue().unwrap();
    let nested = counter.visits.get() - before;
    assert_eq!(nested, 2);
}

#[test]
fn test_drain_reaches_fixpoint() {
    let (schema, order) = nested_schema();
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());

    resolver.bind_to_type(order).unwrap();
    let processed = resolver.drain_queue().unwrap();

    assert_eq!(processed, 3);
    assert_eq!(resolver.pending(), 0);
    assert_eq!(resolver.built_count(), 3);
    for (class, _) in resolver.model().classes() {
        assert!(resolver.is_built(class));
    }

    let model = resolver.into_model();
    let detail = model.find_class("example.Order.Item.Detail").unwrap();
    assert_eq!(
        model.class(detail).property("code").and_then(|p| p.ty),
        Some(TypeRef::Builtin(BuiltinLeaf::String))
    );
}

#[test]
fn test_scope_balance_with_diagnostics() {
    let mut builder = SchemaSetBuilder::new();
    let factory = builder.global_complex_type(NS, "ObjectFactory");
    let inner = builder.local_element(factory, "inner", None);
    builder.anonymous_complex_type(inner);
    let schema = builder.build();

    let counter = Rc::new(CountingBuilder::default());
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_body_builder(counter.clone());

    resolver.bind_to_type(factory).unwrap();
    assert_eq!(resolver.scope_depth(), 0);
    resolver.drain_queue().unwrap();
    assert_eq!(resolver.scope_depth(), 0);
    assert_eq!(resolver.current_scope(), ClassScope::Root);

    // exactly the class scope is pushed while a body is built
    assert_eq!(*counter.depths.borrow(), vec![1, 1]);
    assert_eq!(diagnostics.count(ReservedClassNameError::KEY), 1);
}

#[test]
fn test_package_name_checked_once() {
    let mut builder = SchemaSetBuilder::new();
    builder.global_complex_type("urn:one", "A");
    builder.global_complex_type("urn:two", "B");
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_name_converter(Rc::new(BadPackages));

    let one = resolver.package_for("urn:one");
    let two = resolver.package_for("urn:two");
    assert_eq!(one, two);
    assert_eq!(resolver.model().package_name(one), "bad name");
    assert_eq!(diagnostics.count(IncorrectPackageNameError::KEY), 1);
}

#[test]
fn test_global_declaration_proposed_under_package() {
    let mut builder = SchemaSetBuilder::new();
    let order = builder.global_complex_type(NS, "Order");
    let schema = builder.build();

    let recorder = Rc::new(ScopeRecorder::default());
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_policy(recorder.clone());

    let before = resolver.current_scope();
    resolver.bind_to_type(order).unwrap();
    let package = resolver.package_for(NS);

    assert_eq!(
        *recorder.seen.borrow(),
        vec![(order, ClassScope::Package(package))]
    );
    assert_eq!(resolver.current_scope(), before);
}

#[test]
fn test_reserved_name_still_built() {
    let mut builder = SchemaSetBuilder::new();
    let factory = builder.global_complex_type(NS, "ObjectFactory");
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    let class = class_of(resolver.bind_to_type(factory).unwrap());
    resolver.drain_queue().unwrap();
    assert!(resolver.is_built(class));

    assert_eq!(diagnostics.count(ReservedClassNameError::KEY), 1);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_conflicting_binding_is_fatal() {
    let mut builder = SchemaSetBuilder::new();
    let order = builder.global_complex_type(NS, "Order");
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    let class = class_of(resolver.bind_to_type(order).unwrap());
    let other = resolver.model_mut().new_class("Other", ClassScope::Root);

    assert!(resolver.queue_build(order, class.into()).is_ok());
    assert_eq!(
        resolver.queue_build(order, other.into()),
        Err(ResolveError::ConflictingBinding {
            component: order,
            existing: class.into(),
            proposed: other.into(),
        })
    );
    assert_eq!(resolver.pending(), 1);
}

#[test]
fn test_decline_is_not_cached() {
    let (schema, order) = nested_schema();
    let item = schema.children(order)[0];
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());

    assert_eq!(resolver.bind_to_type(item).unwrap(), None);
    assert!(resolver.binding(item).is_none());
    assert_eq!(resolver.is_bound(item).unwrap(), None);
    assert_eq!(resolver.pending(), 0);
}

#[test]
fn test_any_type_is_prebound() {
    let schema = SchemaSet::new();
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());

    assert_eq!(
        resolver.bind_to_type(schema.any_type()).unwrap(),
        Some(TypeRef::Builtin(BuiltinLeaf::AnyType))
    );
    assert_eq!(resolver.pending(), 0);
}

#[test]
fn test_extension_cycle_fails_fast() {
    let mut builder = SchemaSetBuilder::new();
    let a = builder.global_complex_type(NS, "A");
    let b = builder.global_complex_type(NS, "B");
    builder.extend(a, b).extend(b, a);
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    resolver.bind_to_type(a).unwrap();

    assert_eq!(
        resolver.drain_queue(),
        Err(ResolveError::BuildCycle {
            path: vec![a, b, a]
        })
    );
    assert_eq!(resolver.scope_depth(), 0);
}

#[test]
fn test_self_extension_fails_fast() {
    let mut builder = SchemaSetBuilder::new();
    let a = builder.global_complex_type(NS, "A");
    builder.extend(a, a);
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());

    assert_eq!(
        resolver.bind_to_type_immediately(a),
        Err(ResolveError::BuildCycle { path: vec![a, a] })
    );
}

#[test]
fn test_proposal_cycle_fails_fast() {
    let mut builder = SchemaSetBuilder::new();
    let a = builder.global_complex_type(NS, "A");
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_policy(Rc::new(SelfReferencing));

    assert_eq!(
        resolver.bind_to_type(a),
        Err(ResolveError::ProposalCycle { path: vec![a, a] })
    );
    assert_eq!(resolver.scope_depth(), 0);
}

#[test]
fn test_element_type_cycle_is_broken() {
    let mut builder = SchemaSetBuilder::new();
    let note_type = builder.global_complex_type(NS, "Note");
    let note = builder.global_element(NS, "note", Some(note_type));
    builder.element_ref(note_type, note);
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    let wrapper = resolver.bind_element(note).unwrap();
    resolver.drain_queue().unwrap();
    let model = resolver.into_model();

    let wrapper = wrapper.and_then(TypeRef::as_element).unwrap();
    let class = model.find_class("example.Note").unwrap();
    assert_eq!(model.element(wrapper).content, Some(class.into()));
    let property = model.class(class).property("note").unwrap();
    assert_eq!(property.kind, PropertyKind::Reference);
    assert_eq!(property.ty, Some(wrapper.into()));
}

#[test]
fn test_toplevel_scoping_flattens_local_classes() {
    let (schema, order) = nested_schema();
    let mut diagnostics = DiagnosticContext::new();
    let config = ResolverConfig::default().with_local_scoping(LocalScoping::Toplevel);
    let mut resolver = Resolver::new(&schema, &mut diagnostics, config);

    resolver.bind_to_type(order).unwrap();
    resolver.drain_queue().unwrap();
    let model = resolver.into_model();

    assert!(model.find_class("example.Order").is_some());
    assert!(model.find_class("example.Item").is_some());
    assert!(model.find_class("example.Detail").is_some());
}

#[test]
fn test_cursor_restored_after_build() {
    let (schema, order) = nested_schema();
    let counter = Rc::new(CountingBuilder::default());
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_body_builder(counter.clone());

    let class = class_of(resolver.bind_to_type_immediately(order).unwrap());
    assert_eq!(counter.cursors.borrow()[0], Some(class));
    assert_eq!(resolver.current_class(), None);
    assert_eq!(resolver.current_component(), None);
}

#[test]
fn test_value_constructor_for_simple_element_class() {
    let mut builder = SchemaSetBuilder::new();
    let string = builder.builtin("string");
    let title = builder.global_element(NS, "title", Some(string));
    builder.class_name(title, "Title");
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    let class = class_of(resolver.bind_to_type_immediately(title).unwrap());
    let model = resolver.into_model();

    assert_eq!(model.class(class).constructors, vec![vec!["value".to_string()]]);
    assert_eq!(
        model.class(class).property("value").map(|p| p.kind),
        Some(PropertyKind::Value)
    );
}

#[test]
fn test_abstract_declarations() {
    let mut builder = SchemaSetBuilder::new();
    let shape = builder.global_complex_type(NS, "Shape");
    builder.set_abstract(shape);
    let any = builder.global_element(NS, "anyShape", Some(shape));
    builder.set_abstract(any);
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());

    assert_eq!(resolver.bind_to_type(any).unwrap(), None);
    let class = class_of(resolver.bind_to_type(shape).unwrap());
    assert!(resolver.model().class(class).is_abstract);
}

#[test]
fn test_unused_customization_reported() {
    let mut builder = SchemaSetBuilder::new();
    let string = builder.builtin("string");
    let order = builder.global_complex_type(NS, "Order");
    let used = builder.local_element(order, "id", Some(string));
    builder.property(used, Some("identifier"));
    let unused = builder.global_simple_type(NS, "Code", string);
    builder.property(unused, None);
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    let class = class_of(resolver.bind_to_type(order).unwrap());
    resolver.drain_queue().unwrap();
    resolver.report_unacknowledged();
    assert!(resolver.is_acknowledged(used));
    assert!(resolver.model().class(class).property("identifier").is_some());

    assert_eq!(diagnostics.count(UnusedCustomizationWarning::KEY), 1);
}

/// Pops the class scope it was handed.
struct PopsClassScope;

impl BodyBuilder for PopsClassScope {
    fn build_body(
        &self,
        _component: ComponentId,
        _class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        resolver.pop_scope()?;
        Ok(())
    }
}

/// Pushes a scope and never pops it.
struct LeavesScopePushed;

impl BodyBuilder for LeavesScopePushed {
    fn build_body(
        &self,
        _component: ComponentId,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        resolver.push_scope(ClassScope::Class(class))
    }
}

#[test]
fn test_popping_the_class_scope_is_fatal() {
    let (schema, order) = nested_schema();
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_body_builder(Rc::new(PopsClassScope));

    resolver.bind_to_type(order).unwrap();
    assert_eq!(
        resolver.drain_queue(),
        Err(ResolveError::UnbalancedScope {
            expected: 1,
            found: 0
        })
    );
    assert_eq!(resolver.scope_depth(), 0);
}

#[test]
fn test_leftover_scope_is_fatal() {
    let (schema, order) = nested_schema();
    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default())
        .with_body_builder(Rc::new(LeavesScopePushed));

    resolver.bind_to_type(order).unwrap();
    assert_eq!(
        resolver.drain_queue(),
        Err(ResolveError::UnbalancedScope {
            expected: 1,
            found: 2
        })
    );
}

#[test]
fn test_repetition_follows_each_reference() {
    let mut builder = SchemaSetBuilder::new();
    let string = builder.builtin("string");
    let note = builder.global_element(NS, "note", Some(string));
    let single = builder.global_complex_type(NS, "Single");
    builder.element_ref(single, note);
    let many = builder.global_complex_type(NS, "Many");
    builder.element_ref(many, note).set_repeated(many, note);
    let schema = builder.build();

    let mut diagnostics = DiagnosticContext::new();
    let mut resolver = Resolver::new(&schema, &mut diagnostics, ResolverConfig::default());
    resolver.bind_to_type(single).unwrap();
    resolver.bind_to_type(many).unwrap();
    resolver.drain_queue().unwrap();
    let model = resolver.into_model();

    let single = model.find_class("example.Single").unwrap();
    let many = model.find_class("example.Many").unwrap();
    assert!(!model.class(single).property("note").unwrap().repeated);
    assert!(model.class(many).property("note").unwrap().repeated);
}
