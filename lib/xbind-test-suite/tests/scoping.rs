use xbind_resolver::ResolverConfig;
use xbind_test_suite::*;

const ORDERS: &str = r#"
[[schema]]
namespace = "urn:example"

[[schema.complex_type]]
name = "Order"

[[schema.complex_type.element]]
name = "item"
repeated = true

[schema.complex_type.element.complex_type]

[[schema.complex_type.element.complex_type.element]]
name = "sku"
type = "xs:string"

[[schema.complex_type.element.complex_type.element]]
name = "detail"

[schema.complex_type.element.complex_type.element.complex_type]

[[schema.complex_type.element.complex_type.element.complex_type.attribute]]
name = "code"
type = "xs:string"

[[schema.complex_type.attribute]]
name = "id"
type = "xs:int"

[[schema.element]]
name = "order"
type = "Order"
"#;

fn no_docs() -> ResolverConfig {
    ResolverConfig::default().with_generate_docs(false)
}

mod nested {
    use super::*;

    #[test]
    fn anonymous_types_nest_in_their_owner() {
        Test::new(ORDERS)
            .with_config(no_docs())
            .expect(Compiles)
            .expect(ModelTree(
                r#"
package example
  class Order
    item: example.Order.Item[]
    @id: int
    class Item
      sku: String
      detail: example.Order.Item.Detail
      class Detail
        @code: String
  element order: example.Order
"#,
            ));
    }

    #[test]
    fn local_class_is_found_by_qualified_name() {
        Test::new(ORDERS)
            .expect(Class::new("example.Order.Item.Detail").has(Behavior::Property("code", "String")))
            .expect(NoClass("example.Item"))
            .expect(NoClass("example.Detail"));
    }

    #[test]
    fn element_class_owns_its_local_classes() {
        Test::new(
            r#"
[[schema]]
namespace = "urn:example"

[[schema.element]]
name = "purchaseOrder"

[schema.element.complex_type]

[[schema.element.complex_type.element]]
name = "items"

[schema.element.complex_type.element.complex_type]

[[schema.element.complex_type.element.complex_type.element]]
name = "count"
type = "xs:int"
"#,
        )
        .expect(Compiles)
        .expect(
            Class::new("example.PurchaseOrder")
                .has(Behavior::Property("items", "example.PurchaseOrder.Items")),
        )
        .expect(Class::new("example.PurchaseOrder.Items").has(Behavior::Property("count", "int")));
    }

    #[test]
    fn same_local_name_in_two_owners() {
        Test::new(
            r#"
[[schema]]
namespace = "urn:example"

[[schema.complex_type]]
name = "Order"

[[schema.complex_type.element]]
name = "line"

[schema.complex_type.element.complex_type]

[[schema.complex_type]]
name = "Invoice"

[[schema.complex_type.element]]
name = "line"

[schema.complex_type.element.complex_type]
"#,
        )
        .expect(Compiles)
        .expect(Class::new("example.Order.Line"))
        .expect(Class::new("example.Invoice.Line"));
    }
}

mod toplevel {
    use super::*;

    fn toplevel() -> ResolverConfig {
        no_docs().with_local_scoping(LocalScoping::Toplevel)
    }

    #[test]
    fn local_classes_move_to_the_package() {
        Test::new(ORDERS)
            .with_config(toplevel())
            .expect(Compiles)
            .expect(Class::new("example.Item").has(Behavior::Property("detail", "example.Detail")))
            .expect(Class::new("example.Detail"))
            .expect(NoClass("example.Order.Item"));
    }

    #[test]
    fn toplevel_tree() {
        Test::new(ORDERS).with_config(toplevel()).expect(ModelTree(
            r#"
package example
  class Order
    item: example.Item[]
    @id: int
  class Item
    sku: String
    detail: example.Detail
  class Detail
    @code: String
  element order: example.Order
"#,
        ));
    }
}
