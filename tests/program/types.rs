//! Integration tests for the type table
//!
//! Tests type identity, rendering, tags, and shapes.

use bindcheck_program::{
    BasicKind, Field, Method, Signature, TypeShape, TypeTable, is_exported, lookup_tag,
};
use proptest::prelude::*;

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn renders_like_source() {
    let mut t = TypeTable::new();
    let string = t.basic(BasicKind::String);
    let int = t.basic(BasicKind::Int);
    let error = t.named("", "error");
    let payload = t.named("example.com/app", "Payload");
    let payload_ptr = t.pointer(payload);
    let strings = t.slice(string);
    let grid = t.array(int, 4);
    let table = t.map(string, int);
    let ch = t.chan(int);
    let ctx = t.named("context", "Context");
    let func = t.signature(Signature {
        params: vec![ctx, string],
        results: vec![string, error],
        variadic: false,
    });

    assert_eq!(t.display(payload_ptr).to_string(), "*example.com/app.Payload");
    assert_eq!(t.display(strings).to_string(), "[]string");
    assert_eq!(t.display(grid).to_string(), "[4]int");
    assert_eq!(t.display(table).to_string(), "map[string]int");
    assert_eq!(t.display(ch).to_string(), "chan int");
    assert_eq!(
        t.display(func).to_string(),
        "func(context.Context, string) (string, error)"
    );
}

#[test]
fn renders_variadic_tail() {
    let mut t = TypeTable::new();
    let string = t.basic(BasicKind::String);
    let strings = t.slice(string);
    let func = t.signature(Signature {
        params: vec![string, strings],
        results: Vec::new(),
        variadic: true,
    });
    assert_eq!(t.display(func).to_string(), "func(string, ...string)");
}

#[test]
fn renders_struct_fields() {
    let mut t = TypeTable::new();
    let string = t.basic(BasicKind::String);
    let body = t.structure(vec![Field::new("name", string)]);
    assert_eq!(t.display(body).to_string(), "struct{name string}");
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn named_types_are_nominal() {
    let mut t = TypeTable::new();
    let string = t.basic(BasicKind::String);
    let a = t.named_with("example.com/app", "A", string);
    let b = t.named_with("example.com/app", "A", string);
    assert!(t.identical(a, a));
    assert!(!t.identical(a, b));
}

#[test]
fn unnamed_types_are_structural() {
    let mut t = TypeTable::new();
    let string = t.basic(BasicKind::String);
    let s1 = t.slice(string);
    let s2 = t.slice(string);
    assert!(t.identical(s1, s2));

    let f1 = t.structure(vec![Field::new("Name", string)]);
    let f2 = t.structure(vec![Field::new("Name", string).with_tag(r#"json:"name""#)]);
    assert!(!t.identical(f1, f2));
}

// =============================================================================
// Tags and Exports
// =============================================================================

#[test]
fn tag_lookup() {
    let tag = r#"json:"id,omitempty" db:"user_id""#;
    assert_eq!(lookup_tag(tag, "json").as_deref(), Some("id,omitempty"));
    assert_eq!(lookup_tag(tag, "db").as_deref(), Some("user_id"));
    assert_eq!(lookup_tag(tag, "yaml"), None);
    assert_eq!(lookup_tag(r#"json:"-""#, "json").as_deref(), Some("-"));
}

#[test]
fn exported_names_start_upper_case() {
    assert!(is_exported("Name"));
    assert!(!is_exported("name"));
    assert!(!is_exported(""));
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn codec_method_short_circuits_shape() {
    let mut t = TypeTable::new();
    let string = t.basic(BasicKind::String);
    let body = t.structure(vec![Field::new("secret", string)]);
    let ty = t.named_with("example.com/app", "Token", body);
    assert!(matches!(t.shape(ty, |_| false), TypeShape::Struct(_)));
    t.add_method(
        ty,
        Method {
            name: "MarshalJSON".to_string(),
            pointer_receiver: false,
            decl: None,
        },
    );
    assert_eq!(t.shape(ty, |m| m == "MarshalJSON"), TypeShape::CustomCodec);
}

#[test]
fn unsupported_shapes_name_their_kind() {
    let mut t = TypeTable::new();
    let int = t.basic(BasicKind::Int);
    let ch = t.chan(int);
    let func = t.signature(Signature::default());
    assert_eq!(t.shape(ch, |_| false), TypeShape::Unsupported("channel"));
    assert_eq!(t.shape(func, |_| false), TypeShape::Unsupported("function"));
}

proptest! {
    #[test]
    fn identical_is_symmetric(depth_a in 0usize..5, depth_b in 0usize..5) {
        let mut t = TypeTable::new();
        let mut a = t.basic(BasicKind::Int);
        for _ in 0..depth_a {
            a = t.pointer(a);
        }
        let mut b = t.basic(BasicKind::Int);
        for _ in 0..depth_b {
            b = t.slice(b);
        }
        prop_assert_eq!(t.identical(a, b), t.identical(b, a));
        prop_assert_eq!(t.identical(a, b), depth_a == 0 && depth_b == 0);
    }

    #[test]
    fn tag_lookup_finds_any_simple_value(value in "[a-z_,]{0,12}") {
        let tag = format!(r#"xml:"x" json:"{value}""#);
        prop_assert_eq!(lookup_tag(&tag, "json"), Some(value));
    }
}
