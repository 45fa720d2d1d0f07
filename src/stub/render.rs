//! Text rendering of class stubs.
//!
//! A stub lists a class's public properties and fields and every method the
//! catalog reports for it. Empty modifier tokens are dropped, so a line never
//! carries doubled or trailing spaces:
//!
//! ```text
//! namespace Game {
//!
//! public Class Foo {
//! public static Int32 Count
//! public Boolean Bar(String name)
//!
//! }
//! }
//! ```

use crate::catalog::{
    TypeDescriptor, TypeRef, MemberFlags, MethodDescriptor, ParameterDescriptor,
    types::ARITY_MARKER,
};

/// Separator between generic arguments and between parameters
pub const LIST_SEPARATOR: &str = " , ";

/// Options controlling which members are rendered
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Include members whose declaring type differs from the class
    pub include_inherited: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { include_inherited: true }
    }
}

/// Render a type reference as a human-readable name.
///
/// Generic references drop the arity marker and list their arguments
/// recursively, e.g. ``Dictionary`2[String, List`1[Int32]]`` becomes
/// `Dictionary<String , List<Int32>>`.
pub fn render_type_name(type_ref: &TypeRef) -> String {
    if !type_ref.is_generic() {
        return type_ref.name.clone();
    }

    let base = match type_ref.name.find(ARITY_MARKER) {
        Some(index) => &type_ref.name[..index],
        None => type_ref.name.as_str(),
    };

    let arguments: Vec<String> = type_ref.generic_arguments.iter().map(render_type_name).collect();
    format!("{}<{}>", base, arguments.join(LIST_SEPARATOR))
}

/// Render a method's parameter list without the surrounding parentheses
pub fn render_parameters(parameters: &[ParameterDescriptor]) -> String {
    parameters
        .iter()
        .map(|p| format!("{} {}", render_type_name(&p.parameter_type), p.name))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Render one method line (without the trailing newline)
pub fn render_method(method: &MethodDescriptor) -> String {
    let flags = &method.flags;
    let visibility = if flags.private {
        "private"
    } else if flags.public {
        "public"
    } else {
        ""
    };

    let return_type = match &method.return_type {
        Some(return_type) if !flags.constructor => render_type_name(return_type),
        _ => String::new(),
    };

    let signature = format!("{}({})", method.name, render_parameters(&method.parameters));

    join_tokens(&[
        visibility,
        static_token(flags),
        if flags.is_virtual { "virtual" } else { "" },
        if flags.is_abstract { "abstract" } else { "" },
        return_type.as_str(),
        signature.as_str(),
    ])
}

/// Render a property or field line (without the trailing newline)
pub fn render_data_member(flags: &MemberFlags, member_type: &TypeRef, name: &str) -> String {
    let type_name = render_type_name(member_type);
    join_tokens(&["public", static_token(flags), type_name.as_str(), name])
}

/// Member counts of a rendered stub
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemberCounts {
    pub properties: usize,
    pub fields: usize,
    pub methods: usize,
}

/// Render the complete stub for `class` inside `namespace`
pub fn render_class(class: &TypeDescriptor, namespace: &str, options: &RenderOptions) -> (String, MemberCounts) {
    let mut out = String::new();
    let mut counts = MemberCounts::default();
    let keep = |declaring_type: &Option<String>| {
        options.include_inherited
            || declaring_type.as_deref().is_none_or(|declaring| declaring == class.name)
    };

    out.push_str(&format!("namespace {} {{\n\n", namespace));
    out.push_str(&format!("public Class {} {{\n", class.name));

    for property in class.properties.iter().filter(|p| p.flags.public && keep(&p.declaring_type)) {
        out.push_str(&render_data_member(&property.flags, &property.property_type, &property.name));
        out.push('\n');
        counts.properties += 1;
    }

    for field in class.fields.iter().filter(|f| f.flags.public && keep(&f.declaring_type)) {
        out.push_str(&render_data_member(&field.flags, &field.field_type, &field.name));
        out.push('\n');
        counts.fields += 1;
    }

    for method in class.methods.iter().filter(|m| keep(&m.declaring_type)) {
        out.push_str(&render_method(method));
        out.push_str("\n\n");
        counts.methods += 1;
    }

    out.push_str("}\n}\n");
    (out, counts)
}

fn static_token(flags: &MemberFlags) -> &'static str {
    if flags.is_static { "static" } else { "" }
}

fn join_tokens(tokens: &[&str]) -> String {
    tokens
        .iter()
        .filter(|token| !token.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::catalog::{FieldDescriptor, PropertyDescriptor};

    fn list_of(argument: TypeRef) -> TypeRef {
        TypeRef::generic("List`1", vec![argument])
    }

    fn public() -> MemberFlags {
        MemberFlags { public: true, ..MemberFlags::default() }
    }

    fn method(name: &str, return_type: Option<TypeRef>, flags: MemberFlags, parameters: Vec<ParameterDescriptor>) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            return_type,
            flags,
            parameters,
            declaring_type: None,
        }
    }

    fn param(type_name: &str, name: &str) -> ParameterDescriptor {
        ParameterDescriptor { name: name.to_string(), parameter_type: TypeRef::simple(type_name) }
    }

    #[test_case(TypeRef::simple("Int32"), "Int32" ; "plain")]
    #[test_case(list_of(TypeRef::simple("Int32")), "List<Int32>" ; "list")]
    #[test_case(
        TypeRef::generic("Dictionary`2", vec![TypeRef::simple("String"), list_of(TypeRef::simple("Int32"))]),
        "Dictionary<String , List<Int32>>" ; "nested last"
    )]
    #[test_case(
        TypeRef::generic("Dictionary`2", vec![list_of(TypeRef::simple("Int32")), TypeRef::simple("String")]),
        "Dictionary<List<Int32> , String>" ; "nested first"
    )]
    #[test_case(
        TypeRef::generic("Func`3", vec![
            list_of(list_of(TypeRef::simple("Single"))),
            TypeRef::generic("KeyValuePair`2", vec![TypeRef::simple("String"), TypeRef::simple("Int32")]),
            TypeRef::simple("Boolean"),
        ]),
        "Func<List<List<Single>> , KeyValuePair<String , Int32> , Boolean>" ; "deep"
    )]
    #[test_case(TypeRef::generic("Nullable", vec![TypeRef::simple("Int32")]), "Nullable<Int32>" ; "no arity marker")]
    #[test_case(list_of(TypeRef::simple("T")), "List<T>" ; "open generic")]
    fn test_render_type_name(type_ref: TypeRef, expected: &str) {
        assert_eq!(render_type_name(&type_ref), expected);
    }

    #[test]
    fn test_render_method_tokens() {
        let flags = MemberFlags { public: true, is_static: true, is_virtual: true, is_abstract: true, ..MemberFlags::default() };
        let line = render_method(&method(
            "Spawn",
            Some(TypeRef::simple("GameObject")),
            flags,
            vec![param("String", "prefab"), param("Int32", "count")],
        ));
        assert_eq!(line, "public static virtual abstract GameObject Spawn(String prefab , Int32 count)");
    }

    #[test]
    fn test_render_method_visibility() {
        let private = MemberFlags { private: true, ..MemberFlags::default() };
        let protected = MemberFlags::default();

        assert_eq!(render_method(&method("Tick", Some(TypeRef::simple("Void")), private, vec![])), "private Void Tick()");
        assert_eq!(render_method(&method("OnHit", Some(TypeRef::simple("Void")), protected, vec![])), "Void OnHit()");
    }

    #[test]
    fn test_render_constructor_has_no_return_type() {
        let flags = MemberFlags { public: true, constructor: true, ..MemberFlags::default() };
        let line = render_method(&method(".ctor", Some(TypeRef::simple("Void")), flags, vec![param("Int32", "seed")]));
        assert_eq!(line, "public .ctor(Int32 seed)");
    }

    #[test]
    fn test_render_generic_parameter() {
        let line = render_method(&method(
            "Load",
            Some(TypeRef::simple("Boolean")),
            public(),
            vec![ParameterDescriptor { name: "items".into(), parameter_type: list_of(TypeRef::simple("Item")) }],
        ));
        assert_eq!(line, "public Boolean Load(List<Item> items)");
    }

    #[test]
    fn test_render_empty_class() {
        let class = TypeDescriptor::class("Game", "Empty");
        let (text, counts) = render_class(&class, "Game", &RenderOptions::default());

        assert_eq!(text, "namespace Game {\n\npublic Class Empty {\n}\n}\n");
        assert_eq!(counts, MemberCounts::default());
    }

    #[test]
    fn test_render_class_scenario() {
        let mut class = TypeDescriptor::class("Game", "Foo");
        class.fields.push(FieldDescriptor {
            name: "Count".into(),
            field_type: TypeRef::qualified("System", "Int32"),
            flags: MemberFlags { public: true, is_static: true, ..MemberFlags::default() },
            declaring_type: None,
        });
        class.methods.push(method("Bar", Some(TypeRef::simple("Boolean")), public(), vec![param("String", "name")]));

        let (text, counts) = render_class(&class, "Game", &RenderOptions::default());

        assert_eq!(
            text,
            "namespace Game {\n\npublic Class Foo {\npublic static Int32 Count\npublic Boolean Bar(String name)\n\n}\n}\n"
        );
        assert_eq!(counts, MemberCounts { properties: 0, fields: 1, methods: 1 });
    }

    #[test]
    fn test_render_class_lists_properties_before_fields_and_skips_non_public() {
        let mut class = TypeDescriptor::class("GameLogic", "Inventory`1");
        class.generic_arguments.push(TypeRef::simple("T"));
        class.fields.push(FieldDescriptor {
            name: "capacity".into(),
            field_type: TypeRef::simple("Int32"),
            flags: MemberFlags { private: true, ..MemberFlags::default() },
            declaring_type: None,
        });
        class.fields.push(FieldDescriptor {
            name: "Owner".into(),
            field_type: TypeRef::simple("String"),
            flags: public(),
            declaring_type: None,
        });
        class.properties.push(PropertyDescriptor {
            name: "Items".into(),
            property_type: list_of(TypeRef::simple("T")),
            flags: public(),
            declaring_type: None,
        });

        let (text, counts) = render_class(&class, "GameLogic", &RenderOptions::default());

        assert_eq!(
            text,
            "namespace GameLogic {\n\npublic Class Inventory`1 {\npublic List<T> Items\npublic String Owner\n}\n}\n"
        );
        assert_eq!(counts.fields, 1);
    }

    #[test]
    fn test_render_class_inherited_members() {
        let mut class = TypeDescriptor::class("Game", "Player");
        class.methods.push(method("Move", Some(TypeRef::simple("Void")), public(), vec![]));
        class.methods.push(MethodDescriptor {
            declaring_type: Some("Object".into()),
            ..method("ToString", Some(TypeRef::simple("String")), MemberFlags { public: true, is_virtual: true, ..MemberFlags::default() }, vec![])
        });
        class.methods.push(MethodDescriptor {
            declaring_type: Some("Player".into()),
            ..method("Jump", Some(TypeRef::simple("Void")), public(), vec![])
        });

        let (all, _) = render_class(&class, "Game", &RenderOptions { include_inherited: true });
        assert!(all.contains("public virtual String ToString()\n"));

        let (declared, counts) = render_class(&class, "Game", &RenderOptions { include_inherited: false });
        assert!(!declared.contains("ToString"));
        assert!(declared.contains("public Void Move()\n"));
        assert!(declared.contains("public Void Jump()\n"));
        assert_eq!(counts.methods, 2);
    }

    #[test]
    fn test_duplicate_members_are_emitted_as_is() {
        let mut class = TypeDescriptor::class("Game", "Overloads");
        class.methods.push(method("Fire", Some(TypeRef::simple("Void")), public(), vec![]));
        class.methods.push(method("Fire", Some(TypeRef::simple("Void")), public(), vec![]));

        let (text, counts) = render_class(&class, "Game", &RenderOptions::default());
        assert_eq!(text.matches("public Void Fire()").count(), 2);
        assert_eq!(counts.methods, 2);
    }
}
