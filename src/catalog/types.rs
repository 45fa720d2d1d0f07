use serde::{Serialize, Deserialize};

/// Character that separates a generic type's name from its arity
pub const ARITY_MARKER: char = '`';

/// Kind of a type definition in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
    Struct,
    Enum,
}

/// Reference to a type used by a member or as a base type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Raw name, possibly carrying an arity marker (e.g. ``List`1``)
    pub name: String,

    /// Namespace of the referenced type, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Generic arguments in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generic_arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a reference to a non-generic type
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            generic_arguments: Vec::new(),
        }
    }

    /// Create a reference to a namespaced, non-generic type
    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            generic_arguments: Vec::new(),
        }
    }

    /// Create a reference to a constructed generic type
    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            generic_arguments: arguments,
        }
    }

    /// Whether this reference names a generic type
    pub fn is_generic(&self) -> bool {
        !self.generic_arguments.is_empty() || self.name.contains(ARITY_MARKER)
    }

    /// Namespace-qualified name, or the plain name when no namespace is set
    pub fn full_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

/// Modifier flags shared by properties, fields and methods
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemberFlags {
    pub public: bool,
    pub private: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub constructor: bool,
}

/// A property declared on (or inherited by) a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub property_type: TypeRef,

    #[serde(default)]
    pub flags: MemberFlags,

    /// Name of the type that declares this member, when it differs from the owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<String>,
}

/// A field declared on (or inherited by) a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub field_type: TypeRef,

    #[serde(default)]
    pub flags: MemberFlags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<String>,
}

/// A single method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,

    #[serde(rename = "type")]
    pub parameter_type: TypeRef,
}

/// A method or constructor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,

    /// Return type; absent for constructors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeRef>,

    #[serde(default)]
    pub flags: MemberFlags,

    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring_type: Option<String>,
}

/// A type definition as recorded in the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Raw simple name of the type
    pub name: String,

    /// Declared namespace; `None` or empty for the global namespace
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub kind: TypeKind,

    /// Base type, if any
    #[serde(default)]
    pub base_type: Option<TypeRef>,

    /// Full names of the custom attributes applied to the type
    #[serde(default)]
    pub attributes: Vec<String>,

    #[serde(default)]
    pub generic_arguments: Vec<TypeRef>,

    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,

    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,

    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Create an empty class in the given namespace
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            kind: TypeKind::Class,
            ..Self::default()
        }
    }

    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Namespace as a string slice, `None` when absent or empty
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// Check whether an attribute with the given name is applied.
    ///
    /// Matches the full name, the simple name, and the simple name without
    /// the `Attribute` suffix.
    pub fn has_attribute(&self, full_name: &str) -> bool {
        let simple = full_name.rsplit('.').next().unwrap_or(full_name);
        let short = simple.strip_suffix("Attribute").unwrap_or(simple);

        self.attributes.iter().any(|attr| {
            let attr = attr.as_str();
            attr == full_name || attr == simple || attr == short
        })
    }
}
