use log::trace;

use crate::catalog::{TypeCatalog, TypeDescriptor};

/// Attribute marking types synthesized by the compiler
pub const COMPILER_GENERATED_ATTRIBUTE: &str = "System.Runtime.CompilerServices.CompilerGeneratedAttribute";

/// Base type shared by every delegate type
pub const MULTICAST_DELEGATE_TYPE: &str = "System.MulticastDelegate";

const MULTICAST_DELEGATE_NAME: &str = "MulticastDelegate";

/// A class chosen for export together with the namespace it matched
#[derive(Debug, Clone, Copy)]
pub struct SelectedType<'a> {
    pub descriptor: &'a TypeDescriptor,
    pub namespace: &'a str,
}

/// Counts of types seen and skipped during selection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub total_types: usize,
    pub selected: usize,
    pub compiler_generated: usize,
    pub not_class: usize,
    pub delegates: usize,
    pub namespace_mismatch: usize,
}

/// Selects exportable classes from a type catalog
#[derive(Debug)]
pub struct TypeFilter<'n> {
    namespaces: &'n [String],
}

impl<'n> TypeFilter<'n> {
    pub fn new(namespaces: &'n [String]) -> Self {
        Self { namespaces }
    }

    /// Select classes in the allowed namespaces, preserving catalog order
    pub fn select<'a, C>(&self, catalog: &'a C) -> (Vec<SelectedType<'a>>, FilterStats)
    where
        C: TypeCatalog + ?Sized,
        'n: 'a,
    {
        let mut stats = FilterStats::default();
        let mut selected = Vec::new();

        for descriptor in catalog.types() {
            stats.total_types += 1;

            if is_compiler_generated(descriptor) {
                trace!("Skipping compiler-generated type {}", descriptor.name);
                stats.compiler_generated += 1;
                continue;
            }
            if !descriptor.is_class() {
                stats.not_class += 1;
                continue;
            }
            if is_delegate(descriptor) {
                trace!("Skipping delegate type {}", descriptor.name);
                stats.delegates += 1;
                continue;
            }

            match self.match_namespace(descriptor) {
                Some(namespace) => {
                    selected.push(SelectedType { descriptor, namespace });
                    stats.selected += 1;
                }
                None => stats.namespace_mismatch += 1,
            }
        }

        (selected, stats)
    }

    /// First allow-list entry equal to the type's namespace
    fn match_namespace(&self, descriptor: &TypeDescriptor) -> Option<&'n str> {
        let namespace = descriptor.namespace()?;
        self.namespaces
            .iter()
            .find(|allowed| allowed.as_str() == namespace)
            .map(String::as_str)
    }
}

/// Select exportable classes from `catalog` whose namespace is in `namespaces`
pub fn select_types<'a, C>(catalog: &'a C, namespaces: &'a [String]) -> Vec<SelectedType<'a>>
where
    C: TypeCatalog + ?Sized,
{
    TypeFilter::new(namespaces).select(catalog).0
}

pub fn is_compiler_generated(descriptor: &TypeDescriptor) -> bool {
    descriptor.has_attribute(COMPILER_GENERATED_ATTRIBUTE)
}

/// Whether the type derives from `System.MulticastDelegate`.
///
/// Catalogs that omit the namespace on base types still count, but a
/// same-named type in another namespace does not.
pub fn is_delegate(descriptor: &TypeDescriptor) -> bool {
    descriptor.base_type.as_ref().is_some_and(|base| {
        let unqualified = base.namespace.as_deref().is_none_or(str::is_empty);
        base.full_name() == MULTICAST_DELEGATE_TYPE
            || (unqualified && base.name == MULTICAST_DELEGATE_NAME)
    })
}
