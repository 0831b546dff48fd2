use std::fmt;

use serde::Serialize;

use super::naming::NamingStrategy;
use super::simple_types::SimpleTypeHolder;
use crate::core::{FieldDescriptor, TypeDescriptor};

/// How a property is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyKind {
    /// A single column value.
    Simple,
    /// An embedded aggregate member that is itself an entity.
    Entity,
    /// A pointer to another aggregate by identifier.
    Reference,
    /// Elements stored in a child table.
    Collection { element: String },
    /// Values keyed in a child table.
    Map { key: String, value: String },
}

/// The owning entity as seen while its properties are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOwner {
    pub type_name: String,
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistentProperty {
    name: String,
    type_name: String,
    /// Owning entity type, by name only.
    owner: String,
    kind: PropertyKind,
    id: bool,
    column_name: String,
    reverse_column_name: Option<String>,
    key_column: Option<String>,
}

impl PersistentProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_id(&self) -> bool {
        self.id
    }

    pub fn is_reference(&self) -> bool {
        self.kind == PropertyKind::Reference
    }

    pub fn is_entity(&self) -> bool {
        self.kind == PropertyKind::Entity
    }

    pub fn is_collection_like(&self) -> bool {
        matches!(self.kind, PropertyKind::Collection { .. })
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, PropertyKind::Map { .. })
    }

    /// Lists and maps need a key column next to the back reference.
    pub fn is_qualified(&self) -> bool {
        self.key_column.is_some()
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn reverse_column_name(&self) -> Option<&str> {
        self.reverse_column_name.as_deref()
    }

    pub fn key_column(&self) -> Option<&str> {
        self.key_column.as_deref()
    }
}

impl fmt::Display for PersistentProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.owner, self.name, self.type_name)
    }
}

/// Builds one property per mapped field.
///
/// Implementations must be pure and must not ask the mapping context for
/// other entities; nested resolution is the context's job.
pub trait PropertyFactory: fmt::Debug + Send + Sync {
    fn create(
        &self,
        field: &FieldDescriptor,
        owner: &EntityOwner,
        simple_types: &SimpleTypeHolder,
        naming: &dyn NamingStrategy,
    ) -> PersistentProperty;
}

#[derive(Debug, Clone)]
pub struct DefaultPropertyFactory {
    reference_marker: String,
}

impl DefaultPropertyFactory {
    pub fn new(reference_marker: impl Into<String>) -> Self {
        Self {
            reference_marker: reference_marker.into(),
        }
    }

    fn classify(&self, ty: &dyn TypeDescriptor, simple_types: &SimpleTypeHolder) -> PropertyKind {
        if ty.is_assignable_to(&self.reference_marker) {
            return PropertyKind::Reference;
        }
        if simple_types.is_simple(ty) {
            return PropertyKind::Simple;
        }
        let args = ty.type_arguments();
        if ty.is_collection_like() {
            let element = args.first().map(|a| a.name().to_string()).unwrap_or_default();
            return PropertyKind::Collection { element };
        }
        if ty.is_map_like() {
            let key = args.first().map(|a| a.name().to_string()).unwrap_or_default();
            let value = args.get(1).map(|a| a.name().to_string()).unwrap_or_default();
            return PropertyKind::Map { key, value };
        }
        PropertyKind::Entity
    }
}

impl Default for DefaultPropertyFactory {
    fn default() -> Self {
        Self::new(crate::context::DEFAULT_REFERENCE_MARKER)
    }
}

impl PropertyFactory for DefaultPropertyFactory {
    fn create(
        &self,
        field: &FieldDescriptor,
        owner: &EntityOwner,
        simple_types: &SimpleTypeHolder,
        naming: &dyn NamingStrategy,
    ) -> PersistentProperty {
        let ty = field.declared_type.as_ref();
        let kind = self.classify(ty, simple_types);

        let column_name = field
            .column
            .clone()
            .unwrap_or_else(|| naming.column_name(&field.name));

        // Child-table columns pointing back at the owner.
        let (reverse_column_name, key_column) = match &kind {
            PropertyKind::Entity => (Some(naming.reverse_column_name(&owner.table_name)), None),
            PropertyKind::Collection { .. } => {
                let reverse = naming.reverse_column_name(&owner.table_name);
                // Sets carry no position; lists and arrays do.
                let key = (!matches!(ty.simple_name(), "Set" | "HashSet" | "BTreeSet"))
                    .then(|| naming.key_column(&owner.table_name));
                (Some(reverse), key)
            }
            PropertyKind::Map { .. } => (
                Some(naming.reverse_column_name(&owner.table_name)),
                Some(naming.key_column(&owner.table_name)),
            ),
            PropertyKind::Simple | PropertyKind::Reference => (None, None),
        };

        PersistentProperty {
            name: field.name.clone(),
            type_name: ty.name().to_string(),
            owner: owner.type_name.clone(),
            kind,
            id: field.id,
            column_name,
            reverse_column_name,
            key_column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DeclaredType, FieldDescriptor};
    use crate::model::DefaultNamingStrategy;

    fn owner() -> EntityOwner {
        EntityOwner {
            type_name: "PurchaseOrder".into(),
            table_name: "purchase_order".into(),
        }
    }

    fn create(field: FieldDescriptor) -> PersistentProperty {
        DefaultPropertyFactory::default().create(
            &field,
            &owner(),
            &SimpleTypeHolder::new(),
            &DefaultNamingStrategy::new(),
        )
    }

    #[test]
    fn test_simple_property() {
        let property = create(FieldDescriptor::new("customerId", DeclaredType::scalar("Long")));
        assert_eq!(property.kind(), &PropertyKind::Simple);
        assert_eq!(property.column_name(), "customer_id");
        assert_eq!(property.owner(), "PurchaseOrder");
        assert!(property.reverse_column_name().is_none());
        assert!(!property.is_qualified());
    }

    #[test]
    fn test_explicit_column_and_id() {
        let property = create(
            FieldDescriptor::new("id", DeclaredType::scalar("Long"))
                .id()
                .column("order_pk"),
        );
        assert!(property.is_id());
        assert_eq!(property.column_name(), "order_pk");
    }

    #[test]
    fn test_reference_property() {
        let customer = DeclaredType::new("Customer").build();
        let reference = DeclaredType::generic("AggregateReference", vec![customer]).build();
        let property = create(FieldDescriptor::new("customer", reference));
        assert!(property.is_reference());
        assert!(!property.is_entity());
    }

    #[test]
    fn test_list_is_qualified_and_set_is_not() {
        let item = DeclaredType::new("OrderItem").build();
        let list = create(FieldDescriptor::new(
            "items",
            DeclaredType::collection("List", item.clone()),
        ));
        assert_eq!(
            list.kind(),
            &PropertyKind::Collection {
                element: "OrderItem".into()
            }
        );
        assert_eq!(list.reverse_column_name(), Some("purchase_order"));
        assert_eq!(list.key_column(), Some("purchase_order_key"));

        let set = create(FieldDescriptor::new("tags", DeclaredType::collection("Set", item)));
        assert!(set.is_collection_like());
        assert!(!set.is_qualified());
    }

    #[test]
    fn test_map_property() {
        let map = DeclaredType::map(
            "Map",
            DeclaredType::scalar("String"),
            DeclaredType::new("Manual").build(),
        );
        let property = create(FieldDescriptor::new("manuals", map));
        assert!(property.is_map());
        assert!(property.is_qualified());
        assert_eq!(property.to_string(), "PurchaseOrder.manuals: Map<String, Manual>");
    }
}
