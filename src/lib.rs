// ============================================================================
// relmap Library
// ============================================================================

//! Entity-model mapping context for relational persistence backends.
//!
//! A [`MappingContext`] turns [`TypeDescriptor`]s into cached
//! [`PersistentEntity`] descriptors: it decides which types are mapped,
//! discovers the constructor and properties of each one, names its table
//! and columns, and validates the result through an [`EntityPolicy`].
//!
//! ```
//! use relmap::{DeclaredType, MappingContext};
//!
//! let long = DeclaredType::scalar("Long");
//! let order = DeclaredType::new("Order")
//!     .field("customerId", long.clone())
//!     .named_constructor(&[("customerId", long)])
//!     .build();
//!
//! let context = MappingContext::new();
//! let entity = context.get_or_create_entity(order.as_ref()).unwrap().unwrap();
//! assert_eq!(entity.table_name(), "order");
//! assert_eq!(entity.property("customerId").unwrap().column_name(), "customer_id");
//! ```

pub mod context;
pub mod core;
pub mod model;
pub mod prelude;

// Re-export main types for convenience
pub use crate::context::{
    DEFAULT_REFERENCE_MARKER, DefaultEntityPolicy, EntityPolicy, MappingConfig, MappingContext,
    MappingContextBuilder, RelationalEntityPolicy,
};
pub use crate::core::{
    ConstructorDescriptor, DeclaredType, FieldDescriptor, ForwardType, MappingError,
    ParameterDescriptor, Result, TypeDescriptor, TypeRef,
};
pub use crate::model::{
    ConstructorParameter, DefaultNamingStrategy, DefaultPropertyFactory, EntityOwner,
    NamingStrategy, PersistentEntity, PersistentProperty, PreferredConstructor, PropertyFactory,
    PropertyKind, SimpleTypeHolder,
};
