//! Entry points grouped by use.
//!
//! `dx` covers hosts that only look up entities.
//! `advanced` is for hosts that plug in their own policy, naming or properties.

pub mod dx {
    //! Looking up entities for declared types.
    pub use crate::{
        DeclaredType, MappingConfig, MappingContext, MappingError, PersistentEntity,
        PersistentProperty, TypeDescriptor, TypeRef,
    };
}

pub mod advanced {
    //! Extension seams of the mapping context.
    pub use crate::context::discover_preferred_constructor;
    pub use crate::{
        DefaultEntityPolicy, EntityOwner, EntityPolicy, MappingContextBuilder, NamingStrategy,
        PropertyFactory, RelationalEntityPolicy, SimpleTypeHolder,
    };
}
