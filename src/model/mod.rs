pub mod entity;
pub mod naming;
pub mod property;
pub mod simple_types;

pub use entity::{ConstructorParameter, PersistentEntity, PreferredConstructor};
pub use naming::{DefaultNamingStrategy, NamingStrategy, to_snake_case};
pub use property::{
    DefaultPropertyFactory, EntityOwner, PersistentProperty, PropertyFactory, PropertyKind,
};
pub use simple_types::SimpleTypeHolder;
