pub mod declared;
pub mod error;
pub mod types;

pub use declared::{DeclaredType, ForwardType};
pub use error::{MappingError, Result};
pub use types::{
    ConstructorDescriptor, FieldDescriptor, ParameterDescriptor, TypeDescriptor, TypeRef,
};
