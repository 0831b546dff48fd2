use std::fmt;
use std::sync::Arc;

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<dyn TypeDescriptor>;

/// Introspection capabilities the mapping context needs from a type.
///
/// Implementations are supplied by whatever produces type metadata
/// (code generation, a derive, or hand-written declarations such as
/// [`DeclaredType`](super::DeclaredType)). Descriptors are immutable.
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Full type name including type arguments, e.g. `List<String>`.
    ///
    /// This is the identity the mapping context caches entities under.
    fn name(&self) -> &str;

    /// Unqualified name without type arguments, used for naming.
    fn simple_name(&self) -> &str;

    /// Lists, sets, arrays and other element containers.
    fn is_collection_like(&self) -> bool;

    fn is_map_like(&self) -> bool {
        false
    }

    fn type_arguments(&self) -> Vec<TypeRef> {
        Vec::new()
    }

    /// True when this type is `type_name` or one of its subtypes.
    fn is_assignable_to(&self, type_name: &str) -> bool;

    fn constructors(&self) -> Vec<ConstructorDescriptor>;

    fn fields(&self) -> Vec<FieldDescriptor>;

    /// False for placeholders whose real descriptor is not known yet.
    fn is_resolved(&self) -> bool {
        true
    }

    /// Explicit table name declared on the type, bypassing the naming strategy.
    fn table_name(&self) -> Option<&str> {
        None
    }

    /// Element type for collections, value type for maps, the type itself otherwise.
    fn actual_type(&self) -> Option<TypeRef> {
        let args = self.type_arguments();
        if self.is_collection_like() {
            args.into_iter().next()
        } else if self.is_map_like() {
            args.into_iter().nth(1)
        } else {
            None
        }
    }
}

/// One parameter of a constructor.
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    pub position: usize,
    /// Absent when the type was produced without parameter-name metadata.
    pub name: Option<String>,
    pub declared_type: TypeRef,
}

impl ParameterDescriptor {
    pub fn new(position: usize, name: Option<String>, declared_type: TypeRef) -> Self {
        Self {
            position,
            name,
            declared_type,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConstructorDescriptor {
    pub parameters: Vec<ParameterDescriptor>,
    /// Explicitly marked as the persistence constructor.
    pub preferred: bool,
}

impl ConstructorDescriptor {
    pub fn new(parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            parameters,
            preferred: false,
        }
    }

    pub fn preferred(mut self) -> Self {
        self.preferred = true;
        self
    }

    pub fn is_no_arg(&self) -> bool {
        self.parameters.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeRef,
    pub id: bool,
    /// Transient fields are never persisted.
    pub transient: bool,
    /// Explicit column name, bypassing the naming strategy.
    pub column: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            id: false,
            transient: false,
            column: None,
        }
    }

    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }

    pub fn transient(mut self) -> Self {
        self.transient = true;
        self
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}
