//! Declarative type descriptors.
//!
//! [`DeclaredType`] is the descriptor implementation used by generated code
//! and by tests: every capability the mapping context asks for is spelled
//! out up front instead of being discovered at runtime.

use std::sync::{Arc, OnceLock};

use super::types::{
    ConstructorDescriptor, FieldDescriptor, ParameterDescriptor, TypeDescriptor, TypeRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Plain,
    Collection,
    Map,
}

#[derive(Debug, Clone)]
pub struct DeclaredType {
    name: String,
    simple_name: String,
    shape: Shape,
    type_arguments: Vec<TypeRef>,
    supertypes: Vec<String>,
    constructors: Vec<ConstructorDescriptor>,
    fields: Vec<FieldDescriptor>,
    table_name: Option<String>,
}

impl DeclaredType {
    pub fn new(simple_name: impl Into<String>) -> Self {
        let simple_name = simple_name.into();
        Self {
            name: simple_name.clone(),
            simple_name,
            shape: Shape::Plain,
            type_arguments: Vec::new(),
            supertypes: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            table_name: None,
        }
    }

    /// A scalar such as `Long` or `String`. Whether it counts as simple is
    /// decided by the context's simple-type holder, not here.
    pub fn scalar(name: impl Into<String>) -> TypeRef {
        Arc::new(Self::new(name))
    }

    /// A generic, non-collection type such as `Reference<Customer>`.
    pub fn generic(simple_name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        let simple_name = simple_name.into();
        Self {
            name: generic_name(&simple_name, &arguments),
            type_arguments: arguments,
            ..Self::new(simple_name)
        }
    }

    pub fn collection(simple_name: impl Into<String>, element: TypeRef) -> TypeRef {
        let mut declared = Self::generic(simple_name, vec![element]);
        declared.shape = Shape::Collection;
        Arc::new(declared)
    }

    pub fn map(simple_name: impl Into<String>, key: TypeRef, value: TypeRef) -> TypeRef {
        let mut declared = Self::generic(simple_name, vec![key, value]);
        declared.shape = Shape::Map;
        Arc::new(declared)
    }

    /// Declare a supertype (or implemented marker) by name.
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn field(self, name: impl Into<String>, declared_type: TypeRef) -> Self {
        self.with_field(FieldDescriptor::new(name, declared_type))
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Constructor whose parameters all carry names.
    pub fn named_constructor(self, parameters: &[(&str, TypeRef)]) -> Self {
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(position, (name, ty))| {
                ParameterDescriptor::new(position, Some((*name).to_string()), Arc::clone(ty))
            })
            .collect();
        self.constructor(ConstructorDescriptor::new(parameters))
    }

    /// Constructor as seen when parameter names were not retained.
    pub fn unnamed_constructor(self, parameters: &[TypeRef]) -> Self {
        let parameters = parameters
            .iter()
            .enumerate()
            .map(|(position, ty)| ParameterDescriptor::new(position, None, Arc::clone(ty)))
            .collect();
        self.constructor(ConstructorDescriptor::new(parameters))
    }

    pub fn build(self) -> TypeRef {
        Arc::new(self)
    }
}

fn generic_name(simple_name: &str, arguments: &[TypeRef]) -> String {
    if arguments.is_empty() {
        return simple_name.to_string();
    }
    let args: Vec<&str> = arguments.iter().map(|arg| arg.name()).collect();
    format!("{}<{}>", simple_name, args.join(", "))
}

impl TypeDescriptor for DeclaredType {
    fn name(&self) -> &str {
        &self.name
    }

    fn simple_name(&self) -> &str {
        &self.simple_name
    }

    fn is_collection_like(&self) -> bool {
        self.shape == Shape::Collection
    }

    fn is_map_like(&self) -> bool {
        self.shape == Shape::Map
    }

    fn type_arguments(&self) -> Vec<TypeRef> {
        self.type_arguments.clone()
    }

    fn is_assignable_to(&self, type_name: &str) -> bool {
        self.name == type_name
            || self.simple_name == type_name
            || self.supertypes.iter().any(|s| s == type_name)
    }

    fn constructors(&self) -> Vec<ConstructorDescriptor> {
        self.constructors.clone()
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }

    fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }
}

/// A named placeholder bound to its real descriptor later.
///
/// Needed to declare self-referencing type graphs (`Order` -> `Customer`
/// -> `List<Order>`). Until bound it reports itself unresolved and the
/// mapping context refuses to map it.
#[derive(Debug)]
pub struct ForwardType {
    name: String,
    target: OnceLock<TypeRef>,
}

impl ForwardType {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            target: OnceLock::new(),
        })
    }

    /// Returns false if the placeholder was already bound.
    pub fn bind(&self, target: TypeRef) -> bool {
        self.target.set(target).is_ok()
    }

    fn target(&self) -> Option<&TypeRef> {
        self.target.get()
    }
}

impl TypeDescriptor for ForwardType {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_resolved(&self) -> bool {
        self.target().is_some()
    }

    fn simple_name(&self) -> &str {
        self.target().map_or(self.name.as_str(), |t| t.simple_name())
    }

    fn is_collection_like(&self) -> bool {
        self.target().is_some_and(|t| t.is_collection_like())
    }

    fn is_map_like(&self) -> bool {
        self.target().is_some_and(|t| t.is_map_like())
    }

    fn type_arguments(&self) -> Vec<TypeRef> {
        self.target().map(|t| t.type_arguments()).unwrap_or_default()
    }

    fn is_assignable_to(&self, type_name: &str) -> bool {
        match self.target() {
            Some(t) => t.is_assignable_to(type_name),
            None => self.name == type_name,
        }
    }

    fn constructors(&self) -> Vec<ConstructorDescriptor> {
        self.target().map(|t| t.constructors()).unwrap_or_default()
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.target().map(|t| t.fields()).unwrap_or_default()
    }

    fn table_name(&self) -> Option<&str> {
        self.target().and_then(|t| t.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_names_include_arguments() {
        let string = DeclaredType::scalar("String");
        let list = DeclaredType::collection("List", string.clone());
        assert_eq!(list.name(), "List<String>");
        assert_eq!(list.simple_name(), "List");
        assert!(list.is_collection_like());

        let map = DeclaredType::map("Map", string.clone(), list);
        assert_eq!(map.name(), "Map<String, List<String>>");
        assert!(map.is_map_like());
        assert!(!map.is_collection_like());
    }

    #[test]
    fn test_actual_type() {
        let long = DeclaredType::scalar("Long");
        let set = DeclaredType::collection("Set", long.clone());
        assert_eq!(set.actual_type().unwrap().name(), "Long");
        assert!(long.actual_type().is_none());

        let map = DeclaredType::map("Map", DeclaredType::scalar("String"), long);
        assert_eq!(map.actual_type().unwrap().name(), "Long");
    }

    #[test]
    fn test_assignability_through_supertypes() {
        let customer = DeclaredType::new("Customer").build();
        let reference = DeclaredType::generic("Reference", vec![customer])
            .extends("AggregateReference")
            .build();

        assert!(reference.is_assignable_to("Reference"));
        assert!(reference.is_assignable_to("Reference<Customer>"));
        assert!(reference.is_assignable_to("AggregateReference"));
        assert!(!reference.is_assignable_to("Customer"));
    }

    #[test]
    fn test_constructor_helpers_record_positions() {
        let long = DeclaredType::scalar("Long");
        let ty = DeclaredType::new("Order")
            .named_constructor(&[("id", long.clone()), ("customerId", long.clone())])
            .unnamed_constructor(&[long])
            .build();

        let ctors = ty.constructors();
        assert_eq!(ctors.len(), 2);
        assert_eq!(ctors[0].parameters[1].position, 1);
        assert_eq!(ctors[0].parameters[1].name.as_deref(), Some("customerId"));
        assert!(ctors[1].parameters[0].name.is_none());
    }

    #[test]
    fn test_forward_type_delegates_once_bound() {
        let forward = ForwardType::new("Order");
        assert!(forward.fields().is_empty());
        assert!(!forward.is_resolved());

        let order = DeclaredType::new("Order")
            .field("id", DeclaredType::scalar("Long"))
            .table("orders")
            .build();
        assert!(forward.bind(order.clone()));
        assert!(!forward.bind(order));

        assert!(forward.is_resolved());
        assert_eq!(forward.fields().len(), 1);
        assert_eq!(forward.table_name(), Some("orders"));
    }
}
