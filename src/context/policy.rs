use std::fmt;

use crate::core::{MappingError, Result, TypeDescriptor};
use crate::model::{PersistentEntity, SimpleTypeHolder};

use super::DEFAULT_REFERENCE_MARKER;

/// Backend-specific customization of entity derivation.
///
/// `should_map` decides whether a type becomes an entity at all;
/// `on_entity_created` validates (and may augment) each freshly built
/// entity before it is cached. The two are independent.
pub trait EntityPolicy: fmt::Debug + Send + Sync {
    fn should_map(&self, ty: &dyn TypeDescriptor, simple_types: &SimpleTypeHolder) -> bool;

    fn on_entity_created(&self, entity: PersistentEntity) -> Result<PersistentEntity>;

    /// Marker type this policy treats as a reference wrapper, if any.
    fn reference_type(&self) -> Option<&str> {
        None
    }
}

/// Maps everything that is not a simple type and accepts every entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEntityPolicy;

impl EntityPolicy for DefaultEntityPolicy {
    fn should_map(&self, ty: &dyn TypeDescriptor, simple_types: &SimpleTypeHolder) -> bool {
        !simple_types.is_simple(ty)
    }

    fn on_entity_created(&self, entity: PersistentEntity) -> Result<PersistentEntity> {
        Ok(entity)
    }
}

/// Policy for relational backends that bind columns to constructor
/// arguments by name.
///
/// On top of the base policy it refuses to map collection-like types and
/// reference wrappers, and rejects preferred constructors with unnamed
/// parameters.
#[derive(Debug, Clone)]
pub struct RelationalEntityPolicy<B = DefaultEntityPolicy> {
    base: B,
    reference_marker: String,
    backend_name: String,
}

impl RelationalEntityPolicy<DefaultEntityPolicy> {
    pub fn new() -> Self {
        Self::with_base(DefaultEntityPolicy)
    }
}

impl Default for RelationalEntityPolicy<DefaultEntityPolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: EntityPolicy> RelationalEntityPolicy<B> {
    pub fn with_base(base: B) -> Self {
        Self {
            base,
            reference_marker: DEFAULT_REFERENCE_MARKER.to_string(),
            backend_name: "relmap".to_string(),
        }
    }

    pub fn reference_marker(mut self, marker: impl Into<String>) -> Self {
        self.reference_marker = marker.into();
        self
    }

    /// Name used in validation messages.
    pub fn backend_name(mut self, name: impl Into<String>) -> Self {
        self.backend_name = name.into();
        self
    }

    pub fn is_reference_wrapper(&self, ty: &dyn TypeDescriptor) -> bool {
        ty.is_assignable_to(&self.reference_marker)
    }
}

impl<B: EntityPolicy> EntityPolicy for RelationalEntityPolicy<B> {
    fn should_map(&self, ty: &dyn TypeDescriptor, simple_types: &SimpleTypeHolder) -> bool {
        self.base.should_map(ty, simple_types)
            && !self.is_reference_wrapper(ty)
            && !ty.is_collection_like()
    }

    fn on_entity_created(&self, entity: PersistentEntity) -> Result<PersistentEntity> {
        let entity = self.base.on_entity_created(entity)?;

        let Some(constructor) = entity.preferred_constructor() else {
            return Ok(entity);
        };

        if let Some(param) = constructor.parameters().iter().find(|p| !p.has_name()) {
            return Err(MappingError::InvalidEntityModel {
                type_name: entity.type_name().to_string(),
                position: Some(param.position),
                message: format!(
                    "A constructor parameter name is required by {} to bind column values to constructor arguments. Offending {}",
                    self.backend_name, param
                ),
            });
        }

        Ok(entity)
    }

    fn reference_type(&self) -> Option<&str> {
        Some(&self.reference_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeclaredType;
    use crate::model::{ConstructorParameter, PreferredConstructor};

    fn entity_with(params: Vec<ConstructorParameter>) -> PersistentEntity {
        PersistentEntity::new(
            "Order",
            "order",
            "order",
            Some(PreferredConstructor::new(params)),
            Vec::new(),
        )
    }

    fn param(position: usize, name: Option<&str>) -> ConstructorParameter {
        ConstructorParameter {
            position,
            name: name.map(String::from),
            type_name: "Long".into(),
        }
    }

    #[test]
    fn test_default_policy_excludes_only_simple_types() {
        let policy = DefaultEntityPolicy;
        let simple = SimpleTypeHolder::new();
        let list = DeclaredType::collection("List", DeclaredType::scalar("String"));

        assert!(!policy.should_map(DeclaredType::scalar("Long").as_ref(), &simple));
        assert!(policy.should_map(list.as_ref(), &simple));
    }

    #[test]
    fn test_relational_policy_excludes_collections_and_references() {
        let policy = RelationalEntityPolicy::new();
        let simple = SimpleTypeHolder::new();
        let customer = DeclaredType::new("Customer").build();
        let reference = DeclaredType::generic("AggregateReference", vec![customer.clone()]).build();
        let subtype = DeclaredType::generic("CustomerRef", vec![customer.clone()])
            .extends("AggregateReference")
            .build();
        let list = DeclaredType::collection("List", customer.clone());

        assert!(policy.should_map(customer.as_ref(), &simple));
        assert!(!policy.should_map(reference.as_ref(), &simple));
        assert!(!policy.should_map(subtype.as_ref(), &simple));
        assert!(!policy.should_map(list.as_ref(), &simple));
        assert!(!policy.should_map(DeclaredType::scalar("String").as_ref(), &simple));
    }

    #[test]
    fn test_custom_reference_marker() {
        let policy = RelationalEntityPolicy::new().reference_marker("Ref");
        let simple = SimpleTypeHolder::new();
        let customer = DeclaredType::new("Customer").build();
        let reference = DeclaredType::generic("Ref", vec![customer.clone()]).build();
        let aggregate = DeclaredType::generic("AggregateReference", vec![customer]).build();

        assert!(!policy.should_map(reference.as_ref(), &simple));
        assert!(policy.should_map(aggregate.as_ref(), &simple));
        assert_eq!(policy.reference_type(), Some("Ref"));
        assert_eq!(DefaultEntityPolicy.reference_type(), None);
    }

    #[test]
    fn test_entity_without_constructor_passes() {
        let entity = PersistentEntity::new("Order", "order", "order", None, Vec::new());
        let result = RelationalEntityPolicy::new().on_entity_created(entity.clone());
        assert_eq!(result, Ok(entity));
    }

    #[test]
    fn test_named_parameters_pass() {
        let entity = entity_with(vec![param(0, Some("id")), param(1, Some("customerId"))]);
        assert!(RelationalEntityPolicy::new().on_entity_created(entity).is_ok());
    }

    #[test]
    fn test_first_unnamed_parameter_is_reported() {
        let entity = entity_with(vec![param(0, Some("id")), param(1, None), param(2, None)]);
        let err = RelationalEntityPolicy::new()
            .backend_name("jdbc")
            .on_entity_created(entity)
            .unwrap_err();

        match err {
            MappingError::InvalidEntityModel {
                type_name,
                position,
                message,
            } => {
                assert_eq!(type_name, "Order");
                assert_eq!(position, Some(1));
                assert!(message.contains("required by jdbc"));
                assert!(message.contains("parameter #1 of type Long"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_blank_parameter_name_fails() {
        let entity = entity_with(vec![param(0, Some(""))]);
        assert!(matches!(
            RelationalEntityPolicy::new().on_entity_created(entity),
            Err(MappingError::InvalidEntityModel { position: Some(0), .. })
        ));
    }
}
