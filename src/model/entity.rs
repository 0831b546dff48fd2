use std::fmt;

use serde::Serialize;

use super::property::PersistentProperty;
use crate::core::{ConstructorDescriptor, ParameterDescriptor, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorParameter {
    pub position: usize,
    pub name: Option<String>,
    pub type_name: String,
}

impl ConstructorParameter {
    /// True when the name is present and not blank.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.trim().is_empty())
    }
}

impl From<&ParameterDescriptor> for ConstructorParameter {
    fn from(param: &ParameterDescriptor) -> Self {
        Self {
            position: param.position,
            name: param.name.clone(),
            type_name: param.declared_type.name().to_string(),
        }
    }
}

impl fmt::Display for ConstructorParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(
                f,
                "parameter #{} '{}' of type {}",
                self.position, name, self.type_name
            ),
            None => write!(f, "parameter #{} of type {}", self.position, self.type_name),
        }
    }
}

/// The constructor used to instantiate an entity from stored values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferredConstructor {
    parameters: Vec<ConstructorParameter>,
}

impl PreferredConstructor {
    pub fn new(parameters: Vec<ConstructorParameter>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[ConstructorParameter] {
        &self.parameters
    }

    pub fn is_no_arg(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether the property is populated through this constructor.
    pub fn is_constructor_parameter(&self, property: &PersistentProperty) -> bool {
        self.parameters
            .iter()
            .any(|p| p.name.as_deref() == Some(property.name()))
    }
}

impl From<&ConstructorDescriptor> for PreferredConstructor {
    fn from(ctor: &ConstructorDescriptor) -> Self {
        Self::new(ctor.parameters.iter().map(ConstructorParameter::from).collect())
    }
}

/// Mapped view of a type: how to construct it, which properties it has,
/// and where it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistentEntity {
    type_name: String,
    table_name: String,
    qualified_table_name: String,
    preferred_constructor: Option<PreferredConstructor>,
    /// Discovery order.
    properties: Vec<PersistentProperty>,
}

impl PersistentEntity {
    pub fn new(
        type_name: impl Into<String>,
        table_name: impl Into<String>,
        qualified_table_name: impl Into<String>,
        preferred_constructor: Option<PreferredConstructor>,
        properties: Vec<PersistentProperty>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            table_name: table_name.into(),
            qualified_table_name: qualified_table_name.into(),
            preferred_constructor,
            properties,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn qualified_table_name(&self) -> &str {
        &self.qualified_table_name
    }

    pub fn preferred_constructor(&self) -> Option<&PreferredConstructor> {
        self.preferred_constructor.as_ref()
    }

    pub fn properties(&self) -> &[PersistentProperty] {
        &self.properties
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn property(&self, name: &str) -> Option<&PersistentProperty> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// First property flagged as identifier.
    pub fn id_property(&self) -> Option<&PersistentProperty> {
        self.properties.iter().find(|p| p.is_id())
    }

    pub fn has_id_property(&self) -> bool {
        self.id_property().is_some()
    }

    pub fn is_constructor_argument(&self, property: &PersistentProperty) -> bool {
        self.preferred_constructor
            .as_ref()
            .is_some_and(|c| c.is_constructor_parameter(property))
    }

    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Display for PersistentEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.type_name, self.qualified_table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DeclaredType;

    #[test]
    fn test_parameter_display() {
        let unnamed = ConstructorParameter {
            position: 0,
            name: None,
            type_name: "Long".into(),
        };
        assert_eq!(unnamed.to_string(), "parameter #0 of type Long");
        assert!(!unnamed.has_name());

        let named = ConstructorParameter {
            name: Some("customerId".into()),
            ..unnamed
        };
        assert_eq!(
            named.to_string(),
            "parameter #0 'customerId' of type Long"
        );
        assert!(named.has_name());
    }

    #[test]
    fn test_blank_name_is_not_a_name() {
        let param = ConstructorParameter {
            position: 2,
            name: Some("  ".into()),
            type_name: "String".into(),
        };
        assert!(!param.has_name());
    }

    #[test]
    fn test_preferred_constructor_from_descriptor() {
        let long = DeclaredType::scalar("Long");
        let ty = DeclaredType::new("Order")
            .named_constructor(&[("customerId", long)])
            .build();
        let ctor = PreferredConstructor::from(&ty.constructors()[0]);
        assert_eq!(ctor.parameters().len(), 1);
        assert_eq!(ctor.parameters()[0].type_name, "Long");
        assert!(!ctor.is_no_arg());
    }

    #[test]
    fn test_entity_json_shape() {
        let entity = PersistentEntity::new("Order", "order", "shop.order", None, Vec::new());
        let json = entity.to_json().unwrap();
        assert_eq!(json["type_name"], "Order");
        assert_eq!(json["qualified_table_name"], "shop.order");
        assert!(json["preferred_constructor"].is_null());
        assert_eq!(entity.to_string(), "Order -> shop.order");
    }
}
