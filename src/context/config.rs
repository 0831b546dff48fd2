use log::warn;
use serde::Deserialize;

use crate::core::Result;
use crate::model::{DefaultNamingStrategy, SimpleTypeHolder};

use super::DEFAULT_REFERENCE_MARKER;

/// Mapping context configuration
///
/// Supplied once when the context is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Schema that qualifies every table name
    pub schema: Option<String>,

    /// Marker type identifying reference wrappers
    pub reference_marker: String,

    /// Extra simple type names
    pub simple_types: Vec<String>,

    /// Use only `simple_types`, dropping the built-in set
    pub replace_default_simple_types: bool,

    /// Resolve entity-typed properties when their owner is created
    pub resolve_nested: bool,

    /// Backend name used in validation messages
    pub backend_name: String,
}

impl MappingConfig {
    pub fn new() -> Self {
        Self {
            schema: None,
            reference_marker: DEFAULT_REFERENCE_MARKER.to_string(),
            simple_types: Vec::new(),
            replace_default_simple_types: false,
            resolve_nested: true,
            backend_name: "relmap".to_string(),
        }
    }

    /// Set the schema
    pub fn schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    /// Set the reference marker type name
    pub fn reference_marker(mut self, marker: &str) -> Self {
        self.reference_marker = marker.to_string();
        self
    }

    /// Add a simple type name
    pub fn simple_type(mut self, name: &str) -> Self {
        self.simple_types.push(name.to_string());
        self
    }

    /// Replace the built-in simple types with the configured ones
    pub fn replace_default_simple_types(mut self, replace: bool) -> Self {
        self.replace_default_simple_types = replace;
        self
    }

    /// Enable or disable nested entity resolution
    pub fn resolve_nested(mut self, resolve: bool) -> Self {
        self.resolve_nested = resolve;
        self
    }

    /// Set the backend name
    pub fn backend_name(mut self, name: &str) -> Self {
        self.backend_name = name.to_string();
        self
    }

    /// Parse from JSON
    ///
    /// Missing keys take their defaults.
    ///
    /// ```
    /// # use relmap::MappingConfig;
    /// let config = MappingConfig::from_json(r#"{ "schema": "shop" }"#).unwrap();
    /// assert_eq!(config.schema.as_deref(), Some("shop"));
    /// assert!(config.resolve_nested);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.reference_marker.trim().is_empty() {
            warn!(
                "Empty reference marker in mapping config, using '{}'",
                DEFAULT_REFERENCE_MARKER
            );
            self.reference_marker = DEFAULT_REFERENCE_MARKER.to_string();
        }
        if self.schema.as_deref().is_some_and(|s| s.trim().is_empty()) {
            self.schema = None;
        }
        if self.replace_default_simple_types && self.simple_types.is_empty() {
            warn!("Mapping config replaces default simple types with an empty set");
        }
        self
    }

    pub fn simple_type_holder(&self) -> SimpleTypeHolder {
        if self.replace_default_simple_types {
            SimpleTypeHolder::with_types(self.simple_types.iter().cloned())
        } else {
            SimpleTypeHolder::new().extend(self.simple_types.iter().cloned())
        }
    }

    pub fn naming_strategy(&self) -> DefaultNamingStrategy {
        match &self.schema {
            Some(schema) => DefaultNamingStrategy::with_schema(schema.clone()),
            None => DefaultNamingStrategy::new(),
        }
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self::new()
    }
}
