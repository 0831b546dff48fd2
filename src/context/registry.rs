use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::{Level, event, info_span};

use crate::core::{FieldDescriptor, MappingError, Result, TypeDescriptor, TypeRef};
use crate::model::{
    DefaultPropertyFactory, EntityOwner, NamingStrategy, PersistentEntity, PreferredConstructor,
    PropertyFactory, PropertyKind, SimpleTypeHolder,
};

use super::config::MappingConfig;
use super::constructor::discover_preferred_constructor;
use super::policy::{EntityPolicy, RelationalEntityPolicy};

type EntityMap = HashMap<String, Arc<PersistentEntity>>;

/// Entities created by one top-level lookup, published together.
type Batch = HashMap<String, Arc<PersistentEntity>>;

/// Registry of persistent entities keyed by type name.
///
/// Lookups of already published entities only clone an `Arc` out of a
/// copy-on-write snapshot. Construction is serialized: a type is built,
/// validated and published at most once, and a failed construction leaves
/// nothing behind in the cache.
#[derive(Debug)]
pub struct MappingContext {
    entities: RwLock<Arc<EntityMap>>,
    construction: Mutex<()>,
    policy: Box<dyn EntityPolicy>,
    property_factory: Box<dyn PropertyFactory>,
    naming: Arc<dyn NamingStrategy>,
    simple_types: SimpleTypeHolder,
    resolve_nested: bool,
}

impl MappingContext {
    /// Context with the relational policy and default naming.
    pub fn new() -> Self {
        Self::from_config(MappingConfig::default())
    }

    pub fn with_naming_strategy(naming: Arc<dyn NamingStrategy>) -> Self {
        Self::builder().naming_strategy(naming).build()
    }

    pub fn from_config(config: MappingConfig) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> MappingContextBuilder {
        MappingContextBuilder::default()
    }

    /// Returns the entity for `ty`, creating and caching it on first use.
    ///
    /// `Ok(None)` means the type is not mapped (a simple type, a
    /// collection or a reference wrapper). Nothing is recorded for it.
    pub fn get_or_create_entity(
        &self,
        ty: &dyn TypeDescriptor,
    ) -> Result<Option<Arc<PersistentEntity>>> {
        if let Some(entity) = self.entity(ty.name())? {
            return Ok(Some(entity));
        }
        if !self.should_map(ty) {
            return Ok(None);
        }

        let _guard = self.construction.lock()?;

        // Another caller may have published while we waited.
        let snapshot = self.snapshot()?;
        let mut batch = Batch::new();
        let entity = self.resolve(ty, &snapshot, &mut batch)?;

        if !batch.is_empty() {
            self.publish(batch)?;
        }
        Ok(entity)
    }

    /// Like [`get_or_create_entity`](Self::get_or_create_entity) but an
    /// unmapped type is an error.
    pub fn required_entity(&self, ty: &dyn TypeDescriptor) -> Result<Arc<PersistentEntity>> {
        self.get_or_create_entity(ty)?
            .ok_or_else(|| MappingError::EntityNotFound(ty.name().to_string()))
    }

    /// Creates entities for an initial set of types.
    pub fn initialize<'a, I>(&self, types: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TypeRef>,
    {
        for ty in types {
            self.get_or_create_entity(ty.as_ref())?;
        }
        Ok(())
    }

    /// Unbound placeholders are never mapped, so an empty entity can't be
    /// cached under the real type's name.
    pub fn should_map(&self, ty: &dyn TypeDescriptor) -> bool {
        ty.is_resolved() && self.policy.should_map(ty, &self.simple_types)
    }

    /// Cache-only lookup.
    pub fn entity(&self, type_name: &str) -> Result<Option<Arc<PersistentEntity>>> {
        Ok(self.entities.read()?.get(type_name).cloned())
    }

    pub fn has_entity(&self, type_name: &str) -> Result<bool> {
        Ok(self.entities.read()?.contains_key(type_name))
    }

    /// All published entities ordered by type name.
    pub fn entities(&self) -> Result<Vec<Arc<PersistentEntity>>> {
        let snapshot = self.snapshot()?;
        let mut entities: Vec<_> = snapshot.values().cloned().collect();
        entities.sort_by(|a, b| a.type_name().cmp(b.type_name()));
        Ok(entities)
    }

    pub fn entity_count(&self) -> Result<usize> {
        Ok(self.entities.read()?.len())
    }

    pub fn naming_strategy(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    pub fn simple_types(&self) -> &SimpleTypeHolder {
        &self.simple_types
    }

    fn snapshot(&self) -> Result<Arc<EntityMap>> {
        Ok(Arc::clone(&*self.entities.read()?))
    }

    fn resolve(
        &self,
        ty: &dyn TypeDescriptor,
        published: &EntityMap,
        batch: &mut Batch,
    ) -> Result<Option<Arc<PersistentEntity>>> {
        let name = ty.name();
        if let Some(entity) = published.get(name).or_else(|| batch.get(name)) {
            return Ok(Some(Arc::clone(entity)));
        }
        if !self.should_map(ty) {
            return Ok(None);
        }

        let fields: Vec<FieldDescriptor> = ty.fields().into_iter().filter(|f| !f.transient).collect();
        let entity = Arc::new(self.create_entity(ty, &fields)?);
        // Registered before descending so cycles find it.
        batch.insert(name.to_string(), Arc::clone(&entity));

        if self.resolve_nested {
            // The policy may have reordered, dropped or added properties.
            let by_name: HashMap<&str, &FieldDescriptor> =
                fields.iter().map(|f| (f.name.as_str(), f)).collect();
            for property in entity.properties() {
                let Some(field) = by_name.get(property.name()) else {
                    continue;
                };
                let nested = match property.kind() {
                    PropertyKind::Entity => Some(Arc::clone(&field.declared_type)),
                    PropertyKind::Collection { .. } | PropertyKind::Map { .. } => {
                        field.declared_type.actual_type()
                    }
                    PropertyKind::Simple | PropertyKind::Reference => None,
                };
                if let Some(nested) = nested {
                    self.resolve(nested.as_ref(), published, batch)?;
                }
            }
        }

        Ok(Some(entity))
    }

    fn create_entity(
        &self,
        ty: &dyn TypeDescriptor,
        fields: &[FieldDescriptor],
    ) -> Result<PersistentEntity> {
        let span = info_span!("create_entity", type_name = %ty.name());
        let _enter = span.enter();

        let table_name = match ty.table_name() {
            Some(explicit) => explicit.to_string(),
            None => self.naming.table_name(ty.simple_name()),
        };
        let qualified_table_name = self.naming.qualified_table_name(&table_name);
        let owner = EntityOwner {
            type_name: ty.name().to_string(),
            table_name: table_name.clone(),
        };

        let constructors = ty.constructors();
        let preferred_constructor =
            discover_preferred_constructor(&constructors).map(PreferredConstructor::from);

        let properties = fields
            .iter()
            .map(|field| {
                self.property_factory
                    .create(field, &owner, &self.simple_types, self.naming.as_ref())
            })
            .collect();

        let raw = PersistentEntity::new(
            ty.name(),
            table_name,
            qualified_table_name,
            preferred_constructor,
            properties,
        );

        self.policy.on_entity_created(raw).inspect_err(|err| {
            event!(Level::WARN, error = %err, "entity validation failed");
        })
    }

    fn publish(&self, batch: Batch) -> Result<()> {
        let mut entities = self.entities.write()?;
        let mut next = (**entities).clone();
        for (name, entity) in batch {
            event!(Level::DEBUG, type_name = %name, table = %entity.qualified_table_name(), "entity published");
            next.insert(name, entity);
        }
        *entities = Arc::new(next);
        Ok(())
    }
}

impl Default for MappingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles a [`MappingContext`]; unset parts come from the config.
#[derive(Debug, Default)]
pub struct MappingContextBuilder {
    config: MappingConfig,
    policy: Option<Box<dyn EntityPolicy>>,
    property_factory: Option<Box<dyn PropertyFactory>>,
    naming: Option<Arc<dyn NamingStrategy>>,
    simple_types: Option<SimpleTypeHolder>,
}

impl MappingContextBuilder {
    pub fn config(mut self, config: MappingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(mut self, policy: impl EntityPolicy + 'static) -> Self {
        self.policy = Some(Box::new(policy));
        self
    }

    pub fn property_factory(mut self, factory: impl PropertyFactory + 'static) -> Self {
        self.property_factory = Some(Box::new(factory));
        self
    }

    pub fn naming_strategy(mut self, naming: Arc<dyn NamingStrategy>) -> Self {
        self.naming = Some(naming);
        self
    }

    pub fn simple_types(mut self, simple_types: SimpleTypeHolder) -> Self {
        self.simple_types = Some(simple_types);
        self
    }

    pub fn build(self) -> MappingContext {
        let config = self.config;

        let policy = self.policy.unwrap_or_else(|| {
            Box::new(
                RelationalEntityPolicy::new()
                    .reference_marker(config.reference_marker.clone())
                    .backend_name(config.backend_name.clone()),
            )
        });
        // Properties must classify references with the marker the policy excludes.
        let marker = policy
            .reference_type()
            .map_or_else(|| config.reference_marker.clone(), str::to_string);
        let property_factory = self
            .property_factory
            .unwrap_or_else(|| Box::new(DefaultPropertyFactory::new(marker)));
        let naming = self
            .naming
            .unwrap_or_else(|| Arc::new(config.naming_strategy()));
        let simple_types = self
            .simple_types
            .unwrap_or_else(|| config.simple_type_holder());

        MappingContext {
            entities: RwLock::new(Arc::new(EntityMap::new())),
            construction: Mutex::new(()),
            policy,
            property_factory,
            naming,
            simple_types,
            resolve_nested: config.resolve_nested,
        }
    }
}
