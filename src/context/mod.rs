pub mod config;
pub mod constructor;
pub mod policy;
pub mod registry;

pub use config::MappingConfig;
pub use constructor::discover_preferred_constructor;
pub use policy::{DefaultEntityPolicy, EntityPolicy, RelationalEntityPolicy};
pub use registry::{MappingContext, MappingContextBuilder};

/// Marker type for references to other aggregates by identifier.
pub const DEFAULT_REFERENCE_MARKER: &str = "AggregateReference";
