use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::core::TypeDescriptor;

lazy_static! {
    /// Scalar names that are stored as a single column and never become entities.
    static ref DEFAULT_SIMPLE_TYPES: HashSet<&'static str> = [
        // Rust primitives and std types
        "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32",
        "u64", "u128", "usize", "f32", "f64", "str", "String",
        // Common value types by conventional name
        "Boolean", "Byte", "Short", "Integer", "Int", "Long", "Float", "Double",
        "Character", "BigDecimal", "BigInteger", "Decimal", "Date", "Time", "Timestamp",
        "Instant", "LocalDate", "LocalTime", "LocalDateTime", "OffsetDateTime",
        "ZonedDateTime", "Duration", "Uuid", "UUID", "Bytes",
    ]
    .into_iter()
    .collect();
}

/// Classifies types that map to a single column value.
///
/// The default set is a starting point only; hosts with other scalar
/// vocabularies add to it or replace it.
#[derive(Debug, Clone)]
pub struct SimpleTypeHolder {
    names: HashSet<String>,
}

impl SimpleTypeHolder {
    pub fn new() -> Self {
        Self::with_types(DEFAULT_SIMPLE_TYPES.iter().copied())
    }

    /// Holder with exactly the given names and none of the defaults.
    pub fn with_types<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn add(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    pub fn extend<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Matches on the full name first so generic scalars can be listed
    /// explicitly, then on the simple name.
    pub fn is_simple(&self, ty: &dyn TypeDescriptor) -> bool {
        self.names.contains(ty.name()) || self.names.contains(ty.simple_name())
    }

    pub fn is_simple_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for SimpleTypeHolder {
    fn default() -> Self {
        Self::new()
    }
}
