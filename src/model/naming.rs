use std::fmt;

/// Maps type and property identifiers to storage identifiers.
///
/// Every method must be deterministic and total.
pub trait NamingStrategy: fmt::Debug + Send + Sync {
    /// Schema prefix; empty means the connection default.
    fn schema(&self) -> String {
        String::new()
    }

    fn table_name(&self, type_simple_name: &str) -> String;

    fn column_name(&self, property_name: &str) -> String;

    /// Column in a child table that points back to the owning entity.
    fn reverse_column_name(&self, owner_table: &str) -> String {
        owner_table.to_string()
    }

    /// Column holding the list index or map key of a qualified collection.
    fn key_column(&self, owner_table: &str) -> String {
        format!("{}_key", self.reverse_column_name(owner_table))
    }

    fn qualified_table_name(&self, table_name: &str) -> String {
        let schema = self.schema();
        if schema.is_empty() {
            table_name.to_string()
        } else {
            format!("{}.{}", schema, table_name)
        }
    }
}

/// snake_case tables and columns with an optional schema.
#[derive(Debug, Clone, Default)]
pub struct DefaultNamingStrategy {
    schema: Option<String>,
}

impl DefaultNamingStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
        }
    }
}

impl NamingStrategy for DefaultNamingStrategy {
    fn schema(&self) -> String {
        self.schema.clone().unwrap_or_default()
    }

    fn table_name(&self, type_simple_name: &str) -> String {
        to_snake_case(type_simple_name)
    }

    fn column_name(&self, property_name: &str) -> String {
        to_snake_case(property_name)
    }
}

/// `customerId` -> `customer_id`, `HTTPRequest` -> `http_request`.
///
/// Anything that is not ASCII alphanumeric becomes `_`.
pub fn to_snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            out.push('_');
            continue;
        }
        if ch.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}
