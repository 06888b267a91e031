//! Resource registration.
//!
//! A resource is a record collection exposed over HTTP: a name, the
//! schema its records are validated against, and the fields that must be
//! unique across the collection. Resources are registered at application
//! assembly time; requests against an unregistered collection are 404s.

use std::collections::HashMap;

use crate::schema::Schema;

/// One registered record collection.
#[derive(Debug, Clone)]
pub struct Resource {
    name: String,
    schema: Schema,
    unique_fields: Vec<String>,
}

impl Resource {
    /// Declares a resource with an empty schema and no unique fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Schema::new(),
            unique_fields: Vec::new(),
        }
    }

    /// Sets the record schema.
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Declares a field whose value must be unique across the
    /// collection.
    pub fn unique(mut self, field: impl Into<String>) -> Self {
        self.unique_fields.push(field.into());
        self
    }

    /// The collection name, as it appears in URLs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The record schema.
    pub fn record_schema(&self) -> &Schema {
        &self.schema
    }

    /// The declared unique fields.
    pub fn unique_fields(&self) -> &[String] {
        &self.unique_fields
    }
}

/// The set of resources an application exposes.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Resource>,
}

impl ResourceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resource under its name.
    pub fn register(mut self, resource: Resource) -> Self {
        self.resources.insert(resource.name().to_string(), resource);
        self
    }

    /// Looks up a resource by collection name.
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    #[test]
    fn registry_resolves_registered_names() {
        let registry = ResourceRegistry::new().register(
            Resource::new("mushrooms")
                .schema(Schema::new().field("name", FieldType::String))
                .unique("name"),
        );

        let resource = registry.get("mushrooms").unwrap();
        assert_eq!(resource.name(), "mushrooms");
        assert_eq!(resource.unique_fields(), ["name".to_string()]);
        assert!(registry.get("toads").is_none());
    }
}
