use async_trait::async_trait;
use std::{collections::HashMap, fmt::Debug};

/// Retrieves the expressions that `Expression.Reference` nodes stand for.
///
/// References are found while deserializing an expression; each one is resolved in turn, and the
/// markup document returned here is deserialized in its place.
#[async_trait(?Send)]
pub trait ReferenceResolver: Debug {
    /// Returns the markup document of the expression stored at `source`, or the reason it could
    /// not be retrieved.
    async fn resolve(&self, source: &str) -> Result<String, String>;
}

/// A resolver that rejects every reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReferences;

#[async_trait(?Send)]
impl ReferenceResolver for NoReferences {
    async fn resolve(&self, source: &str) -> Result<String, String> {
        Err(format!("references are not supported here (`{}`)", source))
    }
}

/// A resolver serving documents from a fixed map.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    documents: HashMap<String, String>,
}

impl MapResolver {
    /// Creates a resolver without documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document under the given source.
    pub fn with(mut self, source: impl Into<String>, document: impl Into<String>) -> Self {
        self.documents.insert(source.into(), document.into());
        self
    }
}

#[async_trait(?Send)]
impl ReferenceResolver for MapResolver {
    async fn resolve(&self, source: &str) -> Result<String, String> {
        self.documents
            .get(source)
            .cloned()
            .ok_or_else(|| format!("nothing is stored at `{}`", source))
    }
}
