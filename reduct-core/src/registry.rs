//! The registry of expression kinds and of the reducers that apply to them.

use crate::{
    kind::{builtin, Kind},
    reduce::{self, Reducer, Stage},
};
use levenshtein::levenshtein;
use std::{collections::{HashMap, HashSet}, fmt, sync::Arc};

/// A kind could not be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A kind with the same tag is already registered.
    DuplicateTag(String),

    /// The kind declares an attribute with an empty name.
    EmptyAttributeName { tag: String },

    /// The kind declares the same attribute name more than once.
    DuplicateAttributeName { tag: String, name: String },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTag(tag) => write!(f, "the tag `{}` is already registered", tag),
            Self::EmptyAttributeName { tag } => {
                write!(f, "the kind `{}` declares an attribute with an empty name", tag)
            },
            Self::DuplicateAttributeName { tag, name } => {
                write!(f, "the kind `{}` declares the attribute `{}` more than once", tag, name)
            },
        }
    }
}

impl std::error::Error for RegistrationError {}

/// The kinds that can be created by tag, and the reducers registered for each tag.
#[derive(Debug, Clone)]
pub struct Registry {
    kinds: HashMap<String, Arc<dyn Kind>>,
    reducers: HashMap<(String, Stage), Vec<Arc<dyn Reducer>>>,
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.kinds = builtin::all()
            .into_iter()
            .map(|kind| (kind.tag().to_string(), kind))
            .collect();
        reduce::register_all(&mut registry);
        registry
    }
}

impl Registry {
    /// Creates a new empty registry.
    ///
    /// The empty registry cannot create any node, not even lists. Consider using the [`Default`]
    /// implementation instead.
    pub fn new() -> Self {
        Self {
            kinds: HashMap::new(),
            reducers: HashMap::new(),
        }
    }

    /// Registers a kind under its tag, after checking its attribute names.
    pub fn register_kind(&mut self, kind: Arc<dyn Kind>) -> Result<(), RegistrationError> {
        let tag = kind.tag().to_string();
        if self.kinds.contains_key(&tag) {
            return Err(RegistrationError::DuplicateTag(tag));
        }

        let mut seen = HashSet::new();
        for &name in kind.attribute_names() {
            if name.is_empty() {
                return Err(RegistrationError::EmptyAttributeName { tag });
            }
            if !seen.insert(name) {
                return Err(RegistrationError::DuplicateAttributeName { tag, name: name.to_string() });
            }
        }

        self.kinds.insert(tag, kind);
        Ok(())
    }

    /// Adds a reducer for the given tag. Reducers of a tag are tried in the order they were added.
    pub fn add_reducer(&mut self, tag: &str, stage: Stage, reducer: impl Reducer + 'static) {
        self.reducers
            .entry((tag.to_string(), stage))
            .or_default()
            .push(Arc::new(reducer));
    }

    /// Returns the kind registered under the given tag.
    pub fn create_by_tag(&self, tag: &str) -> Option<Arc<dyn Kind>> {
        self.kinds.get(tag).cloned()
    }

    /// Returns the reducers registered for the given tag and stage.
    pub fn reducers(&self, tag: &str, stage: Stage) -> &[Arc<dyn Reducer>] {
        self.reducers
            .get(&(tag.to_string(), stage))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the registered tags.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Returns all registered tags similar to the given tag, in alphabetical order.
    pub fn similar_tags(&self, tag: &str) -> Vec<String> {
        let mut similar = self.kinds
            .keys()
            .filter(|t| levenshtein(t, tag) <= 2)
            .cloned()
            .collect::<Vec<_>>();
        similar.sort();
        similar
    }
}
