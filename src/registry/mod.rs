//! View-model registry
//!
//! Maps block names to the view-models that back them. All operations go
//! through the [`Register`] trait so the composition code never depends on
//! how (or where) the registry is stored.

pub mod global;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur during registry operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A view-model with this name is already registered
    #[error("block with name '{name}' already exists in registry")]
    DuplicateName { name: String },

    /// No view-model with this name is registered
    #[error("block with name '{name}' not found in registry")]
    NotFound { name: String },
}

/// A named entity backing exactly one block of a page
///
/// The name is the view-model's identity. Anything richer is exposed through
/// [`ViewModel::data`].
pub trait ViewModel: Send + Sync {
    fn name(&self) -> &str;

    /// Domain data for templates, if this view-model carries any
    fn data(&self) -> Option<&dyn ViewData> {
        None
    }
}

/// Key/value access to a view-model's data from inside a template
pub trait ViewData {
    fn field(&self, key: &str) -> Option<String>;
}

/// A view-model holding a fixed set of string fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticViewModel {
    name: String,
    fields: BTreeMap<String, String>,
}

impl StaticViewModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Create a view-model with the given fields
    pub fn with_fields(name: impl Into<String>, fields: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Set a field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Wrap into the shared form the registry stores
    pub fn shared(self) -> Arc<dyn ViewModel> {
        Arc::new(self)
    }
}

impl ViewModel for StaticViewModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> Option<&dyn ViewData> {
        Some(self)
    }
}

impl ViewData for StaticViewModel {
    fn field(&self, key: &str) -> Option<String> {
        self.fields.get(key).cloned()
    }
}

/// The add/remove/find contract shared by every registry
pub trait Register: Send + Sync {
    /// Register view-models in order, stopping at the first duplicate name.
    ///
    /// Items before the duplicate stay registered.
    fn add(&self, models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError>;

    /// Unregister view-models in order, stopping at the first absent name.
    ///
    /// Items before the absent one stay removed.
    fn remove(&self, models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError>;

    /// Look up a view-model by name
    fn find(&self, name: &str) -> Result<Arc<dyn ViewModel>, RegistryError>;
}

/// Mutex-guarded name to view-model map
#[derive(Default)]
pub struct ViewModelRegistry {
    entries: Mutex<HashMap<String, Arc<dyn ViewModel>>>,
}

impl ViewModelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered view-models
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Check if a view-model is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Sorted snapshot of the registered names
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Register for ViewModelRegistry {
    fn add(&self, models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock();
        for model in models {
            let name = model.name();
            if entries.contains_key(name) {
                return Err(RegistryError::DuplicateName {
                    name: name.to_string(),
                });
            }
            debug!(block = name, "registering view-model");
            entries.insert(name.to_string(), Arc::clone(model));
        }
        Ok(())
    }

    fn remove(&self, models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError> {
        let mut entries = self.entries.lock();
        for model in models {
            let name = model.name();
            if entries.remove(name).is_none() {
                return Err(RegistryError::NotFound {
                    name: name.to_string(),
                });
            }
            debug!(block = name, "unregistered view-model");
        }
        Ok(())
    }

    fn find(&self, name: &str) -> Result<Arc<dyn ViewModel>, RegistryError> {
        trace!(block = name, "looking up view-model");
        self.entries
            .lock()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }
}

impl fmt::Debug for ViewModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModelRegistry")
            .field("names", &self.names())
            .finish()
    }
}
