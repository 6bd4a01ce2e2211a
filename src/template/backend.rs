//! Bundled template backends

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::{ParsedTemplate, Template, TemplateBackend, TemplateError};

/// Backend serving template sources held in memory
#[derive(Debug, Clone, Default)]
pub struct SourceBackend {
    templates: HashMap<String, String>,
}

impl SourceBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template source under `locator`
    pub fn with_template(mut self, locator: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(locator, source);
        self
    }

    /// Add or replace a template source
    pub fn insert(&mut self, locator: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(locator.into(), source.into());
    }

    /// Check if a template exists
    pub fn contains(&self, locator: &str) -> bool {
        self.templates.contains_key(locator)
    }
}

impl TemplateBackend for SourceBackend {
    fn parse(&self, locator: &str) -> Result<Box<dyn Template>, TemplateError> {
        let source = self
            .templates
            .get(locator)
            .ok_or_else(|| TemplateError::NotFound {
                locator: locator.to_string(),
            })?;
        trace!(locator, "parsing in-memory template");
        Ok(Box::new(ParsedTemplate::parse(locator, source)?))
    }
}

/// Backend loading template sources from a directory
///
/// A locator is a path relative to the base directory. When an extension is
/// configured it is appended to the locator, so `header` with extension
/// `tmpl` loads `<base>/header.tmpl`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    base_path: PathBuf,
    extension: Option<String>,
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new(".")
    }
}

impl FileBackend {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            extension: None,
        }
    }

    /// Set the extension appended to every locator
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        let extension = extension.trim_start_matches('.').to_string();
        self.extension = if extension.is_empty() {
            None
        } else {
            Some(extension)
        };
        self
    }

    /// Get the base path for file resolution
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Resolve a locator to the file it loads
    pub fn resolve_path(&self, locator: &str) -> PathBuf {
        match &self.extension {
            Some(ext) => self.base_path.join(format!("{}.{}", locator, ext)),
            None => self.base_path.join(locator),
        }
    }
}

impl TemplateBackend for FileBackend {
    fn parse(&self, locator: &str) -> Result<Box<dyn Template>, TemplateError> {
        let path = self.resolve_path(locator);
        trace!(locator, path = %path.display(), "loading template file");

        let source = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                TemplateError::NotFound {
                    locator: locator.to_string(),
                }
            } else {
                TemplateError::Io { path, source }
            }
        })?;

        Ok(Box::new(ParsedTemplate::parse(locator, &source)?))
    }
}
