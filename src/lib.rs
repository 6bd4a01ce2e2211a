//! Page Composer - compose pages out of named, nestable blocks
//!
//! A page layout declares a tree of blocks. Each block binds a registered
//! view-model to a template; parent templates pull in their children by name
//! at render time, so the layout says what exists and the templates say what
//! is shown.
//!
//! # Example
//!
//! ```rust
//! use page_composer::compose::NodeBuilder;
//! use page_composer::registry::{Register, StaticViewModel, ViewModelRegistry};
//! use page_composer::template::{Renderer, SourceBackend};
//! use page_composer::{render_layout_with, MissingBlockPolicy};
//!
//! let registry = ViewModelRegistry::new();
//! registry
//!     .add(&[
//!         StaticViewModel::new("header").shared(),
//!         StaticViewModel::new("nav").shared(),
//!     ])
//!     .unwrap();
//!
//! let renderer = Renderer::new(
//!     SourceBackend::new()
//!         .with_template("header", r#"<header>{{ child "nav" }}</header>"#)
//!         .with_template("nav", "<nav/>"),
//! );
//!
//! let layout = br#"
//! [[layout]]
//! block = "header"
//! template = "header"
//!
//! [[layout.children]]
//! block = "nav"
//! template = "nav"
//! "#;
//!
//! let html = render_layout_with(layout, &registry, renderer, MissingBlockPolicy::Fail).unwrap();
//! assert_eq!(html, "<header><nav/></header>");
//! ```

pub mod compose;
pub mod config;
pub mod content;
pub mod error;
pub mod registry;
pub mod template;

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

pub use compose::{render_page, BlockNode, ComposeError, MissingBlockPolicy, NodeBuilder};
pub use config::{ConfigError, ConfigFile};
pub use content::{BlockContent, DecodeError, PageContent};
pub use error::ParseError;
pub use registry::global::GlobalRegistry;
pub use registry::{Register, RegistryError, StaticViewModel, ViewData, ViewModel, ViewModelRegistry};
pub use template::{FileBackend, Renderer, SourceBackend, TemplateBackend, TemplateError};

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Error decoding the layout
    #[error("layout error: {0}")]
    Decode(#[from] DecodeError),

    /// Error registering view-models
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error building or rendering blocks
    #[error("compose error: {0}")]
    Compose(#[from] ComposeError),
}

impl RenderError {
    /// Ariadne report when the failure is a template syntax error
    pub fn report(&self) -> Option<String> {
        match self {
            RenderError::Compose(ComposeError::Template(err)) => err.report(),
            _ => None,
        }
    }
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Directory template locators are resolved against
    pub template_dir: PathBuf,
    /// Extension appended to template locators
    pub template_extension: Option<String>,
    /// What to do with blocks naming unregistered view-models
    pub missing_block: MissingBlockPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            template_extension: None,
            missing_block: MissingBlockPolicy::default(),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template directory
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = dir.into();
        self
    }

    /// Set the template file extension
    pub fn with_template_extension(mut self, extension: impl Into<String>) -> Self {
        self.template_extension = Some(extension.into());
        self
    }

    /// Set the policy for unresolved block names
    pub fn with_missing_block(mut self, policy: MissingBlockPolicy) -> Self {
        self.missing_block = policy;
        self
    }

    /// Template backend reading files as configured
    pub fn file_backend(&self) -> FileBackend {
        let backend = FileBackend::new(self.template_dir.clone());
        match &self.template_extension {
            Some(ext) => backend.with_extension(ext.clone()),
            None => backend,
        }
    }
}

/// Register view-models in the process-wide registry
///
/// Fails on the first name that is already registered; earlier items in the
/// slice stay registered.
pub fn add_blocks(models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError> {
    GlobalRegistry.add(models)
}

/// Render a layout with the process-wide registry and templates read from
/// the current directory
pub fn render_layout(layout: &[u8]) -> Result<String, RenderError> {
    render_layout_with_config(layout, &RenderConfig::default())
}

/// Render a layout with the process-wide registry and custom configuration
pub fn render_layout_with_config(layout: &[u8], config: &RenderConfig) -> Result<String, RenderError> {
    let renderer = Renderer::new(config.file_backend());
    render_layout_with(layout, &GlobalRegistry, renderer, config.missing_block)
}

/// Render a layout against an explicit registry and renderer
pub fn render_layout_with(
    layout: &[u8],
    registry: &dyn Register,
    renderer: Renderer,
    missing_block: MissingBlockPolicy,
) -> Result<String, RenderError> {
    let page = PageContent::from_slice(layout)?;
    debug!(blocks = page.block_count(), "decoded layout");

    let builder = NodeBuilder::new(registry, renderer).with_missing_block(missing_block);
    Ok(render_page(&page.layout, &builder)?)
}
