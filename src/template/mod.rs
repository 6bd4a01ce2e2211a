//! Template backends and rendering
//!
//! The composition engine only knows two seams: a [`TemplateBackend`] turns a
//! template locator into an executable [`Template`], and a template writes
//! its output for a [`BlockNode`](crate::compose::BlockNode) into a sink.
//!
//! The bundled template language is plain text with actions in `{{ ... }}`:
//!
//! ```text
//! <header>{{ field "title" }} {{ child "nav" }}</header>
//! ```
//!
//! | Action | Output |
//! |---|---|
//! | `{{ child "nav" }}` | rendered first child bound to `nav`, or nothing |
//! | `{{ children }}` | every child, in declaration order |
//! | `{{ name }}` | the bound view-model's name |
//! | `{{ template }}` | the node's template locator |
//! | `{{ field "key" }}` | a view-model data field, or nothing |
//! | `{{/* ... */}}` | nothing |

mod backend;
pub mod grammar;
pub mod lexer;
mod parsed;
mod render;

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

use crate::compose::BlockNode;
use crate::error::ParseError;

pub use backend::{FileBackend, SourceBackend};
pub use parsed::ParsedTemplate;
pub use render::{OutputBuffer, Renderer};

/// Errors that can occur while loading, parsing or executing a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The backend has no template for this locator
    #[error("template not found: {locator}")]
    NotFound { locator: String },

    /// Template source could not be read
    #[error("error reading template file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Template source is syntactically invalid
    #[error("failed to parse template '{locator}': {}", format_parse_errors(.errors))]
    Parse {
        locator: String,
        source_text: String,
        errors: Vec<ParseError>,
    },

    /// Template failed while producing output
    #[error("failed to execute template '{locator}': {message}")]
    Execution { locator: String, message: String },

    /// A child referenced by name failed to render
    #[error("child block '{name}' failed to render: {source}")]
    Child {
        name: String,
        #[source]
        source: Box<TemplateError>,
    },

    /// Writing to the output sink failed
    #[error("failed to write template output: {0}")]
    Write(#[from] io::Error),

    /// Rendered bytes are not valid UTF-8
    #[error("template output is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

impl TemplateError {
    /// Create an execution error
    pub fn execution(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// Ariadne reports for a parse error, following child errors down
    ///
    /// Returns None for every other kind of error.
    pub fn report(&self) -> Option<String> {
        match self {
            TemplateError::Parse {
                locator,
                source_text,
                errors,
            } => Some(
                errors
                    .iter()
                    .map(|e| e.format(source_text, locator))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            TemplateError::Child { source, .. } => source.report(),
            _ => None,
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// An executable template
pub trait Template {
    /// Write this template's output for `node` into `out`
    fn execute(&self, out: &mut dyn io::Write, node: &BlockNode) -> Result<(), TemplateError>;
}

impl<F> Template for F
where
    F: Fn(&mut dyn io::Write, &BlockNode) -> Result<(), TemplateError>,
{
    fn execute(&self, out: &mut dyn io::Write, node: &BlockNode) -> Result<(), TemplateError> {
        self(out, node)
    }
}

/// Resolves template locators into executable templates
pub trait TemplateBackend: Send + Sync {
    fn parse(&self, locator: &str) -> Result<Box<dyn Template>, TemplateError>;
}

impl<F> TemplateBackend for F
where
    F: Fn(&str) -> Result<Box<dyn Template>, TemplateError> + Send + Sync,
{
    fn parse(&self, locator: &str) -> Result<Box<dyn Template>, TemplateError> {
        self(locator)
    }
}
