//! Page composition
//!
//! A layout declares which blocks exist; [`NodeBuilder`] binds each of them to
//! its view-model, and the templates decide at render time which children
//! actually show up, by naming them.

mod builder;
mod node;

use thiserror::Error;
use tracing::debug;

use crate::content::BlockContent;
use crate::registry::RegistryError;
use crate::template::TemplateError;

pub use builder::{MissingBlockPolicy, NodeBuilder, Placeholder};
pub use node::BlockNode;

/// Errors that can occur while composing a page
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A block names a view-model that is not registered
    #[error("unresolved block '{block}': {source}")]
    UnresolvedBlock {
        block: String,
        #[source]
        source: RegistryError,
    },

    /// A block failed to render
    #[error("render error: {0}")]
    Template(#[from] TemplateError),
}

/// Build and render each top-level block in order, concatenating the output
///
/// The first failure aborts the page; text rendered before it is dropped.
pub fn render_page(layout: &[BlockContent], builder: &NodeBuilder<'_>) -> Result<String, ComposeError> {
    let mut html = String::new();
    for content in layout {
        let node = builder.build(content)?;
        let rendered = builder.renderer().render(&node)?;
        html.push_str(&rendered);
    }
    debug!(blocks = layout.len(), bytes = html.len(), "rendered page");
    Ok(html)
}
