//! Rendering a composition node through its template

use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::debug;

use crate::compose::BlockNode;

use super::{TemplateBackend, TemplateError};

/// Append-only byte sink templates write into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Convert the accumulated bytes to text
    pub fn into_string(self) -> Result<String, TemplateError> {
        Ok(String::from_utf8(self.bytes)?)
    }
}

impl io::Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Renders nodes with a shared template backend
///
/// Cloning is cheap; every node of a tree holds a clone.
#[derive(Clone)]
pub struct Renderer {
    backend: Arc<dyn TemplateBackend>,
}

impl Renderer {
    pub fn new(backend: impl TemplateBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Create a renderer around an already shared backend
    pub fn from_shared(backend: Arc<dyn TemplateBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn TemplateBackend {
        self.backend.as_ref()
    }

    /// Parse the node's template and execute it with the node as context
    ///
    /// Nothing is returned on failure, not even partial output.
    pub fn render(&self, node: &BlockNode) -> Result<String, TemplateError> {
        debug!(block = node.name(), template = node.template(), "rendering block");
        let template = self.backend.parse(node.template())?;
        let mut out = OutputBuffer::new();
        template.execute(&mut out, node)?;
        out.into_string()
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer").finish_non_exhaustive()
    }
}
