//! Declarative page layout
//!
//! A page is an ordered list of blocks, each naming the view-model it binds to
//! and the template it renders with. Blocks nest through `children`.
//!
//! ```toml
//! [[layout]]
//! block = "header"
//! template = "header"
//!
//! [[layout.children]]
//! block = "nav"
//! template = "nav"
//!
//! [[layout]]
//! block = "footer"
//! template = "footer"
//! ```

mod error;

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

pub use error::DecodeError;

/// Top-level layout document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageContent {
    /// Top-level blocks in render order
    #[serde(default)]
    pub layout: Vec<BlockContent>,
}

/// A single block declaration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockContent {
    /// Name of the registered view-model this block binds to
    pub block: String,
    /// Locator handed to the template backend
    pub template: String,
    /// Nested blocks, in declaration order
    #[serde(default)]
    pub children: Vec<BlockContent>,
}

impl BlockContent {
    pub fn new(block: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            template: template.into(),
            children: Vec::new(),
        }
    }

    /// Append a child declaration
    pub fn with_child(mut self, child: BlockContent) -> Self {
        self.children.push(child);
        self
    }

    fn validate(&self, path: &str) -> Result<(), DecodeError> {
        if self.block.trim().is_empty() {
            return Err(DecodeError::empty("block", path));
        }
        if self.template.trim().is_empty() {
            return Err(DecodeError::empty("template", path));
        }
        for (i, child) in self.children.iter().enumerate() {
            child.validate(&format!("{}.children[{}]", path, i))?;
        }
        Ok(())
    }
}

impl PageContent {
    /// Decode a layout from raw bytes
    pub fn from_slice(data: &[u8]) -> Result<Self, DecodeError> {
        std::str::from_utf8(data)?.parse()
    }

    /// Decode a layout from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DecodeError> {
        let content = std::fs::read_to_string(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<(), DecodeError> {
        for (i, block) in self.layout.iter().enumerate() {
            block.validate(&format!("layout[{}]", i))?;
        }
        Ok(())
    }

    /// Total number of blocks, nested ones included
    pub fn block_count(&self) -> usize {
        fn count(blocks: &[BlockContent]) -> usize {
            blocks.iter().map(|b| 1 + count(&b.children)).sum()
        }
        count(&self.layout)
    }
}

impl FromStr for PageContent {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let content: PageContent = toml::from_str(s)?;
        content.validate()?;
        Ok(content)
    }
}
