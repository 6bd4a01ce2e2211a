//! Building composition trees from layout declarations

use std::collections::HashSet;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::content::BlockContent;
use crate::registry::{Register, ViewModel};
use crate::template::Renderer;

use super::{BlockNode, ComposeError};

/// What to do when a block names a view-model that is not registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingBlockPolicy {
    /// Fail the whole build
    #[default]
    Fail,
    /// Bind a data-less view-model carrying the requested name
    Placeholder,
}

/// Stand-in view-model for an unregistered block name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    name: String,
}

impl Placeholder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ViewModel for Placeholder {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Turns layout declarations into [`BlockNode`] trees
pub struct NodeBuilder<'a> {
    registry: &'a dyn Register,
    renderer: Renderer,
    missing_block: MissingBlockPolicy,
}

impl<'a> NodeBuilder<'a> {
    pub fn new(registry: &'a dyn Register, renderer: Renderer) -> Self {
        Self {
            registry,
            renderer,
            missing_block: MissingBlockPolicy::default(),
        }
    }

    /// Set the policy for unresolved block names
    pub fn with_missing_block(mut self, policy: MissingBlockPolicy) -> Self {
        self.missing_block = policy;
        self
    }

    pub fn registry(&self) -> &dyn Register {
        self.registry
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn missing_block(&self) -> MissingBlockPolicy {
        self.missing_block
    }

    /// Build the node tree for one block and, recursively, its children
    pub fn build(&self, content: &BlockContent) -> Result<BlockNode, ComposeError> {
        let view_model = self.resolve(&content.block)?;
        let mut node = BlockNode::new(view_model, content.template.as_str(), self.renderer.clone());

        let mut seen = HashSet::new();
        for child in &content.children {
            if !seen.insert(child.block.as_str()) {
                warn!(
                    parent = %content.block,
                    block = %child.block,
                    "duplicate sibling block name, only the first is reachable by name"
                );
            }
            node.add_child(self.build(child)?);
        }

        debug!(
            block = %content.block,
            children = node.children().len(),
            "built block node"
        );
        Ok(node)
    }

    fn resolve(&self, name: &str) -> Result<Arc<dyn ViewModel>, ComposeError> {
        match self.registry.find(name) {
            Ok(view_model) => Ok(view_model),
            Err(source) => match self.missing_block {
                MissingBlockPolicy::Fail => Err(ComposeError::UnresolvedBlock {
                    block: name.to_string(),
                    source,
                }),
                MissingBlockPolicy::Placeholder => {
                    warn!(block = name, "block is not registered, binding a placeholder");
                    Ok(Arc::new(Placeholder::new(name)))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{StaticViewModel, ViewModelRegistry};
    use crate::template::SourceBackend;

    fn registry(names: &[&str]) -> ViewModelRegistry {
        let registry = ViewModelRegistry::new();
        let models: Vec<_> = names
            .iter()
            .map(|n| StaticViewModel::new(*n).shared())
            .collect();
        registry.add(&models).unwrap();
        registry
    }

    fn renderer() -> Renderer {
        Renderer::new(SourceBackend::new())
    }

    /// Node counts per depth, children ordered by name at each level
    fn shape_of_content(content: &BlockContent, depth: usize, out: &mut Vec<Vec<String>>) {
        if out.len() <= depth {
            out.push(Vec::new());
        }
        out[depth].push(content.block.clone());
        for child in &content.children {
            shape_of_content(child, depth + 1, out);
        }
    }

    fn shape_of_node(node: &BlockNode, depth: usize, out: &mut Vec<Vec<String>>) {
        if out.len() <= depth {
            out.push(Vec::new());
        }
        out[depth].push(node.name().to_string());
        for child in node.children() {
            shape_of_node(child, depth + 1, out);
        }
    }

    #[test]
    fn test_build_binds_view_model_and_template() {
        let registry = registry(&["test"]);
        let builder = NodeBuilder::new(&registry, renderer());
        let content = BlockContent::new("test", "test").with_child(BlockContent::new("test", "test"));

        let node = builder.build(&content).expect("Should build");
        assert_eq!(node.name(), "test");
        assert_eq!(node.template(), "test");
        assert_eq!(node.children().len(), 1);
        assert!(Arc::ptr_eq(
            node.view_model(),
            &registry.find("test").unwrap()
        ));
    }

    #[test]
    fn test_build_is_isomorphic() {
        let registry = registry(&["page", "header", "nav", "logo", "menu", "body", "footer"]);
        let builder = NodeBuilder::new(&registry, renderer());
        let content = BlockContent::new("page", "page")
            .with_child(
                BlockContent::new("header", "header")
                    .with_child(BlockContent::new("logo", "logo"))
                    .with_child(
                        BlockContent::new("nav", "nav").with_child(BlockContent::new("menu", "menu")),
                    ),
            )
            .with_child(BlockContent::new("body", "body"))
            .with_child(BlockContent::new("footer", "footer"));

        let node = builder.build(&content).unwrap();

        let mut expected = Vec::new();
        shape_of_content(&content, 0, &mut expected);
        let mut actual = Vec::new();
        shape_of_node(&node, 0, &mut actual);
        assert_eq!(actual, expected);
        assert_eq!(node.size(), 7);
    }

    #[test]
    fn test_unresolved_block_fails_by_default() {
        let registry = registry(&["header"]);
        let builder = NodeBuilder::new(&registry, renderer());
        let content = BlockContent::new("header", "header").with_child(BlockContent::new("nav", "nav"));

        match builder.build(&content) {
            Err(ComposeError::UnresolvedBlock { block, .. }) => assert_eq!(block, "nav"),
            other => panic!("Expected unresolved block, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_block_placeholder() {
        let registry = registry(&["header"]);
        let builder = NodeBuilder::new(&registry, renderer())
            .with_missing_block(MissingBlockPolicy::Placeholder);
        let content = BlockContent::new("header", "header").with_child(BlockContent::new("nav", "nav"));

        let node = builder.build(&content).expect("Placeholder should bind");
        let nav = node.child("nav").expect("Placeholder keeps the requested name");
        assert!(nav.view_model().data().is_none());
        assert!(registry.find("nav").is_err());
    }

    #[test]
    fn test_duplicate_siblings_are_kept() {
        let registry = registry(&["list", "item"]);
        let builder = NodeBuilder::new(&registry, renderer());
        let content = BlockContent::new("list", "list")
            .with_child(BlockContent::new("item", "first"))
            .with_child(BlockContent::new("item", "second"));

        let node = builder.build(&content).unwrap();
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.child("item").unwrap().template(), "first");
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: MissingBlockPolicy,
        }
        let parsed: Wrapper = toml::from_str(r#"policy = "placeholder""#).unwrap();
        assert_eq!(parsed.policy, MissingBlockPolicy::Placeholder);
    }
}
