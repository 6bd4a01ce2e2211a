//! Composition nodes

use std::fmt;
use std::sync::Arc;

use crate::registry::ViewModel;
use crate::template::{Renderer, TemplateError};

/// Runtime counterpart of a layout block
///
/// Holds the resolved view-model, the template locator, the built children
/// in declaration order and the renderer used for itself and for any child
/// its template pulls in.
#[derive(Clone)]
pub struct BlockNode {
    view_model: Arc<dyn ViewModel>,
    template: String,
    children: Vec<BlockNode>,
    renderer: Renderer,
}

impl BlockNode {
    pub fn new(view_model: Arc<dyn ViewModel>, template: impl Into<String>, renderer: Renderer) -> Self {
        Self {
            view_model,
            template: template.into(),
            children: Vec::new(),
            renderer,
        }
    }

    pub fn view_model(&self) -> &Arc<dyn ViewModel> {
        &self.view_model
    }

    /// Name of the bound view-model
    pub fn name(&self) -> &str {
        self.view_model.name()
    }

    /// Template locator
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn children(&self) -> &[BlockNode] {
        &self.children
    }

    pub fn add_child(&mut self, child: BlockNode) {
        self.children.push(child);
    }

    /// First direct child bound to `name`
    pub fn child(&self, name: &str) -> Option<&BlockNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Render the first direct child bound to `name`
    ///
    /// An unknown name renders as empty text. A failure inside the child is
    /// returned wrapped in [`TemplateError::Child`].
    pub fn child_html(&self, name: &str) -> Result<String, TemplateError> {
        match self.child(name) {
            Some(child) => child.render().map_err(|source| TemplateError::Child {
                name: name.to_string(),
                source: Box::new(source),
            }),
            None => Ok(String::new()),
        }
    }

    /// Render every direct child in declaration order
    pub fn children_html(&self) -> Result<String, TemplateError> {
        let mut html = String::new();
        for child in &self.children {
            let rendered = child.render().map_err(|source| TemplateError::Child {
                name: child.name().to_string(),
                source: Box::new(source),
            })?;
            html.push_str(&rendered);
        }
        Ok(html)
    }

    /// Render this node through its own renderer
    pub fn render(&self) -> Result<String, TemplateError> {
        self.renderer.render(self)
    }

    /// Number of nodes in this subtree, this one included
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(BlockNode::size).sum::<usize>()
    }
}

impl fmt::Debug for BlockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockNode")
            .field("block", &self.name())
            .field("template", &self.template)
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticViewModel;
    use crate::template::SourceBackend;

    fn renderer() -> Renderer {
        Renderer::new(
            SourceBackend::new()
                .with_template("a", "A")
                .with_template("b", "B")
                .with_template("second-a", "A2")
                .with_template("only-a", r#"[{{ child "a" }}]"#)
                .with_template("twice", r#"{{ child "b" }}{{ child "a" }}{{ child "b" }}"#)
                .with_template("ghost", r#"x{{ child "ghost" }}y"#)
                .with_template("all", "{{ children }}")
                .with_template("broken", "{{ child }}"),
        )
    }

    fn leaf(name: &str, template: &str, renderer: &Renderer) -> BlockNode {
        BlockNode::new(StaticViewModel::new(name).shared(), template, renderer.clone())
    }

    fn parent(template: &str) -> BlockNode {
        let renderer = renderer();
        let mut node = leaf("parent", template, &renderer);
        node.add_child(leaf("a", "a", &renderer));
        node.add_child(leaf("b", "b", &renderer));
        node
    }

    #[test]
    fn test_add_child_keeps_order() {
        let node = parent("all");
        let names: Vec<_> = node.children().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(node.size(), 3);
    }

    #[test]
    fn test_accessors() {
        let node = parent("only-a");
        assert_eq!(node.name(), "parent");
        assert_eq!(node.template(), "only-a");
        assert_eq!(node.view_model().name(), "parent");
        assert!(node.child("b").is_some());
        assert!(node.child("c").is_none());
    }

    #[test]
    fn test_template_includes_only_referenced_child() {
        assert_eq!(parent("only-a").render().unwrap(), "[A]");
    }

    #[test]
    fn test_template_controls_order_and_repetition() {
        assert_eq!(parent("twice").render().unwrap(), "BAB");
    }

    #[test]
    fn test_unknown_child_is_empty() {
        let node = parent("ghost");
        assert_eq!(node.child_html("ghost").unwrap(), "");
        assert_eq!(node.render().unwrap(), "xy");
    }

    #[test]
    fn test_children_renders_all_in_order() {
        assert_eq!(parent("all").render().unwrap(), "AB");
    }

    #[test]
    fn test_first_match_wins_for_duplicate_names() {
        let renderer = renderer();
        let mut node = leaf("parent", "only-a", &renderer);
        node.add_child(leaf("a", "a", &renderer));
        node.add_child(leaf("a", "second-a", &renderer));
        assert_eq!(node.child_html("a").unwrap(), "A");
    }

    #[test]
    fn test_child_failure_propagates() {
        let renderer = renderer();
        let mut node = leaf("parent", "only-a", &renderer);
        node.add_child(leaf("a", "broken", &renderer));

        match node.render() {
            Err(TemplateError::Child { name, source }) => {
                assert_eq!(name, "a");
                assert!(matches!(*source, TemplateError::Parse { .. }));
            }
            other => panic!("Expected child error, got {:?}", other),
        }
    }
}
