//! Execution of the bundled template language

use std::io;

use crate::compose::BlockNode;

use super::grammar::{parse, Segment, Spanned};
use super::{Template, TemplateError};

/// A template parsed from source, ready to execute against any node
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTemplate {
    locator: String,
    segments: Vec<Spanned<Segment>>,
}

impl ParsedTemplate {
    /// Parse template source; `locator` names the template in errors
    pub fn parse(locator: impl Into<String>, source: &str) -> Result<Self, TemplateError> {
        let locator = locator.into();
        match parse(source) {
            Ok(segments) => Ok(Self { locator, segments }),
            Err(errors) => Err(TemplateError::Parse {
                locator,
                source_text: source.to_string(),
                errors,
            }),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn segments(&self) -> &[Spanned<Segment>] {
        &self.segments
    }

    /// Names referenced through `{{ child "..." }}`, in template order
    pub fn referenced_children(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match &s.node {
            Segment::Child(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

impl Template for ParsedTemplate {
    fn execute(&self, out: &mut dyn io::Write, node: &BlockNode) -> Result<(), TemplateError> {
        for segment in &self.segments {
            match &segment.node {
                Segment::Text(text) => out.write_all(text.as_bytes())?,
                Segment::Child(name) => out.write_all(node.child_html(name)?.as_bytes())?,
                Segment::Children => out.write_all(node.children_html()?.as_bytes())?,
                Segment::Name => out.write_all(node.name().as_bytes())?,
                Segment::Template => out.write_all(node.template().as_bytes())?,
                Segment::Field(key) => {
                    if let Some(value) = node.view_model().data().and_then(|d| d.field(key)) {
                        out.write_all(value.as_bytes())?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticViewModel;
    use crate::template::{Renderer, SourceBackend};

    fn node(name: &str, template: &str) -> BlockNode {
        BlockNode::new(
            StaticViewModel::new(name).with_field("title", "Welcome").shared(),
            template,
            Renderer::new(SourceBackend::new()),
        )
    }

    fn run(source: &str, node: &BlockNode) -> String {
        let template = ParsedTemplate::parse("test", source).expect("Should parse");
        let mut out = Vec::new();
        template.execute(&mut out, node).expect("Should execute");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_execute_text() {
        assert_eq!(run("template text", &node("a", "a")), "template text");
    }

    #[test]
    fn test_execute_name_template_field() {
        let output = run(
            r#"{{ name }}|{{ template }}|{{ field "title" }}|{{ field "missing" }}|"#,
            &node("header", "layouts/header"),
        );
        assert_eq!(output, "header|layouts/header|Welcome||");
    }

    #[test]
    fn test_unknown_child_renders_nothing() {
        assert_eq!(run(r#"a{{ child "ghost" }}b"#, &node("a", "a")), "ab");
    }

    #[test]
    fn test_parse_error_keeps_source() {
        match ParsedTemplate::parse("broken", "{{ child }}") {
            Err(TemplateError::Parse {
                locator,
                source_text,
                errors,
            }) => {
                assert_eq!(locator, "broken");
                assert_eq!(source_text, "{{ child }}");
                assert!(!errors.is_empty());
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_referenced_children() {
        let template =
            ParsedTemplate::parse("t", r#"{{ child "b" }}{{ child "a" }}{{ child "b" }}"#).unwrap();
        let names: Vec<_> = template.referenced_children().collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }
}
