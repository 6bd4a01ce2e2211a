//! Template parser using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::error::{ParseError, Span};

use super::lexer::{lex, Token};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text, copied to the output
    Text(String),
    /// Rendered output of the first direct child bound to this name
    Child(String),
    /// Rendered output of every direct child, in declaration order
    Children,
    /// Name of the bound view-model
    Name,
    /// The node's template locator
    Template,
    /// A field from the view-model's data
    Field(String),
}

/// Segment with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// Parse template source into segments
pub fn parse(input: &str) -> Result<Vec<Spanned<Segment>>, Vec<ParseError>> {
    let len = input.len();

    let token_iter = lex(input)
        .into_iter()
        .map(|(tok, span)| (tok, span.into()));

    let token_stream = Stream::from_iter(token_iter)
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    template_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn template_parser<'a, I>(
) -> impl Parser<'a, I, Vec<Spanned<Segment>>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let text = select! {
        Token::Text(s) => Segment::Text(s),
    };

    let string_literal = select! {
        Token::String(s) => s,
    };

    let action = choice((
        just(Token::Child)
            .ignore_then(string_literal.clone())
            .map(Segment::Child),
        just(Token::Field)
            .ignore_then(string_literal)
            .map(Segment::Field),
        just(Token::Children).to(Segment::Children),
        just(Token::Name).to(Segment::Name),
        just(Token::Template).to(Segment::Template),
    ))
    // An empty action is what remains of a comment
    .or_not()
    .delimited_by(just(Token::Open), just(Token::Close));

    choice((text.map(Some), action))
        .map_with(|segment, e| segment.map(|s| Spanned::new(s, span_range(&e.span()))))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .map(|segments| segments.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(input: &str) -> Vec<Segment> {
        parse(input)
            .expect("Should parse")
            .into_iter()
            .map(|s| s.node)
            .collect()
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(nodes("nav"), vec![Segment::Text("nav".to_string())]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(nodes("").is_empty());
    }

    #[test]
    fn test_parse_child_reference() {
        assert_eq!(
            nodes(r#"header {{ child "nav" }} "#),
            vec![
                Segment::Text("header ".to_string()),
                Segment::Child("nav".to_string()),
                Segment::Text(" ".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_all_actions() {
        assert_eq!(
            nodes(r#"{{ name }}:{{ template }}:{{ field "title" }}:{{ children }}"#),
            vec![
                Segment::Name,
                Segment::Text(":".to_string()),
                Segment::Template,
                Segment::Text(":".to_string()),
                Segment::Field("title".to_string()),
                Segment::Text(":".to_string()),
                Segment::Children,
            ]
        );
    }

    #[test]
    fn test_comment_produces_nothing() {
        assert_eq!(
            nodes("a{{/* hidden */}}b"),
            vec![Segment::Text("a".to_string()), Segment::Text("b".to_string())]
        );
    }

    #[test]
    fn test_starred_comment_close_produces_nothing() {
        assert_eq!(
            nodes("a{{/* note **/}}b"),
            vec![Segment::Text("a".to_string()), Segment::Text("b".to_string())]
        );
    }

    #[test]
    fn test_segment_spans() {
        let segments = parse(r#"ab{{ child "x" }}"#).expect("Should parse");
        assert_eq!(segments[0].span, 0..2);
        assert_eq!(segments[1].span.start, 2);
    }

    #[test]
    fn test_unknown_action_is_error() {
        let errors = parse("{{ bogus }}").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_child_requires_name() {
        assert!(parse("{{ child }}").is_err());
    }

    #[test]
    fn test_unterminated_action_is_error() {
        assert!(parse("header {{ child \"nav\"").is_err());
    }
}
