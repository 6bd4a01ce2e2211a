//! Lexer for page templates
//!
//! Templates are literal text with actions between `{{` and `}}`. Literal
//! text is passed through verbatim; action bodies are tokenized with logos.

use logos::Logos;

use crate::error::Span;

const OPEN: &str = "{{";

/// Tokens inside an action body
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
enum ActionToken {
    #[token("}}")]
    Close,
    #[token("{{")]
    Open,

    #[token("child")]
    Child,
    #[token("children")]
    Children,
    #[token("field")]
    Field,
    #[token("name")]
    Name,
    #[token("template")]
    Template,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_\-]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(&lex.slice()[1..lex.slice().len() - 1]))]
    String(String),

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Comment,
}

/// Template token stream
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text between actions
    Text(String),
    /// `{{`
    Open,
    /// `}}`
    Close,

    Child,
    Children,
    Field,
    Name,
    Template,

    Ident(String),
    String(String),
    /// Anything the action lexer could not recognize
    Invalid(String),
}

impl From<ActionToken> for Token {
    fn from(tok: ActionToken) -> Self {
        match tok {
            ActionToken::Close => Token::Close,
            ActionToken::Open => Token::Open,
            ActionToken::Child => Token::Child,
            ActionToken::Children => Token::Children,
            ActionToken::Field => Token::Field,
            ActionToken::Name => Token::Name,
            ActionToken::Template => Token::Template,
            ActionToken::Ident(s) => Token::Ident(s),
            ActionToken::String(s) => Token::String(s),
            // Skipped by the lexer, never yielded
            ActionToken::Comment => Token::Invalid(String::new()),
        }
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Lex a template into tokens with spans
pub fn lex(input: &str) -> Vec<(Token, Span)> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(offset) = rest.find(OPEN) else {
            tokens.push((Token::Text(rest.to_string()), pos..input.len()));
            break;
        };

        if offset > 0 {
            tokens.push((Token::Text(rest[..offset].to_string()), pos..pos + offset));
        }

        let body_start = pos + offset + OPEN.len();
        tokens.push((Token::Open, pos + offset..body_start));
        pos = lex_action(input, body_start, &mut tokens);
    }

    tokens
}

/// Lex one action body, returning the position after its closing `}}`
/// (or the end of input when the action is unterminated)
fn lex_action(input: &str, start: usize, tokens: &mut Vec<(Token, Span)>) -> usize {
    for (tok, span) in ActionToken::lexer(&input[start..]).spanned() {
        let span = start + span.start..start + span.end;
        match tok {
            Ok(ActionToken::Close) => {
                tokens.push((Token::Close, span.clone()));
                return span.end;
            }
            Ok(tok) => tokens.push((tok.into(), span)),
            Err(()) => tokens.push((Token::Invalid(input[span.clone()].to_string()), span)),
        }
    }
    input.len()
}
