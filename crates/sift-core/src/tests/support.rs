//! A tiny call-expression language used to exercise the engine without a
//! real grammar.
//!
//! ```text
//! program   := (expr (';' | '\n'))*
//! expr      := primary ('=' expr)?
//! primary   := ident (':' ident)? ('(' (expr (',' expr)*)? ')')?
//!            | number | 'string' | '(' expr ')'
//! ```

use std::borrow::Cow;

use crate::{
    CHILDREN, CompareRule, LineCol, MatchContext, Node, NodeKinds, ParseFailure, ParserAdapter,
    SearchConfig, Span,
};

pub(crate) const TOY_KINDS: NodeKinds = NodeKinds {
    identifiers: &["identifier"],
    strings: &["string"],
    numbers: &["number"],
    programs: &["program"],
    block: "block",
    statement_wrappers: &[],
    parenthesized: Some("parenthesized"),
    equivalent: &[("call", "new_call")],
    default_values: &[("assign", "left")],
    type_annotation: Some("type"),
};

/// Adapter for the toy language.
#[derive(Default)]
pub(crate) struct ToyAdapter {
    pub(crate) before: Vec<&'static dyn CompareRule>,
}

impl ParserAdapter for ToyAdapter {
    fn name(&self) -> &'static str {
        "toy"
    }

    fn parse(&self, source: &str) -> Result<Node, ParseFailure> {
        ToyParser { src: source, pos: 0 }.program()
    }

    fn kinds(&self) -> &NodeKinds {
        &TOY_KINDS
    }

    fn is_field_optional(&self, kind: &str, field: &str) -> bool {
        matches!((kind, field), ("arguments", CHILDREN) | ("identifier", "type"))
    }

    fn sanitize<'t>(&self, kind: &str, text: &'t str) -> Cow<'t, str> {
        if kind == "string" {
            Cow::Borrowed(text.trim_matches('\''))
        } else {
            Cow::Borrowed(text)
        }
    }

    fn rules_before_wildcards(&self) -> &[&'static dyn CompareRule] {
        &self.before
    }
}

struct ToyParser<'s> {
    src: &'s str,
    pos: usize,
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

impl ToyParser<'_> {
    fn peek(&self) -> Option<char> {
        self.src.get(self.pos..)?.chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_while(&mut self, keep: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&keep) {
            self.bump();
        }
    }

    fn line_col(&self, offset: usize) -> LineCol {
        let before = &self.src[..offset];
        let line = before.matches('\n').count();
        let column = offset - before.rfind('\n').map_or(0, |nl| nl + 1);
        LineCol::new(line as u32, column as u32)
    }

    fn span(&self, start: usize) -> Span {
        Span::new(start, self.pos, self.line_col(start), self.line_col(self.pos))
    }

    fn fail(&self, message: &str) -> ParseFailure {
        let at = self.line_col(self.pos);
        ParseFailure::new(message, Some(LineCol::new(at.line + 1, at.column + 1)))
    }

    fn program(mut self) -> Result<Node, ParseFailure> {
        let mut statements = Vec::new();
        self.skip_while(|ch| matches!(ch, ' ' | '\t' | '\n' | ';'));
        while self.peek().is_some() {
            statements.push(self.expr()?);
            self.skip_while(|ch| ch == ' ' || ch == '\t');
            match self.peek() {
                None | Some('\n' | ';') => {}
                Some(_) => return Err(self.fail("expected end of statement")),
            }
            self.skip_while(|ch| matches!(ch, ' ' | '\t' | '\n' | ';'));
        }
        let end = self.src.len();
        let mut root = Node::branch(
            "program",
            Span::new(0, end, LineCol::new(0, 0), self.line_col(end)),
        );
        if !statements.is_empty() {
            root = root.with_children(CHILDREN, statements);
        }
        Ok(root)
    }

    fn expr(&mut self) -> Result<Node, ParseFailure> {
        self.skip_while(|ch| ch == ' ' || ch == '\t');
        let start = self.pos;
        let primary = self.primary()?;
        self.skip_while(|ch| ch == ' ' || ch == '\t');
        if self.peek() == Some('=') {
            self.bump();
            let right = self.expr()?;
            return Ok(Node::branch("assign", self.span(start))
                .with_child("left", primary)
                .with_child("right", right));
        }
        Ok(primary)
    }

    fn primary(&mut self) -> Result<Node, ParseFailure> {
        let start = self.pos;
        match self.peek() {
            Some('\'') => {
                self.bump();
                self.skip_while(|ch| ch != '\'');
                if self.bump() != Some('\'') {
                    return Err(self.fail("unterminated string"));
                }
                Ok(Node::leaf("string", &self.src[start..self.pos], self.span(start)))
            }
            Some('(') => {
                self.bump();
                let inner = self.expr()?;
                self.skip_while(|ch| ch == ' ');
                if self.bump() != Some(')') {
                    return Err(self.fail("expected )"));
                }
                Ok(Node::branch("parenthesized", self.span(start)).with_child("expression", inner))
            }
            Some(ch) if ch.is_ascii_digit() => {
                self.skip_while(char::is_alphanumeric);
                Ok(Node::leaf("number", &self.src[start..self.pos], self.span(start)))
            }
            Some(ch) if is_ident_char(ch) => self.identifier_or_call(start),
            _ => Err(self.fail("unexpected token")),
        }
    }

    fn identifier_or_call(&mut self, start: usize) -> Result<Node, ParseFailure> {
        self.skip_while(is_ident_char);
        let name = &self.src[start..self.pos];
        let mut ident = Node::leaf("identifier", name, self.span(start));
        if self.peek() == Some(':') {
            self.bump();
            let type_start = self.pos;
            self.skip_while(is_ident_char);
            let type_name = Node::leaf(
                "type_identifier",
                &self.src[type_start..self.pos],
                self.span(type_start),
            );
            ident = ident.with_child("type", type_name);
        }
        if self.peek() != Some('(') {
            return Ok(ident);
        }

        let args_start = self.pos;
        self.bump();
        let mut args = Vec::new();
        self.skip_while(|ch| ch == ' ');
        if self.peek() == Some(')') {
            self.bump();
        } else {
            loop {
                args.push(self.expr()?);
                self.skip_while(|ch| ch == ' ');
                match self.bump() {
                    Some(',') => {}
                    Some(')') => break,
                    _ => return Err(self.fail("expected , or )")),
                }
            }
        }
        let mut arguments = Node::branch("arguments", self.span(args_start));
        if !args.is_empty() {
            arguments = arguments.with_children(CHILDREN, args);
        }
        let kind = if name == "new" { "new_call" } else { "call" };
        Ok(Node::branch(kind, self.span(start))
            .with_child("function", ident)
            .with_child("arguments", arguments))
    }
}

/// Parses toy source, panicking on failure.
pub(crate) fn parse(source: &str) -> Node {
    ToyAdapter::default()
        .parse(source)
        .unwrap_or_else(|err| panic!("toy source should parse: {err:?}"))
}

/// Parses toy source and returns its only statement.
pub(crate) fn statement(source: &str) -> Node {
    parse(source)
        .children()
        .first()
        .cloned()
        .unwrap_or_else(|| panic!("expected a statement in {source:?}"))
}

/// Builds a match context over `source`.
pub(crate) fn context<'a>(
    adapter: &'a ToyAdapter,
    config: &'a SearchConfig,
    source: &'a str,
) -> MatchContext<'a> {
    MatchContext::new(adapter, config, source)
}
