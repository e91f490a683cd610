//! Recursive-descent parser for declaration text.

use crate::ast::{Attribute, Document, Element};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, Token, TokenKind};

/// Parse a complete document: exactly one root element.
pub fn parse_document(input: &str) -> ParseResult<Document> {
    let mut parser = Parser::new(input)?;
    let root = parser.parse_element()?;
    parser.expect(&TokenKind::Eof)?;
    Ok(Document { root })
}

// ==================== PARSER STATE ====================

/// Parser state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from source text.
    pub fn new(input: &str) -> ParseResult<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }
}

// ==================== TOKEN HELPERS ====================

impl Parser {
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or_else(|| {
            self.tokens
                .last()
                .expect("tokens should always end with EOF")
        })
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: &TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.peek();
            Err(ParseError::unexpected_token(
                token.span,
                kind.name(),
                token.kind.name(),
            ))
        }
    }

    fn expect_name(&mut self) -> ParseResult<String> {
        match self.peek().kind.clone() {
            TokenKind::Name(name) => {
                self.advance();
                Ok(name)
            }
            _ => {
                let token = self.peek();
                Err(ParseError::unexpected_token(
                    token.span,
                    "name",
                    token.kind.name(),
                ))
            }
        }
    }

    fn expect_string(&mut self) -> ParseResult<String> {
        match self.peek().kind.clone() {
            TokenKind::String(value) => {
                self.advance();
                Ok(value)
            }
            _ => {
                let token = self.peek();
                Err(ParseError::unexpected_token(
                    token.span,
                    "string",
                    token.kind.name(),
                ))
            }
        }
    }

    /// A name followed by `=` starts an attribute rather than a sibling element.
    fn at_attribute(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Name(_))
            && matches!(self.peek_at(1).kind, TokenKind::Eq)
    }
}

// ==================== ELEMENTS ====================

impl Parser {
    /// element := NAME attribute* ( '{' element* '}' | ';' )?
    pub fn parse_element(&mut self) -> ParseResult<Element> {
        let start = self.peek().span;
        let name = self.expect_name()?;

        let mut attributes: Vec<Attribute> = Vec::new();
        while self.at_attribute() {
            let attr_span = self.peek().span;
            let attr_name = self.expect_name()?;
            self.expect(&TokenKind::Eq)?;
            let value = self.expect_string()?;
            if attributes.iter().any(|a| a.name == attr_name) {
                return Err(ParseError::duplicate_attribute(attr_span, &attr_name));
            }
            attributes.push(Attribute {
                name: attr_name,
                value,
                span: attr_span,
            });
        }

        let mut children = Vec::new();
        if self.check(&TokenKind::LBrace) {
            self.advance();
            while !self.check(&TokenKind::RBrace) {
                if self.check(&TokenKind::Eof) {
                    let token = self.peek();
                    return Err(ParseError::unexpected_token(
                        token.span,
                        "}",
                        token.kind.name(),
                    ));
                }
                children.push(self.parse_element()?);
            }
            self.expect(&TokenKind::RBrace)?;
        } else if self.check(&TokenKind::Semicolon) {
            self.advance();
        }

        Ok(Element {
            name,
            attributes,
            children,
            span: start,
        })
    }
}
