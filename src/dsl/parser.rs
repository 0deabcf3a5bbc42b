//! Parser for the slab description language.

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::error::{Result, SlabError};

/// Parser for slab descriptions.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser, reading the first token.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire description.
    pub fn parse(&mut self) -> Result<SlabAst> {
        let mut ast = SlabAst::new();

        while self.current.kind != TokenKind::Eof {
            match self.current.kind {
                TokenKind::Newline => {
                    self.advance()?;
                    continue;
                }
                TokenKind::Directive => {
                    let directive = self.parse_directive()?;
                    ast.directives.push(directive);
                }
                _ => {
                    return Err(SlabError::parse(
                        self.current.line,
                        format!("expected a directive, got {:?}", self.current.text),
                    ));
                }
            }

            if self.current.kind == TokenKind::Newline {
                self.advance()?;
            }
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn parse_directive(&mut self) -> Result<Directive> {
        let name = self.current.text.clone();
        let line = self.current.line;

        let kind = DirectiveKind::from_name(&name)
            .ok_or_else(|| SlabError::parse(line, format!("unknown directive: {}", name)))?;
        self.advance()?;

        let mut args = Vec::new();
        let mut params: Vec<(String, Value)> = Vec::new();

        while !self.at_line_end() {
            match self.current.kind {
                TokenKind::Identifier => {
                    let word = self.current.text.clone();
                    self.advance()?;

                    // Check for param=value syntax
                    if self.current.kind == TokenKind::Equals {
                        self.advance()?;
                        let key = word.to_lowercase();
                        let value = self.parse_value_token(line)?;
                        if params.iter().any(|(k, _)| *k == key) {
                            return Err(SlabError::parse(
                                line,
                                format!("parameter '{}' given twice", key),
                            ));
                        }
                        params.push((key, value));
                    } else {
                        args.push(Value::Word(word.to_lowercase()));
                    }
                }
                TokenKind::Number => {
                    let value = self.parse_value_token(line)?;
                    args.push(value);
                }
                _ => {
                    return Err(SlabError::parse(
                        line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }
        }

        Ok(Directive {
            kind,
            args,
            params,
            line,
        })
    }

    /// Consume a number or a bare word.
    fn parse_value_token(&mut self, line: usize) -> Result<Value> {
        let text = self.current.text.clone();
        let value = match self.current.kind {
            TokenKind::Number => Value::Number(
                parse_value(&text)
                    .ok_or_else(|| SlabError::parse(line, format!("invalid number: {}", text)))?,
            ),
            TokenKind::Identifier => Value::Word(text.to_lowercase()),
            _ => return Err(SlabError::parse(line, "expected parameter value")),
        };
        self.advance()?;
        Ok(value)
    }
}
