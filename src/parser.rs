use log::Level;
use thiserror::Error;

use crate::{
    ast::{Ast, Node},
    diagnostics::Diagnostics,
    token::{Tag, Token},
};

/// Default bound on non-terminal nesting, also used by the engine as its
/// tree depth limit. Every tree walk recurses once per level, so this has to
/// fit a 2 MiB thread stack in an unoptimized build.
pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A consumed terminal did not carry the tag the production requires.
    #[error("Expected {expected} but found {actual} at position {position}")]
    UnexpectedToken {
        expected: Tag,
        actual: Tag,
        position: usize,
    },
    /// The grammar has no production for this non-terminal and lookahead.
    #[error("No rule for {non_terminal} starting with {lookahead} at position {position}")]
    NoProduction {
        non_terminal: Tag,
        lookahead: Tag,
        position: usize,
    },
    #[error("Expression nests deeper than {limit} levels at position {position}")]
    NestingTooDeep { limit: usize, position: usize },
}

/// Token sequence terminated by an `Epsilon` end marker, read through a
/// single-token lookahead cursor.
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    current: usize,
}

impl TokenBuffer {
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.push(Token::epsilon());
        Self { tokens, current: 0 }
    }

    /// Tag of the next unconsumed token.
    #[must_use]
    pub fn lookahead(&self) -> Tag {
        self.tokens
            .get(self.current)
            .map_or(Tag::Epsilon, |t| t.tag)
    }

    /// Consumes and returns the next token. Past the end the end marker is
    /// returned again.
    pub fn advance(&mut self) -> Token {
        match self.tokens.get(self.current) {
            Some(token) => {
                let token = token.clone();
                if token.tag != Tag::Epsilon {
                    self.current += 1;
                }
                token
            }
            None => Token::epsilon(),
        }
    }

    /// Index of the next unconsumed token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.current
    }
}

/// The LL(1) table.
///
/// ```text
/// Term  → Variable Terms
/// Term  → Lambda Variable Abstraction Term Terms
/// Term  → LeftBracket Term RightBracket Terms
/// Terms → Application Term
/// Terms → ε                 (lookahead: end of input or RightBracket)
/// ```
///
/// Returns `None` when the pair has no entry.
#[must_use]
pub const fn production(non_terminal: Tag, lookahead: Tag) -> Option<&'static [Tag]> {
    use Tag::{
        Abstraction, Application, Epsilon, Lambda, LeftBracket, RightBracket, Term, Terms, Variable,
    };
    match (non_terminal, lookahead) {
        (Term, Variable) => Some(&[Variable, Terms]),
        (Term, Lambda) => Some(&[Lambda, Variable, Abstraction, Term, Terms]),
        (Term, LeftBracket) => Some(&[LeftBracket, Term, RightBracket, Terms]),
        (Terms, Application) => Some(&[Application, Term]),
        (Terms, Epsilon | RightBracket) => Some(&[Epsilon]),
        _ => None,
    }
}

/// Recursive-descent parser driven by [`production`].
///
/// The parser holds configuration only; each call to [`Parser::parse`] owns
/// its own [`TokenBuffer`], so one parser can serve any number of parses.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    max_depth: usize,
    diagnostics: Diagnostics<'a>,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Parser<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            diagnostics: Diagnostics::silent(),
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_diagnostics(mut self, diagnostics: Diagnostics<'a>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Parses a token sequence into the raw parse tree.
    ///
    /// The result still carries grammar scaffolding (`Terms` wrappers,
    /// brackets and `Epsilon` leaves); run it through
    /// [`crate::simplify::simplify`] to obtain the canonical AST.
    ///
    /// # Errors
    /// Returns a [`ParseError`] on a tag mismatch, a missing production,
    /// leftover input after the root term, or nesting beyond the configured
    /// depth.
    pub fn parse(&self, tokens: Vec<Token>) -> Result<Ast, ParseError> {
        let mut buffer = TokenBuffer::new(tokens);
        let root = self.parse_non_terminal(Tag::Term, &mut buffer, 0)?;

        if buffer.lookahead() != Tag::Epsilon {
            return Err(ParseError::UnexpectedToken {
                expected: Tag::Epsilon,
                actual: buffer.lookahead(),
                position: buffer.position(),
            });
        }

        let ast = Ast::new(root);
        if self.diagnostics.enabled(Level::Debug) {
            self.diagnostics.debug(format_args!(
                "computed raw tree:\n{}",
                ast.graph().to_text()
            ));
        }
        Ok(ast)
    }

    fn parse_non_terminal(
        &self,
        non_terminal: Tag,
        buffer: &mut TokenBuffer,
        depth: usize,
    ) -> Result<Node, ParseError> {
        if depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                position: buffer.position(),
            });
        }

        let lookahead = buffer.lookahead();
        let Some(symbols) = production(non_terminal, lookahead) else {
            return Err(ParseError::NoProduction {
                non_terminal,
                lookahead,
                position: buffer.position(),
            });
        };
        self.diagnostics
            .trace(format_args!("{non_terminal} on {lookahead} -> {symbols:?}"));

        let mut node = Node::non_terminal(non_terminal);
        for &symbol in symbols {
            let child = if symbol == Tag::Epsilon {
                Node::leaf(Token::epsilon())
            } else if symbol.is_terminal() {
                let position = buffer.position();
                let token = buffer.advance();
                if token.tag != symbol {
                    return Err(ParseError::UnexpectedToken {
                        expected: symbol,
                        actual: token.tag,
                        position,
                    });
                }
                Node::leaf(token)
            } else {
                self.parse_non_terminal(symbol, buffer, depth + 1)?
            };
            node.push(child);
        }
        Ok(node)
    }
}
