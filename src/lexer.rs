use thiserror::Error;

use crate::token::{Tag, Token};

/// A codepoint that no scanner transition accepts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unexpected character {codepoint:?} at position {position}")]
pub struct LexError {
    /// Codepoint offset into the source, not a byte offset.
    pub position: usize,
    pub codepoint: char,
}

/// Single-state scanner over the codepoints of an expression.
///
/// Every lexeme is exactly one codepoint, so a token's index in the output
/// equals its codepoint position in the source. The lexer is also an
/// [`Iterator`]: it yields `None` once input is exhausted, which is never
/// confused with a [`LexError`].
pub struct Lexer<'input> {
    chars: std::str::Chars<'input>,
    current_char: Option<char>,
    position: usize,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        let mut chars = input.chars();
        let current_char = chars.next();
        Lexer {
            chars,
            current_char,
            position: 0,
        }
    }

    /// Tokenizes the remaining input into a vector of tokens.
    ///
    /// No end marker is appended here; that is the token buffer's job.
    ///
    /// # Errors
    /// Returns a [`LexError`] at the first codepoint that matches no
    /// transition.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        self.collect()
    }

    fn advance(&mut self) {
        self.current_char = self.chars.next();
        self.position += 1;
    }

    /// The scanner's only transition table.
    const fn transition(ch: char) -> Option<Tag> {
        match ch {
            'λ' | '\\' => Some(Tag::Lambda),
            '.' => Some(Tag::Abstraction),
            '_' => Some(Tag::Application),
            '(' => Some(Tag::LeftBracket),
            ')' => Some(Tag::RightBracket),
            'a'..='z' => Some(Tag::Variable),
            _ => None,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.current_char?;
        let Some(tag) = Self::transition(ch) else {
            let error = LexError {
                position: self.position,
                codepoint: ch,
            };
            // Fuse after an error so the sequence stays finite.
            self.current_char = None;
            return Some(Err(error));
        };
        self.advance();
        Some(Ok(Token::new(tag, ch)))
    }
}

/// Scans `source` into tokens.
///
/// # Errors
/// Returns a [`LexError`] for the first unrecognized codepoint.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}
