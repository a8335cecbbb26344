pub mod ast;
pub mod diagnostics;
pub mod engine;
pub mod lexer;
pub mod parser;
pub mod simplify;
pub mod token;
pub mod unparse;

use thiserror::Error;

// Re-export main types and functions for convenient use
pub use ast::{Ast, EdgeRecord, Graph, Node, NodeRecord};
pub use diagnostics::Diagnostics;
pub use engine::{
    Engine, ReductionError, Renaming, alpha_reduce, beta_reduce, normalize, parse_renaming,
};
pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{DEFAULT_MAX_DEPTH, ParseError, Parser, TokenBuffer};
pub use simplify::simplify;
pub use token::{Tag, Token};
pub use unparse::{UnparseError, unparse};

/// Any failure along the text → tokens → tree → text pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reduction(#[from] ReductionError),
    #[error(transparent)]
    Unparse(#[from] UnparseError),
}

/// Parse a lambda calculus expression into its simplified AST.
///
/// This is a convenience function chaining [`tokenize`], [`Parser::parse`]
/// and [`simplify`] with default settings.
///
/// # Errors
/// Returns [`Error::Lex`] or [`Error::Parse`] if the input is malformed.
///
/// # Examples
/// ```
/// use lambda_rewrite::parse;
///
/// let ast = parse("(λx.x)_y").unwrap();
/// assert_eq!(ast.root().children().len(), 3);
/// assert!(parse("(x").is_err());
/// ```
pub fn parse(input: &str) -> Result<Ast, Error> {
    let tokens = tokenize(input)?;
    let raw = Parser::new().parse(tokens)?;
    Ok(simplify(raw))
}

/// Renders `input` in canonical, fully parenthesized form.
///
/// # Errors
/// Returns an error if the input cannot be tokenized or parsed.
///
/// # Examples
/// ```
/// use lambda_rewrite::canonicalize;
///
/// assert_eq!(canonicalize("x_y").unwrap(), "(x_y)");
/// ```
pub fn canonicalize(input: &str) -> Result<String, Error> {
    Ok(unparse(&parse(input)?)?)
}

/// Parse an expression and beta-reduce it until no pass changes it.
///
/// This is a convenience function combining [`parse`], [`normalize`] and
/// [`unparse`].
///
/// # Errors
/// Returns an error if parsing fails or the expression does not settle
/// within `max_steps` passes.
///
/// # Examples
/// ```
/// use lambda_rewrite::parse_and_reduce;
///
/// let result = parse_and_reduce("(λy.y)_(λa.a)_(λb.b)", 100).unwrap();
/// assert_eq!(result, "(λb.b)");
/// ```
pub fn parse_and_reduce(input: &str, max_steps: usize) -> anyhow::Result<String> {
    let ast = parse(input)?;
    let reduced = normalize(ast, max_steps)?;
    Ok(unparse(&reduced)?)
}
