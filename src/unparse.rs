use thiserror::Error;

use crate::{
    ast::{Ast, Node},
    token::Tag,
};

/// A node whose tag has no textual form in the canonical rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No textual form for {tag}")]
pub struct UnparseError {
    pub tag: Tag,
}

/// Serializes a simplified AST to canonical text.
///
/// A `Term` with more than two children is wrapped in parentheses; anything
/// smaller is rendered bare. Only simplified trees unparse: scaffolding
/// nodes (`Terms`, `Epsilon`, brackets) are rejected.
///
/// # Errors
/// Returns an [`UnparseError`] naming the first tag without a textual form.
///
/// # Examples
/// ```
/// use lambda_rewrite::{parse, unparse};
///
/// assert_eq!(unparse(&parse("λx.x").unwrap()).unwrap(), "(λx.x)");
/// assert_eq!(unparse(&parse("x_y_z").unwrap()).unwrap(), "(x_(y_z))");
/// ```
pub fn unparse(ast: &Ast) -> Result<String, UnparseError> {
    let mut out = String::new();
    write_node(ast.root(), &mut out)?;
    Ok(out)
}

fn write_node(node: &Node, out: &mut String) -> Result<(), UnparseError> {
    match node.tag() {
        Tag::Variable | Tag::Lambda | Tag::Abstraction | Tag::Application => {
            out.push_str(node.label());
        }
        Tag::Term => {
            let wrapped = node.children().len() > 2;
            if wrapped {
                out.push('(');
            }
            for child in node.children() {
                write_node(child, out)?;
            }
            if wrapped {
                out.push(')');
            }
        }
        tag @ (Tag::Terms | Tag::Epsilon | Tag::LeftBracket | Tag::RightBracket) => {
            return Err(UnparseError { tag });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parse, parser::Parser, token::Token};

    fn round_trip(input: &str) -> String {
        unparse(&parse(input).unwrap()).unwrap()
    }

    #[test]
    fn test_canonical_forms() {
        let test_cases = [
            ("x", "x"),
            ("λx.x", "(λx.x)"),
            ("λx.λy.y", "(λx.(λy.y))"),
            ("x_y", "(x_y)"),
            ("x_λy.x_y_z", "(x_(λy.(x_(y_z))))"),
            ("x_(λy.x)_y_z", "(x_((λy.x)_(y_z)))"),
            ("x_(λy.(x))_y_(z_z)", "(x_((λy.x)_(y_(z_z))))"),
            ("((x))", "x"),
            ("\\x.x", "(λx.x)"),
        ];
        for (input, expected) in test_cases {
            assert_eq!(round_trip(input), expected, "Failed for input: {input}");
        }
    }

    #[test]
    fn test_output_is_a_fixed_point() {
        for input in ["λx.x", "x_λy.x_y_z", "x_(λy.(x))_y_(z_z)", "(λa.a)_b"] {
            let once = round_trip(input);
            assert_eq!(round_trip(&once), once, "Failed for input: {input}");
        }
    }

    #[test]
    fn test_raw_tree_is_rejected() {
        let raw = Parser::new().parse(tokenize("x").unwrap()).unwrap();
        assert_eq!(unparse(&raw), Err(UnparseError { tag: Tag::Terms }));
    }

    #[test]
    fn test_epsilon_is_rejected() {
        let ast = Ast::new(Node::leaf(Token::epsilon()));
        let error = unparse(&ast).unwrap_err();
        assert_eq!(error.tag, Tag::Epsilon);
        assert_eq!(error.to_string(), "No textual form for end of input");
    }
}
