use crate::{
    ast::{Ast, Node},
    token::Tag,
};

/// Turns a raw parse tree into the canonical AST.
///
/// The result holds only `Term` nodes and terminal leaves; `Terms`
/// wrappers are spliced into their parent, so an application chain becomes
/// `[head, _, rest]` on a single `Term`.
///
/// # Examples
/// ```
/// use lambda_rewrite::{Parser, simplify, tokenize, unparse};
///
/// let raw = Parser::new().parse(tokenize("(x)_y").unwrap()).unwrap();
/// let ast = simplify(raw);
/// assert_eq!(unparse(&ast).unwrap(), "(x_y)");
/// ```
#[must_use]
pub fn simplify(mut ast: Ast) -> Ast {
    simplify_node(ast.root_mut());
    ast
}

/// Simplifies `node` in place, children before parent.
///
/// Within one sibling list positions are visited from last to first so a
/// deletion or splice never shifts a position still to be visited.
pub fn simplify_node(node: &mut Node) {
    for child in node.children_mut() {
        simplify_node(child);
    }

    for pos in (0..node.children().len()).rev() {
        let (tag, is_leaf) = {
            let child = &node.children()[pos];
            (child.tag(), child.is_leaf())
        };
        match tag {
            Tag::Epsilon | Tag::LeftBracket | Tag::RightBracket => {
                node.delete(pos);
            }
            tag if !tag.is_terminal() && is_leaf => {
                // exhausted non-terminal
                node.delete(pos);
            }
            Tag::Terms => {
                let grandchildren = node.children_mut()[pos].take_children();
                node.replace(pos, grandchildren);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::Parser};

    fn canonical_shape(input: &str) -> String {
        let raw = Parser::new().parse(tokenize(input).unwrap()).unwrap();
        shape(simplify(raw).root())
    }

    fn shape(node: &Node) -> String {
        if node.is_leaf() {
            return node.label().to_string();
        }
        let children: Vec<_> = node.children().iter().map(shape).collect();
        format!("{}[{}]", node.label(), children.join(" "))
    }

    fn contains_scaffolding(node: &Node) -> bool {
        matches!(
            node.tag(),
            Tag::Epsilon | Tag::Terms | Tag::LeftBracket | Tag::RightBracket
        ) || node.children().iter().any(contains_scaffolding)
    }

    #[test]
    fn test_single_variable() {
        assert_eq!(canonical_shape("x"), "Λ[x]");
    }

    #[test]
    fn test_application_chain_nests_right() {
        assert_eq!(canonical_shape("x_y"), "Λ[x _ Λ[y]]");
        assert_eq!(canonical_shape("x_y_z"), "Λ[x _ Λ[y _ Λ[z]]]");
    }

    #[test]
    fn test_abstraction() {
        assert_eq!(canonical_shape("λx.x"), "Λ[λ x . Λ[x]]");
        assert_eq!(canonical_shape("λx.λy.y"), "Λ[λ x . Λ[λ y . Λ[y]]]");
    }

    #[test]
    fn test_brackets_leave_wrapper_terms() {
        assert_eq!(canonical_shape("(x)"), "Λ[Λ[x]]");
        assert_eq!(canonical_shape("(λy.y)_x"), "Λ[Λ[λ y . Λ[y]] _ Λ[x]]");
    }

    #[test]
    fn test_no_scaffolding_survives() {
        for input in ["x_(λy.(x))_y_(z_z)", "((λx.x)_(λy.y))_z", "λa.(b_c)_d"] {
            let raw = Parser::new().parse(tokenize(input).unwrap()).unwrap();
            let ast = simplify(raw);
            assert!(
                !contains_scaffolding(ast.root()),
                "Failed for input: {input}"
            );
        }
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let raw = Parser::new()
            .parse(tokenize("x_(λy.x)_y_z").unwrap())
            .unwrap();
        let once = simplify(raw);
        let twice = simplify(once.clone());
        assert_eq!(once, twice);
    }
}
