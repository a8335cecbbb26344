use crate::token::{Tag, Token};

/// Tree node owning its children exclusively.
///
/// Nodes are built by the parser and edited in place by the simplifier and
/// the reduction engine through the positional `insert`/`delete`/`replace`
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    label: String,
    token: Token,
    children: Vec<Self>,
}

impl Node {
    #[must_use]
    pub fn new(label: impl Into<String>, token: Token) -> Self {
        Self {
            label: label.into(),
            token,
            children: Vec::new(),
        }
    }

    /// Leaf wrapping a consumed token, labelled after it.
    #[must_use]
    pub fn leaf(token: Token) -> Self {
        Self::new(token.label(), token)
    }

    /// Empty `Term` or `Terms` node.
    #[must_use]
    pub fn non_terminal(tag: Tag) -> Self {
        Self::leaf(Token::synthetic(tag))
    }

    /// `Term` node over the given children.
    #[must_use]
    pub fn term(children: Vec<Self>) -> Self {
        let mut node = Self::non_terminal(Tag::Term);
        node.children = children;
        node
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    #[must_use]
    pub const fn tag(&self) -> Tag {
        self.token.tag
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether this is a variable leaf named `name`.
    #[must_use]
    pub fn is_variable(&self, name: &str) -> bool {
        self.tag() == Tag::Variable && self.token.value == name
    }

    /// Variable declared by this node if it is an abstraction
    /// `[λ, v, ., body..]`.
    #[must_use]
    pub fn bound_variable(&self) -> Option<&str> {
        match self.children.as_slice() {
            [lambda, var, ..] if lambda.tag() == Tag::Lambda && var.tag() == Tag::Variable => {
                Some(var.token.value.as_str())
            }
            _ => None,
        }
    }

    /// Renames a variable leaf, keeping label and token in step.
    pub fn rename(&mut self, name: &str) {
        if self.tag() == Tag::Variable {
            name.clone_into(&mut self.token.value);
            name.clone_into(&mut self.label);
        }
    }

    pub fn push(&mut self, child: Self) {
        let len = self.children.len();
        self.insert(len, [child]);
    }

    /// Inserts `nodes` before position `pos`.
    ///
    /// Epsilon and variable nodes stay leaves: inserting under them is
    /// ignored.
    pub fn insert(&mut self, pos: usize, nodes: impl IntoIterator<Item = Self>) {
        if matches!(self.tag(), Tag::Epsilon | Tag::Variable) {
            return;
        }
        self.children.splice(pos..pos, nodes);
    }

    /// Removes and returns the child at `pos`.
    pub fn delete(&mut self, pos: usize) -> Self {
        self.children.remove(pos)
    }

    /// Inserts `nodes` at `pos`, then deletes the child they displaced.
    /// The child count changes by `nodes.len() - 1`.
    pub fn replace(&mut self, pos: usize, nodes: Vec<Self>) -> Self {
        let inserted = nodes.len();
        self.insert(pos, nodes);
        self.delete(pos + inserted)
    }

    /// Number of levels from this node down to its deepest leaf, counting
    /// both ends.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Detaches every child, leaving this node a leaf.
    pub fn take_children(&mut self) -> Vec<Self> {
        std::mem::take(&mut self.children)
    }

    pub fn set_children(&mut self, children: Vec<Self>) {
        self.children.clear();
        self.insert(0, children);
    }
}

/// Owned syntax tree. The root is reached directly, everything else only
/// through parent-to-child ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    root: Node,
}

/// `(id, label)` record for one node of a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub id: usize,
    pub label: String,
}

/// Directed parent-to-child edge between two [`NodeRecord`] ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: usize,
    pub to: usize,
}

/// Shape of a tree as flat records, for an external renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl Ast {
    #[must_use]
    pub const fn new(root: Node) -> Self {
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    pub const fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Flattens the tree into node and edge records. Ids are assigned in
    /// pre-order starting with the root at 0.
    #[must_use]
    pub fn graph(&self) -> Graph {
        let mut graph = Graph::default();
        Self::traverse(&self.root, &mut graph);
        graph
    }

    fn traverse(node: &Node, graph: &mut Graph) {
        let id = graph.nodes.len();
        let label = if node.label.is_empty() {
            node.token.value.clone()
        } else {
            node.label.clone()
        };
        graph.nodes.push(NodeRecord { id, label });
        for child in &node.children {
            let to = graph.nodes.len();
            graph.edges.push(EdgeRecord { from: id, to });
            Self::traverse(child, graph);
        }
    }
}

impl Graph {
    /// Line-oriented dump: one `id label` line per node, then one
    /// `from -> to` line per edge.
    #[must_use]
    pub fn to_text(&self) -> String {
        let nodes = self
            .nodes
            .iter()
            .map(|node| format!("{} {}", node.id, node.label));
        let edges = self
            .edges
            .iter()
            .map(|edge| format!("{} -> {}", edge.from, edge.to));
        nodes.chain(edges).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Node {
        Node::leaf(Token::variable(name))
    }

    fn op(tag: Tag) -> Node {
        Node::leaf(Token::synthetic(tag))
    }

    fn labels(node: &Node) -> Vec<&str> {
        node.children().iter().map(Node::label).collect()
    }

    #[test]
    fn test_insert_and_delete() {
        let mut node = Node::term(vec![var("a"), var("c")]);
        node.insert(1, [var("b")]);
        assert_eq!(labels(&node), ["a", "b", "c"]);

        let removed = node.delete(0);
        assert_eq!(removed.label(), "a");
        assert_eq!(labels(&node), ["b", "c"]);
    }

    #[test]
    fn test_replace_changes_count_by_inserted_minus_one() {
        let mut node = Node::term(vec![var("a"), var("b"), var("c")]);
        let removed = node.replace(1, vec![var("x"), var("y"), var("z")]);
        assert_eq!(removed.label(), "b");
        assert_eq!(labels(&node), ["a", "x", "y", "z", "c"]);

        let removed = node.replace(0, Vec::new());
        assert_eq!(removed.label(), "a");
        assert_eq!(labels(&node), ["x", "y", "z", "c"]);
    }

    #[test]
    fn test_leaves_stay_leaves() {
        let mut epsilon = Node::leaf(Token::epsilon());
        epsilon.push(var("x"));
        assert!(epsilon.is_leaf());

        let mut variable = var("x");
        variable.push(var("y"));
        assert!(variable.is_leaf());
    }

    #[test]
    fn test_bound_variable() {
        let abstraction = Node::term(vec![
            op(Tag::Lambda),
            var("x"),
            op(Tag::Abstraction),
            Node::term(vec![var("x")]),
        ]);
        assert_eq!(abstraction.bound_variable(), Some("x"));
        assert_eq!(Node::term(vec![var("x")]).bound_variable(), None);
    }

    #[test]
    fn test_depth_counts_both_ends() {
        assert_eq!(var("x").depth(), 1);
        let nested = Node::term(vec![
            var("x"),
            op(Tag::Application),
            Node::term(vec![Node::term(vec![var("y")])]),
        ]);
        assert_eq!(nested.depth(), 4);
    }

    #[test]
    fn test_rename_only_touches_variables() {
        let mut node = var("x");
        node.rename("q");
        assert_eq!(node.label(), "q");
        assert_eq!(node.token().value, "q");

        let mut lambda = op(Tag::Lambda);
        lambda.rename("q");
        assert_eq!(lambda.label(), "λ");
    }

    #[test]
    fn test_graph_is_preorder() {
        let root = Node::term(vec![
            var("x"),
            op(Tag::Application),
            Node::term(vec![var("y")]),
        ]);
        let graph = Ast::new(root).graph();

        let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["Λ", "x", "_", "Λ", "y"]);
        assert_eq!(
            graph.edges,
            vec![
                EdgeRecord { from: 0, to: 1 },
                EdgeRecord { from: 0, to: 2 },
                EdgeRecord { from: 0, to: 3 },
                EdgeRecord { from: 3, to: 4 },
            ]
        );
        assert!(graph.to_text().starts_with("0 Λ\n1 x"));
    }
}
