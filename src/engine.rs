use std::collections::HashMap;

use thiserror::Error;

use crate::{
    ast::{Ast, Node},
    diagnostics::Diagnostics,
    parser::DEFAULT_MAX_DEPTH,
    token::Tag,
};

/// Errors raised by the reduction engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReductionError {
    /// Alpha reduction was asked for with an empty renaming.
    #[error("no renaming supplied")]
    NoRenaming,
    /// A renaming mentions something that is not a single lowercase letter.
    #[error("Invalid variable name {name:?}: names are single lowercase letters")]
    InvalidName { name: String },
    /// A renaming pair is not of the form `name=name`.
    #[error("Malformed renaming {pair:?}: expected name=name")]
    MalformedRenaming { pair: String },
    /// Normalization did not reach a fixed point within the step limit.
    #[error("Reduction limit of {0} steps exceeded")]
    StepLimitExceeded(usize),
    /// A renaming would bind an occurrence to a different declaration.
    #[error("Renaming to {name:?} would capture another variable")]
    Capture { name: String },
    /// Normalization grew the tree past the engine's depth limit.
    #[error("Expression grew deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Old-name to new-name mapping for alpha reduction.
pub type Renaming = HashMap<String, String>;

/// Rewrites simplified ASTs in place.
///
/// Holds configuration only, so it is cheap to copy and safe to share.
#[derive(Debug, Clone, Copy)]
pub struct Engine<'a> {
    max_depth: usize,
    diagnostics: Diagnostics<'a>,
}

impl Default for Engine<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Engine<'a> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            diagnostics: Diagnostics::silent(),
        }
    }

    /// Bounds how deep [`Engine::normalize`] lets the tree grow.
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

    /// Performs one bottom-up beta-reduction pass.
    ///
    /// Every `Term` of the form `[abstraction, _, argument]` is contracted
    /// after its children have been visited. Substitution stops at nested
    /// abstractions that rebind the same name; free variables of the argument
    /// are not renamed, so capture under a different binder name is possible.
    ///
    /// A single call never loops. Use [`Engine::normalize`] to repeat passes
    /// until nothing changes.
    ///
    /// # Examples
    /// ```
    /// use lambda_rewrite::{Engine, parse, unparse};
    ///
    /// let ast = parse("(λy.y_z_y)_t").unwrap();
    /// let reduced = Engine::new().beta_reduce(ast);
    /// assert_eq!(unparse(&reduced).unwrap(), "(t_(z_t))");
    /// ```
    #[must_use]
    pub fn beta_reduce(&self, mut ast: Ast) -> Ast {
        let contracted = self.beta_pass(ast.root_mut());
        self.diagnostics
            .trace(format_args!("beta pass contracted {contracted} redexes"));
        ast
    }

    /// Runs one pass over `node` and returns how many redexes were
    /// contracted.
    pub fn beta_pass(&self, node: &mut Node) -> usize {
        let mut contracted = 0;
        for child in node.children_mut() {
            contracted += self.beta_pass(child);
        }
        if self.contract(node) {
            contracted += 1;
        }
        contracted
    }

    /// Repeats beta passes until a pass contracts nothing.
    ///
    /// # Errors
    /// Returns [`ReductionError::StepLimitExceeded`] if `max_steps` passes
    /// still leave redexes, which is the case for diverging terms, and
    /// [`ReductionError::NestingTooDeep`] if the tree grows past the depth
    /// limit.
    pub fn normalize(&self, mut ast: Ast, max_steps: usize) -> Result<Ast, ReductionError> {
        self.check_depth(&ast)?;
        for step in 1..=max_steps {
            let contracted = self.beta_pass(ast.root_mut());
            self.diagnostics.trace(format_args!(
                "normalization pass {step} contracted {contracted} redexes"
            ));
            self.check_depth(&ast)?;
            if contracted == 0 {
                return Ok(ast);
            }
        }
        // the last allowed pass may have produced the normal form
        let mut probe = ast.clone();
        if self.beta_pass(probe.root_mut()) == 0 {
            return Ok(ast);
        }
        Err(ReductionError::StepLimitExceeded(max_steps))
    }

    /// Renames bound variables according to `renaming`.
    ///
    /// Each declaration whose name is a key is renamed together with the
    /// occurrences it binds. Occurrences inside a nested abstraction that
    /// rebinds the same original name belong to that inner declaration, and
    /// free variables are never touched.
    ///
    /// # Errors
    /// Returns [`ReductionError::NoRenaming`] for an empty mapping,
    /// [`ReductionError::InvalidName`] if a key or value is not a single
    /// lowercase letter, and [`ReductionError::Capture`] if a new name would
    /// change which declaration an occurrence refers to.
    pub fn alpha_reduce(&self, mut ast: Ast, renaming: &Renaming) -> Result<Ast, ReductionError> {
        if renaming.is_empty() {
            return Err(ReductionError::NoRenaming);
        }
        for name in renaming.keys().chain(renaming.values()) {
            if !is_identifier(name) {
                return Err(ReductionError::InvalidName { name: name.clone() });
            }
        }

        let before = occurrences(ast.root());
        let mut scopes = Vec::new();
        let renamed =
            self.rename_bound(std::slice::from_mut(ast.root_mut()), renaming, &mut scopes);
        let after = occurrences(ast.root());
        // a renamed occurrence keeps its index; a free one keeps its name too
        let captured = before
            .iter()
            .zip(&after)
            .find(|(old, new)| match (old.1, new.1) {
                (None, None) => old.0 != new.0,
                (old_index, new_index) => old_index != new_index,
            });
        if let Some((_, (name, _))) = captured {
            return Err(ReductionError::Capture { name: name.clone() });
        }
        self.diagnostics
            .trace(format_args!("alpha pass renamed {renamed} variables"));
        Ok(ast)
    }

    fn check_depth(&self, ast: &Ast) -> Result<(), ReductionError> {
        if ast.root().depth() > self.max_depth {
            return Err(ReductionError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn contract(&self, node: &mut Node) -> bool {
        let Some(name) = redex_variable(node).map(str::to_owned) else {
            return false;
        };
        let [left, _, argument] = match <[Node; 3]>::try_from(node.take_children()) {
            Ok(parts) => parts,
            Err(children) => {
                node.set_children(children);
                return false;
            }
        };

        let mut abstraction = unwrap_term(left);
        // drop the λ, variable and '.' leaves
        let mut body: Vec<Node> = abstraction.take_children().into_iter().skip(3).collect();
        let substituted = substitute(&mut body, &name, &argument);
        self.diagnostics.debug(format_args!(
            "contracted redex on {name}: {substituted} occurrences replaced"
        ));
        node.set_children(body);
        true
    }

    /// `scopes` holds, innermost last, each enclosing declaration's original
    /// name and the name it was renamed to, if any.
    fn rename_bound(
        &self,
        nodes: &mut [Node],
        renaming: &Renaming,
        scopes: &mut Vec<(String, Option<String>)>,
    ) -> usize {
        let mut renamed = 0;
        for node in nodes {
            if let Some(original) = node.bound_variable().map(str::to_owned) {
                let target = renaming.get(&original).cloned();
                let children = node.children_mut();
                if let Some(target) = &target {
                    children[1].rename(target);
                    renamed += 1;
                    self.diagnostics
                        .debug(format_args!("renamed binder {original} to {target}"));
                }
                scopes.push((original, target));
                renamed += self.rename_bound(&mut children[2..], renaming, scopes);
                scopes.pop();
            } else if node.tag() == Tag::Variable {
                let target = scopes
                    .iter()
                    .rev()
                    .find(|(original, _)| node.is_variable(original))
                    .and_then(|(_, target)| target.clone());
                if let Some(target) = target {
                    node.rename(&target);
                    renamed += 1;
                }
            } else {
                renamed += self.rename_bound(node.children_mut(), renaming, scopes);
            }
        }
        renamed
    }
}

/// Name bound by the abstraction on the left of `node`, if `node` is a
/// redex `[abstraction, _, argument]`.
fn redex_variable(node: &Node) -> Option<&str> {
    if node.tag() != Tag::Term {
        return None;
    }
    let [left, op, _] = node.children() else {
        return None;
    };
    if op.tag() != Tag::Application {
        return None;
    }
    peel_term(left).bound_variable()
}

/// Looks through `Term` nodes that only wrap another `Term`.
fn peel_term(mut node: &Node) -> &Node {
    while let [inner] = node.children() {
        if inner.tag() != Tag::Term {
            break;
        }
        node = inner;
    }
    node
}

/// Owned counterpart of [`peel_term`].
fn unwrap_term(mut node: Node) -> Node {
    loop {
        match <[Node; 1]>::try_from(node.take_children()) {
            Ok([inner]) if inner.tag() == Tag::Term => node = inner,
            Ok([inner]) => {
                node.push(inner);
                return node;
            }
            Err(children) => {
                node.set_children(children);
                return node;
            }
        }
    }
}

/// Replaces every free occurrence of `name` in `nodes` with a copy of
/// `argument`. Returns the number of replacements.
fn substitute(nodes: &mut [Node], name: &str, argument: &Node) -> usize {
    let mut replaced = 0;
    for node in nodes {
        if node.is_variable(name) {
            *node = argument.clone();
            replaced += 1;
        } else if node.bound_variable() == Some(name) {
            // shadowed
        } else {
            replaced += substitute(node.children_mut(), name, argument);
        }
    }
    replaced
}

/// Every variable occurrence in pre-order with the de Bruijn index of its
/// declaration, or `None` if it is free.
fn occurrences(root: &Node) -> Vec<(String, Option<usize>)> {
    let mut found = Vec::new();
    let mut binders: Vec<&str> = Vec::new();
    // each node with the number of declarations enclosing it
    let mut stack = vec![(root, 0)];
    while let Some((node, depth)) = stack.pop() {
        binders.truncate(depth);
        if let Some(name) = node.bound_variable() {
            binders.push(name);
            let body = node.children().get(3..).unwrap_or_default();
            stack.extend(body.iter().rev().map(|child| (child, depth + 1)));
        } else if node.tag() == Tag::Variable {
            let name = node.token().value.as_str();
            let index = binders.iter().rev().position(|&binder| binder == name);
            found.push((name.to_string(), index));
        } else {
            stack.extend(node.children().iter().rev().map(|child| (child, depth)));
        }
    }
    found
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some('a'..='z'), None))
}

/// Parses a comma-separated list of `old=new` pairs.
///
/// Whitespace around names is ignored and empty items are skipped, so an
/// empty string yields an empty mapping.
///
/// # Errors
/// Returns [`ReductionError::MalformedRenaming`] for an item without `=` and
/// [`ReductionError::InvalidName`] for a side that is not a single lowercase
/// letter.
///
/// # Examples
/// ```
/// use lambda_rewrite::engine::parse_renaming;
///
/// let renaming = parse_renaming("x=a, y=b").unwrap();
/// assert_eq!(renaming["x"], "a");
/// assert_eq!(renaming["y"], "b");
/// ```
pub fn parse_renaming(text: &str) -> Result<Renaming, ReductionError> {
    let mut renaming = Renaming::new();
    for pair in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((old, new)) = pair.split_once('=') else {
            return Err(ReductionError::MalformedRenaming {
                pair: pair.to_string(),
            });
        };
        let (old, new) = (old.trim(), new.trim());
        for name in [old, new] {
            if !is_identifier(name) {
                return Err(ReductionError::InvalidName {
                    name: name.to_string(),
                });
            }
        }
        renaming.insert(old.to_string(), new.to_string());
    }
    Ok(renaming)
}

/// One beta-reduction pass with no diagnostics.
#[must_use]
pub fn beta_reduce(ast: Ast) -> Ast {
    Engine::new().beta_reduce(ast)
}

/// Alpha reduction with no diagnostics.
///
/// # Errors
/// See [`Engine::alpha_reduce`].
pub fn alpha_reduce(ast: Ast, renaming: &Renaming) -> Result<Ast, ReductionError> {
    Engine::new().alpha_reduce(ast, renaming)
}

/// Beta passes to a fixed point with no diagnostics.
///
/// # Errors
/// See [`Engine::normalize`].
pub fn normalize(ast: Ast, max_steps: usize) -> Result<Ast, ReductionError> {
    Engine::new().normalize(ast, max_steps)
}
