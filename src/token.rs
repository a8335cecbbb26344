use std::fmt;

/// Grammar symbol attached to every token and tree node.
///
/// The first six variants are terminals produced by the lexer. `Term` and
/// `Terms` are the grammar's non-terminals and `Epsilon` doubles as the empty
/// production and the end-of-input marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// λ (or `\`)
    Lambda,
    /// Single lowercase letter
    Variable,
    /// .
    Abstraction,
    /// _
    Application,
    /// (
    LeftBracket,
    /// )
    RightBracket,
    Epsilon,
    Term,
    Terms,
}

impl Tag {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Lambda
                | Self::Variable
                | Self::Abstraction
                | Self::Application
                | Self::LeftBracket
                | Self::RightBracket
        )
    }

    /// Fixed display label, if the tag has one. Variables are labelled by
    /// their name instead.
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::Lambda => Some("λ"),
            Self::Abstraction => Some("."),
            Self::Application => Some("_"),
            Self::LeftBracket => Some("("),
            Self::RightBracket => Some(")"),
            Self::Epsilon => Some("ε"),
            Self::Term => Some("Λ"),
            Self::Terms => Some("Λs"),
            Self::Variable => None,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lambda => "'λ'",
            Self::Variable => "variable",
            Self::Abstraction => "'.'",
            Self::Application => "'_'",
            Self::LeftBracket => "'('",
            Self::RightBracket => "')'",
            Self::Epsilon => "end of input",
            Self::Term => "term",
            Self::Terms => "application tail",
        };
        f.write_str(name)
    }
}

/// A tagged lexeme.
///
/// For variables `value` is the bound name; for every other tag it is the
/// source lexeme or the tag's label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub tag: Tag,
    pub value: String,
}

impl Token {
    #[must_use]
    pub fn new(tag: Tag, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(Tag::Variable, name)
    }

    /// Token for the empty production and the end of the token stream.
    #[must_use]
    pub fn epsilon() -> Self {
        Self::new(Tag::Epsilon, "ε")
    }

    /// Token whose value is the tag's own label, for nodes that were not
    /// read from source.
    #[must_use]
    pub fn synthetic(tag: Tag) -> Self {
        Self::new(tag, tag.label().unwrap_or_default())
    }

    /// Label a tree node built from this token carries.
    #[must_use]
    pub fn label(&self) -> String {
        self.tag
            .label()
            .map_or_else(|| self.value.clone(), str::to_string)
    }
}
