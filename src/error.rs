use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A single Y-side (YAML-family) parsing problem, tied to the 1-based
/// source line it was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YamlProblem {
    CollectionItem,
    InvalidArray,
    InvalidIndent,
    AnchorAliasName,
    CollectionBlock,
    InvalidBlock,
    UnclosedLiteral,
    KeyNameEmpty,
    KeyNameMultiline,
    KeyNameAnchorAlias,
    KeyNameInvalidChar,
    AliasValue,
    InvalidTag,
    AnchorNotFound,
    AliasRecursive,
    MergeSingleValue,
    MergeInvalid,
    InvalidValueForTag,
    DuplicatedKey,
    MergeInArray,
    CollectionInArray,
    UnclosedArray,
}

impl YamlProblem {
    fn message(self) -> &'static str {
        match self {
            Self::CollectionItem => "expected a collection item ('- ') at this indent",
            Self::InvalidArray => "invalid inline array syntax",
            Self::InvalidIndent => "inconsistent indentation",
            Self::AnchorAliasName => "anchor or alias name is empty or invalid",
            Self::CollectionBlock => "collection found where a scalar block was expected",
            Self::InvalidBlock => "invalid block scalar header",
            Self::UnclosedLiteral => "unclosed quoted or block literal",
            Self::KeyNameEmpty => "mapping key name is empty",
            Self::KeyNameMultiline => "mapping key name spans multiple lines",
            Self::KeyNameAnchorAlias => "mapping key name cannot be an anchor or alias",
            Self::KeyNameInvalidChar => "mapping key name contains an invalid character",
            Self::AliasValue => "alias cannot carry an inline value",
            Self::InvalidTag => "invalid or unrecognized tag",
            Self::AnchorNotFound => "alias refers to an anchor that was never defined",
            Self::AliasRecursive => "alias expansion is recursive",
            Self::MergeSingleValue => "merge key ('<<') requires a mapping or sequence of mappings",
            Self::MergeInvalid => "merge key ('<<') value is not a valid merge source",
            Self::InvalidValueForTag => "scalar value is not valid for its explicit tag",
            Self::DuplicatedKey => "duplicate key in mapping",
            Self::MergeInArray => "merge key ('<<') is not valid inside an array",
            Self::CollectionInArray => "block collection is not valid inside an inline array",
            Self::UnclosedArray => "unclosed inline array",
        }
    }
}

/// A single J-side (JSON-family) parsing problem, tied to the 1-based
/// source line it was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonProblem {
    UnexpectedEof,
    UnexpectedToken,
    InvalidNumber,
    InvalidEscape,
    UnclosedString,
    TrailingContent,
}

impl JsonProblem {
    fn message(self) -> &'static str {
        match self {
            Self::UnexpectedEof => "unexpected end of input",
            Self::UnexpectedToken => "unexpected token",
            Self::InvalidNumber => "invalid number literal",
            Self::InvalidEscape => "invalid escape sequence",
            Self::UnclosedString => "unclosed string literal",
            Self::TrailingContent => "trailing content after value",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("line {line}: {problem}", problem = .problem.message())]
    Yaml { problem: YamlProblem, line: usize },

    #[error("line {line}: {problem}", problem = .problem.message())]
    Json { problem: JsonProblem, line: usize },
}

impl Error {
    pub fn yaml(problem: YamlProblem, line: usize) -> Self {
        Self::Yaml { problem, line }
    }

    pub fn json(problem: JsonProblem, line: usize) -> Self {
        Self::Json { problem, line }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Yaml { line, .. } => *line,
            Self::Json { line, .. } => *line,
        }
    }
}
