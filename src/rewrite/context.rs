use std::sync::LazyLock;

use regex::{Match, Regex};

/// `/** ... */`; an escaped `\*/` does not close the comment.
const BLOCK_COMMENT_PATTERN: &str = r"(?s)/\*\*(?:\\.|[^\\])*?\*/";
/// A line whose first non-blank characters are `//`.
const LINE_COMMENT_PATTERN: &str = r"(?m)^[ \t]*//[^\r\n]*";
/// `version: "1.0.0"`, `'version' => '1.0.0'` and friends.
const PROPERTY_PATTERN: &str =
    r#"(?i)['"]?version['"]?[ \t]*(?::|=>)[ \t]*(?:"[^"\r\n]*"|'[^'\r\n]*')"#;

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BLOCK_COMMENT_PATTERN).expect("block comment regex must compile"));
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(LINE_COMMENT_PATTERN).expect("line comment regex must compile"));
static PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PROPERTY_PATTERN).expect("property regex must compile"));

/// A context pattern could not be compiled.
#[derive(Debug, thiserror::Error)]
#[error("Invalid context pattern '{pattern}': {source}")]
pub struct ContextError {
    pub pattern: String,
    pub source: regex::Error,
}

/// Region of a file in which versions may be replaced.
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    regex: Regex,
}

impl Context {
    pub const BLOCK_COMMENT: &'static str = "block-comment";
    pub const LINE_COMMENT: &'static str = "line-comment";
    pub const PROPERTY: &'static str = "property";

    /// Compile a custom context; the whole match is the region.
    pub fn new(pattern: &str) -> Result<Self, ContextError> {
        let regex = Regex::new(pattern).map_err(|source| ContextError {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            name: pattern.to_string(),
            regex,
        })
    }

    /// Resolve a built-in context name, falling back to a regex.
    pub fn parse(name_or_pattern: &str) -> Result<Self, ContextError> {
        match Self::builtin(name_or_pattern) {
            Some(context) => Ok(context),
            None => Self::new(name_or_pattern),
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            Self::BLOCK_COMMENT => Some(Self::block_comment()),
            Self::LINE_COMMENT => Some(Self::line_comment()),
            Self::PROPERTY => Some(Self::property()),
            _ => None,
        }
    }

    pub fn block_comment() -> Self {
        Self::named(Self::BLOCK_COMMENT, &BLOCK_COMMENT)
    }

    pub fn line_comment() -> Self {
        Self::named(Self::LINE_COMMENT, &LINE_COMMENT)
    }

    pub fn property() -> Self {
        Self::named(Self::PROPERTY, &PROPERTY)
    }

    /// Contexts used when none are configured.
    pub fn defaults() -> Vec<Self> {
        vec![Self::block_comment(), Self::line_comment(), Self::property()]
    }

    /// Built-in name or the source pattern.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-overlapping regions of `text`, in order.
    pub fn regions<'t>(&self, text: &'t str) -> impl Iterator<Item = Match<'t>> {
        self.regex.find_iter(text)
    }

    fn named(name: &str, regex: &Regex) -> Self {
        Self {
            name: name.to_string(),
            regex: regex.clone(),
        }
    }
}
