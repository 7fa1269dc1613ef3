//! Semantic version value used by the rewriter.
//!
//! A [`Version`] is a plain record of numeric components plus an optional
//! pre-release stage. Mutations live in [`ops`] and always hand back a new
//! value, so a pipeline can feed each result straight into the next step.

mod ops;
mod parse;

use std::fmt;
use std::str::FromStr;

pub use ops::Component;
pub(crate) use parse::find_version;

/// Errors raised while parsing or mutating a version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// The input does not contain a `MAJOR.MINOR.PATCH` triple.
    #[error("Unsupported version string '{input}'")]
    Parse { input: String },
    /// The operation, target or stage name is not recognized, or cannot be
    /// applied to this value.
    #[error("Unsupported operation '{operation}': {reason}")]
    UnsupportedOperation { operation: String, reason: String },
}

impl VersionError {
    pub(crate) fn unsupported(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

/// Pre-release stages that carry a counter, ordered from stable to early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Rc,
    Beta,
    Alpha,
}

impl Stage {
    /// All counted stages, most stable first.
    pub const ALL: [Stage; 3] = [Stage::Rc, Stage::Beta, Stage::Alpha];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Rc => "rc",
            Stage::Beta => "beta",
            Stage::Alpha => "alpha",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = VersionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "rc" => Ok(Stage::Rc),
            "beta" | "b" => Ok(Stage::Beta),
            "alpha" | "a" => Ok(Stage::Alpha),
            _ => Err(VersionError::unsupported(
                name,
                "pre-release stage must be one of rc, beta, alpha",
            )),
        }
    }
}

/// Pre-release marker attached to a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PreRelease {
    /// Stable release.
    #[default]
    None,
    /// `-dev` marker without a counter.
    Dev,
    /// One of the counted stages.
    Stage(Stage),
    /// Unrecognized label, kept verbatim for rendering.
    Custom(String),
}

impl PreRelease {
    /// Map a stage label to a pre-release, expanding `a`/`b` shorthands.
    ///
    /// An empty label means no pre-release; anything unknown becomes
    /// [`PreRelease::Custom`].
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        match label.as_str() {
            "" => PreRelease::None,
            "dev" => PreRelease::Dev,
            other => match other.parse::<Stage>() {
                Ok(stage) => PreRelease::Stage(stage),
                Err(_) => PreRelease::Custom(label),
            },
        }
    }

    /// Whether the pre-release renders a counter.
    pub fn has_counter(&self) -> bool {
        matches!(self, PreRelease::Stage(_) | PreRelease::Custom(_))
    }

    fn label(&self) -> Option<&str> {
        match self {
            PreRelease::None => None,
            PreRelease::Dev => Some("dev"),
            PreRelease::Stage(stage) => Some(stage.as_str()),
            PreRelease::Custom(label) => Some(label),
        }
    }
}

/// A `MAJOR.MINOR.PATCH[-STAGE[N]][+BUILD]` version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre: PreRelease,
    pre_counter: u64,
    build: u64,
    always_show_pre_counter: bool,
}

impl Default for Version {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl Version {
    /// Create a stable version without build number.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: PreRelease::None,
            pre_counter: 1,
            build: 0,
            always_show_pre_counter: true,
        }
    }

    /// Parse the first version found in `text`.
    pub fn parse(text: &str) -> Result<Self, VersionError> {
        parse::parse(text)
    }

    /// Replace the pre-release. The counter is raised to 1 when needed and
    /// ignored for stages that do not carry one.
    pub fn with_pre(mut self, pre: PreRelease, counter: u64) -> Self {
        self.pre_counter = if pre.has_counter() { counter.max(1) } else { 1 };
        self.pre = pre;
        self
    }

    /// Replace the pre-release from a token such as `beta2`, `rc.3` or `b`.
    ///
    /// Unknown labels are kept as [`PreRelease::Custom`].
    pub fn with_pre_label(self, token: &str) -> Self {
        let token = token.to_ascii_lowercase();
        let (label, digits) = parse::split_pre_token(&token);
        let counter = digits
            .map(|digits| digits.parse::<u64>().unwrap_or(u64::MAX))
            .unwrap_or(1);
        self.with_pre(PreRelease::from_label(label), counter)
    }

    pub fn with_build(mut self, build: u64) -> Self {
        self.build = build;
        self
    }

    /// Render `-rc` instead of `-rc1` when `show` is false.
    pub fn with_always_show_pre_counter(mut self, show: bool) -> Self {
        self.always_show_pre_counter = show;
        self
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn pre(&self) -> &PreRelease {
        &self.pre
    }

    /// Pre-release counter; always 1 for stable and dev versions.
    pub fn pre_counter(&self) -> u64 {
        self.pre_counter
    }

    /// Build number; 0 when absent.
    pub fn build(&self) -> u64 {
        self.build
    }

    pub fn always_show_pre_counter(&self) -> bool {
        self.always_show_pre_counter
    }

    pub(crate) fn clear_pre(&mut self) {
        self.pre = PreRelease::None;
        self.pre_counter = 1;
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(label) = self.pre.label() {
            write!(f, "-{label}")?;
            if self.pre.has_counter() && (self.pre_counter > 1 || self.always_show_pre_counter) {
                write!(f, "{}", self.pre_counter)?;
            }
        }
        if self.build != 0 {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Lowercase a name and drop `-`/`_` so `decrease-major`, `decrease_major`
/// and `decreaseMajor` compare equal.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
