//! Mutation pipeline replayed against every version found in a file.
//!
//! Operation names come from configuration (`major`, `decreasePatch`,
//! `rc:2`, ...) and are turned into [`Operation`] values up front, so an
//! unknown name fails before any file is touched.

use std::fmt;
use std::str::FromStr;

use crate::version::{Component, Stage, Version, VersionError, normalize_name};

/// A single pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Increase(Component),
    Decrease(Component),
    /// Enter a pre-release stage, optionally at an explicit counter.
    PreStage {
        stage: Stage,
        counter: Option<u64>,
    },
    Stable,
    Dev,
}

impl Operation {
    /// Resolve an operation name plus optional argument.
    ///
    /// Names are matched ignoring case, `-` and `_`. Only pre-release stages
    /// take an argument.
    pub fn from_name(name: &str, argument: Option<u64>) -> Result<Self, VersionError> {
        let normalized = normalize_name(name);
        if let Some(stage) = Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == normalized)
        {
            return Ok(Operation::PreStage {
                stage,
                counter: argument,
            });
        }

        let operation = match normalized.as_str() {
            "stable" => Operation::Stable,
            "dev" => Operation::Dev,
            other => match other.strip_prefix("decrease") {
                Some(target) => Operation::Decrease(parse_component(name, target)?),
                None => Operation::Increase(parse_component(name, other)?),
            },
        };
        if argument.is_some() {
            return Err(VersionError::unsupported(name, "operation takes no argument"));
        }
        Ok(operation)
    }

    /// Whether the operation accepts a numeric argument.
    pub fn takes_argument(&self) -> bool {
        matches!(self, Operation::PreStage { .. })
    }

    pub fn apply(&self, version: &Version) -> Result<Version, VersionError> {
        match *self {
            Operation::Increase(component) => version.increase(component),
            Operation::Decrease(component) => version.decrease(component),
            Operation::PreStage { stage, counter } => version.enter_pre_stage(stage, counter),
            Operation::Stable => Ok(version.to_stable()),
            Operation::Dev => Ok(version.to_dev()),
        }
    }
}

fn parse_component(name: &str, target: &str) -> Result<Component, VersionError> {
    target.parse::<Component>().map_err(|_| {
        VersionError::unsupported(
            name,
            "you can only increase/decrease major, minor, patch, preVersion, build, rc, beta and alpha",
        )
    })
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Increase(component) => write!(f, "{component}"),
            Operation::Decrease(component) => {
                let name = component.as_str();
                let mut chars = name.chars();
                let first = chars.next().map(|c| c.to_ascii_uppercase());
                write!(f, "decrease")?;
                if let Some(first) = first {
                    write!(f, "{first}{}", chars.as_str())?;
                }
                Ok(())
            }
            Operation::PreStage { stage, counter } => match counter {
                Some(counter) => write!(f, "{stage}:{counter}"),
                None => write!(f, "{stage}"),
            },
            Operation::Stable => f.write_str("stable"),
            Operation::Dev => f.write_str("dev"),
        }
    }
}

impl FromStr for Operation {
    type Err = VersionError;

    /// Parse `name` or `name:N`.
    fn from_str(step: &str) -> Result<Self, Self::Err> {
        let step = step.trim();
        match step.split_once(':') {
            Some((name, argument)) => {
                let argument = argument.trim().parse::<u64>().map_err(|_| {
                    VersionError::unsupported(step, "argument must be a non-negative integer")
                })?;
                Operation::from_name(name.trim(), Some(argument))
            }
            None => Operation::from_name(step, None),
        }
    }
}

/// What to do with each version found in a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pipeline {
    /// Replace every occurrence with this exact string.
    Fixed(String),
    /// Parse each occurrence and replay the operations in order.
    Steps {
        operations: Vec<Operation>,
        show_first_pre_counter: bool,
    },
}

impl Pipeline {
    pub fn fixed(target: impl Into<String>) -> Self {
        Pipeline::Fixed(target.into())
    }

    pub fn steps(operations: impl IntoIterator<Item = Operation>) -> Self {
        Pipeline::Steps {
            operations: operations.into_iter().collect(),
            show_first_pre_counter: true,
        }
    }

    /// Toggle rendering of the `1` in `-rc1`. Has no effect on fixed targets.
    pub fn with_show_first_pre_counter(self, show: bool) -> Self {
        match self {
            Pipeline::Steps { operations, .. } => Pipeline::Steps {
                operations,
                show_first_pre_counter: show,
            },
            fixed => fixed,
        }
    }

    /// Produce the replacement for a version string found in a file.
    pub fn apply(&self, found: &str) -> Result<String, VersionError> {
        match self {
            Pipeline::Fixed(target) => Ok(target.clone()),
            Pipeline::Steps {
                show_first_pre_counter,
                ..
            } => {
                let version = Version::parse(found)?
                    .with_always_show_pre_counter(*show_first_pre_counter);
                Ok(self.replay(version)?.to_string())
            }
        }
    }

    /// Run every step against `version`. Fixed pipelines return it unchanged.
    pub fn replay(&self, version: Version) -> Result<Version, VersionError> {
        let Pipeline::Steps { operations, .. } = self else {
            return Ok(version);
        };
        operations
            .iter()
            .try_fold(version, |current, operation| operation.apply(&current))
    }
}
