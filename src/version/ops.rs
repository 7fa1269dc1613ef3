use std::fmt;
use std::str::FromStr;

use super::{PreRelease, Stage, Version, VersionError, normalize_name};

/// Numeric field targeted by [`Version::increase`] and [`Version::decrease`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Major,
    Minor,
    Patch,
    PreCounter,
    Build,
}

impl Component {
    /// Name used in pipeline configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Component::Major => "major",
            Component::Minor => "minor",
            Component::Patch => "patch",
            Component::PreCounter => "preVersion",
            Component::Build => "build",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = VersionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match normalize_name(name).as_str() {
            "major" => Ok(Component::Major),
            "minor" => Ok(Component::Minor),
            "patch" => Ok(Component::Patch),
            "preversion" | "precounter" => Ok(Component::PreCounter),
            "build" => Ok(Component::Build),
            _ => Err(VersionError::unsupported(
                name,
                "you can only increase/decrease major, minor, patch, preVersion and build",
            )),
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

impl Version {
    /// Add one to `component`, resetting lower components as needed.
    pub fn increase(&self, component: Component) -> Result<Version, VersionError> {
        self.shift(component, Direction::Up)
    }

    /// Subtract one from `component`; never goes below 0 (1 for the
    /// pre-release counter).
    pub fn decrease(&self, component: Component) -> Result<Version, VersionError> {
        self.shift(component, Direction::Down)
    }

    /// Move to `stage`, or bump its counter when already there.
    ///
    /// An explicit `counter` wins over the implicit next value.
    pub fn enter_pre_stage(&self, stage: Stage, counter: Option<u64>) -> Result<Version, VersionError> {
        let mut next = self.clone();
        match &self.pre {
            PreRelease::Custom(label) => {
                return Err(VersionError::unsupported(
                    stage.as_str(),
                    format!("cannot move from custom pre-release '{label}'"),
                ));
            }
            PreRelease::Stage(current) if *current == stage => {
                next.pre_counter = counter.unwrap_or_else(|| self.pre_counter.saturating_add(1));
            }
            _ => {
                next.pre = PreRelease::Stage(stage);
                next.pre_counter = counter.unwrap_or(1);
            }
        }
        next.pre_counter = next.pre_counter.max(1);
        Ok(next)
    }

    /// Drop any pre-release marker.
    pub fn to_stable(&self) -> Version {
        let mut next = self.clone();
        next.clear_pre();
        next
    }

    /// Mark as `-dev`.
    pub fn to_dev(&self) -> Version {
        let mut next = self.clone();
        next.pre = PreRelease::Dev;
        next.pre_counter = 1;
        next
    }

    fn shift(&self, component: Component, direction: Direction) -> Result<Version, VersionError> {
        let mut next = self.clone();
        match component {
            Component::Major => {
                next.major = step(self.major, direction);
                next.minor = 0;
                next.patch = 0;
                next.clear_pre();
            }
            Component::Minor => {
                next.minor = step(self.minor, direction);
                next.patch = 0;
                next.clear_pre();
            }
            Component::Patch => {
                next.patch = step(self.patch, direction);
                next.clear_pre();
            }
            Component::PreCounter => match &self.pre {
                PreRelease::Stage(_) => {
                    next.pre_counter = step(self.pre_counter, direction).max(1);
                }
                PreRelease::Custom(label) => {
                    return Err(VersionError::unsupported(
                        component.as_str(),
                        format!("custom pre-release '{label}' has no defined ordering"),
                    ));
                }
                // Stable and dev versions have no counter to move.
                PreRelease::None | PreRelease::Dev => {}
            },
            Component::Build => {
                next.build = step(self.build, direction);
            }
        }
        Ok(next)
    }
}

fn step(value: u64, direction: Direction) -> u64 {
    match direction {
        Direction::Up => value.saturating_add(1),
        Direction::Down => value.saturating_sub(1),
    }
}
