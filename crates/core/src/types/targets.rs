//! Typed targets for the `serve`, `build` and `test` intents

use crate::errors::{Error, Result};
use std::fmt;

/// How an unrecognized target name is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPolicy {
    /// Use the intent's default target
    #[default]
    Fallback,
    /// Reject the target with [`Error::UnknownTarget`]
    Strict,
}

/// A closed set of targets belonging to one intent
pub trait Target: Sized + Default {
    /// Intent name used in diagnostics
    const INTENT: &'static str;

    /// Map a target name onto a variant, `None` when unrecognized
    fn lookup(name: &str) -> Option<Self>;

    /// Whether the target is one of the intent's named profiles
    fn is_named(&self) -> bool {
        true
    }

    /// Resolve an optional caller-supplied name under `policy`.
    ///
    /// A missing or empty name always yields the default target.
    fn resolve(name: Option<&str>, policy: TargetPolicy) -> Result<Self> {
        let name = match name {
            None | Some("") => return Ok(Self::default()),
            Some(name) => name,
        };

        match (Self::lookup(name), policy) {
            (Some(target), TargetPolicy::Strict) if !target.is_named() => {
                Err(Error::unknown_target(Self::INTENT, name))
            }
            (Some(target), _) => Ok(target),
            (None, TargetPolicy::Strict) => Err(Error::unknown_target(Self::INTENT, name)),
            (None, TargetPolicy::Fallback) => {
                tracing::debug!(
                    intent = Self::INTENT,
                    requested = %name,
                    "unrecognized target, using default"
                );
                Ok(Self::default())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServeTarget {
    #[default]
    Dev,
    Debug,
    LiveEdit,
}

impl ServeTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServeTarget::Dev => "dev",
            ServeTarget::Debug => "debug",
            ServeTarget::LiveEdit => "liveEdit",
        }
    }
}

impl Target for ServeTarget {
    const INTENT: &'static str = "serve";

    fn lookup(name: &str) -> Option<Self> {
        match name {
            "dev" => Some(ServeTarget::Dev),
            "debug" => Some(ServeTarget::Debug),
            "liveEdit" => Some(ServeTarget::LiveEdit),
            _ => None,
        }
    }
}

/// Build profile. Any name other than `dev` and `liveEdit` is a release-style
/// build that gets its own clean step and the release tasks appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BuildTarget {
    #[default]
    Dev,
    Dist,
    LiveEdit,
    Release(String),
}

impl BuildTarget {
    pub fn as_str(&self) -> &str {
        match self {
            BuildTarget::Dev => "dev",
            BuildTarget::Dist => "dist",
            BuildTarget::LiveEdit => "liveEdit",
            BuildTarget::Release(name) => name,
        }
    }

    /// Release builds minify, extract source maps and assemble `dist/`
    pub fn is_release(&self) -> bool {
        matches!(self, BuildTarget::Dist | BuildTarget::Release(_))
    }

    /// Incremental builds skip the clean step and only touch changed files
    pub fn is_incremental(&self) -> bool {
        matches!(self, BuildTarget::LiveEdit)
    }
}

impl Target for BuildTarget {
    const INTENT: &'static str = "build";

    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "dev" => BuildTarget::Dev,
            "dist" => BuildTarget::Dist,
            "liveEdit" => BuildTarget::LiveEdit,
            other => BuildTarget::Release(other.to_string()),
        })
    }

    fn is_named(&self) -> bool {
        !matches!(self, BuildTarget::Release(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestTarget {
    Server,
    Client,
    E2e,
    /// Server suite followed by the client suite
    #[default]
    All,
}

impl TestTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestTarget::Server => "server",
            TestTarget::Client => "client",
            TestTarget::E2e => "e2e",
            TestTarget::All => "all",
        }
    }
}

impl Target for TestTarget {
    const INTENT: &'static str = "test";

    fn lookup(name: &str) -> Option<Self> {
        match name {
            "server" => Some(TestTarget::Server),
            "client" => Some(TestTarget::Client),
            "e2e" => Some(TestTarget::E2e),
            _ => None,
        }
    }
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display!(ServeTarget, BuildTarget, TestTarget);
