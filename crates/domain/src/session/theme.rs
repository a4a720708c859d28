//! Theme preference

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Theme preference chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the environment's color-scheme preference.
    #[default]
    System,
}

/// The concrete scheme in effect after resolving [`Theme::System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppliedTheme {
    /// Light scheme.
    #[default]
    Light,
    /// Dark scheme.
    Dark,
}

impl Theme {
    /// Resolves the preference against the environment's "prefers dark" signal.
    #[must_use]
    pub const fn resolve(self, prefers_dark: bool) -> AppliedTheme {
        match self {
            Self::Light => AppliedTheme::Light,
            Self::Dark => AppliedTheme::Dark,
            Self::System => {
                if prefers_dark {
                    AppliedTheme::Dark
                } else {
                    AppliedTheme::Light
                }
            }
        }
    }

    /// Returns true if this preference tracks the environment.
    #[must_use]
    pub const fn follows_system(self) -> bool {
        matches!(self, Self::System)
    }

    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(DomainError::UnknownTheme(other.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn theme_resolution() {
        assert_eq!(Theme::Light.resolve(true), AppliedTheme::Light);
        assert_eq!(Theme::Dark.resolve(false), AppliedTheme::Dark);
        assert_eq!(Theme::System.resolve(true), AppliedTheme::Dark);
        assert_eq!(Theme::System.resolve(false), AppliedTheme::Light);
    }

    #[test]
    fn theme_parsing() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::default(), Theme::System);
    }

    #[test]
    fn theme_serde_lowercase() {
        let json = serde_json::to_string(&Theme::System).unwrap();
        assert_eq!(json, "\"system\"");
    }
}
